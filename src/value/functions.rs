use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

use super::{OResult, Value};

/// Plain builtin implementation: receives the call's argument values.
pub type NativeFn = fn(&[Value]) -> OResult<Value>;

/*************\
|* Functions *|
\*************/
/// A named callable value. Cloning shares the underlying closure, so
/// wrappers (argument checks, deprecation notices) cost one allocation.
#[derive(Clone)]
pub struct Function {
    name: String,
    call: Rc<dyn Fn(&[Value]) -> OResult<Value>>,
}

impl Function {
    pub fn new(
        name: &str,
        call: impl Fn(&[Value]) -> OResult<Value> + 'static,
    ) -> Self {
        Function {
            name: name.to_string(),
            call: Rc::new(call),
        }
    }

    pub fn native(name: &str, eval: NativeFn) -> Self {
        Function::new(name, eval)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> OResult<Value> {
        (self.call)(args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.call, &other.call)
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "function: {}", self.name)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}
