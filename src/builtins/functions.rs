use crate::argcheck::ArgCheck;
use crate::deprecate::{insert_path, Mapping};
use crate::object::methods::mapfields;
use crate::typetag::type_of;
use crate::value::{Function, NativeFn, OResult, Value};

use super::Symbol;

/// A builtin as stored in the namespace: where it lives, what arguments it
/// declares, and its implementation.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub module: &'static str,
    pub name: &'static str,
    pub signature: &'static str,
    pub eval: NativeFn,
}

impl Builtin {
    /// Fully qualified name, e.g. `std.object.clone`
    pub fn path(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }

    /// As a callable value, wrapped by the given argument checker
    pub fn function(&self, checker: &dyn ArgCheck) -> Function {
        checker.check_args(
            self.module,
            self.name,
            self.signature,
            Function::native(&self.path(), self.eval),
        )
    }
}

/// Helper trait for defining builtin functions.
/// Note: we never instantiate the implementing structs, the trait just
/// groups each builtin's pieces under one name.
pub(crate) trait BuiltinFnBuilder {
    fn register(namespace: &mut Mapping<Symbol>) {
        for builtin in Self::builtins() {
            insert_path(
                namespace,
                &builtin.path(),
                Symbol::Builtin(builtin),
            );
        }
    }

    /// One `Builtin` per name
    fn builtins() -> Vec<Builtin> {
        Self::names()
            .into_iter()
            .map(|name| {
                Builtin {
                    module: Self::module(),
                    name,
                    signature: Self::signature(),
                    eval: Self::eval,
                }
            })
            .collect()
    }

    /// dotted module path the names are bound in
    fn module() -> &'static str;

    /// names to bind to this function
    fn names() -> Vec<&'static str>;

    /// declared argument types, see `argcheck::Signature`
    fn signature() -> &'static str;

    /// Callback to evaluate a call to the function.
    fn eval(args: &[Value]) -> OResult<Value>;
}

/**********\
|* Typeof *|
\**********/
pub(crate) struct TypeOfFnBuilder;
impl BuiltinFnBuilder for TypeOfFnBuilder {
    fn module() -> &'static str {
        "std"
    }

    fn names() -> Vec<&'static str> {
        vec!["type_of"]
    }

    fn signature() -> &'static str {
        "(?any)"
    }

    fn eval(args: &[Value]) -> OResult<Value> {
        let value = args.first().cloned().unwrap_or_default();
        Ok(Value::Str(type_of(&value)))
    }
}

/***********************\
|* Container mapfields *|
\***********************/
pub(crate) struct ContainerMapfieldsFnBuilder;
impl BuiltinFnBuilder for ContainerMapfieldsFnBuilder {
    fn module() -> &'static str {
        "std.container"
    }

    fn names() -> Vec<&'static str> {
        vec!["mapfields"]
    }

    fn signature() -> &'static str {
        "(object, ?table|object, ?table)"
    }

    fn eval(args: &[Value]) -> OResult<Value> {
        mapfields(args)
    }
}
