use std::cell::Cell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use super::{Function, OResult, ObjectError, Table};
use crate::object::Object;
use crate::typetag::type_of;

/// Every value the object model can store in a field or pass to a call.
///
/// Tables, instances, functions and handles are reference types: cloning
/// the `Value` aliases the same storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(isize),
    Float(f64),
    Str(String),
    Table(Table),
    Object(Object),
    Function(Function),
    Handle(Handle),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Plain tables and prototype instances can both be merged from
    pub fn is_table_like(&self) -> bool {
        matches!(self, Value::Table(_) | Value::Object(_))
    }

    pub fn expect_table(&self) -> OResult<&Table> {
        match self {
            Value::Table(table) => Ok(table),
            _ => Err(self.type_error("table")),
        }
    }

    pub fn expect_object(&self) -> OResult<&Object> {
        match self {
            Value::Object(obj) => Ok(obj),
            _ => Err(self.type_error("object")),
        }
    }

    pub fn expect_str(&self) -> OResult<&str> {
        match self {
            Value::Str(s) => Ok(s),
            _ => Err(self.type_error("string")),
        }
    }

    pub fn expect_function(&self) -> OResult<&Function> {
        match self {
            Value::Function(f) => Ok(f),
            _ => Err(self.type_error("function")),
        }
    }

    fn type_error(&self, expected: &str) -> ObjectError {
        ObjectError::Type {
            expected: expected.to_string(),
            actual: type_of(self),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(x) => x.fmt(f),
            Value::Int(x) => x.fmt(f),
            Value::Float(x) => x.fmt(f),
            Value::Str(x) => x.fmt(f),
            Value::Table(x) => x.fmt(f),
            Value::Object(x) => x.fmt(f),
            Value::Function(x) => x.fmt(f),
            Value::Handle(x) => x.fmt(f),
        }
    }
}

/***********\
|* Handles *|
\***********/
/// An opaque system-level file/stream handle. Only its kind and
/// open/closed state are visible to the object model.
#[derive(Debug, Clone)]
pub struct Handle(Rc<HandleData>);

#[derive(Debug)]
struct HandleData {
    name: String,
    closed: Cell<bool>,
}

impl Handle {
    pub fn open(name: &str) -> Self {
        Handle(Rc::new(HandleData {
            name: name.to_string(),
            closed: Cell::new(false),
        }))
    }

    pub fn close(&self) {
        self.0.closed.set(true)
    }

    pub fn is_closed(&self) -> bool {
        self.0.closed.get()
    }

    /// Native kind name, as reported by `type_of`
    pub fn kind(&self) -> &'static str {
        if self.is_closed() {
            "closed file"
        } else {
            "file"
        }
    }
}

impl Display for Handle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_closed() {
            write!(f, "file (closed)")
        } else {
            write!(f, "file ({})", self.0.name)
        }
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/******************************\
|* Rust types <-> Value types *|
\******************************/
// `From<rust_type> for Value` is infallible, each rust type maps to exactly
// one variant. Going the other way can fail, so it's a `TryFrom` reporting
// the variant it actually found.
macro_rules! impl_value_conversions {
    ($($t:ty, $v:ident, $name:literal);* $(;)?) => {
        $(
            impl TryFrom<&Value> for $t {
                type Error = ObjectError;

                fn try_from(value: &Value) -> Result<Self, Self::Error> {
                    if let Value::$v(native_val) = value {
                        Ok(native_val.clone())
                    } else {
                        Err(ObjectError::Type {
                            expected: $name.to_string(),
                            actual: type_of(value),
                        })
                    }
                }
            }

            impl From<$t> for Value {
                fn from(val: $t) -> Self {
                    Value::$v(val)
                }
            }
        )*
    };
}

// The mappings.
// The rust type, the Value variant, and the type name used in errors.
impl_value_conversions! {
    String, Str, "string";
    f64, Float, "number";
    isize, Int, "number";
    bool, Bool, "boolean";
    Table, Table, "table";
    Object, Object, "object";
    Function, Function, "function";
    Handle, Handle, "file";
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as isize)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into)
            .unwrap_or(Value::Nil)
    }
}
