//! Resolve the declared type name of any value.
//!
//! Resolution order: explicit type metadata carried by a prototype
//! instance, then the native kind of a system handle, then the primitive
//! kind of the value itself. Never fails.
use crate::value::Value;

/// Description used for arguments that were not supplied at all
pub const NO_VALUE: &str = "no value";

pub fn type_of(value: &Value) -> String {
    match value {
        Value::Object(obj) => obj.type_name(),
        Value::Handle(handle) => handle.kind().to_string(),
        other => primitive_kind(other).to_string(),
    }
}

/// The host-level kind, ignoring any prototype metadata.
/// Instances are tables underneath.
pub fn primitive_kind(value: &Value) -> &'static str {
    match value {
        Value::Nil => "nil",
        Value::Bool(_) => "boolean",
        Value::Int(_) | Value::Float(_) => "number",
        Value::Str(_) => "string",
        Value::Table(_) | Value::Object(_) => "table",
        Value::Function(_) => "function",
        Value::Handle(_) => "userdata",
    }
}

/// Like `type_of`, but distinguishes a missing argument from an explicit nil
pub fn describe(arg: Option<&Value>) -> String {
    arg.map(type_of)
        .unwrap_or_else(|| NO_VALUE.to_string())
}
