pub mod argcheck;
pub mod builtins;
pub mod config;
pub mod deprecate;
pub mod object;
pub mod typetag;
pub mod value;

pub use builtins::{Namespace, Symbol, NAMESPACE};
pub use config::{Config, Deprecate, CONFIG};
pub use object::{container, object, object_for, Object, PrototypeBuilder};
pub use typetag::type_of;
pub use value::*;
