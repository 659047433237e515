pub mod errors;
pub mod functions;
pub mod table;
pub mod values;

pub use errors::*;
pub use functions::*;
pub use table::*;
pub use values::*;
