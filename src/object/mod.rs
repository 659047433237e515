//! The Container/Object prototype chain.
//!
//! A prototype is an ordinary instance: calling it clones it. `container()`
//! is the root of every chain; `object()` derives from it and adds the
//! shared `clone`/`prototype`/`mapfields`/`tostring` methods.
pub mod container;
pub mod mapfields;
pub(crate) mod methods;
pub mod prototype;

pub use container::*;
pub use mapfields::*;
pub use prototype::*;
