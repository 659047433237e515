//! Argument validation for builtin functions.
//!
//! Builtins declare their argument types as a signature string; an
//! `ArgCheck` implementation wraps the function so that bad calls fail
//! with `BadArgument`/`TooManyArguments` before the body runs. With
//! checking disabled the wrapper is a passthrough and the function must
//! still behave correctly on its own.
mod signature;

use tracing::warn;

use crate::config::Config;
use crate::value::{Function, ObjectError};
pub use signature::*;

pub trait ArgCheck {
    fn check_args(
        &self,
        module: &str,
        function: &str,
        signature: &str,
        f: Function,
    ) -> Function;
}

/// Hands the function back unchanged
pub struct Passthrough;

impl ArgCheck for Passthrough {
    fn check_args(
        &self,
        _module: &str,
        _function: &str,
        _signature: &str,
        f: Function,
    ) -> Function {
        f
    }
}

/// Validates every call against the declared signature
pub struct Strict;

impl ArgCheck for Strict {
    fn check_args(
        &self,
        module: &str,
        function: &str,
        signature: &str,
        f: Function,
    ) -> Function {
        let module = module.to_string();
        let function = function.to_string();
        let name = f.name().to_string();

        match signature.parse::<Signature>() {
            Ok(signature) => {
                Function::new(&name, move |args| {
                    signature.check(&module, &function, args)?;
                    f.call(args)
                })
            },
            Err(err) => {
                warn!(%module, %function, "{err}");
                let decl = signature.to_string();
                Function::new(&name, move |_| {
                    Err(ObjectError::Signature(decl.clone()))
                })
            },
        }
    }
}

/// The checker selected by configuration
pub fn checker(config: &Config) -> &'static dyn ArgCheck {
    if config.argcheck {
        &Strict
    } else {
        &Passthrough
    }
}
