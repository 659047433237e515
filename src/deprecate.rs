//! Re-exposing retired API symbols inside the live namespace.
//!
//! The support table lists, per release, the symbols retired in it and
//! the implementation that still backs them. At load time each release's
//! symbols are folded into the live namespace with `acyclic_merge`, so a
//! live symbol always wins over a retired one of the same name. Calling a
//! retired symbol reports a `DeprecationNotice` and then runs normally.
pub mod support;
pub mod tree;

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

use lazy_static::lazy_static;
use tracing::warn;

pub use support::*;
pub use tree::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationNotice {
    /// release the symbol was retired in
    pub release: &'static str,
    pub symbol: String,
    pub replacement: &'static str,
}

impl Display for DeprecationNotice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} was deprecated in release {}, and will be removed in a future release; use {} instead",
            self.symbol, self.release, self.replacement
        )
    }
}

/// Receives notices as retired symbols are called
pub trait Notify {
    fn notify(&self, notice: &DeprecationNotice);
}

/// Default notifier: a `tracing` warning, once per symbol per process
pub struct TracingNotify;

lazy_static! {
    static ref WARNED: Mutex<HashSet<String>> = Mutex::new(HashSet::new());
}

/// True the first time `symbol` is seen in this process, false after
pub fn first_use(symbol: &str) -> bool {
    WARNED
        .lock()
        .map(|mut warned| warned.insert(symbol.to_string()))
        .unwrap_or(true)
}

impl Notify for TracingNotify {
    fn notify(&self, notice: &DeprecationNotice) {
        if first_use(&notice.symbol) {
            warn!(
                release = notice.release,
                symbol = %notice.symbol,
                replacement = notice.replacement,
                "{notice}"
            );
        }
    }
}
