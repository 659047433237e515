use std::env;

use lazy_static::lazy_static;
use tracing::warn;

pub const ARGCHECK_VAR: &str = "PROTOCHAIN_ARGCHECK";
pub const DEPRECATE_VAR: &str = "PROTOCHAIN_DEPRECATE";

/// What to do with symbols from the deprecated-API support table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deprecate {
    /// install them, warn on first use
    #[default]
    Warn,
    /// install them quietly
    Silent,
    /// don't install them at all
    Remove,
}

/// Debug/strict toggles, read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub argcheck: bool,
    pub deprecate: Deprecate,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            argcheck: true,
            deprecate: Deprecate::Warn,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config::from_vars(|name| env::var(name).ok())
    }

    /// Build from any variable source. Unrecognised values are logged and
    /// replaced with the default.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();

        let argcheck = match lookup(ARGCHECK_VAR) {
            None => defaults.argcheck,
            Some(raw) => {
                parse_flag(&raw).unwrap_or_else(|| {
                    warn!(var = ARGCHECK_VAR, value = %raw, "ignoring unrecognised value");
                    defaults.argcheck
                })
            },
        };

        let deprecate = match lookup(DEPRECATE_VAR) {
            None => defaults.deprecate,
            Some(raw) => {
                parse_deprecate(&raw).unwrap_or_else(|| {
                    warn!(var = DEPRECATE_VAR, value = %raw, "ignoring unrecognised value");
                    defaults.deprecate
                })
            },
        };

        Config {
            argcheck,
            deprecate,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn parse_deprecate(raw: &str) -> Option<Deprecate> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "warn" => Some(Deprecate::Warn),
        "silent" | "quiet" => Some(Deprecate::Silent),
        "remove" | "none" => Some(Deprecate::Remove),
        _ => None,
    }
}

lazy_static! {
    pub static ref CONFIG: Config = Config::from_env();
}
