use indexmap::IndexMap;
use itertools::Itertools;

use super::tree::{insert_path, Mapping};
use super::DeprecationNotice;
use crate::builtins::{Builtin, BuiltinFnBuilder, Symbol};
use crate::object::methods::{
    mapfields, CloneFnBuilder, PrototypeFnBuilder,
};

/// A retired symbol and the implementation still backing it
#[derive(Debug, Clone, Copy)]
pub struct Deprecation {
    pub release: &'static str,
    pub replacement: &'static str,
    pub builtin: Builtin,
}

impl Deprecation {
    pub fn path(&self) -> String {
        self.builtin.path()
    }

    pub fn notice(&self) -> DeprecationNotice {
        DeprecationNotice {
            release: self.release,
            symbol: self.path(),
            replacement: self.replacement,
        }
    }
}

/// Every retired symbol still supported.
///
/// `std.container.mapfields` was retired in release 40 and later restored
/// as a live builtin. Its entry stays so that the live symbol keeps
/// shadowing it; it is never installed.
pub static SUPPORT: &[Deprecation] = &[
    Deprecation {
        release: "40",
        replacement: "std.object.mapfields",
        builtin: Builtin {
            module: "std.container",
            name: "mapfields",
            signature: "(object, ?table|object, ?table)",
            eval: mapfields,
        },
    },
    Deprecation {
        release: "40",
        replacement: "std.container.Container",
        builtin: Builtin {
            module: "std.container",
            name: "clone",
            signature: "(object, ?any...)",
            eval: CloneFnBuilder::eval,
        },
    },
    Deprecation {
        release: "41",
        replacement: "std.object.prototype",
        builtin: Builtin {
            module: "std.object",
            name: "type",
            signature: "(?any)",
            eval: PrototypeFnBuilder::eval,
        },
    },
    Deprecation {
        release: "41",
        replacement: "std.object.prototype",
        builtin: Builtin {
            module: "std",
            name: "prototype",
            signature: "(?any)",
            eval: PrototypeFnBuilder::eval,
        },
    },
];

/// Group retired symbols into one namespace tree per release, oldest
/// release first
pub fn by_release(
    entries: &[Deprecation],
) -> IndexMap<&'static str, Mapping<Symbol>> {
    entries
        .iter()
        .sorted_by_key(|d| (d.release.parse::<u32>().ok(), d.release))
        .fold(IndexMap::new(), |mut releases, deprecation| {
            let api = releases
                .entry(deprecation.release)
                .or_insert_with(Mapping::new);
            insert_path(
                api,
                &deprecation.path(),
                Symbol::Deprecated(*deprecation),
            );
            releases
        })
}
