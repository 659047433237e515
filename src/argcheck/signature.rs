use std::str::FromStr;

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

use crate::typetag::{describe, primitive_kind, type_of};
use crate::value::{OResult, ObjectError, Value};

/************\
|* Patterns *|
\************/
lazy_static! {
    static ref SIGNATURE_RE: Regex = Regex::new(r"^\s*\((.*)\)\s*$").unwrap();
    static ref PARAM_RE: Regex = Regex::new(
        r"^(\?)?([A-Za-z_][A-Za-z0-9_]*(?:\|[A-Za-z_][A-Za-z0-9_]*)*)(\.\.\.)?$"
    )
    .unwrap();
}

/// One declared parameter, e.g. `?table|object`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub types: Vec<String>,
    pub optional: bool,
}

impl Param {
    pub fn accepts(&self, arg: Option<&Value>) -> bool {
        match arg {
            None | Some(Value::Nil) => {
                self.optional || self.types.iter().any(|t| t == "nil")
            },
            Some(value) => {
                self.types
                    .iter()
                    .any(|t| type_matches(t, value))
            },
        }
    }

    /// e.g. "table or object or nil"
    pub fn expected(&self) -> String {
        self.types
            .iter()
            .map(String::as_str)
            .chain(self.optional.then_some("nil"))
            .join(" or ")
    }
}

fn type_matches(declared: &str, value: &Value) -> bool {
    match declared {
        "any" => true,
        // instances are tables too
        "table" => value.is_table_like(),
        "object" => matches!(value, Value::Object(_)),
        "int" => matches!(value, Value::Int(_)),
        other => other == primitive_kind(value) || other == type_of(value),
    }
}

/// A declared argument list: `(object, ?table|object, ?table)`.
/// A trailing `...` on the last parameter lets it repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Param>,
    pub variadic: bool,
}

impl Signature {
    /// Check `args` against the declaration, reporting the first offending
    /// argument the way the host library reports bad calls
    pub fn check(
        &self,
        module: &str,
        function: &str,
        args: &[Value],
    ) -> OResult<()> {
        if !self.variadic && args.len() > self.params.len() {
            return Err(ObjectError::TooManyArguments {
                module: module.to_string(),
                function: function.to_string(),
                max: self.params.len(),
                actual: args.len(),
            });
        }

        let count = self.params.len().max(args.len());
        for position in 0..count {
            // beyond the declared list only when variadic
            let Some(param) = self
                .params
                .get(position)
                .or_else(|| self.params.last())
            else {
                break;
            };

            let arg = args.get(position);
            if !param.accepts(arg) {
                return Err(ObjectError::BadArgument {
                    module: module.to_string(),
                    function: function.to_string(),
                    position: position + 1,
                    expected: param.expected(),
                    actual: describe(arg),
                });
            }
        }
        Ok(())
    }
}

impl FromStr for Signature {
    type Err = ObjectError;

    fn from_str(decl: &str) -> Result<Self, Self::Err> {
        let malformed = || ObjectError::Signature(decl.to_string());

        let inner = SIGNATURE_RE
            .captures(decl)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .ok_or_else(malformed)?;
        if inner.is_empty() {
            return Ok(Signature {
                params: Vec::new(),
                variadic: false,
            });
        }

        let raw: Vec<&str> = inner.split(',').map(str::trim).collect();
        let mut params = Vec::with_capacity(raw.len());
        let mut variadic = false;
        for (i, text) in raw.iter().enumerate() {
            let caps = PARAM_RE
                .captures(text)
                .ok_or_else(malformed)?;
            let repeats = caps.get(3).is_some();
            if repeats && i + 1 != raw.len() {
                return Err(malformed());
            }
            variadic = repeats;
            params.push(Param {
                types: caps[2]
                    .split('|')
                    .map(str::to_string)
                    .collect(),
                optional: caps.get(1).is_some(),
            });
        }

        Ok(Signature { params, variadic })
    }
}
