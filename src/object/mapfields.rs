use std::collections::HashMap;
use std::rc::Rc;

use super::prototype::{Object, PrivateFields};
use crate::typetag::type_of;
use crate::value::{Key, OResult, ObjectError, Table, Value};

/// Source key -> destination key, applied before fields are partitioned
pub type RenameMap = HashMap<Key, Key>;

/// A custom merge: receives the new skeleton, the merge source and the
/// rename map, and returns the fields the clone ends up with.
pub type MapFields =
    Rc<dyn Fn(&Object, &Value, &RenameMap) -> OResult<MergedFields>>;

/// Result of merging one source into a skeleton
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedFields {
    pub public: Table,
    pub private: PrivateFields,
}

pub fn rename_map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> RenameMap
where
    K: Into<Key>,
    V: Into<Key>,
{
    pairs
        .into_iter()
        .map(|(old, new)| (old.into(), new.into()))
        .collect()
}

/// Read a rename map out of a table such as `{old="new", [1]="x"}`
pub fn rename_map_from_table(table: &Table) -> OResult<RenameMap> {
    table
        .pairs()
        .into_iter()
        .map(|(old, new)| {
            let new = match new {
                Value::Str(name) => Key::Name(name),
                Value::Int(i) if i > 0 => Key::Index(i as usize),
                other => {
                    return Err(ObjectError::Type {
                        expected: "string or positive integer".to_string(),
                        actual: type_of(&other),
                    })
                },
            };
            Ok((old, new))
        })
        .collect()
}

/// The default field merge.
///
/// Starts from the skeleton's current public and private fields, then
/// copies every pair of `source` over them: positional pairs first, named
/// pairs after, so a named key beats a positional binding to the same
/// field. Keys are renamed through `rename` and then routed by the private
/// marker, each ending up in exactly one of the two outputs.
///
/// A prototype instance as source contributes its public fields only.
/// A scalar source is only meaningful to a prototype with an init spec,
/// where it binds to the first positional field.
pub fn merge_fields(
    skeleton: &Object,
    source: &Value,
    rename: &RenameMap,
) -> OResult<MergedFields> {
    let mut merged = MergedFields {
        public: skeleton.public_fields(),
        private: skeleton.private_fields(),
    };

    let (positional, named): (Vec<_>, Vec<_>) =
        source_pairs(skeleton, source)?
            .into_iter()
            .partition(|(key, _)| matches!(key, Key::Index(_)));

    for (key, value) in positional.into_iter().chain(named) {
        let key = rename
            .get(&key)
            .cloned()
            .unwrap_or(key);
        match key.private_name().map(str::to_string) {
            Some(name) if value.is_nil() => {
                merged.private.shift_remove(&name);
            },
            Some(name) => {
                merged.private.insert(name, value);
            },
            None => merged.public.set(key, value),
        }
    }

    Ok(merged)
}

fn source_pairs(skeleton: &Object, source: &Value) -> OResult<Vec<(Key, Value)>> {
    match source {
        Value::Nil => Ok(Vec::new()),
        Value::Table(table) => Ok(table.pairs()),
        Value::Object(obj) => Ok(obj.pairs().collect()),
        scalar if skeleton.init_spec().is_some() => {
            Ok(vec![(Key::Index(1), scalar.clone())])
        },
        other => {
            Err(ObjectError::InvalidArgument {
                prototype: skeleton.type_name(),
                actual: type_of(other),
            })
        },
    }
}

/// Rename map binding positional keys to the init spec's field names
pub(crate) fn init_rename_map(init: &[String]) -> RenameMap {
    init.iter()
        .enumerate()
        .map(|(i, name)| (Key::Index(i + 1), Key::from(name)))
        .collect()
}
