use tracing::trace;

use super::mapfields::{init_rename_map, merge_fields, MergedFields, RenameMap};
use super::prototype::{Object, TYPE_FIELD};
use crate::typetag::type_of;
use crate::value::{Key, OResult, ObjectError, Table, Value, PRIVATE_MARKER};

/******************\
|* Clone protocol *|
\******************/
impl Object {
    /// Invoke this prototype as a constructor, returning a clone.
    ///
    /// The clone starts as a skeleton holding a copy of this prototype's
    /// public fields and metadata (the capability set is shared, not
    /// copied). Each argument is then merged into it in turn, so later
    /// arguments win on colliding keys. With no arguments the result is an
    /// independently owned copy of the prototype.
    pub fn call(&self, args: &[Value]) -> OResult<Object> {
        let skeleton = self.skeleton();
        let rename = skeleton
            .init_spec()
            .map(|init| init_rename_map(&init))
            .unwrap_or_default();

        for source in skeleton.sources(args)? {
            let merged = skeleton.map_fields(&source, &rename)?;
            skeleton.install(merged)?;
        }

        trace!(type_name = %skeleton.type_name(), "cloned prototype");
        Ok(skeleton)
    }

    fn skeleton(&self) -> Object {
        Object::from_parts(self.meta().clone(), self.public_fields())
    }

    /// Normalise call arguments into merge sources.
    ///
    /// Table-like arguments are merged one by one. Anything else is only
    /// accepted by a prototype with an init spec, in which case the whole
    /// argument list becomes a single positional source.
    fn sources(&self, args: &[Value]) -> OResult<Vec<Value>> {
        let scalar = args
            .iter()
            .find(|arg| !arg.is_table_like() && !arg.is_nil());

        match scalar {
            None => Ok(args.to_vec()),
            Some(_) if self.init_spec().is_some() => {
                let positional: Table = args
                    .iter()
                    .enumerate()
                    .map(|(i, arg)| (i + 1, arg.clone()))
                    .collect();
                Ok(vec![Value::Table(positional)])
            },
            Some(bad) => {
                Err(ObjectError::InvalidArgument {
                    prototype: self.type_name(),
                    actual: type_of(bad),
                })
            },
        }
    }

    /// Run this instance's merge override, or the default merge
    pub fn map_fields(
        &self,
        source: &Value,
        rename: &RenameMap,
    ) -> OResult<MergedFields> {
        // don't hold the metadata borrow while user code runs
        let custom = self.meta().mapfields.clone();
        match custom {
            Some(mapfields) => mapfields(self, source, rename),
            None => merge_fields(self, source, rename),
        }
    }

    /// Store merged fields into this instance.
    ///
    /// Public keys must not carry the private marker and private names
    /// must, so no field lives in both partitions. A merge result that
    /// breaks this (only possible from a custom override) is rejected and
    /// the instance is left unchanged.
    pub(crate) fn install(&self, merged: MergedFields) -> OResult<()> {
        let misplaced = merged
            .public
            .keys()
            .into_iter()
            .find(Key::is_private)
            .map(|key| key.to_string())
            .or_else(|| {
                merged
                    .private
                    .keys()
                    .find(|name| !name.starts_with(PRIVATE_MARKER))
                    .cloned()
            });
        if let Some(field) = misplaced {
            return Err(ObjectError::FieldPartition {
                type_name: self.type_name(),
                field,
            });
        }

        self.fields().assign(&merged.public);

        let mut meta = self.meta_mut();
        if let Some(Value::Str(type_name)) = merged.private.get(TYPE_FIELD) {
            meta.type_name = type_name.clone();
        }
        meta.private = merged.private;
        Ok(())
    }

    /// Iterate over public fields: the integer-keyed sequence part in
    /// ascending order, then named fields in insertion order. Private
    /// fields are never produced.
    ///
    /// The key order is captured when the iterator is created, values are
    /// read as it advances. Changing the instance mid-iteration has no
    /// guaranteed effect on the pairs still to come. Call `pairs` again to
    /// restart.
    pub fn pairs(&self) -> Pairs {
        Pairs {
            fields: self.fields().clone(),
            keys: self.fields().keys().into_iter(),
        }
    }
}

pub struct Pairs {
    fields: Table,
    keys: std::vec::IntoIter<Key>,
}

impl Iterator for Pairs {
    type Item = (Key, Value);

    fn next(&mut self) -> Option<Self::Item> {
        for key in self.keys.by_ref() {
            let value = self.fields.get(key.clone());
            if !value.is_nil() {
                return Some((key, value));
            }
        }
        None
    }
}

impl IntoIterator for &Object {
    type Item = (Key, Value);
    type IntoIter = Pairs;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs()
    }
}
