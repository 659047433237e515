use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use indexmap::IndexMap;
use itertools::Itertools;

use super::Value;

/// Keys starting with this marker are routed to private storage
/// whenever fields are merged into a prototype instance.
pub const PRIVATE_MARKER: char = '_';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl Key {
    /// The field name, if this is a private key
    pub fn private_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) if name.starts_with(PRIVATE_MARKER) => Some(name),
            _ => None,
        }
    }

    pub fn is_private(&self) -> bool {
        self.private_name().is_some()
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Index(i) => i.fmt(f),
            Key::Name(name) => name.fmt(f),
        }
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Name(name.clone())
    }
}

/// The actual table data
#[derive(Debug, Clone, Default, PartialEq)]
struct TableData {
    indexed: BTreeMap<usize, Value>,
    named: IndexMap<String, Value>,
}

/// A mutable associative table, shared by reference.
///
/// Integer keys live in an ordered map so that the sequence part is
/// always enumerated first and in ascending order; named keys keep their
/// insertion order. Cloning a `Table` clones the handle, not the data -
/// use `shallow_copy` for independent storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table(Rc<RefCell<TableData>>);

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence `{v1, v2, ...}`
    pub fn sequence<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        let table = Table::new();
        items
            .into_iter()
            .for_each(|v| table.push(v));
        table
    }

    pub fn get(&self, key: impl Into<Key>) -> Value {
        let data = self.0.borrow();
        let found = match key.into() {
            Key::Index(i) => data.indexed.get(&i),
            Key::Name(name) => data.named.get(&name),
        };
        found.cloned().unwrap_or(Value::Nil)
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        !self.get(key).is_nil()
    }

    /// Store a value; storing `Nil` removes the key.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) {
        let value = value.into();
        let mut data = self.0.borrow_mut();
        match (key.into(), value) {
            (Key::Index(i), Value::Nil) => {
                data.indexed.remove(&i);
            },
            (Key::Name(name), Value::Nil) => {
                data.named.shift_remove(&name);
            },
            (Key::Index(i), value) => {
                data.indexed.insert(i, value);
            },
            (Key::Name(name), value) => {
                data.named.insert(name, value);
            },
        }
    }

    /// Append to the sequence part
    pub fn push(&self, value: impl Into<Value>) {
        let next = self.len() + 1;
        self.set(next, value)
    }

    /// Length of the sequence part: the number of consecutive
    /// integer keys starting from 1.
    pub fn len(&self) -> usize {
        let data = self.0.borrow();
        (1..)
            .take_while(|i| data.indexed.contains_key(i))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        let data = self.0.borrow();
        data.indexed.is_empty() && data.named.is_empty()
    }

    /// Every key, integer keys first (ascending), then named keys in
    /// insertion order.
    pub fn keys(&self) -> Vec<Key> {
        let data = self.0.borrow();
        data.indexed
            .keys()
            .map(|i| Key::Index(*i))
            .chain(data.named.keys().map(Key::from))
            .collect()
    }

    /// Snapshot of all key/value pairs, in `keys` order.
    pub fn pairs(&self) -> Vec<(Key, Value)> {
        let data = self.0.borrow();
        data.indexed
            .iter()
            .map(|(i, v)| (Key::Index(*i), v.clone()))
            .chain(
                data.named
                    .iter()
                    .map(|(k, v)| (Key::from(k), v.clone())),
            )
            .collect()
    }

    /// New, independently owned table holding the same entries.
    /// Nested tables are shared, not copied.
    pub fn shallow_copy(&self) -> Self {
        Table(Rc::new(RefCell::new(self.0.borrow().clone())))
    }

    /// Replace this table's entries with a copy of `other`'s
    pub(crate) fn assign(&self, other: &Table) {
        if self.ptr_eq(other) {
            return;
        }
        let data = other.0.borrow().clone();
        *self.0.borrow_mut() = data;
    }

    pub fn ptr_eq(&self, other: &Table) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Table {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let table = Table::new();
        iter.into_iter()
            .for_each(|(k, v)| table.set(k, v));
        table
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", render_pairs(&self.pairs()))
    }
}

/// Render fields the way tables print: the sequence part as bare values,
/// everything else as `key=value`.
pub(crate) fn render_pairs(pairs: &[(Key, Value)]) -> String {
    let mut expected = 1;
    pairs
        .iter()
        .map(|(key, value)| {
            match key {
                Key::Index(i) if *i == expected => {
                    expected += 1;
                    value.to_string()
                },
                _ => format!("{key}={value}"),
            }
        })
        .join(", ")
}
