use indexmap::IndexMap;

use crate::value::{Table, Value};

/// A nested namespace: either a leaf symbol or a mapping of child names.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree<T> {
    Leaf(T),
    Node(Mapping<T>),
}

pub type Mapping<T> = IndexMap<String, Tree<T>>;

impl<T> Tree<T> {
    pub fn node() -> Self {
        Tree::Node(Mapping::new())
    }

    pub fn leaf(&self) -> Option<&T> {
        match self {
            Tree::Leaf(leaf) => Some(leaf),
            Tree::Node(_) => None,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Tree::Node(_))
    }
}

/// Fold `src` into `dest`, never replacing anything already in `dest`.
///
/// - a mapping in `src` is merged into the mapping at the same key in
///   `dest` (created empty when absent); if `dest` holds a leaf there, that
///   whole subtree of `src` is skipped.
/// - a leaf in `src` is installed only where `dest` has nothing.
///
/// `src` must be a finite tree that shares no nodes with `dest`. Nothing
/// here detects cycles.
pub fn acyclic_merge<'a, T: Clone>(
    dest: &'a mut Mapping<T>,
    src: &Mapping<T>,
) -> &'a mut Mapping<T> {
    merge_into(dest, src, "", &mut Vec::new());
    dest
}

/// `acyclic_merge`, returning the dotted paths of `src` entries that were
/// kept out because `dest` already held something there
pub fn acyclic_merge_skipped<T: Clone>(
    dest: &mut Mapping<T>,
    src: &Mapping<T>,
) -> Vec<String> {
    let mut skipped = Vec::new();
    merge_into(dest, src, "", &mut skipped);
    skipped
}

fn merge_into<T: Clone>(
    dest: &mut Mapping<T>,
    src: &Mapping<T>,
    prefix: &str,
    skipped: &mut Vec<String>,
) {
    for (key, value) in src {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match (dest.get_mut(key), value) {
            (Some(Tree::Node(dest_children)), Tree::Node(children)) => {
                merge_into(dest_children, children, &path, skipped);
            },
            (Some(_), _) => skipped.push(path),
            (None, Tree::Node(children)) => {
                let mut fresh = Mapping::new();
                merge_into(&mut fresh, children, &path, skipped);
                dest.insert(key.clone(), Tree::Node(fresh));
            },
            (None, Tree::Leaf(_)) => {
                dest.insert(key.clone(), value.clone());
            },
        }
    }
}

/// Insert `value` at a dotted `path`, creating intermediate mappings.
/// Returns false (and changes nothing) when the path is already taken or
/// runs through a leaf.
pub fn insert_path<T>(mapping: &mut Mapping<T>, path: &str, value: T) -> bool {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return false;
    };

    let mut current = mapping;
    for segment in segments {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(Tree::node);
        match slot {
            Tree::Node(children) => current = children,
            Tree::Leaf(_) => return false,
        }
    }

    if current.contains_key(last) {
        return false;
    }
    current.insert(last.to_string(), Tree::Leaf(value));
    true
}

/// Look up a dotted `path`
pub fn get_path<'a, T>(mapping: &'a Mapping<T>, path: &str) -> Option<&'a Tree<T>> {
    let mut segments = path.split('.');
    let first = mapping.get(segments.next()?)?;
    segments.try_fold(first, |tree, segment| {
        match tree {
            Tree::Node(children) => children.get(segment),
            Tree::Leaf(_) => None,
        }
    })
}

/// Dotted paths of every leaf, depth first
pub fn leaf_paths<T>(mapping: &Mapping<T>) -> Vec<String> {
    mapping
        .iter()
        .flat_map(|(key, tree)| {
            match tree {
                Tree::Leaf(_) => vec![key.clone()],
                Tree::Node(children) => {
                    leaf_paths(children)
                        .into_iter()
                        .map(|path| format!("{key}.{path}"))
                        .collect()
                },
            }
        })
        .collect()
}

/**************************\
|* Tables <-> value trees *|
\**************************/
/// Normalise a table: nested plain tables become mappings, everything
/// else (instances included) is a leaf. Integer keys become their
/// decimal names. The table must not contain itself.
impl From<&Table> for Mapping<Value> {
    fn from(table: &Table) -> Self {
        table
            .pairs()
            .into_iter()
            .map(|(key, value)| {
                let tree = match value {
                    Value::Table(nested) => Tree::Node(Mapping::from(&nested)),
                    leaf => Tree::Leaf(leaf),
                };
                (key.to_string(), tree)
            })
            .collect()
    }
}

impl From<&Mapping<Value>> for Table {
    fn from(mapping: &Mapping<Value>) -> Self {
        mapping
            .iter()
            .map(|(key, tree)| {
                let value = match tree {
                    Tree::Leaf(value) => value.clone(),
                    Tree::Node(children) => Value::Table(Table::from(children)),
                };
                (key.as_str(), value)
            })
            .collect()
    }
}
