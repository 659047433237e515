use std::cell::RefCell;
use std::rc::Rc;

use protochain::deprecate::{
    acyclic_merge, acyclic_merge_skipped, by_release, first_use, get_path, insert_path,
    leaf_paths, DeprecationNotice, Mapping, Notify, TracingNotify, Tree, SUPPORT,
};
use protochain::{
    container, object, object_for, Config, Deprecate, Key, Namespace, ObjectError, Symbol,
    Table, Value,
};

fn leaf(value: i32) -> Tree<i32> {
    Tree::Leaf(value)
}

fn node(pairs: Vec<(&str, Tree<i32>)>) -> Tree<i32> {
    Tree::Node(mapping(pairs))
}

fn mapping(pairs: Vec<(&str, Tree<i32>)>) -> Mapping<i32> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[derive(Default)]
struct Recorder(RefCell<Vec<DeprecationNotice>>);

impl Notify for Recorder {
    fn notify(&self, notice: &DeprecationNotice) {
        self.0
            .borrow_mut()
            .push(notice.clone());
    }
}

fn namespace(deprecate: Deprecate) -> Namespace {
    Namespace::load(&Config {
        argcheck: true,
        deprecate,
    })
}

fn node_instance() -> Value {
    Value::Object(
        object()
            .derive("Node")
            .build()
            .unwrap(),
    )
}

//*** ACYCLIC MERGE ***//
#[test]
fn test_merge_keeps_existing_leaves() {
    let mut dest = mapping(vec![("x", node(vec![("y", leaf(1))]))]);
    let src = mapping(vec![("x", node(vec![("y", leaf(2)), ("z", leaf(3))]))]);

    acyclic_merge(&mut dest, &src);

    assert_eq!(
        dest,
        mapping(vec![("x", node(vec![("y", leaf(1)), ("z", leaf(3))]))])
    );
}

#[test]
fn test_leaf_blocks_subtree() {
    let mut dest = mapping(vec![("x", leaf(1))]);
    let src = mapping(vec![("x", node(vec![("y", leaf(2))])), ("w", leaf(4))]);

    acyclic_merge(&mut dest, &src);

    assert_eq!(dest, mapping(vec![("x", leaf(1)), ("w", leaf(4))]));
}

#[test]
fn test_merge_creates_missing_mappings() {
    let mut dest = Mapping::new();
    let src = mapping(vec![("a", node(vec![("b", node(vec![("c", leaf(1))]))]))]);

    acyclic_merge(&mut dest, &src);

    assert_eq!(dest, src);
}

#[test]
fn test_merge_is_idempotent() {
    let mut dest = mapping(vec![("x", node(vec![("y", leaf(1))]))]);
    let src = mapping(vec![("x", node(vec![("z", leaf(3))])), ("q", leaf(9))]);

    acyclic_merge(&mut dest, &src);
    let once = dest.clone();
    acyclic_merge(&mut dest, &src);

    assert_eq!(dest, once);
}

#[test]
fn test_merge_tables() {
    let dest_table: Table = [("x", Value::Table([("y", 1)].into_iter().collect()))]
        .into_iter()
        .collect();
    let src_table: Table = [(
        "x",
        Value::Table([("y", 2), ("z", 3)].into_iter().collect()),
    )]
    .into_iter()
    .collect();

    let mut dest = Mapping::from(&dest_table);
    acyclic_merge(&mut dest, &Mapping::from(&src_table));
    let merged = Table::from(&dest);

    let Value::Table(x) = merged.get("x") else {
        panic!("x is not a table")
    };
    assert_eq!(x.get("y"), Value::Int(1));
    assert_eq!(x.get("z"), Value::Int(3));
}

//*** PATHS ***//
#[test]
fn test_paths() {
    let mut tree = Mapping::new();
    assert!(insert_path(&mut tree, "std.object.clone", 1));
    assert!(insert_path(&mut tree, "std.type_of", 2));
    assert!(!insert_path(&mut tree, "std.type_of", 3));
    assert!(!insert_path(&mut tree, "std.type_of.nested", 4));

    assert_eq!(get_path(&tree, "std.type_of"), Some(&Tree::Leaf(2)));
    assert!(get_path(&tree, "std.object").is_some_and(Tree::is_node));
    assert!(get_path(&tree, "std.nope").is_none());
    assert_eq!(leaf_paths(&tree), vec!["std.object.clone", "std.type_of"]);
}

#[test]
fn test_support_table_by_release() {
    let releases = by_release(SUPPORT);
    let names: Vec<&str> = releases.keys().copied().collect();
    assert_eq!(names, vec!["40", "41"]);

    let api = &releases["41"];
    assert!(get_path(api, "std.object.type").is_some());
    assert!(get_path(api, "std.prototype").is_some());
}

//*** NAMESPACE ***//
#[test]
fn test_deprecated_symbol_notifies_and_runs() {
    let ns = namespace(Deprecate::Warn);
    let recorder = Rc::new(Recorder::default());

    let result = ns
        .call_with("std.object.type", &[node_instance()], recorder.clone())
        .unwrap();

    assert_eq!(result, Value::from("Node"));
    assert_eq!(
        *recorder.0.borrow(),
        vec![DeprecationNotice {
            release: "41",
            symbol: "std.object.type".to_string(),
            replacement: "std.object.prototype",
        }]
    );
}

#[test]
fn test_notice_text() {
    let notice = DeprecationNotice {
        release: "41",
        symbol: "std.object.type".to_string(),
        replacement: "std.object.prototype",
    };
    assert_eq!(
        notice.to_string(),
        "std.object.type was deprecated in release 41, and will be removed in a future release; use std.object.prototype instead"
    );
}

#[test]
fn test_every_call_notifies() {
    let ns = namespace(Deprecate::Warn);
    let recorder = Rc::new(Recorder::default());
    let deprecated_clone = ns
        .get_with("std.container.clone", recorder.clone())
        .unwrap();
    let Value::Function(deprecated_clone) = deprecated_clone else {
        panic!("std.container.clone is not a function")
    };

    let clone = deprecated_clone
        .call(&[Value::Object(container())])
        .unwrap();
    deprecated_clone
        .call(&[Value::Object(container())])
        .unwrap();

    assert_eq!(clone.expect_object().unwrap().type_name(), "Container");
    assert_eq!(recorder.0.borrow().len(), 2);
}

#[test]
fn test_silent_mode() {
    let ns = namespace(Deprecate::Silent);
    let recorder = Rc::new(Recorder::default());

    let result = ns
        .call_with("std.prototype", &[Value::from(1)], recorder.clone())
        .unwrap();

    assert_eq!(result, Value::from("number"));
    assert!(recorder.0.borrow().is_empty());
}

#[test]
fn test_remove_mode() {
    let ns = namespace(Deprecate::Remove);

    let result = ns.lookup("std.object.type");
    let Err(ObjectError::LookupError(path)) = result else {
        panic!("expected lookup error, got {result:?}")
    };
    assert_eq!(path, "std.object.type");
    assert!(!ns
        .paths()
        .contains(&"std.prototype".to_string()));
    assert!(ns.lookup("std.object.prototype").is_ok());
}

#[test]
fn test_live_symbol_shadows_deprecated() {
    let ns = namespace(Deprecate::Warn);
    assert!(matches!(
        ns.lookup("std.container.mapfields"),
        Ok(Symbol::Builtin(_))
    ));
    assert!(matches!(
        ns.lookup("std.object.type"),
        Ok(Symbol::Deprecated(_))
    ));
}

#[test]
fn test_call_prototype_path() {
    let ns = namespace(Deprecate::Warn);
    let table: Table = [("a", 1)].into_iter().collect();

    let instance = ns
        .call("std.object.Object", &[Value::Table(table)])
        .unwrap();
    let instance = instance.expect_object().unwrap();

    assert_eq!(instance.type_name(), "Object");
    assert_eq!(instance.get(Key::from("a")), Value::Int(1));
}

#[test]
fn test_call_builtin_and_errors() {
    let ns = namespace(Deprecate::Warn);

    assert_eq!(
        ns.call("std.type_of", &[node_instance()])
            .unwrap(),
        Value::from("Node")
    );
    assert!(matches!(
        ns.call("std.object", &[]),
        Err(ObjectError::LookupError(_))
    ));
    assert!(matches!(
        ns.call("std.nothing.here", &[]),
        Err(ObjectError::LookupError(_))
    ));
}

#[test]
fn test_paths_include_deprecated_api() {
    let paths = namespace(Deprecate::Warn).paths();
    for path in ["std.object.type", "std.prototype", "std.container.clone", "std.object.clone"] {
        assert!(paths.contains(&path.to_string()), "{path} missing");
    }
}

#[test]
fn test_tracing_notify_warns_once() {
    let notice = DeprecationNotice {
        release: "40",
        symbol: "test.only.symbol".to_string(),
        replacement: "test.other.symbol",
    };
    TracingNotify.notify(&notice);
    TracingNotify.notify(&notice);

    // already warned about by the first notify
    assert!(!first_use("test.only.symbol"));

    assert!(first_use("test.fresh.symbol"));
    assert!(!first_use("test.fresh.symbol"));
}

#[test]
fn test_merge_reports_skipped_paths() {
    let mut dest = mapping(vec![("x", node(vec![("y", leaf(1))])), ("w", leaf(0))]);
    let src = mapping(vec![
        ("x", node(vec![("y", leaf(2)), ("z", leaf(3))])),
        ("w", node(vec![("v", leaf(4))])),
        ("q", node(vec![("r", leaf(5))])),
    ]);

    let skipped = acyclic_merge_skipped(&mut dest, &src);

    assert_eq!(skipped, vec!["x.y", "w"]);
    assert_eq!(get_path(&dest, "q.r"), Some(&Tree::Leaf(5)));
    assert_eq!(get_path(&dest, "x.z"), Some(&Tree::Leaf(3)));
}

#[test]
fn test_shadowed_support_entry() {
    let retired = SUPPORT
        .iter()
        .find(|d| d.path() == "std.container.mapfields")
        .unwrap();
    assert_eq!(retired.release, "40");

    // the live builtin wins for every mode that installs retired symbols
    for mode in [Deprecate::Warn, Deprecate::Silent] {
        assert!(matches!(
            namespace(mode).lookup("std.container.mapfields"),
            Ok(Symbol::Builtin(_))
        ));
    }
}

#[test]
fn test_prototypes_follow_namespace_config() {
    let unchecked = Namespace::load(&Config {
        argcheck: false,
        deprecate: Deprecate::Warn,
    });
    let obj = unchecked
        .call("std.object.Object", &[])
        .unwrap();
    let obj = obj.expect_object().unwrap();

    // no signature check, so the merge itself rejects the scalar
    assert!(matches!(
        obj.send("mapfields", &[Value::from(5)]),
        Err(ObjectError::InvalidArgument { .. })
    ));
    assert!(!obj.shares_methods(&object_for(&Config::default())));

    let checked = namespace(Deprecate::Warn)
        .call("std.object.Object", &[])
        .unwrap();
    assert!(matches!(
        checked
            .expect_object()
            .unwrap()
            .send("mapfields", &[Value::from(5)]),
        Err(ObjectError::BadArgument { position: 2, .. })
    ));
}
