use protochain::object::{merge_fields, rename_map, RenameMap};
use protochain::{container, object, type_of, Key, Object, ObjectError, Table, Value};

fn table<K: Into<Key>, V: Into<Value>>(pairs: Vec<(K, V)>) -> Value {
    Value::Table(pairs.into_iter().collect())
}

fn fields(obj: &Object) -> Vec<(Key, Value)> {
    obj.pairs().collect()
}

fn expected(pairs: Vec<(&str, isize)>) -> Vec<(Key, Value)> {
    pairs
        .into_iter()
        .map(|(k, v)| (Key::from(k), Value::Int(v)))
        .collect()
}

fn node() -> Object {
    object()
        .derive("Node")
        .build()
        .unwrap()
}

//*** CLONING ***//
#[test]
fn test_clone_with_overrides() {
    let first = node()
        .call(&[table(vec![("a", 1)])])
        .unwrap();
    let second = first
        .call(&[table(vec![("a", 2), ("b", 3)])])
        .unwrap();

    assert_eq!(fields(&second), expected(vec![("a", 2), ("b", 3)]));
    assert_eq!(type_of(&Value::Object(second)), "Node");
}

#[test]
fn test_clone_is_independent() {
    let parent = node()
        .call(&[table(vec![("a", 1)])])
        .unwrap();
    let child = parent.call(&[]).unwrap();

    child.set("a", 10).unwrap();

    assert_eq!(parent.get("a"), Value::Int(1));
    assert_eq!(child.get("a"), Value::Int(10));
}

#[test]
fn test_no_argument_clone_is_a_copy() {
    let list = Table::sequence([1, 2, 3]);
    let parent = node()
        .call(&[table(vec![
            ("list", Value::Table(list.clone())),
            ("_secret", Value::from("shh")),
        ])])
        .unwrap();

    let copy = parent.call(&[]).unwrap();

    assert_eq!(copy, parent);
    assert!(!copy.ptr_eq(&parent));
    assert_eq!(copy.private("_secret"), Value::from("shh"));

    // nested values are shared, not copied
    let Value::Table(copied_list) = copy.get("list") else {
        panic!("list field went missing")
    };
    assert!(copied_list.ptr_eq(&list));
}

#[test]
fn test_later_arguments_win() {
    let a = table(vec![("x", 1), ("y", 1)]);
    let b = table(vec![("y", 2), ("z", 2)]);

    let at_once = node()
        .call(&[a.clone(), b.clone()])
        .unwrap();
    let one_by_one = node()
        .call(&[a])
        .unwrap()
        .call(&[b])
        .unwrap();

    assert_eq!(at_once, one_by_one);
    assert_eq!(
        fields(&at_once),
        expected(vec![("x", 1), ("y", 2), ("z", 2)])
    );
}

#[test]
fn test_nil_argument_is_empty() {
    let proto = node()
        .call(&[table(vec![("a", 1)])])
        .unwrap();
    let clone = proto.call(&[Value::Nil]).unwrap();
    assert_eq!(clone, proto);
}

#[test]
fn test_builder_defaults() {
    let point = object()
        .derive("Point")
        .field("x", 0)
        .field("y", 0)
        .field("_dimensions", 2)
        .build()
        .unwrap();

    assert_eq!(fields(&point), expected(vec![("x", 0), ("y", 0)]));
    assert_eq!(point.private("_dimensions"), Value::Int(2));
}

//*** MERGING ***//
#[test]
fn test_rename_map() {
    let merged = merge_fields(
        &container(),
        &table(vec![("old", 5)]),
        &rename_map([("old", "new")]),
    )
    .unwrap();

    assert_eq!(merged.public.get("new"), Value::Int(5));
    assert!(!merged.public.contains_key("old"));
}

#[test]
fn test_unmapped_keys_pass_through() {
    let merged = merge_fields(
        &container(),
        &table(vec![("old", 5), ("kept", 6)]),
        &rename_map([("old", "new")]),
    )
    .unwrap();

    assert_eq!(merged.public.get("kept"), Value::Int(6));
}

#[test]
fn test_rename_into_private() {
    let merged = merge_fields(
        &container(),
        &table(vec![("cache", 1)]),
        &rename_map([("cache", "_cache")]),
    )
    .unwrap();

    assert!(merged.public.is_empty());
    assert_eq!(merged.private.get("_cache"), Some(&Value::Int(1)));
}

#[test]
fn test_private_fields_are_partitioned() {
    let obj = node()
        .call(&[table(vec![("a", 1), ("_secret", 2)])])
        .unwrap();

    assert_eq!(fields(&obj), expected(vec![("a", 1)]));
    assert_eq!(obj.get("_secret"), Value::Nil);
    assert_eq!(obj.private("_secret"), Value::Int(2));

    // clones inherit private fields
    let clone = obj.call(&[]).unwrap();
    assert_eq!(clone.private("_secret"), Value::Int(2));
}

#[test]
fn test_instance_source_only_gives_public_fields() {
    let source = node()
        .call(&[table(vec![("a", 1), ("_hidden", 2)])])
        .unwrap();
    let dest = container()
        .call(&[Value::Object(source)])
        .unwrap();

    assert_eq!(fields(&dest), expected(vec![("a", 1)]));
    assert_eq!(dest.private("_hidden"), Value::Nil);
}

#[test]
fn test_private_type_retags() {
    let point = container()
        .call(&[table(vec![("_type", "Point")])])
        .unwrap();
    assert_eq!(point.type_name(), "Point");
    assert!(fields(&point).is_empty());
}

#[test]
fn test_invalid_argument() {
    let result = node().call(&[Value::from(3)]);
    let Err(ObjectError::InvalidArgument { prototype, actual }) = result else {
        panic!("expected an invalid argument error, got {result:?}")
    };
    assert_eq!(prototype, "Node");
    assert_eq!(actual, "number");

    let result = merge_fields(&node(), &Value::from("x"), &RenameMap::new());
    assert!(matches!(
        result,
        Err(ObjectError::InvalidArgument { .. })
    ));
}

//*** POSITIONAL INIT ***//
fn point() -> Object {
    object()
        .derive("Point")
        .init(["x", "y"])
        .build()
        .unwrap()
}

#[test]
fn test_positional_arguments() {
    let p = point()
        .call(&[Value::from(1), Value::from(2)])
        .unwrap();
    assert_eq!(fields(&p), expected(vec![("x", 1), ("y", 2)]));
}

#[test]
fn test_named_beats_positional() {
    let args = table(vec![
        (Key::from(1usize), Value::from(1)),
        (Key::from(2usize), Value::from(2)),
        (Key::from("x"), Value::from(10)),
    ]);
    let p = point().call(&[args]).unwrap();

    assert_eq!(p.get("x"), Value::Int(10));
    assert_eq!(p.get("y"), Value::Int(2));
    assert_eq!(p.get(1usize), Value::Nil);
}

#[test]
fn test_scalar_source_binds_first_init_field() {
    let merged = merge_fields(
        &point(),
        &Value::from(7),
        &rename_map([(1usize, "x")]),
    )
    .unwrap();
    assert_eq!(merged.public.get("x"), Value::Int(7));
}

#[test]
fn test_extra_positionals_pass_through() {
    let p = point()
        .call(&[Value::from(1), Value::from(2), Value::from(3)])
        .unwrap();
    assert_eq!(p.get(3usize), Value::Int(3));
}

#[test]
fn test_init_spec_is_inherited() {
    let p3 = point()
        .derive("Point3")
        .build()
        .unwrap();
    let p = p3
        .call(&[Value::from(4), Value::from(5)])
        .unwrap();
    assert_eq!(p.get("y"), Value::Int(5));
    assert_eq!(p.type_name(), "Point3");
}

//*** ITERATION ***//
#[test]
fn test_iteration_order() {
    let source = Table::new();
    source.set("c", 3);
    source.set(2usize, "two");
    source.set("a", 1);
    source.set(1usize, "one");

    let obj = container()
        .call(&[Value::Table(source)])
        .unwrap();
    let keys: Vec<Key> = obj
        .pairs()
        .map(|(k, _)| k)
        .collect();

    assert_eq!(
        keys,
        vec![Key::from(1usize), Key::from(2usize), Key::from("c"), Key::from("a")]
    );

    // restartable
    assert_eq!(obj.pairs().count(), 4);
    assert_eq!((&obj).into_iter().count(), 4);
}

//*** MUTATION ***//
#[test]
fn test_field_set_is_fixed() {
    let obj = node()
        .call(&[table(vec![("a", 1)])])
        .unwrap();

    assert!(obj.set("a", 2).is_ok());
    assert!(matches!(
        obj.set("b", 2),
        Err(ObjectError::FieldSet { .. })
    ));
    assert!(matches!(
        obj.set("a", Value::Nil),
        Err(ObjectError::FieldSet { .. })
    ));
    assert_eq!(obj.get("a"), Value::Int(2));
}
