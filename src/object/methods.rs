use super::mapfields::{merge_fields, rename_map_from_table, RenameMap};
use super::prototype::Methods;
use crate::argcheck::ArgCheck;
use crate::builtins::BuiltinFnBuilder;
use crate::typetag::type_of;
use crate::value::{OResult, Value};

/// The capability set every `Object` clone shares
pub(super) fn capabilities(checker: &dyn ArgCheck) -> Methods {
    [
        CloneFnBuilder::builtins(),
        PrototypeFnBuilder::builtins(),
        MapfieldsFnBuilder::builtins(),
        TostringFnBuilder::builtins(),
    ]
    .into_iter()
    .flatten()
    .map(|builtin| (builtin.name.to_string(), builtin.function(checker)))
    .collect()
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index)
        .cloned()
        .unwrap_or_default()
}

/*********\
|* Clone *|
\*********/
/// `obj:clone(...)` is the same as calling `obj(...)`
pub(crate) struct CloneFnBuilder;
impl BuiltinFnBuilder for CloneFnBuilder {
    fn module() -> &'static str {
        "std.object"
    }

    fn names() -> Vec<&'static str> {
        vec!["clone"]
    }

    fn signature() -> &'static str {
        "(object, ?any...)"
    }

    fn eval(args: &[Value]) -> OResult<Value> {
        let prototype = arg(args, 0);
        let tail = args.get(1..).unwrap_or_default();
        Ok(prototype
            .expect_object()?
            .call(tail)?
            .into())
    }
}

/*************\
|* Prototype *|
\*************/
pub(crate) struct PrototypeFnBuilder;
impl BuiltinFnBuilder for PrototypeFnBuilder {
    fn module() -> &'static str {
        "std.object"
    }

    fn names() -> Vec<&'static str> {
        vec!["prototype"]
    }

    fn signature() -> &'static str {
        "(?any)"
    }

    fn eval(args: &[Value]) -> OResult<Value> {
        Ok(Value::Str(type_of(&arg(args, 0))))
    }
}

/*************\
|* Mapfields *|
\*************/
/// Merge `src` into `obj` with the default merge and an optional rename
/// table, returning `obj`
pub(crate) struct MapfieldsFnBuilder;
impl BuiltinFnBuilder for MapfieldsFnBuilder {
    fn module() -> &'static str {
        "std.object"
    }

    fn names() -> Vec<&'static str> {
        vec!["mapfields"]
    }

    fn signature() -> &'static str {
        "(object, ?table|object, ?table)"
    }

    fn eval(args: &[Value]) -> OResult<Value> {
        mapfields(args)
    }
}

pub(crate) fn mapfields(args: &[Value]) -> OResult<Value> {
    let target = arg(args, 0);
    let obj = target.expect_object()?;
    let rename = match arg(args, 2) {
        Value::Nil => RenameMap::new(),
        map => rename_map_from_table(map.expect_table()?)?,
    };

    let merged = merge_fields(obj, &arg(args, 1), &rename)?;
    obj.install(merged)?;
    Ok(target.clone())
}

/************\
|* Tostring *|
\************/
pub(crate) struct TostringFnBuilder;
impl BuiltinFnBuilder for TostringFnBuilder {
    fn module() -> &'static str {
        "std.object"
    }

    fn names() -> Vec<&'static str> {
        vec!["tostring"]
    }

    fn signature() -> &'static str {
        "(any)"
    }

    fn eval(args: &[Value]) -> OResult<Value> {
        Ok(Value::Str(arg(args, 0).to_string()))
    }
}
