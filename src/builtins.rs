mod functions;

use std::rc::Rc;

use lazy_static::lazy_static;
use tracing::{debug, trace};

use crate::argcheck;
use crate::config::{Config, Deprecate, CONFIG};
use crate::deprecate::{
    acyclic_merge_skipped, by_release, get_path, insert_path, leaf_paths,
    Deprecation, Mapping, Notify, TracingNotify, Tree, SUPPORT,
};
use crate::object::methods::{
    CloneFnBuilder, MapfieldsFnBuilder, PrototypeFnBuilder, TostringFnBuilder,
};
use crate::object::{container, object_for, Object};
use crate::value::{Function, OResult, ObjectError, Value};
pub use functions::Builtin;
pub(crate) use functions::BuiltinFnBuilder;

/// What a namespace path is bound to
#[derive(Debug, Clone, Copy)]
pub enum Symbol {
    Builtin(Builtin),
    /// one of the root prototypes, as configured
    Prototype(fn(&Config) -> Object),
    Deprecated(Deprecation),
}

impl Symbol {
    /// Materialise as a value. Retired symbols report to `notify` (if any)
    /// each time they are called.
    pub fn value(&self, config: &Config, notify: Option<Rc<dyn Notify>>) -> Value {
        let checker = argcheck::checker(config);
        match self {
            Symbol::Builtin(builtin) => builtin.function(checker).into(),
            Symbol::Prototype(root) => root(config).into(),
            Symbol::Deprecated(deprecation) => {
                let notice = deprecation.notice();
                let inner = deprecation.builtin.function(checker);
                Function::new(&deprecation.path(), move |args| {
                    if let Some(notify) = &notify {
                        notify.notify(&notice);
                    }
                    inner.call(args)
                })
                .into()
            },
        }
    }
}

/******************\
|* Live namespace *|
\******************/
/// The library's namespace tree with retired symbols folded in.
/// Built once, read-only afterwards.
#[derive(Debug)]
pub struct Namespace {
    root: Mapping<Symbol>,
    config: Config,
}

impl Namespace {
    pub fn load(config: &Config) -> Self {
        let mut root = builtins();

        if config.deprecate == Deprecate::Remove {
            debug!("deprecated api not installed");
        } else {
            for (release, api) in by_release(SUPPORT) {
                for path in acyclic_merge_skipped(&mut root, &api) {
                    trace!(%path, release, "live symbol shadows deprecated one");
                }
                debug!(release, "merged deprecated api");
            }
        }

        Namespace {
            root,
            config: config.clone(),
        }
    }

    pub fn lookup(&self, path: &str) -> OResult<&Symbol> {
        get_path(&self.root, path)
            .and_then(Tree::leaf)
            .ok_or_else(|| ObjectError::LookupError(path.to_string()))
    }

    /// The value bound to `path`; retired symbols warn through `tracing`
    pub fn get(&self, path: &str) -> OResult<Value> {
        self.get_with(path, Rc::new(TracingNotify))
    }

    pub fn get_with(&self, path: &str, notify: Rc<dyn Notify>) -> OResult<Value> {
        let notify = match self.config.deprecate {
            Deprecate::Warn => Some(notify),
            Deprecate::Silent | Deprecate::Remove => None,
        };
        Ok(self.lookup(path)?.value(&self.config, notify))
    }

    /// Call the function at `path`, or clone the prototype there
    pub fn call(&self, path: &str, args: &[Value]) -> OResult<Value> {
        self.call_with(path, args, Rc::new(TracingNotify))
    }

    pub fn call_with(
        &self,
        path: &str,
        args: &[Value],
        notify: Rc<dyn Notify>,
    ) -> OResult<Value> {
        match self.get_with(path, notify)? {
            Value::Function(f) => f.call(args),
            Value::Object(prototype) => Ok(prototype.call(args)?.into()),
            _ => Err(ObjectError::NotCallable(path.to_string())),
        }
    }

    /// Every bound path
    pub fn paths(&self) -> Vec<String> {
        leaf_paths(&self.root)
    }
}

/// The live symbols, before any deprecated ones are merged in
fn builtins() -> Mapping<Symbol> {
    let mut namespace = Mapping::new();

    // prototypes
    bind_prototype(&mut namespace, "std.container.Container", |_| container());
    bind_prototype(&mut namespace, "std.object.Object", object_for);

    // functions
    functions::TypeOfFnBuilder::register(&mut namespace);
    functions::ContainerMapfieldsFnBuilder::register(&mut namespace);
    CloneFnBuilder::register(&mut namespace);
    PrototypeFnBuilder::register(&mut namespace);
    MapfieldsFnBuilder::register(&mut namespace);
    TostringFnBuilder::register(&mut namespace);

    namespace
}

fn bind_prototype(
    namespace: &mut Mapping<Symbol>,
    path: &str,
    root: fn(&Config) -> Object,
) {
    insert_path(namespace, path, Symbol::Prototype(root));
}

lazy_static! {
    /// Process-wide namespace, assembled on first access from `CONFIG`
    pub static ref NAMESPACE: Namespace = Namespace::load(&CONFIG);
}
