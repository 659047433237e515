use std::cell::{Ref, RefCell, RefMut};
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

use indexmap::IndexMap;

use super::mapfields::{merge_fields, MapFields, MergedFields, RenameMap};
use super::methods;
use crate::argcheck::{Passthrough, Strict};
use crate::config::{Config, CONFIG};
use crate::value::{
    render_pairs, Function, Key, NativeFn, OResult, ObjectError, Table, Value,
};

/// Fields stored beside the capability set instead of in the public table
pub type PrivateFields = IndexMap<String, Value>;

/// Capability set: behaviour shared by every clone of a prototype
pub type Methods = IndexMap<String, Function>;

/// Private field that re-tags a clone when merged
pub const TYPE_FIELD: &str = "_type";

/// Everything an instance carries besides its public fields.
/// Copied into every clone; `methods` is shared by reference.
#[derive(Clone)]
pub(crate) struct Metadata {
    pub(crate) type_name: String,
    pub(crate) init: Option<Rc<[String]>>,
    pub(crate) mapfields: Option<MapFields>,
    pub(crate) methods: Rc<Methods>,
    pub(crate) private: PrivateFields,
}

/// A prototype instance: a type tag, public fields, private fields and a
/// shared capability set. Every instance doubles as a prototype - calling
/// it produces a clone.
#[derive(Clone)]
pub struct Object(Rc<InnerObject>);

struct InnerObject {
    meta: RefCell<Metadata>,
    fields: Table,
}

impl Object {
    pub(crate) fn from_parts(meta: Metadata, fields: Table) -> Self {
        Object(Rc::new(InnerObject {
            meta: RefCell::new(meta),
            fields,
        }))
    }

    fn root(type_name: &str, methods: Methods) -> Self {
        Object::from_parts(
            Metadata {
                type_name: type_name.to_string(),
                init: None,
                mapfields: None,
                methods: Rc::new(methods),
                private: PrivateFields::new(),
            },
            Table::new(),
        )
    }

    pub(crate) fn meta(&self) -> Ref<'_, Metadata> {
        self.0.meta.borrow()
    }

    pub(crate) fn meta_mut(&self) -> RefMut<'_, Metadata> {
        self.0.meta.borrow_mut()
    }

    pub(crate) fn fields(&self) -> &Table {
        &self.0.fields
    }

    pub fn type_name(&self) -> String {
        self.meta().type_name.clone()
    }

    /// Read a public field; `Nil` if absent
    pub fn get(&self, key: impl Into<Key>) -> Value {
        self.fields().get(key)
    }

    /// Replace the value of an existing public field.
    /// The field set of a finished instance is fixed, so adding a field or
    /// removing one (by storing nil) fails.
    pub fn set(
        &self,
        key: impl Into<Key>,
        value: impl Into<Value>,
    ) -> OResult<()> {
        let key = key.into();
        let value = value.into();
        if value.is_nil() || !self.fields().contains_key(key.clone()) {
            return Err(ObjectError::FieldSet {
                type_name: self.type_name(),
                field: key.to_string(),
            });
        }
        self.fields().set(key, value);
        Ok(())
    }

    /// A copy of the public fields, independent of this instance
    pub fn public_fields(&self) -> Table {
        self.fields().shallow_copy()
    }

    pub fn private(&self, name: &str) -> Value {
        self.meta()
            .private
            .get(name)
            .cloned()
            .unwrap_or(Value::Nil)
    }

    pub fn private_fields(&self) -> PrivateFields {
        self.meta().private.clone()
    }

    /// Ordered names bound to positional constructor arguments
    pub fn init_spec(&self) -> Option<Rc<[String]>> {
        self.meta().init.clone()
    }

    pub fn method(&self, name: &str) -> Option<Function> {
        self.meta()
            .methods
            .get(name)
            .cloned()
    }

    pub fn methods(&self) -> Rc<Methods> {
        self.meta().methods.clone()
    }

    /// True when both instances resolve methods through the very same
    /// capability set
    pub fn shares_methods(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.meta().methods, &other.meta().methods)
    }

    /// Call a method with this instance as its first argument
    pub fn send(&self, name: &str, args: &[Value]) -> OResult<Value> {
        let method = self.method(name).ok_or_else(|| {
            ObjectError::NotCallable(format!("{}:{name}", self.type_name()))
        })?;
        let call_args: Vec<Value> = std::iter::once(Value::Object(self.clone()))
            .chain(args.iter().cloned())
            .collect();
        method.call(&call_args)
    }

    /// Start declaring a new prototype derived from this one
    pub fn derive(&self, type_name: &str) -> PrototypeBuilder {
        PrototypeBuilder {
            parent: self.clone(),
            type_name: type_name.to_string(),
            init: None,
            mapfields: None,
            methods: Methods::new(),
            fields: Table::new(),
        }
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let (lhs, rhs) = (self.meta(), other.meta());
        lhs.type_name == rhs.type_name
            && lhs.private == rhs.private
            && self.fields() == other.fields()
    }
}

impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let meta = self.meta();
        f.debug_struct("Object")
            .field("type_name", &meta.type_name)
            .field("fields", &self.fields().pairs())
            .field("private", &meta.private)
            .field("init", &meta.init)
            .finish()
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {{{}}}",
            self.type_name(),
            render_pairs(&self.fields().pairs())
        )
    }
}

/*********************\
|* Prototype builder *|
\*********************/
/// Declares a prototype: its type tag, positional init spec, extra
/// methods, merge override and default fields, all resolved once here
/// rather than at every clone.
pub struct PrototypeBuilder {
    parent: Object,
    type_name: String,
    init: Option<Vec<String>>,
    mapfields: Option<MapFields>,
    methods: Methods,
    fields: Table,
}

impl PrototypeBuilder {
    pub fn init<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.init = Some(
            names
                .into_iter()
                .map(Into::into)
                .collect(),
        );
        self
    }

    pub fn method(mut self, name: &str, function: Function) -> Self {
        self.methods
            .insert(name.to_string(), function);
        self
    }

    pub fn native_method(self, name: &str, eval: NativeFn) -> Self {
        self.method(name, Function::native(name, eval))
    }

    /// Replace the default field merge for this prototype and its clones
    pub fn mapfields(
        mut self,
        mapfields: impl Fn(&Object, &Value, &RenameMap) -> OResult<MergedFields>
            + 'static,
    ) -> Self {
        self.mapfields = Some(Rc::new(mapfields));
        self
    }

    pub fn field(self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.fields.set(key, value);
        self
    }

    pub fn build(self) -> OResult<Object> {
        let mut meta = self.parent.meta().clone();
        meta.type_name = self.type_name;
        if let Some(init) = self.init {
            meta.init = Some(init.into());
        }
        if let Some(mapfields) = self.mapfields {
            meta.mapfields = Some(mapfields);
        }
        if !self.methods.is_empty() {
            let mut methods = (*meta.methods).clone();
            methods.extend(self.methods);
            meta.methods = Rc::new(methods);
        }

        let prototype =
            Object::from_parts(meta, self.parent.public_fields());
        let merged = merge_fields(
            &prototype,
            &Value::Table(self.fields),
            &RenameMap::new(),
        )?;
        prototype.install(merged)?;
        Ok(prototype)
    }
}

/*******************\
|* Root prototypes *|
\*******************/
thread_local! {
    static CONTAINER: Object = Object::root("Container", Methods::new());
    static CHECKED_OBJECT: Object =
        Object::root("Object", methods::capabilities(&Strict));
    static UNCHECKED_OBJECT: Object =
        Object::root("Object", methods::capabilities(&Passthrough));
}

/// The base prototype: cloneable, no methods
pub fn container() -> Object {
    CONTAINER.with(Object::clone)
}

/// Container plus the shared `clone`/`prototype`/`mapfields`/`tostring`
/// capability set, argument-checked according to `CONFIG`
pub fn object() -> Object {
    object_for(&CONFIG)
}

/// The Object root whose methods check arguments as `config` says.
/// The checked and unchecked roots have distinct capability sets.
pub fn object_for(config: &Config) -> Object {
    let root = if config.argcheck {
        &CHECKED_OBJECT
    } else {
        &UNCHECKED_OBJECT
    };
    root.with(Object::clone)
}
