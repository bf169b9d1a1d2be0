use crate::{Descriptor, DescriptorRef, Error, Instance, Relation, Result, Value};
use std::{any::type_name, cell::RefCell, rc::Rc, sync::Arc};

/// Typed accessor pair for one property of entity type `T`.
///
/// Plain function pointers keep the capability table `Send + Sync` and make
/// clear that accessors are registered once, not captured per call.
pub enum Accessor<T> {
    /// Scalar (or raw foreign-key) column.
    Value {
        get: fn(&T) -> Value,
        set: fn(&mut T, Value) -> Result<()>,
    },
    /// To-one / belongs-to relation.
    Relation {
        get: fn(&T) -> Relation,
        set: fn(&mut T, Relation),
    },
    /// To-many collection.
    Children { push: fn(&mut T, Instance) },
}

impl<T> Accessor<T> {
    fn kind(&self) -> &'static str {
        match self {
            Accessor::Value { .. } => "a scalar column",
            Accessor::Relation { .. } => "a relation",
            Accessor::Children { .. } => "a collection",
        }
    }
}

/// Entity descriptor for `T`: a capability table built once at schema
/// registration, mapping property names to typed getter/setter pairs.
///
/// ```
/// # use marrow::{AsValue, Schema};
/// #[derive(Default)]
/// struct Author {
///     id: i64,
///     name: String,
/// }
/// let authors = Schema::<Author>::new("authors", "id")
///     .value("id", |a| a.id.as_value(), |a, v| {
///         a.id = i64::try_from_value(v)?;
///         Ok(())
///     })
///     .value("name", |a| a.name.clone().as_value(), |a, v| {
///         a.name = String::try_from_value(v)?;
///         Ok(())
///     })
///     .into_descriptor();
/// ```
pub struct Schema<T: 'static> {
    table: &'static str,
    primary_key: &'static str,
    properties: Vec<(&'static str, Accessor<T>)>,
}

impl<T: Default + 'static> Schema<T> {
    pub fn new(table: &'static str, primary_key: &'static str) -> Self {
        Self {
            table,
            primary_key,
            properties: Vec::new(),
        }
    }

    /// Registers a scalar property.
    pub fn value(
        self,
        property: &'static str,
        get: fn(&T) -> Value,
        set: fn(&mut T, Value) -> Result<()>,
    ) -> Self {
        self.register(property, Accessor::Value { get, set })
    }

    /// Registers a to-one / belongs-to relation property.
    pub fn relation(
        self,
        property: &'static str,
        get: fn(&T) -> Relation,
        set: fn(&mut T, Relation),
    ) -> Self {
        self.register(property, Accessor::Relation { get, set })
    }

    /// Registers a to-many collection property.
    pub fn children(self, property: &'static str, push: fn(&mut T, Instance)) -> Self {
        self.register(property, Accessor::Children { push })
    }

    pub fn into_descriptor(self) -> DescriptorRef {
        Arc::new(self)
    }

    fn register(mut self, property: &'static str, accessor: Accessor<T>) -> Self {
        assert!(
            self.properties.iter().all(|(name, ..)| *name != property),
            "Property {} is already registered on table {}",
            property,
            self.table,
        );
        self.properties.push((property, accessor));
        self
    }
}

impl<T: 'static> Schema<T> {
    fn accessor(&self, property: &str) -> Result<&Accessor<T>> {
        self.properties
            .iter()
            .find(|(name, ..)| *name == property)
            .map(|(.., accessor)| accessor)
            .ok_or_else(|| {
                Error::msg(format!(
                    "Table {} has no property named {:?}",
                    self.table, property,
                ))
            })
    }

    fn read<R>(&self, instance: &Instance, f: impl FnOnce(&T) -> R) -> Result<R> {
        let borrowed = instance.borrow();
        let entity = borrowed.downcast_ref::<T>().ok_or_else(|| {
            Error::msg(format!(
                "Instance handed to table {} is not a {}",
                self.table,
                type_name::<T>(),
            ))
        })?;
        Ok(f(entity))
    }

    fn write<R>(&self, instance: &Instance, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut borrowed = instance.borrow_mut();
        let entity = borrowed.downcast_mut::<T>().ok_or_else(|| {
            Error::msg(format!(
                "Instance handed to table {} is not a {}",
                self.table,
                type_name::<T>(),
            ))
        })?;
        Ok(f(entity))
    }

    fn mismatch(&self, property: &str, accessor: &Accessor<T>, expected: &str) -> Error {
        Error::msg(format!(
            "Property {} of table {} is {}, not {}",
            property,
            self.table,
            accessor.kind(),
            expected,
        ))
    }
}

impl<T: Default + 'static> Descriptor for Schema<T> {
    fn table(&self) -> &'static str {
        self.table
    }

    fn primary_key(&self) -> &'static str {
        self.primary_key
    }

    fn new_instance(&self) -> Result<Instance> {
        Ok(Rc::new(RefCell::new(T::default())))
    }

    fn value(&self, instance: &Instance, property: &str) -> Result<Value> {
        match self.accessor(property)? {
            Accessor::Value { get, .. } => self.read(instance, *get),
            other => Err(self.mismatch(property, other, "a scalar column")),
        }
    }

    fn set_value(&self, instance: &Instance, property: &str, value: Value) -> Result<()> {
        match self.accessor(property)? {
            Accessor::Value { set, .. } => self.write(instance, |entity| set(entity, value))?,
            other => Err(self.mismatch(property, other, "a scalar column")),
        }
    }

    fn relation(&self, instance: &Instance, property: &str) -> Result<Relation> {
        match self.accessor(property)? {
            Accessor::Relation { get, .. } => self.read(instance, *get),
            other => Err(self.mismatch(property, other, "a relation")),
        }
    }

    fn set_relation(&self, instance: &Instance, property: &str, relation: Relation) -> Result<()> {
        match self.accessor(property)? {
            Accessor::Relation { set, .. } => self.write(instance, |entity| set(entity, relation)),
            other => Err(self.mismatch(property, other, "a relation")),
        }
    }

    fn append_child(&self, instance: &Instance, property: &str, child: Instance) -> Result<()> {
        match self.accessor(property)? {
            Accessor::Children { push } => self.write(instance, |entity| push(entity, child)),
            other => Err(self.mismatch(property, other, "a collection")),
        }
    }
}
