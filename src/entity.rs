use crate::{Error, Relation, Result, Value};
use std::{
    any::{Any, type_name},
    cell::{Ref, RefCell},
    rc::Rc,
    sync::Arc,
};

/// An opaque, mutable entity instance under construction.
///
/// Instances are confined to one materialization pass and handed to the
/// caller fully owned; the pass itself is synchronous and single threaded,
/// hence `Rc` rather than `Arc`.
pub type Instance = Rc<RefCell<dyn Any>>;

/// Shared handle to a table's entity descriptor, built once at schema
/// registration and reused across calls.
pub type DescriptorRef = Arc<dyn Descriptor + Send + Sync>;

/// Per-table schema metadata: blank-instance construction plus named-property
/// access over [`Instance`] values.
///
/// All property access goes through registered typed accessors; a property
/// name the descriptor does not recognize is a contract violation and fails
/// the whole materialization call.
pub trait Descriptor {
    /// Table name, used in diagnostics.
    fn table(&self) -> &'static str;
    /// Name of the primary-key property.
    fn primary_key(&self) -> &'static str;
    /// Creates a blank instance of the table's entity type. Failure to
    /// construct aborts the whole materialization call.
    fn new_instance(&self) -> Result<Instance>;
    /// Reads a scalar property.
    fn value(&self, instance: &Instance, property: &str) -> Result<Value>;
    /// Writes a scalar property.
    fn set_value(&self, instance: &Instance, property: &str, value: Value) -> Result<()>;
    /// Reads a to-one / belongs-to relation property.
    fn relation(&self, instance: &Instance, property: &str) -> Result<Relation>;
    /// Writes a to-one / belongs-to relation property.
    fn set_relation(&self, instance: &Instance, property: &str, relation: Relation) -> Result<()>;
    /// Appends to a to-many collection property.
    fn append_child(&self, instance: &Instance, property: &str, child: Instance) -> Result<()>;
}

/// Borrows a materialized instance back as its concrete entity type.
pub fn entity_ref<T: 'static>(instance: &Instance) -> Result<Ref<'_, T>> {
    Ref::filter_map(instance.borrow(), |v| v.downcast_ref::<T>())
        .map_err(|_| Error::msg(format!("Instance is not a {}", type_name::<T>())))
}
