use std::{collections::HashMap, sync::Arc};

use log::warn;

use crate::{
    class::{
        class_kinds::{ClassDescriptor, ClassKind},
        error::ClassError,
    },
    types::InstanceId,
    value::typed_value::TypedValue,
};

pub type ChangeCallback =
    Arc<dyn Fn(&InstanceRef<'_>, &TypedValue, Option<&TypedValue>) + Send + Sync>;

/// Storage of one live instance. Values are only reachable through
/// `InstanceRef` / `InstanceMut`.
pub struct Instance {
    kind: ClassKind,
    id: InstanceId,
    values: Vec<Option<TypedValue>>,
    collections: Vec<Vec<TypedValue>>,
    change_callbacks: HashMap<usize, ChangeCallback>,
}

impl Instance {
    /// Creates an instance holding the default of every accessor
    pub(crate) fn new(class: &ClassDescriptor, id: InstanceId) -> Self {
        let values = class
            .accessors()
            .iter()
            .map(|accessor| accessor.default_value().cloned())
            .collect();

        Self {
            kind: class.kind(),
            id,
            values,
            collections: vec![Vec::new(); class.collections().len()],
            change_callbacks: HashMap::new(),
        }
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub(crate) fn value(&self, accessor_index: usize) -> Option<&TypedValue> {
        self.values.get(accessor_index)?.as_ref()
    }

    pub(crate) fn replace_value(
        &mut self,
        accessor_index: usize,
        value: TypedValue,
    ) -> Option<TypedValue> {
        self.values[accessor_index].replace(value)
    }

    pub(crate) fn collection(&self, collection_index: usize) -> &[TypedValue] {
        &self.collections[collection_index]
    }

    pub(crate) fn collection_mut(&mut self, collection_index: usize) -> &mut Vec<TypedValue> {
        &mut self.collections[collection_index]
    }

    pub(crate) fn change_callback(&self, accessor_index: usize) -> Option<&ChangeCallback> {
        self.change_callbacks.get(&accessor_index)
    }

    pub(crate) fn set_change_callback(&mut self, accessor_index: usize, callback: ChangeCallback) {
        self.change_callbacks.insert(accessor_index, callback);
    }
}

/// Read-only view of an instance
pub struct InstanceRef<'a> {
    class: &'a ClassDescriptor,
    instance: &'a Instance,
}

impl<'a> InstanceRef<'a> {
    pub(crate) fn new(class: &'a ClassDescriptor, instance: &'a Instance) -> Self {
        Self { class, instance }
    }

    pub fn id(&self) -> InstanceId {
        self.instance.id()
    }

    pub fn class_kind(&self) -> ClassKind {
        self.instance.kind()
    }

    pub fn class_name(&self) -> &'a str {
        self.class.name()
    }

    /// Stored value with the getter transform applied, `None` when unset
    pub fn get(&self, field: &str) -> Option<TypedValue> {
        match self.try_get(field) {
            Ok(value) => value,
            Err(error) => {
                warn!("{}", error);
                None
            }
        }
    }

    pub fn try_get(&self, field: &str) -> Result<Option<TypedValue>, ClassError> {
        let index = resolve_field(self.class, field)?;
        let accessor = &self.class.accessors()[index];
        Ok(self
            .instance
            .value(index)
            .map(|stored| accessor.transform(stored)))
    }

    /// True only when the stored value is exactly `Bool(true)`
    pub fn is(&self, field: &str) -> bool {
        match self.try_is(field) {
            Ok(value) => value,
            Err(error) => {
                warn!("{}", error);
                false
            }
        }
    }

    pub fn try_is(&self, field: &str) -> Result<bool, ClassError> {
        let index = resolve_field(self.class, field)?;
        if !self.class.accessors()[index].is_predicate() {
            return Err(ClassError::NotAPredicate {
                class: self.class.name().to_string(),
                field: field.to_string(),
            });
        }
        Ok(self.instance.value(index) == Some(&TypedValue::Bool(true)))
    }

    pub fn get_all(&self, plural: &str) -> &'a [TypedValue] {
        match self.try_get_all(plural) {
            Ok(values) => values,
            Err(error) => {
                warn!("{}", error);
                &[]
            }
        }
    }

    pub fn try_get_all(&self, plural: &str) -> Result<&'a [TypedValue], ClassError> {
        let Some(index) = self.class.collection_by_plural(plural) else {
            return Err(ClassError::UnknownCollection {
                class: self.class.name().to_string(),
                name: plural.to_string(),
            });
        };
        Ok(self.instance.collection(index))
    }
}

pub(crate) fn resolve_field(class: &ClassDescriptor, field: &str) -> Result<usize, ClassError> {
    class
        .accessor_index(field)
        .ok_or_else(|| ClassError::UnknownField {
            class: class.name().to_string(),
            field: field.to_string(),
        })
}
