use std::sync::Arc;

use crate::{
    class::accessor::{coerce_or_raw, Coercion},
    value::typed_value::TypedValue,
};

/// An ordered, appendable list field. `add(singular)` appends one element,
/// `get_all(plural)` / `set_all(plural)` read or replace the whole list.
///
/// Collections are local state only, they never travel over the network.
#[derive(Clone)]
pub struct CollectionDescriptor {
    singular: String,
    plural: String,
    coercion: Option<Coercion>,
}

impl CollectionDescriptor {
    /// The plural name defaults to `{singular}s`
    pub fn new(singular: &str) -> Self {
        Self {
            singular: singular.to_string(),
            plural: format!("{}s", singular),
            coercion: None,
        }
    }

    pub fn plural(mut self, plural: &str) -> Self {
        self.plural = plural.to_string();
        self
    }

    /// Coercion applied to each element individually
    pub fn coerce<F>(mut self, coercion: F) -> Self
    where
        F: Fn(&[TypedValue]) -> Option<TypedValue> + Send + Sync + 'static,
    {
        self.coercion = Some(Arc::new(coercion));
        self
    }

    pub fn singular_name(&self) -> &str {
        &self.singular
    }

    pub fn plural_name(&self) -> &str {
        &self.plural
    }

    pub(crate) fn coerce_element(&self, args: &[TypedValue]) -> Option<TypedValue> {
        coerce_or_raw(self.coercion.as_ref(), args)
    }
}
