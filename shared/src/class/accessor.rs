use std::sync::Arc;

use crate::{
    class::{instance::InstanceRef, outcome::Outcome},
    value::typed_value::TypedValue,
};

pub type Coercion = Arc<dyn Fn(&[TypedValue]) -> Option<TypedValue> + Send + Sync>;
pub type Validator = Arc<dyn Fn(&InstanceRef<'_>, &TypedValue) -> bool + Send + Sync>;
pub type PreMutate =
    Arc<dyn Fn(&InstanceRef<'_>, Vec<TypedValue>) -> Outcome<Vec<TypedValue>> + Send + Sync>;
pub type GetterTransform = Arc<dyn Fn(&TypedValue) -> TypedValue + Send + Sync>;

/// Describes one named field of a class: how raw input becomes a stored
/// value, what may veto it, and whether it is replicated.
///
/// ```ignore
/// AccessorDescriptor::new("Color")
///     .coerce(coerce::color)
///     .default(Color::rgb(255, 255, 255))
///     .replicate();
/// ```
#[derive(Clone)]
pub struct AccessorDescriptor {
    name: String,
    coercion: Option<Coercion>,
    default: Option<TypedValue>,
    replicate: bool,
    validate: Option<Validator>,
    pre_mutate: Option<PreMutate>,
    aliases: Vec<String>,
    is_predicate: bool,
    getter: Option<GetterTransform>,
}

impl AccessorDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            coercion: None,
            default: None,
            replicate: false,
            validate: None,
            pre_mutate: None,
            aliases: Vec::new(),
            is_predicate: false,
            getter: None,
        }
    }

    pub fn coerce<F>(mut self, coercion: F) -> Self
    where
        F: Fn(&[TypedValue]) -> Option<TypedValue> + Send + Sync + 'static,
    {
        self.coercion = Some(Arc::new(coercion));
        self
    }

    /// Value stored on every new instance, without running the pipeline
    pub fn default<V: Into<TypedValue>>(mut self, value: V) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn replicate(mut self) -> Self {
        self.replicate = true;
        self
    }

    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&InstanceRef<'_>, &TypedValue) -> bool + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }

    pub fn pre_mutate<F>(mut self, pre_mutate: F) -> Self
    where
        F: Fn(&InstanceRef<'_>, Vec<TypedValue>) -> Outcome<Vec<TypedValue>>
            + Send
            + Sync
            + 'static,
    {
        self.pre_mutate = Some(Arc::new(pre_mutate));
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Enables `is()` for this field
    pub fn predicate(mut self) -> Self {
        self.is_predicate = true;
        self
    }

    /// Transform applied by `get()`, storage is left untouched
    pub fn getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&TypedValue) -> TypedValue + Send + Sync + 'static,
    {
        self.getter = Some(Arc::new(getter));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn default_value(&self) -> Option<&TypedValue> {
        self.default.as_ref()
    }

    pub fn replicates(&self) -> bool {
        self.replicate
    }

    pub fn is_predicate(&self) -> bool {
        self.is_predicate
    }

    pub(crate) fn run_pre_mutate(
        &self,
        instance: &InstanceRef<'_>,
        args: Vec<TypedValue>,
    ) -> Outcome<Vec<TypedValue>> {
        match &self.pre_mutate {
            Some(pre_mutate) => pre_mutate(instance, args),
            None => Outcome::Accepted(args),
        }
    }

    pub(crate) fn run_coercion(&self, args: &[TypedValue]) -> Option<TypedValue> {
        coerce_or_raw(self.coercion.as_ref(), args)
    }

    pub(crate) fn run_validate(&self, instance: &InstanceRef<'_>, candidate: &TypedValue) -> bool {
        match &self.validate {
            Some(validate) => validate(instance, candidate),
            None => true,
        }
    }

    pub(crate) fn transform(&self, stored: &TypedValue) -> TypedValue {
        match &self.getter {
            Some(getter) => getter(stored),
            None => stored.clone(),
        }
    }
}

/// Without a coercion, a single argument is stored as-is and several
/// arguments are stored as a list
pub(crate) fn coerce_or_raw(coercion: Option<&Coercion>, args: &[TypedValue]) -> Option<TypedValue> {
    if let Some(coercion) = coercion {
        return coercion(args);
    }
    match args {
        [] => None,
        [single] => Some(single.clone()),
        many => Some(TypedValue::List(many.to_vec())),
    }
}
