use std::sync::Arc;

use log::{debug, trace, warn};

use crate::{
    class::{
        class_kinds::ClassDescriptor,
        error::ClassError,
        instance::{resolve_field, Instance, InstanceRef},
        outcome::{Outcome, Rejection, SetOutcome},
    },
    replication::mutation::{FieldMutation, MutationQueue},
    types::{HostType, InstanceId},
    value::typed_value::TypedValue,
};

/// Where a mutation came from. Remote mutations are never re-replicated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MutationOrigin {
    Local,
    Remote,
}

/// Mutable handle to one instance. Every field write goes through the
/// setter pipeline here:
///
/// pre_mutate -> coercion -> validate -> commit -> change callback ->
/// replication (authority only)
pub struct InstanceMut<'r> {
    class: &'r ClassDescriptor,
    instance: &'r mut Instance,
    mutations: &'r mut MutationQueue,
    host_type: HostType,
}

impl<'r> InstanceMut<'r> {
    pub(crate) fn new(
        class: &'r ClassDescriptor,
        instance: &'r mut Instance,
        mutations: &'r mut MutationQueue,
        host_type: HostType,
    ) -> Self {
        Self {
            class,
            instance,
            mutations,
            host_type,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.instance.id()
    }

    pub fn instance_ref(&self) -> InstanceRef<'_> {
        InstanceRef::new(self.class, self.instance)
    }

    // Reads

    pub fn get(&self, field: &str) -> Option<TypedValue> {
        self.instance_ref().get(field)
    }

    pub fn try_get(&self, field: &str) -> Result<Option<TypedValue>, ClassError> {
        self.instance_ref().try_get(field)
    }

    pub fn is(&self, field: &str) -> bool {
        self.instance_ref().is(field)
    }

    pub fn try_is(&self, field: &str) -> Result<bool, ClassError> {
        self.instance_ref().try_is(field)
    }

    pub fn get_all(&self, plural: &str) -> &[TypedValue] {
        self.instance_ref().get_all(plural)
    }

    pub fn try_get_all(&self, plural: &str) -> Result<&[TypedValue], ClassError> {
        self.instance_ref().try_get_all(plural)
    }

    // Writes

    /// Runs the setter pipeline for a field or alias. Vetoes are silent,
    /// an unknown field is logged. Returns `self` for chaining.
    pub fn set(&mut self, field: &str, args: Vec<TypedValue>) -> &mut Self {
        if let Err(error) = self.try_set(field, args) {
            warn!("{}", error);
        }
        self
    }

    pub fn try_set(&mut self, field: &str, args: Vec<TypedValue>) -> Result<SetOutcome, ClassError> {
        let index = resolve_field(self.class, field)?;
        Ok(self.run_setter(index, args, MutationOrigin::Local))
    }

    /// Applies a value received from the authority. Callbacks fire as for a
    /// local set, but nothing is queued for replication.
    pub(crate) fn apply_remote(&mut self, accessor_index: usize, value: TypedValue) -> SetOutcome {
        self.run_setter(accessor_index, vec![value], MutationOrigin::Remote)
    }

    /// Registers a change callback on this instance only, replacing any
    /// class-wide callback for the field
    pub fn on_change<F>(&mut self, field: &str, callback: F) -> &mut Self
    where
        F: Fn(&InstanceRef<'_>, &TypedValue, Option<&TypedValue>) + Send + Sync + 'static,
    {
        match resolve_field(self.class, field) {
            Ok(index) => self.instance.set_change_callback(index, Arc::new(callback)),
            Err(error) => warn!("{}", error),
        }
        self
    }

    // Collections

    /// Replaces the whole collection. If any element fails coercion the
    /// collection is left untouched.
    pub fn set_all(&mut self, plural: &str, values: Vec<TypedValue>) -> &mut Self {
        if let Err(error) = self.try_set_all(plural, values) {
            warn!("{}", error);
        }
        self
    }

    pub fn try_set_all(
        &mut self,
        plural: &str,
        values: Vec<TypedValue>,
    ) -> Result<SetOutcome, ClassError> {
        let Some(index) = self.class.collection_by_plural(plural) else {
            return Err(self.unknown_collection(plural));
        };
        let collection = &self.class.collections()[index];

        let mut coerced = Vec::with_capacity(values.len());
        for value in values {
            let Some(element) = collection.coerce_element(std::slice::from_ref(&value)) else {
                return Ok(self.reject(plural, Rejection::CoercionFailed));
            };
            coerced.push(element);
        }

        *self.instance.collection_mut(index) = coerced;
        Ok(SetOutcome::Accepted)
    }

    /// Appends one coerced element
    pub fn add(&mut self, singular: &str, args: Vec<TypedValue>) -> &mut Self {
        if let Err(error) = self.try_add(singular, args) {
            warn!("{}", error);
        }
        self
    }

    pub fn try_add(&mut self, singular: &str, args: Vec<TypedValue>) -> Result<SetOutcome, ClassError> {
        let Some(index) = self.class.collection_by_singular(singular) else {
            return Err(self.unknown_collection(singular));
        };

        let Some(element) = self.class.collections()[index].coerce_element(&args) else {
            return Ok(self.reject(singular, Rejection::CoercionFailed));
        };
        self.instance.collection_mut(index).push(element);
        Ok(SetOutcome::Accepted)
    }

    // Pipeline

    fn run_setter(
        &mut self,
        index: usize,
        args: Vec<TypedValue>,
        origin: MutationOrigin,
    ) -> SetOutcome {
        let class = self.class;
        let accessor = &class.accessors()[index];

        let args = match accessor.run_pre_mutate(&InstanceRef::new(class, self.instance), args) {
            Outcome::Accepted(args) => args,
            Outcome::Rejected => return self.reject(accessor.name(), Rejection::PreMutateVeto),
        };

        let Some(candidate) = accessor.run_coercion(&args) else {
            return self.reject(accessor.name(), Rejection::CoercionFailed);
        };

        if !accessor.run_validate(&InstanceRef::new(class, self.instance), &candidate) {
            return self.reject(accessor.name(), Rejection::ValidationVeto);
        }

        let old = self.instance.replace_value(index, candidate.clone());

        let callback = self
            .instance
            .change_callback(index)
            .or_else(|| class.change_callback(index))
            .cloned();
        if let Some(callback) = callback {
            callback(
                &InstanceRef::new(class, self.instance),
                &candidate,
                old.as_ref(),
            );
        }

        if origin == MutationOrigin::Local
            && accessor.replicates()
            && self.host_type == HostType::Authority
        {
            if let Some(channel) = class.channel(index) {
                trace!(
                    "Queued {}.{} of {} for replication",
                    class.name(),
                    accessor.name(),
                    self.instance.id()
                );
                self.mutations
                    .push(FieldMutation::new(channel, self.instance.id(), candidate));
            }
        }

        SetOutcome::Accepted
    }

    fn reject(&self, field: &str, rejection: Rejection) -> SetOutcome {
        debug!(
            "{}.{} of {} rejected: {:?}",
            self.class.name(),
            field,
            self.instance.id(),
            rejection
        );
        SetOutcome::Rejected(rejection)
    }

    fn unknown_collection(&self, name: &str) -> ClassError {
        ClassError::UnknownCollection {
            class: self.class.name().to_string(),
            name: name.to_string(),
        }
    }
}
