use std::collections::BTreeMap;

use log::{debug, info};

use crate::{
    class::{
        class_kinds::{ClassDescriptor, ClassKind, ClassKinds},
        error::ClassError,
        instance::{Instance, InstanceRef},
        instance_mut::InstanceMut,
        outcome::SetOutcome,
    },
    protocol::{Protocol, ProtocolError},
    replication::{
        channel_kinds::{ChannelKind, ChannelKinds},
        mutation::{FieldMutation, MutationQueue},
    },
    types::{HostType, InstanceId},
    value::typed_value::TypedValue,
};

/// Live instances of one class
struct InstanceTable {
    // `None` once every id has been handed out
    next_id: Option<u32>,
    instances: BTreeMap<InstanceId, Instance>,
}

impl InstanceTable {
    fn new() -> Self {
        Self {
            next_id: Some(1),
            instances: BTreeMap::new(),
        }
    }

    fn generate_id(&mut self) -> Option<InstanceId> {
        let id = self.next_id?;
        self.next_id = id.checked_add(1);
        Some(InstanceId::new(id))
    }

    fn was_issued(&self, id: InstanceId) -> bool {
        match self.next_id {
            Some(next_id) => id.value() < next_id,
            None => true,
        }
    }
}

/// Per-process instance registry. Instance ids are assigned per class in
/// creation order, starting at 1, and are never handed out twice.
pub struct ClassRegistry {
    host_type: HostType,
    class_kinds: ClassKinds,
    channel_kinds: ChannelKinds,
    tables: Vec<InstanceTable>,
    mutations: MutationQueue,
}

impl ClassRegistry {
    pub fn new(host_type: HostType, protocol: &Protocol) -> Result<Self, ProtocolError> {
        if !protocol.is_locked() {
            return Err(ProtocolError::NotLocked);
        }

        let tables = (0..protocol.class_kinds.len())
            .map(|_| InstanceTable::new())
            .collect();

        Ok(Self {
            host_type,
            class_kinds: protocol.class_kinds.clone(),
            channel_kinds: protocol.channel_kinds.clone(),
            tables,
            mutations: MutationQueue::new(),
        })
    }

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    pub fn class_kinds(&self) -> &ClassKinds {
        &self.class_kinds
    }

    pub fn channel_kinds(&self) -> &ChannelKinds {
        &self.channel_kinds
    }

    /// Allocates the next id, applies defaults, runs the class initializer
    /// with `args` and registers the instance
    pub fn new_instance(
        &mut self,
        class_name: &str,
        args: &[TypedValue],
    ) -> Result<InstanceMut<'_>, ClassError> {
        let kind = self.kind_of(class_name)?;
        let class = class_descriptor(&self.class_kinds, kind)?;
        let table = &mut self.tables[kind.index()];

        let Some(id) = table.generate_id() else {
            return Err(ClassError::InstanceIdsExhausted {
                class: class.name().to_string(),
            });
        };

        let mut instance = Instance::new(class, id);
        if let Some(initializer) = class.initializer() {
            let mut instance_mut =
                InstanceMut::new(class, &mut instance, &mut self.mutations, self.host_type);
            initializer(&mut instance_mut, args);
        }

        debug!("Created {} {}", class.name(), id);
        table.instances.insert(id, instance);

        let instance = table
            .instances
            .get_mut(&id)
            .ok_or_else(|| unknown_instance(class, id))?;
        Ok(InstanceMut::new(
            class,
            instance,
            &mut self.mutations,
            self.host_type,
        ))
    }

    pub fn instance(&self, class_name: &str, id: InstanceId) -> Result<InstanceRef<'_>, ClassError> {
        let kind = self.kind_of(class_name)?;
        let class = class_descriptor(&self.class_kinds, kind)?;
        let instance = self.tables[kind.index()]
            .instances
            .get(&id)
            .ok_or_else(|| unknown_instance(class, id))?;
        Ok(InstanceRef::new(class, instance))
    }

    pub fn instance_mut(
        &mut self,
        class_name: &str,
        id: InstanceId,
    ) -> Result<InstanceMut<'_>, ClassError> {
        let kind = self.kind_of(class_name)?;
        let class = class_descriptor(&self.class_kinds, kind)?;
        let instance = self.tables[kind.index()]
            .instances
            .get_mut(&id)
            .ok_or_else(|| unknown_instance(class, id))?;
        Ok(InstanceMut::new(
            class,
            instance,
            &mut self.mutations,
            self.host_type,
        ))
    }

    /// Unregisters an instance locally. Its id stays retired, and observers
    /// are not told about the removal.
    pub fn remove_instance(&mut self, class_name: &str, id: InstanceId) -> Result<(), ClassError> {
        let kind = self.kind_of(class_name)?;
        let class = class_descriptor(&self.class_kinds, kind)?;
        if self.tables[kind.index()].instances.remove(&id).is_none() {
            return Err(unknown_instance(class, id));
        }
        info!("Removed {} {}", class.name(), id);
        Ok(())
    }

    /// Live instance ids of a class, in ascending order
    pub fn instance_ids(&self, class_name: &str) -> Result<Vec<InstanceId>, ClassError> {
        let kind = self.kind_of(class_name)?;
        Ok(self.tables[kind.index()].instances.keys().copied().collect())
    }

    pub fn has_instance(&self, kind: ClassKind, id: InstanceId) -> bool {
        self.tables
            .get(kind.index())
            .is_some_and(|table| table.instances.contains_key(&id))
    }

    /// True if the id was handed out by this registry and its instance has
    /// since been removed
    pub fn is_retired(&self, kind: ClassKind, id: InstanceId) -> bool {
        self.tables.get(kind.index()).is_some_and(|table| {
            id.value() != 0 && table.was_issued(id) && !table.instances.contains_key(&id)
        })
    }

    // Replication

    /// Runs a value received on `channel` through the local setter pipeline
    /// without queueing it for replication
    pub fn apply_remote(
        &mut self,
        channel: ChannelKind,
        id: InstanceId,
        value: TypedValue,
    ) -> Result<SetOutcome, ClassError> {
        let route = self
            .channel_kinds
            .route(channel)
            .ok_or(ClassError::UnknownChannel { channel })?;
        let class = class_descriptor(&self.class_kinds, route.class)?;
        let instance = self.tables[route.class.index()]
            .instances
            .get_mut(&id)
            .ok_or_else(|| unknown_instance(class, id))?;

        let mut instance_mut =
            InstanceMut::new(class, instance, &mut self.mutations, self.host_type);
        Ok(instance_mut.apply_remote(route.accessor_index, value))
    }

    /// Current stored value of the channel's field for every live instance
    /// that has one, in id order
    pub fn snapshot(&self, channel: ChannelKind) -> Result<Vec<(InstanceId, TypedValue)>, ClassError> {
        let route = self
            .channel_kinds
            .route(channel)
            .ok_or(ClassError::UnknownChannel { channel })?;

        Ok(self.tables[route.class.index()]
            .instances
            .values()
            .filter_map(|instance| {
                instance
                    .value(route.accessor_index)
                    .map(|value| (instance.id(), value.clone()))
            })
            .collect())
    }

    /// Drains replicated mutations, in commit order
    pub fn take_mutations(&mut self) -> Vec<FieldMutation> {
        self.mutations.take()
    }

    // Private

    fn kind_of(&self, class_name: &str) -> Result<ClassKind, ClassError> {
        self.class_kinds
            .kind_of(class_name)
            .ok_or_else(|| ClassError::UnknownClass {
                name: class_name.to_string(),
            })
    }
}

fn class_descriptor(class_kinds: &ClassKinds, kind: ClassKind) -> Result<&ClassDescriptor, ClassError> {
    class_kinds.get(kind).ok_or_else(|| ClassError::UnknownClass {
        name: format!("{:?}", kind),
    })
}

fn unknown_instance(class: &ClassDescriptor, id: InstanceId) -> ClassError {
    ClassError::UnknownInstance {
        class: class.name().to_string(),
        id,
    }
}
