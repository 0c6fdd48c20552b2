use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use log::info;

use crate::{
    class::{
        accessor::AccessorDescriptor,
        collection::CollectionDescriptor,
        instance::{ChangeCallback, InstanceRef},
        instance_mut::InstanceMut,
    },
    protocol::ProtocolError,
    replication::channel_kinds::ChannelKind,
    value::typed_value::TypedValue,
};

/// Opaque handle of a registered class
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassKind(u16);

impl ClassKind {
    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

pub type Initializer = Arc<dyn Fn(&mut InstanceMut<'_>, &[TypedValue]) + Send + Sync>;

/// Collects the fields of a class before it is added to a `Protocol`
pub struct ClassBuilder {
    name: String,
    accessors: Vec<AccessorDescriptor>,
    collections: Vec<CollectionDescriptor>,
    initializer: Option<Initializer>,
    change_callbacks: Vec<(String, ChangeCallback)>,
}

impl ClassBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            accessors: Vec::new(),
            collections: Vec::new(),
            initializer: None,
            change_callbacks: Vec::new(),
        }
    }

    pub fn accessor(mut self, accessor: AccessorDescriptor) -> Self {
        self.accessors.push(accessor);
        self
    }

    pub fn collection(mut self, collection: CollectionDescriptor) -> Self {
        self.collections.push(collection);
        self
    }

    /// Runs after defaults are applied, with the arguments given to
    /// `new_instance`
    pub fn initializer<F>(mut self, initializer: F) -> Self
    where
        F: Fn(&mut InstanceMut<'_>, &[TypedValue]) + Send + Sync + 'static,
    {
        self.initializer = Some(Arc::new(initializer));
        self
    }

    /// Class-wide change callback for a field, receives `(new, old)`.
    /// A callback registered on an instance takes precedence.
    pub fn on_change<F>(mut self, field: &str, callback: F) -> Self
    where
        F: Fn(&InstanceRef<'_>, &TypedValue, Option<&TypedValue>) + Send + Sync + 'static,
    {
        self.change_callbacks
            .push((field.to_string(), Arc::new(callback)));
        self
    }
}

#[derive(Clone)]
pub struct ClassDescriptor {
    kind: ClassKind,
    name: String,
    accessors: Vec<AccessorDescriptor>,
    // canonical names and aliases
    fields: HashMap<String, usize>,
    collections: Vec<CollectionDescriptor>,
    singulars: HashMap<String, usize>,
    plurals: HashMap<String, usize>,
    initializer: Option<Initializer>,
    change_callbacks: HashMap<usize, ChangeCallback>,
    channels: Vec<Option<ChannelKind>>,
}

impl ClassDescriptor {
    fn build(kind: ClassKind, builder: ClassBuilder) -> Result<Self, ProtocolError> {
        let ClassBuilder {
            name,
            accessors,
            collections,
            initializer,
            change_callbacks,
        } = builder;

        let mut taken_names: HashSet<String> = HashSet::new();
        let mut claim = |field: &str| -> Result<(), ProtocolError> {
            if !taken_names.insert(field.to_string()) {
                return Err(ProtocolError::DuplicateField {
                    class: name.clone(),
                    field: field.to_string(),
                });
            }
            Ok(())
        };

        let mut fields = HashMap::new();
        for (index, accessor) in accessors.iter().enumerate() {
            claim(accessor.name())?;
            fields.insert(accessor.name().to_string(), index);
            for alias in accessor.aliases() {
                claim(alias)?;
                fields.insert(alias.clone(), index);
            }
        }

        let mut singulars = HashMap::new();
        let mut plurals = HashMap::new();
        for (index, collection) in collections.iter().enumerate() {
            claim(collection.singular_name())?;
            claim(collection.plural_name())?;
            singulars.insert(collection.singular_name().to_string(), index);
            plurals.insert(collection.plural_name().to_string(), index);
        }

        let mut callbacks = HashMap::new();
        for (field, callback) in change_callbacks {
            let Some(index) = fields.get(&field) else {
                return Err(ProtocolError::UnknownField { class: name, field });
            };
            callbacks.insert(*index, callback);
        }

        let channels = vec![None; accessors.len()];

        Ok(Self {
            kind,
            name,
            accessors,
            fields,
            collections,
            singulars,
            plurals,
            initializer,
            change_callbacks: callbacks,
            channels,
        })
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accessors(&self) -> &[AccessorDescriptor] {
        &self.accessors
    }

    pub fn collections(&self) -> &[CollectionDescriptor] {
        &self.collections
    }

    /// Resolves a field name or alias to its accessor index
    pub fn accessor_index(&self, field: &str) -> Option<usize> {
        self.fields.get(field).copied()
    }

    pub(crate) fn collection_by_singular(&self, singular: &str) -> Option<usize> {
        self.singulars.get(singular).copied()
    }

    pub(crate) fn collection_by_plural(&self, plural: &str) -> Option<usize> {
        self.plurals.get(plural).copied()
    }

    /// Replication channel of a field, only set for `replicate` fields once
    /// the protocol is locked
    pub fn channel(&self, accessor_index: usize) -> Option<ChannelKind> {
        self.channels.get(accessor_index).copied().flatten()
    }

    pub(crate) fn set_channel(&mut self, accessor_index: usize, channel: ChannelKind) {
        self.channels[accessor_index] = Some(channel);
    }

    pub(crate) fn change_callback(&self, accessor_index: usize) -> Option<&ChangeCallback> {
        self.change_callbacks.get(&accessor_index)
    }

    pub(crate) fn initializer(&self) -> Option<&Initializer> {
        self.initializer.as_ref()
    }
}

/// All classes of a protocol, indexed by `ClassKind`
#[derive(Clone, Default)]
pub struct ClassKinds {
    classes: Vec<ClassDescriptor>,
    kind_map: HashMap<String, ClassKind>,
}

impl ClassKinds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, builder: ClassBuilder) -> Result<ClassKind, ProtocolError> {
        if self.kind_map.contains_key(&builder.name) {
            return Err(ProtocolError::DuplicateClass {
                class: builder.name,
            });
        }
        let Ok(net_id) = u16::try_from(self.classes.len()) else {
            return Err(ProtocolError::TooManyClasses);
        };

        let kind = ClassKind(net_id);
        let descriptor = ClassDescriptor::build(kind, builder)?;
        info!(
            "Registered class {} with {} accessors",
            descriptor.name(),
            descriptor.accessors().len()
        );

        self.kind_map.insert(descriptor.name().to_string(), kind);
        self.classes.push(descriptor);
        Ok(kind)
    }

    pub fn kind_of(&self, name: &str) -> Option<ClassKind> {
        self.kind_map.get(name).copied()
    }

    pub fn get(&self, kind: ClassKind) -> Option<&ClassDescriptor> {
        self.classes.get(kind.index())
    }

    pub(crate) fn get_mut(&mut self, kind: ClassKind) -> Option<&mut ClassDescriptor> {
        self.classes.get_mut(kind.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
