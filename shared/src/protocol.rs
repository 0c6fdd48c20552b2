use log::info;

use crate::{
    class::class_kinds::{ClassBuilder, ClassKinds},
    replication::channel_kinds::{ChannelKinds, ChannelRoute},
};

pub mod error;
pub use error::ProtocolError;

/// The set of classes shared by the authority and its observers. Both ends
/// must build an identical Protocol.
#[derive(Clone, Default)]
pub struct Protocol {
    pub class_kinds: ClassKinds,
    /// Populated by `lock()`
    pub channel_kinds: ChannelKinds,
    locked: bool,
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    /// Registers a class
    ///
    /// # Panics
    ///
    /// Panics if the protocol is locked or the class is invalid, see
    /// `try_add_class`
    pub fn add_class(&mut self, class: ClassBuilder) -> &mut Self {
        if let Err(error) = self.try_add_class(class) {
            panic!("{}", error);
        }
        self
    }

    /// Locks the protocol and assigns replication channels
    ///
    /// # Panics
    ///
    /// Panics if the protocol is already locked or channel names collide
    pub fn lock(&mut self) {
        if let Err(error) = self.try_lock() {
            panic!("{}", error);
        }
    }

    // Non-panicking builder methods

    pub fn try_add_class(&mut self, class: ClassBuilder) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.class_kinds.add_class(class)?;
        Ok(self)
    }

    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;

        let mut entries = Vec::new();
        for class in self.class_kinds.iter() {
            for (accessor_index, accessor) in class.accessors().iter().enumerate() {
                if !accessor.replicates() {
                    continue;
                }
                entries.push((
                    ChannelKinds::channel_name(class.name(), accessor.name()),
                    ChannelRoute {
                        class: class.kind(),
                        accessor_index,
                    },
                ));
            }
        }
        let channel_kinds = ChannelKinds::build(entries)?;

        for channel in channel_kinds.kinds() {
            let Some(route) = channel_kinds.route(channel) else {
                continue;
            };
            if let Some(class) = self.class_kinds.get_mut(route.class) {
                class.set_channel(route.accessor_index, channel);
            }
        }

        info!(
            "Protocol locked with {} classes and {} replication channels",
            self.class_kinds.len(),
            channel_kinds.len()
        );
        self.channel_kinds = channel_kinds;
        self.locked = true;
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns Err if protocol is locked
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
