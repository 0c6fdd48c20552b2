use thiserror::Error;

use crate::{replication::channel_kinds::ChannelKind, types::InstanceId};

/// Errors that can occur while working with classes and their instances.
///
/// Vetoes and failed coercions are not errors, they are reported through
/// `SetOutcome`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassError {
    /// No class with this name was added to the Protocol
    #[error("Class '{name}' is not registered. Must call `add_class()` during protocol initialization")]
    UnknownClass { name: String },

    /// Field name (or alias) not declared on the class
    #[error("Class '{class}' has no field named '{field}'")]
    UnknownField { class: String, field: String },

    /// Collection name not declared on the class
    #[error("Class '{class}' has no collection named '{name}'")]
    UnknownCollection { class: String, name: String },

    /// Instance id is not (or no longer) registered
    #[error("Class '{class}' has no live instance {id}")]
    UnknownInstance { class: String, id: InstanceId },

    /// `is()` called on a field that was not declared as a predicate
    #[error("Field '{field}' of class '{class}' is not a predicate. Must call `predicate()` on its AccessorDescriptor")]
    NotAPredicate { class: String, field: String },

    /// Every `u32` instance id of this class has been handed out
    #[error("Class '{class}' has exhausted its instance ids")]
    InstanceIdsExhausted { class: String },

    /// Channel id not present in the locked Protocol
    #[error("Channel {channel:?} is not registered in the Protocol")]
    UnknownChannel { channel: ChannelKind },
}
