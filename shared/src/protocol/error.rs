use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Protocol is locked and cannot be modified
    #[error("Protocol is already locked and cannot be modified. Protocol.lock() has been called and no further changes are allowed")]
    AlreadyLocked,

    /// Protocol must be locked before a registry can be built from it
    #[error("Protocol is not locked. Call Protocol.lock() before building a registry, server or client from it")]
    NotLocked,

    /// A class with this name was already added
    #[error("Class '{class}' was already added to the Protocol")]
    DuplicateClass { class: String },

    /// Two fields, aliases or collections of one class share a name
    #[error("Class '{class}' declares the name '{field}' more than once")]
    DuplicateField { class: String, field: String },

    /// A change callback was registered for a field the class doesn't have
    #[error("Class '{class}' has no field named '{field}' to register a change callback for")]
    UnknownField { class: String, field: String },

    /// Two replicated fields produced the same channel name
    #[error("Channel name '{name}' is not unique. Replicated fields must map to distinct '{{Class}}.{{field}}' names")]
    DuplicateChannelName { name: String },

    /// More classes than a `u16` class id can address
    #[error("Too many classes registered in the Protocol")]
    TooManyClasses,

    /// More replicated fields than a `u16` channel id can address
    #[error("Too many replicated fields registered in the Protocol")]
    TooManyChannels,
}
