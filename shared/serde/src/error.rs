use thiserror::Error;

/// Errors that can occur while reading a serialized stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The reader ran out of bits before the value was complete
    #[error("Unexpected end of buffer while reading. The payload is truncated or malformed")]
    UnexpectedEnd,

    /// A decoded integer does not fit in the requested type
    #[error("Decoded integer is out of range for type {type_name}")]
    OutOfRange { type_name: &'static str },

    /// A string payload was not valid UTF-8
    #[error("String payload is not valid UTF-8")]
    InvalidUtf8,

    /// An enum tag that this build does not know about
    #[error("Unknown tag {tag} while decoding {type_name}")]
    UnknownTag { type_name: &'static str, tag: u8 },
}
