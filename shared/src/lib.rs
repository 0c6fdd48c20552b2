//! # UiClass Shared
//! Common functionality shared between uiclass-server & uiclass-client
//! crates: the value model, classes and their accessors, the instance
//! registry and the replication wire format.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use uiclass_serde::{
    BitCounter, BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr, SerdeInteger,
    SignedInteger, SignedVariableInteger, UnsignedInteger, UnsignedVariableInteger,
};

mod class;
mod connection_config;
mod protocol;
mod replication;
mod transport;
mod types;
mod value;

pub use class::{
    accessor::{AccessorDescriptor, Coercion, GetterTransform, PreMutate, Validator},
    class_kinds::{ClassBuilder, ClassDescriptor, ClassKind, ClassKinds, Initializer},
    collection::CollectionDescriptor,
    error::ClassError,
    instance::{ChangeCallback, InstanceRef},
    instance_mut::InstanceMut,
    outcome::{Outcome, Rejection, SetOutcome},
    registry::ClassRegistry,
};
pub use connection_config::ConnectionConfig;
pub use protocol::{Protocol, ProtocolError};
pub use replication::{
    channel_kinds::{ChannelKind, ChannelKinds, ChannelRoute},
    message::{IncomingMessage, ReplicationMessage},
    mutation::FieldMutation,
    packet::{read_packet, read_packet_prefix, write_packets},
    waitlist::PushWaitlist,
};
pub use transport::{Io, PacketReceiver, PacketSender, TransportError};
pub use types::{HostType, InstanceId};
pub use value::{
    coerce,
    typed_value::{Angle, Color, EntityRef, Position, TypedValue, Vector},
};
