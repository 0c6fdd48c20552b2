//! # UiClass Client
//! The observer side of uiclass. Connects to an authority, requests a full
//! sync of every replication channel and applies incoming value pushes
//! through the local setter pipeline, so change callbacks fire exactly as
//! they do on the authority.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use uiclass_shared::{
        args, coerce, AccessorDescriptor, ClassBuilder, ClassError, ClassRegistry,
        CollectionDescriptor, ConnectionConfig, HostType, InstanceId, InstanceMut, InstanceRef,
        Outcome, PacketReceiver, PacketSender, Protocol, Rejection, SetOutcome, TransportError,
        TypedValue,
    };
}

mod client;
mod error;
mod events;

pub use client::{Client, ClientConfig};
pub use error::ClientError;
pub use events::Events;
