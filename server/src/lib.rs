//! # UiClass Server
//! The authority side of uiclass. Owns the canonical copy of every class
//! instance, sends replicated field changes to all connected observers and
//! answers their join-in-progress sync requests.

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

mod connection;
mod error;
mod events;
mod observer;
mod server;

pub use error::ServerError;
pub use events::Events;
pub use observer::ObserverKey;
pub use server::{Server, ServerConfig};
