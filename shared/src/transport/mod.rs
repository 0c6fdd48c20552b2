use std::net::SocketAddr;

mod error;
mod io;

pub use error::TransportError;
pub use io::Io;

/// Sends raw packets to an address
pub trait PacketSender: Send + Sync {
    fn send(&self, address: &SocketAddr, payload: &[u8]) -> Result<(), TransportError>;
}

/// Receives raw packets, tagged with the address they came from
pub trait PacketReceiver: Send + Sync {
    /// `Ok(None)` when no packet is waiting
    fn receive(&mut self) -> Result<Option<(SocketAddr, Box<[u8]>)>, TransportError>;
}
