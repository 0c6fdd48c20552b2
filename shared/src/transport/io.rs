use std::net::SocketAddr;

use log::warn;

use super::{PacketReceiver, PacketSender, TransportError};

/// Holds the packet sender/receiver pair of a server or client
#[derive(Default)]
pub struct Io {
    packet_sender: Option<Box<dyn PacketSender>>,
    packet_receiver: Option<Box<dyn PacketReceiver>>,
}

impl Io {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(
        &mut self,
        packet_sender: Box<dyn PacketSender>,
        packet_receiver: Box<dyn PacketReceiver>,
    ) {
        if self.is_loaded() {
            warn!("Io was already loaded, replacing packet sender/receiver");
        }
        self.packet_sender = Some(packet_sender);
        self.packet_receiver = Some(packet_receiver);
    }

    pub fn is_loaded(&self) -> bool {
        self.packet_sender.is_some() && self.packet_receiver.is_some()
    }

    pub fn send_packet(&self, address: &SocketAddr, payload: &[u8]) -> Result<(), TransportError> {
        let Some(sender) = &self.packet_sender else {
            return Err(TransportError::NotLoaded);
        };
        sender.send(address, payload)
    }

    pub fn recv_packet(&mut self) -> Result<Option<(SocketAddr, Box<[u8]>)>, TransportError> {
        let Some(receiver) = &mut self.packet_receiver else {
            return Err(TransportError::NotLoaded);
        };
        receiver.receive()
    }
}
