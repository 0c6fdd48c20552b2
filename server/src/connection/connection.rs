use std::{
    collections::{HashSet, VecDeque},
    net::SocketAddr,
};

use uiclass_shared::{
    write_packets, ChannelKind, ConnectionConfig, Io, ReplicationMessage, TransportError,
};

use crate::ObserverKey;

/// Authority-side state of one connected observer
pub struct Connection {
    pub address: SocketAddr,
    pub observer_key: ObserverKey,
    // channels whose full sync has already been sent on this connection
    answered_syncs: HashSet<ChannelKind>,
    outgoing_messages: VecDeque<ReplicationMessage>,
}

impl Connection {
    pub fn new(address: &SocketAddr, observer_key: &ObserverKey) -> Self {
        Self {
            address: *address,
            observer_key: *observer_key,
            answered_syncs: HashSet::new(),
            outgoing_messages: VecDeque::new(),
        }
    }

    /// Marks the channel as synced, returns false if it already was
    pub fn mark_sync_answered(&mut self, channel: ChannelKind) -> bool {
        self.answered_syncs.insert(channel)
    }

    pub fn queue_message(&mut self, message: ReplicationMessage) {
        self.outgoing_messages.push_back(message);
    }

    /// Writes every queued message, in order
    pub fn send_packets(&mut self, io: &Io, config: &ConnectionConfig) -> Result<(), TransportError> {
        if self.outgoing_messages.is_empty() {
            return Ok(());
        }
        let messages: Vec<ReplicationMessage> = self.outgoing_messages.drain(..).collect();
        for packet in write_packets(&messages, config.max_messages_per_packet) {
            io.send_packet(&self.address, &packet)?;
        }
        Ok(())
    }
}
