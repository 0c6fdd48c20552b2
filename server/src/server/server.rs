use std::{collections::HashMap, net::SocketAddr};

use log::{debug, info, trace, warn};

use uiclass_shared::{
    read_packet, ChannelKind, ClassError, ClassRegistry, HostType, IncomingMessage, InstanceId,
    InstanceMut, InstanceRef, Io, PacketReceiver, PacketSender, Protocol, ReplicationMessage,
    TypedValue,
};

use crate::{
    connection::connection::Connection, events::Events, ObserverKey, ServerConfig, ServerError,
};

/// The authority. Owns the canonical copy of every instance, broadcasts
/// replicated field changes to all connected observers and answers their
/// sync requests.
pub struct Server {
    server_config: ServerConfig,
    io: Io,
    registry: ClassRegistry,
    // Observers
    connections: HashMap<SocketAddr, Connection>,
    observer_addresses: HashMap<ObserverKey, SocketAddr>,
    next_observer_key: u64,
    // Events
    incoming_events: Events,
}

impl Server {
    /// Create a new Server, locking the protocol if needed
    ///
    /// # Panics
    ///
    /// Panics if the protocol can't be locked, see `try_new`
    pub fn new<P: Into<Protocol>>(server_config: ServerConfig, protocol: P) -> Self {
        match Self::try_new(server_config, protocol) {
            Ok(server) => server,
            Err(error) => panic!("{}", error),
        }
    }

    pub fn try_new<P: Into<Protocol>>(
        server_config: ServerConfig,
        protocol: P,
    ) -> Result<Self, ServerError> {
        let mut protocol: Protocol = protocol.into();
        if !protocol.is_locked() {
            protocol.try_lock()?;
        }
        let registry = ClassRegistry::new(HostType::Authority, &protocol)?;

        Ok(Self {
            server_config,
            io: Io::new(),
            registry,
            connections: HashMap::new(),
            observer_addresses: HashMap::new(),
            next_observer_key: 0,
            incoming_events: Events::new(),
        })
    }

    pub fn io_load(&mut self, sender: Box<dyn PacketSender>, receiver: Box<dyn PacketReceiver>) {
        self.io.load(sender, receiver);
    }

    /// Returns whether or not the Server has initialized correctly and is
    /// listening for Observers
    pub fn is_listening(&self) -> bool {
        self.io.is_loaded()
    }

    // Instances

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ClassRegistry {
        &mut self.registry
    }

    pub fn new_instance(
        &mut self,
        class_name: &str,
        args: &[TypedValue],
    ) -> Result<InstanceMut<'_>, ClassError> {
        self.registry.new_instance(class_name, args)
    }

    pub fn instance(&self, class_name: &str, id: InstanceId) -> Result<InstanceRef<'_>, ClassError> {
        self.registry.instance(class_name, id)
    }

    pub fn instance_mut(
        &mut self,
        class_name: &str,
        id: InstanceId,
    ) -> Result<InstanceMut<'_>, ClassError> {
        self.registry.instance_mut(class_name, id)
    }

    // Observers

    /// Return a list of all currently connected Observers' keys
    pub fn observer_keys(&self) -> Vec<ObserverKey> {
        self.observer_addresses.keys().copied().collect()
    }

    pub fn observers_count(&self) -> usize {
        self.connections.len()
    }

    pub fn observer_address(&self, observer_key: &ObserverKey) -> Option<SocketAddr> {
        self.observer_addresses.get(observer_key).copied()
    }

    /// Forgets an observer. It has to send a new Connect to receive updates
    /// again.
    pub fn disconnect_observer(&mut self, observer_key: &ObserverKey) {
        let Some(address) = self.observer_addresses.get(observer_key).copied() else {
            warn!("Attempted to disconnect unknown observer {:?}", observer_key);
            return;
        };
        self.remove_connection(&address);
    }

    // Packets

    /// Reads all incoming packets, handling connects, disconnects and sync
    /// requests
    pub fn receive_all_packets(&mut self) {
        // changes committed before this point go out before any sync answer
        self.broadcast_mutations();

        loop {
            match self.io.recv_packet() {
                Ok(Some((address, payload))) => {
                    let Ok(messages) = read_packet(&payload) else {
                        warn!("Server Error: cannot read malformed packet from {}", address);
                        continue;
                    };
                    for message in messages {
                        self.process_message(&address, message);
                    }
                }
                Ok(None) => {
                    // No more packets, break loop
                    break;
                }
                Err(error) => {
                    self.incoming_events.push_error(error.into());
                    break;
                }
            }
        }
    }

    /// Returns all events since the last call
    pub fn take_events(&mut self) -> Events {
        std::mem::replace(&mut self.incoming_events, Events::new())
    }

    /// Sends all queued messages to all Observers. If you don't call this
    /// method, the Server will never communicate with its connected
    /// Observers
    pub fn send_all_packets(&mut self) {
        self.broadcast_mutations();

        let mut addresses: Vec<SocketAddr> = self.connections.keys().copied().collect();

        // shuffle order of connections in order to avoid priority among observers
        fastrand::shuffle(&mut addresses);

        for address in addresses {
            let Some(connection) = self.connections.get_mut(&address) else {
                continue;
            };
            if let Err(error) = connection.send_packets(&self.io, &self.server_config.connection) {
                warn!("Server Error: Cannot send packets to {}: {}", address, error);
                self.incoming_events.push_error(error.into());
            }
        }
    }

    // Private

    fn process_message(&mut self, address: &SocketAddr, message: IncomingMessage) {
        let message = match message {
            IncomingMessage::Message(message) => message,
            IncomingMessage::Unsupported { channel, .. } => {
                warn!(
                    "Server Error: observer {} sent an unsupported push on {:?}",
                    address, channel
                );
                return;
            }
        };

        match message {
            ReplicationMessage::Connect => self.accept_connection(address),
            ReplicationMessage::Disconnect => self.remove_connection(address),
            ReplicationMessage::SyncRequest { channel } => self.answer_sync_request(address, channel),
            ReplicationMessage::ValuePush { channel, .. } => {
                // observers never originate replicated state
                warn!(
                    "Server Error: ignoring value push from observer {} on {:?}",
                    address, channel
                );
            }
        }
    }

    fn accept_connection(&mut self, address: &SocketAddr) {
        if self.connections.contains_key(address) {
            // reconnect, start over with fresh sync state
            self.remove_connection(address);
        }

        if let Some(max_observers) = self.server_config.max_observers {
            if self.connections.len() >= max_observers {
                warn!("Refusing connection from {}, observer limit reached", address);
                self.incoming_events
                    .push_error(ServerError::ObserverLimitReached { address: *address });
                return;
            }
        }

        let observer_key = ObserverKey::new(self.next_observer_key);
        self.next_observer_key += 1;

        info!("Observer {:?} connected from {}", observer_key, address);
        self.connections
            .insert(*address, Connection::new(address, &observer_key));
        self.observer_addresses.insert(observer_key, *address);
        self.incoming_events.push_connection(&observer_key);
    }

    fn remove_connection(&mut self, address: &SocketAddr) {
        let Some(connection) = self.connections.remove(address) else {
            debug!("Disconnect from unknown address {}", address);
            return;
        };
        info!("Observer {:?} disconnected", connection.observer_key);
        self.observer_addresses.remove(&connection.observer_key);
        self.incoming_events
            .push_disconnection(&connection.observer_key, *address);
    }

    fn answer_sync_request(&mut self, address: &SocketAddr, channel: ChannelKind) {
        let Some(connection) = self.connections.get_mut(address) else {
            warn!("Server Error: sync request from unconnected address {}", address);
            return;
        };

        let snapshot = match self.registry.snapshot(channel) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!("Server Error: cannot answer sync request from {}: {}", address, error);
                self.incoming_events.push_error(error.into());
                return;
            }
        };

        if !connection.mark_sync_answered(channel) {
            debug!(
                "Ignoring duplicate sync request on {:?} from {:?}",
                channel, connection.observer_key
            );
            return;
        }

        debug!(
            "Answering sync request on {:?} from {:?} with {} values",
            channel,
            connection.observer_key,
            snapshot.len()
        );
        for (instance_id, value) in snapshot {
            connection.queue_message(ReplicationMessage::ValuePush {
                channel,
                instance_id,
                value,
            });
        }
        self.incoming_events
            .push_sync_request(&connection.observer_key, channel);
    }

    fn broadcast_mutations(&mut self) {
        let mutations = self.registry.take_mutations();
        if mutations.is_empty() || self.connections.is_empty() {
            return;
        }

        for mutation in mutations {
            trace!(
                "Broadcasting {:?} of {} to {} observers",
                mutation.channel,
                mutation.instance_id,
                self.connections.len()
            );
            for connection in self.connections.values_mut() {
                connection.queue_message(ReplicationMessage::ValuePush {
                    channel: mutation.channel,
                    instance_id: mutation.instance_id,
                    value: mutation.value.clone(),
                });
            }
        }
    }
}
