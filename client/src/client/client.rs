use std::{
    collections::{HashSet, VecDeque},
    net::SocketAddr,
};

use log::{debug, info, trace, warn};

use uiclass_shared::{
    read_packet_prefix, write_packets, ChannelKind, ClassError, ClassRegistry, HostType,
    IncomingMessage, InstanceId, InstanceMut, InstanceRef, Io, PacketReceiver, PacketSender,
    Protocol, PushWaitlist, ReplicationMessage, SetOutcome, TypedValue,
};

use crate::{ClientConfig, ClientError, Events};

/// An observer. Mirrors replicated fields from one authority and never
/// sends state back.
pub struct Client {
    client_config: ClientConfig,
    io: Io,
    registry: ClassRegistry,
    server_address: Option<SocketAddr>,
    // channels a sync was requested on since the last connect
    requested_syncs: HashSet<ChannelKind>,
    outgoing_messages: VecDeque<ReplicationMessage>,
    waitlist: PushWaitlist,
    incoming_events: Events,
}

impl Client {
    /// Create a new Client, locking the protocol if needed
    ///
    /// # Panics
    ///
    /// Panics if the protocol can't be locked, see `try_new`
    pub fn new<P: Into<Protocol>>(client_config: ClientConfig, protocol: P) -> Self {
        match Self::try_new(client_config, protocol) {
            Ok(client) => client,
            Err(error) => panic!("{}", error),
        }
    }

    pub fn try_new<P: Into<Protocol>>(
        client_config: ClientConfig,
        protocol: P,
    ) -> Result<Self, ClientError> {
        let mut protocol: Protocol = protocol.into();
        if !protocol.is_locked() {
            protocol.try_lock()?;
        }
        let registry = ClassRegistry::new(HostType::Observer, &protocol)?;
        let waitlist = PushWaitlist::new(client_config.max_pending_pushes);

        Ok(Self {
            client_config,
            io: Io::new(),
            registry,
            server_address: None,
            requested_syncs: HashSet::new(),
            outgoing_messages: VecDeque::new(),
            waitlist,
            incoming_events: Events::new(),
        })
    }

    pub fn io_load(&mut self, sender: Box<dyn PacketSender>, receiver: Box<dyn PacketReceiver>) {
        self.io.load(sender, receiver);
    }

    // Connection

    /// Connects (or reconnects) to an authority. Sync requests for every
    /// channel follow unless `request_sync_on_connect` is off.
    pub fn connect(&mut self, server_address: SocketAddr) {
        if self.server_address.is_some() {
            info!("Reconnecting to {}", server_address);
        } else {
            info!("Connecting to {}", server_address);
        }
        self.server_address = Some(server_address);
        self.requested_syncs.clear();
        self.outgoing_messages.clear();
        self.outgoing_messages.push_back(ReplicationMessage::Connect);

        if self.client_config.request_sync_on_connect {
            self.request_sync_all();
        }
    }

    /// Tells the authority to stop sending updates. Anything still queued
    /// is sent first.
    pub fn disconnect(&mut self) {
        if self.server_address.is_none() {
            warn!("Client Error: disconnect() called while not connected");
            return;
        }
        self.outgoing_messages
            .push_back(ReplicationMessage::Disconnect);
        self.send_all_packets();

        self.server_address = None;
        self.requested_syncs.clear();
        self.waitlist.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.server_address.is_some()
    }

    pub fn server_address(&self) -> Option<SocketAddr> {
        self.server_address
    }

    /// Asks for the current value of every live instance on a channel.
    /// Returns false if a sync was already requested since connecting.
    pub fn request_sync(&mut self, channel: ChannelKind) -> bool {
        if self.server_address.is_none() {
            warn!("Client Error: cannot request sync on {:?} while not connected", channel);
            return false;
        }
        if self.registry.channel_kinds().route(channel).is_none() {
            warn!("Client Error: cannot request sync on unknown channel {:?}", channel);
            return false;
        }
        if !self.requested_syncs.insert(channel) {
            return false;
        }
        self.outgoing_messages
            .push_back(ReplicationMessage::SyncRequest { channel });
        true
    }

    pub fn request_sync_all(&mut self) {
        let channels: Vec<ChannelKind> = self.registry.channel_kinds().kinds().collect();
        for channel in channels {
            self.request_sync(channel);
        }
    }

    // Instances

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ClassRegistry {
        &mut self.registry
    }

    /// Creates a local instance, then applies any pushes that arrived for
    /// its id before it existed
    pub fn new_instance(
        &mut self,
        class_name: &str,
        args: &[TypedValue],
    ) -> Result<InstanceMut<'_>, ClassError> {
        let instance_id = self.registry.new_instance(class_name, args)?.id();

        if let Some(class_kind) = self.registry.class_kinds().kind_of(class_name) {
            if let Some(pushes) = self.waitlist.take(class_kind, instance_id) {
                debug!(
                    "Applying {} buffered pushes to {} {}",
                    pushes.len(),
                    class_name,
                    instance_id
                );
                for (channel, value) in pushes {
                    self.apply_push(channel, instance_id, value);
                }
            }
        }

        self.registry.instance_mut(class_name, instance_id)
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

    /// Number of pushes waiting for their instance to be created
    pub fn pending_pushes(&self) -> usize {
        self.waitlist.len()
    }

    // Packets

    /// Reads all incoming packets and applies the value pushes they carry.
    /// Messages ahead of a framing error in a packet are still applied.
    pub fn receive_all_packets(&mut self) {
        loop {
            match self.io.recv_packet() {
                Ok(Some((address, payload))) => {
                    if self.server_address != Some(address) {
                        warn!("Client Error: dropping packet from unexpected address {}", address);
                        continue;
                    }
                    let (messages, error) = read_packet_prefix(&payload);
                    for message in messages {
                        self.process_message(message);
                    }
                    if let Some(reason) = error {
                        warn!("Client Error: cannot read malformed packet: {}", reason);
                        self.incoming_events
                            .push_error(ClientError::MalformedPacket { reason });
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

    /// Sends queued connect / sync messages to the Server
    pub fn send_all_packets(&mut self) {
        let Some(server_address) = self.server_address else {
            return;
        };
        if self.outgoing_messages.is_empty() {
            return;
        }

        let messages: Vec<ReplicationMessage> = self.outgoing_messages.drain(..).collect();
        let max_messages = self.client_config.connection.max_messages_per_packet;
        for packet in write_packets(&messages, max_messages) {
            if let Err(error) = self.io.send_packet(&server_address, &packet) {
                warn!("Client Error: Cannot send packet to {}: {}", server_address, error);
                self.incoming_events.push_error(error.into());
                return;
            }
        }
    }

    // Private

    fn process_message(&mut self, message: IncomingMessage) {
        match message {
            IncomingMessage::Message(ReplicationMessage::ValuePush {
                channel,
                instance_id,
                value,
            }) => self.apply_push(channel, instance_id, value),
            IncomingMessage::Message(message) => {
                warn!("Client Error: ignoring unexpected message {:?}", message);
            }
            IncomingMessage::Unsupported {
                channel,
                instance_id,
                reason,
            } => {
                warn!(
                    "Client Error: skipping unsupported value for {} on {:?}: {}",
                    instance_id, channel, reason
                );
                self.incoming_events.push_error(ClientError::UnsupportedValue {
                    channel,
                    instance_id,
                    reason,
                });
            }
        }
    }

    fn apply_push(&mut self, channel: ChannelKind, instance_id: InstanceId, value: TypedValue) {
        let Some(route) = self.registry.channel_kinds().route(channel) else {
            warn!("Client Error: value push on unknown channel {:?}", channel);
            self.incoming_events
                .push_error(ClassError::UnknownChannel { channel }.into());
            return;
        };

        if self.registry.is_retired(route.class, instance_id) {
            debug!("Dropping push for removed instance {} on {:?}", instance_id, channel);
            return;
        }

        if !self.registry.has_instance(route.class, instance_id) {
            trace!("Buffering push for unknown instance {} on {:?}", instance_id, channel);
            self.waitlist.queue(route.class, instance_id, channel, value);
            return;
        }

        match self.registry.apply_remote(channel, instance_id, value) {
            Ok(SetOutcome::Accepted) => self.incoming_events.push_update(channel, instance_id),
            Ok(SetOutcome::Rejected(rejection)) => {
                debug!(
                    "Remote value for {} on {:?} rejected locally: {:?}",
                    instance_id, channel, rejection
                );
            }
            Err(error) => {
                warn!("Client Error: {}", error);
                self.incoming_events.push_error(error.into());
            }
        }
    }
}
