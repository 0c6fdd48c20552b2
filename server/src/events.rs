use std::{mem, net::SocketAddr};

use uiclass_shared::ChannelKind;

use crate::{ObserverKey, ServerError};

pub struct Events {
    connections: Vec<ObserverKey>,
    disconnections: Vec<(ObserverKey, SocketAddr)>,
    sync_requests: Vec<(ObserverKey, ChannelKind)>,
    errors: Vec<ServerError>,
    empty: bool,
}

impl Events {
    pub(crate) fn new() -> Self {
        Self {
            connections: Vec::new(),
            disconnections: Vec::new(),
            sync_requests: Vec::new(),
            errors: Vec::new(),
            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn take_connections(&mut self) -> Vec<ObserverKey> {
        mem::take(&mut self.connections)
    }

    pub fn take_disconnections(&mut self) -> Vec<(ObserverKey, SocketAddr)> {
        mem::take(&mut self.disconnections)
    }

    /// Sync requests that were answered. Duplicates are not reported.
    pub fn take_sync_requests(&mut self) -> Vec<(ObserverKey, ChannelKind)> {
        mem::take(&mut self.sync_requests)
    }

    pub fn take_errors(&mut self) -> Vec<ServerError> {
        mem::take(&mut self.errors)
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self, observer_key: &ObserverKey) {
        self.connections.push(*observer_key);
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, observer_key: &ObserverKey, address: SocketAddr) {
        self.disconnections.push((*observer_key, address));
        self.empty = false;
    }

    pub(crate) fn push_sync_request(&mut self, observer_key: &ObserverKey, channel: ChannelKind) {
        self.sync_requests.push((*observer_key, channel));
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: ServerError) {
        self.errors.push(error);
        self.empty = false;
    }
}
