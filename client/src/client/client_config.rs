use std::default::Default;

use uiclass_shared::ConnectionConfig;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Sends a sync request on every replication channel right after
    /// `connect()`
    pub request_sync_on_connect: bool,
    /// Upper bound on value pushes buffered for instances that don't exist
    /// locally yet
    pub max_pending_pushes: usize,
    /// Used to configure the connection with the Server
    pub connection: ConnectionConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_sync_on_connect: true,
            max_pending_pushes: 1024,
            connection: ConnectionConfig::default(),
        }
    }
}
