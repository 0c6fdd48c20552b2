use std::default::Default;

use uiclass_shared::ConnectionConfig;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Connections beyond this many observers are refused. `None` means no
    /// limit.
    pub max_observers: Option<usize>,
    /// Used to configure the connections with Observers
    pub connection: ConnectionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_observers: None,
            connection: ConnectionConfig::default(),
        }
    }
}
