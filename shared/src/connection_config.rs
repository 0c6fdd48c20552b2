/// Contains Config properties which will be used by a Server or Client
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// Upper bound on the number of messages packed into one packet
    pub max_messages_per_packet: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_messages_per_packet: 64,
        }
    }
}
