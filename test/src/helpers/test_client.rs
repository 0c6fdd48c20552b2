use std::{
    net::SocketAddr,
    ops::{Deref, DerefMut},
};

use uiclass_client::{Client, ClientConfig};

use crate::{local_socket::LocalSocketHub, test_protocol::protocol};

/// Client bound to a `LocalSocketHub` at `127.0.0.1:{port}`
pub struct TestClient {
    client: Client,
    address: SocketAddr,
}

impl TestClient {
    pub fn new(hub: &LocalSocketHub, port: u16) -> Self {
        Self::with_config(hub, port, ClientConfig::default())
    }

    pub fn with_config(hub: &LocalSocketHub, port: u16, client_config: ClientConfig) -> Self {
        let address = SocketAddr::from(([127, 0, 0, 1], port));
        let socket = hub.bind(address);

        let mut client = Client::new(client_config, protocol());
        client.io_load(socket.sender, socket.receiver);

        Self { client, address }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }
}

impl Deref for TestClient {
    type Target = Client;

    fn deref(&self) -> &Client {
        &self.client
    }
}

impl DerefMut for TestClient {
    fn deref_mut(&mut self) -> &mut Client {
        &mut self.client
    }
}
