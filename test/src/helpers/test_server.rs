use std::{
    net::SocketAddr,
    ops::{Deref, DerefMut},
};

use uiclass_server::{Server, ServerConfig};

use crate::{local_socket::LocalSocketHub, test_protocol::protocol};

pub const SERVER_ADDRESS: &str = "127.0.0.1:14191";

/// Server bound to a `LocalSocketHub`, serving the test protocol
pub struct TestServer {
    server: Server,
    address: SocketAddr,
}

impl TestServer {
    pub fn new(hub: &LocalSocketHub) -> Self {
        Self::with_config(hub, ServerConfig::default())
    }

    pub fn with_config(hub: &LocalSocketHub, server_config: ServerConfig) -> Self {
        let address: SocketAddr = SERVER_ADDRESS.parse().unwrap();
        let socket = hub.bind(address);

        let mut server = Server::new(server_config, protocol());
        server.io_load(socket.sender, socket.receiver);

        Self { server, address }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }
}

impl Deref for TestServer {
    type Target = Server;

    fn deref(&self) -> &Server {
        &self.server
    }
}

impl DerefMut for TestServer {
    fn deref_mut(&mut self) -> &mut Server {
        &mut self.server
    }
}
