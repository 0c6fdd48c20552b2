use super::{TestClient, TestServer};

/// One full round trip: clients send, the server receives and answers,
/// clients receive
pub fn exchange_packets(server: &mut TestServer, clients: &mut [&mut TestClient]) {
    for client in clients.iter_mut() {
        client.send_all_packets();
    }

    server.receive_all_packets();
    server.send_all_packets();

    for client in clients.iter_mut() {
        client.receive_all_packets();
    }
}

pub fn exchange_packets_n_times(
    server: &mut TestServer,
    clients: &mut [&mut TestClient],
    n: usize,
) {
    for _ in 0..n {
        exchange_packets(server, clients);
    }
}
