use uiclass_client::ClientConfig;
use uiclass_shared::{args, Color, TypedValue};
use uiclass_test::{exchange_packets, LocalSocketHub, TestClient, TestServer, RANK};

fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

#[test]
fn pushes_wait_for_the_instance_to_exist() {
    init_logging();
    let hub = LocalSocketHub::new();
    let mut server = TestServer::new(&hub);
    let mut client = TestClient::new(&hub, 22001);

    let id = server.new_instance(RANK, &args!["Admin"]).unwrap().id();
    server
        .instance_mut(RANK, id)
        .unwrap()
        .set("Color", args!["#00ff00"]);

    client.connect(server.address());
    exchange_packets(&mut server, &mut [&mut client]);

    // Name, Color and Immunity of an instance the observer hasn't created
    assert_eq!(client.pending_pushes(), 3);
    assert!(client.take_events().take_updates().is_empty());

    let rank = client.new_instance(RANK, &[]).unwrap();
    assert_eq!(rank.id(), id);
    assert_eq!(rank.get("Name"), Some(TypedValue::from("Admin")));
    assert_eq!(
        rank.get("Color"),
        Some(TypedValue::Color(Color::rgb(0, 255, 0)))
    );

    assert_eq!(client.pending_pushes(), 0);
    assert_eq!(client.take_events().take_updates().len(), 3);
}

#[test]
fn buffered_pushes_replay_in_arrival_order() {
    init_logging();
    let hub = LocalSocketHub::new();
    let mut server = TestServer::new(&hub);
    let mut client = TestClient::new(&hub, 22002);
    let id = server.new_instance(RANK, &[]).unwrap().id();

    client.connect(server.address());
    exchange_packets(&mut server, &mut [&mut client]);

    for name in ["first", "second", "last"] {
        server
            .instance_mut(RANK, id)
            .unwrap()
            .set("Name", args![name]);
    }
    exchange_packets(&mut server, &mut [&mut client]);

    let rank = client.new_instance(RANK, &[]).unwrap();
    assert_eq!(rank.get("Name"), Some(TypedValue::from("last")));
}

#[test]
fn full_waitlist_drops_new_pushes() {
    init_logging();
    let hub = LocalSocketHub::new();
    let mut server = TestServer::new(&hub);
    let client_config = ClientConfig {
        max_pending_pushes: 2,
        ..Default::default()
    };
    let mut client = TestClient::with_config(&hub, 22003, client_config);
    server.new_instance(RANK, &args!["Admin"]).unwrap();

    client.connect(server.address());
    exchange_packets(&mut server, &mut [&mut client]);
    assert_eq!(client.pending_pushes(), 2);

    client.new_instance(RANK, &[]).unwrap();
    assert_eq!(client.pending_pushes(), 0);
    assert_eq!(client.take_events().take_updates().len(), 2);
}

#[test]
fn disconnecting_clears_the_waitlist() {
    init_logging();
    let hub = LocalSocketHub::new();
    let mut server = TestServer::new(&hub);
    let mut client = TestClient::new(&hub, 22004);
    server.new_instance(RANK, &[]).unwrap();

    client.connect(server.address());
    exchange_packets(&mut server, &mut [&mut client]);
    assert!(client.pending_pushes() > 0);

    client.disconnect();
    assert_eq!(client.pending_pushes(), 0);
}

#[test]
fn pushes_for_removed_instances_are_dropped() {
    init_logging();
    let hub = LocalSocketHub::new();
    let mut server = TestServer::new(&hub);
    let client_config = ClientConfig {
        max_pending_pushes: 3,
        ..Default::default()
    };
    let mut client = TestClient::with_config(&hub, 22005, client_config);
    let removed = server.new_instance(RANK, &[]).unwrap().id();
    server.new_instance(RANK, &[]).unwrap();
    client.new_instance(RANK, &[]).unwrap();
    client.new_instance(RANK, &[]).unwrap();

    client.connect(server.address());
    exchange_packets(&mut server, &mut [&mut client]);
    client.take_events();

    client.registry_mut().remove_instance(RANK, removed).unwrap();
    for name in ["one", "two", "three"] {
        server
            .instance_mut(RANK, removed)
            .unwrap()
            .set("Name", args![name]);
    }
    exchange_packets(&mut server, &mut [&mut client]);
    assert_eq!(client.pending_pushes(), 0);
    assert!(client.take_events().take_updates().is_empty());

    // an early push for a new instance still finds room
    let fresh = server.new_instance(RANK, &args!["Fresh"]).unwrap().id();
    exchange_packets(&mut server, &mut [&mut client]);
    assert_eq!(client.pending_pushes(), 1);

    let rank = client.new_instance(RANK, &[]).unwrap();
    assert_eq!(rank.id(), fresh);
    assert_eq!(rank.get("Name"), Some(TypedValue::from("Fresh")));
}
