use std::sync::{Arc, Mutex};

use uiclass_shared::{args, ChannelKind, Color, InstanceId, TypedValue};
use uiclass_test::{exchange_packets, LocalSocketHub, TestClient, TestServer, RANK};

fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

/// A server with one `Rank` instance and two observers that mirror it
fn setup() -> (TestServer, TestClient, TestClient, InstanceId) {
    init_logging();

    let hub = LocalSocketHub::new();
    let mut server = TestServer::new(&hub);
    let mut client_a = TestClient::new(&hub, 20001);
    let mut client_b = TestClient::new(&hub, 20002);

    let id = server.new_instance(RANK, &args!["Admin"]).unwrap().id();
    for client in [&mut client_a, &mut client_b] {
        assert_eq!(client.new_instance(RANK, &[]).unwrap().id(), id);
        client.connect(server.address());
    }

    exchange_packets(&mut server, &mut [&mut client_a, &mut client_b]);
    assert_eq!(server.observers_count(), 2);

    // discard the join sync
    client_a.take_events();
    client_b.take_events();
    server.take_events();

    (server, client_a, client_b, id)
}

fn channel(client: &TestClient, name: &str) -> ChannelKind {
    client.registry().channel_kinds().kind_of(name).unwrap()
}

#[test]
fn rank_color_reaches_both_observers() {
    let (mut server, mut client_a, mut client_b, id) = setup();
    let color_channel = channel(&client_a, "Rank.Color");

    server
        .instance_mut(RANK, id)
        .unwrap()
        .set("Color", args![255, 0, 0]);
    exchange_packets(&mut server, &mut [&mut client_a, &mut client_b]);

    let red = TypedValue::Color(Color::rgba(255, 0, 0, 255));
    for client in [&mut client_a, &mut client_b] {
        assert_eq!(
            client.take_events().take_updates(),
            vec![(color_channel, id)]
        );
        assert_eq!(client.instance(RANK, id).unwrap().get("Color"), Some(red.clone()));
    }
}

#[test]
fn one_push_per_observer_per_successful_set() {
    let (mut server, mut client_a, mut client_b, id) = setup();
    let name_channel = channel(&client_a, "Rank.Name");
    let immunity_channel = channel(&client_a, "Rank.Immunity");

    {
        let mut rank = server.instance_mut(RANK, id).unwrap();
        rank.set("Name", args!["Owner"]);
        // vetoed, must not be replicated
        rank.set("Immunity", args![500]);
        rank.set("Immunity", args![90]);
        // local-only field
        rank.set("Hidden", args![true]);
    }
    exchange_packets(&mut server, &mut [&mut client_a, &mut client_b]);

    for client in [&mut client_a, &mut client_b] {
        assert_eq!(
            client.take_events().take_updates(),
            vec![(name_channel, id), (immunity_channel, id)]
        );
        let rank = client.instance(RANK, id).unwrap();
        assert_eq!(rank.get("Name"), Some(TypedValue::from("Owner")));
        assert_eq!(rank.get("Immunity"), Some(TypedValue::Number(90.0)));
        assert!(!rank.is("Hidden"));
    }
}

#[test]
fn observer_callbacks_fire_on_remote_values() {
    let (mut server, mut client_a, mut client_b, id) = setup();

    let changes = Arc::new(Mutex::new(Vec::new()));
    let changes_clone = changes.clone();
    client_a
        .instance_mut(RANK, id)
        .unwrap()
        .on_change("Name", move |_, new, old| {
            changes_clone.lock().unwrap().push((new.clone(), old.cloned()));
        });

    server
        .instance_mut(RANK, id)
        .unwrap()
        .set("Title", args!["Founder"]);
    exchange_packets(&mut server, &mut [&mut client_a, &mut client_b]);

    assert_eq!(
        *changes.lock().unwrap(),
        vec![(TypedValue::from("Founder"), Some(TypedValue::from("Admin")))]
    );
}

#[test]
fn applied_values_are_not_sent_back() {
    let (mut server, mut client_a, mut client_b, id) = setup();

    server
        .instance_mut(RANK, id)
        .unwrap()
        .set("Name", args!["Owner"]);
    exchange_packets(&mut server, &mut [&mut client_a, &mut client_b]);

    for client in [&mut client_a, &mut client_b] {
        assert!(client.registry_mut().take_mutations().is_empty());
        assert_eq!(client.take_events().take_updates().len(), 1);
    }

    // a local set on an observer stays local
    client_a
        .instance_mut(RANK, id)
        .unwrap()
        .set("Name", args!["Impostor"]);
    exchange_packets(&mut server, &mut [&mut client_a, &mut client_b]);

    assert!(server.take_events().is_empty());
    assert_eq!(
        server.instance(RANK, id).unwrap().get("Name"),
        Some(TypedValue::from("Owner"))
    );
    assert_eq!(
        client_b.instance(RANK, id).unwrap().get("Name"),
        Some(TypedValue::from("Owner"))
    );
    assert!(client_b.take_events().take_updates().is_empty());
}

#[test]
fn per_channel_order_is_preserved() {
    let (mut server, mut client_a, mut client_b, id) = setup();
    let name_channel = channel(&client_a, "Rank.Name");

    let names = ["one", "two", "three", "four"];
    for name in names {
        server
            .instance_mut(RANK, id)
            .unwrap()
            .set("Name", args![name]);
    }

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    client_a
        .instance_mut(RANK, id)
        .unwrap()
        .on_change("Name", move |_, new, _| {
            seen_clone.lock().unwrap().push(new.clone());
        });
    exchange_packets(&mut server, &mut [&mut client_a, &mut client_b]);

    let expected: Vec<TypedValue> = names.iter().map(|name| TypedValue::from(*name)).collect();
    assert_eq!(*seen.lock().unwrap(), expected);
    assert_eq!(client_a.take_events().take_updates(), vec![(name_channel, id); 4]);
}
