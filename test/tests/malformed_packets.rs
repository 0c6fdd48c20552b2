use uiclass_client::ClientError;
use uiclass_shared::{
    args, BitWriter, Serde, SerdeErr, TypedValue, UnsignedInteger, UnsignedVariableInteger,
};
use uiclass_test::{exchange_packets, LocalSocketHub, TestClient, TestServer, RANK};

fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

/// A packet whose message count runs past its end
fn truncated_packet() -> Box<[u8]> {
    let mut writer = BitWriter::new();
    UnsignedVariableInteger::<7>::new(50u32).ser(&mut writer);
    writer.to_bytes()
}

fn connected_pair(hub: &LocalSocketHub, port: u16) -> (TestServer, TestClient) {
    let mut server = TestServer::new(hub);
    let mut client = TestClient::new(hub, port);
    server.new_instance(RANK, &args!["Admin"]).unwrap();
    client.new_instance(RANK, &[]).unwrap();

    client.connect(server.address());
    exchange_packets(&mut server, &mut [&mut client]);
    client.take_events();
    server.take_events();
    (server, client)
}

#[test]
fn malformed_packet_is_dropped_by_the_observer() {
    init_logging();
    let hub = LocalSocketHub::new();
    let (mut server, mut client) = connected_pair(&hub, 23001);

    hub.inject(server.address(), &client.address(), &truncated_packet());
    client.receive_all_packets();

    let errors = client.take_events().take_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ClientError::MalformedPacket { .. }));

    // the connection keeps working
    let id = client.registry().instance_ids(RANK).unwrap()[0];
    server
        .instance_mut(RANK, id)
        .unwrap()
        .set("Name", args!["Owner"]);
    exchange_packets(&mut server, &mut [&mut client]);
    assert_eq!(
        client.instance(RANK, id).unwrap().get("Name"),
        Some(TypedValue::from("Owner"))
    );
}

#[test]
fn malformed_packet_is_dropped_by_the_authority() {
    init_logging();
    let hub = LocalSocketHub::new();
    let (mut server, mut client) = connected_pair(&hub, 23002);

    hub.inject(client.address(), &server.address(), &truncated_packet());
    exchange_packets(&mut server, &mut [&mut client]);

    assert!(server.take_events().is_empty());
    assert_eq!(server.observers_count(), 1);
}

#[test]
fn packets_from_strangers_are_ignored() {
    init_logging();
    let hub = LocalSocketHub::new();
    let (_server, mut client) = connected_pair(&hub, 23003);

    let stranger = "127.0.0.1:23999".parse().unwrap();
    hub.inject(stranger, &client.address(), &[1, 0]);
    client.receive_all_packets();

    assert!(client.take_events().is_empty());
}

#[test]
fn unsupported_value_is_skipped_without_losing_the_packet() {
    init_logging();
    let hub = LocalSocketHub::new();
    let (server, mut client) = connected_pair(&hub, 23004);
    let name_channel = client.registry().channel_kinds().kind_of("Rank.Name").unwrap();
    let id = client.registry().instance_ids(RANK).unwrap()[0];

    let mut writer = BitWriter::new();
    UnsignedVariableInteger::<7>::new(2u32).ser(&mut writer);
    // a value push whose value tag only a newer build knows
    UnsignedInteger::<2>::new(3u8).ser(&mut writer);
    name_channel.ser(&mut writer);
    id.ser(&mut writer);
    200u8.ser(&mut writer);
    UnsignedVariableInteger::<7>::new(8u32).ser(&mut writer);
    0xabu8.ser(&mut writer);
    // followed by a regular one
    UnsignedInteger::<2>::new(3u8).ser(&mut writer);
    name_channel.ser(&mut writer);
    id.ser(&mut writer);
    TypedValue::from("Owner").ser(&mut writer);

    hub.inject(server.address(), &client.address(), &writer.to_bytes());
    client.receive_all_packets();

    let mut events = client.take_events();
    assert_eq!(
        events.take_errors(),
        vec![ClientError::UnsupportedValue {
            channel: name_channel,
            instance_id: id,
            reason: SerdeErr::UnknownTag {
                type_name: "TypedValue",
                tag: 200,
            },
        }]
    );
    assert_eq!(events.take_updates(), vec![(name_channel, id)]);
    assert_eq!(
        client.instance(RANK, id).unwrap().get("Name"),
        Some(TypedValue::from("Owner"))
    );
}

#[test]
fn messages_ahead_of_a_framing_error_are_applied() {
    init_logging();
    let hub = LocalSocketHub::new();
    let (server, mut client) = connected_pair(&hub, 23005);
    let name_channel = client.registry().channel_kinds().kind_of("Rank.Name").unwrap();
    let id = client.registry().instance_ids(RANK).unwrap()[0];

    let mut writer = BitWriter::new();
    UnsignedVariableInteger::<7>::new(2u32).ser(&mut writer);
    UnsignedInteger::<2>::new(3u8).ser(&mut writer);
    name_channel.ser(&mut writer);
    id.ser(&mut writer);
    TypedValue::from("Owner").ser(&mut writer);
    // a value push cut off before its value
    UnsignedInteger::<2>::new(3u8).ser(&mut writer);
    name_channel.ser(&mut writer);
    id.ser(&mut writer);

    hub.inject(server.address(), &client.address(), &writer.to_bytes());
    client.receive_all_packets();

    let mut events = client.take_events();
    let errors = events.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ClientError::MalformedPacket { .. }));
    assert_eq!(events.take_updates(), vec![(name_channel, id)]);
    assert_eq!(
        client.instance(RANK, id).unwrap().get("Name"),
        Some(TypedValue::from("Owner"))
    );
}
