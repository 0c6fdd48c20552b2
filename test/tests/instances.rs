use uiclass_shared::{
    args, ClassError, ClassRegistry, HostType, InstanceId, SetOutcome, TypedValue,
};
use uiclass_test::{protocol, test_protocol::PANEL, RANK};

fn registry(host_type: HostType) -> ClassRegistry {
    let mut protocol = protocol();
    protocol.lock();
    ClassRegistry::new(host_type, &protocol).unwrap()
}

fn ids(values: &[u32]) -> Vec<InstanceId> {
    values.iter().copied().map(InstanceId::new).collect()
}

#[test]
fn ids_are_assigned_in_creation_order() {
    let mut registry = registry(HostType::Authority);

    let created: Vec<InstanceId> = (0..5)
        .map(|_| registry.new_instance(RANK, &[]).unwrap().id())
        .collect();
    assert_eq!(created, ids(&[1, 2, 3, 4, 5]));

    // each class counts on its own
    assert_eq!(registry.new_instance(PANEL, &[]).unwrap().id(), InstanceId::new(1));
}

#[test]
fn removed_ids_are_never_reused() {
    let mut registry = registry(HostType::Authority);
    for _ in 0..3 {
        registry.new_instance(RANK, &[]).unwrap();
    }

    registry.remove_instance(RANK, InstanceId::new(2)).unwrap();
    assert_eq!(
        registry.new_instance(RANK, &[]).unwrap().id(),
        InstanceId::new(4)
    );
    assert_eq!(registry.instance_ids(RANK).unwrap(), ids(&[1, 3, 4]));

    assert_eq!(
        registry.instance(RANK, InstanceId::new(2)).err(),
        Some(ClassError::UnknownInstance {
            class: RANK.to_string(),
            id: InstanceId::new(2),
        })
    );
    assert_eq!(
        registry.remove_instance(RANK, InstanceId::new(2)),
        Err(ClassError::UnknownInstance {
            class: RANK.to_string(),
            id: InstanceId::new(2),
        })
    );
}

#[test]
fn unknown_classes_are_errors() {
    let mut registry = registry(HostType::Observer);
    assert_eq!(
        registry.new_instance("Badge", &[]).err(),
        Some(ClassError::UnknownClass {
            name: "Badge".to_string()
        })
    );
}

#[test]
fn initializer_receives_constructor_arguments() {
    let mut registry = registry(HostType::Authority);
    let id = registry.new_instance(RANK, &args!["Admin"]).unwrap().id();
    let plain = registry.new_instance(RANK, &[]).unwrap().id();

    assert_eq!(
        registry.instance(RANK, id).unwrap().get("Name"),
        Some(TypedValue::from("Admin"))
    );
    assert_eq!(
        registry.instance(RANK, plain).unwrap().get("Name"),
        Some(TypedValue::from("Unnamed"))
    );
}

#[test]
fn collection_keeps_insertion_order() {
    let mut registry = registry(HostType::Authority);
    let mut rank = registry.new_instance(RANK, &[]).unwrap();

    rank.add("Permission", args!["a"]).add("Permission", args!["b"]);
    rank.add("Permission", args!["c"]).add("Permission", args!["d"]);

    assert_eq!(
        rank.get_all("Permissions"),
        args!["a", "b", "c", "d"].as_slice()
    );
}

#[test]
fn set_all_is_all_or_nothing() {
    let mut registry = registry(HostType::Authority);
    let mut rank = registry.new_instance(RANK, &[]).unwrap();

    assert_eq!(
        rank.try_set_all("Permissions", args!["kick", "ban"]),
        Ok(SetOutcome::Accepted)
    );
    assert!(!rank
        .try_set_all("Permissions", args!["mute", args!["nested"]])
        .unwrap()
        .is_accepted());
    assert_eq!(rank.get_all("Permissions"), args!["kick", "ban"].as_slice());

    // numbers stringify
    rank.set_all("Permissions", args![1, 2]);
    assert_eq!(rank.get_all("Permissions"), args!["1", "2"].as_slice());

    // collections are local state only
    drop(rank);
    assert!(registry.take_mutations().is_empty());
}

#[test]
fn unknown_collection_names_are_errors() {
    let mut registry = registry(HostType::Authority);
    let mut rank = registry.new_instance(RANK, &[]).unwrap();

    assert_eq!(
        rank.try_add("Permissions", args!["kick"]),
        Err(ClassError::UnknownCollection {
            class: RANK.to_string(),
            name: "Permissions".to_string(),
        })
    );
    assert_eq!(
        rank.try_get_all("Badges"),
        Err(ClassError::UnknownCollection {
            class: RANK.to_string(),
            name: "Badges".to_string(),
        })
    );
}
