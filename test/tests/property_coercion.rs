/// Property-based tests: coercion and instance id invariants
///
/// Key invariants:
/// 1. Every coercion is idempotent: `coerce(coerce(x)) == coerce(x)`
/// 2. Instance ids strictly increase and are never reused, whatever the mix
///    of creations and removals

use proptest::prelude::*;
use uiclass_shared::{coerce, ClassRegistry, HostType, InstanceId, TypedValue};
use uiclass_test::{protocol, RANK};

type CoerceFn = fn(&[TypedValue]) -> Option<TypedValue>;

const COERCIONS: [(&str, CoerceFn); 9] = [
    ("string", coerce::string),
    ("number", coerce::number),
    ("boolean", coerce::boolean),
    ("set", coerce::set),
    ("color", coerce::color),
    ("vector", coerce::vector),
    ("angle", coerce::angle),
    ("position", coerce::position),
    ("entity", coerce::entity),
];

// Strategy for raw scalar setter arguments
fn scalar_strategy() -> impl Strategy<Value = TypedValue> {
    prop_oneof![
        any::<bool>().prop_map(TypedValue::Bool),
        any::<i64>().prop_map(TypedValue::Int),
        (0u64..1_000_000).prop_map(TypedValue::UInt),
        any::<f64>().prop_map(TypedValue::Number),
        (-300.0f64..300.0).prop_map(TypedValue::Number),
        "[a-z0-9 #.]{0,9}".prop_map(TypedValue::String),
        "#[0-9a-f]{6}".prop_map(TypedValue::String),
    ]
}

// Strategy for argument lists, sometimes wrapped in a single list value
fn args_strategy() -> impl Strategy<Value = Vec<TypedValue>> {
    prop::collection::vec(scalar_strategy(), 0..5).prop_flat_map(|args| {
        let wrapped = vec![TypedValue::List(args.clone())];
        prop_oneof![Just(args), Just(wrapped)]
    })
}

#[derive(Clone, Debug)]
enum Op {
    Create,
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Create),
        1 => any::<usize>().prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn prop_coercions_are_idempotent(args in args_strategy()) {
        for (name, coercion) in COERCIONS {
            if let Some(value) = coercion(&args) {
                prop_assert_eq!(
                    coercion(std::slice::from_ref(&value)),
                    Some(value.clone()),
                    "{} is not idempotent for {:?}",
                    name,
                    args
                );
                prop_assert!(!matches!(value, TypedValue::Nil), "{} produced Nil", name);
            }
        }
    }

    #[test]
    fn prop_instance_ids_are_monotonic(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut protocol = protocol();
        protocol.lock();
        let mut registry = ClassRegistry::new(HostType::Authority, &protocol).unwrap();

        let mut issued: Vec<InstanceId> = Vec::new();
        for op in ops {
            match op {
                Op::Create => {
                    let id = registry.new_instance(RANK, &[]).unwrap().id();
                    if let Some(last) = issued.last() {
                        prop_assert!(id.value() > last.value());
                    }
                    issued.push(id);
                }
                Op::Remove(index) => {
                    let live = registry.instance_ids(RANK).unwrap();
                    if !live.is_empty() {
                        registry.remove_instance(RANK, live[index % live.len()]).unwrap();
                    }
                }
            }
        }

        let expected: Vec<u32> = (1..=issued.len() as u32).collect();
        let actual: Vec<u32> = issued.iter().map(InstanceId::value).collect();
        prop_assert_eq!(actual, expected);
    }
}
