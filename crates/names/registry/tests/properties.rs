//! Registry contract tests: uniqueness, pricing, ownership, conservation of
//! value, enumeration order and the end-to-end deploy scenario.

use std::sync::Arc;

use names_registry::{
    Amount, Identity, LedgerCarrier, NameRegistry, RegisterRequest, RegistryError,
    RegistryErrorKind, RegistryEvent, UpdateRecordRequest,
};
use proptest::prelude::*;

fn id(s: &str) -> Identity {
    Identity::new(s).unwrap()
}

fn amount(s: &str) -> Amount {
    Amount::parse(s).unwrap()
}

fn register(name: &str, record: &str, avatar: &str, value: &str, caller: &str) -> RegisterRequest {
    RegisterRequest::new(name, amount(value), id(caller))
        .with_record(record)
        .with_avatar(avatar)
}

fn update(name: &str, record: &str, avatar: &str, caller: &str) -> UpdateRecordRequest {
    UpdateRecordRequest {
        name: name.to_string(),
        record: record.to_string(),
        avatar: avatar.to_string(),
        caller: id(caller),
    }
}

#[tokio::test]
async fn second_registration_of_a_name_fails_and_keeps_the_first_owner() {
    let registry = NameRegistry::new(id("admin"));
    registry
        .register(register("dance", "r1", "a1", "0.01", "alice"))
        .await
        .unwrap();

    for (caller, value) in [("bob", "0.01"), ("alice", "5"), ("carol", "0.01")] {
        let err = registry
            .register(register("dance", "hijack", "hijack", value, caller))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), RegistryErrorKind::NameAlreadyTaken);
    }

    let record = registry.get_record("dance").await.unwrap();
    assert_eq!(record.owner, id("alice"));
    assert_eq!(record.record, "r1");
    assert_eq!(record.avatar, "a1");
    assert_eq!(registry.balance().await, amount("0.01"));
}

#[tokio::test]
async fn pricing_follows_name_length() {
    let registry = NameRegistry::new(id("admin"));

    let err = registry
        .register(register("abc", "", "", "0.049", "alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::InsufficientPayment { .. }));
    assert!(registry.get_record("abc").await.is_err());
    assert!(registry.balance().await.is_zero());

    registry
        .register(register("abc", "", "", "0.05", "alice"))
        .await
        .unwrap();
    registry
        .register(register("abcd", "", "", "0.03", "alice"))
        .await
        .unwrap();
    let err = registry
        .register(register("abcde", "", "", "0.009", "alice"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), RegistryErrorKind::InsufficientPayment);

    for value in ["0", "0.05", "1000"] {
        let err = registry
            .register(register("ab", "", "", value, "alice"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), RegistryErrorKind::NameTooShort);
    }

    assert_eq!(registry.price("ab").unwrap_err().kind(), RegistryErrorKind::NameTooShort);
    assert_eq!(registry.price("abc").unwrap(), amount("0.05"));
    assert_eq!(registry.price("abcd").unwrap(), amount("0.03"));
    assert_eq!(registry.price("readyto").unwrap(), amount("0.01"));
}

#[tokio::test]
async fn only_the_owner_can_update() {
    let registry = NameRegistry::new(id("admin"));
    registry
        .register(register("dance", "r1", "a1", "0.01", "owner-a"))
        .await
        .unwrap();

    let err = registry
        .update_record(update("dance", "r2", "a2", "caller-b"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), RegistryErrorKind::NotOwner);
    let record = registry.get_record("dance").await.unwrap();
    assert_eq!((record.record.as_str(), record.avatar.as_str()), ("r1", "a1"));

    // the administrator has no special rights over records
    let err = registry
        .update_record(update("dance", "r2", "a2", "admin"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), RegistryErrorKind::NotOwner);

    let updated = registry
        .update_record(update("dance", "r2", "a2", "owner-a"))
        .await
        .unwrap();
    assert_eq!((updated.record.as_str(), updated.avatar.as_str()), ("r2", "a2"));
    assert_eq!(updated.owner, id("owner-a"));
    assert_eq!(updated.name, "dance");

    let err = registry
        .update_record(update("missing", "r", "a", "owner-a"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), RegistryErrorKind::NameNotFound);
}

#[tokio::test]
async fn non_administrator_withdrawals_never_move_value() {
    let registry = NameRegistry::new(id("admin"));
    registry
        .register(register("abc", "", "", "0.05", "alice"))
        .await
        .unwrap();

    for caller in ["alice", "bob", "Admin", "admin "] {
        let err = registry.withdraw(id(caller)).await.unwrap_err();
        assert_eq!(err.kind(), RegistryErrorKind::NotAuthorized);
        assert_eq!(registry.balance().await, amount("0.05"));
    }

    assert_eq!(registry.withdraw(id("admin")).await.unwrap(), amount("0.05"));
    let err = registry.withdraw(id("admin")).await.unwrap_err();
    assert_eq!(err.kind(), RegistryErrorKind::NothingToWithdraw);

    // a non-administrator is told they are not authorized even when empty
    let err = registry.withdraw(id("alice")).await.unwrap_err();
    assert_eq!(err.kind(), RegistryErrorKind::NotAuthorized);
}

#[tokio::test]
async fn list_all_keeps_registration_order_across_updates() {
    let registry = NameRegistry::new(id("admin"));
    let names = ["zulu", "alpha", "mike", "bravo"];
    for name in names {
        registry
            .register(register(name, "", "", "0.03", "alice"))
            .await
            .unwrap();
    }

    for _ in 0..3 {
        registry
            .update_record(update("alpha", "x", "y", "alice"))
            .await
            .unwrap();
        registry
            .update_record(update("zulu", "p", "q", "alice"))
            .await
            .unwrap();
    }

    let listed = registry.list_all().await;
    let listed_names: Vec<_> = listed.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(listed_names, names);
    let ids: Vec<_> = listed.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert_eq!(registry.names().await, names);
}

#[tokio::test]
async fn repeated_identical_update_is_equivalent_to_one() {
    let once = NameRegistry::new(id("admin"));
    let twice = NameRegistry::new(id("admin"));
    for registry in [&once, &twice] {
        registry
            .register(register("dance", "r1", "a1", "0.01", "alice"))
            .await
            .unwrap();
    }

    once.update_record(update("dance", "r2", "a2", "alice"))
        .await
        .unwrap();
    twice
        .update_record(update("dance", "r2", "a2", "alice"))
        .await
        .unwrap();
    twice
        .update_record(update("dance", "r2", "a2", "alice"))
        .await
        .unwrap();

    let a = once.get_record("dance").await.unwrap();
    let b = twice.get_record("dance").await.unwrap();
    assert_eq!((a.record, a.avatar), (b.record, b.avatar));
    assert_eq!(once.last_sequence().await, twice.last_sequence().await);
    assert_eq!(once.custody().await, twice.custody().await);
}

#[tokio::test]
async fn readyto_scenario() {
    let carrier = Arc::new(LedgerCarrier::new());
    let registry = NameRegistry::builder(id("admin"))
        .carrier(carrier.clone())
        .open()
        .await
        .unwrap();
    let mut events = registry.subscribe();

    registry
        .register(register("readyto", "", "", "0.01", "owner"))
        .await
        .unwrap();
    assert_eq!(registry.balance().await, amount("0.01"));

    registry
        .update_record(update("readyto", "Am I?", "", "owner"))
        .await
        .unwrap();
    assert_eq!(registry.get_record("readyto").await.unwrap().record, "Am I?");
    assert_eq!(registry.owner_of("readyto").await.unwrap(), id("owner"));
    assert_eq!(registry.namespace().qualified("readyto"), "readyto.dance");

    let err = registry.withdraw(id("random-person")).await.unwrap_err();
    assert_eq!(err.kind(), RegistryErrorKind::NotAuthorized);
    assert_eq!(registry.balance().await, amount("0.01"));

    assert_eq!(registry.withdraw(id("admin")).await.unwrap(), amount("0.01"));
    assert!(registry.balance().await.is_zero());
    assert_eq!(carrier.paid_to(&id("admin")).await, amount("0.01"));

    let kinds: Vec<_> = [
        events.recv().await.unwrap(),
        events.recv().await.unwrap(),
        events.recv().await.unwrap(),
    ]
    .into_iter()
    .map(|envelope| (envelope.sequence, envelope.event.kind()))
    .collect();
    assert_eq!(
        kinds,
        vec![(1, "registered"), (2, "updated"), (3, "withdrawn")]
    );

    match &registry.events_since(2).await[0].event {
        RegistryEvent::Withdrawn { amount: paid, to } => {
            assert_eq!(*paid, amount("0.01"));
            assert_eq!(to, &id("admin"));
        }
        other => panic!("unexpected event {:?}", other),
    }
    registry.verify().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_registrations_have_exactly_one_winner() {
    let registry = Arc::new(NameRegistry::new(id("admin")));

    let mut handles = Vec::new();
    for i in 0..32 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            registry
                .register(RegisterRequest::new(
                    "contested",
                    Amount::parse("0.01").unwrap(),
                    Identity::new(format!("racer-{}", i)).unwrap(),
                ))
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(err) => assert_eq!(err.kind(), RegistryErrorKind::NameAlreadyTaken),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(registry.len().await, 1);
    assert_eq!(registry.balance().await, amount("0.01"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_and_withdrawals_conserve_value() {
    let carrier = Arc::new(LedgerCarrier::new());
    let registry = Arc::new(
        NameRegistry::builder(id("admin"))
            .carrier(carrier.clone())
            .open()
            .await
            .unwrap(),
    );

    let mut handles = Vec::new();
    for i in 0..40 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            if i % 5 == 0 {
                let _ = registry.withdraw(Identity::new("admin").unwrap()).await;
            } else {
                registry
                    .register(RegisterRequest::new(
                        format!("name-{}", i),
                        Amount::parse("0.01").unwrap(),
                        Identity::new("alice").unwrap(),
                    ))
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let custody = registry.custody().await;
    assert_eq!(custody.total_received, amount("0.32"));
    assert_eq!(
        custody.balance,
        custody.total_received.checked_sub(custody.total_withdrawn).unwrap()
    );
    assert_eq!(carrier.paid_to(&id("admin")).await, custody.total_withdrawn);
    registry.verify().await.unwrap();
}

#[derive(Debug, Clone)]
enum Op {
    Register { name: usize, caller: usize, value_milli: u64 },
    Withdraw { caller: usize },
}

fn op_strategy() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            (0usize..6, 0usize..3, 0u64..80).prop_map(|(name, caller, value_milli)| Op::Register {
                name,
                caller,
                value_milli
            }),
            (0usize..3).prop_map(|caller| Op::Withdraw { caller }),
        ],
        0..30,
    )
}

const NAMES: [&str; 6] = ["ab", "abc", "abcd", "dance", "readyto", "lordof"];
const CALLERS: [&str; 3] = ["admin", "alice", "bob"];

proptest! {
    #[test]
    fn property_value_is_conserved(ops in op_strategy()) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");

        rt.block_on(async move {
            let carrier = Arc::new(LedgerCarrier::new());
            let registry = NameRegistry::builder(id("admin"))
                .carrier(carrier.clone())
                .open()
                .await
                .expect("registry");

            let mut accepted = Amount::ZERO;
            let mut withdrawn = Amount::ZERO;
            let mut owners = std::collections::HashMap::new();

            for op in ops {
                match op {
                    Op::Register { name, caller, value_milli } => {
                        let value = Amount::from_base_units(u128::from(value_milli) * 1_000_000_000_000_000);
                        let before = registry.balance().await;
                        let result = registry
                            .register(RegisterRequest::new(NAMES[name], value, id(CALLERS[caller])))
                            .await;
                        match result {
                            Ok(record) => {
                                assert!(!owners.contains_key(NAMES[name]));
                                owners.insert(NAMES[name], record.owner);
                                accepted = accepted.checked_add(value).unwrap();
                            }
                            Err(_) => assert_eq!(registry.balance().await, before),
                        }
                    }
                    Op::Withdraw { caller } => {
                        let before = registry.balance().await;
                        match registry.withdraw(id(CALLERS[caller])).await {
                            Ok(paid) => {
                                assert_eq!(CALLERS[caller], "admin");
                                assert_eq!(paid, before);
                                withdrawn = withdrawn.checked_add(paid).unwrap();
                            }
                            Err(_) => assert_eq!(registry.balance().await, before),
                        }
                    }
                }
            }

            assert_eq!(
                registry.balance().await,
                accepted.checked_sub(withdrawn).unwrap()
            );
            assert_eq!(carrier.paid_to(&id("admin")).await, withdrawn);
            assert!(registry.get_record("ab").await.is_err());
            for (name, owner) in owners {
                assert_eq!(registry.owner_of(name).await.unwrap(), owner);
            }
            registry.verify().await.unwrap();
        });
    }
}
