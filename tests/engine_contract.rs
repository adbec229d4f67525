//! The CRUD contract, run against every backing store.
//!
//! Each backend gets its own module generated by `contract_tests!`, with a
//! fresh, isolated store per test.

use codable_store::{BackingStore, CodableStore, KvEngine, Record, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub name: String,
    pub number: i64,
}

impl Record for TestRecord {
    const NAMESPACE: &'static str = "TestRecord";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
}

impl Record for Address {
    const NAMESPACE: &'static str = "Address";
}

pub fn record(name: &str, number: i64) -> TestRecord {
    TestRecord {
        name: name.to_string(),
        number,
    }
}

macro_rules! contract_tests {
    ($backend:ident, $open:expr) => {
        mod $backend {
            use super::*;

            fn engine() -> KvEngine<Box<dyn BackingStore>> {
                let store: Box<dyn BackingStore> = $open;
                KvEngine::new(store)
            }

            fn store() -> CodableStore<TestRecord, KvEngine<Box<dyn BackingStore>>> {
                CodableStore::with_engine(engine())
            }

            #[test]
            fn create_and_read() {
                let store = store();
                let codable = record("A name", 64);
                store.create("qwerty", &codable).unwrap();
                assert_eq!(store.read("qwerty").unwrap(), Some(codable));
            }

            #[test]
            fn create_fails_on_second_insert() {
                let store = store();
                let first = record("A name", 64);
                store.create("qwerty", &first).unwrap();

                let err = store.create("qwerty", &record("second", 2)).unwrap_err();
                assert!(matches!(err, StoreError::ItemAlreadyExists { .. }));
                assert_eq!(store.read("qwerty").unwrap(), Some(first));
            }

            #[test]
            fn update_existing() {
                let store = store();
                store.create("qwerty", &record("A name", 64)).unwrap();

                let updated = record("fire-at-will", 777);
                store.update("qwerty", &updated).unwrap();
                assert_eq!(store.read("qwerty").unwrap(), Some(updated));
            }

            #[test]
            fn update_fails_when_missing() {
                let store = store();
                let err = store.update("qwerty", &record("A name", 64)).unwrap_err();
                assert!(matches!(err, StoreError::ItemDoesNotExist { .. }));
                assert_eq!(store.read("qwerty").unwrap(), None);
            }

            #[test]
            fn update_or_insert_inserts_then_overwrites() {
                let store = store();
                let first = record("A name", 64);
                store.update_or_insert("qwerty", &first).unwrap();
                assert_eq!(store.read("qwerty").unwrap(), Some(first));

                let second = record("fire-at-will", 777);
                store.update_or_insert("qwerty", &second).unwrap();
                assert_eq!(store.read("qwerty").unwrap(), Some(second));
            }

            #[test]
            fn delete_existing() {
                let store = store();
                let codable = record("A name", 64);
                store.create("qwerty", &codable).unwrap();
                assert_eq!(store.read("qwerty").unwrap(), Some(codable));

                store.delete("qwerty").unwrap();
                assert_eq!(store.read("qwerty").unwrap(), None);
            }

            #[test]
            fn delete_missing_is_noop() {
                let store = store();
                store.delete("qwerty").unwrap();
                store.delete("qwerty").unwrap();
                assert_eq!(store.read("qwerty").unwrap(), None);
            }

            #[test]
            fn same_id_different_types() {
                let engine = std::sync::Arc::new(engine());
                let records = CodableStore::<TestRecord, _>::with_engine(engine.clone());
                let addresses = CodableStore::<Address, _>::with_engine(engine);

                let r = record("A name", 64);
                let a = Address {
                    street: "Infinite Loop".to_string(),
                };
                records.create("x", &r).unwrap();
                addresses.create("x", &a).unwrap();

                assert_eq!(records.read("x").unwrap(), Some(r));
                assert_eq!(addresses.read("x").unwrap(), Some(a));

                addresses.delete("x").unwrap();
                assert!(records.read("x").unwrap().is_some());
            }

            #[test]
            fn fetch_all_ids_with_three_items() {
                let store = store();
                store.create("id1", &record("Ada Lovelace", 999)).unwrap();
                store.create("id2", &record("Grace Hopper", 100)).unwrap();
                store.create("id3", &record("Alan Turing", 1)).unwrap();

                let ids = store.fetch_all_ids().unwrap();
                let expected: HashSet<String> =
                    ["id1", "id2", "id3"].iter().map(|s| s.to_string()).collect();
                assert_eq!(ids, expected);
            }

            #[test]
            fn fetch_all_ids_empty() {
                assert!(store().fetch_all_ids().unwrap().is_empty());
            }

            #[test]
            fn fetch_all_ids_ignores_other_types() {
                let engine = std::sync::Arc::new(engine());
                let records = CodableStore::<TestRecord, _>::with_engine(engine.clone());
                let addresses = CodableStore::<Address, _>::with_engine(engine);

                records.create("r1", &record("A name", 64)).unwrap();
                addresses
                    .create("a1", &Address { street: "Main".to_string() })
                    .unwrap();

                let ids = records.fetch_all_ids().unwrap();
                assert_eq!(ids.len(), 1);
                assert!(ids.contains("r1"));
            }

            #[test]
            fn fetch_all_entries_with_three_items() {
                let store = store();
                let first = record("Ada Lovelace", 999);
                let second = record("Grace Hopper", 100);
                let third = record("Alan Turing", 1);
                store.create("id1", &first).unwrap();
                store.create("id2", &second).unwrap();
                store.create("id3", &third).unwrap();

                let entries = store.fetch_all_entries().unwrap();
                assert_eq!(entries.len(), 3);
                assert_eq!(entries["id1"], Some(first));
                assert_eq!(entries["id2"], Some(second));
                assert_eq!(entries["id3"], Some(third));
            }

            #[test]
            fn fetch_all_entries_empty() {
                assert!(store().fetch_all_entries().unwrap().is_empty());
            }

            #[test]
            fn full_lifecycle() {
                let store = store();
                let original = record("A name", 64);
                store.create("qwerty", &original).unwrap();
                assert_eq!(store.read("qwerty").unwrap(), Some(original));

                let updated = record("fire-at-will", 777);
                store.update("qwerty", &updated).unwrap();
                assert_eq!(store.read("qwerty").unwrap(), Some(updated));

                store.delete("qwerty").unwrap();
                assert_eq!(store.read("qwerty").unwrap(), None);
            }
        }
    };
}

contract_tests!(memory, Box::new(codable_store::MemoryStore::new()));

contract_tests!(defaults_suite, {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let name = format!(
        "engine_contract::{}",
        NEXT.fetch_add(1, Ordering::SeqCst)
    );
    codable_store::DefaultsStore::remove_persistent_domain(&name).unwrap();
    Box::new(codable_store::DefaultsStore::suite(&name))
});

contract_tests!(
    sled,
    Box::new(codable_store::SledStore::temporary().unwrap())
);
