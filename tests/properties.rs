use json_kv_store::{JsonFileStore, KeyValueStore, MemoryStore, Value, MAX_FLOAT};
use proptest::prelude::*;
use std::cmp::Ordering;

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-MAX_FLOAT..=MAX_FLOAT).prop_map(Value::Float),
        ".{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{0,6}", inner), 0..4)
                .prop_map(|entries| entries.into_iter().collect::<Value>()),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn json_file_round_trip(value in json_value()) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        store.set("k", value.clone()).unwrap();
        prop_assert_eq!(store.get("k").unwrap(), Some(value.clone()));

        // And again through a fresh handle.
        let reopened = JsonFileStore::new(dir.path().join("data.json"));
        prop_assert_eq!(reopened.get("k").unwrap(), Some(value));
    }

    #[test]
    fn json_file_rejects_big_floats(f in prop_oneof![
        (MAX_FLOAT * 1.0001)..f64::MAX,
        f64::MIN..(-MAX_FLOAT * 1.0001),
    ]) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileStore::new(&path);
        prop_assert!(store.set("f", Value::Float(f)).is_err());
        prop_assert!(!path.exists());
    }

    #[test]
    fn sort_orders_values(values in prop::collection::vec(json_value(), 0..12), ascending in any::<bool>()) {
        let store = MemoryStore::new();
        for (i, v) in values.iter().enumerate() {
            store.set(&format!("k{i}"), v.clone()).unwrap();
        }
        store.sort(ascending).unwrap();

        let sorted: Vec<Value> = store
            .keys()
            .unwrap()
            .iter()
            .map(|k| store.get(k).unwrap().unwrap())
            .collect();
        prop_assert_eq!(sorted.len(), values.len());
        for pair in sorted.windows(2) {
            let ord = pair[0].total_cmp(&pair[1]);
            if ascending {
                prop_assert_ne!(ord, Ordering::Greater);
            } else {
                prop_assert_ne!(ord, Ordering::Less);
            }
        }
    }

    #[test]
    fn total_cmp_is_antisymmetric(a in json_value(), b in json_value()) {
        prop_assert_eq!(a.total_cmp(&b), b.total_cmp(&a).reverse());
        prop_assert_eq!(a.total_cmp(&a), Ordering::Equal);
    }

    #[test]
    fn get_multiple_or_fail_keeps_request_order(present in prop::collection::btree_set("[a-z]{1,4}", 1..8)) {
        let store = MemoryStore::new();
        for (i, k) in present.iter().enumerate() {
            store.set(k, Value::Int(i as i64)).unwrap();
        }
        let requested: Vec<&str> = present.iter().rev().map(String::as_str).collect();
        let got = store.get_multiple_or_fail(&requested).unwrap();
        let got_keys: Vec<&str> = got.iter().map(|(k, _)| k.as_str()).collect();
        prop_assert_eq!(got_keys, requested);
    }
}
