//! Facade behaviour against a real Redis server.
//!
//! Run with `cargo test -- --ignored` on a host with Docker.

use redis_lab_service::models::{FieldValue, KeyTtl, RangeOrder};
use redis_lab_service::{DataStructureStore, RedisStore, StoreError};
use redis_utils::RedisSettings;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use testcontainers::{core::WaitFor, runners::AsyncRunner, ContainerAsync, GenericImage};

async fn start_redis() -> (ContainerAsync<GenericImage>, RedisStore) {
    let image = GenericImage::new("redis", "7-alpine")
        .with_exposed_port(6379)
        .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"));

    let container = image.start().await;
    let port = container.get_host_port_ipv4(6379).await;
    let settings = RedisSettings::new(format!("redis://127.0.0.1:{}/", port))
        .with_connect_timeout(Duration::from_secs(10));
    let conn = redis_utils::connect(&settings)
        .await
        .expect("redis connection");

    (container, RedisStore::new(conn))
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn delete_then_exists_is_false() {
    let (_redis, store) = start_redis().await;

    store.set_string("k", "v").await.unwrap();
    assert!(store.exists("k").await.unwrap());

    assert!(store.delete("k").await.unwrap());
    assert!(!store.exists("k").await.unwrap());
    assert!(!store.delete("k").await.unwrap());
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn string_round_trip_and_counters() {
    let (_redis, store) = start_redis().await;

    store.set_string("greeting", "hello").await.unwrap();
    assert_eq!(
        store.get_string("greeting").await.unwrap().as_deref(),
        Some("hello")
    );
    assert_eq!(store.get_string("missing").await.unwrap(), None);
    assert!(!store.exists("missing").await.unwrap());

    for expected in 1..=5 {
        assert_eq!(store.increment("hits").await.unwrap(), expected);
    }
    assert_eq!(store.increment_by("hits", 10).await.unwrap(), 15);

    let err = store.increment("greeting").await.unwrap_err();
    assert!(matches!(err, StoreError::WrongType(_)), "{err:?}");
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn ttl_sentinels_and_expiry() {
    let (_redis, store) = start_redis().await;

    assert_eq!(store.ttl("nonexistent").await.unwrap(), KeyTtl::Absent);
    assert_eq!(KeyTtl::Absent.as_seconds(), -2);

    store.set_string("forever", "x").await.unwrap();
    assert_eq!(store.ttl("forever").await.unwrap(), KeyTtl::Persistent);

    store
        .set_string_with_ttl("session", "abc", 60)
        .await
        .unwrap();
    match store.ttl("session").await.unwrap() {
        KeyTtl::Expiring(secs) => assert!(secs > 0 && secs <= 60),
        other => panic!("expected expiring key, got {other:?}"),
    }

    assert!(matches!(
        store.set_string_with_ttl("session", "abc", 0).await,
        Err(StoreError::InvalidArgument(_))
    ));

    for seconds in [0, -5] {
        assert!(matches!(
            store.expire("forever", seconds).await,
            Err(StoreError::InvalidArgument(_))
        ));
    }
    assert!(store.exists("forever").await.unwrap());

    assert!(store.expire("forever", 120).await.unwrap());
    assert!(!store.expire("nonexistent", 120).await.unwrap());
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn list_operations() {
    let (_redis, store) = start_redis().await;

    assert_eq!(
        store
            .push_to_list("queue", &strings(&["a", "b", "c"]))
            .await
            .unwrap(),
        3
    );
    assert_eq!(store.push_to_list("queue", &[]).await.unwrap(), 3);
    assert_eq!(
        store.list_range("queue", 0, -1).await.unwrap(),
        strings(&["a", "b", "c"])
    );
    assert!(store.list_range("queue", 10, 20).await.unwrap().is_empty());

    assert_eq!(
        store.pop_from_list("queue").await.unwrap().as_deref(),
        Some("a")
    );
    assert_eq!(store.list_size("queue").await.unwrap(), 2);
    assert_eq!(store.pop_from_list("empty").await.unwrap(), None);
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn set_membership_and_algebra() {
    let (_redis, store) = start_redis().await;

    store
        .add_to_set("a", &strings(&["x", "y", "x"]))
        .await
        .unwrap();
    assert_eq!(store.set_size("a").await.unwrap(), 2);
    assert!(store.is_set_member("a", "x").await.unwrap());
    assert!(!store.is_set_member("a", "z").await.unwrap());

    store.add_to_set("b", &strings(&["y", "z"])).await.unwrap();

    let ab: BTreeSet<String> = store.set_intersect("a", "b").await.unwrap().into_iter().collect();
    let ba: BTreeSet<String> = store.set_intersect("b", "a").await.unwrap().into_iter().collect();
    assert_eq!(ab, ba);

    assert_eq!(
        store.set_union("a", "b").await.unwrap(),
        strings(&["x", "y", "z"])
    );
    assert_eq!(store.set_difference("a", "b").await.unwrap(), strings(&["x"]));
    assert!(store.set_intersect("a", "missing").await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn sorted_set_rank_follows_score() {
    let (_redis, store) = start_redis().await;

    store.add_to_sorted_set("board", "carol", 30.0).await.unwrap();
    store.add_to_sorted_set("board", "alice", 10.0).await.unwrap();
    store.add_to_sorted_set("board", "bob", 20.0).await.unwrap();

    let alice = store.sorted_set_rank("board", "alice").await.unwrap().unwrap();
    let bob = store.sorted_set_rank("board", "bob").await.unwrap().unwrap();
    assert!(alice < bob);

    assert_eq!(
        store
            .sorted_set_range("board", 0, -1, RangeOrder::Descending)
            .await
            .unwrap(),
        strings(&["carol", "bob", "alice"])
    );
    assert_eq!(store.sorted_set_score("board", "bob").await.unwrap(), Some(20.0));
    assert_eq!(store.sorted_set_rank("board", "dave").await.unwrap(), None);
    assert_eq!(store.sorted_set_score("board", "dave").await.unwrap(), None);

    assert!(matches!(
        store.add_to_sorted_set("board", "nan", f64::NAN).await,
        Err(StoreError::InvalidArgument(_))
    ));
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn hash_values_keep_their_shape() {
    let (_redis, store) = start_redis().await;

    let mut fields = BTreeMap::new();
    fields.insert("name".to_string(), FieldValue::Text("Kim".into()));
    fields.insert("age".to_string(), FieldValue::Integer(30));
    fields.insert("active".to_string(), FieldValue::Bool(true));
    fields.insert("zip".to_string(), FieldValue::Text("00501".into()));
    store.set_hash_all("user:1", &fields).await.unwrap();
    store
        .set_hash_field("user:1", "city", FieldValue::from("Seoul"))
        .await
        .unwrap();

    let stored = store.get_hash_all("user:1").await.unwrap();
    assert_eq!(stored["age"], FieldValue::Integer(30));
    assert_eq!(stored["active"], FieldValue::Bool(true));
    assert_eq!(stored["city"], FieldValue::Text("Seoul".into()));
    assert_eq!(stored["zip"], FieldValue::Text("00501".into()));

    for text in ["007", "+1", "1.50"] {
        store
            .set_hash_field("user:1", "code", FieldValue::from(text))
            .await
            .unwrap();
        assert_eq!(
            store.get_hash_field("user:1", "code").await.unwrap(),
            Some(FieldValue::Text(text.to_string()))
        );
    }

    assert_eq!(
        store.hash_fields("user:1").await.unwrap(),
        strings(&["active", "age", "city", "code", "name", "zip"])
    );
    assert!(store.hash_field_exists("user:1", "age").await.unwrap());
    assert_eq!(store.get_hash_field("user:1", "phone").await.unwrap(), None);
    assert!(store.get_hash_all("missing").await.unwrap().is_empty());

    let err = store.list_size("user:1").await.unwrap_err();
    assert!(matches!(err, StoreError::WrongType(_)), "{err:?}");
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn hyperloglog_counts_unique_elements() {
    let (_redis, store) = start_redis().await;

    let changed = store
        .add_to_hyperloglog("visitors", &strings(&["u1", "u2", "u1"]))
        .await
        .unwrap();
    assert_eq!(changed, 1);
    assert_eq!(store.hyperloglog_count("visitors").await.unwrap(), 2);

    let changed = store
        .add_to_hyperloglog("visitors", &strings(&["u1"]))
        .await
        .unwrap();
    assert_eq!(changed, 0);
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn geo_radius_around_seoul() {
    let (_redis, store) = start_redis().await;

    store
        .add_geo_location("cities", 126.9780, 37.5665, "seoul")
        .await
        .unwrap();
    store
        .add_geo_location("cities", 127.1, 37.5, "gwangju")
        .await
        .unwrap();
    store
        .add_geo_location("cities", 129.0756, 35.1796, "busan")
        .await
        .unwrap();

    let hits = store
        .geo_radius("cities", 126.9780, 37.5665, 50.0)
        .await
        .unwrap();
    let names: Vec<&str> = hits.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names.first(), Some(&"seoul"));
    assert!(hits[0].distance_km < 0.01);
    assert!(names.contains(&"gwangju"));
    assert!(!names.contains(&"busan"));

    let distance = store
        .geo_distance("cities", "seoul", "gwangju")
        .await
        .unwrap()
        .unwrap();
    assert!(distance > 5.0 && distance < 20.0);
    assert_eq!(
        store.geo_distance("cities", "seoul", "atlantis").await.unwrap(),
        None
    );

    assert!(store
        .geo_radius_by_member("cities", "atlantis", 50.0)
        .await
        .unwrap()
        .is_empty());
    assert!(matches!(
        store.add_geo_location("cities", 0.0, 89.0, "pole").await,
        Err(StoreError::InvalidArgument(_))
    ));
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn ping_succeeds() {
    let (_redis, store) = start_redis().await;
    store.ping().await.unwrap();
}
