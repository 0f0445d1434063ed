use domain::LocationSample;
use locus_storage::{InMemoryTrackingStore, LocationStore};

fn sample(device_id: &str, timestamp: i64) -> LocationSample {
    LocationSample {
        latitude: 48.85 + timestamp as f64 * 0.0001,
        longitude: 2.35,
        timestamp,
        device_id: device_id.to_string(),
    }
}

#[tokio::test]
async fn latest_round_trips_and_marks_active() {
    let store = InMemoryTrackingStore::new();
    let input = sample("dev-1", 1000);
    store.put_latest(&input).await.expect("put latest");

    let fetched = store
        .get_latest("dev-1")
        .await
        .expect("get")
        .expect("sample");
    assert_eq!(fetched, input);

    let active = store.list_active_devices().await.expect("active");
    assert_eq!(active, vec!["dev-1"]);
}

#[tokio::test]
async fn latest_is_last_write_wins() {
    let store = InMemoryTrackingStore::new();
    store
        .put_latest(&sample("dev-1", 1000))
        .await
        .expect("put");
    store
        .put_latest(&sample("dev-1", 2000))
        .await
        .expect("put");

    let fetched = store
        .get_latest("dev-1")
        .await
        .expect("get")
        .expect("sample");
    assert_eq!(fetched.timestamp, 2000);
}

#[tokio::test]
async fn history_is_capped_to_highest_timestamps() {
    let store = InMemoryTrackingStore::new();
    for timestamp in 1..=10 {
        store
            .append_history(&sample("dev-1", timestamp * 1000), 5)
            .await
            .expect("append");
    }

    assert_eq!(store.history_len("dev-1").await.expect("len"), 5);
    let history = store.get_history("dev-1", 100).await.expect("history");
    let timestamps: Vec<i64> = history.iter().map(|entry| entry.timestamp).collect();
    // 保留的是时间戳最大的 5 条，按新→旧返回
    assert_eq!(timestamps, vec![10_000, 9_000, 8_000, 7_000, 6_000]);
}

#[tokio::test]
async fn history_returns_descending_with_limit() {
    let store = InMemoryTrackingStore::new();
    for timestamp in [3_000, 1_000, 2_000] {
        store
            .append_history(&sample("dev-1", timestamp), 1440)
            .await
            .expect("append");
    }

    let history = store.get_history("dev-1", 2).await.expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].timestamp, 3_000);
    assert_eq!(history[1].timestamp, 2_000);

    let all = store.get_history("dev-1", 100).await.expect("history");
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn identical_sample_reappend_is_idempotent() {
    let store = InMemoryTrackingStore::new();
    let input = sample("dev-1", 1000);
    store.append_history(&input, 1440).await.expect("append");
    store.append_history(&input, 1440).await.expect("append");

    assert_eq!(store.history_len("dev-1").await.expect("len"), 1);
}

#[tokio::test]
async fn equal_timestamps_are_both_retained() {
    let store = InMemoryTrackingStore::new();
    let mut first = sample("dev-1", 1000);
    first.latitude = 10.0;
    let mut second = sample("dev-1", 1000);
    second.latitude = 20.0;
    store.append_history(&first, 1440).await.expect("append");
    store.append_history(&second, 1440).await.expect("append");

    let history = store.get_history("dev-1", 100).await.expect("history");
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|entry| entry.timestamp == 1000));
}

#[tokio::test]
async fn unknown_device_has_empty_history() {
    let store = InMemoryTrackingStore::new();
    assert!(store.get_latest("ghost").await.expect("get").is_none());
    assert!(store.get_history("ghost", 100).await.expect("history").is_empty());
    assert_eq!(store.history_len("ghost").await.expect("len"), 0);
    assert!(store
        .list_active_devices()
        .await
        .expect("active")
        .is_empty());
}
