use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use survey_core::VisitCounters;
use survey_store::{
    LocalStorage, MemoryStorage, RemoteError, VisitCounter, VisitOutcome, UV_RECORDED_KEY,
    VISITOR_ID_KEY,
};
use survey_test_utils::{configured_bin, InMemoryDocumentStore};

fn counters(outcome: &VisitOutcome) -> VisitCounters {
    match outcome {
        VisitOutcome::Recorded { counters, .. } => *counters,
        VisitOutcome::Skipped => panic!("visit was skipped"),
    }
}

#[tokio::test]
async fn first_visit_counts_pv_and_uv_second_only_pv() {
    let remote = Arc::new(InMemoryDocumentStore::new().with_document("visits", json!({"pv": 10, "uv": 5})));
    let storage = Arc::new(MemoryStorage::new());
    let counter = VisitCounter::new(remote.clone(), configured_bin("visits"), storage.clone());

    let first = counter.record_visit().await;
    assert_eq!(counters(&first), VisitCounters { pv: 11, uv: 6 });
    assert_eq!(remote.document("visits"), Some(json!({"pv": 11, "uv": 6})));

    let second = counter.record_visit().await;
    assert_eq!(counters(&second), VisitCounters { pv: 12, uv: 6 });
    assert!(matches!(second, VisitOutcome::Recorded { new_visitor: false, .. }));

    let visitor = storage.get_item(VISITOR_ID_KEY).unwrap().unwrap();
    assert_eq!(storage.get_item(UV_RECORDED_KEY).unwrap(), Some(visitor));
}

#[tokio::test]
async fn separate_profiles_each_count_once() {
    let remote = Arc::new(InMemoryDocumentStore::new());
    let alice = VisitCounter::new(remote.clone(), configured_bin("visits"), Arc::new(MemoryStorage::new()));
    let bob = VisitCounter::new(remote.clone(), configured_bin("visits"), Arc::new(MemoryStorage::new()));

    alice.record_visit().await;
    bob.record_visit().await;
    alice.record_visit().await;

    assert_eq!(bob.read_visit_stats().await, VisitCounters { pv: 3, uv: 2 });
    assert_ne!(alice.visitor_id(), bob.visitor_id());
}

#[tokio::test]
async fn read_visit_stats_never_writes() {
    let remote = Arc::new(InMemoryDocumentStore::new().with_document("visits", json!({"pv": 2, "uv": 1})));
    let counter = VisitCounter::new(remote.clone(), configured_bin("visits"), Arc::new(MemoryStorage::new()));

    assert_eq!(counter.read_visit_stats().await, VisitCounters { pv: 2, uv: 1 });
    assert_eq!(remote.put_calls(), 0);

    remote.fail_reads(Some(RemoteError::Transport("offline".into())));
    assert_eq!(counter.read_visit_stats().await, VisitCounters::default());
}

#[tokio::test]
async fn lost_write_still_marks_visitor_as_counted() {
    let remote = Arc::new(InMemoryDocumentStore::new());
    remote.fail_writes(Some(RemoteError::Transport("reset".into())));
    let storage = Arc::new(MemoryStorage::new());
    let counter = VisitCounter::new(remote.clone(), configured_bin("visits"), storage.clone());

    let outcome = counter.record_visit().await;

    assert!(matches!(outcome, VisitOutcome::Recorded { synced: false, new_visitor: true, .. }));
    assert!(storage.get_item(UV_RECORDED_KEY).unwrap().is_some());
    assert_eq!(remote.document("visits"), None);
}
