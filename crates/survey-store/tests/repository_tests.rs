use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use survey_store::{
    AppendOutcome, DataSource, LocalStorage, MemoryStorage, RemoteError, ResponseRepository,
    SURVEY_DATA_KEY,
};
use survey_test_utils::{
    configured_bin, multi, record_with, sample_record, single, InMemoryDocumentStore,
    TEST_SUBMIT_TIME,
};

fn setup(remote: InMemoryDocumentStore) -> (Arc<InMemoryDocumentStore>, Arc<MemoryStorage>, ResponseRepository) {
    let remote = Arc::new(remote);
    let storage = Arc::new(MemoryStorage::new());
    let repo = ResponseRepository::new(remote.clone(), configured_bin("responses"), storage.clone());
    (remote, storage, repo)
}

#[tokio::test]
async fn append_with_unreachable_remote_lands_at_local_tail() {
    let (remote, _, repo) = setup(InMemoryDocumentStore::new());
    remote.fail_reads(Some(RemoteError::Transport("connection refused".into())));

    let first = record_with(&[("budget", single("50元以下"))], TEST_SUBMIT_TIME);
    let second = sample_record();
    repo.append(&first).await;
    let outcome = repo.append(&second).await;

    assert!(matches!(outcome, AppendOutcome::RemoteFailed(_)));
    let snapshot = repo.get_all().await;
    assert_eq!(snapshot.source, DataSource::Local);
    assert_eq!(snapshot.records.last(), Some(&second));
    assert_eq!(snapshot.records.len(), 2);
    assert_eq!(remote.put_calls(), 0);
}

#[tokio::test]
async fn get_all_prefers_remote_over_local() {
    let remote_record = record_with(&[("budget", single("100元以上"))], "2024-01-01T00:00:00.000Z");
    let remote = InMemoryDocumentStore::new()
        .with_document("responses", json!([serde_json::to_value(&remote_record).unwrap()]));
    let (_, storage, repo) = setup(remote);

    let local_only = sample_record();
    repo.local().append(&local_only).unwrap();
    assert!(storage.get_item(SURVEY_DATA_KEY).unwrap().is_some());

    let snapshot = repo.get_all().await;
    assert_eq!(snapshot.source, DataSource::Remote);
    assert_eq!(snapshot.records, vec![remote_record]);
}

#[tokio::test]
async fn get_all_falls_back_when_remote_is_not_an_array() {
    let remote = InMemoryDocumentStore::new().with_document("responses", json!({"pv": 1, "uv": 1}));
    let (_, _, repo) = setup(remote);
    repo.local().append(&sample_record()).unwrap();

    let snapshot = repo.get_all().await;
    assert_eq!(snapshot.source, DataSource::Local);
    assert_eq!(snapshot.records, vec![sample_record()]);
}

#[tokio::test]
async fn non_array_remote_is_replaced_by_single_record() {
    let remote = InMemoryDocumentStore::new().with_document("responses", json!("corrupted"));
    let (remote, _, repo) = setup(remote);

    let record = sample_record();
    assert_eq!(repo.append(&record).await, AppendOutcome::Synced);

    assert_eq!(
        remote.document("responses"),
        Some(json!([serde_json::to_value(&record).unwrap()]))
    );
}

#[tokio::test]
async fn append_extends_existing_remote_list() {
    let existing = json!({"budget": "50元以下", "legacy": 1, "submitTime": "2023-12-31T23:59:59.000Z"});
    let remote = InMemoryDocumentStore::new().with_document("responses", json!([existing.clone()]));
    let (remote, storage, repo) = setup(remote);

    let record = record_with(&[("channels", multi(&["TV", "Web"]))], TEST_SUBMIT_TIME);
    assert!(repo.append(&record).await.is_synced());

    let document = remote.document("responses").unwrap();
    assert_eq!(document, json!([existing, serde_json::to_value(&record).unwrap()]));

    // local copy only ever sees what was appended here
    let local: serde_json::Value =
        serde_json::from_str(&storage.get_item(SURVEY_DATA_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(local.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn failed_put_keeps_local_copy() {
    let (remote, _, repo) = setup(InMemoryDocumentStore::new().with_document("responses", json!([])));
    remote.fail_writes(Some(RemoteError::Status {
        status: 403,
        body: "forbidden".into(),
    }));

    let outcome = repo.append(&sample_record()).await;

    assert!(matches!(outcome, AppendOutcome::RemoteFailed(RemoteError::Status { status: 403, .. })));
    assert_eq!(remote.document("responses"), Some(json!([])));
    assert_eq!(repo.local().read_all(), vec![sample_record()]);
}

#[tokio::test]
async fn clear_then_get_all_with_unreachable_remote_is_empty() {
    let (remote, _, repo) = setup(InMemoryDocumentStore::new());
    repo.append(&sample_record()).await;
    remote.fail_reads(Some(RemoteError::Transport("offline".into())));

    let outcome = repo.clear().unwrap();

    assert!(outcome.remote_untouched);
    assert!(repo.get_all().await.records.is_empty());
    // remote still holds its copy
    assert!(remote.document("responses").is_some());
}
