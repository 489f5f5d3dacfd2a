//! `JsonBinClient` against a local fake of the document store API.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use survey_core::BinConfig;
use survey_store::{DocumentStore, JsonBinClient, RemoteError};
use warp::http::StatusCode;
use warp::Filter;

const KEY: &str = "test-key";

type Bins = Arc<Mutex<HashMap<String, Value>>>;

fn spawn_fake_store(bins: Bins) -> SocketAddr {
    let read_bins = bins.clone();
    let latest = warp::get()
        .and(warp::path!("b" / String / "latest"))
        .and(warp::header::optional::<String>("x-master-key"))
        .map(move |id: String, key: Option<String>| {
            if key.as_deref() != Some(KEY) {
                return warp::reply::with_status(
                    warp::reply::json(&json!({"message": "Invalid X-Master-Key provided"})),
                    StatusCode::UNAUTHORIZED,
                );
            }
            let record = read_bins.lock().unwrap().get(&id).cloned().unwrap_or(Value::Null);
            warp::reply::with_status(
                warp::reply::json(&json!({"record": record, "metadata": {"id": id}})),
                StatusCode::OK,
            )
        });

    let write_bins = bins;
    let update = warp::put()
        .and(warp::path!("b" / String))
        .and(warp::header::exact("content-type", "application/json"))
        .and(warp::header::exact("x-master-key", KEY))
        .and(warp::body::json())
        .map(move |id: String, body: Value| {
            write_bins.lock().unwrap().insert(id.clone(), body.clone());
            warp::reply::json(&json!({"record": body, "metadata": {"parentId": id}}))
        });

    let broken = warp::get()
        .and(warp::path!("broken" / String / "latest"))
        .map(|_id: String| "<html>maintenance</html>");

    let (addr, server) = warp::serve(latest.or(update).or(broken)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn bin(addr: SocketAddr, prefix: &str, id: &str) -> BinConfig {
    BinConfig::new(id)
        .with_base_url(format!("http://{addr}/{prefix}"))
        .with_api_key(KEY)
}

#[tokio::test]
async fn put_then_get_latest_roundtrip() {
    let bins = Bins::default();
    let addr = spawn_fake_store(bins.clone());
    let client = JsonBinClient::new();
    let bin = bin(addr, "b", "responses");

    let document = json!([{"budget": "50-100元", "submitTime": "2024-06-01T09:00:00.000Z"}]);
    client.put(&bin, &document).await.unwrap();

    assert_eq!(bins.lock().unwrap().get("responses"), Some(&document));
    assert_eq!(client.get_latest(&bin).await.unwrap(), document);
}

#[tokio::test]
async fn missing_record_reads_as_null() {
    let addr = spawn_fake_store(Bins::default());
    let client = JsonBinClient::new();

    assert_eq!(client.get_latest(&bin(addr, "b", "empty")).await, Ok(Value::Null));
}

#[tokio::test]
async fn wrong_key_is_a_status_error() {
    let addr = spawn_fake_store(Bins::default());
    let client = JsonBinClient::new();
    let bin = bin(addr, "b", "responses").with_api_key("YOUR_API_KEY");

    let err = client.get_latest(&bin).await.unwrap_err();
    assert!(matches!(err, RemoteError::Status { status: 401, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let addr = spawn_fake_store(Bins::default());
    let client = JsonBinClient::new();

    let err = client.get_latest(&bin(addr, "broken", "responses")).await.unwrap_err();
    assert!(matches!(err, RemoteError::MalformedPayload(_)));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let client = JsonBinClient::new();
    let bin = BinConfig::new("responses").with_base_url("http://127.0.0.1:9/b");

    let err = client.get_latest(&bin).await.unwrap_err();
    assert!(matches!(err, RemoteError::Transport(_)));
}
