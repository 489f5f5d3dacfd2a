//! Remote document store client
//!
//! The store holds one JSON document per bin and only supports whole-document
//! reads and writes:
//!
//! ```text
//! GET {base_url}/{bin_id}/latest  ->  { "record": <document> }
//! PUT {base_url}/{bin_id}         <-  <document>
//! ```

use crate::error::RemoteError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;
use survey_core::BinConfig;

/// Authentication header name
pub const MASTER_KEY_HEADER: &str = "X-Master-Key";

/// Whole-document access to a remote bin
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the latest document of `bin`
    ///
    /// # Errors
    /// - `RemoteError::NotConfigured` without any request if `bin` is a placeholder
    /// - `RemoteError::Transport` / `RemoteError::Status` on network or HTTP failure
    /// - `RemoteError::MalformedPayload` if the body cannot be decoded
    async fn get_latest(&self, bin: &BinConfig) -> Result<Value, RemoteError>;

    /// Replace the document of `bin`
    ///
    /// # Errors
    /// Same classes as [`DocumentStore::get_latest`].
    async fn put(&self, bin: &BinConfig, document: &Value) -> Result<(), RemoteError>;
}

impl std::fmt::Debug for dyn DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DocumentStore")
    }
}

#[derive(Debug, Deserialize)]
struct LatestEnvelope {
    #[serde(default)]
    record: Value,
}

/// HTTP implementation of [`DocumentStore`]
#[derive(Debug, Clone, Default)]
pub struct JsonBinClient {
    http: reqwest::Client,
}

impl JsonBinClient {
    /// Create client with a default HTTP client
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create client over an existing HTTP client
    #[inline]
    #[must_use]
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    fn headers(bin: &BinConfig) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = bin.master_key() {
            match HeaderValue::from_str(key) {
                Ok(value) => {
                    headers.insert(MASTER_KEY_HEADER, value);
                }
                Err(_) => tracing::warn!("api key is not a valid header value; sending without it"),
            }
        }
        headers
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl DocumentStore for JsonBinClient {
    async fn get_latest(&self, bin: &BinConfig) -> Result<Value, RemoteError> {
        if !bin.is_configured() {
            return Err(RemoteError::NotConfigured);
        }

        let response = self
            .http
            .get(bin.latest_url())
            .headers(Self::headers(bin))
            .send()
            .await?;
        let body = Self::check(response).await?.bytes().await?;

        let envelope: LatestEnvelope = serde_json::from_slice(&body)
            .map_err(|err| RemoteError::MalformedPayload(err.to_string()))?;
        tracing::debug!(bin = %bin.bin_id, "fetched latest document");
        Ok(envelope.record)
    }

    async fn put(&self, bin: &BinConfig, document: &Value) -> Result<(), RemoteError> {
        if !bin.is_configured() {
            return Err(RemoteError::NotConfigured);
        }

        let body = serde_json::to_vec(document)
            .map_err(|err| RemoteError::MalformedPayload(err.to_string()))?;
        let response = self
            .http
            .put(bin.document_url())
            .headers(Self::headers(bin))
            .body(body)
            .send()
            .await?;
        Self::check(response).await?;
        tracing::debug!(bin = %bin.bin_id, "stored document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_include_key_only_when_real() {
        let headers = JsonBinClient::headers(&BinConfig::new("b").with_api_key("secret"));
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[MASTER_KEY_HEADER], "secret");

        let headers = JsonBinClient::headers(&BinConfig::new("b"));
        assert!(headers.get(MASTER_KEY_HEADER).is_none());
    }

    #[tokio::test]
    async fn placeholder_bin_short_circuits() {
        let client = JsonBinClient::new();
        let bin = BinConfig::default().with_base_url("http://127.0.0.1:1");

        assert_eq!(client.get_latest(&bin).await, Err(RemoteError::NotConfigured));
        assert_eq!(
            client.put(&bin, &Value::Array(vec![])).await,
            Err(RemoteError::NotConfigured)
        );
    }
}
