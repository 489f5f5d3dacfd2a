//! Response repository
//!
//! Owns the policy between the two copies of the response list:
//! - every append lands in the local cache first
//! - the remote copy is updated best-effort by read-modify-write
//! - reads prefer the remote copy and fall back to the local one
//!
//! The remote store offers no atomic append, so two concurrent appends can
//! lose one record remotely (last PUT wins). The local copy still has it.

use crate::error::{RemoteError, StoreError};
use crate::local::{decode_records, LocalCacheStore, LocalStorage};
use crate::remote::DocumentStore;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use survey_core::{Answers, BinConfig, ResponseRecord};

/// What happened to the remote copy during an append
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Remote copy updated
    Synced,
    /// Remote not configured; local copy only
    LocalOnly,
    /// Remote update failed; local copy only
    RemoteFailed(RemoteError),
}

impl AppendOutcome {
    /// Whether the remote copy has the record
    #[inline]
    #[must_use]
    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced)
    }
}

/// Which copy a read was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Remote document store
    Remote,
    /// Local cache
    Local,
}

/// Records returned by [`ResponseRepository::get_all`]
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSnapshot {
    /// Records, oldest first
    pub records: Vec<ResponseRecord>,
    /// Copy they were read from
    pub source: DataSource,
}

/// Result of [`ResponseRepository::clear`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Whether remote data still has to be removed out-of-band
    pub remote_untouched: bool,
}

impl ClearOutcome {
    /// Notice for the operator
    #[must_use]
    pub fn notice(&self) -> &'static str {
        if self.remote_untouched {
            "local data cleared; data in the remote document store must be deleted from its console"
        } else {
            "local data cleared"
        }
    }
}

/// Append-only store of survey responses
#[derive(Debug, Clone)]
pub struct ResponseRepository {
    remote: Arc<dyn DocumentStore>,
    bin: BinConfig,
    local: LocalCacheStore,
}

impl ResponseRepository {
    /// Create repository over a remote bin and local storage
    #[must_use]
    pub fn new(remote: Arc<dyn DocumentStore>, bin: BinConfig, storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            remote,
            bin,
            local: LocalCacheStore::new(storage),
        }
    }

    /// Local cache used as fallback
    #[inline]
    #[must_use]
    pub fn local(&self) -> &LocalCacheStore {
        &self.local
    }

    /// Stamp answers with the current time and append them
    pub async fn submit(&self, answers: Answers) -> (ResponseRecord, AppendOutcome) {
        let record = ResponseRecord::new(answers, Utc::now());
        let outcome = self.append(&record).await;
        (record, outcome)
    }

    /// Append one record
    ///
    /// Never fails: the local copy is written first, and remote problems are
    /// reported through the outcome only.
    pub async fn append(&self, record: &ResponseRecord) -> AppendOutcome {
        if let Err(err) = self.local.append(record) {
            tracing::error!(error = %err, "failed to save response locally");
        }

        if !self.bin.is_configured() {
            tracing::warn!("remote store not configured; response saved locally only");
            return AppendOutcome::LocalOnly;
        }

        match self.append_remote(record).await {
            Ok(()) => {
                tracing::info!(submit_time = record.submit_time(), "response synced to remote store");
                AppendOutcome::Synced
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to sync response to remote store");
                tracing::warn!("response saved locally but not synced");
                AppendOutcome::RemoteFailed(err)
            }
        }
    }

    async fn append_remote(&self, record: &ResponseRecord) -> Result<(), RemoteError> {
        let mut items = match self.remote.get_latest(&self.bin).await {
            Ok(Value::Array(items)) => items,
            Ok(Value::Null) => Vec::new(),
            Ok(_) => {
                tracing::warn!("remote document is not an array; starting from empty");
                Vec::new()
            }
            Err(RemoteError::MalformedPayload(reason)) => {
                tracing::warn!(%reason, "remote document undecodable; starting from empty");
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        let value = serde_json::to_value(record)
            .map_err(|err| RemoteError::MalformedPayload(err.to_string()))?;
        items.push(value);

        self.remote.put(&self.bin, &Value::Array(items)).await
    }

    /// All records, preferring the remote copy
    ///
    /// The local cache is used when the remote is not configured, fails, or
    /// holds something other than an array. The copies are never merged.
    pub async fn get_all(&self) -> ResponseSnapshot {
        if self.bin.is_configured() {
            match self.remote.get_latest(&self.bin).await {
                Ok(Value::Array(items)) => {
                    return ResponseSnapshot {
                        records: decode_records(items),
                        source: DataSource::Remote,
                    };
                }
                Ok(_) => tracing::warn!("remote document is not an array; reading local copy"),
                Err(err) => {
                    tracing::error!(error = %err, "failed to read remote store");
                    tracing::warn!("reading local copy");
                }
            }
        }

        ResponseSnapshot {
            records: self.local.read_all(),
            source: DataSource::Local,
        }
    }

    /// Remove the local copy
    ///
    /// The remote document is left as is; deleting it is an administrative
    /// action outside this system.
    ///
    /// # Errors
    /// - `StoreError` if local storage cannot be written
    pub fn clear(&self) -> Result<ClearOutcome, StoreError> {
        self.local.clear()?;
        Ok(ClearOutcome {
            remote_untouched: self.bin.is_configured(),
        })
    }
}
