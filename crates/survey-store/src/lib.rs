//! Survey Store
//!
//! Persistence for survey responses and visit counters.
//!
//! # Architecture
//!
//! ```text
//! submit ──► ResponseRepository ──► LocalCacheStore (always, first)
//!                    │
//!                    └──► DocumentStore  GET latest → append → PUT (best effort)
//!
//! stats  ──► ResponseRepository ──► DocumentStore (preferred) / LocalCacheStore (fallback)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use survey_core::SurveyConfig;
//! use survey_store::{FileStorage, JsonBinClient, ResponseRepository};
//!
//! # async fn example() {
//! let config = SurveyConfig::load(None).unwrap();
//! let repo = ResponseRepository::new(
//!     Arc::new(JsonBinClient::new()),
//!     config.responses.clone(),
//!     Arc::new(FileStorage::in_dir(&config.data_dir)),
//! );
//! let snapshot = repo.get_all().await;
//! println!("{} responses from {:?}", snapshot.records.len(), snapshot.source);
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod local;
pub mod remote;
pub mod repository;
pub mod visits;

pub use error::{RemoteError, StoreError};
pub use local::{FileStorage, LocalCacheStore, LocalStorage, MemoryStorage, SURVEY_DATA_KEY};
pub use remote::{DocumentStore, JsonBinClient, MASTER_KEY_HEADER};
pub use repository::{AppendOutcome, ClearOutcome, DataSource, ResponseRepository, ResponseSnapshot};
pub use visits::{VisitCounter, VisitOutcome, UV_RECORDED_KEY, VISITOR_ID_KEY};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
