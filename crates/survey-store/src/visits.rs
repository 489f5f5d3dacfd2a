//! PV/UV visit counter
//!
//! Same read-modify-write shape as the response list, on a `{pv, uv}`
//! document. Whether a visitor is new is decided locally: the first counted
//! visit of a profile writes [`UV_RECORDED_KEY`], and later visits only bump
//! `pv`.

use crate::local::LocalStorage;
use crate::remote::DocumentStore;
use std::sync::Arc;
use survey_core::{BinConfig, VisitCounters, VisitorId};

/// Key of the persisted visitor identity
pub const VISITOR_ID_KEY: &str = "survey_visitor_id";

/// Key of the "already counted as UV" flag
pub const UV_RECORDED_KEY: &str = "survey_uv_recorded";

/// Result of [`VisitCounter::record_visit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    /// Visit bin not configured; nothing counted
    Skipped,
    /// Counters computed for this visit
    Recorded {
        /// Counters after this visit
        counters: VisitCounters,
        /// Whether this visit counted as a new UV
        new_visitor: bool,
        /// Whether the counters reached the remote store
        synced: bool,
    },
}

/// Visit counter over a remote bin
#[derive(Debug, Clone)]
pub struct VisitCounter {
    remote: Arc<dyn DocumentStore>,
    bin: BinConfig,
    storage: Arc<dyn LocalStorage>,
}

impl VisitCounter {
    /// Create counter
    #[inline]
    #[must_use]
    pub fn new(remote: Arc<dyn DocumentStore>, bin: BinConfig, storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            remote,
            bin,
            storage,
        }
    }

    /// Visitor identity of this profile, created on first use
    #[must_use]
    pub fn visitor_id(&self) -> VisitorId {
        match self.storage.get_item(VISITOR_ID_KEY) {
            Ok(Some(id)) if !id.is_empty() => return VisitorId::from_stored(id),
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "visitor id unreadable; generating a new one"),
        }

        let id = VisitorId::generate();
        if let Err(err) = self.storage.set_item(VISITOR_ID_KEY, id.as_str()) {
            tracing::warn!(error = %err, "failed to persist visitor id");
        }
        id
    }

    fn is_new_visitor(&self) -> bool {
        !matches!(self.storage.get_item(UV_RECORDED_KEY), Ok(Some(_)))
    }

    /// Count one survey-page visit
    ///
    /// A failed read counts from zero; a failed write loses this visit. Neither
    /// is reported beyond the log and the `synced` flag.
    pub async fn record_visit(&self) -> VisitOutcome {
        if !self.bin.is_configured() {
            return VisitOutcome::Skipped;
        }

        let visitor = self.visitor_id();
        let new_visitor = self.is_new_visitor();

        let current = match self.remote.get_latest(&self.bin).await {
            Ok(document) => VisitCounters::from_document(&document),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read visit counters; counting from zero");
                VisitCounters::default()
            }
        };

        let counters = current.bumped(new_visitor);
        if new_visitor {
            if let Err(err) = self.storage.set_item(UV_RECORDED_KEY, visitor.as_str()) {
                tracing::warn!(error = %err, "failed to persist uv flag");
            }
        }

        let synced = match serde_json::to_value(counters) {
            Ok(document) => match self.remote.put(&self.bin, &document).await {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to update visit counters");
                    false
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode visit counters");
                false
            }
        };

        tracing::debug!(pv = counters.pv, uv = counters.uv, new_visitor, synced, "visit recorded");
        VisitOutcome::Recorded {
            counters,
            new_visitor,
            synced,
        }
    }

    /// Current counters without counting a visit; zeros on any failure
    pub async fn read_visit_stats(&self) -> VisitCounters {
        if !self.bin.is_configured() {
            return VisitCounters::default();
        }

        match self.remote.get_latest(&self.bin).await {
            Ok(document) => VisitCounters::from_document(&document),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read visit counters");
                VisitCounters::default()
            }
        }
    }
}
