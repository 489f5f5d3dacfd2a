//! Wiring of configuration, stores and statistics behind the CLI commands

use anyhow::Context;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use survey_core::{
    FormSubmission, QuestionCatalog, ResponseRecord, SurveyConfig, ValidationError, VisitCounters,
};
use survey_stats::{dashboard, export_file_name, to_csv, Dashboard};
use survey_store::{
    AppendOutcome, ClearOutcome, DataSource, DocumentStore, FileStorage, JsonBinClient,
    LocalStorage, ResponseRepository, StoreError, VisitCounter, VisitOutcome,
};

/// Result of an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Export {
    pub(crate) path: PathBuf,
    pub(crate) rows: usize,
    pub(crate) source: DataSource,
}

/// Survey application
#[derive(Debug)]
pub(crate) struct App {
    catalog: QuestionCatalog,
    repository: ResponseRepository,
    visits: VisitCounter,
}

impl App {
    /// Application over the HTTP document store and the file-backed local store
    pub(crate) fn from_config(config: &SurveyConfig) -> Self {
        let remote: Arc<dyn DocumentStore> = Arc::new(JsonBinClient::new());
        let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::in_dir(&config.data_dir));
        Self::new(config, remote, storage)
    }

    pub(crate) fn new(
        config: &SurveyConfig,
        remote: Arc<dyn DocumentStore>,
        storage: Arc<dyn LocalStorage>,
    ) -> Self {
        Self {
            catalog: QuestionCatalog::default(),
            repository: ResponseRepository::new(remote.clone(), config.responses.clone(), storage.clone()),
            visits: VisitCounter::new(remote, config.visits.clone(), storage),
        }
    }

    /// Merge, validate and persist one form post
    pub(crate) async fn submit(
        &self,
        entries: Vec<(String, String)>,
    ) -> Result<(ResponseRecord, AppendOutcome), ValidationError> {
        let form = FormSubmission::from_entries(entries, &self.catalog);
        form.validate(&self.catalog)?;
        Ok(self.repository.submit(form.into_answers()).await)
    }

    pub(crate) async fn dashboard(&self, today: NaiveDate) -> (Dashboard, DataSource) {
        let snapshot = self.repository.get_all().await;
        (dashboard(&self.catalog, &snapshot.records, today), snapshot.source)
    }

    /// Write the CSV export into `dir`
    pub(crate) async fn export(&self, dir: &Path, today: NaiveDate) -> anyhow::Result<Export> {
        let snapshot = self.repository.get_all().await;
        let csv = to_csv(&snapshot.records, &self.catalog.keys());

        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let path = dir.join(export_file_name(today));
        std::fs::write(&path, csv).with_context(|| format!("writing {}", path.display()))?;

        tracing::info!(path = %path.display(), rows = snapshot.records.len(), "export written");
        Ok(Export {
            path,
            rows: snapshot.records.len(),
            source: snapshot.source,
        })
    }

    pub(crate) async fn record_visit(&self) -> VisitOutcome {
        self.visits.record_visit().await
    }

    pub(crate) async fn visit_stats(&self) -> VisitCounters {
        self.visits.read_visit_stats().await
    }

    pub(crate) fn clear(&self) -> Result<ClearOutcome, StoreError> {
        self.repository.clear()
    }
}
