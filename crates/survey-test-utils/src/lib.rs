//! Testing utilities for the survey workspace
//!
//! Shared fixtures, an in-memory document store, and a small CSV reader.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use survey_core::{Answer, Answers, BinConfig, ResponseRecord};
use survey_store::{DocumentStore, RemoteError};

pub const TEST_SUBMIT_TIME: &str = "2024-06-01T09:00:00.000Z";

/// Record with the given answers; list values become multi-select answers
pub fn record_with(answers: &[(&str, Answer)], submit_time: &str) -> ResponseRecord {
    let answers: Answers = answers
        .iter()
        .map(|(key, answer)| ((*key).to_string(), answer.clone()))
        .collect();
    ResponseRecord::from_parts(answers, submit_time)
}

pub fn single(value: &str) -> Answer {
    Answer::Single(value.to_string())
}

pub fn multi(values: &[&str]) -> Answer {
    Answer::Multiple(values.iter().map(|v| (*v).to_string()).collect())
}

pub fn sample_record() -> ResponseRecord {
    record_with(
        &[
            ("frequency", single("每周1-2次")),
            ("budget", single("50-100元")),
            ("channels", multi(&["小红书", "抖音"])),
        ],
        TEST_SUBMIT_TIME,
    )
}

pub fn configured_bin(bin_id: &str) -> BinConfig {
    BinConfig::new(bin_id).with_api_key("test-key")
}

/// In-memory remote document store with failure injection
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<HashMap<String, Value>>,
    read_failure: Mutex<Option<RemoteError>>,
    write_failure: Mutex<Option<RemoteError>>,
    gets: AtomicUsize,
    puts: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, bin_id: &str, document: Value) -> Self {
        self.documents.lock().insert(bin_id.to_string(), document);
        self
    }

    pub fn fail_reads(&self, err: Option<RemoteError>) {
        *self.read_failure.lock() = err;
    }

    pub fn fail_writes(&self, err: Option<RemoteError>) {
        *self.write_failure.lock() = err;
    }

    pub fn document(&self, bin_id: &str) -> Option<Value> {
        self.documents.lock().get(bin_id).cloned()
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_latest(&self, bin: &BinConfig) -> Result<Value, RemoteError> {
        if !bin.is_configured() {
            return Err(RemoteError::NotConfigured);
        }
        self.gets.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.read_failure.lock().clone() {
            return Err(err);
        }
        Ok(self.document(&bin.bin_id).unwrap_or(Value::Null))
    }

    async fn put(&self, bin: &BinConfig, document: &Value) -> Result<(), RemoteError> {
        if !bin.is_configured() {
            return Err(RemoteError::NotConfigured);
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.write_failure.lock().clone() {
            return Err(err);
        }
        self.documents
            .lock()
            .insert(bin.bin_id.clone(), document.clone());
        Ok(())
    }
}

/// Parse RFC 4180 CSV text into rows of fields
///
/// Handles quoted fields with doubled quotes and embedded separators or
/// newlines. A leading byte-order mark is ignored.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            ('"', true) => in_quotes = false,
            ('"', false) => in_quotes = true,
            (',', false) => row.push(std::mem::take(&mut field)),
            ('\r', false) => {}
            ('\n', false) => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            (c, _) => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}
