//! Core types for survey data
//!
//! Defines the records exchanged with the stores:
//! - Answers (single, multi-select, or anything else found in stored data)
//! - Response records with their submission timestamp
//! - PV/UV visit counters
//! - The locally persisted visitor identity

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered answers of one submission, keyed by question
pub type Answers = IndexMap<String, Answer>;

/// A single answer value
///
/// Stored documents are not schema checked, so any shape other than a string
/// or a list of strings is kept verbatim in [`Answer::Other`]. That keeps a
/// read-modify-write from dropping data it does not understand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Single-choice or free-text answer
    Single(String),
    /// Multi-select answer, in selection order
    Multiple(Vec<String>),
    /// Unrecognised JSON value
    Other(Value),
}

impl Answer {
    /// Whether the answer carries nothing to count
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(value) => value.is_empty(),
            Self::Multiple(values) => values.is_empty(),
            Self::Other(value) => value.is_null(),
        }
    }

    /// Countable values (nothing for [`Answer::Other`])
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values,
            Self::Other(_) => &[],
        };
        slice.iter().map(String::as_str)
    }

    /// Whether `needle` is one of the selected values
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.values().any(|value| value == needle)
    }

    /// Flatten into one display cell; multi-select values join with `"; "`
    #[must_use]
    pub fn to_cell(&self) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::Multiple(values) => values.join("; "),
            Self::Other(Value::Null) => String::new(),
            Self::Other(Value::String(value)) => value.clone(),
            Self::Other(value) => value.to_string(),
        }
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for Answer {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

/// One survey submission
///
/// Answers serialize first and `submitTime` last, matching the documents the
/// survey page has always written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    #[serde(flatten)]
    answers: Answers,
    #[serde(rename = "submitTime", default)]
    submit_time: String,
}

impl ResponseRecord {
    /// Stamp answers with a submission time
    #[must_use]
    pub fn new(answers: Answers, submitted_at: DateTime<Utc>) -> Self {
        Self {
            answers,
            submit_time: format_submit_time(submitted_at),
        }
    }

    /// Build a record from an already formatted timestamp
    #[must_use]
    pub fn from_parts(answers: Answers, submit_time: impl Into<String>) -> Self {
        Self {
            answers,
            submit_time: submit_time.into(),
        }
    }

    /// ISO-8601 submission timestamp (empty if the stored record had none)
    #[inline]
    #[must_use]
    pub fn submit_time(&self) -> &str {
        &self.submit_time
    }

    /// Answer for a question, if present
    #[inline]
    #[must_use]
    pub fn answer(&self, question: &str) -> Option<&Answer> {
        self.answers.get(question)
    }

    /// All answers in submission order
    #[inline]
    #[must_use]
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// Whether the record was submitted on `date` (`YYYY-MM-DD`)
    #[must_use]
    pub fn submitted_on(&self, date: &str) -> bool {
        !self.submit_time.is_empty() && self.submit_time.starts_with(date)
    }
}

/// Format a timestamp the way browsers print `Date.toISOString()`
#[must_use]
pub fn format_submit_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Page-view and unique-visitor counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitCounters {
    /// Page views
    pub pv: u64,
    /// Unique visitors
    pub uv: u64,
}

impl VisitCounters {
    /// Read counters from a stored document
    ///
    /// Each field falls back to 0 on its own when missing or not a
    /// non-negative integer; a non-object document yields zeros.
    #[must_use]
    pub fn from_document(document: &Value) -> Self {
        let field = |name: &str| document.get(name).and_then(Value::as_u64).unwrap_or(0);
        Self {
            pv: field("pv"),
            uv: field("uv"),
        }
    }

    /// Counters after one more visit
    #[must_use]
    pub fn bumped(self, new_visitor: bool) -> Self {
        Self {
            pv: self.pv.saturating_add(1),
            uv: if new_visitor {
                self.uv.saturating_add(1)
            } else {
                self.uv
            },
        }
    }
}

/// Opaque per-profile visitor identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisitorId(String);

impl VisitorId {
    /// Generate `v_<random><time>`, both parts in base 36
    ///
    /// Uniqueness is best effort.
    #[must_use]
    pub fn generate() -> Self {
        let random: u64 = rand::random();
        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        Self(format!("v_{}{}", to_base36(random), to_base36(millis)))
    }

    /// Wrap an identity read back from storage
    #[inline]
    #[must_use]
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Identity as stored
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VisitorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
