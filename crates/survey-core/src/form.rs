//! Form submission merging and validation
//!
//! A posted form is a flat list of `(field, value)` entries with one entry per
//! checked box. Multi-select fields are merged into ordered, de-duplicated
//! lists; every other field keeps its last value.

use crate::catalog::QuestionCatalog;
use crate::error::ValidationError;
use crate::types::{Answer, Answers, ResponseRecord};
use chrono::{DateTime, Utc};

/// Option value that unlocks a free-text companion field
pub const OTHER_OPTION: &str = "其他";

/// Suffix of the free-text companion field (`channels` -> `channels_other`)
pub const OTHER_SUFFIX: &str = "_other";

/// Answers collected from one form post
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSubmission {
    answers: Answers,
}

impl FormSubmission {
    /// Merge raw form entries
    pub fn from_entries<I, K, V>(entries: I, catalog: &QuestionCatalog) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut answers = Answers::new();

        for (key, value) in entries {
            let key = key.into();
            let value = value.into();

            if catalog.is_multi_select(&key) {
                let slot = answers
                    .entry(key)
                    .or_insert_with(|| Answer::Multiple(Vec::new()));
                if let Answer::Multiple(values) = slot {
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
            } else {
                answers.insert(key, Answer::Single(value));
            }
        }

        Self { answers }
    }

    /// Merged answers
    #[inline]
    #[must_use]
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// Check required questions and "other" companion fields
    ///
    /// # Errors
    /// - `ValidationError::MissingRequired` listing every empty field
    pub fn validate(&self, catalog: &QuestionCatalog) -> Result<(), ValidationError> {
        let mut missing = Vec::new();

        for question in catalog.questions() {
            let answer = self.answers.get(&question.key);

            if question.required && !answer.is_some_and(is_filled) {
                missing.push(question.key.clone());
            }

            if answer.is_some_and(|a| a.contains(OTHER_OPTION)) {
                let other_key = format!("{}{OTHER_SUFFIX}", question.key);
                if !self.answers.get(&other_key).is_some_and(is_filled) {
                    missing.push(other_key);
                }
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingRequired { fields: missing })
        }
    }

    /// Stamp into a record
    #[must_use]
    pub fn into_record(self, submitted_at: DateTime<Utc>) -> ResponseRecord {
        ResponseRecord::new(self.answers, submitted_at)
    }

    /// Take the merged answers
    #[inline]
    #[must_use]
    pub fn into_answers(self) -> Answers {
        self.answers
    }
}

fn is_filled(answer: &Answer) -> bool {
    match answer {
        Answer::Single(value) => !value.trim().is_empty(),
        Answer::Multiple(values) => !values.is_empty(),
        Answer::Other(value) => !value.is_null(),
    }
}
