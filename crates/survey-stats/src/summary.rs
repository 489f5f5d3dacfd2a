//! Dashboard summary
//!
//! Headline counts plus one section per catalog question.

use crate::tabulate::{tabulate, text_answers, unique_answers, Tabulation, TextAnswer};
use chrono::NaiveDate;
use serde::Serialize;
use survey_core::{QuestionCatalog, QuestionKind, ResponseRecord};

/// Question whose distinct answers are shown as a headline figure
pub const BUDGET_KEY: &str = "budget";

/// Headline figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// All submissions
    pub total: usize,
    /// Submissions dated today
    pub today: usize,
    /// Distinct budget answers
    pub budget_options: usize,
}

/// Headline figures for `records` as of `today`
#[must_use]
pub fn summarize(records: &[ResponseRecord], today: NaiveDate) -> Summary {
    let date = today.format("%Y-%m-%d").to_string();
    Summary {
        total: records.len(),
        today: records.iter().filter(|r| r.submitted_on(&date)).count(),
        budget_options: unique_answers(BUDGET_KEY, records).len(),
    }
}

/// Dashboard section for one question
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionStats {
    /// Single or multi choice question
    Choice {
        /// Question title
        title: String,
        /// Frequency table
        tabulation: Tabulation,
    },
    /// Free-text question
    Text {
        /// Question title
        title: String,
        /// Answers in submission order
        answers: Vec<TextAnswer>,
    },
}

/// Everything the statistics page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Headline figures
    pub summary: Summary,
    /// Sections of answered questions, in catalog order
    pub questions: Vec<QuestionStats>,
}

impl Dashboard {
    /// Whether there is nothing to show
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary.total == 0
    }
}

/// Build the dashboard; questions nobody answered are left out
#[must_use]
pub fn dashboard(catalog: &QuestionCatalog, records: &[ResponseRecord], today: NaiveDate) -> Dashboard {
    let questions = catalog
        .questions()
        .iter()
        .filter_map(|question| match question.kind {
            QuestionKind::Text => {
                let answers = text_answers(&question.key, records);
                (!answers.is_empty()).then(|| QuestionStats::Text {
                    title: question.title.clone(),
                    answers,
                })
            }
            QuestionKind::SingleChoice | QuestionKind::MultiChoice => {
                let tabulation = tabulate(&question.key, records);
                (!tabulation.is_empty()).then(|| QuestionStats::Choice {
                    title: question.title.clone(),
                    tabulation,
                })
            }
        })
        .collect();

    Dashboard {
        summary: summarize(records, today),
        questions,
    }
}
