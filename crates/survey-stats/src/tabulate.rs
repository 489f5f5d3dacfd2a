//! Answer frequency tables
//!
//! Multi-select answers count once per selected option; single answers count
//! once. Percentages are relative to the number of records that answered the
//! question, so the options of a multi-select question can sum past 100%.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use survey_core::{Answer, ResponseRecord};

/// One row of a frequency table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerCount {
    /// Answer value
    pub answer: String,
    /// Number of selections
    pub count: usize,
    /// Share of answering records, one decimal
    pub percentage: f64,
    /// Bar length relative to the most chosen answer, 0-100
    pub bar_width: f64,
}

/// Frequency table of one question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tabulation {
    /// Question key
    pub question: String,
    /// Records with a non-empty answer
    pub respondents: usize,
    /// Count per answer, in first-seen order
    pub counts: IndexMap<String, usize>,
    /// Rows by count descending; ties keep first-seen order
    pub ranked: Vec<AnswerCount>,
}

impl Tabulation {
    /// Selections of `answer`
    #[must_use]
    pub fn count(&self, answer: &str) -> usize {
        self.counts.get(answer).copied().unwrap_or(0)
    }

    /// Whether nobody answered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.respondents == 0
    }
}

/// Tabulate one question over all records
#[must_use]
pub fn tabulate(question: &str, records: &[ResponseRecord]) -> Tabulation {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    let mut respondents = 0;

    for answer in answered(question, records) {
        respondents += 1;
        for value in answer.values() {
            *counts.entry(value.to_string()).or_default() += 1;
        }
    }

    let max_count = counts.values().copied().max().unwrap_or(0);
    let mut ranked: Vec<AnswerCount> = counts
        .iter()
        .map(|(answer, &count)| AnswerCount {
            answer: answer.clone(),
            count,
            percentage: round_one_decimal(ratio(count, respondents) * 100.0),
            bar_width: ratio(count, max_count) * 100.0,
        })
        .collect();
    // stable: equal counts stay in first-seen order
    ranked.sort_by(|a, b| b.count.cmp(&a.count));

    Tabulation {
        question: question.to_string(),
        respondents,
        counts,
        ranked,
    }
}

/// Distinct answer values in first-seen order
#[must_use]
pub fn unique_answers(question: &str, records: &[ResponseRecord]) -> Vec<String> {
    let mut seen: IndexSet<&str> = IndexSet::new();
    for answer in answered(question, records) {
        seen.extend(answer.values());
    }
    seen.into_iter().map(str::to_string).collect()
}

/// One free-text answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextAnswer {
    /// Answer text
    pub text: String,
    /// Submission time of its record
    pub submit_time: String,
}

/// Non-blank free-text answers in submission order
#[must_use]
pub fn text_answers(question: &str, records: &[ResponseRecord]) -> Vec<TextAnswer> {
    records
        .iter()
        .filter_map(|record| match record.answer(question) {
            Some(Answer::Single(text)) if !text.trim().is_empty() => Some(TextAnswer {
                text: text.clone(),
                submit_time: record.submit_time().to_string(),
            }),
            _ => None,
        })
        .collect()
}

fn answered<'a>(question: &'a str, records: &'a [ResponseRecord]) -> impl Iterator<Item = &'a Answer> {
    records
        .iter()
        .filter_map(move |record| record.answer(question))
        .filter(|answer| !answer.is_empty() && !matches!(answer, Answer::Other(_)))
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use survey_core::Answers;

    fn rec(question: &str, answer: Answer) -> ResponseRecord {
        let mut answers = Answers::new();
        answers.insert(question.to_string(), answer);
        ResponseRecord::from_parts(answers, "2024-06-01T00:00:00.000Z")
    }

    fn multi(values: &[&str]) -> Answer {
        Answer::Multiple(values.iter().map(|v| (*v).to_string()).collect())
    }

    #[test]
    fn multi_select_counts_each_option() {
        let records = vec![rec("channels", multi(&["TV", "Web"])), rec("channels", multi(&["Web"]))];
        let table = tabulate("channels", &records);

        assert_eq!(table.respondents, 2);
        assert_eq!(table.count("Web"), 2);
        assert_eq!(table.count("TV"), 1);

        let ranked: Vec<_> = table.ranked.iter().map(|r| (r.answer.as_str(), r.count)).collect();
        assert_eq!(ranked, [("Web", 2), ("TV", 1)]);
        assert_eq!(table.ranked[0].percentage, 100.0);
        assert_eq!(table.ranked[1].percentage, 50.0);
        assert_eq!(table.ranked[0].bar_width, 100.0);
        assert_eq!(table.ranked[1].bar_width, 50.0);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let records = vec![
            rec("budget", "b".into()),
            rec("budget", "a".into()),
            rec("budget", "c".into()),
            rec("budget", "a".into()),
            rec("budget", "c".into()),
        ];
        let order: Vec<_> = tabulate("budget", &records)
            .ranked
            .into_iter()
            .map(|r| r.answer)
            .collect();
        assert_eq!(order, ["a", "c", "b"]);
    }

    #[test]
    fn empty_and_missing_answers_are_skipped() {
        let records = vec![
            rec("budget", "".into()),
            rec("budget", multi(&[])),
            rec("other", "x".into()),
            rec("budget", Answer::Other(json!(12))),
            rec("budget", "50元以下".into()),
        ];
        let table = tabulate("budget", &records);
        assert_eq!(table.respondents, 1);
        assert_eq!(table.ranked.len(), 1);
        assert_eq!(table.ranked[0].percentage, 100.0);
    }

    #[test]
    fn percentages_round_to_one_decimal() {
        let records = vec![rec("q", "a".into()), rec("q", "b".into()), rec("q", "b".into())];
        let table = tabulate("q", &records);
        assert_eq!(table.ranked[0].percentage, 66.7);
        assert_eq!(table.ranked[1].percentage, 33.3);
    }

    #[test]
    fn unanswered_question_is_empty() {
        let table = tabulate("q", &[]);
        assert!(table.is_empty());
        assert!(table.ranked.is_empty());
    }

    #[test]
    fn unique_answers_first_seen() {
        let records = vec![rec("q", multi(&["x", "y"])), rec("q", "y".into()), rec("q", "z".into())];
        assert_eq!(unique_answers("q", &records), ["x", "y", "z"]);
    }

    #[test]
    fn text_answers_skip_blank() {
        let records = vec![rec("expectations", "  ".into()), rec("expectations", "多一些季节限定".into())];
        let answers = text_answers("expectations", &records);
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].text, "多一些季节限定");
        assert_eq!(answers[0].submit_time, "2024-06-01T00:00:00.000Z");
    }
}
