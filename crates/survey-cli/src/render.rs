//! Plain-text rendering of command results

use std::fmt::Write;
use survey_core::VisitCounters;
use survey_stats::{Dashboard, QuestionStats, Tabulation};
use survey_store::{AppendOutcome, DataSource, VisitOutcome};

const BAR_CELLS: f64 = 20.0;

/// Operator feedback for a submission
pub(crate) fn append_outcome(outcome: &AppendOutcome) -> String {
    match outcome {
        AppendOutcome::Synced => "response saved and synced".to_string(),
        AppendOutcome::LocalOnly => "response saved locally (remote store not configured)".to_string(),
        AppendOutcome::RemoteFailed(err) => format!("response saved locally; remote sync failed: {err}"),
    }
}

pub(crate) fn source(source: DataSource) -> &'static str {
    match source {
        DataSource::Remote => "remote",
        DataSource::Local => "local",
    }
}

pub(crate) fn visit_outcome(outcome: &VisitOutcome) -> String {
    match outcome {
        VisitOutcome::Skipped => "visit not counted (visit bin not configured)".to_string(),
        VisitOutcome::Recorded {
            counters,
            new_visitor,
            synced,
        } => {
            let mut line = format!("PV {} / UV {}", counters.pv, counters.uv);
            if *new_visitor {
                line.push_str(" (new visitor)");
            }
            if !synced {
                line.push_str(" [not synced]");
            }
            line
        }
    }
}

pub(crate) fn visit_counters(counters: VisitCounters) -> String {
    format!("PV {}\nUV {}", counters.pv, counters.uv)
}

/// Statistics page as text
pub(crate) fn dashboard(board: &Dashboard, from: DataSource) -> String {
    let mut out = String::new();
    let summary = &board.summary;
    let _ = writeln!(out, "Responses: {} (today {})", summary.total, summary.today);
    let _ = writeln!(out, "Budget options: {}", summary.budget_options);
    let _ = writeln!(out, "Source: {}", source(from));

    if board.is_empty() {
        let _ = writeln!(out, "\nNo responses yet.");
        return out;
    }

    for section in &board.questions {
        out.push('\n');
        match section {
            QuestionStats::Choice { title, tabulation } => {
                let _ = writeln!(out, "{title}");
                tabulation_rows(&mut out, tabulation);
            }
            QuestionStats::Text { title, answers } => {
                let _ = writeln!(out, "{title}");
                for answer in answers {
                    let _ = writeln!(out, "  [{}] {}", answer.submit_time, answer.text);
                }
            }
        }
    }
    out
}

fn tabulation_rows(out: &mut String, tabulation: &Tabulation) {
    for row in &tabulation.ranked {
        let _ = writeln!(
            out,
            "  {:<20} {:>4} {:>6.1}% {}",
            row.answer,
            row.count,
            row.percentage,
            bar(row.bar_width)
        );
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar(width: f64) -> String {
    let cells = (width / 100.0 * BAR_CELLS).round().clamp(0.0, BAR_CELLS) as usize;
    "█".repeat(cells)
}
