//! CSV export
//!
//! Spreadsheet-friendly output: UTF-8 with a byte-order mark, every cell
//! quoted, multi-select answers joined with `"; "`.

use chrono::NaiveDate;
use survey_core::ResponseRecord;

/// Byte-order mark prepended to every export
pub const BOM: char = '\u{feff}';

/// Header of the timestamp column
pub const SUBMIT_TIME_HEADER: &str = "submitTime";

/// Render records as CSV with one column per question key
#[must_use]
pub fn to_csv<K: AsRef<str>>(records: &[ResponseRecord], question_keys: &[K]) -> String {
    let mut out = String::new();
    out.push(BOM);

    let header = std::iter::once(SUBMIT_TIME_HEADER.to_string())
        .chain(question_keys.iter().map(|k| k.as_ref().to_string()));
    push_row(&mut out, header);

    for record in records {
        let cells = std::iter::once(record.submit_time().to_string()).chain(
            question_keys
                .iter()
                .map(|key| record.answer(key.as_ref()).map(|a| a.to_cell()).unwrap_or_default()),
        );
        push_row(&mut out, cells);
    }

    out
}

/// Export file name for `date`
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("问卷统计_{}.csv", date.format("%Y-%m-%d"))
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>) {
    let row: Vec<String> = cells.map(|cell| quote(&cell)).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
