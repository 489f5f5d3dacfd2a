//! Survey Stats
//!
//! Turns the ordered response list into what the statistics page shows:
//! - per-question frequency tables
//! - free-text answer listings
//! - headline figures
//! - a CSV export
//!
//! # Example
//!
//! ```rust
//! use survey_core::{Answer, Answers, ResponseRecord};
//! use survey_stats::tabulate;
//!
//! let mut answers = Answers::new();
//! answers.insert("channels".into(), Answer::Multiple(vec!["TV".into(), "Web".into()]));
//! let records = vec![ResponseRecord::from_parts(answers, "2024-06-01T09:00:00.000Z")];
//!
//! let table = tabulate("channels", &records);
//! assert_eq!(table.count("Web"), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod csv;
pub mod summary;
pub mod tabulate;

pub use csv::{export_file_name, to_csv, BOM};
pub use summary::{dashboard, summarize, Dashboard, QuestionStats, Summary};
pub use tabulate::{tabulate, text_answers, unique_answers, AnswerCount, Tabulation, TextAnswer};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
