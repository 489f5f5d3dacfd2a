//! Survey Core
//!
//! Shared vocabulary for the survey workspace:
//! - Response records and their answers
//! - Visit counters and visitor identity
//! - The question catalog
//! - Form submission merging and required-field validation
//! - Explicit configuration for the remote document bins
//!
//! # Example
//!
//! ```rust
//! use survey_core::{FormSubmission, QuestionCatalog};
//!
//! let catalog = QuestionCatalog::default();
//! let form = FormSubmission::from_entries(
//!     [("channels", "小红书"), ("channels", "抖音"), ("budget", "50-100元")],
//!     &catalog,
//! );
//! assert_eq!(form.answers()["channels"].values().count(), 2);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod form;
pub mod types;

pub use catalog::{Question, QuestionCatalog, QuestionKind};
pub use config::{BinConfig, SurveyConfig};
pub use error::{ConfigError, ValidationError};
pub use form::FormSubmission;
pub use types::{Answer, Answers, ResponseRecord, VisitCounters, VisitorId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with survey data
    pub use crate::{
        Answer, Answers, BinConfig, FormSubmission, QuestionCatalog, ResponseRecord,
        SurveyConfig, VisitCounters,
    };
}
