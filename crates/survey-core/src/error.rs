//! Error types for survey core
//!
//! Only two things can fail at this layer: a submission missing required
//! answers, and a configuration file that cannot be read or parsed.

use std::path::PathBuf;

/// Required-field validation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One or more required fields were left empty
    #[error("missing required fields: {}", fields.join(", "))]
    MissingRequired {
        /// Keys of the empty fields, in catalog order
        fields: Vec<String>,
    },
}

impl ValidationError {
    /// Keys of the offending fields
    #[must_use]
    pub fn fields(&self) -> &[String] {
        match self {
            Self::MissingRequired { fields } => fields,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_display_lists_fields() {
        let err = ValidationError::MissingRequired {
            fields: vec!["budget".to_string(), "channels".to_string()],
        };
        assert_eq!(err.to_string(), "missing required fields: budget, channels");
        assert_eq!(err.fields().len(), 2);
    }
}
