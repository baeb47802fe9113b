// Error types for crawdad
// Fatal errors abort before the audit starts; row-level errors are recorded and skipped

use thiserror::Error;

/// Result type alias using the crawdad error
pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A data row whose field count differs from the header's
    #[error("bad line {line_number} in parameter file with {expected} keys and {found} values")]
    Format {
        line_number: usize,
        expected: usize,
        found: usize,
    },

    /// A configured credential column is not present in a row
    #[error("line {line_number} has no field named '{field}'")]
    MissingField { line_number: usize, field: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid success body pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Report generation error: {0}")]
    Report(String),
}

impl AuditError {
    /// Row-level errors are reported and skipped, everything else ends the run
    pub fn is_recoverable(&self) -> bool {
        match self {
            AuditError::Format { .. } | AuditError::MissingField { .. } => true,
            AuditError::Csv(e) => !e.is_io_error(),
            _ => false,
        }
    }
}
