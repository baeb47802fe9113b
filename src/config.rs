// Audit configuration
// Built once at startup and passed by reference into the engine

use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::error::{AuditError, Result};
use crate::models::CredentialColumns;

pub const DEFAULT_SUCCESS_STATUS: u16 = 200;
pub const DEFAULT_SUCCESS_BODY: &str = ".*";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONCURRENCY: usize = 1;

lazy_static! {
    static ref MATCH_ANY: Regex = Regex::new(&anchor(DEFAULT_SUCCESS_BODY)).unwrap();
}

/// Anchor a pattern at the start of the body without requiring a full match
fn anchor(pattern: &str) -> String {
    format!(r"\A(?:{})", pattern)
}

/// Immutable settings for one audit run
#[derive(Debug, Clone)]
pub struct AuditConfig {
    base_url: String,
    credential_columns: Option<CredentialColumns>,
    success_status: u16,
    success_body: String,
    success_body_pattern: Regex,
    timeout: Duration,
    concurrency: usize,
}

impl AuditConfig {
    pub fn builder(base_url: impl Into<String>) -> AuditConfigBuilder {
        AuditConfigBuilder::new(base_url)
    }

    /// Base URL, always ending in `?`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credential_columns(&self) -> Option<&CredentialColumns> {
        self.credential_columns.as_ref()
    }

    pub fn success_status(&self) -> u16 {
        self.success_status
    }

    /// The body pattern as given by the user
    pub fn success_body(&self) -> &str {
        &self.success_body
    }

    /// Compiled body pattern, anchored at the start of the body
    pub fn success_body_pattern(&self) -> &Regex {
        &self.success_body_pattern
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Full request URL for a query string
    pub fn request_url(&self, query_string: &str) -> String {
        format!("{}{}", self.base_url, query_string)
    }
}

pub struct AuditConfigBuilder {
    base_url: String,
    credential_columns: Option<CredentialColumns>,
    success_status: u16,
    success_body: Option<String>,
    timeout: Duration,
    concurrency: usize,
}

impl AuditConfigBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credential_columns: None,
            success_status: DEFAULT_SUCCESS_STATUS,
            success_body: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn credential_columns(mut self, columns: Option<CredentialColumns>) -> Self {
        self.credential_columns = columns;
        self
    }

    pub fn success_status(mut self, status: u16) -> Self {
        self.success_status = status;
        self
    }

    pub fn success_body(mut self, pattern: Option<String>) -> Self {
        self.success_body = pattern;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn build(self) -> Result<AuditConfig> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(AuditError::Config("no base URL given".to_string()));
        }

        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|e| AuditError::Config(format!("invalid base URL '{}': {}", trimmed, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AuditError::Config(format!(
                "base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let base_url = if trimmed.ends_with('?') {
            trimmed.to_string()
        } else {
            format!("{}?", trimmed)
        };

        if self.concurrency == 0 {
            return Err(AuditError::Config("concurrency must be at least 1".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(AuditError::Config("timeout must be greater than zero".to_string()));
        }

        let (success_body, success_body_pattern) = match self.success_body {
            Some(pattern) => {
                let compiled = Regex::new(&anchor(&pattern))?;
                (pattern, compiled)
            }
            None => {
                warn!(
                    "No success body regex given. Defaulting to {} for any {} status code.",
                    DEFAULT_SUCCESS_BODY, self.success_status
                );
                (DEFAULT_SUCCESS_BODY.to_string(), MATCH_ANY.clone())
            }
        };

        Ok(AuditConfig {
            base_url,
            credential_columns: self.credential_columns,
            success_status: self.success_status,
            success_body,
            success_body_pattern,
            timeout: self.timeout,
            concurrency: self.concurrency,
        })
    }
}
