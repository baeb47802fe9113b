// Verdict engine for crawdad
// Decides whether a response counts as a successful login / parameter set

use crate::config::AuditConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Failure,
}

impl Verdict {
    pub fn is_success(self) -> bool {
        self == Verdict::Success
    }
}

/// Classify a response against the configured success rule.
///
/// The status must equal the configured success status, and the body pattern
/// must match starting at the first byte of the body. The rest of the body is
/// not required to match.
pub fn classify(status: u16, body: &str, config: &AuditConfig) -> bool {
    status == config.success_status() && config.success_body_pattern().is_match(body)
}

/// Verdict for a dispatched request. Transport failures never succeed.
pub fn decide_verdict<E>(response: Result<(u16, &str), E>, config: &AuditConfig) -> Verdict {
    match response {
        Ok((status, body)) if classify(status, body, config) => Verdict::Success,
        _ => Verdict::Failure,
    }
}
