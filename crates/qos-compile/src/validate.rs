//! Circuit validation results.

use serde::Serialize;

/// Outcome of [`Compiler::validate_report`](crate::Compiler::validate_report).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    reasons: Vec<String>,
}

impl ValidationReport {
    /// Record a problem.
    pub fn push(&mut self, reason: impl Into<String>) {
        self.reasons.push(reason.into());
    }

    /// True when no problem was found.
    pub fn is_valid(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Every problem found, in circuit order.
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }
}
