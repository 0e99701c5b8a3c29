//! Submission outcomes
//!
//! Every receipt ends the run in exactly one terminal [`Outcome`]. Individual
//! attempts can also produce [`Outcome::TransientError`], which only the
//! submission client ever sees.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a receipt was counted as failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// One of the five lookup fields was absent or blank
    MissingField,
    /// The remote service answered `success: false`
    RemoteRejection,
    /// Every attempt ended in a transient error
    RetriesExhausted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::MissingField => "missing_field",
            FailureKind::RemoteRejection => "remote_rejection",
            FailureKind::RetriesExhausted => "retries_exhausted",
        };
        f.write_str(s)
    }
}

/// Result of submitting one receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The remote service accepted the receipt
    Success {
        /// True when produced by dry-run instead of a real call
        simulated: bool,
        /// Message returned by the service, if any
        message: Option<String>,
    },

    /// The remote service had already seen this receipt
    Duplicate {
        /// Message returned by the service, if any
        message: Option<String>,
    },

    /// Terminal failure for this receipt
    Failure {
        /// Failure category
        kind: FailureKind,
        /// Human-readable reason
        reason: String,
    },

    /// Network or HTTP-level fault worth retrying
    TransientError(String),
}

impl Outcome {
    /// Simulated success used by dry-run
    pub fn simulated() -> Self {
        Outcome::Success {
            simulated: true,
            message: Some("DRY RUN - receipt was not submitted".to_string()),
        }
    }

    /// Remote business-logic rejection
    pub fn rejected(reason: impl Into<String>) -> Self {
        Outcome::Failure {
            kind: FailureKind::RemoteRejection,
            reason: reason.into(),
        }
    }

    /// Whether the outcome ends processing of the receipt
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::TransientError(_))
    }

    /// Whether this outcome was produced without contacting the service
    pub fn is_simulated(&self) -> bool {
        matches!(self, Outcome::Success { simulated: true, .. })
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success {
                simulated: true, ..
            } => "simulated",
            Outcome::Success { .. } => "success",
            Outcome::Duplicate { .. } => "duplicate",
            Outcome::Failure { .. } => "failure",
            Outcome::TransientError(_) => "transient_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_outcomes() {
        assert!(Outcome::simulated().is_terminal());
        assert!(Outcome::Duplicate { message: None }.is_terminal());
        assert!(Outcome::rejected("bad key").is_terminal());
        assert!(!Outcome::TransientError("timeout".to_string()).is_terminal());
    }

    #[test]
    fn test_simulated_marker() {
        let outcome = Outcome::simulated();
        assert!(outcome.is_simulated());
        assert_eq!(outcome.label(), "simulated");

        let real = Outcome::Success {
            simulated: false,
            message: None,
        };
        assert!(!real.is_simulated());
        assert_eq!(real.label(), "success");
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::MissingField.to_string(), "missing_field");
        assert_eq!(
            FailureKind::RetriesExhausted.to_string(),
            "retries_exhausted"
        );
    }
}
