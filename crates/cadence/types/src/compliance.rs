//! Compliance pre-check report types
//!
//! The checker itself is an external collaborator; these types are its
//! wire contract. A report with `can_proceed == false` aborts the whole
//! deployment; issues are surfaced structured, never downgraded.

use crate::{Channel, ContactId};
use serde::{Deserialize, Serialize};

/// A single blocking issue found by the compliance pre-check.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComplianceIssue {
    /// The channel the issue applies to, if channel-specific
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    /// The contact the issue applies to, if contact-specific
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<ContactId>,
    /// Stable machine-readable code
    pub code: String,
    /// Human-readable explanation
    pub message: String,
}

impl ComplianceIssue {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel: None,
            contact_id: None,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn for_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn for_contact(mut self, contact_id: ContactId) -> Self {
        self.contact_id = Some(contact_id);
        self
    }
}

impl std::fmt::Display for ComplianceIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// The outcome of a compliance pre-check.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Whether the deployment may proceed
    pub can_proceed: bool,
    /// Blocking issues (non-empty when `can_proceed` is false)
    pub issues: Vec<ComplianceIssue>,
    /// Non-blocking warnings, surfaced but not enforced
    pub warnings: Vec<String>,
}

impl ComplianceReport {
    /// A clean report.
    pub fn clear() -> Self {
        Self {
            can_proceed: true,
            issues: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// A blocking report with the given issues.
    pub fn blocked(issues: Vec<ComplianceIssue>) -> Self {
        Self {
            can_proceed: false,
            issues,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_report() {
        let report = ComplianceReport::clear().with_warning("volume near daily cap");
        assert!(report.can_proceed);
        assert!(report.issues.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_blocked_report() {
        let report = ComplianceReport::blocked(vec![ComplianceIssue::new(
            "suppressed_contact",
            "contact opted out",
        )
        .for_contact(ContactId::new("c1"))]);
        assert!(!report.can_proceed);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(
            report.issues[0].to_string(),
            "[suppressed_contact] contact opted out"
        );
    }
}
