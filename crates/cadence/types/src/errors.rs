//! Error types for the campaign pipeline
//!
//! Every error is terminal for the call that raised it; there are no
//! automatic retries inside the core. Errors are local to one
//! `(workflow, campaign)` pair; a failure for one workflow never affects
//! others.

use crate::{
    ActionId, CampaignId, ComplianceIssue, ContactId, StepId, StepStatus, WorkflowId,
};

/// Errors that can occur across compile, schedule, deploy, and gate
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    #[error("workflow has no nodes to compile")]
    EmptyWorkflow,

    #[error("campaign has no steps to schedule")]
    NoStepsToSchedule,

    #[error("no contacts resolved for scheduling")]
    NoContactsFound,

    #[error("deployment requires at least one contact")]
    NoContactsProvided,

    #[error("compliance pre-check rejected deployment ({} issues)", .0.len())]
    ComplianceRejected(Vec<ComplianceIssue>),

    #[error("campaign not found: {0}")]
    CampaignNotFound(CampaignId),

    #[error("step not found: {0}")]
    StepNotFound(StepId),

    #[error("scheduled action not found: {0}")]
    ActionNotFound(ActionId),

    #[error("workflow not found: {0}")]
    WorkflowNotFound(WorkflowId),

    #[error("workflow {0} contains a cycle")]
    CyclicWorkflow(WorkflowId),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: StepStatus, to: StepStatus },

    #[error("contact is paused: {0}")]
    ContactPaused(ContactId),

    #[error("override not allowed for {action} in status {status}")]
    OverrideNotAllowed { action: ActionId, status: StepStatus },

    #[error("live search trigger failed: {0}")]
    LiveSearchFailed(String),

    #[error("external collaborator error: {0}")]
    External(String),
}

/// Result type alias for campaign operations.
pub type CampaignResult<T> = Result<T, CampaignError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CampaignError::CampaignNotFound(CampaignId::new("c1"));
        assert_eq!(err.to_string(), "campaign not found: c1");

        let err = CampaignError::InvalidTransition {
            from: StepStatus::Completed,
            to: StepStatus::Pending,
        };
        assert_eq!(
            err.to_string(),
            "invalid status transition: completed -> pending"
        );
    }

    #[test]
    fn test_compliance_rejection_counts_issues() {
        let err = CampaignError::ComplianceRejected(vec![
            ComplianceIssue::new("a", "first"),
            ComplianceIssue::new("b", "second"),
        ]);
        assert!(err.to_string().contains("2 issues"));
    }
}
