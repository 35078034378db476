//! Approval items and the autonomy policy
//!
//! An [`ApprovalItem`] exists only when the execution gate has deferred a
//! scheduled step to a human. The item carries enough preview context
//! (subject, content, reasoning) for a reviewer to decide without loading
//! the whole campaign.

use crate::{ActionId, ApprovalId, WorkspaceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Approval Item ────────────────────────────────────────────────────

/// Resolution status of an approval item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A deferred step awaiting a human decision.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApprovalItem {
    /// Unique identifier
    pub id: ApprovalId,
    /// The scheduled step this item gates
    pub scheduled_step_id: ActionId,
    /// The workspace whose reviewers own this item
    pub workspace_id: WorkspaceId,
    /// The step's confidence when it was deferred
    pub confidence: f64,
    /// Why the gate deferred instead of executing
    pub reasoning: String,
    /// Subject preview for the reviewer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_subject: Option<String>,
    /// Content preview for the reviewer
    pub preview_content: String,
    /// Resolution status
    pub status: ApprovalStatus,
    /// When the item was created
    pub created_at: DateTime<Utc>,
    /// When a human resolved it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ApprovalItem {
    pub fn new(
        scheduled_step_id: ActionId,
        workspace_id: WorkspaceId,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            id: ApprovalId::generate(),
            scheduled_step_id,
            workspace_id,
            confidence,
            reasoning: reasoning.into(),
            preview_subject: None,
            preview_content: String::new(),
            status: ApprovalStatus::Pending,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    pub fn with_preview(
        mut self,
        subject: Option<String>,
        content: impl Into<String>,
    ) -> Self {
        self.preview_subject = subject;
        self.preview_content = content.into();
        self
    }

    /// Resolve the item. Resolution is one-shot; a resolved item stays
    /// resolved.
    pub fn resolve(&mut self, status: ApprovalStatus) -> bool {
        if self.status != ApprovalStatus::Pending {
            return false;
        }
        self.status = status;
        self.resolved_at = Some(Utc::now());
        true
    }

    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }
}

// ── Autonomy ─────────────────────────────────────────────────────────

/// How much the system may do without a human in the loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AutonomyLevel {
    /// Every action requires human approval
    Manual,
    /// High-confidence actions still queue for approval
    #[default]
    Supervised,
    /// Actions at or above the confidence threshold execute unattended
    FullyAutonomous,
}

impl std::fmt::Display for AutonomyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::Manual => "manual",
            Self::Supervised => "supervised",
            Self::FullyAutonomous => "fully_autonomous",
        };
        write!(f, "{}", tag)
    }
}

/// The autonomy policy consulted by the execution gate.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AutonomyConfig {
    pub level: AutonomyLevel,
    /// Minimum confidence for unattended execution
    pub approval_threshold: f64,
}

impl Default for AutonomyConfig {
    fn default() -> Self {
        Self {
            level: AutonomyLevel::Supervised,
            approval_threshold: 0.8,
        }
    }
}

impl AutonomyConfig {
    pub fn fully_autonomous(approval_threshold: f64) -> Self {
        Self {
            level: AutonomyLevel::FullyAutonomous,
            approval_threshold,
        }
    }

    /// Whether a step with the given confidence may execute unattended.
    pub fn allows_autonomous(&self, confidence: f64) -> bool {
        self.level == AutonomyLevel::FullyAutonomous && confidence >= self.approval_threshold
    }
}

// ── Override Kind ────────────────────────────────────────────────────

/// Human override types applied to a scheduled step. Learning signals are
/// keyed by `(workspace, override kind)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideKind {
    /// Cancel the step entirely
    Skip,
    /// Pull the step forward to now + 5 minutes, top priority
    Prioritize,
}

impl std::fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::Skip => "skip",
            Self::Prioritize => "prioritize",
        };
        write!(f, "{}", tag)
    }
}
