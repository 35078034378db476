//! Scheduled steps: one compiled step bound to one contact and one time
//!
//! The status enum is the heart of the execution gate's state machine.
//! Transitions are validated through [`StepStatus::can_transition_to`];
//! a terminal status never moves backward, with the single explicit
//! exception of `Failed → Pending` via a human- or policy-triggered retry.

use crate::{ActionId, CampaignId, Channel, ContactId, StepId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Confidence attached at scheduling time. External analysis may later
/// overwrite it before the gate admits the step.
pub const DEFAULT_CONFIDENCE: f64 = 0.75;

// ── Step Status ──────────────────────────────────────────────────────

/// Lifecycle status of a scheduled step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Created, not yet admitted past the gate
    #[default]
    Pending,
    /// Cleared for execution (autonomously or by a human)
    Approved,
    /// Rejected by a human reviewer (terminal)
    Rejected,
    /// Skipped by gate policy (terminal)
    Skipped,
    /// Cancelled via a skip override (terminal)
    Cancelled,
    /// Execution attempt in flight
    Executing,
    /// Executed successfully (terminal)
    Completed,
    /// Execution attempt errored (terminal, but explicitly retryable)
    Failed,
}

impl StepStatus {
    /// Terminal statuses never transition backward.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Rejected | Self::Cancelled | Self::Skipped
        )
    }

    /// The legal transition matrix.
    ///
    /// `Failed → Pending` is the explicit retry path; it is the only edge
    /// out of a terminal status.
    pub fn can_transition_to(&self, next: StepStatus) -> bool {
        use StepStatus::*;
        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Rejected)
                | (Pending, Skipped)
                | (Pending, Cancelled)
                | (Approved, Executing)
                | (Approved, Cancelled)
                | (Executing, Completed)
                | (Executing, Failed)
                | (Failed, Pending)
        )
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Skipped => "skipped",
            Self::Cancelled => "cancelled",
            Self::Executing => "executing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{}", tag)
    }
}

// ── Priority ─────────────────────────────────────────────────────────

/// Queue priority for a scheduled step. A prioritize override raises a
/// step to `Top` without touching its status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Normal,
    Top,
}

// ── Step Content ─────────────────────────────────────────────────────

/// Personalized content for one contact.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StepContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
}

impl StepContent {
    pub fn new(subject: Option<String>, body: impl Into<String>) -> Self {
        Self {
            subject,
            body: body.into(),
        }
    }
}

// ── Scheduled Step ───────────────────────────────────────────────────

/// One compiled step bound to one contact and one absolute time.
///
/// Exactly one exists per `(campaign, step, contact)` triple. Timestamps
/// within a single contact's sequence are monotonically non-decreasing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduledStep {
    /// Unique identifier; the id the gate's operations are keyed by
    pub id: ActionId,
    /// The owning campaign
    pub campaign_id: CampaignId,
    /// The compiled step this instance was expanded from
    pub step_id: StepId,
    /// The contact this instance targets
    pub contact_id: ContactId,
    /// Outreach channel (copied from the step)
    pub channel: Channel,
    /// Absolute execution time
    pub scheduled_at: DateTime<Utc>,
    /// Gate state machine status
    pub status: StepStatus,
    /// Personalized content
    pub content: StepContent,
    /// Confidence score consulted by the gate
    pub confidence: f64,
    /// Queue priority
    pub priority: Priority,
    /// Error message retained from a failed execution attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Reason recorded by a skip/prioritize override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_reason: Option<String>,
    /// Reason recorded by a human approve/reject decision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_reason: Option<String>,
    /// When the instance was created
    pub created_at: DateTime<Utc>,
    /// When the instance was last updated
    pub updated_at: DateTime<Utc>,
}

impl ScheduledStep {
    pub fn new(
        campaign_id: CampaignId,
        step_id: StepId,
        contact_id: ContactId,
        channel: Channel,
        scheduled_at: DateTime<Utc>,
        content: StepContent,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ActionId::generate(),
            campaign_id,
            step_id,
            contact_id,
            channel,
            scheduled_at,
            status: StepStatus::Pending,
            content,
            confidence: DEFAULT_CONFIDENCE,
            priority: Priority::Normal,
            error: None,
            override_reason: None,
            review_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Apply a validated status transition.
    pub fn transition_to(&mut self, next: StepStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        self.updated_at = Utc::now();
        true
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
