//! The execution gate state machine
//!
//! Every scheduled step passes through [`ExecutionGate::admit`] before any
//! channel adapter may touch it. The gate consults the workspace autonomy
//! policy: steps confident enough under a fully-autonomous policy are
//! approved on the spot, everything else becomes an approval item for a
//! human reviewer. Overrides (skip, prioritize), contact pauses, and the
//! explicit retry path all flow through here so that the status matrix in
//! `StepStatus::can_transition_to` is enforced in exactly one place.

use cadence_types::{
    ActionId, ApprovalId, ApprovalItem, ApprovalStatus, AutonomyConfig, AutonomyLevel,
    CampaignError, CampaignResult, ContactId, OverrideKind, Priority, ScheduledStep, StepStatus,
    WorkspaceId,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::memory::{
    InMemoryActionStore, InMemoryApprovalStore, InMemoryLearningSink, InMemoryPauseStore,
};
use crate::store::{ActionStore, ApprovalStore, LearningSink, PauseStore};

/// How far ahead a prioritized step is rescheduled.
const PRIORITIZE_LEAD_MINUTES: i64 = 5;

// ── Decisions ────────────────────────────────────────────────────────

/// Outcome of admitting a step past the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// The step was approved autonomously and may execute now.
    Execute,
    /// The step was deferred to a human; the item id is returned.
    AwaitApproval(ApprovalId),
    /// The contact is paused; the step stays pending until resume.
    Hold,
    /// The step is no longer pending, nothing to admit.
    Skip,
}

/// A human reviewer's verdict on an approval item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

// ── Gate ─────────────────────────────────────────────────────────────

/// Governs which scheduled steps may execute, and when.
///
/// The gate never sends anything itself: it moves steps through the
/// status matrix and leaves execution to whoever polls for approved work.
pub struct ExecutionGate {
    actions: Arc<dyn ActionStore>,
    approvals: Arc<dyn ApprovalStore>,
    pauses: Arc<dyn PauseStore>,
    learning: Arc<dyn LearningSink>,
}

impl ExecutionGate {
    pub fn new(
        actions: Arc<dyn ActionStore>,
        approvals: Arc<dyn ApprovalStore>,
        pauses: Arc<dyn PauseStore>,
        learning: Arc<dyn LearningSink>,
    ) -> Self {
        Self {
            actions,
            approvals,
            pauses,
            learning,
        }
    }

    /// A gate over fresh in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryActionStore::new()),
            Arc::new(InMemoryApprovalStore::new()),
            Arc::new(InMemoryPauseStore::new()),
            Arc::new(InMemoryLearningSink::new()),
        )
    }

    /// The action store behind this gate, for wiring schedulers in.
    pub fn actions(&self) -> Arc<dyn ActionStore> {
        Arc::clone(&self.actions)
    }

    // ── Admission ────────────────────────────────────────────────────

    /// Admit a pending step under the workspace autonomy policy.
    pub async fn admit(
        &self,
        workspace: &WorkspaceId,
        action_id: &ActionId,
        autonomy: &AutonomyConfig,
    ) -> CampaignResult<GateDecision> {
        let mut step = self.require_step(action_id).await?;

        if step.status != StepStatus::Pending {
            debug!(
                action_id = %step.id,
                status = %step.status,
                "step is not pending, nothing to admit"
            );
            return Ok(GateDecision::Skip);
        }

        if self.pauses.is_paused(workspace, &step.contact_id).await? {
            debug!(
                action_id = %step.id,
                contact_id = %step.contact_id,
                "contact is paused, holding step"
            );
            return Ok(GateDecision::Hold);
        }

        if autonomy.allows_autonomous(step.confidence) {
            self.apply(&mut step, StepStatus::Approved).await?;
            info!(
                action_id = %step.id,
                confidence = step.confidence,
                "step approved autonomously"
            );
            return Ok(GateDecision::Execute);
        }

        // Re-admitting a deferred step must not pile up duplicate items.
        if let Some(existing) = self.approvals.find_by_action(workspace, &step.id).await? {
            if existing.is_pending() {
                return Ok(GateDecision::AwaitApproval(existing.id));
            }
        }

        let reasoning = if autonomy.level == AutonomyLevel::FullyAutonomous {
            format!(
                "confidence {:.2} below approval threshold {:.2}",
                step.confidence, autonomy.approval_threshold
            )
        } else {
            format!("autonomy level {} requires human review", autonomy.level)
        };
        let item = ApprovalItem::new(step.id.clone(), workspace.clone(), step.confidence, reasoning)
            .with_preview(step.content.subject.clone(), step.content.body.clone());
        let item_id = item.id.clone();
        self.approvals.insert(item).await?;
        info!(
            action_id = %step.id,
            approval_id = %item_id,
            confidence = step.confidence,
            "step deferred to human review"
        );
        Ok(GateDecision::AwaitApproval(item_id))
    }

    // ── Review ───────────────────────────────────────────────────────

    /// Resolve the pending approval item gating a step.
    ///
    /// Approving a step whose contact has since been paused resolves the
    /// item but leaves the step pending; the resume sweep releases it.
    pub async fn resolve(
        &self,
        workspace: &WorkspaceId,
        action_id: &ActionId,
        decision: ReviewDecision,
        reason: Option<String>,
    ) -> CampaignResult<()> {
        let mut item = self
            .approvals
            .find_by_action(workspace, action_id)
            .await?
            .ok_or_else(|| CampaignError::ActionNotFound(action_id.clone()))?;
        let mut step = self.require_step(action_id).await?;

        let verdict = match decision {
            ReviewDecision::Approve => ApprovalStatus::Approved,
            ReviewDecision::Reject => ApprovalStatus::Rejected,
        };
        if !item.resolve(verdict) {
            warn!(approval_id = %item.id, "approval item already resolved");
            return Ok(());
        }
        self.approvals.update(item.clone()).await?;

        step.review_reason = reason;
        match decision {
            ReviewDecision::Approve => {
                if self.pauses.is_paused(workspace, &step.contact_id).await? {
                    info!(
                        action_id = %step.id,
                        contact_id = %step.contact_id,
                        "approved while contact paused, step held"
                    );
                    self.actions.update(step).await?;
                    return Ok(());
                }
                self.apply(&mut step, StepStatus::Approved).await?;
                info!(action_id = %action_id, approval_id = %item.id, "step approved by reviewer");
            }
            ReviewDecision::Reject => {
                self.apply(&mut step, StepStatus::Rejected).await?;
                info!(action_id = %action_id, approval_id = %item.id, "step rejected by reviewer");
            }
        }
        Ok(())
    }

    /// The workspace's open approval queue, oldest first.
    pub async fn pending_approvals(
        &self,
        workspace: &WorkspaceId,
    ) -> CampaignResult<Vec<ApprovalItem>> {
        self.approvals.list_pending(workspace).await
    }

    // ── Overrides ────────────────────────────────────────────────────

    /// Apply a human override to a step that has not yet settled.
    ///
    /// Skip cancels the step; prioritize pulls it forward to now plus
    /// five minutes at top priority without touching its status. With
    /// `learn` set, the override is also recorded as a learning signal.
    pub async fn override_action(
        &self,
        workspace: &WorkspaceId,
        action_id: &ActionId,
        kind: OverrideKind,
        reason: Option<String>,
        learn: bool,
    ) -> CampaignResult<()> {
        let mut step = self.require_step(action_id).await?;
        if step.is_terminal() {
            return Err(CampaignError::OverrideNotAllowed {
                action: step.id.clone(),
                status: step.status,
            });
        }

        match kind {
            OverrideKind::Skip => {
                step.override_reason = reason;
                self.apply(&mut step, StepStatus::Cancelled).await?;
                // A dangling pending item would otherwise sit in the queue.
                if let Some(mut item) =
                    self.approvals.find_by_action(workspace, action_id).await?
                {
                    if item.resolve(ApprovalStatus::Rejected) {
                        self.approvals.update(item).await?;
                    }
                }
                info!(action_id = %action_id, "step cancelled by skip override");
            }
            OverrideKind::Prioritize => {
                step.scheduled_at = Utc::now() + Duration::minutes(PRIORITIZE_LEAD_MINUTES);
                step.priority = Priority::Top;
                step.override_reason = reason;
                step.updated_at = Utc::now();
                self.actions.update(step).await?;
                info!(action_id = %action_id, "step prioritized by override");
            }
        }

        if learn {
            self.learning.record_override(workspace, kind).await?;
        }
        Ok(())
    }

    // ── Pause / Resume ───────────────────────────────────────────────

    /// Pause a contact. Pending and approved steps stay where they are,
    /// but nothing for this contact enters execution until resume.
    pub async fn pause_contact(
        &self,
        workspace: &WorkspaceId,
        contact_id: &ContactId,
    ) -> CampaignResult<()> {
        self.pauses.pause(workspace, contact_id).await?;
        info!(workspace_id = %workspace, contact_id = %contact_id, "contact paused");
        Ok(())
    }

    /// Resume a contact and release the steps that were approved while
    /// paused. Returns the ids of the released steps.
    pub async fn resume_contact(
        &self,
        workspace: &WorkspaceId,
        contact_id: &ContactId,
    ) -> CampaignResult<Vec<ActionId>> {
        self.pauses.resume(workspace, contact_id).await?;

        let mut released = Vec::new();
        for mut step in self.actions.list_for_contact(contact_id).await? {
            if step.status != StepStatus::Pending {
                continue;
            }
            let Some(item) = self.approvals.find_by_action(workspace, &step.id).await? else {
                continue;
            };
            if item.status != ApprovalStatus::Approved {
                continue;
            }
            self.apply(&mut step, StepStatus::Approved).await?;
            released.push(step.id);
        }
        info!(
            workspace_id = %workspace,
            contact_id = %contact_id,
            released = released.len(),
            "contact resumed"
        );
        Ok(released)
    }

    // ── Execution lifecycle ──────────────────────────────────────────

    /// Move an approved step into execution.
    pub async fn begin_execution(
        &self,
        workspace: &WorkspaceId,
        action_id: &ActionId,
    ) -> CampaignResult<()> {
        let mut step = self.require_step(action_id).await?;
        if self.pauses.is_paused(workspace, &step.contact_id).await? {
            return Err(CampaignError::ContactPaused(step.contact_id.clone()));
        }
        self.apply(&mut step, StepStatus::Executing).await
    }

    /// Mark an executing step as completed.
    pub async fn complete_execution(&self, action_id: &ActionId) -> CampaignResult<()> {
        let mut step = self.require_step(action_id).await?;
        self.apply(&mut step, StepStatus::Completed).await
    }

    /// Mark an executing step as failed, retaining the error.
    pub async fn fail_execution(
        &self,
        action_id: &ActionId,
        error: impl Into<String>,
    ) -> CampaignResult<()> {
        let mut step = self.require_step(action_id).await?;
        step.error = Some(error.into());
        self.apply(&mut step, StepStatus::Failed).await
    }

    /// Explicitly retry a failed step: back to pending, error cleared.
    /// The step then goes through admission again.
    pub async fn retry(&self, action_id: &ActionId) -> CampaignResult<()> {
        let mut step = self.require_step(action_id).await?;
        step.error = None;
        self.apply(&mut step, StepStatus::Pending).await?;
        info!(action_id = %action_id, "failed step requeued for retry");
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn require_step(&self, action_id: &ActionId) -> CampaignResult<ScheduledStep> {
        self.actions
            .get(action_id)
            .await?
            .ok_or_else(|| CampaignError::ActionNotFound(action_id.clone()))
    }

    async fn apply(&self, step: &mut ScheduledStep, next: StepStatus) -> CampaignResult<()> {
        let from = step.status;
        if !step.transition_to(next) {
            return Err(CampaignError::InvalidTransition { from, to: next });
        }
        self.actions.update(step.clone()).await
    }
}
