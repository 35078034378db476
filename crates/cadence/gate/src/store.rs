//! Store traits for gate state
//!
//! All gate state is reached through these traits rather than crate-global
//! maps: approval items and pause flags are keyed by workspace, scheduled
//! steps by their action id. Implementations must be safe to share across
//! tasks.

use async_trait::async_trait;
use cadence_types::{
    ActionId, ApprovalId, ApprovalItem, CampaignId, CampaignResult, ContactId, OverrideKind,
    ScheduledStep, WorkspaceId,
};

/// Storage for scheduled steps, keyed by action id.
///
/// The campaign-scoped batch operations carry the replace-semantics
/// contract: `replace_for_campaign` discards every prior row for the
/// campaign before inserting the new batch.
#[async_trait]
pub trait ActionStore: Send + Sync {
    async fn get(&self, id: &ActionId) -> CampaignResult<Option<ScheduledStep>>;

    /// Persist an updated step. The step must already exist.
    async fn update(&self, step: ScheduledStep) -> CampaignResult<()>;

    /// Atomically replace the campaign's scheduled steps with `steps`.
    ///
    /// Returns the number of rows inserted.
    async fn replace_for_campaign(
        &self,
        campaign_id: &CampaignId,
        steps: Vec<ScheduledStep>,
    ) -> CampaignResult<usize>;

    async fn list_for_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> CampaignResult<Vec<ScheduledStep>>;

    async fn list_for_contact(&self, contact_id: &ContactId)
        -> CampaignResult<Vec<ScheduledStep>>;
}

/// Storage for approval items, keyed by `(workspace, approval id)`.
#[async_trait]
pub trait ApprovalStore: Send + Sync {
    async fn insert(&self, item: ApprovalItem) -> CampaignResult<()>;

    async fn get(
        &self,
        workspace: &WorkspaceId,
        id: &ApprovalId,
    ) -> CampaignResult<Option<ApprovalItem>>;

    /// Find the item gating a scheduled step, if any.
    ///
    /// A step that has been retried can carry multiple items; the pending
    /// one wins, then the newest by `created_at`. Resolved items are
    /// history, not the active gate.
    async fn find_by_action(
        &self,
        workspace: &WorkspaceId,
        action_id: &ActionId,
    ) -> CampaignResult<Option<ApprovalItem>>;

    /// Persist an updated item. The item must already exist.
    async fn update(&self, item: ApprovalItem) -> CampaignResult<()>;

    async fn list_pending(&self, workspace: &WorkspaceId) -> CampaignResult<Vec<ApprovalItem>>;
}

/// The paused-contacts set, per workspace.
///
/// While a contact is paused, no step for that contact may leave
/// `Pending`, regardless of approval state.
#[async_trait]
pub trait PauseStore: Send + Sync {
    async fn pause(&self, workspace: &WorkspaceId, contact_id: &ContactId) -> CampaignResult<()>;

    async fn resume(&self, workspace: &WorkspaceId, contact_id: &ContactId) -> CampaignResult<()>;

    async fn is_paused(
        &self,
        workspace: &WorkspaceId,
        contact_id: &ContactId,
    ) -> CampaignResult<bool>;
}

/// Sink for override learning signals, keyed `(workspace, override kind)`.
///
/// Advisory: downstream analysis may use these to tune confidence, but
/// nothing in the gate's correctness depends on them.
#[async_trait]
pub trait LearningSink: Send + Sync {
    async fn record_override(
        &self,
        workspace: &WorkspaceId,
        kind: OverrideKind,
    ) -> CampaignResult<()>;
}
