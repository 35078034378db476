//! In-memory store implementations
//!
//! Back tests and embedders that do not bring a database. State is guarded
//! by `tokio::sync::RwLock`; the step replace operation holds the write
//! lock for the whole delete-then-insert, so a single store instance does
//! not interleave concurrent replaces of the same campaign.

use async_trait::async_trait;
use cadence_types::{
    ActionId, ApprovalId, ApprovalItem, CampaignId, CampaignResult, ContactId, OverrideKind,
    ScheduledStep, WorkspaceId,
};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::store::{ActionStore, ApprovalStore, LearningSink, PauseStore};

// ── Actions ──────────────────────────────────────────────────────────

/// In-memory [`ActionStore`].
#[derive(Debug, Default)]
pub struct InMemoryActionStore {
    steps: RwLock<HashMap<ActionId, ScheduledStep>>,
}

impl InMemoryActionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows held, across all campaigns.
    pub async fn len(&self) -> usize {
        self.steps.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.steps.read().await.is_empty()
    }
}

#[async_trait]
impl ActionStore for InMemoryActionStore {
    async fn get(&self, id: &ActionId) -> CampaignResult<Option<ScheduledStep>> {
        Ok(self.steps.read().await.get(id).cloned())
    }

    async fn update(&self, step: ScheduledStep) -> CampaignResult<()> {
        self.steps.write().await.insert(step.id.clone(), step);
        Ok(())
    }

    async fn replace_for_campaign(
        &self,
        campaign_id: &CampaignId,
        steps: Vec<ScheduledStep>,
    ) -> CampaignResult<usize> {
        let mut guard = self.steps.write().await;
        guard.retain(|_, s| &s.campaign_id != campaign_id);
        let inserted = steps.len();
        for step in steps {
            guard.insert(step.id.clone(), step);
        }
        Ok(inserted)
    }

    async fn list_for_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> CampaignResult<Vec<ScheduledStep>> {
        let mut rows: Vec<ScheduledStep> = self
            .steps
            .read()
            .await
            .values()
            .filter(|s| &s.campaign_id == campaign_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn list_for_contact(
        &self,
        contact_id: &ContactId,
    ) -> CampaignResult<Vec<ScheduledStep>> {
        let mut rows: Vec<ScheduledStep> = self
            .steps
            .read()
            .await
            .values()
            .filter(|s| &s.contact_id == contact_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}

// ── Approvals ────────────────────────────────────────────────────────

/// In-memory [`ApprovalStore`].
#[derive(Debug, Default)]
pub struct InMemoryApprovalStore {
    items: RwLock<HashMap<(WorkspaceId, ApprovalId), ApprovalItem>>,
}

impl InMemoryApprovalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApprovalStore for InMemoryApprovalStore {
    async fn insert(&self, item: ApprovalItem) -> CampaignResult<()> {
        self.items
            .write()
            .await
            .insert((item.workspace_id.clone(), item.id.clone()), item);
        Ok(())
    }

    async fn get(
        &self,
        workspace: &WorkspaceId,
        id: &ApprovalId,
    ) -> CampaignResult<Option<ApprovalItem>> {
        Ok(self
            .items
            .read()
            .await
            .get(&(workspace.clone(), id.clone()))
            .cloned())
    }

    async fn find_by_action(
        &self,
        workspace: &WorkspaceId,
        action_id: &ActionId,
    ) -> CampaignResult<Option<ApprovalItem>> {
        // A retried step can accumulate resolved items; the pending one is
        // the item currently gating the step, resolved ones are history.
        let guard = self.items.read().await;
        let mut matching: Vec<&ApprovalItem> = guard
            .values()
            .filter(|i| &i.workspace_id == workspace && &i.scheduled_step_id == action_id)
            .collect();
        matching.sort_by(|a, b| {
            b.is_pending()
                .cmp(&a.is_pending())
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(matching.first().map(|i| (*i).clone()))
    }

    async fn update(&self, item: ApprovalItem) -> CampaignResult<()> {
        self.insert(item).await
    }

    async fn list_pending(&self, workspace: &WorkspaceId) -> CampaignResult<Vec<ApprovalItem>> {
        let mut rows: Vec<ApprovalItem> = self
            .items
            .read()
            .await
            .values()
            .filter(|i| &i.workspace_id == workspace && i.is_pending())
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}

// ── Pauses ───────────────────────────────────────────────────────────

/// In-memory [`PauseStore`].
#[derive(Debug, Default)]
pub struct InMemoryPauseStore {
    paused: RwLock<HashSet<(WorkspaceId, ContactId)>>,
}

impl InMemoryPauseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PauseStore for InMemoryPauseStore {
    async fn pause(&self, workspace: &WorkspaceId, contact_id: &ContactId) -> CampaignResult<()> {
        self.paused
            .write()
            .await
            .insert((workspace.clone(), contact_id.clone()));
        Ok(())
    }

    async fn resume(&self, workspace: &WorkspaceId, contact_id: &ContactId) -> CampaignResult<()> {
        self.paused
            .write()
            .await
            .remove(&(workspace.clone(), contact_id.clone()));
        Ok(())
    }

    async fn is_paused(
        &self,
        workspace: &WorkspaceId,
        contact_id: &ContactId,
    ) -> CampaignResult<bool> {
        Ok(self
            .paused
            .read()
            .await
            .contains(&(workspace.clone(), contact_id.clone())))
    }
}

// ── Learning ─────────────────────────────────────────────────────────

/// In-memory [`LearningSink`] that counts signals per key.
#[derive(Debug, Default)]
pub struct InMemoryLearningSink {
    counts: RwLock<HashMap<(WorkspaceId, OverrideKind), u64>>,
}

impl InMemoryLearningSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, workspace: &WorkspaceId, kind: OverrideKind) -> u64 {
        self.counts
            .read()
            .await
            .get(&(workspace.clone(), kind))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl LearningSink for InMemoryLearningSink {
    async fn record_override(
        &self,
        workspace: &WorkspaceId,
        kind: OverrideKind,
    ) -> CampaignResult<()> {
        *self
            .counts
            .write()
            .await
            .entry((workspace.clone(), kind))
            .or_insert(0) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_types::{Channel, StepContent, StepId};
    use chrono::Utc;

    fn step(campaign: &str, contact: &str) -> ScheduledStep {
        ScheduledStep::new(
            CampaignId::new(campaign),
            StepId::generate(),
            ContactId::new(contact),
            Channel::Email,
            Utc::now(),
            StepContent::default(),
        )
    }

    #[tokio::test]
    async fn test_replace_discards_prior_campaign_rows() {
        let store = InMemoryActionStore::new();
        store
            .replace_for_campaign(&CampaignId::new("a"), vec![step("a", "c1"), step("a", "c2")])
            .await
            .unwrap();
        store
            .replace_for_campaign(&CampaignId::new("b"), vec![step("b", "c1")])
            .await
            .unwrap();
        assert_eq!(store.len().await, 3);

        // Re-replacing campaign "a" discards its old rows only.
        let inserted = store
            .replace_for_campaign(&CampaignId::new("a"), vec![step("a", "c3")])
            .await
            .unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(store.len().await, 2);
        assert_eq!(
            store
                .list_for_campaign(&CampaignId::new("b"))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_find_by_action_prefers_pending_item() {
        use cadence_types::ApprovalStatus;

        let store = InMemoryApprovalStore::new();
        let ws = WorkspaceId::new("ws");
        let action = ActionId::new("act");

        // An older, already-resolved item plus a fresh pending one for the
        // same action, as left behind by a retried step.
        let mut resolved = ApprovalItem::new(action.clone(), ws.clone(), 0.5, "first pass");
        resolved.resolve(ApprovalStatus::Approved);
        store.insert(resolved).await.unwrap();
        let pending = ApprovalItem::new(action.clone(), ws.clone(), 0.5, "second pass");
        let pending_id = pending.id.clone();
        store.insert(pending).await.unwrap();

        let found = store.find_by_action(&ws, &action).await.unwrap().unwrap();
        assert_eq!(found.id, pending_id);
        assert!(found.is_pending());
    }

    #[tokio::test]
    async fn test_approvals_scoped_by_workspace() {
        let store = InMemoryApprovalStore::new();
        let item = ApprovalItem::new(
            ActionId::new("act"),
            WorkspaceId::new("ws1"),
            0.5,
            "needs review",
        );
        let id = item.id.clone();
        store.insert(item).await.unwrap();

        assert!(store
            .get(&WorkspaceId::new("ws1"), &id)
            .await
            .unwrap()
            .is_some());
        assert!(store
            .get(&WorkspaceId::new("ws2"), &id)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_by_action(&WorkspaceId::new("ws2"), &ActionId::new("act"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_pause_roundtrip() {
        let store = InMemoryPauseStore::new();
        let ws = WorkspaceId::new("ws");
        let contact = ContactId::new("c1");

        assert!(!store.is_paused(&ws, &contact).await.unwrap());
        store.pause(&ws, &contact).await.unwrap();
        assert!(store.is_paused(&ws, &contact).await.unwrap());
        // Other workspaces unaffected.
        assert!(!store
            .is_paused(&WorkspaceId::new("other"), &contact)
            .await
            .unwrap());
        store.resume(&ws, &contact).await.unwrap();
        assert!(!store.is_paused(&ws, &contact).await.unwrap());
    }

    #[tokio::test]
    async fn test_learning_counts_by_kind() {
        let sink = InMemoryLearningSink::new();
        let ws = WorkspaceId::new("ws");
        sink.record_override(&ws, OverrideKind::Skip).await.unwrap();
        sink.record_override(&ws, OverrideKind::Skip).await.unwrap();
        sink.record_override(&ws, OverrideKind::Prioritize)
            .await
            .unwrap();

        assert_eq!(sink.count(&ws, OverrideKind::Skip).await, 2);
        assert_eq!(sink.count(&ws, OverrideKind::Prioritize).await, 1);
        assert_eq!(
            sink.count(&WorkspaceId::new("other"), OverrideKind::Skip).await,
            0
        );
    }
}
