//! In-memory collaborators
//!
//! Test doubles and embedder defaults for the orchestrator's seams. Graph
//! and campaign state lives behind `tokio::sync::RwLock`; the checker and
//! launcher are configured up front and record what they were asked.

use async_trait::async_trait;
use cadence_types::{
    ActorId, Activity, Campaign, CampaignError, CampaignId, CampaignResult, CampaignStatus,
    CampaignStep, ComplianceReport, Contact, ContactId, WorkflowEdge, WorkflowId, WorkflowNode,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::traits::{
    ActivitySink, CampaignStore, ComplianceChecker, ContactStore, LiveSearchContext,
    LiveSearchLauncher, LiveSearchOutcome, StepStore, WorkflowStore,
};

// ── Workflow graphs ──────────────────────────────────────────────────

/// In-memory [`WorkflowStore`]. Unknown workflows error rather than
/// resolving to an empty graph.
#[derive(Debug, Default)]
pub struct InMemoryWorkflowStore {
    graphs: RwLock<HashMap<WorkflowId, (Vec<WorkflowNode>, Vec<WorkflowEdge>)>>,
}

impl InMemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_graph(
        &self,
        workflow_id: WorkflowId,
        nodes: Vec<WorkflowNode>,
        edges: Vec<WorkflowEdge>,
    ) {
        self.graphs
            .write()
            .await
            .insert(workflow_id, (nodes, edges));
    }
}

#[async_trait]
impl WorkflowStore for InMemoryWorkflowStore {
    async fn fetch_nodes(&self, workflow_id: &WorkflowId) -> CampaignResult<Vec<WorkflowNode>> {
        self.graphs
            .read()
            .await
            .get(workflow_id)
            .map(|(nodes, _)| nodes.clone())
            .ok_or_else(|| CampaignError::WorkflowNotFound(workflow_id.clone()))
    }

    async fn fetch_edges(&self, workflow_id: &WorkflowId) -> CampaignResult<Vec<WorkflowEdge>> {
        self.graphs
            .read()
            .await
            .get(workflow_id)
            .map(|(_, edges)| edges.clone())
            .ok_or_else(|| CampaignError::WorkflowNotFound(workflow_id.clone()))
    }
}

// ── Contacts ─────────────────────────────────────────────────────────

/// In-memory [`ContactStore`]. Ids without a record resolve to nothing.
#[derive(Debug, Default)]
pub struct InMemoryContactStore {
    contacts: RwLock<HashMap<ContactId, Contact>>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, contact: Contact) {
        self.contacts
            .write()
            .await
            .insert(contact.id.clone(), contact);
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn fetch_contacts(&self, ids: &[ContactId]) -> CampaignResult<Vec<Contact>> {
        let guard = self.contacts.read().await;
        Ok(ids.iter().filter_map(|id| guard.get(id).cloned()).collect())
    }
}

// ── Campaigns ────────────────────────────────────────────────────────

/// In-memory [`CampaignStore`].
#[derive(Debug, Default)]
pub struct InMemoryCampaignStore {
    campaigns: RwLock<HashMap<CampaignId, Campaign>>,
}

impl InMemoryCampaignStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CampaignStore for InMemoryCampaignStore {
    async fn find_by_workflow(
        &self,
        workflow_id: &WorkflowId,
    ) -> CampaignResult<Option<Campaign>> {
        Ok(self
            .campaigns
            .read()
            .await
            .values()
            .find(|c| &c.settings.workflow_id == workflow_id)
            .cloned())
    }

    async fn get(&self, campaign_id: &CampaignId) -> CampaignResult<Option<Campaign>> {
        Ok(self.campaigns.read().await.get(campaign_id).cloned())
    }

    async fn create(&self, campaign: Campaign) -> CampaignResult<()> {
        self.campaigns
            .write()
            .await
            .insert(campaign.id.clone(), campaign);
        Ok(())
    }

    async fn set_status(
        &self,
        campaign_id: &CampaignId,
        status: CampaignStatus,
    ) -> CampaignResult<()> {
        let mut guard = self.campaigns.write().await;
        let campaign = guard
            .get_mut(campaign_id)
            .ok_or_else(|| CampaignError::CampaignNotFound(campaign_id.clone()))?;
        campaign.set_status(status);
        Ok(())
    }
}

// ── Compiled steps ───────────────────────────────────────────────────

/// In-memory [`StepStore`].
#[derive(Debug, Default)]
pub struct InMemoryStepStore {
    steps: RwLock<HashMap<CampaignId, Vec<CampaignStep>>>,
}

impl InMemoryStepStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StepStore for InMemoryStepStore {
    async fn replace_steps(
        &self,
        campaign_id: &CampaignId,
        steps: Vec<CampaignStep>,
    ) -> CampaignResult<()> {
        self.steps.write().await.insert(campaign_id.clone(), steps);
        Ok(())
    }

    async fn steps_for_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> CampaignResult<Vec<CampaignStep>> {
        Ok(self
            .steps
            .read()
            .await
            .get(campaign_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ── Compliance ───────────────────────────────────────────────────────

/// A [`ComplianceChecker`] that always returns one preconfigured report.
#[derive(Debug)]
pub struct StaticComplianceChecker {
    report: ComplianceReport,
}

impl StaticComplianceChecker {
    pub fn new(report: ComplianceReport) -> Self {
        Self { report }
    }

    /// A checker that clears everything.
    pub fn permissive() -> Self {
        Self::new(ComplianceReport::clear())
    }
}

impl Default for StaticComplianceChecker {
    fn default() -> Self {
        Self::permissive()
    }
}

#[async_trait]
impl ComplianceChecker for StaticComplianceChecker {
    async fn check(
        &self,
        _actor_id: &ActorId,
        _workflow_id: &WorkflowId,
        _contacts: &[Contact],
        _steps: &[CampaignStep],
    ) -> CampaignResult<ComplianceReport> {
        Ok(self.report.clone())
    }
}

// ── Live search ──────────────────────────────────────────────────────

/// A [`LiveSearchLauncher`] that records every trigger and replies with a
/// preconfigured outcome.
#[derive(Debug)]
pub struct StubLiveSearchLauncher {
    outcome: LiveSearchOutcome,
    triggers: RwLock<Vec<(serde_json::Value, LiveSearchContext)>>,
}

impl StubLiveSearchLauncher {
    pub fn succeeding() -> Self {
        Self {
            outcome: LiveSearchOutcome::ok(),
            triggers: RwLock::new(Vec::new()),
        }
    }

    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            outcome: LiveSearchOutcome::failed(error),
            triggers: RwLock::new(Vec::new()),
        }
    }

    pub async fn trigger_count(&self) -> usize {
        self.triggers.read().await.len()
    }

    pub async fn last_trigger(&self) -> Option<(serde_json::Value, LiveSearchContext)> {
        self.triggers.read().await.last().cloned()
    }
}

#[async_trait]
impl LiveSearchLauncher for StubLiveSearchLauncher {
    async fn trigger(
        &self,
        config: serde_json::Value,
        context: LiveSearchContext,
    ) -> CampaignResult<LiveSearchOutcome> {
        self.triggers.write().await.push((config, context));
        Ok(self.outcome.clone())
    }
}

// ── Activities ───────────────────────────────────────────────────────

/// An [`ActivitySink`] that buffers events for inspection.
#[derive(Debug, Default)]
pub struct InMemoryActivitySink {
    events: RwLock<Vec<Activity>>,
}

impl InMemoryActivitySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<Activity> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl ActivitySink for InMemoryActivitySink {
    async fn emit(&self, activity: Activity) {
        self.events.write().await.push(activity);
    }
}
