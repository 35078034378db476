//! Collaborator traits for the deployment orchestrator
//!
//! Durable storage engines and channel transports are out of scope for the
//! core; these traits are the seams where embedders plug theirs in. All of
//! them are object-safe and consumed as `Arc<dyn Trait>`.

use async_trait::async_trait;
use cadence_types::{
    ActorId, Activity, Campaign, CampaignId, CampaignResult, CampaignStatus, CampaignStep,
    ComplianceReport, Contact, ContactId, WorkflowEdge, WorkflowId, WorkflowNode, WorkspaceId,
};

/// Read access to the authored workflow graph.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    async fn fetch_nodes(&self, workflow_id: &WorkflowId) -> CampaignResult<Vec<WorkflowNode>>;

    async fn fetch_edges(&self, workflow_id: &WorkflowId) -> CampaignResult<Vec<WorkflowEdge>>;
}

/// Resolves contact ids to full contact records.
///
/// Unknown ids are silently dropped; the caller decides whether an empty
/// resolution is an error.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn fetch_contacts(&self, ids: &[ContactId]) -> CampaignResult<Vec<Contact>>;
}

/// Campaign persistence. One workflow maps to at most one campaign; the
/// `find_by_workflow` back-reference is how re-deploys resolve it.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn find_by_workflow(
        &self,
        workflow_id: &WorkflowId,
    ) -> CampaignResult<Option<Campaign>>;

    async fn get(&self, campaign_id: &CampaignId) -> CampaignResult<Option<Campaign>>;

    async fn create(&self, campaign: Campaign) -> CampaignResult<()>;

    async fn set_status(
        &self,
        campaign_id: &CampaignId,
        status: CampaignStatus,
    ) -> CampaignResult<()>;
}

/// Persistence for compiled campaign steps. Replacement is atomic per
/// campaign: delete-then-insert, never merge.
#[async_trait]
pub trait StepStore: Send + Sync {
    async fn replace_steps(
        &self,
        campaign_id: &CampaignId,
        steps: Vec<CampaignStep>,
    ) -> CampaignResult<()>;

    async fn steps_for_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> CampaignResult<Vec<CampaignStep>>;
}

/// The compliance pre-check consulted before anything is scheduled.
#[async_trait]
pub trait ComplianceChecker: Send + Sync {
    async fn check(
        &self,
        actor_id: &ActorId,
        workflow_id: &WorkflowId,
        contacts: &[Contact],
        steps: &[CampaignStep],
    ) -> CampaignResult<ComplianceReport>;
}

/// Context handed to the live-search launcher alongside the entry node's
/// embedded search config.
#[derive(Clone, Debug)]
pub struct LiveSearchContext {
    pub workspace_id: WorkspaceId,
    pub workflow_id: WorkflowId,
    pub campaign_id: CampaignId,
    pub actor_id: ActorId,
}

/// What the launcher reported back.
#[derive(Clone, Debug)]
pub struct LiveSearchOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl LiveSearchOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Triggers a continuous discovery action for a live-search deployment.
#[async_trait]
pub trait LiveSearchLauncher: Send + Sync {
    async fn trigger(
        &self,
        config: serde_json::Value,
        context: LiveSearchContext,
    ) -> CampaignResult<LiveSearchOutcome>;
}

/// Fire-and-forget telemetry. Infallible by contract: a sink that cannot
/// deliver drops the event.
#[async_trait]
pub trait ActivitySink: Send + Sync {
    async fn emit(&self, activity: Activity);
}
