//! The deployment orchestrator
//!
//! Sequencing is strict and short-circuiting: fetch graph, resolve the
//! campaign, branch on live search, then compile, compliance-check,
//! persist, and schedule. Partial effects are not rolled back; a
//! campaign created by a failed deploy is found again through its
//! workflow back-reference on the next attempt. Concurrent deploys of
//! the same workflow must be serialized by the caller.

use cadence_compiler::{entry_node, GraphCompiler};
use cadence_gate::ExecutionGate;
use cadence_scheduler::StepScheduler;
use cadence_types::{
    Activity, ActivityKind, ActorId, Campaign, CampaignError, CampaignId, CampaignResult,
    CampaignStatus, CampaignStep, ContactId, EffectiveType, ScheduledStep, WorkflowId,
    WorkflowNode, WorkspaceId,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::traits::{
    ActivitySink, CampaignStore, ComplianceChecker, ContactStore, LiveSearchContext,
    LiveSearchLauncher, StepStore, WorkflowStore,
};

/// What a successful deploy returns to the caller.
#[derive(Clone, Debug)]
pub struct DeploymentReceipt {
    pub campaign_id: CampaignId,
    /// Scheduled entries created. Zero for live-search deployments.
    pub scheduled_count: usize,
    pub is_live_search: bool,
}

/// Drives the compile → check → schedule pipeline end to end.
pub struct DeploymentOrchestrator {
    workflows: Arc<dyn WorkflowStore>,
    contacts: Arc<dyn ContactStore>,
    campaigns: Arc<dyn CampaignStore>,
    steps: Arc<dyn StepStore>,
    compliance: Arc<dyn ComplianceChecker>,
    search: Arc<dyn LiveSearchLauncher>,
    activities: Arc<dyn ActivitySink>,
    gate: Arc<ExecutionGate>,
    compiler: GraphCompiler,
    scheduler: StepScheduler,
}

impl DeploymentOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        workflows: Arc<dyn WorkflowStore>,
        contacts: Arc<dyn ContactStore>,
        campaigns: Arc<dyn CampaignStore>,
        steps: Arc<dyn StepStore>,
        compliance: Arc<dyn ComplianceChecker>,
        search: Arc<dyn LiveSearchLauncher>,
        activities: Arc<dyn ActivitySink>,
        gate: Arc<ExecutionGate>,
    ) -> Self {
        Self {
            workflows,
            contacts,
            campaigns,
            steps,
            compliance,
            search,
            activities,
            gate,
            compiler: GraphCompiler::new(),
            scheduler: StepScheduler::new(),
        }
    }

    /// The gate this orchestrator schedules into.
    pub fn gate(&self) -> Arc<ExecutionGate> {
        Arc::clone(&self.gate)
    }

    // ── Compile ──────────────────────────────────────────────────────

    /// Compile a workflow into its ordered step sequence and persist it,
    /// creating the campaign if this workflow has never been deployed.
    #[instrument(skip(self), fields(workflow_id = %workflow_id))]
    pub async fn compile(&self, workflow_id: &WorkflowId) -> CampaignResult<Vec<CampaignStep>> {
        let nodes = self.workflows.fetch_nodes(workflow_id).await?;
        let edges = self.workflows.fetch_edges(workflow_id).await?;
        let campaign = self.resolve_or_create(workflow_id, false).await?;

        let steps = self
            .compiler
            .compile(&campaign.id, workflow_id, &nodes, &edges)?;
        self.steps.replace_steps(&campaign.id, steps.clone()).await?;
        info!(
            campaign_id = %campaign.id,
            step_count = steps.len(),
            "workflow compiled and persisted"
        );
        Ok(steps)
    }

    // ── Schedule ─────────────────────────────────────────────────────

    /// Expand a campaign's persisted steps for the given contacts and
    /// activate the campaign. `base_time` defaults to now.
    #[instrument(skip(self, contact_ids), fields(campaign_id = %campaign_id, contact_count = contact_ids.len()))]
    pub async fn schedule(
        &self,
        campaign_id: &CampaignId,
        contact_ids: &[ContactId],
        base_time: Option<DateTime<Utc>>,
    ) -> CampaignResult<Vec<ScheduledStep>> {
        self.campaigns
            .get(campaign_id)
            .await?
            .ok_or_else(|| CampaignError::CampaignNotFound(campaign_id.clone()))?;

        let steps = self.steps.steps_for_campaign(campaign_id).await?;
        if steps.is_empty() {
            return Err(CampaignError::NoStepsToSchedule);
        }
        let contacts = self.contacts.fetch_contacts(contact_ids).await?;

        let scheduled =
            self.scheduler
                .schedule(&steps, &contacts, base_time.unwrap_or_else(Utc::now))?;
        self.gate
            .actions()
            .replace_for_campaign(campaign_id, scheduled.clone())
            .await?;
        self.campaigns
            .set_status(campaign_id, CampaignStatus::Active)
            .await?;
        info!(
            campaign_id = %campaign_id,
            scheduled_count = scheduled.len(),
            "campaign scheduled and activated"
        );
        Ok(scheduled)
    }

    // ── Deploy ───────────────────────────────────────────────────────

    /// One-shot deployment: compile the workflow, pre-check compliance,
    /// and schedule the result for the given contacts. Live-search
    /// workflows trigger their discovery action instead and produce zero
    /// scheduled entries.
    #[instrument(
        skip(self, contact_ids),
        fields(
            workflow_id = %workflow_id,
            workspace_id = %workspace_id,
            contact_count = contact_ids.len()
        )
    )]
    pub async fn deploy(
        &self,
        workflow_id: &WorkflowId,
        contact_ids: &[ContactId],
        actor_id: &ActorId,
        workspace_id: &WorkspaceId,
    ) -> CampaignResult<DeploymentReceipt> {
        match self
            .run_deploy(workflow_id, contact_ids, actor_id, workspace_id)
            .await
        {
            Ok(receipt) => {
                self.emit(
                    Activity::new(
                        workspace_id.clone(),
                        ActivityKind::DeploymentCompleted,
                        format!("deployment completed, {} steps scheduled", receipt.scheduled_count),
                    )
                    .for_workflow(workflow_id.clone())
                    .for_campaign(receipt.campaign_id.clone())
                    .with_progress(100),
                )
                .await;
                Ok(receipt)
            }
            Err(err) => {
                warn!(workflow_id = %workflow_id, error = %err, "deployment failed");
                self.emit(
                    Activity::new(
                        workspace_id.clone(),
                        ActivityKind::DeploymentFailed,
                        err.to_string(),
                    )
                    .for_workflow(workflow_id.clone()),
                )
                .await;
                Err(err)
            }
        }
    }

    async fn run_deploy(
        &self,
        workflow_id: &WorkflowId,
        contact_ids: &[ContactId],
        actor_id: &ActorId,
        workspace_id: &WorkspaceId,
    ) -> CampaignResult<DeploymentReceipt> {
        let nodes = self.workflows.fetch_nodes(workflow_id).await?;
        let edges = self.workflows.fetch_edges(workflow_id).await?;
        if nodes.is_empty() {
            return Err(CampaignError::EmptyWorkflow);
        }

        let entry = entry_node(&nodes, &edges);
        let is_live_search = entry
            .map(|n| EffectiveType::resolve(n).is_live_search())
            .unwrap_or(false);
        let campaign = self.resolve_or_create(workflow_id, is_live_search).await?;

        self.emit(
            Activity::new(
                workspace_id.clone(),
                ActivityKind::DeploymentStarted,
                "deployment started",
            )
            .for_workflow(workflow_id.clone())
            .for_campaign(campaign.id.clone())
            .with_progress(10),
        )
        .await;

        if is_live_search {
            return self
                .deploy_live_search(workflow_id, workspace_id, actor_id, &campaign, entry)
                .await;
        }

        if contact_ids.is_empty() {
            return Err(CampaignError::NoContactsProvided);
        }
        let contacts = self.contacts.fetch_contacts(contact_ids).await?;
        if contacts.is_empty() {
            return Err(CampaignError::NoContactsFound);
        }

        let steps = self
            .compiler
            .compile(&campaign.id, workflow_id, &nodes, &edges)?;
        self.emit(
            Activity::new(
                workspace_id.clone(),
                ActivityKind::DeploymentProgress,
                format!("compiled {} steps", steps.len()),
            )
            .for_workflow(workflow_id.clone())
            .for_campaign(campaign.id.clone())
            .with_progress(30),
        )
        .await;

        let report = self
            .compliance
            .check(actor_id, workflow_id, &contacts, &steps)
            .await?;
        for warning in &report.warnings {
            warn!(workflow_id = %workflow_id, warning, "compliance warning");
        }
        if !report.can_proceed {
            return Err(CampaignError::ComplianceRejected(report.issues));
        }

        // Nothing persists until compliance has cleared the deployment.
        self.steps.replace_steps(&campaign.id, steps.clone()).await?;
        let scheduled = self.scheduler.schedule(&steps, &contacts, Utc::now())?;
        self.gate
            .actions()
            .replace_for_campaign(&campaign.id, scheduled.clone())
            .await?;
        self.campaigns
            .set_status(&campaign.id, CampaignStatus::Active)
            .await?;

        Ok(DeploymentReceipt {
            campaign_id: campaign.id,
            scheduled_count: scheduled.len(),
            is_live_search: false,
        })
    }

    async fn deploy_live_search(
        &self,
        workflow_id: &WorkflowId,
        workspace_id: &WorkspaceId,
        actor_id: &ActorId,
        campaign: &Campaign,
        entry: Option<&WorkflowNode>,
    ) -> CampaignResult<DeploymentReceipt> {
        let config = entry
            .and_then(|n| n.config.search.clone())
            .unwrap_or_else(|| serde_json::json!({}));
        let context = LiveSearchContext {
            workspace_id: workspace_id.clone(),
            workflow_id: workflow_id.clone(),
            campaign_id: campaign.id.clone(),
            actor_id: actor_id.clone(),
        };

        let outcome = self.search.trigger(config, context).await?;
        if !outcome.success {
            return Err(CampaignError::LiveSearchFailed(
                outcome.error.unwrap_or_else(|| "launcher reported failure".into()),
            ));
        }

        self.campaigns
            .set_status(&campaign.id, CampaignStatus::Active)
            .await?;
        self.emit(
            Activity::new(
                workspace_id.clone(),
                ActivityKind::LiveSearchTriggered,
                "live search triggered, contacts will stream in",
            )
            .for_workflow(workflow_id.clone())
            .for_campaign(campaign.id.clone()),
        )
        .await;
        info!(
            workflow_id = %workflow_id,
            campaign_id = %campaign.id,
            "live-search deployment active"
        );

        Ok(DeploymentReceipt {
            campaign_id: campaign.id.clone(),
            scheduled_count: 0,
            is_live_search: true,
        })
    }

    // ── Internals ────────────────────────────────────────────────────

    /// One workflow maps to at most one campaign; re-deploys resolve the
    /// existing one through the stored back-reference.
    async fn resolve_or_create(
        &self,
        workflow_id: &WorkflowId,
        is_live_search: bool,
    ) -> CampaignResult<Campaign> {
        if let Some(existing) = self.campaigns.find_by_workflow(workflow_id).await? {
            return Ok(existing);
        }
        let mut campaign = Campaign::new(
            format!("Campaign {}", workflow_id.short()),
            workflow_id.clone(),
        );
        if is_live_search {
            campaign = campaign.live_search();
        }
        self.campaigns.create(campaign.clone()).await?;
        info!(
            workflow_id = %workflow_id,
            campaign_id = %campaign.id,
            "campaign created for workflow"
        );
        Ok(campaign)
    }

    async fn emit(&self, activity: Activity) {
        self.activities.emit(activity).await;
    }
}
