//! Activity telemetry events
//!
//! Advisory only; emitted fire-and-forget to an external broadcaster.
//! Nothing in the correctness contract depends on these arriving.

use crate::{CampaignId, WorkflowId, WorkspaceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an activity event reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    DeploymentStarted,
    DeploymentProgress,
    DeploymentCompleted,
    DeploymentFailed,
    LiveSearchTriggered,
}

/// A telemetry event describing deployment progress.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Activity {
    pub workspace_id: WorkspaceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<CampaignId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<WorkflowId>,
    pub kind: ActivityKind,
    /// Percentage complete, when the kind reports progress
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl Activity {
    pub fn new(workspace_id: WorkspaceId, kind: ActivityKind, message: impl Into<String>) -> Self {
        Self {
            workspace_id,
            campaign_id: None,
            workflow_id: None,
            kind,
            progress: None,
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }

    pub fn for_campaign(mut self, campaign_id: CampaignId) -> Self {
        self.campaign_id = Some(campaign_id);
        self
    }

    pub fn for_workflow(mut self, workflow_id: WorkflowId) -> Self {
        self.workflow_id = Some(workflow_id);
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }
}
