//! Campaigns and contacts

use crate::{CampaignId, ContactId, WorkflowId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Campaign ─────────────────────────────────────────────────────────

/// Run state of a campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Completed,
}

/// Settings binding a campaign to its source workflow.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignSettings {
    /// Back-reference to the authored workflow. One workflow maps to at
    /// most one campaign; deploys resolve existing campaigns through this.
    pub workflow_id: WorkflowId,
    /// Whether the entry node is a continuous discovery action
    pub is_live_search: bool,
}

/// The deployable, compiled representation of a workflow plus run state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub status: CampaignStatus,
    pub settings: CampaignSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    pub fn new(name: impl Into<String>, workflow_id: WorkflowId) -> Self {
        let now = Utc::now();
        Self {
            id: CampaignId::generate(),
            name: name.into(),
            status: CampaignStatus::Draft,
            settings: CampaignSettings {
                workflow_id,
                is_live_search: false,
            },
            created_at: now,
            updated_at: now,
        }
    }

    pub fn live_search(mut self) -> Self {
        self.settings.is_live_search = true;
        self
    }

    pub fn set_status(&mut self, status: CampaignStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }
}

// ── Contact ──────────────────────────────────────────────────────────

/// A contact record, as resolved from the external contact store.
///
/// All fields except the id are optional; personalization substitutes the
/// empty string for anything missing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Contact {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ContactId::new(id),
            first_name: None,
            last_name: None,
            email: None,
            company: None,
            title: None,
        }
    }

    pub fn with_name(
        mut self,
        first: impl Into<String>,
        last: impl Into<String>,
    ) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// First and last name joined, trimmed. Empty when both are missing.
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{} {}", first, last).trim().to_string()
    }
}
