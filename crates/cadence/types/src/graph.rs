//! The authored workflow graph: nodes, edges, and type resolution
//!
//! Nodes arrive from the workflow editor's store with a quirk: certain
//! specialized node kinds are persisted under a generic `node_type` with the
//! real kind embedded in `config.originalType`. The [`EffectiveType`]
//! resolver collapses that ambiguity exactly once, at ingestion; nothing
//! downstream looks at the raw strings again.

use crate::{NodeId, WorkflowId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Workflow Node ────────────────────────────────────────────────────

/// A node in the authored workflow graph. Immutable once authored;
/// owned by the workflow editor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowNode {
    /// Unique identifier
    pub id: NodeId,
    /// The workflow this node belongs to
    pub workflow_id: WorkflowId,
    /// Stored node type (may be a generic placeholder, see `config`)
    pub node_type: String,
    /// Human-readable label shown in the editor
    pub label: String,
    /// Authored vertical position, the cycle-fallback sort key
    pub position_y: f64,
    /// Node configuration map
    #[serde(default)]
    pub config: NodeConfig,
}

impl WorkflowNode {
    pub fn new(
        id: impl Into<String>,
        workflow_id: WorkflowId,
        node_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: NodeId::new(id),
            workflow_id,
            node_type: node_type.into(),
            label: label.into(),
            position_y: 0.0,
            config: NodeConfig::default(),
        }
    }

    pub fn with_position_y(mut self, y: f64) -> Self {
        self.position_y = y;
        self
    }

    pub fn with_config(mut self, config: NodeConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve this node's effective type (config override wins).
    pub fn effective_type(&self) -> EffectiveType {
        EffectiveType::resolve(self)
    }
}

// ── Node Config ──────────────────────────────────────────────────────

/// Typed view over the stored node config map.
///
/// Fields the core interprets are named; everything else lands in `extra`
/// untouched so round-tripping a record never loses editor state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    /// The real node kind when `node_type` is a generic placeholder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_type: Option<String>,
    /// Relative delay before this step fires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<i64>,
    /// Unit for `delay`; unrecognized values fall back to days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_unit: Option<String>,
    /// Legacy wait-node field, consulted when `delay` is absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_days: Option<i64>,
    /// Authored subject template (email-like channels)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Authored body template, with `{{token}}` placeholders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Embedded search parameters for live-search entry nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<serde_json::Value>,
    /// Uninterpreted editor fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl NodeConfig {
    pub fn with_original_type(mut self, t: impl Into<String>) -> Self {
        self.original_type = Some(t.into());
        self
    }

    pub fn with_delay(mut self, delay: i64, unit: impl Into<String>) -> Self {
        self.delay = Some(delay);
        self.delay_unit = Some(unit.into());
        self
    }

    pub fn with_wait_days(mut self, days: i64) -> Self {
        self.wait_days = Some(days);
        self
    }

    pub fn with_search(mut self, search: serde_json::Value) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

// ── Workflow Edge ────────────────────────────────────────────────────

/// A directed edge in the workflow graph.
///
/// Edges only count toward ordering when both endpoints exist in the
/// node set; dangling edges are ignored, not rejected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowEdge {
    /// Unique identifier (opaque, assigned by the editor)
    pub id: String,
    /// The workflow this edge belongs to
    pub workflow_id: WorkflowId,
    /// Source node
    pub source: NodeId,
    /// Target node
    pub target: NodeId,
    /// Human-readable label for the transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl WorkflowEdge {
    pub fn new(
        id: impl Into<String>,
        workflow_id: WorkflowId,
        source: NodeId,
        target: NodeId,
    ) -> Self {
        Self {
            id: id.into(),
            workflow_id,
            source,
            target,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// ── Effective Type ───────────────────────────────────────────────────

/// A node's resolved kind: `config.originalType` if present, else the
/// stored `node_type`. Resolved once at ingestion and carried forward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectiveType {
    /// Entry/automation trigger; structural, never compiled
    Trigger,
    /// Branching condition; structural, never compiled
    Condition,
    /// Pure delay; compiled into a delay-only step
    Wait,
    Email,
    Sms,
    LinkedinConnect,
    LinkedinMessage,
    /// Continuous contact discovery; as an entry node this makes the
    /// whole deployment a live-search deployment
    LinkedinSearch,
    Voice,
    Task,
    /// Unknown kinds pass through to the channel tag unchanged
    Other(String),
}

impl EffectiveType {
    /// Resolve the effective type for a node.
    pub fn resolve(node: &WorkflowNode) -> Self {
        let raw = node
            .config
            .original_type
            .as_deref()
            .unwrap_or(&node.node_type);
        Self::from_tag(raw)
    }

    fn from_tag(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "trigger" => Self::Trigger,
            "condition" => Self::Condition,
            "wait" => Self::Wait,
            "email" => Self::Email,
            "sms" => Self::Sms,
            "linkedin_connect" => Self::LinkedinConnect,
            "linkedin_message" => Self::LinkedinMessage,
            "linkedin_search" => Self::LinkedinSearch,
            "voice" => Self::Voice,
            "task" => Self::Task,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether this node compiles into a campaign step.
    ///
    /// Only triggers and conditions are structural; waits ARE actionable
    /// (they become delay-only steps).
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::Trigger | Self::Condition)
    }

    /// Whether this type starts a live-search deployment when it is the
    /// entry node.
    pub fn is_live_search(&self) -> bool {
        matches!(self, Self::LinkedinSearch)
    }

    /// Fixed channel mapping. Unknown types pass through unchanged.
    pub fn channel(&self) -> Channel {
        match self {
            Self::Email => Channel::Email,
            Self::Sms => Channel::Sms,
            Self::LinkedinConnect => Channel::LinkedinConnection,
            Self::LinkedinMessage => Channel::LinkedinMessage,
            Self::LinkedinSearch => Channel::LinkedinSearch,
            Self::Voice => Channel::Voice,
            Self::Task => Channel::Task,
            Self::Wait => Channel::Wait,
            Self::Trigger => Channel::Other("trigger".into()),
            Self::Condition => Channel::Other("condition".into()),
            Self::Other(tag) => Channel::Other(tag.clone()),
        }
    }
}

// ── Channel ──────────────────────────────────────────────────────────

/// The outreach channel a compiled step executes on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Channel {
    Email,
    Sms,
    LinkedinConnection,
    LinkedinMessage,
    LinkedinSearch,
    Voice,
    Task,
    /// Delay-only step; nothing is sent
    Wait,
    Other(String),
}

impl Channel {
    pub fn as_tag(&self) -> &str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::LinkedinConnection => "linkedin_connection",
            Self::LinkedinMessage => "linkedin_message",
            Self::LinkedinSearch => "linkedin_search",
            Self::Voice => "voice",
            Self::Task => "task",
            Self::Wait => "wait",
            Self::Other(tag) => tag,
        }
    }
}

impl From<Channel> for String {
    fn from(c: Channel) -> Self {
        c.as_tag().to_string()
    }
}

impl From<String> for Channel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "email" => Self::Email,
            "sms" => Self::Sms,
            "linkedin_connection" => Self::LinkedinConnection,
            "linkedin_message" => Self::LinkedinMessage,
            "linkedin_search" => Self::LinkedinSearch,
            "voice" => Self::Voice,
            "task" => Self::Task,
            "wait" => Self::Wait,
            _ => Self::Other(s),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}
