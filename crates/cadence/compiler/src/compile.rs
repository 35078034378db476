//! Compilation: ordered graph → channel-tagged campaign steps

use crate::order::order_nodes;
use cadence_types::{
    CampaignError, CampaignId, CampaignResult, CampaignStep, DelayUnit, EffectiveType,
    WorkflowEdge, WorkflowId, WorkflowNode,
};
use tracing::{debug, warn};

/// Compiler behavior toggles.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompilerConfig {
    /// Reject cyclic graphs instead of degrading to positional order.
    ///
    /// Off by default: the fallback keeps historical behavior for graphs
    /// already in storage, but it is logged so operators can see when
    /// ordering quality degraded.
    pub strict_acyclic: bool,
}

/// Compiles workflow graphs into ordered campaign steps.
#[derive(Clone, Debug, Default)]
pub struct GraphCompiler {
    config: CompilerConfig,
}

impl GraphCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Compile a workflow's graph into the campaign's step list.
    ///
    /// Pure: the caller owns persisting the result (replace-semantics;
    /// all prior steps for the campaign are discarded first, so re-running
    /// is idempotent).
    pub fn compile(
        &self,
        campaign_id: &CampaignId,
        workflow_id: &WorkflowId,
        nodes: &[WorkflowNode],
        edges: &[WorkflowEdge],
    ) -> CampaignResult<Vec<CampaignStep>> {
        if nodes.is_empty() {
            return Err(CampaignError::EmptyWorkflow);
        }

        let ordering = order_nodes(nodes, edges);
        if ordering.used_fallback {
            if self.config.strict_acyclic {
                return Err(CampaignError::CyclicWorkflow(workflow_id.clone()));
            }
            warn!(
                %workflow_id,
                node_count = nodes.len(),
                "graph not fully resolvable; falling back to positional order"
            );
        }

        let mut steps = Vec::new();
        for node in &ordering.nodes {
            let effective = node.effective_type();
            if !effective.is_actionable() {
                continue;
            }
            let order_index = steps.len();
            let (delay, delay_unit) = derive_delay(node, &effective, order_index);

            let mut step = CampaignStep::new(campaign_id.clone(), effective.channel(), order_index)
                .with_label(node.label.clone())
                .with_content(node.config.content.clone().unwrap_or_default())
                .with_delay(delay, delay_unit);
            step.subject = node.config.subject.clone();
            steps.push(step);
        }

        debug!(
            %workflow_id,
            %campaign_id,
            step_count = steps.len(),
            used_fallback = ordering.used_fallback,
            "workflow compiled"
        );
        Ok(steps)
    }
}

/// Delay derivation for a kept node at position `index` in compiled order.
///
/// Wait nodes carry their configured delay wherever they sit; other nodes
/// only wait when they are not the first step.
fn derive_delay(
    node: &WorkflowNode,
    effective: &EffectiveType,
    index: usize,
) -> (i64, DelayUnit) {
    let unit = node
        .config
        .delay_unit
        .as_deref()
        .map(DelayUnit::parse_or_days)
        .unwrap_or_default();

    if *effective == EffectiveType::Wait {
        let delay = node.config.delay.or(node.config.wait_days).unwrap_or(1);
        (delay, unit)
    } else if index > 0 {
        (node.config.delay.unwrap_or(1), unit)
    } else {
        (0, DelayUnit::Days)
    }
}
