//! Graph Compiler for Cadence
//!
//! Turns a user-authored workflow graph into an ordered, channel-tagged
//! list of [`cadence_types::CampaignStep`]s:
//!
//! 1. **Order**: Kahn's algorithm over the edges whose endpoints both
//!    exist. A graph that cannot be fully resolved (cycle, dangling
//!    structure) falls back to the authored vertical position, which never
//!    fails but only approximates intended order.
//! 2. **Filter**: structural nodes (trigger, condition) drop out; wait
//!    nodes stay and become delay-only steps.
//! 3. **Derive**: each kept node gets a channel tag, a relative delay,
//!    and a dense 0-based order index.
//!
//! Compilation is a pure function. Replace-semantics for the persisted
//! step set is the step store's contract, exercised by the orchestrator.

#![deny(unsafe_code)]

mod compile;
mod order;

pub use compile::{CompilerConfig, GraphCompiler};
pub use order::{entry_node, order_nodes, NodeOrdering};
