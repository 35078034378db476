//! Campaign Domain Types for Cadence
//!
//! Campaigns in Cadence are compiled from user-authored workflow graphs:
//! directed graphs of outreach actions that a compiler flattens into an
//! ordered, channel-tagged step sequence, a scheduler fans out per contact,
//! and an execution gate governs before anything is actually sent.
//!
//! # Key Concepts
//!
//! - **WorkflowNode / WorkflowEdge**: The authored graph. Nodes carry a
//!   stored type plus a config map; the *effective* type is resolved once
//!   at ingestion (see [`EffectiveType`]) and never re-derived ad hoc.
//! - **CampaignStep**: A compiled, channel-agnostic unit of work with a
//!   relative delay and a dense 0-based order index. Fully replaced on
//!   every compilation, never patched.
//! - **ScheduledStep**: One step bound to one contact and one absolute
//!   time. Unique per `(campaign, step, contact)` triple.
//! - **ApprovalItem**: Created when the execution gate defers a scheduled
//!   step to a human instead of executing it autonomously.
//! - **AutonomyConfig**: The policy deciding whether low-confidence actions
//!   require human approval.
//!
//! # Design Principles
//!
//! 1. Compilation and scheduling are pure transformations; stores own the
//!    replace-semantics.
//! 2. Per-contact timestamps are monotonically non-decreasing.
//! 3. Terminal statuses never move backward; retry of a failed step is the
//!    one explicit, human-triggered exception.

#![deny(unsafe_code)]

mod activity;
mod approval;
mod campaign;
mod compliance;
mod errors;
mod graph;
mod ids;
mod scheduled;
mod step;

pub use activity::*;
pub use approval::*;
pub use campaign::*;
pub use compliance::*;
pub use errors::*;
pub use graph::*;
pub use ids::*;
pub use scheduled::*;
pub use step::*;
