//! Execution Gate for Cadence
//!
//! Every scheduled step passes through the gate before anything is sent.
//! Given a step and the workspace's autonomy policy, the gate decides
//! execute-now, queue-for-approval, hold (paused contact), or skip
//! (already settled), and exposes the operations humans use to steer it:
//! approve, reject, skip/prioritize overrides, pause/resume, and explicit
//! retry of failed attempts.
//!
//! # Key Principle
//!
//! **The gate governs, it never sends.** Turning an approved step into an
//! actual send is the external executor's job; the gate only guarantees
//! that nothing double-executes and nothing is silently dropped.
//!
//! Gate state lives behind injected store traits keyed by workspace, so
//! lifecycle and multi-instance deployment are well-defined. In-memory
//! implementations back tests and embedders without a database.

#![deny(unsafe_code)]

mod gate;
mod memory;
mod store;

pub use gate::{ExecutionGate, GateDecision, ReviewDecision};
pub use memory::{
    InMemoryActionStore, InMemoryApprovalStore, InMemoryLearningSink, InMemoryPauseStore,
};
pub use store::{ActionStore, ApprovalStore, LearningSink, PauseStore};
