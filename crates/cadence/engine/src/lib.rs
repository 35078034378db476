//! Cadence Engine
//!
//! The deployment orchestrator ties the pipeline together: it fetches the
//! authored workflow graph, compiles it into an ordered step sequence,
//! runs the compliance pre-check, expands steps per contact, and hands the
//! scheduled entries to the execution gate's store.
//!
//! # Key Concepts
//!
//! - **Deployment**: the one-shot act of turning a workflow into a live
//!   campaign for a set of contacts. Sequential and short-circuiting; a
//!   created campaign survives a later failure so that re-deploying the
//!   same workflow resumes against it.
//! - **Live search**: when the workflow's entry node is a continuous
//!   discovery action, deployment triggers the search instead of the
//!   per-contact pipeline and produces zero scheduled steps.
//! - **Collaborators**: every external dependency (workflow store, contact
//!   store, compliance checker, search launcher, activity sink) sits behind
//!   an async trait, with in-memory implementations for tests and
//!   embedders.
//!
//! # Key Principle
//!
//! The orchestrator owns sequencing, not policy: what may execute is the
//! execution gate's call, and whether content is compliant is the
//! checker's.

#![deny(unsafe_code)]

mod memory;
mod orchestrator;
mod traits;

pub use memory::{
    InMemoryActivitySink, InMemoryCampaignStore, InMemoryContactStore, InMemoryStepStore,
    InMemoryWorkflowStore, StaticComplianceChecker, StubLiveSearchLauncher,
};
pub use orchestrator::{DeploymentOrchestrator, DeploymentReceipt};
pub use traits::{
    ActivitySink, CampaignStore, ComplianceChecker, ContactStore, LiveSearchContext,
    LiveSearchLauncher, LiveSearchOutcome, StepStore, WorkflowStore,
};
