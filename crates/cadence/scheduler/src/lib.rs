//! Step Scheduler for Cadence
//!
//! Expands an ordered [`cadence_types::CampaignStep`] list into per-contact
//! [`cadence_types::ScheduledStep`]s: each contact walks the step sequence
//! accumulating delay, so timestamps within one contact's sequence are
//! monotonically non-decreasing by construction. Content is personalized
//! per contact via `{{token}}` substitution.
//!
//! Scheduling is a pure function of its inputs: "now" is a parameter, and
//! turning a scheduled time into an actual send belongs to an external
//! executor. Replace-semantics for the persisted batch is the store's
//! contract.

#![deny(unsafe_code)]

mod personalize;
mod schedule;

pub use personalize::personalize;
pub use schedule::StepScheduler;
