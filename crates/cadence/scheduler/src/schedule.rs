//! Per-contact expansion of an ordered step list

use crate::personalize::personalize;
use cadence_types::{
    CampaignError, CampaignResult, CampaignStep, Contact, ScheduledStep, StepContent,
};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Expands compiled steps into per-contact scheduled entries.
#[derive(Clone, Debug, Default)]
pub struct StepScheduler;

impl StepScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Expand `steps` for every contact, anchored at `base_time`.
    ///
    /// Produces exactly `contacts.len() * steps.len()` entries, one per
    /// `(step, contact)` pair. Each contact's entries carry strictly
    /// non-decreasing timestamps: delay only accumulates.
    pub fn schedule(
        &self,
        steps: &[CampaignStep],
        contacts: &[Contact],
        base_time: DateTime<Utc>,
    ) -> CampaignResult<Vec<ScheduledStep>> {
        if steps.is_empty() {
            return Err(CampaignError::NoStepsToSchedule);
        }
        if contacts.is_empty() {
            return Err(CampaignError::NoContactsFound);
        }

        // Compiled order is authoritative regardless of how the caller's
        // store returned the rows.
        let mut ordered: Vec<&CampaignStep> = steps.iter().collect();
        ordered.sort_by_key(|s| s.order_index);

        let mut scheduled = Vec::with_capacity(ordered.len() * contacts.len());
        for contact in contacts {
            let mut cumulative = Duration::zero();
            for step in &ordered {
                cumulative += step.delay_duration();
                let content = StepContent::new(
                    step.subject.as_deref().map(|s| personalize(s, contact)),
                    personalize(&step.content, contact),
                );
                scheduled.push(ScheduledStep::new(
                    step.campaign_id.clone(),
                    step.id.clone(),
                    contact.id.clone(),
                    step.channel.clone(),
                    base_time + cumulative,
                    content,
                ));
            }
        }

        debug!(
            step_count = ordered.len(),
            contact_count = contacts.len(),
            scheduled_count = scheduled.len(),
            "steps scheduled"
        );
        Ok(scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_types::{CampaignId, Channel, DelayUnit, StepStatus, DEFAULT_CONFIDENCE};
    use chrono::TimeZone;

    fn campaign() -> CampaignId {
        CampaignId::new("camp")
    }

    fn step(order_index: usize, delay: i64, unit: DelayUnit) -> CampaignStep {
        CampaignStep::new(campaign(), Channel::Email, order_index)
            .with_content("Hi {{first_name}}")
            .with_delay(delay, unit)
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_delay_accumulation() {
        let steps = vec![
            step(0, 0, DelayUnit::Days),
            step(1, 2, DelayUnit::Days),
            step(2, 1, DelayUnit::Days),
        ];
        let contacts = vec![Contact::new("c1").with_name("Ana", "Souza")];
        let out = StepScheduler::new()
            .schedule(&steps, &contacts, base())
            .unwrap();

        assert_eq!(out[0].scheduled_at, base());
        assert_eq!(out[1].scheduled_at, base() + Duration::days(2));
        assert_eq!(out[2].scheduled_at, base() + Duration::days(3));
    }

    #[test]
    fn test_mixed_units_accumulate() {
        let steps = vec![
            step(0, 0, DelayUnit::Days),
            step(1, 90, DelayUnit::Minutes),
            step(2, 1, DelayUnit::Weeks),
        ];
        let contacts = vec![Contact::new("c1")];
        let out = StepScheduler::new()
            .schedule(&steps, &contacts, base())
            .unwrap();

        assert_eq!(out[1].scheduled_at, base() + Duration::minutes(90));
        assert_eq!(
            out[2].scheduled_at,
            base() + Duration::minutes(90) + Duration::weeks(1)
        );
    }

    #[test]
    fn test_one_entry_per_step_contact_pair() {
        let steps = vec![
            step(0, 0, DelayUnit::Days),
            step(1, 1, DelayUnit::Days),
            step(2, 1, DelayUnit::Days),
        ];
        let contacts = vec![
            Contact::new("c1"),
            Contact::new("c2"),
            Contact::new("c3"),
            Contact::new("c4"),
        ];
        let out = StepScheduler::new()
            .schedule(&steps, &contacts, base())
            .unwrap();

        assert_eq!(out.len(), 12);
        let mut pairs: Vec<(String, String)> = out
            .iter()
            .map(|s| (s.step_id.0.clone(), s.contact_id.0.clone()))
            .collect();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), 12, "every (step, contact) pair is unique");
    }

    #[test]
    fn test_personalized_content_per_contact() {
        let steps = vec![step(0, 0, DelayUnit::Days)];
        let contacts = vec![
            Contact::new("c1").with_name("Ana", "Souza"),
            Contact::new("c2"),
        ];
        let out = StepScheduler::new()
            .schedule(&steps, &contacts, base())
            .unwrap();

        assert_eq!(out[0].content.body, "Hi Ana");
        assert_eq!(out[1].content.body, "Hi ");
    }

    #[test]
    fn test_subject_personalized_when_present() {
        let mut s = step(0, 0, DelayUnit::Days);
        s.subject = Some("For {{company}}".into());
        let contacts = vec![Contact::new("c1").with_company("Acme")];
        let out = StepScheduler::new()
            .schedule(&[s], &contacts, base())
            .unwrap();
        assert_eq!(out[0].content.subject.as_deref(), Some("For Acme"));
    }

    #[test]
    fn test_new_entries_are_pending_with_default_confidence() {
        let steps = vec![step(0, 0, DelayUnit::Days)];
        let contacts = vec![Contact::new("c1")];
        let out = StepScheduler::new()
            .schedule(&steps, &contacts, base())
            .unwrap();
        assert_eq!(out[0].status, StepStatus::Pending);
        assert_eq!(out[0].confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_unsorted_input_is_resorted() {
        let steps = vec![
            step(2, 1, DelayUnit::Days),
            step(0, 0, DelayUnit::Days),
            step(1, 2, DelayUnit::Days),
        ];
        let contacts = vec![Contact::new("c1")];
        let out = StepScheduler::new()
            .schedule(&steps, &contacts, base())
            .unwrap();
        assert_eq!(out[0].scheduled_at, base());
        assert_eq!(out[2].scheduled_at, base() + Duration::days(3));
    }

    #[test]
    fn test_no_steps_error() {
        let result = StepScheduler::new().schedule(&[], &[Contact::new("c1")], base());
        assert!(matches!(result, Err(CampaignError::NoStepsToSchedule)));
    }

    #[test]
    fn test_no_contacts_error() {
        let steps = vec![step(0, 0, DelayUnit::Days)];
        let result = StepScheduler::new().schedule(&steps, &[], base());
        assert!(matches!(result, Err(CampaignError::NoContactsFound)));
    }
}
