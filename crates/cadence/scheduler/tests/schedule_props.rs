//! Property tests for scheduling.

use cadence_scheduler::StepScheduler;
use cadence_types::{CampaignId, CampaignStep, Channel, Contact, DelayUnit};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn delay_unit_strategy() -> impl Strategy<Value = DelayUnit> {
    prop_oneof![
        Just(DelayUnit::Minutes),
        Just(DelayUnit::Hours),
        Just(DelayUnit::Days),
        Just(DelayUnit::Weeks),
    ]
}

fn steps_strategy() -> impl Strategy<Value = Vec<CampaignStep>> {
    proptest::collection::vec((0i64..30, delay_unit_strategy()), 1..12).prop_map(|delays| {
        delays
            .into_iter()
            .enumerate()
            .map(|(i, (delay, unit))| {
                CampaignStep::new(CampaignId::new("c"), Channel::Email, i)
                    .with_delay(if i == 0 { 0 } else { delay }, unit)
            })
            .collect()
    })
}

proptest! {
    /// Per-contact timestamps never decrease: delay only accumulates.
    #[test]
    fn timestamps_monotonic_per_contact(steps in steps_strategy(), n_contacts in 1usize..5) {
        let contacts: Vec<Contact> = (0..n_contacts)
            .map(|i| Contact::new(format!("c{}", i)))
            .collect();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let out = StepScheduler::new().schedule(&steps, &contacts, base).unwrap();

        prop_assert_eq!(out.len(), steps.len() * contacts.len());
        for contact in &contacts {
            let times: Vec<_> = out
                .iter()
                .filter(|s| s.contact_id == contact.id)
                .map(|s| s.scheduled_at)
                .collect();
            prop_assert_eq!(times.len(), steps.len());
            for pair in times.windows(2) {
                prop_assert!(pair[0] <= pair[1]);
            }
            prop_assert!(times[0] >= base);
        }
    }
}
