//! Compiled campaign steps and delay arithmetic

use crate::{CampaignId, Channel, StepId};
use chrono::Duration;
use serde::{Deserialize, Serialize};

// ── Delay Unit ───────────────────────────────────────────────────────

/// Unit for a step's relative delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DelayUnit {
    Minutes,
    Hours,
    #[default]
    Days,
    Weeks,
}

impl DelayUnit {
    /// Parse a stored unit string. Unrecognized values fall back to days.
    pub fn parse_or_days(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "minutes" | "minute" => Self::Minutes,
            "hours" | "hour" => Self::Hours,
            "days" | "day" => Self::Days,
            "weeks" | "week" => Self::Weeks,
            _ => Self::Days,
        }
    }

    /// Convert an amount in this unit into a concrete duration.
    pub fn to_duration(self, amount: i64) -> Duration {
        match self {
            Self::Minutes => Duration::minutes(amount),
            Self::Hours => Duration::hours(amount),
            Self::Days => Duration::days(amount),
            Self::Weeks => Duration::weeks(amount),
        }
    }
}

impl std::fmt::Display for DelayUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
        };
        write!(f, "{}", tag)
    }
}

// ── Campaign Step ────────────────────────────────────────────────────

/// A compiled, channel-agnostic unit of work.
///
/// Derived artifact: the full step set for a campaign is replaced on every
/// compilation, never partially updated, so re-compiling is idempotent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignStep {
    /// Unique identifier
    pub id: StepId,
    /// The campaign this step was compiled for
    pub campaign_id: CampaignId,
    /// The outreach channel this step executes on
    pub channel: Channel,
    /// Label carried over from the source node
    pub label: String,
    /// Subject line (email-like channels)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Body template, with `{{token}}` placeholders
    pub content: String,
    /// Relative delay before this step fires
    pub delay: i64,
    /// Unit for `delay`
    pub delay_unit: DelayUnit,
    /// Dense 0-based position in compiled order
    pub order_index: usize,
}

impl CampaignStep {
    pub fn new(campaign_id: CampaignId, channel: Channel, order_index: usize) -> Self {
        Self {
            id: StepId::generate(),
            campaign_id,
            channel,
            label: String::new(),
            subject: None,
            content: String::new(),
            delay: 0,
            delay_unit: DelayUnit::Days,
            order_index,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_delay(mut self, delay: i64, unit: DelayUnit) -> Self {
        self.delay = delay;
        self.delay_unit = unit;
        self
    }

    /// The concrete duration this step waits after its predecessor.
    pub fn delay_duration(&self) -> Duration {
        self.delay_unit.to_duration(self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion_table() {
        assert_eq!(DelayUnit::Minutes.to_duration(1).num_milliseconds(), 60_000);
        assert_eq!(DelayUnit::Hours.to_duration(1).num_milliseconds(), 3_600_000);
        assert_eq!(DelayUnit::Days.to_duration(1).num_milliseconds(), 86_400_000);
        assert_eq!(
            DelayUnit::Weeks.to_duration(1).num_milliseconds(),
            604_800_000
        );
    }

    #[test]
    fn test_unknown_unit_defaults_to_days() {
        assert_eq!(DelayUnit::parse_or_days("fortnights"), DelayUnit::Days);
        assert_eq!(DelayUnit::parse_or_days(""), DelayUnit::Days);
        assert_eq!(DelayUnit::parse_or_days("HOURS"), DelayUnit::Hours);
    }

    #[test]
    fn test_step_delay_duration() {
        let step = CampaignStep::new(CampaignId::new("c"), Channel::Email, 0)
            .with_delay(2, DelayUnit::Weeks);
        assert_eq!(step.delay_duration(), Duration::weeks(2));
    }

    #[test]
    fn test_delay_unit_serde() {
        assert_eq!(serde_json::to_string(&DelayUnit::Weeks).unwrap(), "\"weeks\"");
        let unit: DelayUnit = serde_json::from_str("\"minutes\"").unwrap();
        assert_eq!(unit, DelayUnit::Minutes);
    }
}
