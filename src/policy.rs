use crate::bucket::Tier;
use crate::error::RetentionError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How many slots each tier keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionCounts {
    pub days: u32,
    pub weeks: u32,
    pub months: u32,
    pub years: u32,
}

impl Default for RetentionCounts {
    fn default() -> Self {
        Self {
            days: 6,
            weeks: 5,
            months: 6,
            years: 10,
        }
    }
}

impl RetentionCounts {
    pub const NONE: RetentionCounts = RetentionCounts {
        days: 0,
        weeks: 0,
        months: 0,
        years: 0,
    };

    pub fn new(days: i64, weeks: i64, months: i64, years: i64) -> Result<Self, RetentionError> {
        Ok(Self {
            days: checked_count("days", days)?,
            weeks: checked_count("weeks", weeks)?,
            months: checked_count("months", months)?,
            years: checked_count("years", years)?,
        })
    }

    pub fn for_tier(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Day => self.days,
            Tier::Week => self.weeks,
            Tier::Month => self.months,
            Tier::Year => self.years,
        }
    }

    pub fn is_empty(&self) -> bool {
        Tier::ALL.iter().all(|tier| self.for_tier(*tier) == 0)
    }
}

fn checked_count(tier: &str, value: i64) -> Result<u32, RetentionError> {
    if value < 0 {
        return Err(RetentionError::InvalidPolicy(format!(
            "{tier} to retain must not be negative (got {value})"
        )));
    }
    u32::try_from(value).map_err(|_| {
        RetentionError::InvalidPolicy(format!("{tier} to retain is too large (got {value})"))
    })
}

/// Immutable retention parameters for a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    counts: RetentionCounts,
    anchor: NaiveDate,
}

impl RetentionPolicy {
    pub fn new(
        days: i64,
        weeks: i64,
        months: i64,
        years: i64,
        anchor: NaiveDate,
    ) -> Result<Self, RetentionError> {
        let counts = RetentionCounts::new(days, weeks, months, years)?;
        Ok(Self::from_counts(counts, anchor))
    }

    pub fn from_counts(counts: RetentionCounts, anchor: NaiveDate) -> Self {
        Self { counts, anchor }
    }

    pub fn counts(&self) -> RetentionCounts {
        self.counts
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn retain_count(&self, tier: Tier) -> u32 {
        self.counts.for_tier(tier)
    }
}
