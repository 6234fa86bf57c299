//! Calendar arithmetic for retention tiers.
//!
//! Every function here is total for valid dates. Offsets are signed: a
//! negative value means the date lies before the anchor.

use crate::error::RetentionError;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Day,
    Week,
    Month,
    Year,
}

impl Tier {
    /// Evaluation order; earlier tiers claim a shared date first.
    pub const ALL: [Tier; 4] = [Tier::Day, Tier::Week, Tier::Month, Tier::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Day => "day",
            Tier::Week => "week",
            Tier::Month => "month",
            Tier::Year => "year",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a date, rejecting components that do not name a real calendar day.
pub fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, RetentionError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        RetentionError::InvalidDate(format!("{year:04}-{month:02}-{day:02} is not a calendar date"))
    })
}

pub fn parse_date(value: &str) -> Result<NaiveDate, RetentionError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|err| RetentionError::InvalidDate(format!("'{value}': {err}")))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn days_since(anchor: NaiveDate, date: NaiveDate) -> i64 {
    date.signed_duration_since(anchor).num_days()
}

pub fn weeks_since(anchor: NaiveDate, date: NaiveDate) -> i64 {
    days_since(anchor, date).div_euclid(7)
}

/// Whole calendar months from `anchor` to `date`; a partial month is not counted.
pub fn months_since(anchor: NaiveDate, date: NaiveDate) -> i64 {
    let years = i64::from(date.year()) - i64::from(anchor.year());
    let mut months = years * 12 + i64::from(date.month()) - i64::from(anchor.month());
    if date.day() < anchor.day() {
        months -= 1;
    }
    months
}

pub fn years_since(anchor: NaiveDate, date: NaiveDate) -> i64 {
    let mut years = i64::from(date.year()) - i64::from(anchor.year());
    if (date.month(), date.day()) < (anchor.month(), anchor.day()) {
        years -= 1;
    }
    years
}

pub fn tier_since(tier: Tier, anchor: NaiveDate, date: NaiveDate) -> i64 {
    match tier {
        Tier::Day => days_since(anchor, date),
        Tier::Week => weeks_since(anchor, date),
        Tier::Month => months_since(anchor, date),
        Tier::Year => years_since(anchor, date),
    }
}

/// Number of whole `tier` periods `date` lies before `anchor`.
pub fn periods_before(tier: Tier, anchor: NaiveDate, date: NaiveDate) -> i64 {
    tier_since(tier, date, anchor)
}

/// Number of whole `tier` periods `date` lies after `anchor`.
pub fn periods_after(tier: Tier, anchor: NaiveDate, date: NaiveDate) -> i64 {
    tier_since(tier, anchor, date)
}

/// The date exactly `periods` tier periods before `anchor`.
///
/// Month and year shifts clamp to the end of a shorter month, so
/// 2004-03-31 shifted back one month is 2004-02-29.
pub fn shift_back(tier: Tier, anchor: NaiveDate, periods: u32) -> Option<NaiveDate> {
    match tier {
        Tier::Day => anchor.checked_sub_days(Days::new(u64::from(periods))),
        Tier::Week => anchor.checked_sub_days(Days::new(u64::from(periods) * 7)),
        Tier::Month => anchor.checked_sub_months(Months::new(periods)),
        Tier::Year => periods
            .checked_mul(12)
            .and_then(|months| anchor.checked_sub_months(Months::new(months))),
    }
}

/// The date exactly `periods` tier periods after `anchor`, clamped like [`shift_back`].
pub fn shift_forward(tier: Tier, anchor: NaiveDate, periods: u32) -> Option<NaiveDate> {
    match tier {
        Tier::Day => anchor.checked_add_days(Days::new(u64::from(periods))),
        Tier::Week => anchor.checked_add_days(Days::new(u64::from(periods) * 7)),
        Tier::Month => anchor.checked_add_months(Months::new(periods)),
        Tier::Year => periods
            .checked_mul(12)
            .and_then(|months| anchor.checked_add_months(Months::new(months))),
    }
}
