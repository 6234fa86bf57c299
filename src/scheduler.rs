use crate::bucket::{self, Tier};
use crate::policy::RetentionPolicy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Why a date survives pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RetentionReason {
    Anchor,
    /// `offset` periods before the anchor.
    Slot { tier: Tier, offset: u32 },
    /// `offset` periods after the anchor; only produced by [`rotating_slot_for`].
    Rotated { tier: Tier, offset: u32 },
    /// The archive written by the current run.
    Latest,
}

impl fmt::Display for RetentionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionReason::Anchor => f.write_str("anchor"),
            RetentionReason::Slot { tier, offset } => write!(f, "{tier} {offset}"),
            RetentionReason::Rotated { tier, offset } => write!(f, "{tier} +{offset}"),
            RetentionReason::Latest => f.write_str("latest"),
        }
    }
}

/// Calendar dates a policy keeps, each tagged with the first slot that claimed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetainedDateSet {
    dates: BTreeMap<NaiveDate, RetentionReason>,
}

impl RetainedDateSet {
    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.dates.contains_key(date)
    }

    pub fn reason(&self, date: &NaiveDate) -> Option<RetentionReason> {
        self.dates.get(date).copied()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, RetentionReason)> + '_ {
        self.dates.iter().map(|(date, reason)| (*date, *reason))
    }

    fn claim(&mut self, date: NaiveDate, reason: RetentionReason) {
        self.dates.entry(date).or_insert(reason);
    }
}

/// Enumerate every round-robin slot of `policy`.
///
/// Slot `k` of a tier is the date exactly `k` periods before the anchor. The
/// anchor is always present, even when every count is zero.
pub fn retained_dates(policy: &RetentionPolicy) -> RetainedDateSet {
    let anchor = policy.anchor();
    let mut retained = RetainedDateSet::default();
    retained.claim(anchor, RetentionReason::Anchor);

    for tier in Tier::ALL {
        for offset in 0..policy.retain_count(tier) {
            match bucket::shift_back(tier, anchor, offset) {
                Some(date) => retained.claim(date, RetentionReason::Slot { tier, offset }),
                // Further offsets only move deeper out of range.
                None => break,
            }
        }
    }

    tracing::debug!(
        anchor = %anchor,
        retained = retained.len(),
        "computed round-robin slots"
    );
    retained
}

/// Classify one date against `policy` without enumerating the whole schedule.
pub fn slot_for(policy: &RetentionPolicy, date: NaiveDate) -> Option<RetentionReason> {
    let anchor = policy.anchor();
    if date == anchor {
        return Some(RetentionReason::Anchor);
    }
    Tier::ALL.into_iter().find_map(|tier| {
        let offset = u32::try_from(bucket::periods_before(tier, anchor, date)).ok()?;
        if offset >= policy.retain_count(tier) {
            return None;
        }
        (bucket::shift_back(tier, anchor, offset) == Some(date))
            .then_some(RetentionReason::Slot { tier, offset })
    })
}

/// Like [`slot_for`], but slots also rotate forward from the anchor.
///
/// Pruning anchors at the oldest archive, so newer archives are matched
/// against the dates exactly `k` periods after it. Runs in constant time
/// regardless of the retain counts.
pub fn rotating_slot_for(policy: &RetentionPolicy, date: NaiveDate) -> Option<RetentionReason> {
    slot_for(policy, date).or_else(|| slot_after(policy, date))
}

fn slot_after(policy: &RetentionPolicy, date: NaiveDate) -> Option<RetentionReason> {
    let anchor = policy.anchor();
    Tier::ALL.into_iter().find_map(|tier| {
        let whole = bucket::periods_after(tier, anchor, date);
        // A shift clamped to a shorter month end is one whole period short.
        [whole, whole + 1].into_iter().find_map(|candidate| {
            let offset = u32::try_from(candidate).ok()?;
            if offset >= policy.retain_count(tier) {
                return None;
            }
            (bucket::shift_forward(tier, anchor, offset) == Some(date))
                .then_some(RetentionReason::Rotated { tier, offset })
        })
    })
}
