use crate::scheduler::{RetainedDateSet, RetentionReason};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A backup artifact and the date parsed from its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub id: String,
    pub date: NaiveDate,
}

impl BackupRecord {
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedBackup {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RetentionReason>,
}

/// Outcome of a pruning decision. Both lists follow input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrunePlan {
    pub anchor: Option<NaiveDate>,
    pub keep: Vec<PlannedBackup>,
    pub remove: Vec<PlannedBackup>,
}

impl PrunePlan {
    pub fn empty() -> Self {
        Self {
            anchor: None,
            keep: Vec::new(),
            remove: Vec::new(),
        }
    }

    pub fn remove_ids(&self) -> Vec<String> {
        self.remove.iter().map(|backup| backup.id.clone()).collect()
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = vec![
            format!("keep={}", self.keep.len()),
            format!("remove={}", self.remove.len()),
        ];
        if let Some(anchor) = self.anchor {
            parts.push(format!("anchor={anchor}"));
        }
        parts.join(", ")
    }
}

/// Identifiers of every record whose date is not retained.
pub fn decide(records: &[BackupRecord], retained: &RetainedDateSet) -> Vec<String> {
    records
        .iter()
        .filter(|record| !retained.contains(&record.date))
        .map(|record| record.id.clone())
        .collect()
}

pub fn partition(records: &[BackupRecord], retained: &RetainedDateSet) -> PrunePlan {
    let anchor = retained
        .iter()
        .find(|(_, reason)| *reason == RetentionReason::Anchor)
        .map(|(date, _)| date);
    partition_by(records, anchor, |record| retained.reason(&record.date))
}

/// Split `records` by asking `classify` about each one in turn.
///
/// Cost is linear in the number of records, so callers holding a per-date
/// classifier never need to materialize the retained set.
pub fn partition_by<F>(
    records: &[BackupRecord],
    anchor: Option<NaiveDate>,
    classify: F,
) -> PrunePlan
where
    F: Fn(&BackupRecord) -> Option<RetentionReason>,
{
    let mut plan = PrunePlan::empty();
    plan.anchor = anchor;

    for record in records {
        let reason = classify(record);
        let planned = PlannedBackup {
            id: record.id.clone(),
            date: record.date,
            reason,
        };
        match reason {
            Some(reason) => {
                tracing::debug!(id = %record.id, date = %record.date, %reason, "keeping backup");
                plan.keep.push(planned);
            }
            None => {
                tracing::debug!(id = %record.id, date = %record.date, "backup is stale");
                plan.remove.push(planned);
            }
        }
    }
    plan
}

pub fn oldest_date(records: &[BackupRecord]) -> Option<NaiveDate> {
    records.iter().map(|record| record.date).min()
}

pub fn newest_date(records: &[BackupRecord]) -> Option<NaiveDate> {
    records.iter().map(|record| record.date).max()
}
