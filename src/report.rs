use crate::bucket::format_date;
use crate::error::ReportError;
use crate::prune::{PlannedBackup, PrunePlan};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PlanCsvRecord {
    id: String,
    date: String,
    action: String,
    reason: String,
}

impl PlanCsvRecord {
    fn new(backup: &PlannedBackup, action: &str) -> Self {
        Self {
            id: backup.id.clone(),
            date: format_date(backup.date),
            action: action.to_string(),
            reason: backup
                .reason
                .map(|reason| reason.to_string())
                .unwrap_or_default(),
        }
    }
}

pub fn save_plan_to_json<P: AsRef<Path>>(plan: &PrunePlan, path: P) -> ReportResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, plan)?;
    Ok(())
}

pub fn save_plan_to_csv<P: AsRef<Path>>(plan: &PrunePlan, path: P) -> ReportResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for backup in &plan.keep {
        writer.serialize(PlanCsvRecord::new(backup, "keep"))?;
    }
    for backup in &plan.remove {
        writer.serialize(PlanCsvRecord::new(backup, "remove"))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_plan_from_json<P: AsRef<Path>>(path: P) -> ReportResult<PrunePlan> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

/// Pick the format from the file extension.
pub fn save_plan<P: AsRef<Path>>(plan: &PrunePlan, path: P) -> ReportResult<()> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => save_plan_to_json(plan, path),
        Some(ext) if ext.eq_ignore_ascii_case("csv") => save_plan_to_csv(plan, path),
        _ => Err(ReportError::UnsupportedFormat(path.to_path_buf())),
    }
}
