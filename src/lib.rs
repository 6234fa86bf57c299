pub mod backup;
pub mod bucket;
pub mod command;
pub mod error;
pub mod filename;
pub mod options;
pub mod policy;
pub mod prune;
pub mod report;
pub mod scheduler;
pub mod ssh;

pub use backup::RoundRobinBackup;
pub use bucket::{Tier, calendar_date, days_since, months_since, parse_date, weeks_since, years_since};
pub use command::{CommandRunner, DryRunCommandRunner, SystemCommandRunner};
pub use error::{BackupError, BackupResult, ReportError, RetentionError};
pub use options::{AnchorStrategy, Args, BackupOptions};
pub use policy::{RetentionCounts, RetentionPolicy};
pub use prune::{BackupRecord, PlannedBackup, PrunePlan, decide, partition, partition_by};
pub use report::{load_plan_from_json, save_plan, save_plan_to_csv, save_plan_to_json};
pub use scheduler::{RetainedDateSet, RetentionReason, retained_dates, rotating_slot_for, slot_for};
