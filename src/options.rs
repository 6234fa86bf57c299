use crate::error::{BackupError, BackupResult};
use crate::policy::RetentionCounts;
use crate::ssh::{DEFAULT_SSH_PORT, SshCommand, SshTarget};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{self, Path, PathBuf};

pub const DEFAULT_RSYNC_DIR: &str = "latest";
pub const DEFAULT_BACKUP_PREFIX: &str = "automated-backup-";

/// Which existing backup the retention schedule is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorStrategy {
    #[default]
    Oldest,
    Newest,
}

#[derive(Debug, Parser)]
#[command(
    name = "rrbackup",
    version,
    about = "Round-robin backups over ssh: rsync a directory, archive it, prune old archives.",
    after_help = "Archives are named <backup-prefix><YYYY-MM-DD>.tar.bzip2 inside the destination directory."
)]
pub struct Args {
    /// The source directory path
    pub source: String,

    /// The target destination, in rsync/ssh format: user@example.com:/absolute/path/to/backup/dir
    pub destination: String,

    /// Remote SSH port
    #[arg(short = 'p', long, env = "RRBACKUP_SSH_PORT", default_value_t = DEFAULT_SSH_PORT)]
    pub ssh_port: u16,

    /// SSH identity file
    #[arg(short = 'i', long, env = "RRBACKUP_SSH_IDENTITY_FILE")]
    pub ssh_identity_file: Option<PathBuf>,

    /// File or directory to exclude from rsync; may be repeated
    #[arg(
        short = 'E',
        long,
        env = "RRBACKUP_EXCLUDE",
        value_delimiter = ',',
        num_args = 1..,
        action = clap::ArgAction::Append
    )]
    pub exclude: Vec<String>,

    /// Directory within the destination holding the latest unpacked rsync copy
    #[arg(long, env = "RRBACKUP_RSYNC_DIR", default_value = DEFAULT_RSYNC_DIR)]
    pub rsync_dir: String,

    /// Prefix of archive files, e.g. <backup-prefix><date>.tar.bzip2
    #[arg(long, env = "RRBACKUP_BACKUP_PREFIX", default_value = DEFAULT_BACKUP_PREFIX)]
    pub backup_prefix: String,

    /// Number of daily archives to retain (not counting the anchor)
    #[arg(long, env = "RRBACKUP_DAYS", default_value_t = 6, allow_negative_numbers = true)]
    pub days: i64,

    /// Number of weekly archives to retain
    #[arg(long, env = "RRBACKUP_WEEKS", default_value_t = 5, allow_negative_numbers = true)]
    pub weeks: i64,

    /// Number of monthly archives to retain
    #[arg(long, env = "RRBACKUP_MONTHS", default_value_t = 6, allow_negative_numbers = true)]
    pub months: i64,

    /// Number of yearly archives to retain
    #[arg(long, env = "RRBACKUP_YEARS", default_value_t = 10, allow_negative_numbers = true)]
    pub years: i64,

    /// Existing archive the retention schedule is anchored to
    #[arg(long, env = "RRBACKUP_ANCHOR", value_enum, default_value_t = AnchorStrategy::Oldest)]
    pub anchor: AnchorStrategy,

    /// Print the commands instead of executing them
    #[arg(long, alias = "debug")]
    pub dry_run: bool,

    /// Write the pruning plan to this .json or .csv file
    #[arg(long, env = "RRBACKUP_PLAN_OUTPUT")]
    pub plan_output: Option<PathBuf>,

    /// Log every command and retention decision
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn into_options(self) -> BackupResult<BackupOptions> {
        let retention = RetentionCounts::new(self.days, self.weeks, self.months, self.years)?;
        let ssh_identity_file = self
            .ssh_identity_file
            .map(|file| absolute_identity_file(&file))
            .transpose()?;
        if self.backup_prefix.is_empty() {
            return Err(BackupError::InvalidOptions(
                "backup prefix must not be empty".to_string(),
            ));
        }

        Ok(BackupOptions {
            target: SshTarget::parse(&self.destination),
            source: self.source,
            destination: self.destination,
            ssh_port: self.ssh_port,
            ssh_identity_file,
            exclude: self.exclude,
            rsync_dir: self.rsync_dir,
            backup_prefix: self.backup_prefix,
            retention,
            anchor: self.anchor,
        })
    }
}

fn absolute_identity_file(file: &Path) -> BackupResult<PathBuf> {
    let absolute = path::absolute(file).map_err(|err| {
        BackupError::InvalidOptions(format!("invalid SSH identity file '{}': {err}", file.display()))
    })?;
    if !absolute.exists() {
        return Err(BackupError::InvalidOptions(format!(
            "invalid SSH identity file, '{}'",
            absolute.display()
        )));
    }
    Ok(absolute)
}

/// Validated settings for one backup run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupOptions {
    pub source: String,
    pub destination: String,
    pub target: SshTarget,
    pub ssh_port: u16,
    pub ssh_identity_file: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub rsync_dir: String,
    pub backup_prefix: String,
    pub retention: RetentionCounts,
    pub anchor: AnchorStrategy,
}

impl BackupOptions {
    /// Defaults for everything except the two required locations.
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        let destination = destination.into();
        Self {
            source: source.into(),
            target: SshTarget::parse(&destination),
            destination,
            ssh_port: DEFAULT_SSH_PORT,
            ssh_identity_file: None,
            exclude: Vec::new(),
            rsync_dir: DEFAULT_RSYNC_DIR.to_string(),
            backup_prefix: DEFAULT_BACKUP_PREFIX.to_string(),
            retention: RetentionCounts::default(),
            anchor: AnchorStrategy::default(),
        }
    }

    pub fn ssh(&self) -> SshCommand {
        SshCommand::new(
            self.target.clone(),
            self.ssh_port,
            self.ssh_identity_file.clone(),
        )
    }

    /// Remote path of `name` inside the destination directory.
    pub fn remote_path(&self, name: &str) -> String {
        let base = self.target.path.trim_end_matches('/');
        if base.is_empty() {
            name.to_string()
        } else {
            format!("{base}/{name}")
        }
    }
}
