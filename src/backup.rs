use crate::command::CommandRunner;
use crate::error::BackupResult;
use crate::filename::{archive_file_name, backup_records};
use crate::options::{AnchorStrategy, BackupOptions};
use crate::policy::RetentionPolicy;
use crate::prune::{self, BackupRecord, PrunePlan};
use crate::scheduler::{RetentionReason, rotating_slot_for};
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

/// One round-robin backup run against a remote destination.
pub struct RoundRobinBackup<R: CommandRunner> {
    options: BackupOptions,
    runner: R,
    today: NaiveDate,
}

impl<R: CommandRunner> RoundRobinBackup<R> {
    pub fn new(options: BackupOptions, runner: R) -> Self {
        Self {
            options,
            runner,
            today: Local::now().date_naive(),
        }
    }

    /// Override the date used to name the new archive.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn options(&self) -> &BackupOptions {
        &self.options
    }

    /// Sync, archive, then prune. Returns the pruning plan that was applied.
    pub fn backup(&self) -> BackupResult<PrunePlan> {
        self.sync_files()?;
        let latest = self.create_archive()?;
        self.prune_keeping(Some(&latest))
    }

    pub fn sync_files(&self) -> BackupResult<()> {
        info!(source = %self.options.source, destination = %self.options.destination, "syncing files");
        let mirror = self.options.remote_path(&self.options.rsync_dir);
        self.run(&self.options.ssh().build(["/bin/mkdir", "-p", mirror.as_str()]))?;
        self.run(&self.rsync_command())?;
        Ok(())
    }

    fn rsync_command(&self) -> Vec<String> {
        let mirror = self.options.remote_path(&self.options.rsync_dir);
        let mut command = vec![
            "rsync".to_string(),
            "-avz".to_string(),
            "--delete".to_string(),
            "-e".to_string(),
            self.options.ssh().transport(),
            self.options.source.clone(),
            self.options.target.rsync_location(&mirror),
        ];
        for item in &self.options.exclude {
            command.push("--exclude".to_string());
            command.push(item.clone());
        }
        command
    }

    /// Tar the mirror into `<prefix><today>.tar.bzip2`.
    pub fn create_archive(&self) -> BackupResult<String> {
        let name = archive_file_name(&self.options.backup_prefix, self.today);
        info!(archive = %name, "creating archive");
        let base = self.options.target.path.as_str();
        let archive = self.options.remote_path(&name);
        self.run(&self.options.ssh().build([
            "/bin/tar",
            "-C",
            base,
            "-cjf",
            archive.as_str(),
            self.options.rsync_dir.as_str(),
        ]))?;
        Ok(name)
    }

    pub fn existing_backups(&self) -> BackupResult<Vec<BackupRecord>> {
        let base = self.options.target.path.as_str();
        let listing = self.run(&self.options.ssh().build(["/bin/ls", base]))?;
        Ok(backup_records(&self.options.backup_prefix, &listing))
    }

    /// Compute the pruning plan for the remote archives without deleting anything.
    ///
    /// Slots rotate forward from the anchor, so with the default oldest anchor
    /// an archive `k` periods newer than the oldest one fills slot `k`.
    pub fn plan(&self) -> BackupResult<PrunePlan> {
        self.plan_keeping(None)
    }

    fn plan_keeping(&self, latest: Option<&str>) -> BackupResult<PrunePlan> {
        let records = self.existing_backups()?;
        let anchor = match self.options.anchor {
            AnchorStrategy::Oldest => prune::oldest_date(&records),
            AnchorStrategy::Newest => prune::newest_date(&records),
        };
        let Some(anchor) = anchor else {
            debug!("no existing archives, nothing to prune");
            return Ok(PrunePlan::empty());
        };
        let policy = RetentionPolicy::from_counts(self.options.retention, anchor);
        Ok(prune::partition_by(&records, Some(anchor), |record| {
            if latest == Some(record.id.as_str()) {
                return Some(RetentionReason::Latest);
            }
            rotating_slot_for(&policy, record.date)
        }))
    }

    /// Delete stale archives with a single remote `rm`.
    pub fn prune(&self) -> BackupResult<PrunePlan> {
        self.prune_keeping(None)
    }

    fn prune_keeping(&self, latest: Option<&str>) -> BackupResult<PrunePlan> {
        let plan = self.plan_keeping(latest)?;
        info!(summary = %plan.to_cli_summary(), "pruning archives");
        if plan.remove.is_empty() {
            return Ok(plan);
        }

        let paths: Vec<String> = plan
            .remove
            .iter()
            .map(|backup| self.options.remote_path(&backup.id))
            .collect();
        let remote = ["/bin/rm".to_string(), "-r".to_string()]
            .into_iter()
            .chain(paths);
        self.run(&self.options.ssh().build(remote))?;
        Ok(plan)
    }

    fn run(&self, command: &[String]) -> BackupResult<String> {
        debug!(command = %command.join(" "), "running");
        self.runner.execute(command)
    }
}
