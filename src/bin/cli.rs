use clap::Parser;
use rrbackup::{
    Args, BackupResult, CommandRunner, DryRunCommandRunner, RoundRobinBackup, SystemCommandRunner,
    save_plan,
};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run<R: CommandRunner>(
    backup: RoundRobinBackup<R>,
    plan_output: Option<&Path>,
) -> BackupResult<()> {
    let plan = backup.backup()?;
    println!("Backup complete ({})", plan.to_cli_summary());
    if let Some(path) = plan_output {
        save_plan(&plan, path)?;
        println!("Plan written to {}.", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let dry_run = args.dry_run;
    let plan_output = args.plan_output.clone();
    let options = match args.into_options() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?options, "effective configuration");

    let result = if dry_run {
        run(
            RoundRobinBackup::new(options, DryRunCommandRunner),
            plan_output.as_deref(),
        )
    } else {
        run(
            RoundRobinBackup::new(options, SystemCommandRunner),
            plan_output.as_deref(),
        )
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
