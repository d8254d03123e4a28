//! Timothy - clone a PostgreSQL database from one cluster into another.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use std::process::ExitCode;
use timothy_core::logging::{init_logging, LogConfig};
use timothy_core::{CloneOrchestrator, Provisioner, TimothyError};

/// Exit status when the destination database already exists.
const EXIT_ALREADY_EXISTS: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut log_config = LogConfig::default();
    if let Some(filter) = &cli.log_filter {
        log_config = log_config.with_filter(filter);
    }
    if let Some(dir) = &cli.log_dir {
        log_config = log_config.with_log_dir(dir);
    }
    let _logging_guard = init_logging(log_config);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let info = e.to_error_info();
            eprintln!("{}: {}", info.error_type, info.message);
            if let Some(hint) = info.hint {
                eprintln!("hint: {hint}");
            }
            if e.is_already_exists() {
                ExitCode::from(EXIT_ALREADY_EXISTS)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> Result<(), TimothyError> {
    let orchestrator = CloneOrchestrator::new(cli.tool_config()?);

    match cli.command {
        Command::Ensure { url } => match orchestrator.ensure_exists(&url).await {
            Ok(()) => {
                println!("created {url}");
                Ok(())
            }
            Err(e) if e.is_already_exists() => {
                tracing::info!(endpoint = %url, "Database already exists, nothing to do");
                println!("exists {url}");
                Ok(())
            }
            Err(e) => Err(e),
        },
        Command::Clone { source, dest, dry_run: true, .. } => {
            CloneOrchestrator::validate_pair(&source, &dest)?;
            println!("# provision");
            println!("{}", Provisioner::create_database_command(&dest, orchestrator.tools()));
            for pipeline in orchestrator.plan(&source, &dest) {
                println!("# {}", pipeline.stage());
                println!("{} | {}", pipeline.dump(), pipeline.restore());
            }
            Ok(())
        }
        Command::Clone { source, dest, json, .. } => {
            tracing::info!(source = %source, dest = %dest, "Starting clone");
            let report = orchestrator.clone_to(&source, &dest).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for stage in &report.stages {
                    println!("{:<10} {:>8} ms", stage.stage.as_str(), stage.elapsed_ms);
                }
                println!(
                    "cloned {} -> {} in {} ms",
                    report.source,
                    report.destination,
                    report.elapsed_ms()
                );
            }
            Ok(())
        }
    }
}
