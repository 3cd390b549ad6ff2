//! TaskRank - task prioritization from the command line.
//!
//! ## Usage
//!
//! ```bash
//! # Rank tasks from a file
//! taskrank analyze tasks.json
//!
//! # Read from stdin, emit the JSON report
//! cat tasks.json | taskrank analyze --json
//!
//! # Top suggestions as of a fixed date
//! taskrank suggest tasks.json --today 2025-06-15
//!
//! # Run the HTTP service
//! taskrank serve --addr 0.0.0.0:8000
//! ```

use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use taskrank_api::{AnalysisReport, ServiceConfig, SuggestionReport, intake};
use taskrank_core::{LogGuard, TaskRankError, init_logging, parse_date};
use taskrank_engine::graph::format_cycle;
use taskrank_engine::{RankedTask, Ranking, TaskScorer, rank_tasks};
use tracing::{error, info};

/// TaskRank task prioritization
///
/// Ranks a batch of tasks by importance, urgency, effort, and how many
/// other tasks depend on them, and flags circular dependencies.
#[derive(Parser, Debug)]
#[command(name = "taskrank")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.taskrank/logs/)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Service configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score and rank every task in a batch
    Analyze(BatchArgs),
    /// Show the highest-priority tasks of a batch
    Suggest(BatchArgs),
    /// Run the HTTP service
    Serve {
        /// Listen address (overrides the configuration file)
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Tasks JSON file; reads stdin when omitted or "-"
    input: Option<PathBuf>,

    /// Print the JSON report instead of a table
    #[arg(long)]
    json: bool,

    /// Reference date for urgency (YYYY-MM-DD or YYYY/MM/DD)
    #[arg(long, value_parser = parse_today)]
    today: Option<NaiveDate>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("taskrank error: {:#}", e);
            eprintln!("Error: {:#}", e);
            if let Some(hint) = e.downcast_ref::<TaskRankError>().and_then(TaskRankError::guidance) {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::from(1)
        }
    }
}

/// Set up logging based on CLI arguments.
fn setup_logging(cli: &Cli) -> taskrank_core::Result<LogGuard> {
    init_logging(cli.log_dir.clone(), cli.verbose > 0)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ServiceConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze(args) => {
            let ranking = rank_input(&args, &config)?;
            if args.json {
                print_json(&AnalysisReport::from_ranking(&ranking))
            } else {
                print_table(&ranking, ranking.entries());
                Ok(())
            }
        }
        Command::Suggest(args) => {
            let ranking = rank_input(&args, &config)?;
            if args.json {
                print_json(&SuggestionReport::from_ranking(&ranking, config.suggestion_limit))
            } else {
                print_table(&ranking, ranking.top(config.suggestion_limit));
                Ok(())
            }
        }
        Command::Serve { addr } => {
            let config = match addr {
                Some(addr) => config.with_bind_addr(addr),
                None => config,
            };
            info!("Starting TaskRank service");
            let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
            runtime.block_on(taskrank_api::serve(config))?;
            Ok(())
        }
    }
}

fn rank_input(args: &BatchArgs, config: &ServiceConfig) -> anyhow::Result<Ranking> {
    let body = read_input(args.input.as_deref())?;
    let tasks = intake::read_tasks(&body).map_err(TaskRankError::from)?;
    let today = args.today.unwrap_or_else(|| chrono::Local::now().date_naive());

    info!(tasks = tasks.len(), %today, "ranking batch");
    Ok(rank_tasks(tasks, &TaskScorer::with_weights(config.scoring), today))
}

fn read_input(path: Option<&Path>) -> taskrank_core::Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read(path).map_err(|e| TaskRankError::io("reading tasks", path, e))
        }
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| TaskRankError::io("reading tasks", "<stdin>", e))?;
            Ok(buf)
        }
    }
}

fn print_json<T: serde::Serialize>(report: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(report).context("failed to render report")?;
    println!("{rendered}");
    Ok(())
}

fn print_table(ranking: &Ranking, entries: &[RankedTask]) {
    if let Some(cycle) = ranking.cycle() {
        println!("Warning: circular dependencies detected: {}", format_cycle(cycle));
        println!();
    }

    if entries.is_empty() {
        println!("No tasks to rank.");
        return;
    }

    println!("{:>7}  {:<8}  {:<10}  {}", "SCORE", "PRIORITY", "ID", "TITLE");
    for entry in entries {
        println!(
            "{:>7.2}  {:<8}  {:<10}  {}",
            entry.result.score,
            entry.result.band().to_string(),
            entry.task.id.to_string(),
            entry.task.display_title()
        );
        println!("{:>30}{}", "", entry.result.explanation);
    }
}

fn parse_today(value: &str) -> Result<NaiveDate, TaskRankError> {
    parse_date(value).ok_or_else(|| TaskRankError::InvalidDate {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_args() {
        let cli = Cli::try_parse_from(["taskrank", "-v", "analyze", "tasks.json", "--json", "--today", "2025/06/15"])
            .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.input, Some(PathBuf::from("tasks.json")));
                assert!(args.json);
                assert_eq!(args.today, NaiveDate::from_ymd_opt(2025, 6, 15));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_today_rejected() {
        assert!(Cli::try_parse_from(["taskrank", "suggest", "--today", "soon"]).is_err());
    }

    #[test]
    fn test_serve_addr() {
        let cli = Cli::try_parse_from(["taskrank", "serve", "--addr", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Command::Serve { addr } => assert_eq!(addr.map(|a| a.port()), Some(9000)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
