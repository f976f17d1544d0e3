//! st-job-stats CLI
//!
//! Prints per-job response time, lateness and execution time for
//! binary real-time scheduling traces.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use sched_trace_stats::commands::{
    display_version, execute_stats, execute_tasks, validate_args, validate_report_file, StatsArgs,
};
use sched_trace_stats::output::TimeUnit;
use sched_trace_stats::utils::config::SEARCH_WINDOW;

/// Job statistics for real-time scheduling traces
#[derive(Parser, Debug)]
#[command(name = "st-job-stats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print per-job statistics
    Stats {
        /// Trace files (one per CPU)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Skip jobs prior to task-system release
        #[arg(short = 'r', long)]
        skip_before_release: bool,

        /// Output milliseconds (default: nanoseconds)
        #[arg(short = 'm', long)]
        milliseconds: bool,

        /// Show only data for the task with the given PID
        #[arg(short = 'p', long)]
        pid: Option<u16>,

        /// Show only data for the task(s) with the given NAME
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Show only data for the task(s) with the given PERIOD
        #[arg(short = 't', long)]
        period: Option<u64>,

        /// Number of events searched after each release
        #[arg(long, default_value_t = SEARCH_WINDOW)]
        window: usize,

        /// Also write a JSON report to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// List tasks found in the traces
    Tasks {
        /// Trace files (one per CPU)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Validate a JSON report file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Stats {
            files,
            skip_before_release,
            milliseconds,
            pid,
            name,
            period,
            window,
            json,
        } => {
            let args = StatsArgs {
                files,
                skip_before_release,
                unit: TimeUnit::from_millis_flag(milliseconds),
                pid,
                name,
                period,
                window,
                output_json: json,
            };

            validate_args(&args)?;
            execute_stats(args)?;
        }

        Commands::Tasks { files } => {
            execute_tasks(&files)?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
