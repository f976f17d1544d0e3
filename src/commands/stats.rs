//! Stats command implementation.
//!
//! The stats command:
//! 1. Maps the trace files
//! 2. Merges them into one chronological sequence
//! 3. Splits the sequence into per-task timelines
//! 4. Correlates every release with its job events
//! 5. Writes the text table (and optionally a JSON report)

use super::models::{AnalysisOptions, StatsArgs};
use crate::aggregator::{merge_events, JobCorrelator, TaskIndex};
use crate::output::{write_report, write_text_report, StatsReport, TaskReport};
use crate::parser::{load_traces, TraceSet};
use crate::utils::error::PipelineError;
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;

/// Execute the stats command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * No usable trace file
/// * `-r` given but the traces contain no system release
/// * Output write errors
pub fn execute_stats(args: StatsArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/3: Loading {} trace file(s)...", args.files.len());
    let traces = load_traces(&args.files).context("Failed to load trace files")?;

    info!("Step 2/3: Correlating jobs...");
    let report = analyze(&traces, &args.analysis_options())
        .context("Failed to analyze trace files")?;

    info!(
        "Found {} jobs in {} tasks, {} deadline misses",
        report.job_count(),
        report.tasks.len(),
        report.deadline_misses()
    );

    info!("Step 3/3: Writing output...");
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_text_report(&report, args.unit, &mut out).context("Failed to write job table")?;
    out.flush().context("Failed to write job table")?;

    if let Some(path) = &args.output_json {
        write_report(&report, path).context("Failed to write JSON report")?;
        info!("✓ Report written to: {}", path.display());
    }

    debug!("Stats completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Run the merge, index and correlation stages over loaded traces
///
/// **Public** - library entry point; no I/O
///
/// # Errors
/// * `PipelineError::MissingSystemRelease` - `skip_before_release` is set
///   but no SysRelease record exists
pub fn analyze(traces: &TraceSet, options: &AnalysisOptions) -> Result<StatsReport, PipelineError> {
    let merged = merge_events(traces);
    let index = TaskIndex::build(traces, &merged);

    let origin = if options.skip_before_release {
        let release = index
            .system_release()
            .ok_or(PipelineError::MissingSystemRelease)?;
        debug!("Skipping jobs released before {}", release);
        Some(release)
    } else {
        None
    };

    let correlator = JobCorrelator::new(traces, options.correlator);
    let tasks: Vec<TaskReport> = index
        .tasks()
        .filter(|task| options.filter.matches(task))
        .map(|task| TaskReport {
            task: task.metadata().clone(),
            event_count: task.events().len(),
            jobs: correlator.correlate_task(task, origin),
        })
        .collect();

    debug!(
        "{} of {} tasks selected",
        tasks.len(),
        index.task_count()
    );

    let inputs = traces
        .stores()
        .iter()
        .map(|s| s.origin().display().to_string())
        .collect();
    let warnings = traces.warnings().iter().map(ToString::to_string).collect();

    Ok(StatsReport::new(
        inputs,
        warnings,
        index.system_release(),
        tasks,
    ))
}

/// Validate stats arguments
///
/// **Public** - can be called before execute_stats for early validation
pub fn validate_args(args: &StatsArgs) -> Result<()> {
    if args.files.is_empty() {
        anyhow::bail!("At least one trace file is required");
    }

    if args.pid == Some(0) {
        anyhow::bail!("Invalid PID");
    }

    if args.period == Some(0) {
        anyhow::bail!("Invalid period");
    }

    if args.window == 0 {
        anyhow::bail!("Search window must be greater than 0");
    }

    Ok(())
}
