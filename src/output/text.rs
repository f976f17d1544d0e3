//! Plain-text job table.
//!
//! One header line, then for each task a `# task ...` line followed by
//! one comma-separated row per job. Unknown values print as `-`.

use super::report::{StatsReport, TaskReport};
use crate::aggregator::JobStats;
use crate::utils::config::NS_PER_MS;
use std::io::{self, Write};

/// Unit used when printing times
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeUnit {
    #[default]
    Nanoseconds,
    Milliseconds,
}

impl TimeUnit {
    pub fn from_millis_flag(want_ms: bool) -> Self {
        if want_ms {
            Self::Milliseconds
        } else {
            Self::Nanoseconds
        }
    }

    /// Convert a value given in this unit to raw nanoseconds
    pub fn to_nanos(self, value: u64) -> u64 {
        match self {
            Self::Nanoseconds => value,
            Self::Milliseconds => value.saturating_mul(NS_PER_MS),
        }
    }

    /// Format an unsigned duration right-aligned in `width` columns
    fn duration(self, ns: u64, width: usize) -> String {
        match self {
            Self::Nanoseconds => format!("{:>width$}", ns),
            Self::Milliseconds => format!("{:>width$.2}", ns as f64 / NS_PER_MS as f64),
        }
    }

    fn signed(self, ns: i64, width: usize) -> String {
        match self {
            Self::Nanoseconds => format!("{:>width$}", ns),
            Self::Milliseconds => format!("{:>width$.2}", ns as f64 / NS_PER_MS as f64),
        }
    }

    /// Compact form used on the task info line
    fn plain(self, ns: u64) -> String {
        match self {
            Self::Nanoseconds => ns.to_string(),
            Self::Milliseconds => format!("{:.2}", ns as f64 / NS_PER_MS as f64),
        }
    }
}

/// Write the whole report as a text table
///
/// **Public** - main entry point for text output
pub fn write_text_report<W: Write>(
    report: &StatsReport,
    unit: TimeUnit,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "{}", header_line())?;
    for task in &report.tasks {
        writeln!(out, "{}", task_line(task, unit))?;
        let period = task.task.period.unwrap_or(0);
        for job in &task.jobs {
            writeln!(out, "{}", job_line(job, period, unit))?;
        }
    }
    Ok(())
}

pub fn header_line() -> String {
    format!(
        "#{:>5}, {:>5}, {:>10}, {:>10}, {:>10}, {:>8}, {:>10}, {:>10}, {:>7}",
        "Task",
        "Job",
        "Period",
        "Response",
        "Execution",
        "DL Miss?",
        "Lateness",
        "Tardiness",
        "Forced?"
    )
}

/// `# task NAME=.. PID=.. COST=.. PERIOD=.. CPU=..`
pub fn task_line(task: &TaskReport, unit: TimeUnit) -> String {
    let meta = &task.task;
    let or_dash = |v: Option<u64>| v.map_or_else(|| "-".to_string(), |ns| unit.plain(ns));

    format!(
        "# task NAME={} PID={} COST={} PERIOD={} CPU={}",
        meta.name.as_deref().unwrap_or("-"),
        meta.pid,
        or_dash(meta.cost),
        or_dash(meta.period),
        meta.cpu.map_or_else(|| "-".to_string(), |c| c.to_string()),
    )
}

pub fn job_line(job: &JobStats, period: u64, unit: TimeUnit) -> String {
    let lateness = match job.lateness {
        Some(l) => unit.signed(l, 10),
        None => format!("{:>10}", "-"),
    };

    format!(
        " {:>5}, {:>5}, {}, {}, {}, {:>8}, {}, {},{:>7}",
        job.pid,
        job.job,
        unit.duration(period, 10),
        unit.duration(job.response_time, 10),
        unit.duration(job.core_execution_time, 10),
        u8::from(job.deadline_missed),
        lateness,
        unit.duration(job.tardiness, 10),
        u8::from(job.forced),
    )
}
