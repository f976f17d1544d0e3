//! Tasks command: list the tasks found in a set of traces.

use crate::aggregator::{merge_events, TaskIndex};
use crate::parser::load_traces;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Print one line per task with its metadata and event count
///
/// **Public** - called from main.rs
pub fn execute_tasks(files: &[PathBuf]) -> Result<()> {
    let traces = load_traces(files).context("Failed to load trace files")?;
    let merged = merge_events(&traces);
    let index = TaskIndex::build(&traces, &merged);

    let or_dash = |v: Option<u64>| v.map_or_else(|| "-".to_string(), |n| n.to_string());

    println!(
        "{:>6}  {:<16} {:>12} {:>12} {:>4} {:>8}",
        "PID", "NAME", "COST", "PERIOD", "CPU", "EVENTS"
    );
    for task in index.tasks() {
        let meta = task.metadata();
        println!(
            "{:>6}  {:<16} {:>12} {:>12} {:>4} {:>8}",
            meta.pid,
            meta.name.as_deref().unwrap_or("-"),
            or_dash(meta.cost),
            or_dash(meta.period),
            or_dash(meta.cpu.map(u64::from)),
            task.events().len()
        );
    }

    match index.system_release() {
        Some(release) => println!("System release: {}", release),
        None => println!("System release: not recorded"),
    }

    Ok(())
}
