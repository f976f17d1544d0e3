use crate::output::read_report;
use crate::utils::config::REPORT_SCHEMA_VERSION;
use anyhow::Result;
use std::path::Path;

/// Validate a JSON report file
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Inputs: {}", report.inputs.len());
    println!("  Tasks: {}", report.tasks.len());
    println!("  Jobs: {}", report.job_count());
    println!("  Deadline Misses: {}", report.deadline_misses());
    if !report.warnings.is_empty() {
        println!("  Load Warnings: {}", report.warnings.len());
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("st-job-stats v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_SCHEMA_VERSION);
    println!();
    println!("Per-job timing statistics from binary real-time scheduling traces.");
}
