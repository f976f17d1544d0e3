use crate::aggregator::{CorrelatorConfig, TaskFilter};
use crate::output::TimeUnit;
use crate::utils::config::SEARCH_WINDOW;
use std::path::PathBuf;

/// Arguments for the stats command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct StatsArgs {
    /// Trace files, one per CPU
    pub files: Vec<PathBuf>,

    /// Skip jobs released before the task-system release
    pub skip_before_release: bool,

    /// Unit for printed times and for `period`
    pub unit: TimeUnit,

    /// Only report the task with this pid
    pub pid: Option<u16>,

    /// Only report tasks with this name
    pub name: Option<String>,

    /// Only report tasks with this period (in `unit`)
    pub period: Option<u64>,

    /// Events searched after each release
    pub window: usize,

    /// Output path for a JSON report (optional)
    pub output_json: Option<PathBuf>,
}

impl Default for StatsArgs {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            skip_before_release: false,
            unit: TimeUnit::Nanoseconds,
            pid: None,
            name: None,
            period: None,
            window: SEARCH_WINDOW,
            output_json: None,
        }
    }
}

impl StatsArgs {
    /// Analysis settings in raw trace units
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            filter: TaskFilter {
                pid: self.pid,
                name: self.name.clone(),
                period: self.period.map(|p| self.unit.to_nanos(p)),
            },
            skip_before_release: self.skip_before_release,
            correlator: CorrelatorConfig {
                search_window: self.window,
            },
        }
    }
}

/// Unit-free settings for one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub filter: TaskFilter,
    pub skip_before_release: bool,
    pub correlator: CorrelatorConfig,
}
