//! Per-job timing metrics.
//!
//! A job is the correlation of one Release record with the Completion,
//! SwitchTo and SwitchAway records that carry the same job number in the
//! task's timeline. The search looks only at a bounded window after the
//! release; anything outside it is reported as missing.

use super::task_index::{Task, TaskIndex};
use crate::parser::{EventKind, EventPayload, EventRecord, EventRef, TraceSet};
use crate::utils::config::SEARCH_WINDOW;
use log::debug;
use serde::{Deserialize, Serialize};

/// Correlation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelatorConfig {
    /// Number of events after a release that are searched
    pub search_window: usize,
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        Self {
            search_window: SEARCH_WINDOW,
        }
    }
}

/// Timing metrics of one job, in raw trace time units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    pub pid: u16,
    pub job: u32,
    pub release: u64,
    pub deadline: u64,

    /// Completion time, `None` when no completion was found
    pub completion: Option<u64>,

    /// Completion minus release; 0 when completion is unknown
    pub response_time: u64,

    /// Completion minus deadline; `None` when completion is unknown
    pub lateness: Option<i64>,

    /// Lateness clamped at zero
    pub tardiness: u64,

    pub deadline_missed: bool,

    /// Switch-away minus switch-to, for the first pair found in the window
    pub core_execution_time: u64,

    pub forced: bool,
}

impl JobStats {
    /// Derive metrics from a release and the events found for it
    ///
    /// **Public** - exposed for callers that do their own correlation
    pub fn from_events(
        release: &EventRecord,
        completion: Option<&EventRecord>,
        switch_to: Option<&EventRecord>,
        switch_away: Option<&EventRecord>,
    ) -> Option<Self> {
        let EventPayload::Release {
            release: released_at,
            deadline,
        } = release.payload
        else {
            return None;
        };

        let (completed_at, forced) = match completion.map(|c| c.payload) {
            Some(EventPayload::Completion { when, forced }) => (Some(when), forced),
            _ => (None, false),
        };

        let lateness = completed_at.map(|when| signed_delta(when, deadline));
        let response_time = completed_at
            .map(|when| when.saturating_sub(released_at))
            .unwrap_or(0);

        let core_execution_time = match (
            switch_to.map(|r| r.payload),
            switch_away.map(|r| r.payload),
        ) {
            (
                Some(EventPayload::SwitchTo { when: start, .. }),
                Some(EventPayload::SwitchAway { when: end, .. }),
            ) => end.saturating_sub(start),
            _ => 0,
        };

        Some(Self {
            pid: release.pid(),
            job: release.job(),
            release: released_at,
            deadline,
            completion: completed_at,
            response_time,
            lateness,
            tardiness: lateness.map_or(0, |l| l.max(0).unsigned_abs()),
            deadline_missed: lateness.map_or(true, |l| l > 0),
            core_execution_time,
            forced,
        })
    }
}

/// Read-only correlation queries over a built `TaskIndex`
#[derive(Debug, Clone, Copy)]
pub struct JobCorrelator<'a> {
    traces: &'a TraceSet,
    config: CorrelatorConfig,
}

impl<'a> JobCorrelator<'a> {
    pub fn new(traces: &'a TraceSet, config: CorrelatorConfig) -> Self {
        Self { traces, config }
    }

    /// Metrics for one release event of `task`
    ///
    /// **Public** - single-job query
    ///
    /// # Returns
    /// `None` if `release` is not a Release record in `task`'s timeline
    pub fn stats_for(&self, task: &Task, release: EventRef) -> Option<JobStats> {
        let position = task.position_of(release)?;
        self.stats_at(task, position)
    }

    /// Metrics for every release of `task`
    ///
    /// **Public** - main entry point for correlation
    ///
    /// # Arguments
    /// * `task` - Task to walk
    /// * `origin` - If set, releases earlier than this time are skipped
    pub fn correlate_task(&self, task: &Task, origin: Option<u64>) -> Vec<JobStats> {
        let jobs: Vec<JobStats> = (0..task.events().len())
            .filter_map(|position| self.stats_at(task, position))
            .filter(|stats| origin.map_or(true, |o| stats.release >= o))
            .collect();

        debug!("Task {}: {} jobs correlated", task.pid(), jobs.len());
        jobs
    }

    /// Metrics for every task of an index, in pid order
    pub fn correlate_all(&self, index: &TaskIndex, origin: Option<u64>) -> Vec<Vec<JobStats>> {
        index
            .tasks()
            .map(|task| self.correlate_task(task, origin))
            .collect()
    }

    fn stats_at(&self, task: &Task, position: usize) -> Option<JobStats> {
        let release = self.traces.get(*task.events().get(position)?)?;
        if release.kind() != EventKind::Release {
            return None;
        }

        let start = position + 1;
        let end = start
            .saturating_add(self.config.search_window)
            .min(task.events().len());
        let window: Vec<EventRecord> = task.events()[start.min(end)..end]
            .iter()
            .filter_map(|&e| self.traces.get(e))
            .collect();

        let find = |kind: EventKind| {
            window
                .iter()
                .find(|rec| rec.kind() == kind && rec.job() == release.job())
        };

        JobStats::from_events(
            &release,
            find(EventKind::Completion),
            find(EventKind::SwitchTo),
            find(EventKind::SwitchAway),
        )
    }
}

fn signed_delta(a: u64, b: u64) -> i64 {
    let delta = i128::from(a) - i128::from(b);
    delta.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
