//! Split the merged event sequence into per-task timelines.
//!
//! The merged sequence is globally chronological, so appending each event
//! to its task's list keeps every timeline chronological as well. Task
//! metadata (name, parameters) is taken from the first Name and Param
//! records seen for the pid and never overwritten afterwards.

use crate::parser::{EventKind, EventPayload, EventRecord, EventRef, TraceSet};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptive information about a task
///
/// Fields stay `None` when the trace never announced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetadata {
    pub pid: u16,
    pub name: Option<String>,
    /// Worst-case execution time (ns)
    pub cost: Option<u64>,
    /// Period (ns)
    pub period: Option<u64>,
    pub phase: Option<u64>,
    pub class: Option<u8>,
    /// CPU the task is partitioned onto
    pub cpu: Option<u8>,
}

impl TaskMetadata {
    fn capture(&mut self, rec: &EventRecord) {
        match &rec.payload {
            EventPayload::Name(_) if self.name.is_none() => {
                self.name = rec.task_name();
            }
            EventPayload::Param(params) if self.cost.is_none() => {
                self.cost = Some(u64::from(params.wcet));
                self.period = Some(u64::from(params.period));
                self.phase = Some(u64::from(params.phase));
                self.class = Some(params.class);
                self.cpu = Some(params.partition);
            }
            _ => {}
        }
    }
}

/// One task and its chronological events
#[derive(Debug, Clone)]
pub struct Task {
    meta: TaskMetadata,
    events: Vec<EventRef>,
}

impl Task {
    fn new(pid: u16) -> Self {
        Self {
            meta: TaskMetadata {
                pid,
                ..Default::default()
            },
            events: Vec::new(),
        }
    }

    pub fn pid(&self) -> u16 {
        self.meta.pid
    }

    pub fn metadata(&self) -> &TaskMetadata {
        &self.meta
    }

    /// Events of this task in chronological order
    pub fn events(&self) -> &[EventRef] {
        &self.events
    }

    /// Position of an event in this task's timeline
    pub fn position_of(&self, event: EventRef) -> Option<usize> {
        self.events.iter().position(|&e| e == event)
    }
}

/// Per-task view over a merged trace
///
/// Built once from the merged sequence and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TaskIndex {
    tasks: BTreeMap<u16, Task>,
    system_events: Vec<EventRef>,
    system_release: Option<u64>,
}

impl TaskIndex {
    /// Build the index from a merged sequence
    ///
    /// **Public** - main entry point for indexing
    ///
    /// # Arguments
    /// * `traces` - Stores the handles point into
    /// * `merged` - Output of `merge_events`
    ///
    /// # Returns
    /// One task per distinct pid, plus the system-wide events. SysRelease
    /// records are not tied to a task and go to `system_events` only.
    pub fn build(traces: &TraceSet, merged: &[EventRef]) -> Self {
        let mut index = Self::default();

        for &event in merged {
            let Some(rec) = traces.get(event) else {
                debug!("Dangling event handle {:?}", event);
                continue;
            };

            if let EventPayload::SysRelease { release, .. } = rec.payload {
                if index.system_release.is_none() {
                    index.system_release = Some(release);
                }
                index.system_events.push(event);
                continue;
            }

            let task = index
                .tasks
                .entry(rec.pid())
                .or_insert_with(|| Task::new(rec.pid()));
            if matches!(rec.kind(), EventKind::Name | EventKind::Param) {
                task.meta.capture(&rec);
            }
            task.events.push(event);
        }

        debug!(
            "Indexed {} tasks, {} system events",
            index.tasks.len(),
            index.system_events.len()
        );

        index
    }

    /// Tasks in ascending pid order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn task(&self, pid: u16) -> Option<&Task> {
        self.tasks.get(&pid)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Events not tied to a task (system release)
    pub fn system_events(&self) -> &[EventRef] {
        &self.system_events
    }

    /// Release time announced by the first SysRelease record
    pub fn system_release(&self) -> Option<u64> {
        self.system_release
    }
}
