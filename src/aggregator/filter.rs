//! Task selection predicates.

use super::task_index::Task;

/// Restricts which tasks are reported
///
/// Every criterion that is set must match; an empty filter accepts all tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub pid: Option<u16>,
    pub name: Option<String>,
    /// Period in raw trace units
    pub period: Option<u64>,
}

impl TaskFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, task: &Task) -> bool {
        let meta = task.metadata();

        if self.pid.is_some_and(|pid| pid != meta.pid) {
            return false;
        }
        if let Some(name) = &self.name {
            if meta.name.as_deref() != Some(name.as_str()) {
                return false;
            }
        }
        if let Some(period) = self.period {
            if meta.period != Some(period) {
                return false;
            }
        }
        true
    }
}
