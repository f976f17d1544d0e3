//! Property-based tests for the merge, index and correlation stages.
//!
//! Traces are generated as per-file sorted timestamp lists with random
//! task ids and job numbers.

use proptest::prelude::*;
use sched_trace_stats::aggregator::{
    merge_events, CorrelatorConfig, JobCorrelator, TaskIndex,
};
use sched_trace_stats::parser::{EventKind, EventRecord, EventRef, RecordStore, TraceSet};
use std::collections::HashSet;

fn record(kind: u8, pid: u16, job: u32, when: u64) -> EventRecord {
    match kind % 4 {
        0 => EventRecord::release(pid, job, when, when + 100),
        1 => EventRecord::switch_to(pid, job, when),
        2 => EventRecord::switch_away(pid, job, when),
        _ => EventRecord::completion(pid, job, when, false),
    }
}

fn arb_file() -> impl Strategy<Value = Vec<EventRecord>> {
    prop::collection::vec((0u64..1_000, 0u8..4, 1u16..5, 1u32..6), 0..40).prop_map(|mut raw| {
        raw.sort_by_key(|r| r.0);
        raw.into_iter()
            .map(|(when, kind, pid, job)| record(kind, pid, job, when))
            .collect()
    })
}

fn arb_traces() -> impl Strategy<Value = TraceSet> {
    prop::collection::vec(arb_file(), 1..6).prop_map(|files| {
        TraceSet::new(
            files
                .iter()
                .enumerate()
                .map(|(i, recs)| RecordStore::from_records(format!("cpu{}", i), recs))
                .collect(),
        )
    })
}

fn timestamp(traces: &TraceSet, e: EventRef) -> u64 {
    traces.get(e).map(|r| r.timestamp()).unwrap_or(u64::MAX)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_merge_is_sorted_with_file_order_ties(traces in arb_traces()) {
        let merged = merge_events(&traces);

        for pair in merged.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (ta, tb) = (timestamp(&traces, a), timestamp(&traces, b));
            prop_assert!(ta <= tb);
            if ta == tb && a.source != b.source {
                prop_assert!(a.source < b.source);
            }
            if a.source == b.source {
                prop_assert!(a.index < b.index);
            }
        }
    }

    #[test]
    fn prop_merge_is_a_permutation(traces in arb_traces()) {
        let merged = merge_events(&traces);
        prop_assert_eq!(merged.len(), traces.total_records());

        let unique: HashSet<EventRef> = merged.iter().copied().collect();
        prop_assert_eq!(unique.len(), merged.len());
        prop_assert!(merged.iter().all(|&e| traces.get(e).is_some()));
    }

    #[test]
    fn prop_task_timelines_partition_merged_order(traces in arb_traces()) {
        let merged = merge_events(&traces);
        let index = TaskIndex::build(&traces, &merged);

        let position: std::collections::HashMap<EventRef, usize> =
            merged.iter().enumerate().map(|(i, &e)| (e, i)).collect();

        let mut total = index.system_events().len();
        for task in index.tasks() {
            total += task.events().len();
            for pair in task.events().windows(2) {
                prop_assert!(position[&pair[0]] < position[&pair[1]]);
            }
            for &e in task.events() {
                prop_assert_eq!(traces.get(e).map(|r| r.pid()), Some(task.pid()));
            }
        }
        prop_assert_eq!(total, merged.len());
    }

    #[test]
    fn prop_correlation_is_idempotent_and_consistent(traces in arb_traces()) {
        let merged = merge_events(&traces);
        let index = TaskIndex::build(&traces, &merged);
        let correlator = JobCorrelator::new(&traces, CorrelatorConfig::default());

        let first = correlator.correlate_all(&index, None);
        let second = correlator.correlate_all(&index, None);
        prop_assert_eq!(&first, &second);

        for job in first.iter().flatten() {
            match job.lateness {
                Some(l) => prop_assert_eq!(job.deadline_missed, l > 0),
                None => prop_assert!(job.deadline_missed),
            }
            prop_assert_eq!(job.tardiness, job.lateness.map_or(0, |l| l.max(0) as u64));
        }
    }

    #[test]
    fn prop_one_stats_row_per_release(traces in arb_traces()) {
        let merged = merge_events(&traces);
        let index = TaskIndex::build(&traces, &merged);
        let correlator = JobCorrelator::new(&traces, CorrelatorConfig::default());

        for task in index.tasks() {
            let releases = task
                .events()
                .iter()
                .filter(|&&e| traces.get(e).map(|r| r.kind()) == Some(EventKind::Release))
                .count();
            prop_assert_eq!(correlator.correlate_task(task, None).len(), releases);
        }
    }
}
