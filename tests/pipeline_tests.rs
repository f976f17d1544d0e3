use pretty_assertions::assert_eq;
use sched_trace_stats::aggregator::{
    merge_events, CorrelatorConfig, JobCorrelator, TaskFilter, TaskIndex,
};
use sched_trace_stats::commands::{analyze, AnalysisOptions, StatsArgs};
use sched_trace_stats::output::{read_report, write_report, TimeUnit};
use sched_trace_stats::parser::{load_traces, EventRecord, RecordStore, TaskParams, TraceSet};
use sched_trace_stats::utils::error::PipelineError;
use std::io::Write;
use tempfile::NamedTempFile;

fn trace_file(records: &[EventRecord]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for rec in records {
        file.write_all(&rec.encode()).unwrap();
    }
    file.flush().unwrap();
    file
}

fn params(wcet: u32, period: u32, cpu: u8) -> TaskParams {
    TaskParams {
        wcet,
        period,
        phase: 0,
        partition: cpu,
        class: 0,
    }
}

/// Two CPUs, two tasks, one system release
fn two_cpu_traces() -> (NamedTempFile, NamedTempFile) {
    let cpu0 = trace_file(&[
        EventRecord::name(100, "sensor"),
        EventRecord::param(100, params(2_000_000, 10_000_000, 0)),
        EventRecord::sys_release(500, 1_000_000),
        EventRecord::release(100, 1, 1_000_000, 11_000_000),
        EventRecord::switch_to(100, 1, 1_100_000),
        EventRecord::switch_away(100, 1, 3_100_000),
        EventRecord::completion(100, 1, 3_100_000, false),
        EventRecord::release(100, 2, 11_000_000, 21_000_000),
        EventRecord::switch_to(100, 2, 11_000_000),
        EventRecord::switch_away(100, 2, 22_000_000),
        EventRecord::completion(100, 2, 22_000_000, true),
    ]);
    let cpu1 = trace_file(&[
        EventRecord::name(200, "actuator"),
        EventRecord::param(200, params(1_000_000, 5_000_000, 1)),
        EventRecord::release(200, 1, 400, 5_000_400),
        EventRecord::release(200, 2, 1_000_000, 6_000_000),
        EventRecord::switch_to(200, 2, 1_200_000),
        EventRecord::switch_away(200, 2, 2_000_000),
        EventRecord::completion(200, 2, 2_000_000, false),
        EventRecord::release(200, 3, 6_000_000, 11_000_000),
    ]);
    (cpu0, cpu1)
}

#[test]
fn test_full_pipeline_from_files() {
    let (cpu0, cpu1) = two_cpu_traces();
    let traces = load_traces(&[cpu0.path(), cpu1.path()]).unwrap();

    let report = analyze(&traces, &AnalysisOptions::default()).unwrap();

    assert_eq!(report.system_release, Some(1_000_000));
    assert_eq!(report.tasks.len(), 2);

    let sensor = &report.tasks[0];
    assert_eq!(sensor.task.name.as_deref(), Some("sensor"));
    assert_eq!(sensor.task.period, Some(10_000_000));
    assert_eq!(sensor.task.cpu, Some(0));
    assert_eq!(sensor.jobs.len(), 2);

    let first = &sensor.jobs[0];
    assert_eq!(first.response_time, 2_100_000);
    assert_eq!(first.core_execution_time, 2_000_000);
    assert_eq!(first.lateness, Some(3_100_000 - 11_000_000));
    assert!(!first.deadline_missed);

    let second = &sensor.jobs[1];
    assert!(second.forced);
    assert!(second.deadline_missed);
    assert_eq!(second.tardiness, 1_000_000);

    let actuator = &report.tasks[1];
    assert_eq!(actuator.jobs.len(), 3);
    assert_eq!(actuator.jobs[0].completion, None);
    assert!(actuator.jobs[0].deadline_missed);
    assert_eq!(actuator.jobs[2].lateness, None);
}

#[test]
fn test_skip_before_system_release() {
    let (cpu0, cpu1) = two_cpu_traces();
    let traces = load_traces(&[cpu0.path(), cpu1.path()]).unwrap();
    let options = AnalysisOptions {
        skip_before_release: true,
        ..Default::default()
    };

    let report = analyze(&traces, &options).unwrap();
    let actuator_jobs: Vec<u32> = report.tasks[1].jobs.iter().map(|j| j.job).collect();
    assert_eq!(actuator_jobs, vec![2, 3]);
}

#[test]
fn test_missing_system_release_is_reported_distinctly() {
    let file = trace_file(&[EventRecord::release(1, 1, 0, 10)]);
    let traces = load_traces(&[file.path()]).unwrap();
    let options = AnalysisOptions {
        skip_before_release: true,
        ..Default::default()
    };

    assert_eq!(
        analyze(&traces, &options).unwrap_err(),
        PipelineError::MissingSystemRelease
    );
}

#[test]
fn test_period_filter_in_milliseconds() {
    let (cpu0, cpu1) = two_cpu_traces();
    let args = StatsArgs {
        files: vec![cpu0.path().to_path_buf(), cpu1.path().to_path_buf()],
        unit: TimeUnit::Milliseconds,
        period: Some(5),
        ..Default::default()
    };
    let traces = load_traces(&args.files).unwrap();

    let report = analyze(&traces, &args.analysis_options()).unwrap();
    assert_eq!(report.tasks.len(), 1);
    assert_eq!(report.tasks[0].task.pid, 200);
}

#[test]
fn test_name_filter() {
    let (cpu0, cpu1) = two_cpu_traces();
    let traces = load_traces(&[cpu0.path(), cpu1.path()]).unwrap();
    let options = AnalysisOptions {
        filter: TaskFilter {
            name: Some("sensor".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    let report = analyze(&traces, &options).unwrap();
    assert_eq!(report.tasks.len(), 1);
    assert_eq!(report.tasks[0].task.pid, 100);
}

#[test]
fn test_partial_input_still_reported() {
    let (cpu0, _cpu1) = two_cpu_traces();
    let mut broken = NamedTempFile::new().unwrap();
    broken.write_all(&[1u8; 30]).unwrap();
    broken.flush().unwrap();

    let traces = load_traces(&[broken.path(), cpu0.path()]).unwrap();
    let report = analyze(&traces, &AnalysisOptions::default()).unwrap();

    assert_eq!(report.inputs.len(), 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.tasks.len(), 1);
}

#[test]
fn test_all_empty_inputs_yield_empty_report() {
    let a = NamedTempFile::new().unwrap();
    let b = NamedTempFile::new().unwrap();
    let traces = load_traces(&[a.path(), b.path()]).unwrap();

    let report = analyze(&traces, &AnalysisOptions::default()).unwrap();
    assert!(report.tasks.is_empty());
    assert_eq!(report.warnings.len(), 2);
}

#[test]
fn test_release_then_completion_two_events_later() {
    let traces = TraceSet::new(vec![RecordStore::from_records(
        "cpu0",
        &[
            EventRecord::release(7, 1, 50, 100),
            EventRecord::switch_to(7, 1, 55),
            EventRecord::completion(7, 1, 120, false),
        ],
    )]);
    let merged = merge_events(&traces);
    let index = TaskIndex::build(&traces, &merged);
    let task = index.task(7).unwrap();

    let stats = JobCorrelator::new(&traces, CorrelatorConfig::default())
        .stats_for(task, task.events()[0])
        .unwrap();

    assert_eq!(stats.response_time, 70);
    assert_eq!(stats.lateness, Some(20));
    assert_eq!(stats.tardiness, 20);
    assert!(stats.deadline_missed);
}

#[test]
fn test_narrow_window_drops_completion() {
    let traces = TraceSet::new(vec![RecordStore::from_records(
        "cpu0",
        &[
            EventRecord::release(7, 1, 50, 100),
            EventRecord::switch_to(7, 1, 55),
            EventRecord::completion(7, 1, 90, false),
        ],
    )]);
    let options = AnalysisOptions {
        correlator: CorrelatorConfig { search_window: 1 },
        ..Default::default()
    };

    let report = analyze(&traces, &options).unwrap();
    let job = &report.tasks[0].jobs[0];
    assert_eq!(job.completion, None);
    assert!(job.deadline_missed);
}

#[test]
fn test_json_report_round_trip() {
    let (cpu0, cpu1) = two_cpu_traces();
    let traces = load_traces(&[cpu0.path(), cpu1.path()]).unwrap();
    let report = analyze(&traces, &AnalysisOptions::default()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    write_report(&report, &path).unwrap();

    assert_eq!(read_report(&path).unwrap(), report);
}
