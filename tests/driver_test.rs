//! End-to-end sweep tests
//!
//! Each test runs a full sweep into a scratch directory and reads the event
//! files back through `ExperimentStore`.

use std::path::{Path, PathBuf};

use hparams_synth::driver::{
    mode_logdir, run_dir, Driver, DriverConfig, DriverReport, ModeSet, METRIC_ACC1, METRIC_ACC5,
    METRIC_LOSS,
};
use hparams_synth::experiment::{ExperimentStore, HParamValue, SessionStatus};
use hparams_synth::WriterDialect;
use tempfile::tempdir;

const TAGS: [&str; 3] = [METRIC_LOSS, METRIC_ACC1, METRIC_ACC5];

fn sweep(base: &Path, dialect: WriterDialect) -> DriverReport {
    let config = DriverConfig::default()
        .with_base_logdir(base)
        .with_dialect(dialect);
    Driver::new(config).unwrap().run().unwrap()
}

fn scalar_values(store: &ExperimentStore, dirs: &[PathBuf]) -> Vec<f64> {
    dirs.iter()
        .flat_map(|dir| TAGS.iter().map(move |tag| (dir, tag)))
        .flat_map(|(dir, tag)| store.scalars_for(dir, tag))
        .map(|p| p.value)
        .collect()
}

fn all_logdirs(base: &Path, modes: &ModeSet, num_runs: usize) -> Vec<PathBuf> {
    (0..num_runs)
        .flat_map(|i| {
            let run = run_dir(base, i);
            modes
                .modes()
                .into_iter()
                .map(move |mode| mode_logdir(&run, mode))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn test_legacy_sweep_layout() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("logs");
    let report = sweep(&base, WriterDialect::Legacy);

    assert_eq!(report.runs().len(), 20);
    assert_eq!(report.total_scalars(), 20 * 2 * 10 * 3);

    for i in 0..20 {
        let run = base.join(format!("{i:03}"));
        assert!(run.is_dir(), "missing {}", run.display());
        assert!(run.join("eval").is_dir());
    }
    assert!(!base.join("020").exists());
}

#[test]
fn test_legacy_sweep_writes_one_schema() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("logs");
    sweep(&base, WriterDialect::Legacy);

    let store = ExperimentStore::load(&base).unwrap();
    let schemas = store.schema_records(&base);
    assert_eq!(schemas.len(), 1);
    assert_eq!(store.total_schema_records(), 1);
    assert_eq!(schemas[0].hparam_names(), vec!["learning_rate", "optimizer"]);
    assert_eq!(schemas[0].metrics().len(), 3);
}

#[test]
fn test_legacy_sweep_session_records() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("logs");
    let report = sweep(&base, WriterDialect::Legacy);
    let store = ExperimentStore::load(&base).unwrap();

    for (i, summary) in report.runs().iter().enumerate() {
        let run = run_dir(&base, i);
        let starts = store.session_starts(&run);
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].trial_id(), format!("{i:03}"));
        assert_eq!(starts[0].hparams(), &summary.hparams);

        let ends = store.session_ends(&run);
        assert_eq!(ends.len(), 1);
        assert_eq!(ends[0].status(), SessionStatus::Success);

        assert!(store.session_starts(&run.join("eval")).is_empty());
    }
}

#[test]
fn test_every_mode_gets_ten_ordered_steps() {
    for dialect in [WriterDialect::Legacy, WriterDialect::Eager] {
        let dir = tempdir().unwrap();
        let base = dir.path().join("logs");
        sweep(&base, dialect);
        let store = ExperimentStore::load(&base).unwrap();

        for logdir in all_logdirs(&base, &ModeSet::Issue, 20) {
            for tag in TAGS {
                let steps: Vec<u64> = store
                    .scalars_for(&logdir, tag)
                    .iter()
                    .map(|p| p.step)
                    .collect();
                assert_eq!(
                    steps,
                    (0..10).collect::<Vec<u64>>(),
                    "{dialect:?} {} {tag}",
                    logdir.display()
                );
            }
        }
    }
}

#[test]
fn test_metric_values_are_unit_uniform() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("logs");
    sweep(&base, WriterDialect::Legacy);
    let store = ExperimentStore::load(&base).unwrap();

    let values = scalar_values(&store, &all_logdirs(&base, &ModeSet::Issue, 20));
    assert_eq!(values.len(), 20 * 2 * 10 * 3);
    assert!(values.iter().all(|v| (0.0..1.0).contains(v)));
}

#[test]
fn test_hparams_lie_in_their_domains() {
    let dir = tempdir().unwrap();
    let report = sweep(&dir.path().join("logs"), WriterDialect::Legacy);

    for summary in report.runs() {
        let lr = summary.hparams["learning_rate"].as_f64().unwrap();
        assert!((0.01..=0.1).contains(&lr), "learning_rate {lr}");

        let optimizer = summary.hparams["optimizer"].as_str().unwrap();
        assert!(["adam", "sgd"].contains(&optimizer), "optimizer {optimizer}");
    }
}

#[test]
fn test_seed_zero_first_run_matches_golden_pair() {
    for dialect in [WriterDialect::Legacy, WriterDialect::Eager] {
        let dir = tempdir().unwrap();
        let report = sweep(&dir.path().join("logs"), dialect);
        let first = &report.runs()[0].hparams;

        let lr = first["learning_rate"].as_f64().unwrap();
        assert!((lr - 0.073_816_787_388_390_56).abs() < 1e-15, "learning_rate {lr}");
        assert_eq!(first["optimizer"], HParamValue::from("sgd"));
    }
}

#[test]
fn test_rerun_reproduces_hparams_and_metrics() {
    for dialect in [WriterDialect::Legacy, WriterDialect::Eager] {
        let dir = tempdir().unwrap();
        let first_base = dir.path().join("first");
        let second_base = dir.path().join("second");

        let first = sweep(&first_base, dialect);
        let second = sweep(&second_base, dialect);

        let first_hparams: Vec<_> = first.runs().iter().map(|r| &r.hparams).collect();
        let second_hparams: Vec<_> = second.runs().iter().map(|r| &r.hparams).collect();
        assert_eq!(first_hparams, second_hparams, "{dialect:?}");

        let first_store = ExperimentStore::load(&first_base).unwrap();
        let second_store = ExperimentStore::load(&second_base).unwrap();
        assert_eq!(
            scalar_values(&first_store, &all_logdirs(&first_base, &ModeSet::Issue, 20)),
            scalar_values(&second_store, &all_logdirs(&second_base, &ModeSet::Issue, 20)),
            "{dialect:?}"
        );
    }
}

#[test]
fn test_different_seeds_diverge() {
    let dir = tempdir().unwrap();
    let a = Driver::new(DriverConfig::default().with_base_logdir(dir.path().join("a")))
        .unwrap()
        .run()
        .unwrap();
    let b = Driver::new(
        DriverConfig::default()
            .with_base_logdir(dir.path().join("b"))
            .with_seed(1),
    )
    .unwrap()
    .run()
    .unwrap();

    let a_hparams: Vec<_> = a.runs().iter().map(|r| &r.hparams).collect();
    let b_hparams: Vec<_> = b.runs().iter().map(|r| &r.hparams).collect();
    assert_ne!(a_hparams, b_hparams);
}

#[test]
fn test_eager_sweep_writes_no_schema() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("logs");
    let report = sweep(&base, WriterDialect::Eager);
    let store = ExperimentStore::load(&base).unwrap();

    assert_eq!(report.dialect(), WriterDialect::Eager);
    assert_eq!(store.total_schema_records(), 0);
    assert!(store.events_in(&base).is_empty());

    for (i, summary) in report.runs().iter().enumerate() {
        let run = run_dir(&base, i);
        let starts = store.session_starts(&run);
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].hparams(), &summary.hparams);
        assert!(store.session_ends(&run).is_empty());
    }
}

#[test]
fn test_eager_trial_id_is_run_dir_name() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("logs");
    let report = sweep(&base, WriterDialect::Eager);
    let store = ExperimentStore::load(&base).unwrap();

    for (i, summary) in report.runs().iter().enumerate() {
        let starts = store.session_starts(&run_dir(&base, i));
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].trial_id(), format!("{i:03}"));
        assert_eq!(starts[0].hparams(), &summary.hparams);
    }
}

#[test]
fn test_empty_mode_shares_the_run_stream() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("logs");
    sweep(&base, WriterDialect::Legacy);

    let run = run_dir(&base, 0);
    let event_files = std::fs::read_dir(&run)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("events."))
        .count();
    assert_eq!(event_files, 1);
}

#[test]
fn test_working_modes_keep_run_dir_free_of_scalars() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("logs");
    let config = DriverConfig::default()
        .with_base_logdir(&base)
        .with_num_runs(3)
        .with_num_steps(4)
        .with_modes(ModeSet::Working);
    let report = Driver::new(config).unwrap().run().unwrap();
    let store = ExperimentStore::load(&base).unwrap();

    assert_eq!(report.total_scalars(), 3 * 2 * 4 * 3);
    for i in 0..3 {
        let run = run_dir(&base, i);
        assert!(store.scalars_for(&run, METRIC_LOSS).is_empty());
        assert_eq!(store.scalars_for(&run.join("train"), METRIC_LOSS).len(), 4);
        assert_eq!(store.scalars_for(&run.join("eval"), METRIC_LOSS).len(), 4);
    }
}
