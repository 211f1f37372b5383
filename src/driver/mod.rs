//! Synthetic run driver
//!
//! Drives a sweep of fake training runs: each run samples a hyper-parameter
//! assignment, records it, then logs random scalar metrics for every mode and
//! step. Everything is sequential and every step is flushed before the next.
//!
//! ```text
//! <base_logdir>/
//! ├── events.*            experiment schema (legacy dialect, first run only)
//! ├── 000/
//! │   ├── events.*        session start, "" mode scalars, session end
//! │   └── eval/events.*   "eval" mode scalars
//! ├── 001/
//! ...
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use hparams_synth::driver::{Driver, DriverConfig};
//!
//! let mut driver = Driver::new(DriverConfig::default().with_base_logdir("/tmp/hp-logs"))?;
//! let report = driver.run()?;
//! assert_eq!(report.runs().len(), 20);
//! # Ok::<(), hparams_synth::Error>(())
//! ```

mod config;
mod graph;

pub use config::{DriverConfig, ModeSet, METRIC_ACC1, METRIC_ACC5, METRIC_LOSS};
pub use graph::{ScalarOp, SummaryGraph};

use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::events::WriterCache;
use crate::experiment::{HParam, HParams, SessionEnd, SessionStart, SessionStatus};
use crate::hparam_writer::{HparamWriter, WriterDialect};
use crate::Result;

/// Directory of run `index`: `<base>/<index, zero-padded to 3 digits>`.
#[must_use]
pub fn run_dir(base: &Path, index: usize) -> PathBuf {
    base.join(format!("{index:03}"))
}

/// Directory metrics of `mode` are written to.
///
/// An empty mode is the run directory itself. Paths are not canonicalized,
/// so that mode shares the run directory's writer and event file.
#[must_use]
pub fn mode_logdir(run_dir: &Path, mode: &str) -> PathBuf {
    if mode.is_empty() {
        run_dir.to_path_buf()
    } else {
        run_dir.join(mode)
    }
}

/// Sample one value per hyper-parameter, in declaration order.
///
/// # Errors
///
/// Returns an error if a hyper-parameter has no valid domain.
pub fn sample_hparams<R: Rng + ?Sized>(hparams: &[HParam], rng: &mut R) -> Result<HParams> {
    let mut assignment = HParams::new();
    for hparam in hparams {
        assignment.insert(hparam.name().to_string(), hparam.sample_uniform(rng)?);
    }
    Ok(assignment)
}

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Run directory
    pub run_dir: PathBuf,
    /// Sampled hyper-parameter assignment
    pub hparams: HParams,
    /// Scalars written across all modes
    pub scalars_written: usize,
}

/// Outcome of a whole sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverReport {
    dialect: WriterDialect,
    runs: Vec<RunSummary>,
}

impl DriverReport {
    /// Get the dialect the sweep used.
    #[must_use]
    pub const fn dialect(&self) -> WriterDialect {
        self.dialect
    }

    /// Get the per-run summaries, in run order.
    #[must_use]
    pub fn runs(&self) -> &[RunSummary] {
        &self.runs
    }

    /// Get the total number of scalars written.
    #[must_use]
    pub fn total_scalars(&self) -> usize {
        self.runs.iter().map(|r| r.scalars_written).sum()
    }
}

/// Runs a synthetic sweep per its [`DriverConfig`].
#[derive(Debug)]
pub struct Driver {
    config: DriverConfig,
    cache: WriterCache,
}

impl Driver {
    /// Create a driver.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfig`] if the config does not validate.
    pub fn new(config: DriverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cache: WriterCache::new(),
        })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Run the sweep in the configured dialect.
    ///
    /// # Errors
    ///
    /// Any IO or serialization failure aborts the sweep.
    pub fn run(&mut self) -> Result<DriverReport> {
        let runs = match self.config.dialect {
            WriterDialect::Legacy => self.run_legacy()?,
            WriterDialect::Eager => self.run_eager()?,
        };
        self.cache.flush_all()?;
        Ok(DriverReport {
            dialect: self.config.dialect,
            runs,
        })
    }

    fn run_legacy(&mut self) -> Result<Vec<RunSummary>> {
        let config = &self.config;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut graph = SummaryGraph::new(&config.metric_names, config.seed.wrapping_add(1));
        tracing::debug!(ops = graph.ops().len(), "summary graph built");
        let mut runs = Vec::with_capacity(config.num_runs);

        for i in 0..config.num_runs {
            let session_dir = run_dir(&config.base_logdir, i);
            println!("Session directory: {}", session_dir.display());

            let hparams = sample_hparams(&config.hparams, &mut rng)?;
            tracing::info!(run = i, dir = %session_dir.display(), ?hparams, "starting run");

            let mut hparam_writer = HparamWriter::new(
                &session_dir,
                hparams.clone(),
                &config.metric_names,
                config.eval_name.as_deref(),
                WriterDialect::Legacy,
            )
            .with_schema_hparams(&config.hparams);
            hparam_writer.write(&mut self.cache)?;

            let mut scalars_written = 0;
            for mode in config.modes.modes() {
                let logdir = mode_logdir(&session_dir, mode);
                println!("Log dir: {}", logdir.display());
                tracing::debug!(mode, logdir = %logdir.display(), "logging mode");

                for step in 0..config.num_steps {
                    let writer = self.cache.get(&logdir)?;
                    for (tag, value) in graph.run() {
                        writer.add_scalar(tag, value, step)?;
                        scalars_written += 1;
                    }
                    writer.flush()?;
                }
            }

            let writer = self.cache.get(&session_dir)?;
            writer.add_session_end(SessionEnd::new(SessionStatus::Success))?;
            writer.flush()?;

            runs.push(RunSummary {
                run_dir: session_dir,
                hparams,
                scalars_written,
            });
        }

        Ok(runs)
    }

    /// Eager sweep. The trial id is the run directory name, not a hash of the
    /// sampled assignment.
    fn run_eager(&mut self) -> Result<Vec<RunSummary>> {
        let config = &self.config;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut runs = Vec::with_capacity(config.num_runs);

        for i in 0..config.num_runs {
            let session_dir = run_dir(&config.base_logdir, i);
            println!("Session directory: {}", session_dir.display());

            let hparams = sample_hparams(&config.hparams, &mut rng)?;
            tracing::info!(run = i, dir = %session_dir.display(), ?hparams, "starting run");

            let trial_id = format!("{i:03}");
            let writer = self.cache.get(&session_dir)?;
            writer.add_session_start(SessionStart::new(trial_id, hparams.clone()))?;
            writer.flush()?;

            let mut scalars_written = 0;
            for mode in config.modes.modes() {
                let logdir = mode_logdir(&session_dir, mode);
                println!("Log dir: {}", logdir.display());
                tracing::debug!(mode, logdir = %logdir.display(), "logging mode");

                let writer = self.cache.get(&logdir)?;
                for step in 0..config.num_steps {
                    for tag in &config.metric_names {
                        writer.add_scalar(tag, rng.gen::<f64>(), step)?;
                        scalars_written += 1;
                    }
                    writer.flush()?;
                }
            }

            runs.push(RunSummary {
                run_dir: session_dir,
                hparams,
                scalars_written,
            });
        }

        Ok(runs)
    }
}
