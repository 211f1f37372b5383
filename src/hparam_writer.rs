//! Hyper-parameter logging for the comparison view
//!
//! [`HparamWriter`] records a run's hyper-parameter assignment in the run
//! directory and, the first time any run of the experiment is logged, the
//! experiment-wide schema in the parent directory. Used at the start of a
//! training routine, it makes failed runs show up as well.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::events::{contains_event_files, WriterCache};
use crate::experiment::{
    ExperimentSchema, HParam, HParams, Metric, SessionStart, DEFAULT_EVAL_GROUP,
};
use crate::{Error, Result};

/// Writer API dialect used to emit summary records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriterDialect {
    /// Cached per-directory writers, records built up front
    #[default]
    Legacy,
    /// Immediate writes through a default writer
    Eager,
}

impl WriterDialect {
    /// Get the dialect name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Eager => "eager",
        }
    }
}

/// Writes the hyper-parameters of one run.
///
/// `model_dir` is the run directory; its parent is the experiment directory
/// and its final component is the trial ID.
#[derive(Debug)]
pub struct HparamWriter {
    model_dir: PathBuf,
    experiment_dir: PathBuf,
    trial_id: String,
    hparams: HParams,
    metrics: Vec<Metric>,
    schema_hparams: Option<Vec<HParam>>,
    dialect: WriterDialect,
    hparams_written: bool,
}

impl HparamWriter {
    /// Create a writer for one run.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Run directory
    /// * `hparams` - Hyper-parameter assignment of the run
    /// * `metrics` - Fully qualified summary names shown next to the hyper-parameters
    /// * `eval_name` - Evaluation group of the metrics, `"eval"` if `None`
    /// * `dialect` - Writer dialect; only [`WriterDialect::Legacy`] is functional
    #[must_use]
    pub fn new<S: AsRef<str>>(
        model_dir: impl Into<PathBuf>,
        hparams: HParams,
        metrics: &[S],
        eval_name: Option<&str>,
        dialect: WriterDialect,
    ) -> Self {
        let model_dir = model_dir.into();
        let group = eval_name.unwrap_or(DEFAULT_EVAL_GROUP);
        let metrics = metrics
            .iter()
            .map(|tag| Metric::new(tag.as_ref(), group))
            .collect();
        let experiment_dir = match model_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let trial_id = model_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            model_dir,
            experiment_dir,
            trial_id,
            hparams,
            metrics,
            schema_hparams: None,
            dialect,
            hparams_written: false,
        }
    }

    /// Declare full hyper-parameter definitions in the experiment schema.
    ///
    /// Without this, the schema lists only the names of the assignment.
    #[must_use]
    pub fn with_schema_hparams(mut self, hparams: &[HParam]) -> Self {
        self.schema_hparams = Some(hparams.to_vec());
        self
    }

    /// Get the run directory.
    #[must_use]
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Get the experiment directory.
    #[must_use]
    pub fn experiment_dir(&self) -> &Path {
        &self.experiment_dir
    }

    /// Get the trial ID.
    #[must_use]
    pub fn trial_id(&self) -> &str {
        &self.trial_id
    }

    /// Get the metrics declared in the experiment schema.
    #[must_use]
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Check if this instance has already written its session record.
    #[must_use]
    pub const fn was_written(&self) -> bool {
        self.hparams_written
    }

    /// Write the hyper-parameters.
    ///
    /// The session record is written at most once per instance. The
    /// experiment schema is written only if the experiment directory holds no
    /// event file yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DialectNotImplemented`] for [`WriterDialect::Eager`],
    /// or an IO/serialization error from the event files.
    pub fn write(&mut self, cache: &mut WriterCache) -> Result<()> {
        match self.dialect {
            WriterDialect::Legacy => self.write_legacy(cache),
            WriterDialect::Eager => Err(Error::DialectNotImplemented(
                WriterDialect::Eager.as_str().to_string(),
            )),
        }
    }

    fn write_legacy(&mut self, cache: &mut WriterCache) -> Result<()> {
        if !self.hparams_written {
            let writer = cache.get(&self.model_dir)?;
            writer.add_session_start(SessionStart::new(&self.trial_id, self.hparams.clone()))?;
            writer.flush()?;
            self.hparams_written = true;
        }

        fs::create_dir_all(&self.experiment_dir)?;
        if contains_event_files(&self.experiment_dir)? {
            tracing::debug!(
                experiment_dir = %self.experiment_dir.display(),
                "experiment-wide hparams config already exists"
            );
        } else {
            let hparams = self.schema_hparams.clone().unwrap_or_else(|| {
                self.hparams.keys().map(HParam::unbounded).collect()
            });
            let schema = ExperimentSchema::new(hparams, self.metrics.clone());
            let writer = cache.get(&self.experiment_dir)?;
            writer.add_experiment(schema)?;
            writer.flush()?;
            tracing::info!(
                experiment_dir = %self.experiment_dir.display(),
                "wrote experiment-wide hparams config"
            );
        }
        Ok(())
    }
}
