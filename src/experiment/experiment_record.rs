//! Experiment Schema - experiment-wide declaration of hyper-parameters and metrics

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{HParam, Metric};

/// Experiment-wide schema record.
///
/// Declares which hyper-parameters and metrics the runs of an experiment
/// share, so the visualization tool can build its comparison table. Written
/// at most once per experiment directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentSchema {
    hparams: Vec<HParam>,
    metrics: Vec<Metric>,
    time_created_secs: f64,
}

impl ExperimentSchema {
    /// Create a schema record stamped with the current time.
    ///
    /// # Arguments
    ///
    /// * `hparams` - Hyper-parameters shared by every run
    /// * `metrics` - Metrics to show next to the hyper-parameters
    #[must_use]
    pub fn new(hparams: Vec<HParam>, metrics: Vec<Metric>) -> Self {
        Self {
            hparams,
            metrics,
            time_created_secs: now_secs(),
        }
    }

    /// Create a builder for constructing a schema record incrementally.
    #[must_use]
    pub fn builder() -> ExperimentSchemaBuilder {
        ExperimentSchemaBuilder::new()
    }

    /// Get the declared hyper-parameters.
    #[must_use]
    pub fn hparams(&self) -> &[HParam] {
        &self.hparams
    }

    /// Get the declared metrics.
    #[must_use]
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Get the hyper-parameter names, in declaration order.
    #[must_use]
    pub fn hparam_names(&self) -> Vec<&str> {
        self.hparams.iter().map(HParam::name).collect()
    }

    /// Get the creation timestamp in seconds since the Unix epoch.
    #[must_use]
    pub const fn time_created_secs(&self) -> f64 {
        self.time_created_secs
    }
}

/// Builder for `ExperimentSchema`.
#[derive(Debug)]
pub struct ExperimentSchemaBuilder {
    hparams: Vec<HParam>,
    metrics: Vec<Metric>,
    time_created_secs: f64,
}

impl Default for ExperimentSchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperimentSchemaBuilder {
    /// Create an empty builder stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hparams: Vec::new(),
            metrics: Vec::new(),
            time_created_secs: now_secs(),
        }
    }

    /// Declare a hyper-parameter.
    #[must_use]
    pub fn hparam(mut self, hparam: HParam) -> Self {
        self.hparams.push(hparam);
        self
    }

    /// Declare a metric.
    #[must_use]
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    /// Set a custom creation timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn time_created_secs(mut self, secs: f64) -> Self {
        self.time_created_secs = secs;
        self
    }

    /// Build the `ExperimentSchema`.
    #[must_use]
    pub fn build(self) -> ExperimentSchema {
        ExperimentSchema {
            hparams: self.hparams,
            metrics: self.metrics,
            time_created_secs: self.time_created_secs,
        }
    }
}

/// Current wall time in fractional seconds since the Unix epoch.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
