//! Session Records - per-run hyper-parameter assignment and completion status

use serde::{Deserialize, Serialize};

use super::experiment_record::now_secs;
use super::HParams;

/// Status of a run as reported in its session end record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Status not reported.
    Unknown,
    /// Run completed successfully.
    Success,
    /// Run failed with an error.
    Failure,
    /// Run is currently executing.
    Running,
}

/// Session start record: the hyper-parameter assignment of one trial.
///
/// Written once per run directory, before any metric of that run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionStart {
    trial_id: String,
    #[serde(default)]
    group_name: String,
    hparams: HParams,
    start_time_secs: f64,
}

impl SessionStart {
    /// Create a session start record stamped with the current time.
    ///
    /// # Arguments
    ///
    /// * `trial_id` - Identifier of the trial, usually the run directory name
    /// * `hparams` - Sampled hyper-parameter assignment
    #[must_use]
    pub fn new(trial_id: impl Into<String>, hparams: HParams) -> Self {
        Self {
            trial_id: trial_id.into(),
            group_name: String::new(),
            hparams,
            start_time_secs: now_secs(),
        }
    }

    /// Create a builder for constructing a session start with optional fields.
    #[must_use]
    pub fn builder(trial_id: impl Into<String>, hparams: HParams) -> SessionStartBuilder {
        SessionStartBuilder::new(trial_id, hparams)
    }

    /// Get the trial ID.
    #[must_use]
    pub fn trial_id(&self) -> &str {
        &self.trial_id
    }

    /// Get the session group name. Empty when the trial is its own group.
    #[must_use]
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Get the hyper-parameter assignment.
    #[must_use]
    pub const fn hparams(&self) -> &HParams {
        &self.hparams
    }

    /// Get the start timestamp in seconds since the Unix epoch.
    #[must_use]
    pub const fn start_time_secs(&self) -> f64 {
        self.start_time_secs
    }
}

/// Builder for `SessionStart`.
#[derive(Debug)]
pub struct SessionStartBuilder {
    trial_id: String,
    group_name: String,
    hparams: HParams,
    start_time_secs: f64,
}

impl SessionStartBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(trial_id: impl Into<String>, hparams: HParams) -> Self {
        Self {
            trial_id: trial_id.into(),
            group_name: String::new(),
            hparams,
            start_time_secs: now_secs(),
        }
    }

    /// Set the session group name.
    #[must_use]
    pub fn group_name(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = group_name.into();
        self
    }

    /// Set a custom start timestamp.
    #[must_use]
    pub const fn start_time_secs(mut self, secs: f64) -> Self {
        self.start_time_secs = secs;
        self
    }

    /// Build the `SessionStart`.
    #[must_use]
    pub fn build(self) -> SessionStart {
        SessionStart {
            trial_id: self.trial_id,
            group_name: self.group_name,
            hparams: self.hparams,
            start_time_secs: self.start_time_secs,
        }
    }
}

/// Session end record: final status of one trial.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SessionEnd {
    status: SessionStatus,
    end_time_secs: f64,
}

impl SessionEnd {
    /// Create a session end record stamped with the current time.
    #[must_use]
    pub fn new(status: SessionStatus) -> Self {
        Self {
            status,
            end_time_secs: now_secs(),
        }
    }

    /// Get the final status.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Get the end timestamp in seconds since the Unix epoch.
    #[must_use]
    pub const fn end_time_secs(&self) -> f64 {
        self.end_time_secs
    }
}
