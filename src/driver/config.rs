//! Driver configuration
//!
//! Defaults reproduce the reference sweep: 20 runs of 10 steps under `logs/`,
//! `learning_rate` in [0.01, 0.1], `optimizer` in {adam, sgd}.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::experiment::{sorted_values, Domain, HParam, HParamValue};
use crate::hparam_writer::WriterDialect;
use crate::{Error, Result};

/// Loss summary tag.
pub const METRIC_LOSS: &str = "loss";
/// Top-1 accuracy summary tag.
pub const METRIC_ACC1: &str = "accuracy/top_1";
/// Top-5 accuracy summary tag.
pub const METRIC_ACC5: &str = "accuracy/top_5";

/// Logging modes each run writes metrics under.
///
/// An empty mode writes straight into the run directory; any other mode
/// writes into `<run_dir>/<mode>`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "modes", rename_all = "snake_case")]
pub enum ModeSet {
    /// `["train", "eval"]`: every stream in its own subdirectory
    Working,
    /// `["", "eval"]`: training metrics share the run directory with the hparams
    #[default]
    Issue,
    /// Explicit list
    Custom(Vec<String>),
}

impl ModeSet {
    /// Get the modes in logging order.
    #[must_use]
    pub fn modes(&self) -> Vec<&str> {
        match self {
            Self::Working => vec!["train", "eval"],
            Self::Issue => vec!["", "eval"],
            Self::Custom(modes) => modes.iter().map(String::as_str).collect(),
        }
    }
}

/// Configuration of a synthetic sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Number of runs
    pub num_runs: usize,
    /// Steps logged per run and mode
    pub num_steps: u64,
    /// Experiment directory holding the run directories
    pub base_logdir: PathBuf,
    /// Fully qualified metric tags, logged in this order each step
    pub metric_names: Vec<String>,
    /// Hyper-parameters sampled for every run, in this order
    pub hparams: Vec<HParam>,
    /// Logging modes
    pub modes: ModeSet,
    /// Writer dialect
    pub dialect: WriterDialect,
    /// Seed of the sampling RNG
    pub seed: u64,
    /// Evaluation group of the metrics; `"eval"` when unset
    pub eval_name: Option<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            num_runs: 20,
            num_steps: 10,
            base_logdir: PathBuf::from("logs"),
            metric_names: vec![
                METRIC_LOSS.to_string(),
                METRIC_ACC1.to_string(),
                METRIC_ACC5.to_string(),
            ],
            hparams: default_hparams(),
            modes: ModeSet::default(),
            dialect: WriterDialect::default(),
            seed: 0,
            eval_name: None,
        }
    }
}

fn default_hparams() -> Vec<HParam> {
    vec![
        HParam::new(
            "learning_rate",
            Domain::RealInterval {
                min_value: 0.01,
                max_value: 0.1,
            },
        ),
        HParam::new(
            "optimizer",
            Domain::Discrete {
                values: sorted_values(vec![HParamValue::from("sgd"), HParamValue::from("adam")]),
            },
        ),
    ]
}

impl DriverConfig {
    /// Parse a JSON document. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a serialization error for bad JSON, or
    /// [`Error::InvalidConfig`] if validation fails.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the number of runs.
    #[must_use]
    pub const fn with_num_runs(mut self, num_runs: usize) -> Self {
        self.num_runs = num_runs;
        self
    }

    /// Set the number of steps per run and mode.
    #[must_use]
    pub const fn with_num_steps(mut self, num_steps: u64) -> Self {
        self.num_steps = num_steps;
        self
    }

    /// Set the experiment directory.
    #[must_use]
    pub fn with_base_logdir(mut self, base_logdir: impl Into<PathBuf>) -> Self {
        self.base_logdir = base_logdir.into();
        self
    }

    /// Set the logging modes.
    #[must_use]
    pub fn with_modes(mut self, modes: ModeSet) -> Self {
        self.modes = modes;
        self
    }

    /// Set the writer dialect.
    #[must_use]
    pub const fn with_dialect(mut self, dialect: WriterDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the evaluation group name.
    #[must_use]
    pub fn with_eval_name(mut self, eval_name: impl Into<String>) -> Self {
        self.eval_name = Some(eval_name.into());
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] on zero runs or steps, an empty
    /// metric, hyper-parameter or mode list, or a hyper-parameter that cannot
    /// be sampled.
    pub fn validate(&self) -> Result<()> {
        if self.num_runs == 0 {
            return Err(Error::InvalidConfig("num_runs must be positive".to_string()));
        }
        if self.num_steps == 0 {
            return Err(Error::InvalidConfig("num_steps must be positive".to_string()));
        }
        if self.metric_names.is_empty() {
            return Err(Error::InvalidConfig("metric_names is empty".to_string()));
        }
        if self.hparams.is_empty() {
            return Err(Error::InvalidConfig("hparams is empty".to_string()));
        }
        if self.modes.modes().is_empty() {
            return Err(Error::InvalidConfig("modes is empty".to_string()));
        }
        for hparam in &self.hparams {
            let domain = hparam.domain().ok_or_else(|| {
                Error::InvalidConfig(format!("hparam '{}' has no domain", hparam.name()))
            })?;
            domain.validate().map_err(|e| {
                Error::InvalidConfig(format!("hparam '{}': {e}", hparam.name()))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DriverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.num_runs, 20);
        assert_eq!(config.num_steps, 10);
        assert_eq!(config.modes.modes(), vec!["", "eval"]);
        assert_eq!(config.dialect, WriterDialect::Legacy);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DriverConfig::from_json(
            r#"{"num_runs": 3, "modes": {"kind": "working"}, "dialect": "eager"}"#,
        )
        .unwrap();

        assert_eq!(config.num_runs, 3);
        assert_eq!(config.num_steps, 10);
        assert_eq!(config.modes, ModeSet::Working);
        assert_eq!(config.dialect, WriterDialect::Eager);
        assert_eq!(config.hparams, DriverConfig::default().hparams);
    }

    #[test]
    fn test_custom_modes_from_json() {
        let config =
            DriverConfig::from_json(r#"{"modes": {"kind": "custom", "modes": ["a", "b"]}}"#)
                .unwrap();
        assert_eq!(config.modes.modes(), vec!["a", "b"]);
    }

    #[test]
    fn test_validate_rejects_empty_inputs() {
        let config = DriverConfig::default().with_num_runs(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = DriverConfig::default().with_num_steps(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = DriverConfig::default().with_modes(ModeSet::Custom(vec![]));
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = DriverConfig::default();
        config.metric_names.clear();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_default_optimizer_values_match_constructor() {
        let optimizer = DriverConfig::default().hparams[1].domain().cloned();
        assert_eq!(optimizer, Some(Domain::discrete(["sgd", "adam"]).unwrap()));
    }

    #[test]
    fn test_json_hparams_are_normalized() {
        let config = DriverConfig::from_json(
            r#"{"hparams": [{"name": "optimizer", "domain": {"type": "discrete", "values": ["sgd", "adam"]}}]}"#,
        )
        .unwrap();
        assert_eq!(config.hparams, DriverConfig::default().hparams[1..].to_vec());
    }

    #[test]
    fn test_json_rejects_overflowing_interval() {
        let json = r#"{"hparams": [{"name": "lr", "domain": {"type": "real_interval", "min_value": -1.7976931348623157e308, "max_value": 1.7976931348623157e308}}]}"#;
        assert!(matches!(DriverConfig::from_json(json), Err(Error::InvalidConfig(msg)) if msg.contains("lr")));
    }

    #[test]
    fn test_validate_rejects_unsampleable_hparam() {
        let mut config = DriverConfig::default();
        config.hparams.push(HParam::unbounded("dropout"));
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(msg)) if msg.contains("dropout")));
    }
}
