//! Experiment Schema
//!
//! This module provides the records written for hyper-parameter comparison
//! and the store that reads them back.
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentSchema (1, in the experiment dir) ──< run dir (N)
//!                                                   │
//!                                                   ├── SessionStart (1) [hparams]
//!                                                   ├──< ScalarRecord (N) [time-series]
//!                                                   └── SessionEnd (0..1)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use hparams_synth::experiment::{Domain, HParam, HParams, Metric, SessionStart};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let lr = HParam::new("learning_rate", Domain::real_interval(0.01, 0.1)?);
//! let mut rng = StdRng::seed_from_u64(0);
//!
//! let mut hparams = HParams::new();
//! hparams.insert(lr.name().to_string(), lr.sample_uniform(&mut rng)?);
//!
//! let start = SessionStart::new("000", hparams);
//! let metric = Metric::new("loss", "eval");
//! assert_eq!(start.trial_id(), "000");
//! assert_eq!(metric.group(), "eval");
//! # Ok::<(), hparams_synth::Error>(())
//! ```

mod experiment_record;
mod hparam;
mod metric_record;
mod run_record;
mod store;

pub(crate) use experiment_record::now_secs;
pub use experiment_record::{ExperimentSchema, ExperimentSchemaBuilder};
pub(crate) use hparam::sorted_values;
pub use hparam::{Domain, HParam, HParamKind, HParamValue, HParams, Metric, DEFAULT_EVAL_GROUP};
pub use metric_record::{ScalarPoint, ScalarRecord};
pub use run_record::{SessionEnd, SessionStart, SessionStartBuilder, SessionStatus};
pub use store::ExperimentStore;
