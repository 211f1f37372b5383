//! # hparams-synth: synthetic runs for hyper-parameter logging
//!
//! Generates fake training runs with sampled hyper-parameters and random
//! scalar metrics, and writes them as event files that a comparison view can
//! read. Used to check that hyper-parameter records, the experiment-wide
//! schema, and metrics written under different directories of one run line up.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use hparams_synth::driver::{Driver, DriverConfig, ModeSet};
//! use hparams_synth::experiment::ExperimentStore;
//!
//! let config = DriverConfig::default().with_modes(ModeSet::Working);
//! let mut driver = Driver::new(config)?;
//! driver.run()?;
//!
//! let store = ExperimentStore::load("logs")?;
//! assert_eq!(store.schema_records("logs".as_ref()).len(), 1);
//! # Ok::<(), hparams_synth::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod driver;
pub mod error;
pub mod events;
pub mod experiment;
pub mod hparam_writer;

pub use error::{Error, Result};
pub use hparam_writer::{HparamWriter, WriterDialect};
