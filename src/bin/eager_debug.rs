//! Synthetic sweep through the eager writer dialect
//!
//! Writes 20 runs under `logs/`. Set `RUST_LOG=debug` for per-directory logs.

use anyhow::{Context, Result};
use hparams_synth::driver::{Driver, DriverConfig};
use hparams_synth::WriterDialect;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = DriverConfig::default().with_dialect(WriterDialect::Eager);
    let mut driver = Driver::new(config).context("invalid driver config")?;
    tracing::info!(
        base_logdir = %driver.config().base_logdir.display(),
        runs = driver.config().num_runs,
        "starting sweep"
    );
    let report = driver.run().context("eager sweep failed")?;

    tracing::info!(
        runs = report.runs().len(),
        scalars = report.total_scalars(),
        "sweep complete"
    );
    Ok(())
}
