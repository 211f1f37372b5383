//! Pre-built summary graph for the legacy dialect
//!
//! The graph is built once before any run and evaluated once per step, each
//! evaluation yielding one fresh uniform [0, 1) value per scalar op.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One scalar summary op: a tag bound to a uniform random source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarOp {
    tag: String,
}

impl ScalarOp {
    /// Get the summary tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// Merged scalar summaries, evaluated together.
#[derive(Debug)]
pub struct SummaryGraph {
    ops: Vec<ScalarOp>,
    rng: ChaCha8Rng,
}

impl SummaryGraph {
    /// Build a graph with one uniform scalar op per tag.
    #[must_use]
    pub fn new<S: AsRef<str>>(tags: &[S], seed: u64) -> Self {
        Self {
            ops: tags
                .iter()
                .map(|tag| ScalarOp {
                    tag: tag.as_ref().to_string(),
                })
                .collect(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Get the ops in evaluation order.
    #[must_use]
    pub fn ops(&self) -> &[ScalarOp] {
        &self.ops
    }

    /// Evaluate every op once.
    pub fn run(&mut self) -> Vec<(&str, f64)> {
        let rng = &mut self.rng;
        self.ops
            .iter()
            .map(|op| (op.tag.as_str(), rng.gen::<f64>()))
            .collect()
    }
}
