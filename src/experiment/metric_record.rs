//! Scalar Record - one step-indexed metric observation

use serde::{Deserialize, Serialize};

/// Scalar Record represents a single metric data point.
///
/// The step lives on the enclosing event; this carries tag and value only
/// so a record can be written without knowing where it lands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScalarRecord {
    tag: String,
    value: f64,
}

impl ScalarRecord {
    /// Create a new scalar record.
    ///
    /// # Arguments
    ///
    /// * `tag` - Fully qualified metric name (e.g., "accuracy/top_1")
    /// * `value` - Metric value
    #[must_use]
    pub fn new(tag: impl Into<String>, value: f64) -> Self {
        Self {
            tag: tag.into(),
            value,
        }
    }

    /// Get the metric tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get the metric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }
}

/// A scalar together with the step it was logged at.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarPoint {
    /// Training step
    pub step: u64,
    /// Metric value
    pub value: f64,
    /// Wall time in seconds since the Unix epoch
    pub wall_time: f64,
}
