//! Hyper-parameters, their sampling domains, and the metrics shown next to them

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// Evaluation group a metric is attributed to when none is given.
pub const DEFAULT_EVAL_GROUP: &str = "eval";

/// Hyper-parameter assignment of one trial, keyed by hyper-parameter name.
pub type HParams = BTreeMap<String, HParamValue>;

/// A sampled hyper-parameter value.
///
/// Serializes as the bare JSON primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HParamValue {
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Str(String),
}

/// Kind of an [`HParamValue`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HParamKind {
    /// `bool`
    Bool,
    /// `i64`
    Int,
    /// `f64`
    Float,
    /// `String`
    Str,
}

impl HParamValue {
    /// Get the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> HParamKind {
        match self {
            Self::Bool(_) => HParamKind::Bool,
            Self::Int(_) => HParamKind::Int,
            Self::Float(_) => HParamKind::Float,
            Self::Str(_) => HParamKind::Str,
        }
    }

    /// Get the value as `f64` if it is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Bool(_) | Self::Str(_) => None,
        }
    }

    /// Get the value as `&str` if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn partial_cmp_same_kind(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl fmt::Display for HParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for HParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for HParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for HParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for HParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for HParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Set of values a hyper-parameter may take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Domain {
    /// Closed real interval `[min_value, max_value]`
    RealInterval {
        /// Lower bound (inclusive)
        min_value: f64,
        /// Upper bound (inclusive)
        max_value: f64,
    },
    /// Closed integer interval `[min_value, max_value]`
    IntInterval {
        /// Lower bound (inclusive)
        min_value: i64,
        /// Upper bound (inclusive)
        max_value: i64,
    },
    /// Finite set of values of a single kind, kept sorted
    Discrete {
        /// Allowed values
        #[serde(deserialize_with = "deserialize_sorted")]
        values: Vec<HParamValue>,
    },
}

/// Sort discrete values into their canonical order.
pub(crate) fn sorted_values(mut values: Vec<HParamValue>) -> Vec<HParamValue> {
    values.sort_by(HParamValue::partial_cmp_same_kind);
    values
}

fn deserialize_sorted<'de, D>(deserializer: D) -> std::result::Result<Vec<HParamValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<HParamValue>::deserialize(deserializer).map(sorted_values)
}

impl Domain {
    /// Create a real interval domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDomain`] if a bound is not finite, `min > max`,
    /// or the width `max - min` overflows.
    pub fn real_interval(min_value: f64, max_value: f64) -> Result<Self> {
        let domain = Self::RealInterval {
            min_value,
            max_value,
        };
        domain.validate()?;
        Ok(domain)
    }

    /// Create an integer interval domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDomain`] if `min > max`.
    pub fn int_interval(min_value: i64, max_value: i64) -> Result<Self> {
        let domain = Self::IntInterval {
            min_value,
            max_value,
        };
        domain.validate()?;
        Ok(domain)
    }

    /// Create a discrete domain. Values are sorted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDomain`] if `values` is empty or mixes kinds.
    pub fn discrete<I, V>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<HParamValue>,
    {
        let domain = Self::Discrete {
            values: sorted_values(values.into_iter().map(Into::into).collect()),
        };
        domain.validate()?;
        Ok(domain)
    }

    /// Check the domain invariants.
    ///
    /// Deserialized domains bypass the constructors, so sampling re-checks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDomain`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::RealInterval {
                min_value,
                max_value,
            } => {
                if !min_value.is_finite() || !max_value.is_finite() {
                    return Err(Error::InvalidDomain(format!(
                        "real interval bounds must be finite, got [{min_value}, {max_value}]"
                    )));
                }
                if min_value > max_value {
                    return Err(Error::InvalidDomain(format!(
                        "min_value {min_value} exceeds max_value {max_value}"
                    )));
                }
                if !(max_value - min_value).is_finite() {
                    return Err(Error::InvalidDomain(format!(
                        "real interval width overflows, got [{min_value}, {max_value}]"
                    )));
                }
            }
            Self::IntInterval {
                min_value,
                max_value,
            } => {
                if min_value > max_value {
                    return Err(Error::InvalidDomain(format!(
                        "min_value {min_value} exceeds max_value {max_value}"
                    )));
                }
            }
            Self::Discrete { values } => {
                let Some(first) = values.first() else {
                    return Err(Error::InvalidDomain(
                        "discrete domain needs at least one value".to_string(),
                    ));
                };
                let kind = first.kind();
                if let Some(other) = values.iter().find(|v| v.kind() != kind) {
                    return Err(Error::InvalidDomain(format!(
                        "discrete domain mixes {kind:?} with {:?} ({other})",
                        other.kind()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Draw a value uniformly from the domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDomain`] if the domain is malformed.
    pub fn sample_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<HParamValue> {
        self.validate()?;
        let value = match self {
            Self::RealInterval {
                min_value,
                max_value,
            } => HParamValue::Float(rng.gen_range(*min_value..=*max_value)),
            Self::IntInterval {
                min_value,
                max_value,
            } => HParamValue::Int(rng.gen_range(*min_value..=*max_value)),
            Self::Discrete { values } => values
                .choose(rng)
                .cloned()
                .ok_or_else(|| Error::InvalidDomain("empty discrete domain".to_string()))?,
        };
        Ok(value)
    }

    /// Check whether `value` lies in the domain.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn contains(&self, value: &HParamValue) -> bool {
        match (self, value) {
            (
                Self::RealInterval {
                    min_value,
                    max_value,
                },
                HParamValue::Float(v),
            ) => (*min_value..=*max_value).contains(v),
            (
                Self::RealInterval {
                    min_value,
                    max_value,
                },
                HParamValue::Int(v),
            ) => (*min_value..=*max_value).contains(&(*v as f64)),
            (
                Self::IntInterval {
                    min_value,
                    max_value,
                },
                HParamValue::Int(v),
            ) => (*min_value..=*max_value).contains(v),
            (Self::Discrete { values }, v) => values.contains(v),
            _ => false,
        }
    }
}

/// A named hyper-parameter with an optional sampling domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HParam {
    name: String,
    domain: Option<Domain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

impl HParam {
    /// Create a hyper-parameter with a domain.
    #[must_use]
    pub fn new(name: impl Into<String>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            domain: Some(domain),
            display_name: None,
        }
    }

    /// Create a hyper-parameter without a domain. It can be logged but not sampled.
    #[must_use]
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: None,
            display_name: None,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Get the hyper-parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the domain, if any.
    #[must_use]
    pub const fn domain(&self) -> Option<&Domain> {
        self.domain.as_ref()
    }

    /// Get the display name, if set.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Draw a value uniformly from this hyper-parameter's domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDomain`] if no domain is set, or
    /// [`Error::InvalidDomain`] if it is malformed.
    pub fn sample_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<HParamValue> {
        self.domain
            .as_ref()
            .ok_or_else(|| Error::MissingDomain(self.name.clone()))?
            .sample_uniform(rng)
    }
}

/// A metric to display next to the hyper-parameters.
///
/// `tag` is the fully qualified summary name, including parent scopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    tag: String,
    group: String,
}

impl Metric {
    /// Create a metric in the given evaluation group.
    #[must_use]
    pub fn new(tag: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            group: group.into(),
        }
    }

    /// Get the summary tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get the evaluation group.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }
}
