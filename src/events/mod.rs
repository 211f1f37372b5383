//! Event files: the on-disk log stream of a directory
//!
//! Every log directory holds one or more append-only JSON-lines files named
//! `events.out.jsonl.<secs>.<pid>.<seq>`. Each line is one [`Event`]: a wall
//! time, an optional step, and a typed record.
//!
//! ```text
//! {"wall_time":1712.1,"type":"file_version","file_version":"hparams-synth.Event:1"}
//! {"wall_time":1712.2,"type":"session_start","trial_id":"000",...}
//! {"wall_time":1712.3,"step":0,"type":"scalar","tag":"loss","value":0.42}
//! ```
//!
//! The visualization side finds streams by globbing `events.*`, so
//! [`contains_event_files`] is the shared definition of "this directory has
//! already been logged to".

mod cache;
mod writer;

pub use cache::WriterCache;
pub use writer::EventWriter;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::experiment::{ExperimentSchema, ScalarRecord, SessionEnd, SessionStart};
use crate::Result;

/// File name prefix shared by every event file.
pub const EVENT_FILE_PREFIX: &str = "events.";

/// Format marker written as the first event of every file.
pub const FILE_VERSION: &str = "hparams-synth.Event:1";

/// One line of an event file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Wall time in seconds since the Unix epoch
    pub wall_time: f64,
    /// Training step, for step-indexed records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u64>,
    /// Record carried by this event
    #[serde(flatten)]
    pub payload: Payload,
}

/// Typed record carried by an [`Event`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    /// File header
    FileVersion {
        /// Format marker, see [`FILE_VERSION`]
        file_version: String,
    },
    /// Experiment-wide schema
    Experiment(ExperimentSchema),
    /// Per-run hyper-parameter assignment
    SessionStart(SessionStart),
    /// Per-run completion status
    SessionEnd(SessionEnd),
    /// Step-indexed metric value
    Scalar(ScalarRecord),
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn now(step: Option<u64>, payload: Payload) -> Self {
        Self {
            wall_time: crate::experiment::now_secs(),
            step,
            payload,
        }
    }
}

/// Check whether `dir` directly contains an event file.
///
/// A missing directory has no event files. Subdirectories are not searched.
///
/// # Errors
///
/// Returns an IO error if `dir` exists but cannot be listed.
pub fn contains_event_files(dir: &Path) -> Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && is_event_file_name(&entry.file_name()) {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn is_event_file_name(name: &std::ffi::OsStr) -> bool {
    name.to_str()
        .is_some_and(|name| name.starts_with(EVENT_FILE_PREFIX))
}
