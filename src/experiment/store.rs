//! Experiment Store - reads a log directory tree back into memory
//!
//! This module is the read side of the event files: it loads every stream
//! under a base directory and answers per-directory queries.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{ExperimentSchema, ScalarPoint, SessionEnd, SessionStart};
use crate::events::{is_event_file_name, Event, Payload};
use crate::{Error, Result};

/// In-memory view of every event under a log directory.
///
/// ## Design
///
/// Events are grouped by the directory holding their file. Several files in
/// one directory are merged in file-name order, so a directory reads as one
/// stream the way the visualization tool sees it.
#[derive(Debug, Default)]
pub struct ExperimentStore {
    events: BTreeMap<PathBuf, Vec<Event>>,
}

impl ExperimentStore {
    /// Create a new empty experiment store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every event file under `base_dir`, recursively.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the tree cannot be read, or
    /// [`Error::MalformedEvent`] if a line does not decode.
    pub fn load(base_dir: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new();

        // File-name order within a directory is the merge order
        for entry in WalkDir::new(base_dir.as_ref()).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if !entry.file_type().is_file() || !is_event_file_name(entry.file_name()) {
                continue;
            }
            let file = entry.path();
            let dir = file.parent().unwrap_or_else(|| base_dir.as_ref());
            store.load_file(dir, file)?;
        }

        Ok(store)
    }

    fn load_file(&mut self, dir: &Path, file: &Path) -> Result<()> {
        let content = fs::read_to_string(file)?;
        let events = self.events.entry(dir.to_path_buf()).or_default();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let event: Event = serde_json::from_str(line).map_err(|e| Error::MalformedEvent {
                path: file.to_path_buf(),
                line: idx + 1,
                reason: e.to_string(),
            })?;
            events.push(event);
        }
        Ok(())
    }

    /// Add an event for `dir` directly, without touching disk.
    pub fn add_event(&mut self, dir: impl Into<PathBuf>, event: Event) {
        self.events.entry(dir.into()).or_default().push(event);
    }

    /// Check if the store holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.values().all(Vec::is_empty)
    }

    /// Get the total number of events, headers included.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    /// Get every directory that holds at least one event file, sorted.
    #[must_use]
    pub fn directories(&self) -> Vec<&Path> {
        self.events.keys().map(PathBuf::as_path).collect()
    }

    /// Get the events of exactly `dir`, in stream order.
    #[must_use]
    pub fn events_in(&self, dir: &Path) -> &[Event] {
        self.events.get(dir).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get the experiment schema records written in `dir`.
    #[must_use]
    pub fn schema_records(&self, dir: &Path) -> Vec<&ExperimentSchema> {
        self.events_in(dir)
            .iter()
            .filter_map(|e| match &e.payload {
                Payload::Experiment(schema) => Some(schema),
                _ => None,
            })
            .collect()
    }

    /// Get the session start records written in `dir`.
    #[must_use]
    pub fn session_starts(&self, dir: &Path) -> Vec<&SessionStart> {
        self.events_in(dir)
            .iter()
            .filter_map(|e| match &e.payload {
                Payload::SessionStart(start) => Some(start),
                _ => None,
            })
            .collect()
    }

    /// Get the session end records written in `dir`.
    #[must_use]
    pub fn session_ends(&self, dir: &Path) -> Vec<&SessionEnd> {
        self.events_in(dir)
            .iter()
            .filter_map(|e| match &e.payload {
                Payload::SessionEnd(end) => Some(end),
                _ => None,
            })
            .collect()
    }

    /// Get the schema records across every directory.
    #[must_use]
    pub fn total_schema_records(&self) -> usize {
        self.events
            .keys()
            .map(|dir| self.schema_records(dir).len())
            .sum()
    }

    /// Get scalars for `tag` in `dir`, ordered by step.
    ///
    /// This is the primary query for time-series metric data.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use hparams_synth::events::{Event, Payload};
    /// use hparams_synth::experiment::{ExperimentStore, ScalarRecord};
    ///
    /// let mut store = ExperimentStore::new();
    /// for step in (0..5).rev() {
    ///     let scalar = Payload::Scalar(ScalarRecord::new("loss", 1.0 / (step as f64 + 1.0)));
    ///     store.add_event("logs/000", Event::now(Some(step), scalar));
    /// }
    ///
    /// let loss = store.scalars_for("logs/000".as_ref(), "loss");
    /// assert_eq!(loss.len(), 5);
    /// assert_eq!(loss[0].step, 0);
    /// ```
    #[must_use]
    pub fn scalars_for(&self, dir: &Path, tag: &str) -> Vec<ScalarPoint> {
        let mut points: Vec<ScalarPoint> = self
            .events_in(dir)
            .iter()
            .filter_map(|e| match &e.payload {
                Payload::Scalar(scalar) if scalar.tag() == tag => Some(ScalarPoint {
                    step: e.step.unwrap_or(0),
                    value: scalar.value(),
                    wall_time: e.wall_time,
                }),
                _ => None,
            })
            .collect();

        // Stable sort keeps write order for equal steps
        points.sort_by_key(|p| p.step);

        points
    }
}
