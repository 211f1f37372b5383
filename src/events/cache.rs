//! Per-directory writer cache
//!
//! Repeated writes to one directory share one event file.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::EventWriter;
use crate::Result;

/// Cache of open [`EventWriter`]s keyed by log directory.
///
/// Keys are compared as given, without canonicalization: `logs/000` and
/// `./logs/000` get separate writers.
#[derive(Debug, Default)]
pub struct WriterCache {
    writers: HashMap<PathBuf, EventWriter>,
}

impl WriterCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the writer for `logdir`, opening one on first use.
    ///
    /// # Errors
    ///
    /// Returns an IO error if a new writer cannot be opened.
    pub fn get(&mut self, logdir: &Path) -> Result<&mut EventWriter> {
        match self.writers.entry(logdir.to_path_buf()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                tracing::debug!(logdir = %logdir.display(), "opening event writer");
                let writer = EventWriter::new(entry.key())?;
                Ok(entry.insert(writer))
            }
        }
    }

    /// Check if a writer is already open for `logdir`.
    #[must_use]
    pub fn contains(&self, logdir: &Path) -> bool {
        self.writers.contains_key(logdir)
    }

    /// Get the number of open writers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writers.len()
    }

    /// Check if no writer is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }

    /// Flush every open writer.
    ///
    /// # Errors
    ///
    /// Returns the first IO error encountered.
    pub fn flush_all(&mut self) -> Result<()> {
        for writer in self.writers.values_mut() {
            tracing::trace!(logdir = %writer.logdir().display(), "flushing event writer");
            writer.flush()?;
        }
        Ok(())
    }
}
