//! Append-only JSON-lines event writer for one log directory

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use super::{Event, Payload, EVENT_FILE_PREFIX, FILE_VERSION};
use crate::experiment::{ExperimentSchema, ScalarRecord, SessionEnd, SessionStart};
use crate::Result;

static FILE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Writes events to a fresh file in one log directory.
///
/// Writes are buffered; nothing is guaranteed on disk until [`flush`](Self::flush).
#[derive(Debug)]
pub struct EventWriter {
    logdir: PathBuf,
    path: PathBuf,
    writer: BufWriter<File>,
}

impl EventWriter {
    /// Create the log directory if needed and open a new event file in it.
    ///
    /// The file starts with a `file_version` event.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory or file cannot be created.
    pub fn new(logdir: impl AsRef<Path>) -> Result<Self> {
        let logdir = logdir.as_ref().to_path_buf();
        fs::create_dir_all(&logdir)?;

        let file_name = format!(
            "{EVENT_FILE_PREFIX}out.jsonl.{}.{}.{}",
            Utc::now().timestamp(),
            std::process::id(),
            FILE_SEQ.fetch_add(1, Ordering::Relaxed)
        );
        let path = logdir.join(file_name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let mut writer = Self {
            logdir,
            path,
            writer: BufWriter::new(file),
        };
        writer.add_event(&Event::now(
            None,
            Payload::FileVersion {
                file_version: FILE_VERSION.to_string(),
            },
        ))?;
        Ok(writer)
    }

    /// Get the directory this writer logs to.
    #[must_use]
    pub fn logdir(&self) -> &Path {
        &self.logdir
    }

    /// Get the path of the event file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be serialized or written.
    pub fn add_event(&mut self, event: &Event) -> Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    /// Append a scalar observation at `step`.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be written.
    pub fn add_scalar(&mut self, tag: &str, value: f64, step: u64) -> Result<()> {
        tracing::trace!(logdir = %self.logdir.display(), tag, value, step, "scalar");
        self.add_event(&Event::now(
            Some(step),
            Payload::Scalar(ScalarRecord::new(tag, value)),
        ))
    }

    /// Append a session start record.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be written.
    pub fn add_session_start(&mut self, start: SessionStart) -> Result<()> {
        self.add_event(&Event::now(None, Payload::SessionStart(start)))
    }

    /// Append a session end record.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be written.
    pub fn add_session_end(&mut self, end: SessionEnd) -> Result<()> {
        self.add_event(&Event::now(None, Payload::SessionEnd(end)))
    }

    /// Append an experiment schema record.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be written.
    pub fn add_experiment(&mut self, schema: ExperimentSchema) -> Result<()> {
        self.add_event(&Event::now(None, Payload::Experiment(schema)))
    }

    /// Flush buffered writes to disk.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the flush fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn read_events(path: &Path) -> Vec<Event> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writer_creates_nested_logdir() {
        let dir = tempdir().unwrap();
        let logdir = dir.path().join("000").join("eval");
        let writer = EventWriter::new(&logdir).unwrap();

        assert!(logdir.is_dir());
        assert_eq!(writer.logdir(), logdir);
        assert!(writer.path().starts_with(writer.logdir()));
        assert!(super::super::contains_event_files(&logdir).unwrap());
    }

    #[test]
    fn test_file_version_header() {
        let dir = tempdir().unwrap();
        let mut writer = EventWriter::new(dir.path()).unwrap();
        writer.flush().unwrap();

        let events = read_events(writer.path());
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].payload,
            Payload::FileVersion {
                file_version: FILE_VERSION.to_string()
            }
        );
    }

    #[test]
    fn test_add_scalar_then_flush() {
        let dir = tempdir().unwrap();
        let mut writer = EventWriter::new(dir.path()).unwrap();

        writer.add_scalar("accuracy/top_1", 0.75, 4).unwrap();
        writer.flush().unwrap();

        let events = read_events(writer.path());
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].step, Some(4));
        assert_eq!(
            events[1].payload,
            Payload::Scalar(ScalarRecord::new("accuracy/top_1", 0.75))
        );
    }

    #[test]
    fn test_two_writers_get_distinct_files() {
        let dir = tempdir().unwrap();
        let a = EventWriter::new(dir.path()).unwrap();
        let b = EventWriter::new(dir.path()).unwrap();
        assert_ne!(a.path(), b.path());
    }
}
