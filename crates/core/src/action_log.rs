//! Append-only action log.
//!
//! Every mirroring action becomes one tab-separated line:
//!
//! ```text
//! 2024-05-03T14:07:21	/data/source/report.txt	created
//! ```
//!
//! Lines are appended with a fresh file handle per action and echoed to
//! stdout, so the log can be rotated or inspected between actions.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::errors::SyncError;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// What a pass did to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Created,
    Updated,
    Deleted,
}

impl SyncAction {
    /// Verb used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            SyncAction::Created => "created",
            SyncAction::Updated => "updated",
            SyncAction::Deleted => "deleted",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Log writer
// ---------------------------------------------------------------------------

/// Writes one line per action to the log file and echoes it to stdout.
#[derive(Debug, Clone)]
pub struct ActionLog {
    path: PathBuf,
}

impl ActionLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one action line and echo it to stdout.
    ///
    /// `file` is the absolute source-side path of the affected file, for
    /// deletions as well.
    pub fn record(&self, action: SyncAction, file: &Path) -> Result<(), SyncError> {
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S");
        let line = format!("{timestamp}\t{}\t{action}", file.display());
        self.append_line(&line)?;
        println!("{line}");
        Ok(())
    }

    fn append_line(&self, line: &str) -> Result<(), SyncError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SyncError::LogAppend {
                path: self.path.display().to_string(),
                source: e,
            })?;
        writeln!(file, "{line}").map_err(|e| SyncError::LogAppend {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::fs;
    use tempfile::TempDir;

    fn read_lines(log: &ActionLog) -> Vec<String> {
        fs::read_to_string(log.path())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_action_verbs() {
        assert_eq!(SyncAction::Created.to_string(), "created");
        assert_eq!(SyncAction::Updated.to_string(), "updated");
        assert_eq!(SyncAction::Deleted.to_string(), "deleted");
    }

    #[test]
    fn test_record_creates_the_log_file() {
        let tmp = TempDir::new().unwrap();
        let log = ActionLog::new(tmp.path().join("actions.log"));

        log.record(SyncAction::Created, Path::new("/data/source/a.txt"))
            .unwrap();

        assert!(log.path().exists());
    }

    #[test]
    fn test_record_appends_one_line_per_action() {
        let tmp = TempDir::new().unwrap();
        let log = ActionLog::new(tmp.path().join("actions.log"));

        log.record(SyncAction::Created, Path::new("/data/source/a.txt"))
            .unwrap();
        log.record(SyncAction::Updated, Path::new("/data/source/a.txt"))
            .unwrap();
        log.record(SyncAction::Deleted, Path::new("/data/source/a.txt"))
            .unwrap();

        let lines = read_lines(&log);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("created"));
        assert!(lines[1].ends_with("updated"));
        assert!(lines[2].ends_with("deleted"));
    }

    #[test]
    fn test_line_has_timestamp_path_and_verb() {
        let tmp = TempDir::new().unwrap();
        let log = ActionLog::new(tmp.path().join("actions.log"));

        log.record(SyncAction::Created, Path::new("/data/source/a.txt"))
            .unwrap();

        let lines = read_lines(&log);
        let fields: Vec<&str> = lines[0].split('\t').collect();
        assert_eq!(fields.len(), 3, "expected 3 tab-separated fields: {lines:?}");

        // Second precision, no sub-second digits, no offset.
        NaiveDateTime::parse_from_str(fields[0], "%Y-%m-%dT%H:%M:%S")
            .unwrap_or_else(|e| panic!("bad timestamp '{}': {e}", fields[0]));
        assert_eq!(fields[1], "/data/source/a.txt");
        assert_eq!(fields[2], "created");
    }

    #[test]
    fn test_append_failure_reports_log_path() {
        let tmp = TempDir::new().unwrap();
        let log = ActionLog::new(tmp.path().join("missing-dir").join("actions.log"));

        let err = log
            .record(SyncAction::Created, Path::new("/data/source/a.txt"))
            .unwrap_err();

        assert!(matches!(err, SyncError::LogAppend { .. }));
        assert!(err.to_string().contains("actions.log"));
    }
}
