//! Error types for the DirMirror core library.
//!
//! Configuration checks and synchronization passes each have their own
//! error type derived with `thiserror`. Pass errors carry the affected
//! path so a failure can be diagnosed without rerunning.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from validating and resolving the directory arguments.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required directory does not exist.
    #[error("{field} directory not found: '{path}'")]
    DirectoryNotFound { field: &'static str, path: String },

    /// A directory argument names something that is not a directory.
    #[error("{field} path is not a directory: '{path}'")]
    NotADirectory { field: &'static str, path: String },

    /// Source and replica resolve to the same directory.
    #[error("source and replica resolve to the same directory: '{path}'")]
    SameDirectory { path: String },

    /// The schedule's total span exceeds the supported range.
    #[error("schedule of {runs} runs every {interval_secs}s exceeds the supported span")]
    ScheduleTooLong { interval_secs: u64, runs: u32 },

    /// I/O failure while inspecting or resolving a directory argument.
    #[error("cannot access {field} directory '{path}': {source}")]
    Inaccessible {
        field: &'static str,
        path: String,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Sync pass errors
// ---------------------------------------------------------------------------

/// Errors from a single synchronization pass.
///
/// Every variant aborts the pass it occurs in. Only a failed stale-file
/// deletion is retryable: the snapshot keeps the entry, so the next pass
/// attempts the deletion again.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Listing the source directory failed.
    #[error("failed to list source directory '{path}': {source}")]
    ListSource { path: String, source: std::io::Error },

    /// Reading a source file for hashing failed.
    #[error("failed to read source file '{path}': {source}")]
    ReadSource { path: String, source: std::io::Error },

    /// A source entry has a name that is not valid UTF-8.
    #[error("source entry '{path}' has a non-UTF-8 name")]
    NonUtf8Name { path: String },

    /// Copying a file into the replica failed.
    #[error("failed to copy to replica file '{path}': {source}")]
    CopyToReplica { path: String, source: std::io::Error },

    /// Deleting a stale replica file failed for a reason other than the
    /// file already being gone (which is tolerated).
    #[error("failed to delete replica file '{path}': {source}")]
    DeleteFromReplica { path: String, source: std::io::Error },

    /// Appending an action line to the log file failed.
    #[error("failed to append to log file '{path}': {source}")]
    LogAppend { path: String, source: std::io::Error },
}

impl SyncError {
    /// `true` when the next pass retries the failed operation, so the run
    /// may continue after reporting the error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::DeleteFromReplica { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display_messages() {
        let err = ConfigError::DirectoryNotFound {
            field: "source",
            path: "/data/src".into(),
        };
        assert_eq!(err.to_string(), "source directory not found: '/data/src'");

        let err = ConfigError::NotADirectory {
            field: "replica",
            path: "/data/notes.txt".into(),
        };
        assert_eq!(
            err.to_string(),
            "replica path is not a directory: '/data/notes.txt'"
        );

        let err = ConfigError::ScheduleTooLong {
            interval_secs: 86_400,
            runs: 50_000,
        };
        assert_eq!(
            err.to_string(),
            "schedule of 50000 runs every 86400s exceeds the supported span"
        );

        let err = SyncError::ReadSource {
            path: "/data/src/a.txt".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/data/src/a.txt"));
        assert!(err.to_string().contains("denied"));

        let err = SyncError::NonUtf8Name {
            path: "/data/src/??".into(),
        };
        assert!(err.to_string().contains("non-UTF-8"));
    }

    #[test]
    fn test_only_replica_deletion_is_retryable() {
        let delete = SyncError::DeleteFromReplica {
            path: "/mirror/a.txt".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(delete.is_retryable());

        let read = SyncError::ReadSource {
            path: "/data/src/a.txt".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(!read.is_retryable());

        let log = SyncError::LogAppend {
            path: "/var/log/mirror.log".into(),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert!(!log.is_retryable());
    }
}
