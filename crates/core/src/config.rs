//! Runtime configuration for a mirroring run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// Longest supported schedule span. Keeps every pass deadline inside the
/// range the platform clock can represent.
const MAX_SCHEDULE_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Everything one mirroring run needs to know, fixed for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Directory whose top-level files are mirrored.
    pub source: PathBuf,

    /// Directory receiving the mirror. Treated as fully owned by the tool.
    pub replica: PathBuf,

    /// Seconds between the scheduled starts of consecutive passes.
    pub interval_secs: u64,

    /// Total number of passes to perform.
    pub runs: u32,

    /// Append-only action log. Created on first write if absent.
    pub log_file: PathBuf,
}

impl MirrorConfig {
    /// Check that the source and replica arguments name existing
    /// directories and that the schedule stays within the supported span.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_directory("source", &self.source)?;
        check_directory("replica", &self.replica)?;

        // Offset of the last pass deadline from the start of the run.
        let last_offset = u64::from(self.runs.saturating_sub(1)).checked_mul(self.interval_secs);
        match last_offset {
            Some(offset) if offset <= MAX_SCHEDULE_SECS => Ok(()),
            _ => Err(ConfigError::ScheduleTooLong {
                interval_secs: self.interval_secs,
                runs: self.runs,
            }),
        }
    }

    /// Validate, then resolve both directory paths to absolute form.
    ///
    /// Log lines name affected files by absolute source path, so relative
    /// arguments are resolved once here rather than on every pass.
    pub fn canonicalized(self) -> Result<Self, ConfigError> {
        self.validate()?;

        let source = canonicalize_dir("source", &self.source)?;
        let replica = canonicalize_dir("replica", &self.replica)?;
        if source == replica {
            return Err(ConfigError::SameDirectory {
                path: source.display().to_string(),
            });
        }

        Ok(Self {
            source,
            replica,
            ..self
        })
    }
}

fn check_directory(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::NotADirectory {
            field,
            path: path.display().to_string(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ConfigError::DirectoryNotFound {
            field,
            path: path.display().to_string(),
        }),
        Err(e) => Err(ConfigError::Inaccessible {
            field,
            path: path.display().to_string(),
            source: e,
        }),
    }
}

fn canonicalize_dir(field: &'static str, path: &Path) -> Result<PathBuf, ConfigError> {
    fs::canonicalize(path).map_err(|e| ConfigError::Inaccessible {
        field,
        path: path.display().to_string(),
        source: e,
    })
}
