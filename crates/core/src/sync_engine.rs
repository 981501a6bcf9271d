//! One-way directory mirroring engine.
//!
//! The [`SyncEngine`] is the heart of DirMirror. Each pass:
//!
//! 1. Lists the top-level regular files of the source directory.
//! 2. Hashes every file and compares against the snapshot: unseen files
//!    are copied and logged as created, changed files are copied and
//!    logged as updated, unchanged files are left alone.
//! 3. Deletes replica files whose snapshot entry no longer has a source
//!    file, logging each as deleted.
//!
//! The snapshot is updated as actions succeed, so after a completed pass
//! it mirrors the source listing taken at the start of the pass.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::action_log::{ActionLog, SyncAction};
use crate::config::MirrorConfig;
use crate::errors::SyncError;
use crate::hash::ContentHash;
use crate::snapshot::Snapshot;

// ---------------------------------------------------------------------------
// Pass statistics
// ---------------------------------------------------------------------------

/// Counts of the actions applied by a single pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassStats {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The mirroring engine. Owns the snapshot across passes.
pub struct SyncEngine {
    source: PathBuf,
    replica: PathBuf,
    log: ActionLog,
    snapshot: Snapshot,
}

impl SyncEngine {
    /// Create an engine for the given configuration. The snapshot starts
    /// empty, so the first pass reports every source file as created.
    pub fn new(config: &MirrorConfig) -> Self {
        Self {
            source: config.source.clone(),
            replica: config.replica.clone(),
            log: ActionLog::new(config.log_file.clone()),
            snapshot: Snapshot::new(),
        }
    }

    /// State recorded by the most recent completed pass.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    // -----------------------------------------------------------------------
    // Main entry point
    // -----------------------------------------------------------------------

    /// Execute one synchronization pass.
    ///
    /// On error the pass stops where it is; the snapshot keeps the entries
    /// of any actions that did not complete, so a retried pass picks up the
    /// remaining work.
    pub fn run_sync_pass(&mut self) -> Result<PassStats, SyncError> {
        let names = self.list_source_files()?;
        debug!(files = names.len(), "scanned source directory");

        let mut stats = PassStats::default();

        // Copy phase: new and changed files, before any deletion.
        for name in &names {
            let source_path = self.source.join(name);
            let new_hash =
                ContentHash::of_file(&source_path).map_err(|e| SyncError::ReadSource {
                    path: source_path.display().to_string(),
                    source: e,
                })?;

            match self.snapshot.hash_of(name) {
                None => {
                    self.copy_to_replica(name, &source_path)?;
                    self.log.record(SyncAction::Created, &source_path)?;
                    self.snapshot.insert(name.clone(), new_hash);
                    stats.created += 1;
                }
                Some(old_hash) if old_hash != new_hash => {
                    self.copy_to_replica(name, &source_path)?;
                    self.log.record(SyncAction::Updated, &source_path)?;
                    self.snapshot.insert(name.clone(), new_hash);
                    stats.updated += 1;
                }
                Some(_) => {
                    debug!(file = %name, "unchanged");
                }
            }
        }

        // Delete phase: snapshot entries whose source file is gone.
        let current: HashSet<String> = names.into_iter().collect();
        for name in self.snapshot.stale_names(&current) {
            self.delete_from_replica(&name)?;
            self.log.record(SyncAction::Deleted, &self.source.join(&name))?;
            self.snapshot.remove(&name);
            stats.deleted += 1;
        }

        Ok(stats)
    }

    // -----------------------------------------------------------------------
    // Filesystem steps
    // -----------------------------------------------------------------------

    /// Top-level regular files of the source directory, sorted by name.
    ///
    /// Subdirectories, symlinks and other special entries are skipped:
    /// they are neither mirrored nor deleted from the replica.
    fn list_source_files(&self) -> Result<Vec<String>, SyncError> {
        let entries = fs::read_dir(&self.source).map_err(|e| SyncError::ListSource {
            path: self.source.display().to_string(),
            source: e,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SyncError::ListSource {
                path: self.source.display().to_string(),
                source: e,
            })?;
            let file_type = entry.file_type().map_err(|e| SyncError::ListSource {
                path: self.source.display().to_string(),
                source: e,
            })?;
            if !file_type.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    return Err(SyncError::NonUtf8Name {
                        path: self.source.join(raw).display().to_string(),
                    })
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Copy `name` into the replica, overwriting any previous copy, and
    /// carry the source modification time over.
    fn copy_to_replica(&self, name: &str, source_path: &Path) -> Result<(), SyncError> {
        let replica_path = self.replica.join(name);
        fs::copy(source_path, &replica_path).map_err(|e| SyncError::CopyToReplica {
            path: replica_path.display().to_string(),
            source: e,
        })?;

        let metadata = fs::metadata(source_path).map_err(|e| SyncError::ReadSource {
            path: source_path.display().to_string(),
            source: e,
        })?;
        let mtime = filetime::FileTime::from_last_modification_time(&metadata);
        filetime::set_file_mtime(&replica_path, mtime).map_err(|e| SyncError::CopyToReplica {
            path: replica_path.display().to_string(),
            source: e,
        })
    }

    /// Delete `name` from the replica. A file that is already gone counts
    /// as deleted.
    fn delete_from_replica(&self, name: &str) -> Result<(), SyncError> {
        let replica_path = self.replica.join(name);
        match fs::remove_file(&replica_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(file = %name, "replica file already absent");
                Ok(())
            }
            Err(e) => Err(SyncError::DeleteFromReplica {
                path: replica_path.display().to_string(),
                source: e,
            }),
        }
    }
}
