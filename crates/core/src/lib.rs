//! DirMirror core library.
//!
//! This crate provides the components for one-way periodic directory
//! mirroring: configuration, content hashing, the replica snapshot, the
//! action log, the sync engine, and the pass scheduler.

pub mod action_log;
pub mod config;
pub mod errors;
pub mod hash;
pub mod scheduler;
pub mod snapshot;
pub mod sync_engine;

// Re-exports for convenience.
pub use config::MirrorConfig;
pub use errors::{ConfigError, SyncError};
pub use sync_engine::{PassStats, SyncEngine};
