// src/engine/mod.rs

//! Build host for modgen.
//!
//! This module plays the part of the build tool the generator plugs into:
//! - it runs the initial build once at startup,
//! - it turns batches of filesystem changes into incremental builds,
//! - it stops on Ctrl-C or when its event channel closes.
//!
//! Change batching lives in [`batch`] (pure, no IO); the async shell is
//! implemented in [`runtime`].

use std::path::PathBuf;
use std::time::Duration;

/// Events flowing into the runtime from the watcher and signal handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// Paths created or modified on disk.
    FilesChanged(Vec<PathBuf>),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Runtime options.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Quiet period that closes a batch of changes.
    pub debounce: Duration,
    /// If true, stop after the initial build (used for `--once`).
    pub exit_after_initial: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
            exit_after_initial: false,
        }
    }
}

pub mod batch;
pub mod runtime;

pub use batch::ChangeBatch;
pub use runtime::Runtime;
