// src/watch/mod.rs

//! File watching.
//!
//! Wires up a cross-platform filesystem watcher (`notify`) and forwards
//! created/modified file paths to the runtime. It does **not** know about
//! rules; deciding which changed files to regenerate is the generator's job.

pub mod events;
pub mod watcher;

pub use events::{changed_paths, is_content_change};
pub use watcher::{spawn_watcher, WatcherHandle};
