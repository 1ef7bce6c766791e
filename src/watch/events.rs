// src/watch/events.rs

//! Turning raw `notify` events into changed source paths.

use std::path::PathBuf;

use notify::event::ModifyKind;
use notify::{Event, EventKind};

use crate::types::is_generated_file_name;

/// True for event kinds that can mean "file content is new or different".
///
/// Removals, access notifications and metadata-only changes are dropped:
/// outputs are never deleted, and nothing needs regenerating for them.
pub fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

/// Paths from `event` worth handing to the generator.
///
/// Generated outputs are filtered here so writing them does not feed back
/// into another build. `is_file` lets the caller drop directories and paths
/// that are already gone again.
pub fn changed_paths(event: Event, is_file: impl Fn(&PathBuf) -> bool) -> Vec<PathBuf> {
    if !is_content_change(&event.kind) {
        return Vec::new();
    }

    event
        .paths
        .into_iter()
        .filter(|path| {
            let generated = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_generated_file_name);
            !generated && is_file(path)
        })
        .collect()
}
