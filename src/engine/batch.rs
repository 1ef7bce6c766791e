// src/engine/batch.rs

use std::collections::HashSet;
use std::path::PathBuf;

/// Changed paths collected for one incremental build.
///
/// Keeps first-seen order and drops repeats, since editors commonly report
/// several events for a single save.
#[derive(Debug, Default)]
pub struct ChangeBatch {
    order: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: PathBuf) {
        if self.seen.insert(path.clone()) {
            self.order.push(path);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Drain the batch, leaving it empty for reuse.
    pub fn take(&mut self) -> Vec<PathBuf> {
        self.seen.clear();
        std::mem::take(&mut self.order)
    }
}

impl Extend<PathBuf> for ChangeBatch {
    fn extend<I: IntoIterator<Item = PathBuf>>(&mut self, iter: I) {
        for path in iter {
            self.push(path);
        }
    }
}
