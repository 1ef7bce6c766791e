// src/rules/discovery.rs

//! Initial-build file discovery.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::fs::FileSystem;
use crate::rules::path_utils::{glob_base, normalize_separators, relative_str};
use crate::rules::patterns::{Rule, RuleSet};

/// A source file found during discovery, paired with the rule that owns it.
#[derive(Debug, Clone)]
pub struct DiscoveredSource<'a> {
    /// Path on disk (the project root joined with `rel`).
    pub path: PathBuf,
    /// `/`-separated path relative to the root; absolute when the file lies
    /// outside the root (only possible with absolute patterns).
    pub rel: String,
    pub rule: &'a Rule,
}

/// Collect every file matched by any rule, each paired with the *first*
/// matching rule in config order.
///
/// Only the literal directory prefix of each pattern is walked (`src` for
/// `src/**/*.ts`). Results are sorted by relative path and contain each file
/// once, even when several rules (or overlapping prefixes) reach it.
/// Generated outputs are never returned and symlinked directories are not
/// descended into.
pub fn discover_sources<'a>(
    fs: &dyn FileSystem,
    rules: &'a RuleSet,
) -> Result<Vec<DiscoveredSource<'a>>> {
    let root = rules.root();

    let bases: BTreeSet<String> = rules.rules().iter().map(|r| glob_base(r.pattern())).collect();

    let mut candidates: BTreeSet<(String, PathBuf)> = BTreeSet::new();
    for base in &bases {
        let dir = if base.is_empty() {
            root.to_path_buf()
        } else {
            root.join(base)
        };
        if !fs.is_dir(&dir) {
            debug!(?dir, "glob base does not exist; skipping");
            continue;
        }
        walk_files(fs, root, &dir, &mut candidates)?;
    }

    let sources: Vec<DiscoveredSource<'a>> = candidates
        .into_iter()
        .filter_map(|(rel, path)| {
            rules
                .first_match(&path)
                .map(|rule| DiscoveredSource { path, rel, rule })
        })
        .collect();

    debug!(count = sources.len(), "discovered source files");
    Ok(sources)
}

fn walk_files(
    fs: &dyn FileSystem,
    root: &Path,
    dir: &Path,
    out: &mut BTreeSet<(String, PathBuf)>,
) -> Result<()> {
    let mut stack = vec![dir.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                // Linked directories can point back up the tree.
                if fs.is_symlink(&path) {
                    debug!(?path, "skipping symlinked directory");
                    continue;
                }
                stack.push(path);
            } else if fs.is_file(&path) {
                let rel = relative_str(root, &path)
                    .unwrap_or_else(|| normalize_separators(&path.to_string_lossy()));
                out.insert((rel, path));
            }
        }
    }

    Ok(())
}
