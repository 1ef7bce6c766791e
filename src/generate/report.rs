// src/generate/report.rs

use std::fmt;
use std::path::PathBuf;

/// Result of the transform step for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Every requested format was written.
    Generated {
        source: PathBuf,
        outputs: Vec<PathBuf>,
    },
    /// Reading, transforming or writing failed. Outputs listed in `written`
    /// were produced before the failure.
    Failed {
        source: PathBuf,
        written: Vec<PathBuf>,
        message: String,
    },
}

impl FileOutcome {
    pub fn source(&self) -> &PathBuf {
        match self {
            FileOutcome::Generated { source, .. } | FileOutcome::Failed { source, .. } => source,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

/// Which host hook produced a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildKind {
    Initial,
    Incremental,
}

impl fmt::Display for BuildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildKind::Initial => f.write_str("initial"),
            BuildKind::Incremental => f.write_str("incremental"),
        }
    }
}

/// Summary of one build pass. Purely informational: failures are already
/// logged and nothing here is escalated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub kind: BuildKind,
    pub outcomes: Vec<FileOutcome>,
    /// Changed paths that matched no rule (always 0 for initial builds).
    pub unmatched: usize,
}

impl BuildReport {
    pub fn new(kind: BuildKind) -> Self {
        Self {
            kind,
            outcomes: Vec::new(),
            unmatched: 0,
        }
    }

    pub fn generated(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_failed())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// All output files written during this build.
    pub fn written_outputs(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .flat_map(|o| match o {
                FileOutcome::Generated { outputs, .. } => outputs.iter(),
                FileOutcome::Failed { written, .. } => written.iter(),
            })
            .collect()
    }
}
