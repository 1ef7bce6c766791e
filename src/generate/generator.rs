// src/generate/generator.rs

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::errors::{ModgenError, Result};
use crate::fs::FileSystem;
use crate::generate::output::{output_path, wrap_generated};
use crate::generate::report::{BuildKind, BuildReport, FileOutcome};
use crate::rules::path_utils::resolve_changed_path;
use crate::rules::{discover_sources, Rule, RuleSet};
use crate::transpile::Transpiler;
use crate::types::ModuleFormat;

/// Generates module-format variants for the files matched by a [`RuleSet`].
///
/// Holds nothing but the immutable rules and its two collaborators: every
/// build re-reads sources from disk and rewrites outputs in full.
pub struct Generator<T: Transpiler> {
    rules: RuleSet,
    fs: Arc<dyn FileSystem>,
    transpiler: T,
}

impl<T: Transpiler> fmt::Debug for Generator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("rules", &self.rules)
            .field("transpiler", &self.transpiler.name())
            .finish_non_exhaustive()
    }
}

impl<T: Transpiler> Generator<T> {
    pub fn new(rules: RuleSet, fs: Arc<dyn FileSystem>, transpiler: T) -> Self {
        Self {
            rules,
            fs,
            transpiler,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn transpiler(&self) -> &T {
        &self.transpiler
    }

    /// Transform every file matched by any rule.
    ///
    /// Each file is handled by the first rule (config order) that matches it.
    /// A discovery failure is logged and yields an empty report.
    pub fn initial_build(&self) -> BuildReport {
        let mut report = BuildReport::new(BuildKind::Initial);

        let sources = match discover_sources(self.fs.as_ref(), &self.rules) {
            Ok(sources) => sources,
            Err(err) => {
                error!(root = ?self.rules.root(), "file discovery failed: {err:#}");
                return report;
            }
        };

        info!(files = sources.len(), "initial build");
        for source in sources {
            let outcome = self.transform_file(&source.path, source.rule);
            log_outcome(&outcome);
            report.outcomes.push(outcome);
        }

        report
    }

    /// Re-transform the changed files that match a rule.
    ///
    /// Paths may be absolute or relative to the project root, with either
    /// separator. Paths matching no rule are skipped silently; a file listed
    /// twice, in any spelling, is transformed once.
    pub fn incremental_build<I, P>(&self, changed: I) -> BuildReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = BuildReport::new(BuildKind::Incremental);
        let mut seen: HashSet<String> = HashSet::new();

        for path in changed {
            let path = path.as_ref();
            if !seen.insert(resolve_changed_path(self.rules.root(), path)) {
                continue;
            }

            match self.rules.first_match(path) {
                Some(rule) => {
                    debug!(?path, pattern = rule.pattern(), "changed file matched rule");
                    let source = self.on_disk(path);
                    let outcome = self.transform_file(&source, rule);
                    log_outcome(&outcome);
                    report.outcomes.push(outcome);
                }
                None => {
                    debug!(?path, "changed file matches no rule; ignoring");
                    report.unmatched += 1;
                }
            }
        }

        report
    }

    /// Generate every format requested by `rule` for one source file.
    ///
    /// Formats are produced in the fixed format order. The source is read
    /// fresh for each format and each output is overwritten in full. The
    /// first failure ends the work for this file and is returned as
    /// [`FileOutcome::Failed`]; it is never propagated. A panicking
    /// transpiler counts as a failure of this file only.
    pub fn transform_file(&self, source: &Path, rule: &Rule) -> FileOutcome {
        let mut written = Vec::with_capacity(rule.formats().len());

        match self.write_formats(source, rule, &mut written) {
            Ok(()) => FileOutcome::Generated {
                source: source.to_path_buf(),
                outputs: written,
            },
            Err(err) => FileOutcome::Failed {
                source: source.to_path_buf(),
                written,
                message: describe(&err),
            },
        }
    }

    fn write_formats(&self, source: &Path, rule: &Rule, written: &mut Vec<PathBuf>) -> Result<()> {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        for &format in rule.formats() {
            let target = output_path(source, format)?;
            let content = self.fs.read_to_string(source)?;
            let code = self.transpile_caught(&content, &file_name, format)?;
            self.fs.write(&target, wrap_generated(&code).as_bytes())?;
            debug!(?source, ?target, %format, "wrote generated module");
            written.push(target);
        }

        Ok(())
    }

    fn transpile_caught(&self, source: &str, file_name: &str, format: ModuleFormat) -> Result<String> {
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.transpiler.transpile(source, file_name, format)
        }))
        .unwrap_or_else(|payload| {
            Err(ModgenError::Transform {
                file: PathBuf::from(file_name),
                message: format!("transpiler panicked: {}", panic_message(payload.as_ref())),
            })
        })
    }

    /// Relative changed paths are taken relative to the project root.
    fn on_disk(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.rules.root().join(path)
        }
    }
}

fn describe(err: &ModgenError) -> String {
    match err {
        ModgenError::Transform { message, .. } => message.clone(),
        ModgenError::Other(inner) => format!("{inner:#}"),
        other => other.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic payload"
    }
}

/// The log line for a failed file, `None` for a generated one.
pub fn failure_line(outcome: &FileOutcome) -> Option<String> {
    match outcome {
        FileOutcome::Generated { .. } => None,
        FileOutcome::Failed { source, message, .. } => Some(format!(
            "TransformModulesWebpackPlugin: Couldn't transform module ({}) - {}",
            source.display(),
            message
        )),
    }
}

fn log_outcome(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Generated { source, outputs } => {
            info!(source = %source.display(), outputs = outputs.len(), "generated modules");
        }
        FileOutcome::Failed { .. } => {
            if let Some(line) = failure_line(outcome) {
                error!("{line}");
            }
        }
    }
}
