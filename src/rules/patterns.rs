// src/rules/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};

use crate::config::model::{ConfigFile, RuleSpec};
use crate::errors::{ModgenError, Result};
use crate::rules::path_utils::{
    file_name_str, glob_base, is_hidden_segment, normalize_separators, resolve_changed_path,
    resolve_pattern, resolve_str,
};
use crate::types::{is_generated_file_name, ModuleFormat};

/// Compile a single glob with path-aware semantics: `*` and `?` never match
/// `/`, only `**` crosses directories.
pub fn compile_glob(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(&normalize_separators(pattern))
        .literal_separator(true)
        .build()
        .map_err(|source| ModgenError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(compile_glob(pat)?);
    }
    let set = builder.build().map_err(|source| ModgenError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })?;
    Ok(Some(set))
}

/// A compiled rule: "files matching `pattern` are generated `into` these
/// formats".
///
/// Patterns are resolved against the project root before compiling, so a
/// rule matches paths in the form produced by [`resolve_changed_path`]
/// whether they came from discovery or from the watcher.
///
/// Wildcards do not match hidden (`.`-prefixed) files or directories below
/// the pattern's literal base; a pattern that spells out a dot segment
/// (`src/.*.ts`, `.config/*.js`) opts in.
#[derive(Clone)]
pub struct Rule {
    pattern: String,
    formats: Vec<ModuleFormat>,
    resolved: GlobMatcher,
    resolved_exclude: Option<GlobSet>,
    base: String,
    allows_hidden: bool,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.pattern)
            .field("formats", &self.formats)
            .finish_non_exhaustive()
    }
}

impl Rule {
    pub fn compile(root: &Path, spec: &RuleSpec) -> Result<Self> {
        let resolved = compile_glob(&resolve_pattern(root, &spec.pattern))?.compile_matcher();

        let resolved_excludes: Vec<String> = spec
            .exclude
            .iter()
            .map(|pat| resolve_pattern(root, pat))
            .collect();
        let resolved_exclude = build_globset(&resolved_excludes)?;

        let normalized = normalize_separators(&spec.pattern);
        let literal = glob_base(&normalized);
        let allows_hidden = normalized
            .strip_prefix(literal.as_str())
            .unwrap_or(&normalized)
            .split('/')
            .any(is_hidden_segment);

        Ok(Self {
            pattern: spec.pattern.clone(),
            formats: spec.formats.clone(),
            resolved,
            resolved_exclude,
            base: resolve_str(root, &literal),
            allows_hidden,
        })
    }

    /// The pattern as written in the config.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Target formats, in generation order.
    pub fn formats(&self) -> &[ModuleFormat] {
        &self.formats
    }

    /// Match a path already passed through [`resolve_changed_path`].
    pub fn matches_resolved(&self, resolved_path: &str) -> bool {
        if !self.resolved.is_match(resolved_path) {
            return false;
        }
        if !self.allows_hidden && self.has_hidden_segment(resolved_path) {
            return false;
        }
        match &self.resolved_exclude {
            Some(set) => !set.is_match(resolved_path),
            None => true,
        }
    }

    fn has_hidden_segment(&self, resolved_path: &str) -> bool {
        let below_base = match resolved_path.strip_prefix(self.base.as_str()) {
            Some(rest) if self.base.ends_with('/') || rest.is_empty() || rest.starts_with('/') => {
                rest
            }
            _ => return false,
        };
        below_base.split('/').any(is_hidden_segment)
    }
}

/// Ordered, immutable set of rules bound to a project root.
#[derive(Debug, Clone)]
pub struct RuleSet {
    root: PathBuf,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(root: impl Into<PathBuf>, specs: &[RuleSpec]) -> Result<Self> {
        let root = root.into();
        let rules = specs
            .iter()
            .map(|spec| Rule::compile(&root, spec))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { root, rules })
    }

    pub fn from_config(root: impl Into<PathBuf>, cfg: &ConfigFile) -> Result<Self> {
        Self::new(root, cfg.rules())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First rule (in config order) matching `path`.
    ///
    /// The path may be absolute or relative to the root and may use either
    /// separator. Generated outputs never match.
    pub fn first_match(&self, path: &Path) -> Option<&Rule> {
        let resolved = resolve_changed_path(&self.root, path);
        if is_generated_file_name(file_name_str(&resolved)) {
            return None;
        }
        self.rules.iter().find(|rule| rule.matches_resolved(&resolved))
    }
}
