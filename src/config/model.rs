// src/config/model.rs

use serde::Deserialize;

use crate::types::{ModuleFormat, OneOrMany};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// debounce_ms = 100
///
/// [[rule]]
/// pattern = "src/*.ts"
/// into = ["commonjs", "umd"]
///
/// [[rule]]
/// pattern = "lib/**/*.js"
/// into = "amd"
/// exclude = ["lib/vendor/**"]
/// ```
///
/// A single `[rule]` table is accepted as well as a `[[rule]]` array.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Rules in declaration order. Order decides which rule wins when more
    /// than one pattern matches a file.
    #[serde(default)]
    pub rule: OneOrMany<RuleConfig>,
}

/// Validated configuration.
///
/// Constructed only via `TryFrom<RawConfigFile>` (see `validate.rs`), so a
/// `ConfigFile` always has at least one rule and every rule has at least one
/// recognised module format.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub rules: Vec<RuleSpec>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, rules: Vec<RuleSpec>) -> Self {
        Self { config, rules }
    }

    pub fn config_section(&self) -> &ConfigSection {
        &self.config
    }

    pub fn rules(&self) -> &[RuleSpec] {
        &self.rules
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// How long to wait for further filesystem events before starting an
    /// incremental build, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    100
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// `[[rule]]` entry as written in the config.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// Glob pattern, relative to the project root unless absolute.
    pub pattern: String,

    /// Target module format(s): a single name or a list of names.
    #[serde(default)]
    pub into: OneOrMany<String>,

    /// Paths matching any of these globs are not matched by this rule.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// A rule after validation: formats parsed, deduplicated and put in
/// generation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub pattern: String,
    pub formats: Vec<ModuleFormat>,
    pub exclude: Vec<String>,
}
