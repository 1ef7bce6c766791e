// src/config/validate.rs

use std::collections::BTreeSet;

use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile, RuleConfig, RuleSpec};
use crate::errors::{ModgenError, Result};
use crate::rules::patterns::compile_glob;
use crate::types::ModuleFormat;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ModgenError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_global_config(&raw)?;
        let rules = raw.rule.into_vec();
        ensure_has_rules(&rules)?;

        let specs = rules
            .iter()
            .enumerate()
            .map(|(idx, rule)| validate_rule(idx, rule))
            .collect::<Result<Vec<_>>>()?;

        Ok(ConfigFile::new_unchecked(raw.config, specs))
    }
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.debounce_ms == 0 {
        return Err(ModgenError::ConfigError(
            "[config].debounce_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn ensure_has_rules(rules: &[RuleConfig]) -> Result<()> {
    if rules.is_empty() {
        return Err(ModgenError::ConfigError(
            "config must contain at least one [[rule]] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_rule(idx: usize, rule: &RuleConfig) -> Result<RuleSpec> {
    if rule.pattern.trim().is_empty() {
        return Err(ModgenError::ConfigError(format!(
            "rule #{} has an empty `pattern`",
            idx + 1
        )));
    }

    compile_glob(&rule.pattern)?;
    for pat in &rule.exclude {
        compile_glob(pat)?;
    }

    let names = rule.into.as_slice();
    if names.is_empty() {
        return Err(ModgenError::ConfigError(format!(
            "rule '{}' must list at least one module format in `into`",
            rule.pattern
        )));
    }

    // BTreeSet keeps the fixed generation order and drops duplicates.
    let mut formats = BTreeSet::new();
    for name in names {
        match name.parse::<ModuleFormat>() {
            Ok(format) => {
                formats.insert(format);
            }
            Err(err) => {
                warn!(pattern = %rule.pattern, "ignoring entry in `into`: {err}");
            }
        }
    }

    if formats.is_empty() {
        return Err(ModgenError::ConfigError(format!(
            "rule '{}' has no recognised module format in `into` (got {:?})",
            rule.pattern, names
        )));
    }

    Ok(RuleSpec {
        pattern: rule.pattern.clone(),
        formats: formats.into_iter().collect(),
        exclude: rule.exclude.clone(),
    })
}
