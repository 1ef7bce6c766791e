#![allow(dead_code)]

use modgen::config::{ConfigFile, ConfigSection, RawConfigFile, RuleConfig};
use modgen::types::OneOrMany;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: ConfigSection,
    rules: Vec<RuleConfig>,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: ConfigSection::default(),
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: RuleConfig) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.debounce_ms = ms;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        RawConfigFile {
            config: self.config,
            rule: OneOrMany::Many(self.rules),
        }
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.build_raw()).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `RuleConfig`.
pub struct RuleConfigBuilder {
    rule: RuleConfig,
}

impl RuleConfigBuilder {
    pub fn new(pattern: &str) -> Self {
        Self {
            rule: RuleConfig {
                pattern: pattern.to_string(),
                into: OneOrMany::Many(Vec::new()),
                exclude: Vec::new(),
            },
        }
    }

    pub fn into_formats(mut self, formats: &[&str]) -> Self {
        self.rule.into = OneOrMany::from(formats.to_vec());
        self
    }

    pub fn into_format(mut self, format: &str) -> Self {
        self.rule.into = OneOrMany::from(format);
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.rule.exclude.push(pattern.to_string());
        self
    }

    pub fn build(self) -> RuleConfig {
        self.rule
    }
}
