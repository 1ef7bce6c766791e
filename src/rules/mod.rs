// src/rules/mod.rs

//! Rules: which files are generated into which module formats.
//!
//! This module is responsible for:
//! - Compiling each configured `pattern` (and its `exclude` list) into glob
//!   matchers, both as written and resolved against the project root.
//! - Picking the first matching rule for a path (config order wins).
//! - Discovering all matching source files for the initial build.
//!
//! It does **not** read or write source files; that is the generator's job.

pub mod discovery;
pub mod path_utils;
pub mod patterns;

pub use discovery::{discover_sources, DiscoveredSource};
pub use patterns::{compile_glob, Rule, RuleSet};
