// tests/discovery.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::path::PathBuf;

use modgen::fs::mock::MockFileSystem;
use modgen::rules::{discover_sources, RuleSet};
use modgen_test_utils::{ConfigFileBuilder, RuleConfigBuilder};

type TestResult = Result<(), Box<dyn Error>>;

fn sample_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/b.ts", "export const b = 2;");
    fs.add_file("/proj/src/a.ts", "export const a = 1;");
    fs.add_file("/proj/src/a.common.js", "/* generated */");
    fs.add_file("/proj/src/nested/c.ts", "export const c = 3;");
    fs.add_file("/proj/src/readme.md", "# docs");
    fs.add_file("/proj/lib/d.js", "export default 4;");
    fs
}

#[test]
fn discovers_union_of_rules_sorted_and_deduplicated() -> TestResult {
    init_tracing();

    let fs = sample_fs();
    let cfg = ConfigFileBuilder::new()
        .with_rule(RuleConfigBuilder::new("src/*.ts").into_format("commonjs").build())
        .with_rule(RuleConfigBuilder::new("src/**/*.ts").into_format("umd").build())
        .with_rule(RuleConfigBuilder::new("lib/*.js").into_format("amd").build())
        .build();
    let rules = RuleSet::from_config("/proj", &cfg)?;

    let sources = discover_sources(&fs, &rules)?;
    let found: Vec<(&str, &str)> = sources
        .iter()
        .map(|s| (s.rel.as_str(), s.rule.pattern()))
        .collect();

    assert_eq!(
        found,
        vec![
            ("lib/d.js", "lib/*.js"),
            ("src/a.ts", "src/*.ts"),
            ("src/b.ts", "src/*.ts"),
            ("src/nested/c.ts", "src/**/*.ts"),
        ]
    );
    assert_eq!(sources[1].path, PathBuf::from("/proj/src/a.ts"));

    Ok(())
}

#[test]
fn missing_glob_base_is_skipped() -> TestResult {
    let fs = sample_fs();
    let cfg = ConfigFileBuilder::new()
        .with_rule(RuleConfigBuilder::new("packages/**/*.ts").into_format("amd").build())
        .with_rule(RuleConfigBuilder::new("lib/*.js").into_format("amd").build())
        .build();
    let rules = RuleSet::from_config("/proj", &cfg)?;

    let sources = discover_sources(&fs, &rules)?;
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].rel, "lib/d.js");

    Ok(())
}

#[test]
fn generated_files_are_not_discovered() -> TestResult {
    let fs = sample_fs();
    let cfg = ConfigFileBuilder::new()
        .with_rule(RuleConfigBuilder::new("src/*.js").into_format("commonjs").build())
        .build();
    let rules = RuleSet::from_config("/proj", &cfg)?;

    let sources = discover_sources(&fs, &rules)?;
    assert!(sources.is_empty(), "got {:?}", sources);

    Ok(())
}

#[test]
fn root_level_patterns_walk_the_whole_root() -> TestResult {
    let fs = sample_fs();
    let cfg = ConfigFileBuilder::new()
        .with_rule(RuleConfigBuilder::new("**/*.js").into_format("umd").build())
        .build();
    let rules = RuleSet::from_config("/proj", &cfg)?;

    let rels: Vec<String> = discover_sources(&fs, &rules)?
        .into_iter()
        .map(|s| s.rel)
        .collect();
    assert_eq!(rels, vec!["lib/d.js".to_string()]);

    Ok(())
}
