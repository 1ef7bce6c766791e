// tests/generator.rs

mod common;
use crate::common::{fake_output, init_tracing};

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use modgen::config::ConfigFile;
use modgen::fs::mock::MockFileSystem;
use modgen::fs::FileSystem;
use modgen::generate::{failure_line, output_path, BuildKind, FileOutcome, BANNER, FOOTER};
use modgen::types::ModuleFormat;
use modgen_test_utils::{fake_generator, ConfigFileBuilder, FakeTranspiler, RuleConfigBuilder};

type TestResult = Result<(), Box<dyn Error>>;

fn ts_config() -> ConfigFile {
    ConfigFileBuilder::new()
        .with_rule(
            RuleConfigBuilder::new("src/*.ts")
                .into_formats(&["umd", "commonjs"])
                .build(),
        )
        .build()
}

#[test]
fn initial_build_writes_every_requested_format() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/foo.ts", "export const x = 1;");
    let transpiler = FakeTranspiler::new();
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), transpiler.clone());

    let report = generator.initial_build();

    assert_eq!(report.kind, BuildKind::Initial);
    assert_eq!(report.failed().count(), 0);
    assert_eq!(
        report.outcomes,
        vec![FileOutcome::Generated {
            source: PathBuf::from("/proj/src/foo.ts"),
            outputs: vec![
                PathBuf::from("/proj/src/foo.common.js"),
                PathBuf::from("/proj/src/foo.umd.js"),
            ],
        }]
    );

    assert_eq!(
        fs.contents("/proj/src/foo.common.js").as_deref(),
        Some(fake_output("commonjs", "export const x = 1;").as_str())
    );
    assert_eq!(
        fs.contents("/proj/src/foo.umd.js").as_deref(),
        Some(fake_output("umd", "export const x = 1;").as_str())
    );
    assert!(!fs.exists(&PathBuf::from("/proj/src/foo.amd.js")));

    // Fixed format order, whatever order `into` used.
    assert_eq!(
        transpiler.recorded(),
        vec![
            ("foo.ts".to_string(), ModuleFormat::CommonJs),
            ("foo.ts".to_string(), ModuleFormat::Umd),
        ]
    );

    Ok(())
}

#[test]
fn outputs_are_wrapped_in_banner_and_footer() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/foo.ts", "export default 1;");
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), FakeTranspiler::new());

    generator.initial_build();

    let out = fs.contents("/proj/src/foo.common.js").unwrap();
    assert!(out.starts_with(
        "/**\n * This file is auto-generated by GenerateModulesWebpackPlugin.\n * Check this file into source control.\n * Do not edit this file.\n */\n"
    ));
    assert!(out.ends_with("\n/* End of auto-generated content. */\n"));
    assert!(out.starts_with(BANNER) && out.ends_with(FOOTER));
}

#[test]
fn transforming_unchanged_source_is_idempotent() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/foo.ts", "export const x = 1;");
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), FakeTranspiler::new());

    generator.initial_build();
    let first = fs.contents("/proj/src/foo.umd.js");
    generator.incremental_build(["/proj/src/foo.ts"]);
    let second = fs.contents("/proj/src/foo.umd.js");

    assert!(first.is_some());
    assert_eq!(first, second);
    // Each build rewrote both outputs in full.
    assert_eq!(fs.writes().len(), 4);

    Ok(())
}

#[test]
fn source_is_reread_on_every_transform() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/foo.ts", "export const x = 1;");
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), FakeTranspiler::new());

    generator.initial_build();
    fs.add_file("/proj/src/foo.ts", "export const x = 2;");
    generator.incremental_build(["/proj/src/foo.ts"]);

    assert_eq!(
        fs.contents("/proj/src/foo.common.js").as_deref(),
        Some(fake_output("commonjs", "export const x = 2;").as_str())
    );
}

#[test]
fn failure_in_one_file_does_not_stop_the_batch() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/a.ts", "export const a = ;");
    fs.add_file("/proj/src/b.ts", "export const b = 2;");
    let transpiler = FakeTranspiler::new().fail_on("a.ts");
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), transpiler);

    let report = generator.initial_build();

    assert_eq!(report.outcomes.len(), 2);
    match &report.outcomes[0] {
        FileOutcome::Failed {
            source,
            written,
            message,
        } => {
            assert_eq!(source, &PathBuf::from("/proj/src/a.ts"));
            assert!(written.is_empty());
            assert!(message.contains("Unexpected token"));
        }
        other => panic!("expected a.ts to fail, got {:?}", other),
    }
    assert!(!report.outcomes[1].is_failed());

    assert!(fs.contents("/proj/src/a.common.js").is_none());
    assert!(fs.contents("/proj/src/b.common.js").is_some());
    assert!(fs.contents("/proj/src/b.umd.js").is_some());
}

#[test]
fn panicking_transpiler_only_fails_its_own_file() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/a.ts", "export const a = 1;");
    fs.add_file("/proj/src/b.ts", "export const b = 2;");
    let transpiler = FakeTranspiler::new().panic_on("a.ts");
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), transpiler);

    let report = generator.initial_build();

    assert_eq!(report.outcomes.len(), 2);
    match &report.outcomes[0] {
        FileOutcome::Failed { source, message, .. } => {
            assert_eq!(source, &PathBuf::from("/proj/src/a.ts"));
            assert!(message.contains("fake transpiler crashed on a.ts"), "{message}");
        }
        other => panic!("expected a.ts to fail, got {:?}", other),
    }
    assert!(fs.contents("/proj/src/b.common.js").is_some());
    assert!(fs.contents("/proj/src/b.umd.js").is_some());

    // The generator stays usable for the next batch.
    let again = generator.incremental_build(["/proj/src/b.ts"]);
    assert_eq!(again.generated().count(), 1);
}

#[test]
fn failure_line_names_the_module_and_the_error() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/a.ts", "export const a = ;");
    fs.add_file("/proj/src/foo.ts", "export const x = 1;");
    fs.deny_writes("/proj/src/foo.umd.js");
    let transpiler = FakeTranspiler::new().fail_on("a.ts");
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), transpiler);

    let report = generator.initial_build();
    let lines: Vec<String> = report.outcomes.iter().filter_map(failure_line).collect();

    assert_eq!(
        lines,
        vec![
            "TransformModulesWebpackPlugin: Couldn't transform module (/proj/src/a.ts) - Unexpected token in a.ts"
                .to_string(),
            "TransformModulesWebpackPlugin: Couldn't transform module (/proj/src/foo.ts) - Permission denied: \"/proj/src/foo.umd.js\""
                .to_string(),
        ]
    );
}

#[test]
fn generated_outcomes_have_no_failure_line() {
    let outcome = FileOutcome::Generated {
        source: PathBuf::from("/proj/src/foo.ts"),
        outputs: vec![PathBuf::from("/proj/src/foo.common.js")],
    };
    assert_eq!(failure_line(&outcome), None);
}

#[test]
fn failed_file_recovers_on_a_later_build() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/a.ts", "export const a = ;");
    let transpiler = FakeTranspiler::new().fail_on("a.ts");
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), transpiler.clone());

    assert_eq!(generator.initial_build().failed().count(), 1);

    transpiler.heal("a.ts");
    fs.add_file("/proj/src/a.ts", "export const a = 1;");
    let report = generator.incremental_build(["/proj/src/a.ts"]);

    assert_eq!(report.failed().count(), 0);
    assert!(fs.contents("/proj/src/a.umd.js").is_some());
}

#[test]
fn write_failure_is_reported_with_partial_outputs() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/foo.ts", "export const x = 1;");
    fs.deny_writes("/proj/src/foo.umd.js");
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), FakeTranspiler::new());

    let report = generator.initial_build();

    match &report.outcomes[0] {
        FileOutcome::Failed { written, message, .. } => {
            assert_eq!(written, &vec![PathBuf::from("/proj/src/foo.common.js")]);
            assert!(message.contains("Permission denied"));
        }
        other => panic!("expected write failure, got {:?}", other),
    }
    assert_eq!(report.written_outputs().len(), 1);
}

#[test]
fn missing_changed_file_is_a_logged_failure() {
    let fs = MockFileSystem::new();
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), FakeTranspiler::new());

    let report = generator.incremental_build(["/proj/src/gone.ts"]);

    assert_eq!(report.failed().count(), 1);
    match &report.outcomes[0] {
        FileOutcome::Failed { message, .. } => assert!(message.contains("File not found")),
        other => panic!("expected read failure, got {:?}", other),
    }
}

#[test]
fn incremental_build_ignores_unmatched_and_duplicate_paths() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/foo.ts", "export const x = 1;");
    fs.add_file("/proj/README.md", "# readme");
    let transpiler = FakeTranspiler::new();
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), transpiler.clone());

    let report = generator.incremental_build([
        "/proj/README.md",
        "/proj/src/foo.ts",
        "/proj/src/foo.ts",
        "/proj/src/foo.common.js",
    ]);

    assert_eq!(report.kind, BuildKind::Incremental);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.unmatched, 2);
    assert_eq!(transpiler.recorded().len(), 2);
    assert!(fs.contents("/proj/README.common.js").is_none());
}

#[test]
fn differently_spelled_paths_to_one_file_build_once() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/foo.ts", "export const x = 1;");
    let transpiler = FakeTranspiler::new();
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), transpiler.clone());

    let report = generator.incremental_build(["src/foo.ts", "/proj/src/foo.ts", "/proj/src/./foo.ts"]);

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.unmatched, 0);
    assert_eq!(transpiler.recorded().len(), 2);
}

#[test]
fn hidden_files_are_not_sources() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/foo.ts", "export const x = 1;");
    fs.add_file("/proj/src/.hidden.ts", "export const h = 1;");
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), FakeTranspiler::new());

    let initial = generator.initial_build();
    assert_eq!(initial.outcomes.len(), 1);
    assert!(fs.contents("/proj/src/.hidden.common.js").is_none());

    let report = generator.incremental_build(["/proj/src/.hidden.ts"]);
    assert_eq!(report.unmatched, 1);
}

#[test]
fn first_matching_rule_decides_formats() {
    let cfg = ConfigFileBuilder::new()
        .with_rule(RuleConfigBuilder::new("src/*.ts").into_format("amd").build())
        .with_rule(
            RuleConfigBuilder::new("src/**/*.ts")
                .into_formats(&["commonjs", "systemjs"])
                .build(),
        )
        .build();

    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/top.ts", "export {};");
    fs.add_file("/proj/src/deep/inner.ts", "export {};");
    let generator = fake_generator("/proj", &cfg, Arc::new(fs.clone()), FakeTranspiler::new());

    generator.initial_build();

    assert!(fs.contents("/proj/src/top.amd.js").is_some());
    assert!(fs.contents("/proj/src/top.common.js").is_none());
    assert!(fs.contents("/proj/src/top.system.js").is_none());

    assert!(fs.contents("/proj/src/deep/inner.common.js").is_some());
    assert!(fs.contents("/proj/src/deep/inner.system.js").is_some());
    assert!(fs.contents("/proj/src/deep/inner.amd.js").is_none());
}

#[test]
fn relative_changed_paths_are_read_from_the_root() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/foo.ts", "export const x = 1;");
    let generator = fake_generator("/proj", &ts_config(), Arc::new(fs.clone()), FakeTranspiler::new());

    let report = generator.incremental_build(["src/foo.ts"]);

    assert_eq!(report.failed().count(), 0);
    assert!(fs.contents("/proj/src/foo.common.js").is_some());
}

#[test]
fn output_path_uses_stem_and_format_extension() -> TestResult {
    assert_eq!(
        output_path(&PathBuf::from("src/foo.ts"), ModuleFormat::CommonJs)?,
        PathBuf::from("src/foo.common.js")
    );
    assert_eq!(
        output_path(&PathBuf::from("src/types.d.ts"), ModuleFormat::SystemJs)?,
        PathBuf::from("src/types.d.system.js")
    );
    assert_eq!(
        output_path(&PathBuf::from("index.js"), ModuleFormat::Amd)?,
        PathBuf::from("index.amd.js")
    );
    Ok(())
}

#[test]
fn mock_fs_reads_back_what_the_generator_wrote() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/foo.ts", "export const x = 1;");
    let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());
    let generator = fake_generator("/proj", &ts_config(), Arc::clone(&shared), FakeTranspiler::new());

    generator.initial_build();

    let via_trait = shared.read_to_string(&PathBuf::from("/proj/src/foo.umd.js"))?;
    assert_eq!(Some(via_trait), fs.contents("/proj/src/foo.umd.js"));
    Ok(())
}
