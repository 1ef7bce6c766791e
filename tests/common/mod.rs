#![allow(dead_code)]

pub use modgen_test_utils::{init_tracing, with_timeout};

/// Body of a file generated by the fake transpiler, banner and footer
/// included.
pub fn fake_output(format: &str, source: &str) -> String {
    modgen::generate::wrap_generated(&format!("// {format}\n{source}"))
}
