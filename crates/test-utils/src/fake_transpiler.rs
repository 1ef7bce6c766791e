use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use modgen::errors::{ModgenError, Result};
use modgen::transpile::Transpiler;
use modgen::types::ModuleFormat;

/// A fake transpiler that:
/// - records every (file name, format) it was asked for
/// - returns `// <format>\n<source>` so outputs are predictable
/// - fails for file names registered with [`FakeTranspiler::fail_on`]
/// - panics for file names registered with [`FakeTranspiler::panic_on`].
#[derive(Debug, Clone, Default)]
pub struct FakeTranspiler {
    calls: Arc<Mutex<Vec<(String, ModuleFormat)>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    panicking: Arc<Mutex<HashSet<String>>>,
}

impl FakeTranspiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every transpile of `file_name` fail with a syntax-like error.
    pub fn fail_on(self, file_name: &str) -> Self {
        self.failing.lock().unwrap().insert(file_name.to_string());
        self
    }

    /// Make every transpile of `file_name` panic, like a crashing engine.
    pub fn panic_on(self, file_name: &str) -> Self {
        self.panicking.lock().unwrap().insert(file_name.to_string());
        self
    }

    /// Stop failing for `file_name` (e.g. after the "user fixed it").
    pub fn heal(&self, file_name: &str) {
        self.failing.lock().unwrap().remove(file_name);
    }

    pub fn recorded(&self) -> Vec<(String, ModuleFormat)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transpiler for FakeTranspiler {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn transpile(&self, source: &str, file_name: &str, format: ModuleFormat) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((file_name.to_string(), format));

        if self.panicking.lock().unwrap().contains(file_name) {
            panic!("fake transpiler crashed on {file_name}");
        }

        if self.failing.lock().unwrap().contains(file_name) {
            return Err(ModgenError::Transform {
                file: file_name.into(),
                message: format!("Unexpected token in {file_name}"),
            });
        }

        Ok(format!("// {format}\n{source}"))
    }
}
