// src/transpile/mod.rs

//! Transpile engine abstraction.
//!
//! The generator talks to a `Transpiler` instead of calling SWC directly.
//! Production code uses [`SwcTranspiler`]; tests plug in a fake that records
//! calls and can be told to fail for particular files.

pub mod swc;

use std::path::Path;

use crate::errors::Result;
use crate::types::ModuleFormat;

pub use self::swc::SwcTranspiler;

/// Source dialect, picked from the file extension.
///
/// TypeScript sources get their types stripped before the module transform
/// runs; everything else is parsed as ECMAScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSyntax {
    Ecmascript { jsx: bool },
    Typescript { tsx: bool },
}

impl SourceSyntax {
    pub fn from_file_name(file_name: &str) -> Self {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "ts" | "mts" | "cts" => SourceSyntax::Typescript { tsx: false },
            "tsx" => SourceSyntax::Typescript { tsx: true },
            "jsx" => SourceSyntax::Ecmascript { jsx: true },
            _ => SourceSyntax::Ecmascript { jsx: false },
        }
    }
}

/// Converts ES module source text into another module format.
pub trait Transpiler: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Transpile `source` into `format`.
    ///
    /// `file_name` is the source's base name; it selects the syntax and is
    /// used in diagnostics. Errors are returned as
    /// [`ModgenError::Transform`](crate::errors::ModgenError::Transform).
    fn transpile(&self, source: &str, file_name: &str, format: ModuleFormat) -> Result<String>;
}
