// src/transpile/swc.rs

//! SWC-backed [`Transpiler`].
//!
//! Each call builds a fresh `SourceMap` + `Compiler`, so the transpiler holds
//! no state between files and is `Send + Sync`. Options are assembled as an
//! `.swcrc`-shaped JSON document: the parser settings play the role of the
//! base preset (TypeScript stripping or plain ECMAScript) and `module.type`
//! selects the format-specific transform.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use serde_json::{json, Value};
use swc_core::base::{config::Options, Compiler};
use swc_core::common::{errors::Handler, sync::Lrc, FileName, Globals, SourceMap, GLOBALS};
use tracing::trace;

use super::{SourceSyntax, Transpiler};
use crate::errors::{ModgenError, Result};
use crate::types::ModuleFormat;

/// Output language level. Module syntax is rewritten; everything else is
/// left as written.
const TARGET: &str = "es2022";

#[derive(Debug, Clone, Default)]
pub struct SwcTranspiler {
    _private: (),
}

impl SwcTranspiler {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// The `.swcrc`-style options used for one file and format.
    pub fn options_json(file_name: &str, format: ModuleFormat) -> Value {
        let parser = match SourceSyntax::from_file_name(file_name) {
            SourceSyntax::Typescript { tsx } => json!({ "syntax": "typescript", "tsx": tsx }),
            SourceSyntax::Ecmascript { jsx } => json!({ "syntax": "ecmascript", "jsx": jsx }),
        };

        json!({
            "filename": file_name,
            "swcrc": false,
            "sourceMaps": false,
            "jsc": {
                "parser": parser,
                "target": TARGET,
            },
            "module": {
                "type": format.spec().transform,
            },
        })
    }

    fn options(file_name: &str, format: ModuleFormat) -> Result<Options> {
        serde_json::from_value(Self::options_json(file_name, format))
            .map_err(|e| ModgenError::Other(anyhow!("building swc options for {format}: {e}")))
    }
}

impl Transpiler for SwcTranspiler {
    fn name(&self) -> &'static str {
        "swc"
    }

    fn transpile(&self, source: &str, file_name: &str, format: ModuleFormat) -> Result<String> {
        let options = Self::options(file_name, format)?;

        let cm: Lrc<SourceMap> = Default::default();
        let compiler = Compiler::new(cm.clone());

        // Diagnostics are collected instead of printed so they can be
        // attached to the returned error.
        let diagnostics = DiagnosticBuffer::default();
        let handler = Handler::with_emitter_writer(Box::new(diagnostics.clone()), Some(cm.clone()));

        let fm = cm.new_source_file(
            FileName::Custom(file_name.to_string()).into(),
            source.to_string(),
        );

        let result = GLOBALS.set(&Globals::new(), || {
            compiler.process_js_file(fm, &handler, &options)
        });

        match result {
            Ok(output) => {
                trace!(file = file_name, %format, "swc transform finished");
                Ok(output.code)
            }
            Err(err) => {
                let detail = diagnostics.take();
                let message = if detail.trim().is_empty() {
                    format!("{err:#}")
                } else {
                    format!("{err:#}\n{}", detail.trim_end())
                };
                Err(ModgenError::Transform {
                    file: PathBuf::from(file_name),
                    message,
                })
            }
        }
    }
}

/// Shared in-memory sink for the SWC error emitter.
#[derive(Debug, Clone, Default)]
struct DiagnosticBuffer(Arc<Mutex<Vec<u8>>>);

impl DiagnosticBuffer {
    fn take(&self) -> String {
        match self.0.lock() {
            Ok(mut buf) => String::from_utf8_lossy(&std::mem::take(&mut *buf)).into_owned(),
            Err(_) => String::new(),
        }
    }
}

impl Write for DiagnosticBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("diagnostic buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
