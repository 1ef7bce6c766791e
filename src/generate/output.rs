// src/generate/output.rs

//! Output naming and the auto-generated banner.

use std::path::{Path, PathBuf};

use anyhow::anyhow;

use crate::errors::{ModgenError, Result};
use crate::types::ModuleFormat;

/// Header written at the top of every generated file.
pub const BANNER: &str = "/**
 * This file is auto-generated by GenerateModulesWebpackPlugin.
 * Check this file into source control.
 * Do not edit this file.
 */
";

/// Footer written after the transformed code.
pub const FOOTER: &str = "\n/* End of auto-generated content. */\n";

/// Wrap transformed code in [`BANNER`] and [`FOOTER`].
pub fn wrap_generated(code: &str) -> String {
    let mut out = String::with_capacity(BANNER.len() + code.len() + FOOTER.len());
    out.push_str(BANNER);
    out.push_str(code);
    out.push_str(FOOTER);
    out
}

/// `<dir>/<stem><ext>`: the sibling file a source is generated into.
///
/// The stem drops only the last extension, so `foo.d.ts` becomes
/// `foo.d.common.js`.
pub fn output_path(source: &Path, format: ModuleFormat) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ModgenError::Other(anyhow!("source path {:?} has no file name", source)))?;

    let file_name = format!("{stem}{}", format.ext());
    Ok(match source.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(file_name),
        _ => PathBuf::from(file_name),
    })
}
