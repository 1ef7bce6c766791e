// src/rules/path_utils.rs

//! String-level path handling shared by discovery and change matching.
//!
//! Everything here works on `/`-separated strings rather than `Path`, so a
//! Windows-style path reported by the watcher (`C:\proj\src\foo.ts`) is
//! handled the same way on every host platform.

use std::path::Path;

/// Replace every `\` with `/`.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// True for `/`-rooted paths and drive-rooted paths like `C:/x` or `C:`.
///
/// Expects separators to be normalized already.
pub fn is_absolute_str(path: &str) -> bool {
    if path.starts_with('/') {
        return true;
    }
    is_drive_prefix(path.split('/').next().unwrap_or(""))
}

fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Lexically clean a normalized path: drop `.` and empty segments and fold
/// `..` into its parent where there is one.
pub fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut out: Vec<&str> = Vec::new();

    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => match out.last() {
                Some(last) if *last != ".." && !is_drive_prefix(last) => {
                    out.pop();
                }
                // `..` above a root stays at the root.
                Some(last) if is_drive_prefix(last) => {}
                _ if rooted => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }

    let joined = out.join("/");
    if rooted {
        format!("/{joined}")
    } else {
        joined
    }
}

/// The project root as a normalized string without a trailing `/`
/// (except for the filesystem root itself).
pub fn root_str(root: &Path) -> String {
    clean(&normalize_separators(&root.to_string_lossy()))
}

/// Join a relative path onto `base`.
fn join_str(base: &str, rel: &str) -> String {
    if base.is_empty() {
        rel.to_string()
    } else if base.ends_with('/') {
        format!("{base}{rel}")
    } else {
        format!("{base}/{rel}")
    }
}

/// Resolve a glob pattern against the project root, producing a normalized
/// pattern that can be matched against resolved changed paths.
///
/// The root is escaped, so only the pattern itself carries glob syntax.
/// Absolute patterns are kept as they are (apart from separator cleanup).
pub fn resolve_pattern(root: &Path, pattern: &str) -> String {
    let normalized = normalize_separators(pattern);
    if is_absolute_str(&normalized) {
        clean(&normalized)
    } else {
        clean(&join_str(&escape_literal(&root_str(root)), &normalized))
    }
}

/// Escape every glob metacharacter in `s` (braces included) so it matches
/// only itself.
pub fn escape_literal(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '?' | '*' | '[' | ']' | '{' | '}' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            c => escaped.push(c),
        }
    }
    escaped
}

/// Resolve a path reported by the watcher (absolute or relative to the
/// project root) into the same normalized form as [`resolve_pattern`].
pub fn resolve_changed_path(root: &Path, path: &Path) -> String {
    resolve_str(root, &normalize_separators(&path.to_string_lossy()))
}

/// Resolve a literal (non-glob) path string against the project root.
pub fn resolve_str(root: &Path, normalized: &str) -> String {
    if is_absolute_str(normalized) {
        clean(normalized)
    } else {
        clean(&join_str(&root_str(root), normalized))
    }
}

/// True for a `.`-prefixed name such as `.git` or `.hidden.ts`.
pub fn is_hidden_segment(segment: &str) -> bool {
    segment.starts_with('.') && segment != "." && segment != ".."
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if `path` is not below `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(normalize_separators(&rel.to_string_lossy()))
}

/// Last `/`-separated segment of a normalized path.
pub fn file_name_str(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Literal directory prefix of a glob pattern: every leading segment that
/// contains no glob syntax, excluding the final (file name) segment.
///
/// `src/**/*.ts` -> `src`, `src/foo.ts` -> `src`, `*.ts` -> ``.
pub fn glob_base(pattern: &str) -> String {
    let normalized = normalize_separators(pattern);
    let segments: Vec<&str> = normalized.split('/').collect();
    let dirs = &segments[..segments.len().saturating_sub(1)];

    let literal: Vec<&str> = dirs
        .iter()
        .take_while(|seg| !has_glob_syntax(seg))
        .copied()
        .collect();

    let base = literal.join("/");
    if normalized.starts_with('/') && base.is_empty() {
        "/".to_string()
    } else {
        base
    }
}

fn has_glob_syntax(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}
