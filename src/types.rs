use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Module format a source file can be transpiled into.
///
/// The declaration order is the order in which formats are generated for a
/// file, regardless of the order they are listed in a rule's `into`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleFormat {
    CommonJs,
    Umd,
    Amd,
    SystemJs,
}

/// Transform + output extension for one module format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub format: ModuleFormat,
    /// Name of the module transform in the transpiler's configuration.
    pub transform: &'static str,
    /// Extension appended to the source file stem.
    pub ext: &'static str,
}

/// The fixed format table, in generation order.
pub const FORMAT_SPECS: [FormatSpec; 4] = [
    FormatSpec {
        format: ModuleFormat::CommonJs,
        transform: "commonjs",
        ext: ".common.js",
    },
    FormatSpec {
        format: ModuleFormat::Umd,
        transform: "umd",
        ext: ".umd.js",
    },
    FormatSpec {
        format: ModuleFormat::Amd,
        transform: "amd",
        ext: ".amd.js",
    },
    FormatSpec {
        format: ModuleFormat::SystemJs,
        transform: "systemjs",
        ext: ".system.js",
    },
];

impl ModuleFormat {
    pub const ALL: [ModuleFormat; 4] = [
        ModuleFormat::CommonJs,
        ModuleFormat::Umd,
        ModuleFormat::Amd,
        ModuleFormat::SystemJs,
    ];

    pub fn spec(self) -> &'static FormatSpec {
        // The table is indexed by declaration order.
        &FORMAT_SPECS[self as usize]
    }

    /// Name used in config files (`into = ["commonjs"]`).
    pub fn name(self) -> &'static str {
        match self {
            ModuleFormat::CommonJs => "commonjs",
            ModuleFormat::Umd => "umd",
            ModuleFormat::Amd => "amd",
            ModuleFormat::SystemJs => "systemjs",
        }
    }

    pub fn ext(self) -> &'static str {
        self.spec().ext
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModuleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "commonjs" => Ok(ModuleFormat::CommonJs),
            "umd" => Ok(ModuleFormat::Umd),
            "amd" => Ok(ModuleFormat::Amd),
            "systemjs" => Ok(ModuleFormat::SystemJs),
            other => Err(format!(
                "unknown module format: {other} (expected \"commonjs\", \"umd\", \"amd\" or \"systemjs\")"
            )),
        }
    }
}

/// Returns true if `file_name` looks like something this tool generated,
/// i.e. it ends in one of the format extensions.
pub fn is_generated_file_name(file_name: &str) -> bool {
    FORMAT_SPECS
        .iter()
        .any(|spec| file_name.len() > spec.ext.len() && file_name.ends_with(spec.ext))
}

/// A value that may be written either as a single item or as an array.
///
/// Used for `into = "umd"` / `into = ["commonjs", "amd"]` and for a single
/// `[rule]` table versus a `[[rule]]` array. Format names stay as strings so
/// unknown names can be reported (and skipped) during validation instead of
/// failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(s: &str) -> Self {
        OneOrMany::One(s.to_string())
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(v: Vec<&str>) -> Self {
        OneOrMany::Many(v.into_iter().map(str::to_string).collect())
    }
}
