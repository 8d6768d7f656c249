//! Build configuration.
//!
//! Two settings are configurable; everything else about a build is fixed:
//!
//! | Setting       | Default                  | Env override   | CLI flag |
//! |---------------|--------------------------|----------------|----------|
//! | definitions   | `lib/__type_defs__.cs`   | `SEBUILD_DEFS` | `--defs` |
//! | extension     | `cs`                     | `SEBUILD_EXT`  | `--ext`  |
//!
//! The definitions path is relative to the build root.

use std::path::{Path, PathBuf};

pub const DEFAULT_DEFINITIONS: &str = "lib/__type_defs__.cs";
pub const DEFAULT_EXTENSION: &str = "cs";

pub const DEFS_ENV: &str = "SEBUILD_DEFS";
pub const EXT_ENV: &str = "SEBUILD_EXT";

/// Settings shared by every file of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Type definition file, relative to the root.
    pub definitions: PathBuf,
    /// Script file extension, without the leading dot.
    pub extension: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            definitions: PathBuf::from(DEFAULT_DEFINITIONS),
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }
}

impl BuildOptions {
    /// Determine the options for a run.
    ///
    /// Priority: CLI value → environment variable → built-in default.
    pub fn resolve(defs: Option<&Path>, ext: Option<&str>) -> Self {
        Self::resolve_with(defs, ext, |key| std::env::var(key).ok())
    }

    /// As [`resolve`](Self::resolve), with an injectable environment lookup.
    pub fn resolve_with(
        defs: Option<&Path>,
        ext: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut opts = Self::default();

        if let Some(d) = defs.map(Path::to_path_buf).or_else(|| env(DEFS_ENV).map(PathBuf::from)) {
            opts.definitions = d;
        }
        if let Some(e) = ext.map(str::to_owned).or_else(|| env(EXT_ENV)) {
            opts = opts.with_extension(&e);
        }
        opts
    }

    /// Set the script extension; a leading `.` is dropped.
    pub fn with_extension(mut self, ext: &str) -> Self {
        self.extension = ext.trim_start_matches('.').to_owned();
        self
    }

    /// `true` if the file name of `path` ends with `.<extension>`.
    pub fn is_script(&self, path: &Path) -> bool {
        let suffix = format!(".{}", self.extension);
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(&suffix))
    }

    /// Path of the definitions file under `root`.
    pub fn definitions_path(&self, root: &Path) -> PathBuf {
        root.join(&self.definitions)
    }

    /// Path an import name refers to: `lib.gyro` → `<root>/lib/gyro.cs`.
    pub fn import_path(&self, root: &Path, name: &str) -> PathBuf {
        let mut path = root.to_path_buf();
        let mut segments = name.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_some() {
                path.push(seg);
            } else {
                path.push(format!("{seg}.{}", self.extension));
            }
        }
        path
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
