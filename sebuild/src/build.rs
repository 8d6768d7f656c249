//! Top-level build: validate the inputs, load the type table and flatten the
//! entry script with a fresh import set.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::BuildOptions;
use crate::error::{BuildError, Result};
use crate::import::Resolver;
use crate::typedefs::TypeTable;

/// Builds entry scripts under one set of [`BuildOptions`].
#[derive(Debug, Default, Clone)]
pub struct ScriptBuilder {
    options: BuildOptions,
}

impl ScriptBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Flatten `entry` against `root`.
    ///
    /// `entry` is read as given (it need not live under `root`); imports are
    /// always resolved relative to `root`.  The type table is loaded before
    /// any script is read.
    pub fn build(&self, root: &Path, entry: &Path) -> Result<String> {
        if !root.is_dir() {
            return Err(BuildError::InvalidRoot { path: root.to_path_buf() });
        }
        if !self.options.is_script(entry) {
            return Err(BuildError::InvalidFileKind {
                path: entry.to_path_buf(),
                expected: self.options.extension.clone(),
            });
        }

        let types = TypeTable::load(&self.options.definitions_path(root))?;

        info!(root = %root.display(), entry = %entry.display(), "building script");
        let mut resolver = Resolver::new(root, &self.options, &types);
        let script = resolver.expand_file(entry)?;
        info!(imports = resolver.imported().len(), bytes = script.len(), "script built");
        Ok(script)
    }
}

/// Flatten `entry` against `root` with the default options.
pub fn build(root: impl Into<PathBuf>, entry: impl Into<PathBuf>) -> Result<String> {
    ScriptBuilder::default().build(&root.into(), &entry.into())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tree(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (rel, contents) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
        dir
    }

    #[test]
    fn builds_entry_with_imports() {
        let dir = tree(&[
            ("lib/__type_defs__.cs", "FOO 123\n"),
            ("other.cs", "x()\n"),
            ("main.cs", "@import other\ndone(@FOO)\n"),
        ]);
        let out = build(dir.path(), dir.path().join("main.cs")).unwrap();
        assert_eq!(
            out,
            "// >>>> >>>> import other ---- ----\nx()\n// <<<< <<<< import other ---- ----\n\ndone(123)\n"
        );
    }

    #[test]
    fn invalid_root() {
        let dir = tree(&[]);
        let root = dir.path().join("absent");
        assert!(matches!(
            build(&root, root.join("main.cs")).unwrap_err(),
            BuildError::InvalidRoot { path } if path == root
        ));
    }

    #[test]
    fn root_must_be_a_directory() {
        let dir = tree(&[("file.cs", "")]);
        let root = dir.path().join("file.cs");
        assert!(matches!(
            build(&root, &root).unwrap_err(),
            BuildError::InvalidRoot { .. }
        ));
    }

    #[test]
    fn wrong_extension() {
        let dir = tree(&[("lib/__type_defs__.cs", ""), ("main.txt", "")]);
        assert!(matches!(
            build(dir.path(), dir.path().join("main.txt")).unwrap_err(),
            BuildError::InvalidFileKind { expected, .. } if expected == "cs"
        ));
    }

    #[test]
    fn missing_definitions_checked_before_entry() {
        // the entry file does not exist either; the definitions error wins
        let dir = tree(&[]);
        assert!(matches!(
            build(dir.path(), dir.path().join("main.cs")).unwrap_err(),
            BuildError::MissingResource { .. }
        ));
    }

    #[test]
    fn unreadable_entry() {
        let dir = tree(&[("lib/__type_defs__.cs", "")]);
        assert!(matches!(
            build(dir.path(), dir.path().join("main.cs")).unwrap_err(),
            BuildError::Read { .. }
        ));
    }

    #[test]
    fn builds_are_independent() {
        let dir = tree(&[
            ("lib/__type_defs__.cs", ""),
            ("a.cs", "a()\n"),
            ("main.cs", "@import a\n"),
        ]);
        let builder = ScriptBuilder::default();
        let first = builder.build(dir.path(), &dir.path().join("main.cs")).unwrap();
        let second = builder.build(dir.path(), &dir.path().join("main.cs")).unwrap();
        assert_eq!(first, second);
        assert!(second.contains("a()"));
    }

    #[test]
    fn custom_options() {
        let dir = tree(&[
            ("types.txt", "@T int\n"),
            ("lib/u.csx", "@T u;\n"),
            ("main.csx", "@import lib.u\n"),
        ]);
        let opts = BuildOptions {
            definitions: PathBuf::from("types.txt"),
            ..BuildOptions::default()
        }
        .with_extension(".csx");
        let out = ScriptBuilder::new(opts)
            .build(dir.path(), &dir.path().join("main.csx"))
            .unwrap();
        assert!(out.contains("int u;\n"));
    }
}
