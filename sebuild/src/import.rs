//! Recursive `@import` / `@skip` expansion.
//!
//! Directive lines (leading whitespace allowed):
//!
//! | Line              | Effect                                                  |
//! |-------------------|---------------------------------------------------------|
//! | `@import a.b`     | inline `<root>/a/b.cs` once per build, between markers  |
//! | `@skip a.b`       | mark `a.b` as imported without including anything       |
//! | anything else     | `@tag` substitution, see [`crate::scan`]                |
//!
//! The set of imported names is shared by the whole build, so a unit is
//! included at most once no matter how many files import it.  This also
//! bounds the recursion: a name is never descended into twice.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, trace};

use crate::config::BuildOptions;
use crate::error::{BuildError, Result};
use crate::scan::{normalize_newlines, LineScanner};
use crate::typedefs::TypeTable;

static IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@import (.*)\s*$").expect("valid import pattern"));
static SKIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@skip (.*)\s*$").expect("valid skip pattern"));

/// Marker line written before an imported unit.
pub fn begin_marker(name: &str) -> String {
    format!("// >>>> >>>> import {name} ---- ----")
}

/// Marker line written after an imported unit.
pub fn end_marker(name: &str) -> String {
    format!("// <<<< <<<< import {name} ---- ----")
}

/// A recognised directive line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    Import(&'a str),
    Skip(&'a str),
}

impl<'a> Directive<'a> {
    /// Recognise `line` as a directive, trimming the name.
    pub fn parse(line: &'a str) -> Option<Self> {
        if let Some(caps) = IMPORT_RE.captures(line) {
            return caps.get(1).map(|m| Directive::Import(m.as_str().trim()));
        }
        SKIP_RE
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| Directive::Skip(m.as_str().trim()))
    }
}

/// Names already included (or skipped) during one build.
#[derive(Debug, Default, Clone)]
pub struct ImportSet {
    names: HashSet<String>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`.  Returns `true` if it was not seen before.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_owned())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Per-build expansion state: the import set and the carried block-comment
/// flag, shared by every file the build touches.
#[derive(Debug)]
pub struct Resolver<'a> {
    root: &'a Path,
    options: &'a BuildOptions,
    scanner: LineScanner<'a>,
    imported: ImportSet,
}

impl<'a> Resolver<'a> {
    pub fn new(root: &'a Path, options: &'a BuildOptions, types: &'a TypeTable) -> Self {
        Self {
            root,
            options,
            scanner: LineScanner::new(types),
            imported: ImportSet::new(),
        }
    }

    pub fn imported(&self) -> &ImportSet {
        &self.imported
    }

    /// `true` if the text produced so far ended inside a block comment.
    pub fn in_block_comment(&self) -> bool {
        self.scanner.in_block_comment()
    }

    /// Resolve an import name against the root and expand that file.
    ///
    /// The name is not checked against (or added to) the import set; that
    /// is the job of the `@import` directive.
    pub fn resolve(&mut self, name: &str) -> Result<String> {
        let path = self.options.import_path(self.root, name);
        if !path.is_file() {
            return Err(BuildError::ImportNotFound { name: name.to_owned(), expected: path });
        }
        self.expand_file(&path)
    }

    /// Expand one script file, following its directives.
    pub fn expand_file(&mut self, path: &Path) -> Result<String> {
        let contents = std::fs::read_to_string(path).map_err(|source| BuildError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(file = %path.display(), "contents read, processing");
        self.expand_text(&contents, path)
    }

    /// Expand script text.  `origin` names the text in errors and logs.
    pub fn expand_text(&mut self, contents: &str, origin: &Path) -> Result<String> {
        let contents = normalize_newlines(contents);
        let mut out = String::with_capacity(contents.len());

        for (i, line) in contents.lines().enumerate() {
            match Directive::parse(line) {
                Some(Directive::Import(name)) => {
                    if !self.imported.insert(name) {
                        debug!(import = name, "already imported");
                        continue;
                    }
                    info!(import = name, from = %origin.display(), "importing");
                    let unit = self.resolve(name)?;
                    out.push_str(&begin_marker(name));
                    out.push('\n');
                    out.push_str(&unit);
                    out.push_str(&end_marker(name));
                    out.push_str("\n\n");
                }
                Some(Directive::Skip(name)) => {
                    debug!(import = name, "skipped");
                    self.imported.insert(name);
                }
                None if line.is_empty() => out.push('\n'),
                None => {
                    trace!(file = %origin.display(), line = i + 1, "{line}");
                    let expanded = self.scanner.scan(line).map_err(|e| BuildError::UnknownTag {
                        name: e.0,
                        file: origin.to_path_buf(),
                        line: i + 1,
                    })?;
                    out.push_str(&expanded);
                    out.push('\n');
                }
            }
        }

        Ok(out)
    }
}

/// Expand the import `name` under `root` with a fresh import set.
pub fn resolve(
    root: &Path,
    name: &str,
    options: &BuildOptions,
    types: &TypeTable,
) -> Result<String> {
    Resolver::new(root, options, types).resolve(name)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
