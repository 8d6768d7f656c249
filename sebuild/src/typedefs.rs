//! Type definition table.
//!
//! Maps `@tag` names to the text they expand to.  The table is read once per
//! build from the definitions file, one entry per line:
//!
//! ```text
//! Regex System.Text.RegularExpressions.Regex
//! @Vec  VRageMath.Vector3D
//! ```
//!
//! The line is split on its first space.  A leading `@` on the name is
//! optional, so `@Vec` and `Vec` define the same tag.  Names are
//! case-sensitive and a repeated name overwrites the earlier entry.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{BuildError, Result};
use crate::scan::normalize_newlines;

/// Tag name → replacement text.
#[derive(Debug, Default, Clone)]
pub struct TypeTable {
    defs: HashMap<String, String>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse the definitions file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(BuildError::MissingResource { path: path.to_path_buf() });
        }
        let text = std::fs::read_to_string(path).map_err(|source| BuildError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&text, path)?;

        info!(path = %path.display(), count = table.len(), "loaded type definitions");
        for (name, replacement) in table.iter() {
            debug!("  @{name}:  {replacement}");
        }
        Ok(table)
    }

    /// Parse definitions text.  `origin` is only used in error reports.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let mut table = Self::new();
        let text = normalize_newlines(text);

        for (i, raw) in text.lines().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            let malformed = || BuildError::MalformedDefinition {
                path: origin.to_path_buf(),
                line: i + 1,
                text: raw.to_owned(),
            };

            let (name, replacement) = raw.split_once(' ').ok_or_else(malformed)?;
            let name = name.strip_prefix('@').unwrap_or(name);
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(malformed());
            }
            table.insert(name, replacement.trim_end());
        }

        Ok(table)
    }

    /// Set (or overwrite) a definition.
    pub fn insert(&mut self, name: impl Into<String>, replacement: impl Into<String>) {
        self.defs.insert(name.into(), replacement.into());
    }

    /// Replacement text for `name` (without the leading `@`).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.defs.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    /// Iterate over all definitions, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut entries: Vec<_> = self
            .defs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable();
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TypeTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<TypeTable> {
        TypeTable::parse(text, Path::new("defs.cs"))
    }

    #[test]
    fn parse_entries() {
        let t = parse("Regex System.Text.RegularExpressions.Regex\nVec VRageMath.Vector3D\n").unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("Regex"), Some("System.Text.RegularExpressions.Regex"));
        assert_eq!(t.get("Vec"), Some("VRageMath.Vector3D"));
    }

    #[test]
    fn at_prefix_is_optional() {
        let t = parse("@Vec VRageMath.Vector3D").unwrap();
        assert_eq!(t.get("Vec"), Some("VRageMath.Vector3D"));
        assert!(!t.contains("@Vec"));
    }

    #[test]
    fn splits_on_first_space_only() {
        let t = parse("Pair Dictionary<string, int>").unwrap();
        assert_eq!(t.get("Pair"), Some("Dictionary<string, int>"));
    }

    #[test]
    fn last_write_wins() {
        let t = parse("X old\nX new").unwrap();
        assert_eq!(t.get("X"), Some("new"));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let t = parse("foo a\nFOO b").unwrap();
        assert_eq!(t.get("foo"), Some("a"));
        assert_eq!(t.get("FOO"), Some("b"));
    }

    #[test]
    fn crlf_and_blank_lines() {
        let t = parse("A 1\r\n\r\n   \r\nB 2\r\n").unwrap();
        assert_eq!(t.get("A"), Some("1"));
        assert_eq!(t.get("B"), Some("2"));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn bare_cr_separates_entries() {
        let t = parse("A 1\rB 2\r").unwrap();
        assert_eq!(t.get("A"), Some("1"));
        assert_eq!(t.get("B"), Some("2"));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn line_without_space_is_malformed() {
        let err = parse("A 1\nBROKEN\n").unwrap_err();
        match err {
            BuildError::MalformedDefinition { line, text, .. } => {
                assert_eq!(line, 2);
                assert_eq!(text, "BROKEN");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_name_is_malformed() {
        assert!(matches!(
            parse(" leading").unwrap_err(),
            BuildError::MalformedDefinition { line: 1, .. }
        ));
        assert!(matches!(
            parse("@ bare").unwrap_err(),
            BuildError::MalformedDefinition { line: 1, .. }
        ));
    }

    #[test]
    fn name_with_tab_is_malformed() {
        assert!(matches!(
            parse("A\tB C").unwrap_err(),
            BuildError::MalformedDefinition { .. }
        ));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.cs");
        assert!(matches!(
            TypeTable::load(&path).unwrap_err(),
            BuildError::MissingResource { path: p } if p == path
        ));
    }

    #[test]
    fn load_from_disk() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut f, b"FOO 123\n").unwrap();
        let t = TypeTable::load(f.path()).unwrap();
        assert_eq!(t.get("FOO"), Some("123"));
    }

    #[test]
    fn iter_is_sorted() {
        let t: TypeTable = [("b", "2"), ("a", "1")].into_iter().collect();
        let names: Vec<_> = t.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
