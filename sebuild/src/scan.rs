//! `@tag` substitution over one line of script text.
//!
//! A single left-to-right pass decides, for every character, whether it is
//! *live* code or *inert* text inside a string literal, a regex literal, a
//! `//` line comment or a `/* … */` block comment.  Only live `@name`
//! sequences are looked up in the [`TypeTable`] and replaced.
//!
//! | Input                          | Output (with `FOO = 123`)        |
//! |--------------------------------|----------------------------------|
//! | `let x = @FOO;`                | `let x = 123;`                   |
//! | `let s = "@FOO";`              | unchanged                        |
//! | `x(); // @FOO`                 | unchanged                        |
//! | `/* @FOO` … `*/ @FOO`          | only the second one is replaced  |
//! | `@"\d+"`                       | unchanged, backslash not an escape |
//! | `a @ b`                        | unchanged, a bare `@` stays      |
//!
//! A quote that directly follows a tag (most commonly a bare `@`, as in a
//! verbatim `@"..."` literal) opens a *regex literal*: inside it a backslash
//! does not escape the next character, so `@"\"` is a complete literal.
//!
//! Block comments can span lines.  The "inside block comment" flag is the
//! only state carried from one line to the next; [`LineScanner`] owns it, and
//! [`scan_line`] threads it explicitly.

use std::borrow::Cow;

use crate::typedefs::TypeTable;

/// A live tag with no entry in the type table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type definition \"@{0}\"")]
pub struct UnknownTag(pub String);

/// Scan one line with an explicit carried block-comment flag.
///
/// Returns the expanded line and the flag to pass in with the next line.
pub fn scan_line(
    line: &str,
    in_block_comment: bool,
    types: &TypeTable,
) -> Result<(String, bool), UnknownTag> {
    let mut scanner = LineScanner::with_block_comment(types, in_block_comment);
    let out = scanner.scan(line)?;
    Ok((out, scanner.in_block_comment()))
}

/// Line-at-a-time tag expander that remembers open block comments.
#[derive(Debug, Clone)]
pub struct LineScanner<'a> {
    types: &'a TypeTable,
    in_block_comment: bool,
}

/// Per-line automaton state.  Everything here resets at the start of a line.
#[derive(Debug, Default)]
struct ScanState {
    in_literal: bool,
    regex_literal: bool,
    /// The previous character was an unescaped `\` inside a string literal.
    escape_pending: bool,
    /// A lone `/` was just seen in live text.
    pending_slash: bool,
    /// Inside a block comment, the previous character was `*`.
    last_star: bool,
    line_comment: bool,
    in_tag: bool,
    /// Tag name accumulated so far, without the `@`.
    tag: String,
}

impl<'a> LineScanner<'a> {
    pub fn new(types: &'a TypeTable) -> Self {
        Self::with_block_comment(types, false)
    }

    pub fn with_block_comment(types: &'a TypeTable, in_block_comment: bool) -> Self {
        Self { types, in_block_comment }
    }

    /// `true` if the last scanned line ended inside a `/* … */` comment.
    pub fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }

    /// Expand every live `@tag` in `line`.
    ///
    /// After an error the carried block-comment flag is unspecified.
    pub fn scan(&mut self, line: &str) -> Result<String, UnknownTag> {
        let mut st = ScanState::default();
        let mut out = String::with_capacity(line.len());

        for c in line.chars() {
            let mut after_tag = false;
            if st.in_tag {
                if is_tag_char(c) {
                    st.tag.push(c);
                    continue;
                }
                st.in_tag = false;
                after_tag = true;
                self.flush_tag(&mut st.tag, &mut out)?;
            }

            self.step(&mut st, c, after_tag);

            if c == '@' && self.is_live(&st) {
                st.in_tag = true;
            } else {
                out.push(c);
            }
        }

        if st.in_tag {
            self.flush_tag(&mut st.tag, &mut out)?;
        }
        Ok(out)
    }

    fn is_live(&self, st: &ScanState) -> bool {
        !(st.in_literal || st.line_comment || self.in_block_comment)
    }

    /// Advance the literal/comment state by one character.
    fn step(&mut self, st: &mut ScanState, c: char, after_tag: bool) {
        if st.line_comment {
            return;
        }

        if self.in_block_comment {
            match c {
                '/' if st.last_star => {
                    self.in_block_comment = false;
                    st.last_star = false;
                }
                '*' => st.last_star = true,
                _ => st.last_star = false,
            }
            return;
        }

        if st.in_literal {
            let escaped = std::mem::take(&mut st.escape_pending);
            match c {
                '"' if !escaped => {
                    st.in_literal = false;
                    st.regex_literal = false;
                }
                '\\' if !escaped && !st.regex_literal => st.escape_pending = true,
                _ => {}
            }
            return;
        }

        match c {
            '"' => {
                st.in_literal = true;
                st.regex_literal = after_tag;
                st.pending_slash = false;
            }
            '/' if st.pending_slash => {
                st.line_comment = true;
                st.pending_slash = false;
            }
            '/' => st.pending_slash = true,
            '*' if st.pending_slash => {
                self.in_block_comment = true;
                st.pending_slash = false;
                st.last_star = false;
            }
            _ => st.pending_slash = false,
        }
    }

    /// Emit the tag collected in `tag`: a bare `@` stays as is, a name is
    /// replaced by its definition.
    fn flush_tag(&self, tag: &mut String, out: &mut String) -> Result<(), UnknownTag> {
        if tag.is_empty() {
            out.push('@');
            return Ok(());
        }
        let name = std::mem::take(tag);
        match self.types.get(&name) {
            Some(replacement) => {
                out.push_str(replacement);
                Ok(())
            }
            None => Err(UnknownTag(name)),
        }
    }
}

/// Rewrite `\r\n` and bare `\r` line endings as `\n`, so that
/// `str::lines` sees every line and no `\r` survives in a line.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ── Tests ─────────────────────────────────────────────────────────────────────
