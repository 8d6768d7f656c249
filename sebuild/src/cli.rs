//! Command-line argument parsing.
//!
//! Usage:
//!   sebuild --root=<dir> --file=<script.cs> [--defs <rel>] [--ext <ext>] [-c | -o <out>] [-v…]
//!
//! Launchers on Windows tend to pass quoted, backslash-separated paths, so
//! path values have one pair of surrounding quotes removed and `\` turned
//! into `/`.

use std::path::PathBuf;

use clap::Parser;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "sebuild", version, about = "Flatten an @import-annotated script into one file")]
pub struct CliArgs {
    /// Root directory imports and the type definitions are resolved against.
    #[arg(long, value_parser = parse_path)]
    pub root: PathBuf,

    /// Entry script to build.
    #[arg(long, value_parser = parse_path)]
    pub file: PathBuf,

    /// Type definition file, relative to the root.
    #[arg(long, value_parser = parse_path)]
    pub defs: Option<PathBuf>,

    /// Script file extension.
    #[arg(long)]
    pub ext: Option<String>,

    /// Write the flattened script here instead of stdout.
    #[arg(short, long, value_parser = parse_path, conflicts_with = "clipboard")]
    pub output: Option<PathBuf>,

    /// Copy the flattened script to the system clipboard instead of stdout.
    #[arg(short, long)]
    pub clipboard: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Where the flattened script goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    Clipboard,
    File(PathBuf),
}

impl CliArgs {
    pub fn sink(&self) -> Sink {
        match (&self.output, self.clipboard) {
            (Some(path), _) => Sink::File(path.clone()),
            (None, true) => Sink::Clipboard,
            (None, false) => Sink::Stdout,
        }
    }

    /// Default log filter for the `-v` count; `RUST_LOG` takes precedence.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()`, exiting with a usage message on error.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Parse a full argv (program name first), exposed for testing.
pub fn parse_argv<I, T>(argv: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    CliArgs::try_parse_from(argv)
}

/// Strip one pair of surrounding double quotes and normalise separators.
pub fn normalize_path_arg(raw: &str) -> String {
    let s = raw.strip_prefix('"').unwrap_or(raw);
    let s = s.strip_suffix('"').unwrap_or(s);
    s.replace('\\', "/")
}

fn parse_path(raw: &str) -> Result<PathBuf, String> {
    let s = normalize_path_arg(raw);
    if s.is_empty() {
        return Err("path must not be empty".to_owned());
    }
    Ok(PathBuf::from(s))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
