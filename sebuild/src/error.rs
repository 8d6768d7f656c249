//! Error kinds for a script build.
//!
//! Every failure is terminal for the build it occurs in: the first error
//! anywhere in the import tree propagates to the caller and no partial output
//! is produced.  Formatting for the user is left to the binary.

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, BuildError>;

/// A failed build.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    /// The type definition file does not exist.
    #[error("type definition file does not exist, expected at {}", path.display())]
    MissingResource { path: PathBuf },

    /// A file exists but could not be read as text.
    #[error("unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A type definition line is not of the form `<name> <replacement>`.
    #[error("{}:{line}: malformed type definition {text:?}", path.display())]
    MalformedDefinition {
        path: PathBuf,
        line: usize,
        text: String,
    },

    /// An `@import` names a unit with no file behind it.
    #[error("import \"{name}\" does not exist, expected to be {}", expected.display())]
    ImportNotFound { name: String, expected: PathBuf },

    /// A live `@tag` has no entry in the type table.
    #[error("{}:{line}: unknown type definition \"@{name}\"", file.display())]
    UnknownTag {
        name: String,
        file: PathBuf,
        line: usize,
    },

    /// The build root is not an existing directory.
    #[error("root {} is not a directory", path.display())]
    InvalidRoot { path: PathBuf },

    /// The entry file does not carry the script extension.
    #[error("{} is not a script file (expected a .{expected} file)", path.display())]
    InvalidFileKind { path: PathBuf, expected: String },
}
