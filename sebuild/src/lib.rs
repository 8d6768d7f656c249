//! `sebuild` flattens C# scripts written with a small macro language into
//! a single script.
//!
//! - `@import a.b` inlines `<root>/a/b.cs` once per build
//! - `@skip a.b` marks `a.b` as already included
//! - `@Name` in live code is replaced from the type definition table
//!
//! # Quick start
//!
//! ```rust
//! use sebuild::{scan_line, TypeTable};
//!
//! let types: TypeTable = [("V3", "VRageMath.Vector3D")].into_iter().collect();
//! let (line, in_comment) = scan_line("var v = new @V3(); // @V3", false, &types).unwrap();
//! assert_eq!(line, "var v = new VRageMath.Vector3D(); // @V3");
//! assert!(!in_comment);
//! ```

pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod scan;
pub mod typedefs;

// Re-exports for convenience.
pub use build::{build, ScriptBuilder};
pub use config::BuildOptions;
pub use error::{BuildError, Result};
pub use import::{ImportSet, Resolver};
pub use scan::{scan_line, LineScanner, UnknownTag};
pub use typedefs::TypeTable;
