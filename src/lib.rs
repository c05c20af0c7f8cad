//! Suggest packages for an unknown shell command.
//!
//! A package listing is scanned once per query; the binaries at the smallest
//! edit distance from the query, one per package, are the answer.

pub mod advice;
pub mod config;
pub mod constants;
pub mod error;
pub mod index;
pub mod io_util;
pub mod logging;
pub mod lookup;
pub mod search;
pub mod text;

pub use advice::Advice;
pub use error::{Error, Result};
pub use index::{CompiledIndex, IndexEntry, PackageIndex, Repository};
pub use lookup::lookup;
pub use search::{scan, Match, MatchSet, ScanResult, Scanner};
pub use text::edit_distance;
