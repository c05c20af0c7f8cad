use tracing::debug;

use crate::error::Result;
use crate::index::Repository;
use crate::search::{ScanResult, Scanner};

/// Look `query` up in every repository, in order, keeping the overall
/// closest binaries.
///
/// When a package ties in several repositories, the match from the earlier
/// repository is kept.
pub fn lookup(query: &str, repositories: &[Repository]) -> Result<ScanResult> {
    let mut scanner = Scanner::new(query);
    for repo in repositories {
        debug!(repository = %repo.name, binaries = repo.index.binaries(), "scanning");
        scanner.scan_repository(repo.index.entries(), &repo.name)?;
    }
    let result = scanner.finish();
    debug!(query, best = ?result.best_distance, matches = result.matches.len(), "lookup done");
    Ok(result)
}
