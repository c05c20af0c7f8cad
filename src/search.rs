use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::index::IndexEntry;
use crate::text::edit_distance;

/// A binary that matched the query, with the package providing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub package: String,
    pub binary: String,
    /// Label of the index the package came from; empty for the main one.
    pub repository: String,
}

/// Candidates tied at the best distance, one per package, ordered by
/// package name.
pub type MatchSet = BTreeMap<String, Match>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    /// `None` until at least one binary has been compared.
    pub best_distance: Option<usize>,
    pub matches: MatchSet,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.best_distance.is_none()
    }
}

/// Running best-match state for one query.
///
/// A scanner can be fed several repositories in turn; the best distance and
/// the tied matches carry over between them.
pub struct Scanner<'q> {
    query: &'q str,
    best_distance: Option<usize>,
    matches: MatchSet,
}

impl<'q> Scanner<'q> {
    pub fn new(query: &'q str) -> Self {
        Scanner {
            query,
            best_distance: None,
            matches: MatchSet::new(),
        }
    }

    /// Walk `entries` once, attributing each binary to the package entry
    /// before it.
    ///
    /// A binary that appears before any package is rejected with
    /// [`Error::OrphanBinary`] instead of being filed under an empty
    /// package name.
    pub fn scan_repository(&mut self, entries: &[IndexEntry], repository: &str) -> Result<()> {
        let mut current_package: Option<&str> = None;

        for (position, entry) in entries.iter().enumerate() {
            match entry {
                IndexEntry::Package(name) => current_package = Some(name.as_str()),
                IndexEntry::Binary(binary) => {
                    let Some(package) = current_package else {
                        return Err(Error::OrphanBinary {
                            binary: binary.clone(),
                            position,
                        });
                    };
                    let distance = edit_distance(self.query, binary)?;
                    self.offer(package, binary, repository, distance);
                }
            }
        }
        Ok(())
    }

    fn offer(&mut self, package: &str, binary: &str, repository: &str, distance: usize) {
        let candidate = || Match {
            package: package.to_string(),
            binary: binary.to_string(),
            repository: repository.to_string(),
        };

        match self.best_distance {
            Some(best) if distance > best => {}
            Some(best) if distance == best => {
                // First binary per package wins; later ties are dropped.
                if let Entry::Vacant(slot) = self.matches.entry(package.to_string()) {
                    trace!(package, binary, distance, "tied best match");
                    slot.insert(candidate());
                }
            }
            _ => {
                debug!(package, binary, distance, "new best match");
                self.best_distance = Some(distance);
                self.matches.clear();
                self.matches.insert(package.to_string(), candidate());
            }
        }
    }

    pub fn finish(self) -> ScanResult {
        ScanResult {
            best_distance: self.best_distance,
            matches: self.matches,
        }
    }
}

/// Scan a single index for the binaries closest to `query`.
pub fn scan(query: &str, entries: &[IndexEntry], repository: &str) -> Result<ScanResult> {
    let mut scanner = Scanner::new(query);
    scanner.scan_repository(entries, repository)?;
    Ok(scanner.finish())
}
