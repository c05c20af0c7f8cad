use memmap2::MmapOptions;
use std::fs::{self, File};
use std::io::{self, BufWriter, Cursor, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::constants::*;
use crate::error::{Error, Result};
use crate::io_util::*;

/// One line of a package listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEntry {
    /// Starts a package; binaries that follow belong to it.
    Package(String),
    /// An executable provided by the most recent package.
    Binary(String),
}

/// An ordered package listing in which every binary has an owning package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageIndex {
    entries: Vec<IndexEntry>,
    packages: usize,
    binaries: usize,
}

impl PackageIndex {
    /// Builds an index from raw entries, rejecting a binary that comes
    /// before the first package.
    pub fn from_entries(entries: Vec<IndexEntry>) -> Result<Self> {
        let mut packages = 0;
        let mut binaries = 0;
        for (position, entry) in entries.iter().enumerate() {
            match entry {
                IndexEntry::Package(_) => packages += 1,
                IndexEntry::Binary(binary) if packages == 0 => {
                    return Err(Error::OrphanBinary {
                        binary: binary.clone(),
                        position,
                    });
                }
                IndexEntry::Binary(_) => binaries += 1,
            }
        }
        Ok(PackageIndex {
            entries,
            packages,
            binaries,
        })
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn packages(&self) -> usize {
        self.packages
    }

    pub fn binaries(&self) -> usize {
        self.binaries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the text listing format: a line starting with a space names a
/// binary, any other line names a package. Blank lines are skipped.
///
/// A binary line before the first package is [`Error::OrphanLine`].
pub fn parse_listing(text: &str) -> Result<PackageIndex> {
    let mut entries = Vec::new();
    let mut seen_package = false;

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(binary) = line.strip_prefix(BINARY_LINE_PREFIX) {
            if !seen_package {
                return Err(Error::OrphanLine {
                    binary: binary.to_string(),
                    line: line_no + 1,
                });
            }
            entries.push(IndexEntry::Binary(binary.to_string()));
        } else {
            seen_package = true;
            entries.push(IndexEntry::Package(line.to_string()));
        }
    }

    PackageIndex::from_entries(entries)
}

pub fn load_listing(path: &Path) -> Result<PackageIndex> {
    let text = fs::read_to_string(path)?;
    let index = parse_listing(&text)?;
    debug!(
        path = %path.display(),
        packages = index.packages(),
        binaries = index.binaries(),
        "loaded listing"
    );
    Ok(index)
}

/// A package index together with the tag attached to its matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub index: PackageIndex,
}

/// Every repository stored in a compiled index file, in lookup order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledIndex {
    pub repositories: Vec<Repository>,
}

impl CompiledIndex {
    pub fn binaries(&self) -> usize {
        self.repositories.iter().map(|r| r.index.binaries()).sum()
    }
}

fn len_u32(n: usize, what: &str) -> io::Result<u32> {
    u32::try_from(n).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("too many {what}"))
    })
}

pub fn write_index<W: Write>(w: &mut W, repositories: &[Repository]) -> io::Result<()> {
    w.write_all(INDEX_MAGIC)?;
    write_u32(w, len_u32(repositories.len(), "repositories")?)?;

    for repo in repositories {
        write_str(w, &repo.name)?;
        let entries = repo.index.entries();
        write_u32(w, len_u32(entries.len(), "entries")?)?;
        for entry in entries {
            let (tag, name) = match entry {
                IndexEntry::Package(name) => (ENTRY_TAG_PACKAGE, name),
                IndexEntry::Binary(name) => (ENTRY_TAG_BINARY, name),
            };
            write_u8(w, tag)?;
            write_str(w, name)?;
        }
    }
    Ok(())
}

pub fn save_index(path: &Path, repositories: &[Repository]) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_index(&mut w, repositories)?;
    w.flush()?;
    info!(path = %path.display(), repositories = repositories.len(), "saved index");
    Ok(())
}

fn truncated(e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::InvalidIndex("truncated file".to_string()),
        io::ErrorKind::InvalidData => Error::InvalidIndex(e.to_string()),
        _ => Error::Io(e),
    }
}

/// Decode a compiled index from its on-disk bytes.
pub fn decode_index(bytes: &[u8]) -> Result<CompiledIndex> {
    let mut r = Cursor::new(bytes);

    let mut magic = [0u8; 4];
    r.read_exact(&mut magic).map_err(truncated)?;
    if &magic != INDEX_MAGIC {
        return Err(Error::InvalidIndex("bad magic".to_string()));
    }

    let repo_count = read_u32(&mut r).map_err(truncated)?;
    let mut repositories = Vec::new();

    for _ in 0..repo_count {
        let name = read_str(&mut r).map_err(truncated)?;
        let entry_count = read_u32(&mut r).map_err(truncated)?;
        let mut entries = Vec::new();

        for _ in 0..entry_count {
            let tag = read_u8(&mut r).map_err(truncated)?;
            let value = read_str(&mut r).map_err(truncated)?;
            entries.push(match tag {
                ENTRY_TAG_PACKAGE => IndexEntry::Package(value),
                ENTRY_TAG_BINARY => IndexEntry::Binary(value),
                other => {
                    return Err(Error::InvalidIndex(format!("unknown entry tag {other}")));
                }
            });
        }

        let index = PackageIndex::from_entries(entries)?;
        repositories.push(Repository { name, index });
    }

    if (r.position() as usize) != bytes.len() {
        return Err(Error::InvalidIndex("trailing bytes".to_string()));
    }

    Ok(CompiledIndex { repositories })
}

pub fn load_index(path: &Path) -> Result<CompiledIndex> {
    let file = File::open(path)?;
    if file.metadata()?.len() < INDEX_MAGIC.len() as u64 {
        return Err(Error::InvalidIndex("file too small".to_string()));
    }
    // The index is only read while `mmap` is alive and is not expected to be
    // rewritten underneath a running lookup.
    let mmap = unsafe { MmapOptions::new().map(&file)? };
    let index = decode_index(&mmap)?;
    debug!(
        path = %path.display(),
        repositories = index.repositories.len(),
        binaries = index.binaries(),
        "loaded compiled index"
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LISTING: &str = "coreutils\n ls\n cp\n\ngit\n git\n git-shell\n";

    #[test]
    fn parses_listing() {
        let index = parse_listing(LISTING).unwrap();
        assert_eq!(index.packages(), 2);
        assert_eq!(index.binaries(), 4);
        assert_eq!(
            index.entries()[..3].to_vec(),
            vec![
                IndexEntry::Package("coreutils".to_string()),
                IndexEntry::Binary("ls".to_string()),
                IndexEntry::Binary("cp".to_string()),
            ]
        );
    }

    #[test]
    fn only_first_space_is_stripped() {
        let index = parse_listing("pkg\n  odd\n").unwrap();
        assert_eq!(index.entries()[1], IndexEntry::Binary(" odd".to_string()));
    }

    #[test]
    fn listing_with_leading_binary_is_rejected() {
        let err = parse_listing("\n ls\ncoreutils\n").unwrap_err();
        match err {
            Error::OrphanLine { binary, line } => {
                assert_eq!(binary, "ls");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_listing_is_empty() {
        let index = parse_listing("\n  \n").unwrap();
        assert!(index.is_empty());
        assert_eq!(index.packages(), 0);
        assert!(!parse_listing(LISTING).unwrap().is_empty());
    }

    #[test]
    fn from_entries_rejects_orphans() {
        let entries = vec![IndexEntry::Binary("ls".to_string())];
        assert!(matches!(
            PackageIndex::from_entries(entries),
            Err(Error::OrphanBinary { position: 0, .. })
        ));
    }

    #[test]
    fn compiled_index_survives_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commands.idx");
        let repos = vec![
            Repository {
                name: String::new(),
                index: parse_listing(LISTING).unwrap(),
            },
            Repository {
                name: "x11".to_string(),
                index: parse_listing("xterm\n xterm\n").unwrap(),
            },
        ];

        save_index(&path, &repos).unwrap();
        let loaded = load_index(&path).unwrap();

        assert_eq!(loaded.repositories, repos);
        assert_eq!(loaded.binaries(), 5);
    }

    #[test]
    fn rejects_bad_magic() {
        assert!(matches!(
            decode_index(b"NOPE\0\0\0\0"),
            Err(Error::InvalidIndex(_))
        ));
    }

    #[test]
    fn rejects_truncated_and_trailing_data() {
        let mut bytes = Vec::new();
        let repos = vec![Repository {
            name: "main".to_string(),
            index: parse_listing(LISTING).unwrap(),
        }];
        write_index(&mut bytes, &repos).unwrap();

        let cut = &bytes[..bytes.len() - 3];
        assert!(matches!(decode_index(cut), Err(Error::InvalidIndex(_))));

        bytes.push(0);
        assert!(matches!(decode_index(&bytes), Err(Error::InvalidIndex(_))));
    }

    #[test]
    fn rejects_unknown_entry_tag() {
        let mut bytes = INDEX_MAGIC.to_vec();
        write_u32(&mut bytes, 1).unwrap();
        write_str(&mut bytes, "").unwrap();
        write_u32(&mut bytes, 1).unwrap();
        write_u8(&mut bytes, 9).unwrap();
        write_str(&mut bytes, "pkg").unwrap();
        assert!(matches!(decode_index(&bytes), Err(Error::InvalidIndex(_))));
    }

    #[test]
    fn tiny_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.idx");
        fs::write(&path, b"").unwrap();
        assert!(matches!(load_index(&path), Err(Error::InvalidIndex(_))));
    }
}
