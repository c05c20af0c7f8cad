use std::io;

/// Errors produced while loading an index or looking up a command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not allocate {cells} cells for an edit distance")]
    ResourceExhausted { cells: usize },

    /// `position` is the 0-based index into the entry sequence.
    #[error("binary '{binary}' at entry {position} does not belong to any package")]
    OrphanBinary { binary: String, position: usize },

    /// `line` is the 1-based line of a text listing.
    #[error("binary '{binary}' on line {line} does not belong to any package")]
    OrphanLine { binary: String, line: usize },

    #[error("invalid index: {0}")]
    InvalidIndex(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(err: &Error) -> &'static str {
        match err {
            Error::ResourceExhausted { .. } => "resource",
            Error::OrphanBinary { .. } => "orphan",
            Error::OrphanLine { .. } => "orphan",
            Error::InvalidIndex(_) => "index",
            Error::Io(_) => "io",
        }
    }

    #[test]
    fn library_failures_map_to_known_kinds() {
        let raised = [
            crate::text::edit_distance("a", "b").map(|_| ()),
            crate::index::parse_listing(" ls\n").map(|_| ()),
            crate::index::decode_index(b"XXXX").map(|_| ()),
        ];
        let kinds: Vec<_> = raised.iter().filter_map(|r| r.as_ref().err()).map(kind).collect();
        assert_eq!(kinds, ["orphan", "index"]);
    }

    #[test]
    fn orphan_messages_name_their_coordinate() {
        let entry = Error::OrphanBinary { binary: "ls".into(), position: 0 };
        let line = Error::OrphanLine { binary: "ls".into(), line: 1 };
        assert_eq!(
            entry.to_string(),
            "binary 'ls' at entry 0 does not belong to any package"
        );
        assert_eq!(
            line.to_string(),
            "binary 'ls' on line 1 does not belong to any package"
        );
    }
}
