// Suggestions
/// Best distances above this are reported as "command not found".
pub const MAX_SUGGEST_DISTANCE: usize = 3;
pub const DEFAULT_INSTALL_COMMAND: &str = "apt install";

// Text listing format
/// A listing line starting with this character names a binary of the
/// package above it; any other non-empty line names a package.
pub const BINARY_LINE_PREFIX: char = ' ';

// Compiled index
pub const INDEX_MAGIC: &[u8; 4] = b"CNF1";
pub const ENTRY_TAG_PACKAGE: u8 = 0;
pub const ENTRY_TAG_BINARY: u8 = 1;

// Default paths
pub const DEFAULT_CONFIG_PATH: &str = "command-not-found.toml";
pub const FINAL_INDEX_PATH: &str = "commands.idx";
/// Repository tag used for the main listing.
pub const MAIN_REPOSITORY: &str = "";

// Shell convention for "command not found".
pub const EXIT_COMMAND_NOT_FOUND: u8 = 127;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
