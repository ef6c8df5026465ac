// doc constants
pub const DOC_ID: &str = "objectId";
pub const FIELD_SEPARATOR: &str = ".";

// registry constants
pub const DEFAULT_DATABASE_NAME: &str = "minimongo";
pub const RESERVED_NAME_PREFIX: &str = "__";

// snapshot constants
pub const SNAPSHOT_MAGIC: &[u8; 8] = b"MINIMONG";
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;
pub const DEFAULT_FILE_EXTENSION: &str = "mongodb";
