use thiserror::Error;

/// Errors that can arise while loading, storing, or seeding world records.
///
/// The in-game behaviors themselves never fail; these cover the plumbing
/// around them.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, seed files).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file could not be parsed.
    #[error("seed parse error in {path}: {source}")]
    Seed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Seed file parsed but holds values the world cannot run with.
    #[error("invalid seed {path}: {reason}")]
    InvalidSeed { path: String, reason: String },

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },
}
