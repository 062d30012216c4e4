use std::io;

/// Reasons a single ingestion record was rejected. Misses at query time are
/// `None` results rather than errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogueError {
    #[error("unknown stop: {0}")]
    UnknownStop(String),

    #[error("stop {0} is already registered")]
    DuplicateStop(String),

    #[error("bus {0} is already registered")]
    DuplicateBus(String),

    #[error("bus {0} has no stops")]
    EmptyRoute(String),

    /// A base request that could not be decoded.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("bus velocity must be positive")]
    ZeroVelocity,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("corrupt snapshot: {0}")]
    Corrupt(String),

    #[error("invalid route settings in snapshot: {0}")]
    Settings(#[from] SettingsError),
}
