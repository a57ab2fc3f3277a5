use crate::EncryptionMode;
use tabula_effects::PlatformError;
use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug)]
pub enum TableError {
    /// A bucket was supplied together with a server-side encryption mode.
    #[error(
        "Cannot apply {mode} encryption to supplied bucket '{bucket}': \
         only buckets created by the table take encryption settings"
    )]
    ConfigConflict {
        /// The requested mode.
        mode: EncryptionMode,
        /// Name of the supplied bucket.
        bucket: String,
    },

    /// Two storage parameters share a key.
    #[error("Duplicate storage parameter key: {0}")]
    DuplicateParameterKey(String),

    /// An encryption mode string did not match any known mode.
    #[error("Unknown encryption mode '{0}'")]
    UnknownEncryptionMode(String),

    /// A table definition could not be read.
    #[error("Invalid table configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A collaborator rejected a request.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}
