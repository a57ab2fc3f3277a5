use thiserror::Error;

/// Errors reported by collaborators.
///
/// The core surfaces these unchanged: it never retries or re-wraps them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// A partition index references unknown columns, has an invalid name,
    /// duplicates an existing index or exceeds the per-table limit.
    #[error("Invalid partition index '{index}': {reason}")]
    InvalidIndexDefinition {
        /// Name (or key list) of the offending index.
        index: String,
        /// Why the platform rejected it.
        reason: String,
    },

    /// A resource with the same physical name already exists.
    #[error("Resource name '{0}' is already taken")]
    NameCollision(String),

    /// The backend rejected the request for any other reason.
    #[error("Provisioning backend error: {0}")]
    Backend(String),
}
