//! Error types for resource deduplication.

use relevel_types::EntityId;

#[derive(Debug, thiserror::Error)]
pub enum DedupError {
    /// The resource has no content payload; the caller skips it.
    #[error("resource {0} has an empty payload")]
    EmptyResource(EntityId),
}

/// Convenience alias for dedup results.
pub type DedupResult<T> = Result<T, DedupError>;
