//! Session-fatal merge errors.
//!
//! Per-entity problems (missing source data, empty payloads, a model an
//! instance needs that cannot be found) are skippable and land in the
//! [`MergeReport`](crate::MergeReport); structural problems are repairable
//! and land there too. Only the conditions below abort a session, and they
//! are checked before the target Level is mutated.

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The donor Level has no entities to merge from.
    #[error("donor level has no entities to merge from")]
    EmptyDonor,
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
