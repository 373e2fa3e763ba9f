//! Error types for the foundation crate.

use crate::id::{EntityId, Namespace};

#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// An entity with this id already exists in the collection.
    #[error("duplicate {namespace} id {id}")]
    DuplicateId { namespace: Namespace, id: EntityId },
}
