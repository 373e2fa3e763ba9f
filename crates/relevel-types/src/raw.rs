//! Loader fallback for records not decoded into the in-memory collections.

use crate::id::{EntityId, Namespace};

/// Low-level record access supplied by the Level loader.
///
/// The loader does not fully decode every record kind; when the merge engine
/// needs an entity whose id is missing from the in-memory collection, it may
/// consult this source to locate the raw record bytes by scanning the
/// loader's low-level tables. This is a fallback path, not the common case.
pub trait RawRecordSource {
    /// The raw on-disk bytes of the record `(namespace, id)`, if the
    /// low-level tables contain it.
    fn find_record(&self, namespace: Namespace, id: EntityId) -> Option<Vec<u8>>;
}
