//! Importing a donor resource into a target collection.

use relevel_alloc::IdAllocator;
use relevel_types::{Collection, EntityId, Namespace, Resource};

use crate::error::{DedupError, DedupResult};
use crate::signature::{probe_offsets, Signature, SignatureIndex};

/// Probes compared per pair in the fallback scan.
const PROBE_COUNT: usize = 8;

/// What [`import_resource`] did with the donor resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    /// A matching resource already existed; its id is returned.
    Matched(EntityId),
    /// The resource was deep-copied and appended under a fresh id.
    Appended(EntityId),
}

impl ImportOutcome {
    /// The target-side id a referring record must now use.
    pub fn id(&self) -> EntityId {
        match *self {
            ImportOutcome::Matched(id) | ImportOutcome::Appended(id) => id,
        }
    }
}

/// Import one donor resource into `target`, deduplicating by content.
///
/// Matching is two-tier: an exact [`Signature`] lookup in the session
/// `index`, then a bounded pairwise probe comparison (dimension and length
/// equality plus byte equality at [`PROBE_COUNT`] fixed offsets) to catch
/// signature weaknesses. On a miss the resource is deep-copied and appended
/// at the collection's next free tail id.
///
/// The caller must feed the returned id into the reference-rewrite map for
/// every record that pointed at the donor-side id.
pub fn import_resource(
    donor: &Resource,
    target: &mut Collection<Resource>,
    index: &mut SignatureIndex,
) -> DedupResult<ImportOutcome> {
    if donor.data.is_empty() {
        return Err(DedupError::EmptyResource(donor.id));
    }

    let signature = Signature::of(donor);
    if let Some(existing) = index.lookup(&signature) {
        return Ok(ImportOutcome::Matched(existing));
    }

    // Signature miss: probe-compare against the collection before copying.
    if let Some(existing) = target.iter().find(|r| probes_match(donor, r)) {
        return Ok(ImportOutcome::Matched(existing.id));
    }

    let mut allocator = IdAllocator::new(Namespace::Resource, target.used_ids());
    let hint = allocator.highest_used().map_or(0, |h| h + 1);
    let new_id = allocator.next_free(hint);

    let mut copy = donor.clone();
    copy.id = new_id;
    target.push(copy);
    index.insert(signature, new_id);

    Ok(ImportOutcome::Appended(new_id))
}

/// Bounded equality heuristic: dimensions, length, and sampled bytes.
fn probes_match(a: &Resource, b: &Resource) -> bool {
    if a.width != b.width || a.height != b.height || a.data.len() != b.data.len() {
        return false;
    }
    probe_offsets(a.data.len(), PROBE_COUNT)
        .into_iter()
        .all(|offset| a.data[offset] == b.data[offset])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: u32, data: Vec<u8>) -> Resource {
        Resource::new(EntityId::new(id), 16, 16, data)
    }

    fn session(target: &Collection<Resource>) -> SignatureIndex {
        SignatureIndex::build(target)
    }

    #[test]
    fn empty_payload_is_rejected() {
        let mut target = Collection::new();
        let mut index = session(&target);
        let err = import_resource(&resource(1, Vec::new()), &mut target, &mut index).unwrap_err();
        assert!(matches!(err, DedupError::EmptyResource(id) if id == EntityId::new(1)));
        assert!(target.is_empty());
    }

    #[test]
    fn miss_appends_a_deep_copy_at_fresh_tail_id() {
        let mut target = Collection::new();
        target.push(resource(3, vec![1; 64]));
        let mut index = session(&target);

        let outcome =
            import_resource(&resource(4, vec![2; 64]), &mut target, &mut index).unwrap();

        assert_eq!(outcome, ImportOutcome::Appended(EntityId::new(4)));
        assert_eq!(target.len(), 2);
        assert_eq!(target.get(EntityId::new(4)).unwrap().data, vec![2; 64]);
    }

    #[test]
    fn fresh_id_skips_past_highest_used() {
        let mut target = Collection::new();
        target.push(resource(3, vec![1; 64]));
        target.push(resource(8, vec![3; 64]));
        let mut index = session(&target);

        let outcome =
            import_resource(&resource(4, vec![2; 64]), &mut target, &mut index).unwrap();
        assert_eq!(outcome, ImportOutcome::Appended(EntityId::new(9)));
    }

    #[test]
    fn exact_match_returns_existing_id_without_copying() {
        let mut target = Collection::new();
        target.push(resource(3, vec![7; 128]));
        let mut index = session(&target);

        let outcome =
            import_resource(&resource(99, vec![7; 128]), &mut target, &mut index).unwrap();

        assert_eq!(outcome, ImportOutcome::Matched(EntityId::new(3)));
        assert_eq!(target.len(), 1);
    }

    #[test]
    fn importing_twice_is_idempotent() {
        let mut target = Collection::new();
        let mut index = session(&target);
        let donor = resource(5, vec![9; 256]);

        let first = import_resource(&donor, &mut target, &mut index).unwrap();
        let second = import_resource(&donor, &mut target, &mut index).unwrap();

        assert_eq!(target.len(), 1);
        assert_eq!(first.id(), second.id());
        assert!(matches!(second, ImportOutcome::Matched(_)));
    }

    #[test]
    fn dimension_mismatch_forces_a_copy() {
        let mut target = Collection::new();
        target.push(resource(1, vec![7; 64]));
        let mut index = session(&target);

        let mut donor = resource(2, vec![7; 64]);
        donor.width = 32;
        let outcome = import_resource(&donor, &mut target, &mut index).unwrap();
        assert!(matches!(outcome, ImportOutcome::Appended(_)));
        assert_eq!(target.len(), 2);
    }

    #[test]
    fn probe_fallback_catches_collection_entries_missing_from_index() {
        let mut target = Collection::new();
        target.push(resource(6, vec![4; 64]));
        // Simulate a stale/partial index.
        let mut index = SignatureIndex::default();

        let outcome =
            import_resource(&resource(7, vec![4; 64]), &mut target, &mut index).unwrap();
        assert_eq!(outcome, ImportOutcome::Matched(EntityId::new(6)));
        assert_eq!(target.len(), 1);
    }
}
