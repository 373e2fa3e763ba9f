use std::collections::BTreeSet;

use relevel_types::{EntityId, Namespace};

/// Allocates fresh ids for one namespace.
///
/// Seed it with every id currently in use, then call
/// [`next_free`](Self::next_free) repeatedly; each returned id is recorded
/// as used before the call returns. Allocation never fails — ids are drawn
/// from the full `u32` range and collections are far smaller than that.
#[derive(Clone, Debug)]
pub struct IdAllocator {
    namespace: Namespace,
    used: BTreeSet<u32>,
}

impl IdAllocator {
    /// Allocator over the given used-id set.
    pub fn new(namespace: Namespace, used: BTreeSet<u32>) -> Self {
        Self { namespace, used }
    }

    /// Allocator pre-seeded with several used-id sets (the shared-id-space
    /// case, where two collections serialize into one numeric space).
    pub fn from_sets<I>(namespace: Namespace, sets: I) -> Self
    where
        I: IntoIterator<Item = BTreeSet<u32>>,
    {
        let mut used = BTreeSet::new();
        for set in sets {
            used.extend(set);
        }
        Self { namespace, used }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Smallest id ≥ `start_hint` not currently in use. The returned id is
    /// marked used immediately.
    pub fn next_free(&mut self, start_hint: u32) -> EntityId {
        let mut candidate = start_hint.max(self.namespace.allocation_base());
        while self.used.contains(&candidate) {
            candidate += 1;
        }
        self.used.insert(candidate);
        EntityId::new(candidate)
    }

    /// Next free id starting from the namespace's configured base.
    pub fn next_free_from_base(&mut self) -> EntityId {
        self.next_free(self.namespace.allocation_base())
    }

    /// Record an id the caller assigned through some other channel.
    pub fn reserve(&mut self, id: EntityId) {
        self.used.insert(id.value());
    }

    pub fn is_used(&self, id: EntityId) -> bool {
        self.used.contains(&id.value())
    }

    /// Highest id currently in use, if any.
    pub fn highest_used(&self) -> Option<u32> {
        self.used.iter().next_back().copied()
    }
}
