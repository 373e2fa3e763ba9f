use std::collections::BTreeMap;

use relevel_types::{EntityId, Namespace};
use serde::{Deserialize, Serialize};

/// The old-id → new-id table produced by conflict resolution, per namespace.
///
/// Returned to the caller for audit and testing; also the vehicle the merge
/// orchestrator uses to carry donor-side → target-side id rewrites.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenumberMap {
    by_namespace: BTreeMap<Namespace, BTreeMap<u32, u32>>,
}

impl RenumberMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, namespace: Namespace, old: EntityId, new: EntityId) {
        self.by_namespace
            .entry(namespace)
            .or_default()
            .insert(old.value(), new.value());
    }

    /// The new id for `(namespace, old)`, if that pair was renumbered.
    pub fn lookup(&self, namespace: Namespace, old: EntityId) -> Option<EntityId> {
        self.by_namespace
            .get(&namespace)
            .and_then(|m| m.get(&old.value()))
            .map(|&raw| EntityId::new(raw))
    }

    /// Apply the map to a single reference, leaving it unchanged on a miss.
    pub fn rewrite(&self, namespace: Namespace, id: EntityId) -> EntityId {
        self.lookup(namespace, id).unwrap_or(id)
    }

    /// Renumbered pairs in one namespace, ascending by old id.
    pub fn entries(&self, namespace: Namespace) -> Vec<(EntityId, EntityId)> {
        self.by_namespace
            .get(&namespace)
            .map(|m| {
                m.iter()
                    .map(|(&old, &new)| (EntityId::new(old), EntityId::new(new)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total renumbered pairs across all namespaces.
    pub fn len(&self) -> usize {
        self.by_namespace.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_namespace.values().all(|m| m.is_empty())
    }

    /// Fold `other` into `self`; entries in `other` win on overlap.
    pub fn merge(&mut self, other: RenumberMap) {
        for (namespace, entries) in other.by_namespace {
            self.by_namespace
                .entry(namespace)
                .or_default()
                .extend(entries);
        }
    }
}
