//! Ordered, id-keyed sequences of entities.
//!
//! A [`Collection`] preserves insertion order (the original on-disk order
//! matters for conflict resolution: the first occupant of a contested id
//! keeps it). The unique-id invariant is *expected*, not enforced on every
//! push — donor data arrives corrupted often enough that the validator and
//! resolver must be able to see duplicates to report and repair them.

use std::collections::BTreeSet;

use crate::entity::Entity;
use crate::error::TypeError;
use crate::id::EntityId;

/// An ordered sequence of entities of one namespace.
#[derive(Clone, Debug, PartialEq)]
pub struct Collection<T: Entity> {
    entries: Vec<T>,
}

impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_entries(entries: Vec<T>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entity without checking its id. The validator reports any
    /// duplicate this introduces; the resolver repairs it.
    pub fn push(&mut self, entity: T) {
        self.entries.push(entity);
    }

    /// Append an entity, rejecting an id already present.
    pub fn insert_unique(&mut self, entity: T) -> Result<(), TypeError> {
        if self.contains_id(entity.id()) {
            return Err(TypeError::DuplicateId {
                namespace: T::NAMESPACE,
                id: entity.id(),
            });
        }
        self.entries.push(entity);
        Ok(())
    }

    pub fn contains_id(&self, id: EntityId) -> bool {
        self.entries.iter().any(|e| e.id() == id)
    }

    /// First entity carrying `id`, in collection order.
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.entries.iter_mut().find(|e| e.id() == id)
    }

    /// Every id currently in use, deduplicated and ordered.
    pub fn used_ids(&self) -> BTreeSet<u32> {
        self.entries.iter().map(|e| e.id().value()).collect()
    }

    /// Ids in collection (serialization) order, duplicates included.
    pub fn ids_in_order(&self) -> Vec<EntityId> {
        self.entries.iter().map(|e| e.id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut()
    }
}

impl<'a, T: Entity> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Resource;

    fn resource(id: u32) -> Resource {
        Resource::new(EntityId::new(id), 8, 8, vec![id as u8])
    }

    #[test]
    fn new_collection_is_empty() {
        let c: Collection<Resource> = Collection::new();
        assert!(c.is_empty());
        assert_eq!(c.len(), 0);
    }

    #[test]
    fn push_allows_duplicates() {
        let mut c = Collection::new();
        c.push(resource(7));
        c.push(resource(7));
        assert_eq!(c.len(), 2);
        assert_eq!(c.used_ids().len(), 1);
    }

    #[test]
    fn insert_unique_rejects_duplicates() {
        let mut c = Collection::new();
        c.insert_unique(resource(1)).unwrap();
        let err = c.insert_unique(resource(1)).unwrap_err();
        assert!(matches!(err, TypeError::DuplicateId { .. }));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn get_returns_first_match_in_order() {
        let mut c = Collection::new();
        let mut first = resource(3);
        first.width = 16;
        c.push(first);
        c.push(resource(3));
        assert_eq!(c.get(EntityId::new(3)).unwrap().width, 16);
    }

    #[test]
    fn used_ids_is_sorted() {
        let mut c = Collection::new();
        c.push(resource(9));
        c.push(resource(2));
        c.push(resource(5));
        let ids: Vec<u32> = c.used_ids().into_iter().collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn ids_in_order_preserves_insertion() {
        let mut c = Collection::new();
        c.push(resource(9));
        c.push(resource(2));
        let ids = c.ids_in_order();
        assert_eq!(ids, vec![EntityId::new(9), EntityId::new(2)]);
    }
}
