use std::collections::HashSet;

use relevel_alloc::IdAllocator;
use relevel_types::{Collection, Entity, Level, Namespace};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::map::RenumberMap;

/// How numerically equal ids in the model and resource namespaces are
/// treated. Some container formats serialize both collections into one id
/// space; a collision there corrupts the output even though each collection
/// is internally consistent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdSpacePolicy {
    /// Model and resource ids are independent; equal values are not a
    /// conflict.
    #[default]
    SeparateSpaces,
    /// Model and resource ids share one numeric space. Resources are the
    /// lower-priority side and renumber; models keep their ids.
    SharedSpace,
}

/// Detect and repair id conflicts in the given namespaces.
///
/// Within a namespace, entities sharing an id form a conflict group: the
/// first member in collection order keeps the id, every later member is
/// renumbered to the smallest free id past the highest id in use (ids
/// reserved by earlier renumberings in the same pass included). Under
/// [`IdSpacePolicy::SharedSpace`], resources whose id equals any model id
/// are renumbered as well.
///
/// Every reference in the Level that pointed at a renumbered id is rewritten
/// here, not by the caller. The returned map records each old → new pair for
/// audit.
pub fn resolve(level: &mut Level, namespaces: &[Namespace], policy: IdSpacePolicy) -> RenumberMap {
    let mut map = RenumberMap::new();

    let shared = policy == IdSpacePolicy::SharedSpace
        && namespaces.contains(&Namespace::Model)
        && namespaces.contains(&Namespace::Resource);

    // The resource allocator sees model ids too under a shared id space, so
    // renumbered resources cannot land on a model id.
    let mut resource_allocator = if shared {
        IdAllocator::from_sets(
            Namespace::Resource,
            [level.resources.used_ids(), level.models.used_ids()],
        )
    } else {
        IdAllocator::new(Namespace::Resource, level.resources.used_ids())
    };

    for &namespace in namespaces {
        match namespace {
            Namespace::Model => {
                let mut allocator = IdAllocator::new(namespace, level.models.used_ids());
                renumber_duplicates(&mut level.models, &mut allocator, &mut map);
            }
            Namespace::Instance => {
                let mut allocator = IdAllocator::new(namespace, level.instances.used_ids());
                renumber_duplicates(&mut level.instances, &mut allocator, &mut map);
            }
            Namespace::Resource => {
                renumber_duplicates(&mut level.resources, &mut resource_allocator, &mut map);
            }
            Namespace::Spline => {
                let mut allocator = IdAllocator::new(namespace, level.splines.used_ids());
                renumber_duplicates(&mut level.splines, &mut allocator, &mut map);
            }
            // Param blocks are addressed by table position, which never
            // changes; there is nothing to renumber.
            Namespace::ParamBlock => {}
        }
    }

    if shared {
        renumber_shared_space(level, &mut resource_allocator, &mut map);
    }

    if !map.is_empty() {
        rewrite_references(level, &map);
        info!(renumbered = map.len(), "resolved id conflicts");
    }

    map
}

fn renumber_duplicates<T: Entity>(
    collection: &mut Collection<T>,
    allocator: &mut IdAllocator,
    map: &mut RenumberMap,
) {
    let mut seen = HashSet::new();
    for entity in collection.iter_mut() {
        let id = entity.id();
        if seen.insert(id) {
            continue;
        }
        let hint = allocator.highest_used().map_or(0, |h| h + 1);
        let new_id = allocator.next_free(hint);
        debug!(namespace = %T::NAMESPACE, old = %id, new = %new_id, "renumbering duplicate");
        entity.set_id(new_id);
        map.record(T::NAMESPACE, id, new_id);
    }
}

/// Move resources off ids occupied by models (shared-id-space collisions).
fn renumber_shared_space(level: &mut Level, allocator: &mut IdAllocator, map: &mut RenumberMap) {
    let model_ids = level.models.used_ids();
    for resource in level.resources.iter_mut() {
        if !model_ids.contains(&resource.id.value()) {
            continue;
        }
        let hint = allocator.highest_used().map_or(0, |h| h + 1);
        let new_id = allocator.next_free(hint);
        debug!(old = %resource.id, new = %new_id, "renumbering resource off shared-space collision");
        map.record(Namespace::Resource, resource.id, new_id);
        resource.id = new_id;
    }
}

/// Rewrite every reference in the Level through the map.
///
/// References to ids the map does not mention pass through unchanged. Param
/// indices are table positions, not entity ids, and are never rewritten.
pub fn rewrite_references(level: &mut Level, map: &RenumberMap) {
    for instance in level.instances.iter_mut() {
        if let Some(model) = instance.model {
            instance.model = Some(map.rewrite(Namespace::Model, model));
        }
        for resource in instance.resources.iter_mut() {
            *resource = map.rewrite(Namespace::Resource, *resource);
        }
        if let Some(path) = instance.path {
            instance.path = Some(map.rewrite(Namespace::Spline, path));
        }
    }
}
