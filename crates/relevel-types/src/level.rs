//! The [`Level`] aggregate: every collection the merge engine operates on.

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::entity::{Instance, ModelDef, Resource, Spline};
use crate::id::EntityId;
use crate::param::ParamTable;

/// Index lists rebuilt by the orchestrator's finalize step from the
/// consistent collections. The saver consumes these instead of re-deriving
/// them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedLists {
    /// Every model id currently in use, ascending.
    pub model_ids: Vec<EntityId>,
    /// Instance ids in serialization (collection) order.
    pub instance_order: Vec<EntityId>,
}

/// A donor or target data set: typed collections plus the parameter table.
///
/// The merge engine mutates a target Level in place; it never owns the Level
/// itself. Entities are never shared between two Levels — crossing over is
/// always a deep clone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Level {
    pub models: Collection<ModelDef>,
    pub instances: Collection<Instance>,
    pub resources: Collection<Resource>,
    pub splines: Collection<Spline>,
    pub params: ParamTable,
    pub derived: DerivedLists,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entity count across the id-keyed collections.
    pub fn entity_count(&self) -> usize {
        self.models.len() + self.instances.len() + self.resources.len() + self.splines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ModelKind;

    #[test]
    fn new_level_is_empty() {
        let level = Level::new();
        assert_eq!(level.entity_count(), 0);
        assert!(level.params.is_empty());
        assert_eq!(level.derived, DerivedLists::default());
    }

    #[test]
    fn entity_count_sums_collections() {
        let mut level = Level::new();
        level.models.push(ModelDef::new(
            EntityId::new(1),
            ModelKind::Static { scale: 1.0 },
            vec![],
        ));
        level.instances.push(Instance::new(EntityId::new(1), None));
        level.resources.push(Resource::new(EntityId::new(1), 2, 2, vec![0; 4]));
        assert_eq!(level.entity_count(), 3);
    }

    #[test]
    fn cloning_a_level_is_deep() {
        let mut level = Level::new();
        level.resources.push(Resource::new(EntityId::new(1), 2, 2, vec![1, 2, 3, 4]));

        let mut copy = level.clone();
        copy.resources
            .get_mut(EntityId::new(1))
            .unwrap()
            .data[0] = 99;

        assert_eq!(level.resources.get(EntityId::new(1)).unwrap().data[0], 1);
    }
}
