//! The bounded, deterministic repair pass.
//!
//! Repairs the three structural violation classes: duplicate ids are
//! renumbered through the conflict resolver, dangling references are nulled
//! out (list references are dropped), and spline weight arrays are
//! truncated or extended to match the point count. Each pass is idempotent,
//! so the orchestrator can revalidate after a single run without looping.

use relevel_resolve::{resolve, IdSpacePolicy, RenumberMap};
use relevel_types::{Level, Namespace};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Step used to extrapolate missing weights when a spline has fewer weights
/// than points and too few values to derive a spacing from.
const DEFAULT_WEIGHT_STEP: f32 = 1.0;

/// What one repair pass did.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairSummary {
    /// Duplicate-id renumberings applied.
    pub renumbered: RenumberMap,
    /// Dangling references cleared to "absent" (or dropped, for lists).
    pub references_cleared: usize,
    /// Splines whose weight array was truncated or extended.
    pub weights_adjusted: usize,
}

impl RepairSummary {
    pub fn changed_anything(&self) -> bool {
        !self.renumbered.is_empty() || self.references_cleared > 0 || self.weights_adjusted > 0
    }
}

/// Run every structural repair on the Level.
pub fn repair(level: &mut Level, id_space: IdSpacePolicy) -> RepairSummary {
    let renumbered = resolve(
        level,
        &[
            Namespace::Model,
            Namespace::Instance,
            Namespace::Resource,
            Namespace::Spline,
        ],
        id_space,
    );

    let references_cleared = clear_dangling_references(level);
    let weights_adjusted = fix_spline_weights(level);

    RepairSummary {
        renumbered,
        references_cleared,
        weights_adjusted,
    }
}

fn clear_dangling_references(level: &mut Level) -> usize {
    let mut cleared = 0;

    // Split borrows: collect the referenced-id universe first.
    let model_ids = level.models.used_ids();
    let resource_ids = level.resources.used_ids();
    let spline_ids = level.splines.used_ids();
    let param_len = level.params.len() as u32;
    let live_param = |index: u32| index < param_len && level.params.get(index).is_some();

    let mut dead_params = Vec::new();
    for instance in level.instances.iter_mut() {
        if let Some(model) = instance.model {
            if !model_ids.contains(&model.value()) {
                debug!(instance = %instance.id, model = %model, "clearing dangling model reference");
                instance.model = None;
                cleared += 1;
            }
        }

        let before = instance.resources.len();
        instance
            .resources
            .retain(|id| resource_ids.contains(&id.value()));
        cleared += before - instance.resources.len();

        if let Some(path) = instance.path {
            if !spline_ids.contains(&path.value()) {
                instance.path = None;
                cleared += 1;
            }
        }

        if let Some(index) = instance.param_index {
            dead_params.push((instance.id, index));
        }
    }

    for (instance_id, index) in dead_params {
        if !live_param(index) {
            if let Some(instance) = level.instances.get_mut(instance_id) {
                instance.param_index = None;
                cleared += 1;
            }
        }
    }

    cleared
}

fn fix_spline_weights(level: &mut Level) -> usize {
    let mut adjusted = 0;
    for spline in level.splines.iter_mut() {
        let points = spline.points.len();
        let weights = spline.weights.len();
        if points == weights {
            continue;
        }

        if weights > points {
            spline.weights.truncate(points);
        } else {
            let step = match spline.weights.as_slice() {
                [.., a, b] => b - a,
                _ => DEFAULT_WEIGHT_STEP,
            };
            let last = spline.weights.last().copied().unwrap_or(0.0);
            for i in 1..=(points - weights) {
                spline.weights.push(last + step * i as f32);
            }
        }
        debug!(spline = %spline.id, points, weights, "adjusted weight array");
        adjusted += 1;
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use relevel_types::{EntityId, Instance, ModelDef, ModelKind, ParamBlock, Resource, Spline};
    use relevel_validate::validate;

    use super::*;

    fn model(id: u32) -> ModelDef {
        ModelDef::new(EntityId::new(id), ModelKind::Static { scale: 1.0 }, vec![0])
    }

    #[test]
    fn nulls_dangling_model_and_path_references() {
        let mut level = Level::new();
        let mut inst = Instance::new(EntityId::new(1), Some(EntityId::new(99)));
        inst.path = Some(EntityId::new(500));
        level.instances.push(inst);

        let summary = repair(&mut level, IdSpacePolicy::SeparateSpaces);

        assert_eq!(summary.references_cleared, 2);
        let inst = level.instances.get(EntityId::new(1)).unwrap();
        assert!(inst.model.is_none());
        assert!(inst.path.is_none());
    }

    #[test]
    fn drops_dangling_resource_references_keeping_live_ones() {
        let mut level = Level::new();
        level.models.push(model(5));
        level
            .resources
            .push(Resource::new(EntityId::new(3), 8, 8, vec![1; 16]));
        let mut inst = Instance::new(EntityId::new(1), Some(EntityId::new(5)));
        inst.resources = vec![EntityId::new(3), EntityId::new(4)];
        level.instances.push(inst);

        let summary = repair(&mut level, IdSpacePolicy::SeparateSpaces);

        assert_eq!(summary.references_cleared, 1);
        assert_eq!(
            level.instances.get(EntityId::new(1)).unwrap().resources,
            vec![EntityId::new(3)]
        );
    }

    #[test]
    fn clears_param_index_pointing_at_a_hole() {
        let mut level = Level::new();
        level.models.push(model(5));
        let index = level.params.insert(ParamBlock::new(vec![1]));
        let mut inst = Instance::new(EntityId::new(1), Some(EntityId::new(5)));
        inst.param_index = Some(index);
        level.instances.push(inst);
        level.params.remove(index);

        let summary = repair(&mut level, IdSpacePolicy::SeparateSpaces);

        assert_eq!(summary.references_cleared, 1);
        assert!(level
            .instances
            .get(EntityId::new(1))
            .unwrap()
            .param_index
            .is_none());
    }

    #[test]
    fn renumbers_duplicates_through_the_resolver() {
        let mut level = Level::new();
        level.models.push(model(7));
        level.models.push(model(7));

        let summary = repair(&mut level, IdSpacePolicy::SeparateSpaces);

        assert_eq!(summary.renumbered.len(), 1);
        assert_eq!(level.models.used_ids().len(), 2);
    }

    #[test]
    fn extends_short_weight_arrays_by_the_last_known_step() {
        let mut level = Level::new();
        level.splines.push(Spline::new(
            EntityId::new(101),
            vec![[0.0; 3]; 10],
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        ));

        let summary = repair(&mut level, IdSpacePolicy::SeparateSpaces);

        assert_eq!(summary.weights_adjusted, 1);
        let spline = level.splines.get(EntityId::new(101)).unwrap();
        assert_eq!(spline.weights.len(), 10);
        // First six preserved, remainder extrapolated by the last step.
        assert_eq!(&spline.weights[..6], &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(&spline.weights[6..], &[6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn truncates_long_weight_arrays() {
        let mut level = Level::new();
        level.splines.push(Spline::new(
            EntityId::new(101),
            vec![[0.0; 3]; 2],
            vec![1.0, 2.0, 3.0, 4.0],
        ));

        repair(&mut level, IdSpacePolicy::SeparateSpaces);

        let spline = level.splines.get(EntityId::new(101)).unwrap();
        assert_eq!(spline.weights, vec![1.0, 2.0]);
    }

    #[test]
    fn single_weight_extends_by_the_default_step() {
        let mut level = Level::new();
        level
            .splines
            .push(Spline::new(EntityId::new(101), vec![[0.0; 3]; 3], vec![5.0]));

        repair(&mut level, IdSpacePolicy::SeparateSpaces);

        let spline = level.splines.get(EntityId::new(101)).unwrap();
        assert_eq!(spline.weights, vec![5.0, 6.0, 7.0]);
    }

    #[test]
    fn repaired_level_passes_validation_modulo_nulls() {
        let mut level = Level::new();
        level.models.push(model(7));
        level.models.push(model(7));
        let mut inst = Instance::new(EntityId::new(1), Some(EntityId::new(7)));
        inst.resources = vec![EntityId::new(40)];
        level.instances.push(inst);
        level.splines.push(Spline::new(
            EntityId::new(101),
            vec![[0.0; 3]; 4],
            vec![0.0; 2],
        ));

        repair(&mut level, IdSpacePolicy::SeparateSpaces);

        // Everything left is legal; the nulled references were optional ones.
        assert!(validate(&level).is_empty());
    }

    #[test]
    fn repair_is_idempotent() {
        let mut level = Level::new();
        level.models.push(model(7));
        level.models.push(model(7));
        level
            .splines
            .push(Spline::new(EntityId::new(101), vec![[0.0; 3]; 3], vec![1.0]));

        let first = repair(&mut level, IdSpacePolicy::SeparateSpaces);
        assert!(first.changed_anything());

        let second = repair(&mut level, IdSpacePolicy::SeparateSpaces);
        assert!(!second.changed_anything());
    }
}
