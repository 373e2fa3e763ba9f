use std::collections::HashSet;

use relevel_types::{Collection, Entity, Level, Namespace};

use crate::violation::{Violation, ViolationKind};

/// Scan a Level for every integrity violation.
///
/// Checks run in a fixed order (duplicate ids per collection, then instance
/// references, then spline buffer sizes) so output is deterministic and the
/// pass is idempotent.
pub fn validate(level: &Level) -> Vec<Violation> {
    let mut violations = Vec::new();

    duplicate_ids(&level.models, &mut violations);
    duplicate_ids(&level.instances, &mut violations);
    duplicate_ids(&level.resources, &mut violations);
    duplicate_ids(&level.splines, &mut violations);

    instance_references(level, &mut violations);
    spline_sizes(level, &mut violations);

    violations
}

fn duplicate_ids<T: Entity>(collection: &Collection<T>, out: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for entity in collection {
        if !seen.insert(entity.id()) {
            out.push(Violation::new(
                T::NAMESPACE,
                entity.id(),
                ViolationKind::DuplicateId,
                format!("id {} appears more than once", entity.id()),
            ));
        }
    }
}

fn instance_references(level: &Level, out: &mut Vec<Violation>) {
    for instance in &level.instances {
        match instance.model {
            None => out.push(Violation::new(
                Namespace::Instance,
                instance.id,
                ViolationKind::NullReference,
                "instance has no model",
            )),
            Some(model) if !level.models.contains_id(model) => out.push(Violation::new(
                Namespace::Instance,
                instance.id,
                ViolationKind::DanglingReference,
                format!("model {model} not found"),
            )),
            Some(_) => {}
        }

        for &resource in &instance.resources {
            if !level.resources.contains_id(resource) {
                out.push(Violation::new(
                    Namespace::Instance,
                    instance.id,
                    ViolationKind::DanglingReference,
                    format!("resource {resource} not found"),
                ));
            }
        }

        if let Some(path) = instance.path {
            if !level.splines.contains_id(path) {
                out.push(Violation::new(
                    Namespace::Instance,
                    instance.id,
                    ViolationKind::DanglingReference,
                    format!("spline {path} not found"),
                ));
            }
        }

        if let Some(index) = instance.param_index {
            if level.params.get(index).is_none() {
                out.push(Violation::new(
                    Namespace::Instance,
                    instance.id,
                    ViolationKind::DanglingReference,
                    format!("param block index {index} is empty or out of range"),
                ));
            }
        }
    }
}

fn spline_sizes(level: &Level, out: &mut Vec<Violation>) {
    for spline in &level.splines {
        if spline.points.len() != spline.weights.len() {
            out.push(Violation::new(
                Namespace::Spline,
                spline.id,
                ViolationKind::SizeMismatch,
                format!(
                    "{} points, {} weights",
                    spline.points.len(),
                    spline.weights.len()
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use relevel_types::{
        EntityId, Instance, Level, ModelDef, ModelKind, ParamBlock, Resource, Spline,
    };

    use super::*;

    fn model(id: u32) -> ModelDef {
        ModelDef::new(EntityId::new(id), ModelKind::Static { scale: 1.0 }, vec![0])
    }

    fn level_with_model(id: u32) -> Level {
        let mut level = Level::new();
        level.models.push(model(id));
        level
    }

    #[test]
    fn clean_level_has_no_violations() {
        let mut level = level_with_model(501);
        let mut inst = Instance::new(EntityId::new(1), Some(EntityId::new(501)));
        level
            .resources
            .push(Resource::new(EntityId::new(3), 8, 8, vec![1; 16]));
        inst.resources.push(EntityId::new(3));
        level.instances.push(inst);

        assert!(validate(&level).is_empty());
    }

    #[test]
    fn null_model_reference_is_reported() {
        let mut level = Level::new();
        level.instances.push(Instance::new(EntityId::new(1), None));

        let violations = validate(&level);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::NullReference);
        assert_eq!(violations[0].entity, EntityId::new(1));
    }

    #[test]
    fn dangling_model_reference_is_reported() {
        let mut level = Level::new();
        level
            .instances
            .push(Instance::new(EntityId::new(1), Some(EntityId::new(7))));

        let violations = validate(&level);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::DanglingReference);
    }

    #[test]
    fn dangling_resource_path_and_param_references_are_reported() {
        let mut level = level_with_model(5);
        let mut inst = Instance::new(EntityId::new(1), Some(EntityId::new(5)));
        inst.resources.push(EntityId::new(40));
        inst.path = Some(EntityId::new(200));
        inst.param_index = Some(3);
        level.instances.push(inst);

        let violations = validate(&level);
        let kinds: Vec<_> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::DanglingReference,
                ViolationKind::DanglingReference,
                ViolationKind::DanglingReference,
            ]
        );
    }

    #[test]
    fn absent_optional_references_are_legal() {
        let mut level = level_with_model(5);
        // No resources, no path, no param index: all legally absent.
        level
            .instances
            .push(Instance::new(EntityId::new(1), Some(EntityId::new(5))));

        assert!(validate(&level).is_empty());
    }

    #[test]
    fn removed_param_block_leaves_a_dangling_index() {
        let mut level = level_with_model(5);
        let mut inst = Instance::new(EntityId::new(1), Some(EntityId::new(5)));
        let index = level.params.insert(ParamBlock::new(vec![1, 2]));
        inst.param_index = Some(index);
        level.instances.push(inst);
        assert!(validate(&level).is_empty());

        level.params.remove(index);
        let violations = validate(&level);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::DanglingReference);
    }

    #[test]
    fn duplicate_ids_reported_once_per_extra_occupant() {
        let mut level = Level::new();
        level.models.push(model(7));
        level.models.push(model(7));
        level.models.push(model(7));

        let violations = validate(&level);
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|v| v.kind == ViolationKind::DuplicateId));
    }

    #[test]
    fn spline_size_mismatch_is_reported() {
        let mut level = Level::new();
        level.splines.push(Spline::new(
            EntityId::new(101),
            vec![[0.0; 3]; 10],
            vec![0.0; 6],
        ));

        let violations = validate(&level);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::SizeMismatch);
        assert!(violations[0].description.contains("10 points, 6 weights"));
    }

    #[test]
    fn validation_is_idempotent() {
        let mut level = Level::new();
        level.models.push(model(7));
        level.models.push(model(7));
        level
            .instances
            .push(Instance::new(EntityId::new(1), Some(EntityId::new(99))));

        let first = validate(&level);
        let second = validate(&level);
        assert_eq!(first, second);
    }
}
