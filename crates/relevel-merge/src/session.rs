//! The merge session state machine.

use std::collections::{HashMap, HashSet};
use std::fmt;

use relevel_alloc::IdAllocator;
use relevel_dedup::{import_resource, DedupError, ImportOutcome, SignatureIndex};
use relevel_resolve::{resolve, RenumberMap};
use relevel_types::{
    EntityId, Instance, Level, ModelDef, ModelKind, Namespace, RawRecordSource,
};
use relevel_validate::validate;
use tracing::{debug, info, warn};

use crate::error::{MergeError, MergeResult};
use crate::policy::{MergePolicy, Selection};
use crate::repair::repair;
use crate::report::MergeReport;
use crate::sink::{LevelSink, SinkError};

/// Phases of a merge session, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    ImportResources,
    ImportModels,
    ImportInstances,
    Resolve,
    Validate,
    Repair,
    Revalidate,
    Finalize,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

const RESOLVE_NAMESPACES: [Namespace; 4] = [
    Namespace::Model,
    Namespace::Instance,
    Namespace::Resource,
    Namespace::Spline,
];

/// One merge of a donor Level into a target Level.
///
/// The session mutates the caller-owned target in place and returns a
/// [`MergeReport`]; the target's collections must not be touched by anyone
/// else while the session runs. A caller that aborts mid-merge must treat
/// the target as unspecified and discard it rather than save.
pub struct MergeSession {
    policy: MergePolicy,
    fallback: Option<Box<dyn RawRecordSource>>,
}

impl MergeSession {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            fallback: None,
        }
    }

    /// Attach the loader's low-level record table, consulted when a model id
    /// is missing from the donor's in-memory collection.
    pub fn with_fallback(mut self, source: Box<dyn RawRecordSource>) -> Self {
        self.fallback = Some(source);
        self
    }

    pub fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    /// Run the full merge: import the selected donor entities, resolve id
    /// conflicts, validate, repair at most once, and finalize the target's
    /// derived lists.
    ///
    /// Skippable and repairable conditions end up in the report; the only
    /// errors are session-fatal and occur before the target is mutated.
    pub fn merge(
        &self,
        target: &mut Level,
        donor: &Level,
        selection: &Selection,
    ) -> MergeResult<MergeReport> {
        if donor.entity_count() == 0 {
            return Err(MergeError::EmptyDonor);
        }

        let mut report = MergeReport::default();
        let mut rewrites = RenumberMap::new();

        if self.policy.map_resources {
            info!(phase = %Phase::ImportResources, "merge phase");
            self.import_resources(target, donor, selection, &mut rewrites, &mut report);
        }
        if self.policy.import_models {
            info!(phase = %Phase::ImportModels, "merge phase");
            self.import_models(target, donor, selection, &mut report);
        }
        info!(phase = %Phase::ImportInstances, "merge phase");
        self.import_instances(target, donor, selection, &mut rewrites, &mut report);
        report.renumbered.merge(rewrites);

        info!(phase = %Phase::Resolve, "merge phase");
        let resolved = resolve(target, &RESOLVE_NAMESPACES, self.policy.id_space);
        report.renumbered.merge(resolved);

        if self.policy.skip_validation {
            warn!("validation skipped by explicit policy; saved output may violate referential integrity");
            report.validation_skipped = true;
        } else {
            info!(phase = %Phase::Validate, "merge phase");
            let violations = validate(target);
            if !violations.is_empty() {
                info!(phase = %Phase::Repair, found = violations.len(), "repairing violations");
                let summary = repair(target, self.policy.id_space);
                report.renumbered.merge(summary.renumbered);

                info!(phase = %Phase::Revalidate, "merge phase");
                report.violations = validate(target);
                if !report.violations.is_empty() {
                    warn!(
                        remaining = report.violations.len(),
                        "violations remain after repair"
                    );
                }
            }
        }

        info!(phase = %Phase::Finalize, "merge phase");
        finalize(target);

        report.success = report.copied_total() > 0 || report.instances_repositioned > 0;
        info!(
            copied = report.copied_total(),
            skipped = report.skipped.len(),
            success = report.success,
            "merge session complete"
        );
        Ok(report)
    }

    /// Re-finalize the target and hand it to the save collaborator.
    ///
    /// Separate from [`merge`](Self::merge) so the caller can read the
    /// report first and decide whether to save at all.
    pub fn commit(&self, target: &mut Level, sink: &mut dyn LevelSink) -> Result<(), SinkError> {
        finalize(target);
        sink.save(target)
    }

    /// Import every resource referenced by the selected donor instances,
    /// deduplicating against the target collection.
    fn import_resources(
        &self,
        target: &mut Level,
        donor: &Level,
        selection: &Selection,
        rewrites: &mut RenumberMap,
        report: &mut MergeReport,
    ) {
        let mut wanted = Vec::new();
        let mut seen = HashSet::new();
        for instance in &donor.instances {
            if !instance_selected(instance, selection) {
                continue;
            }
            for &id in &instance.resources {
                if seen.insert(id) {
                    wanted.push(id);
                }
            }
        }

        let mut index = SignatureIndex::build(&target.resources);
        for id in wanted {
            let Some(resource) = donor.resources.get(id) else {
                report.skip(format!("resource {id}: missing source data"));
                continue;
            };
            match import_resource(resource, &mut target.resources, &mut index) {
                Ok(outcome) => {
                    match outcome {
                        ImportOutcome::Matched(existing) => {
                            debug!(donor = %id, target = %existing, "resource deduplicated");
                            report.resources_deduplicated += 1;
                        }
                        ImportOutcome::Appended(new) => {
                            debug!(donor = %id, target = %new, "resource imported");
                            report.resources_imported += 1;
                        }
                    }
                    if outcome.id() != id {
                        rewrites.record(Namespace::Resource, id, outcome.id());
                    }
                }
                Err(DedupError::EmptyResource(_)) => {
                    report.skip(format!("resource {id}: empty payload"));
                }
            }
        }
    }

    /// Deep-copy selected donor model definitions absent from the target.
    fn import_models(
        &self,
        target: &mut Level,
        donor: &Level,
        selection: &Selection,
        report: &mut MergeReport,
    ) {
        for model in donor.models.iter().filter(|m| selection.matches(m.id)) {
            if target.models.contains_id(model.id) {
                continue;
            }
            target.models.push(model.clone());
            report.models_copied += 1;
        }
    }

    /// Copy selected donor instances not already represented in the target,
    /// rewriting their references as they cross over.
    fn import_instances(
        &self,
        target: &mut Level,
        donor: &Level,
        selection: &Selection,
        rewrites: &mut RenumberMap,
        report: &mut MergeReport,
    ) {
        // Snapshot target occupancy per model id before anything is copied:
        // a donor instance is "already present" when the target still has an
        // uncopied instance of the same model at the same ordinal.
        let mut existing: HashMap<Option<u32>, Vec<EntityId>> = HashMap::new();
        for instance in &target.instances {
            existing
                .entry(instance.model.map(|m| m.value()))
                .or_default()
                .push(instance.id);
        }

        let mut allocator = IdAllocator::new(Namespace::Instance, target.instances.used_ids());
        let mut ordinal: HashMap<Option<u32>, usize> = HashMap::new();

        for instance in &donor.instances {
            if !instance_selected(instance, selection) {
                continue;
            }

            let key = instance.model.map(|m| m.value());
            let position = *ordinal
                .entry(key)
                .and_modify(|p| *p += 1)
                .or_insert(0usize);

            let matched = existing.get(&key).and_then(|ids| ids.get(position));
            if let Some(&target_id) = matched {
                if self.policy.reposition_existing {
                    if let Some(present) = target.instances.get_mut(target_id) {
                        present.transform = instance.transform;
                        report.instances_repositioned += 1;
                    }
                }
                continue;
            }

            if !self.policy.copy_missing {
                continue;
            }

            if let Some(model) = instance.model {
                if !self.ensure_model(target, donor, model, report) {
                    report.skip(format!(
                        "instance {}: model {model} not found",
                        instance.id
                    ));
                    continue;
                }
            }

            let mut copy = instance.clone();
            let hint = allocator.highest_used().map_or(0, |h| h + 1);
            let new_id = allocator.next_free(hint);
            if new_id != instance.id {
                rewrites.record(Namespace::Instance, instance.id, new_id);
            }
            copy.id = new_id;

            for resource in copy.resources.iter_mut() {
                *resource = rewrites.rewrite(Namespace::Resource, *resource);
            }

            // Paths into donor-only splines are cleared on copy; "absent" is
            // always representable, a dangling path is not.
            if let Some(path) = copy.path {
                if !target.splines.contains_id(path) {
                    debug!(instance = %copy.id, spline = %path, "clearing path into donor-only spline");
                    copy.path = None;
                }
            }

            copy.param_index = match instance.param_index {
                Some(index) => match donor.params.get(index) {
                    Some(block) => {
                        let new_index = target.params.insert(block.clone());
                        report.params_imported += 1;
                        Some(new_index)
                    }
                    None => {
                        report.skip(format!(
                            "instance {}: param block {index} missing from donor",
                            instance.id
                        ));
                        None
                    }
                },
                None => None,
            };

            target.instances.push(copy);
            report.instances_copied += 1;
        }
    }

    /// Make sure `model` exists in the target, pulling it from the donor or
    /// the raw-table fallback when policy and availability allow.
    fn ensure_model(
        &self,
        target: &mut Level,
        donor: &Level,
        model: EntityId,
        report: &mut MergeReport,
    ) -> bool {
        if target.models.contains_id(model) {
            return true;
        }

        if self.policy.import_models {
            if let Some(def) = donor.models.get(model) {
                target.models.push(def.clone());
                report.models_copied += 1;
                return true;
            }
        }

        if let Some(fallback) = &self.fallback {
            if let Some(bytes) = fallback.find_record(Namespace::Model, model) {
                debug!(model = %model, "imported model from raw-table fallback");
                target
                    .models
                    .push(ModelDef::new(model, ModelKind::Opaque, bytes));
                report.models_from_fallback += 1;
                return true;
            }
        }

        false
    }
}

fn instance_selected(instance: &Instance, selection: &Selection) -> bool {
    match instance.model {
        Some(model) => selection.matches(model),
        // An instance with no model can only be selected wholesale.
        None => matches!(selection, Selection::All),
    }
}

/// Rebuild the target's derived index lists from the consistent collections.
///
/// Idempotent: finalizing an already-finalized Level produces identical
/// lists.
pub fn finalize(level: &mut Level) {
    level.derived.model_ids = level
        .models
        .used_ids()
        .into_iter()
        .map(EntityId::new)
        .collect();
    level.derived.instance_order = level.instances.ids_in_order();
}
