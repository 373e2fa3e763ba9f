//! Caller-supplied merge policy.
//!
//! The interactive menu (or any other front end) builds one of these and
//! hands it to the session; no prompt ever runs inside the engine.

use std::collections::BTreeSet;

use relevel_resolve::IdSpacePolicy;
use relevel_types::EntityId;
use serde::{Deserialize, Serialize};

/// The knobs controlling one merge session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MergePolicy {
    /// Update transform fields of already-present target instances from the
    /// matching donor instances instead of leaving them untouched.
    pub reposition_existing: bool,
    /// Copy donor instances absent from the target.
    pub copy_missing: bool,
    /// Also copy model definitions, not just instances of them.
    pub import_models: bool,
    /// Run deduplication/import for shared resources.
    pub map_resources: bool,
    /// Bypass validation and repair entirely. A debug escape hatch: the
    /// saved output may violate referential integrity. Always logged.
    pub skip_validation: bool,
    /// Whether model and resource ids share one numeric space.
    pub id_space: IdSpacePolicy,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            reposition_existing: false,
            copy_missing: true,
            import_models: false,
            map_resources: true,
            skip_validation: false,
            id_space: IdSpacePolicy::SeparateSpaces,
        }
    }
}

/// Which donor entities a session operates on, keyed by model id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Every donor entity.
    All,
    /// Only donor models with these ids, and the instances placed on them.
    Models(BTreeSet<u32>),
}

impl Selection {
    pub fn of_models<I: IntoIterator<Item = u32>>(ids: I) -> Self {
        Selection::Models(ids.into_iter().collect())
    }

    pub fn matches(&self, model: EntityId) -> bool {
        match self {
            Selection::All => true,
            Selection::Models(ids) => ids.contains(&model.value()),
        }
    }
}
