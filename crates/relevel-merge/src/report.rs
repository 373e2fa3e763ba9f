//! The structured result of a merge session.

use relevel_resolve::RenumberMap;
use relevel_validate::Violation;
use serde::{Deserialize, Serialize};

/// Counts, messages, and audit data from one merge session.
///
/// Skippable and repairable conditions are data here, not errors: the
/// caller reads this report and decides whether to proceed to save.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MergeReport {
    /// Resources deep-copied into the target.
    pub resources_imported: usize,
    /// Donor resources that matched an existing target resource.
    pub resources_deduplicated: usize,
    /// Model definitions copied into the target.
    pub models_copied: usize,
    /// Models imported as opaque records through the raw-table fallback.
    pub models_from_fallback: usize,
    /// Instances copied into the target.
    pub instances_copied: usize,
    /// Existing target instances whose transform was updated from the donor.
    pub instances_repositioned: usize,
    /// Parameter blocks appended to the target table.
    pub params_imported: usize,
    /// Per-entity skip messages (missing source data, empty payloads,
    /// models that could not be found).
    pub skipped: Vec<String>,
    /// Every id rewrite this session performed: donor→target id mappings
    /// from import plus conflict renumberings from resolve/repair.
    pub renumbered: RenumberMap,
    /// Violations still present after the repair cycle (or found with
    /// repair unavailable). Non-fatal; the caller decides.
    pub violations: Vec<Violation>,
    /// Validation was bypassed by explicit policy.
    pub validation_skipped: bool,
    /// At least one entity was copied and no fatal condition occurred.
    pub success: bool,
}

impl MergeReport {
    /// Entities of any kind that crossed into the target.
    pub fn copied_total(&self) -> usize {
        self.resources_imported + self.models_copied + self.models_from_fallback
            + self.instances_copied
    }

    /// True when nothing remains for the caller to worry about.
    pub fn is_clean(&self) -> bool {
        self.success && self.violations.is_empty() && !self.validation_skipped
    }

    pub(crate) fn skip(&mut self, message: impl Into<String>) {
        self.skipped.push(message.into());
    }
}
