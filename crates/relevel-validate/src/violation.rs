use std::fmt;

use relevel_types::{EntityId, Namespace};
use serde::{Deserialize, Serialize};

/// A specific integrity violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Namespace of the entity the violation was detected on.
    pub namespace: Namespace,
    /// Id of that entity.
    pub entity: EntityId,
    pub kind: ViolationKind,
    pub description: String,
}

impl Violation {
    pub fn new(
        namespace: Namespace,
        entity: EntityId,
        kind: ViolationKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            namespace,
            entity,
            kind,
            description: description.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} on {} {}: {}",
            self.kind, self.namespace, self.entity, self.description
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A reference that must be present is absent. Instance model references
    /// are required; path, parameter, and resource references are legally
    /// nullable and never reported.
    NullReference,
    /// A reference points at an id not present in the owning collection.
    DanglingReference,
    /// Two entities in one collection share an id.
    DuplicateId,
    /// A resource's logical element count disagrees with a dependent
    /// buffer's length (spline points vs. weights).
    SizeMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_entity() {
        let v = Violation::new(
            Namespace::Instance,
            EntityId::new(12),
            ViolationKind::DanglingReference,
            "model 7 not found",
        );
        let rendered = v.to_string();
        assert!(rendered.contains("instance 12"));
        assert!(rendered.contains("model 7 not found"));
    }

    #[test]
    fn serde_roundtrip() {
        let v = Violation::new(
            Namespace::Spline,
            EntityId::new(101),
            ViolationKind::SizeMismatch,
            "10 points, 6 weights",
        );
        let json = serde_json::to_string(&v).unwrap();
        let parsed: Violation = serde_json::from_str(&json).unwrap();
        assert_eq!(v, parsed);
    }
}
