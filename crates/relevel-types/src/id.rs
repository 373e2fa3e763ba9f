use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer identifier for an entity, unique within its [`Namespace`].
///
/// Identity is always the `(Namespace, EntityId)` pair; the same numeric
/// value may legally appear in two different namespaces (unless the caller
/// opts into a shared id space during conflict resolution).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw numeric value as stored on disk.
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Category of entity whose ids must be unique among themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Namespace {
    Model,
    Instance,
    Resource,
    Spline,
    ParamBlock,
}

impl Namespace {
    /// All namespaces whose entities live in id-keyed collections.
    pub const ALL: [Namespace; 5] = [
        Namespace::Model,
        Namespace::Instance,
        Namespace::Resource,
        Namespace::Spline,
        Namespace::ParamBlock,
    ];

    /// First id considered for fresh allocation in this namespace.
    ///
    /// Spline ids below 100 are well-known path ids referenced by code the
    /// engine never sees, so new splines allocate from the high band. This
    /// is configuration per namespace, not a computed value.
    pub const fn allocation_base(&self) -> u32 {
        match self {
            Namespace::Spline => 100,
            _ => 0,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Namespace::Model => "model",
            Namespace::Instance => "instance",
            Namespace::Resource => "resource",
            Namespace::Spline => "spline",
            Namespace::ParamBlock => "param-block",
        };
        write!(f, "{name}")
    }
}
