//! Asset record types and the [`Entity`] contract.
//!
//! Every record derives `Clone`: copying an entity between Levels is always
//! a single deep clone, never a field-by-field copy. References held by an
//! [`Instance`] are raw ids wrapped in `Option` — "no target" is an explicit
//! absent value, never a dangling sentinel.

use serde::{Deserialize, Serialize};

use crate::id::{EntityId, Namespace};

/// Contract shared by every id-keyed asset record.
pub trait Entity: Clone {
    /// The namespace this entity's id is unique within.
    const NAMESPACE: Namespace;

    fn id(&self) -> EntityId;

    /// Reassign the id. Callers (the conflict resolver) are responsible for
    /// rewriting references afterwards.
    fn set_id(&mut self, id: EntityId);
}

/// Position, rotation, and uniform scale of a placed instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: 1.0,
        }
    }
}

/// The known model variants.
///
/// Variant-specific fields are reached through the capability accessors on
/// [`ModelDef`] (`scale_mut`, `joint_count`), so a caller that needs an
/// optional field checks for it explicitly instead of probing by name.
/// Records the loader could not decode stay [`ModelKind::Opaque`] and
/// serialize back byte-for-byte from the payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ModelKind {
    Static { scale: f32 },
    Animated { scale: f32, joint_count: u16 },
    Opaque,
}

/// A model definition: the shared geometry a placed [`Instance`] points at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelDef {
    pub id: EntityId,
    pub kind: ModelKind,
    /// The raw on-disk record body, owned by this definition.
    pub payload: Vec<u8>,
}

impl ModelDef {
    pub fn new(id: EntityId, kind: ModelKind, payload: Vec<u8>) -> Self {
        Self { id, kind, payload }
    }

    /// Mutable access to the model scale, for variants that carry one.
    pub fn scale_mut(&mut self) -> Option<&mut f32> {
        match &mut self.kind {
            ModelKind::Static { scale } | ModelKind::Animated { scale, .. } => Some(scale),
            ModelKind::Opaque => None,
        }
    }

    /// Joint count, for variants that are skinned.
    pub fn joint_count(&self) -> Option<u16> {
        match self.kind {
            ModelKind::Animated { joint_count, .. } => Some(joint_count),
            _ => None,
        }
    }
}

impl Entity for ModelDef {
    const NAMESPACE: Namespace = Namespace::Model;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

/// A placed occurrence of a model within a Level.
///
/// All outgoing references are nullable; a `None` model is legal (an
/// instance pending assignment), while resource and path references must
/// resolve when present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: EntityId,
    pub model: Option<EntityId>,
    pub resources: Vec<EntityId>,
    /// Optional spline the instance follows.
    pub path: Option<EntityId>,
    /// Index into the owning Level's [`crate::ParamTable`].
    pub param_index: Option<u32>,
    pub transform: Transform,
}

impl Instance {
    pub fn new(id: EntityId, model: Option<EntityId>) -> Self {
        Self {
            id,
            model,
            resources: Vec::new(),
            path: None,
            param_index: None,
            transform: Transform::default(),
        }
    }
}

impl Entity for Instance {
    const NAMESPACE: Namespace = Namespace::Instance;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

/// A shared resource (texture-like): dimensions plus an owned byte payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: EntityId,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Resource {
    pub fn new(id: EntityId, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            id,
            width,
            height,
            data,
        }
    }
}

impl Entity for Resource {
    const NAMESPACE: Namespace = Namespace::Resource;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

/// A curve: control points with one weight per point.
///
/// The weight array length must equal the point count; a disagreement is the
/// `SizeMismatch` violation the validator reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spline {
    pub id: EntityId,
    pub points: Vec<[f32; 3]>,
    pub weights: Vec<f32>,
}

impl Spline {
    pub fn new(id: EntityId, points: Vec<[f32; 3]>, weights: Vec<f32>) -> Self {
        Self {
            id,
            points,
            weights,
        }
    }
}

impl Entity for Spline {
    const NAMESPACE: Namespace = Namespace::Spline;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}
