//! Little-endian record encoding per entity kind.
//!
//! Layouts mirror the on-disk container format: raw u32 ids, absent
//! references encoded as [`ABSENT_REF`], IEEE-754 floats. Decoding records
//! back (`fromBytes`) belongs to the Level loader, not this crate.

use relevel_types::{Instance, ModelDef, ModelKind, Resource, Spline};

use crate::pad::{pad, DISK_ALIGNMENT};

/// On-disk encoding of an absent reference.
pub const ABSENT_REF: u32 = u32::MAX;

const MODEL_ELEMENT_SIZE: usize = 0x40;
const INSTANCE_ELEMENT_SIZE: usize = 0x50;
const RESOURCE_ELEMENT_SIZE: usize = 0x10;
const SPLINE_ELEMENT_SIZE: usize = 0x10;

/// One logical record serialized to bytes.
pub trait BlockSerialize {
    /// The fixed on-disk record size for this entity type; short encodings
    /// are zero-extended to it.
    fn element_size(&self) -> usize;

    /// Encode this record, little-endian, without padding.
    fn to_bytes(&self) -> Vec<u8>;

    /// Encode and pad to the element size and disk alignment.
    fn to_block(&self) -> Vec<u8> {
        pad(self.to_bytes(), self.element_size(), DISK_ALIGNMENT)
    }
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_f32(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_ref(out: &mut Vec<u8>, reference: Option<relevel_types::EntityId>) {
    put_u32(out, reference.map_or(ABSENT_REF, |id| id.value()));
}

impl BlockSerialize for ModelDef {
    fn element_size(&self) -> usize {
        MODEL_ELEMENT_SIZE
    }

    /// Layout: id, kind tag (u16), joint count (u16), scale, payload length,
    /// payload. [`ModelKind::Opaque`] records are undecoded loader bytes and
    /// serialize back byte-for-byte as the payload alone.
    fn to_bytes(&self) -> Vec<u8> {
        if self.kind == ModelKind::Opaque {
            return self.payload.clone();
        }

        let mut out = Vec::with_capacity(MODEL_ELEMENT_SIZE + self.payload.len());
        put_u32(&mut out, self.id.value());
        match self.kind {
            ModelKind::Static { scale } => {
                out.extend_from_slice(&0u16.to_le_bytes());
                out.extend_from_slice(&0u16.to_le_bytes());
                put_f32(&mut out, scale);
            }
            ModelKind::Animated { scale, joint_count } => {
                out.extend_from_slice(&1u16.to_le_bytes());
                out.extend_from_slice(&joint_count.to_le_bytes());
                put_f32(&mut out, scale);
            }
            ModelKind::Opaque => unreachable!("handled above"),
        }
        put_u32(&mut out, self.payload.len() as u32);
        out.extend_from_slice(&self.payload);
        out
    }
}

impl BlockSerialize for Instance {
    fn element_size(&self) -> usize {
        INSTANCE_ELEMENT_SIZE
    }

    /// Layout: id, model ref, path ref, param index, position, rotation,
    /// scale, resource count, resource ids.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(INSTANCE_ELEMENT_SIZE);
        put_u32(&mut out, self.id.value());
        put_ref(&mut out, self.model);
        put_ref(&mut out, self.path);
        put_u32(&mut out, self.param_index.unwrap_or(ABSENT_REF));
        for axis in self.transform.position {
            put_f32(&mut out, axis);
        }
        for axis in self.transform.rotation {
            put_f32(&mut out, axis);
        }
        put_f32(&mut out, self.transform.scale);
        put_u32(&mut out, self.resources.len() as u32);
        for &resource in &self.resources {
            put_u32(&mut out, resource.value());
        }
        out
    }
}

impl BlockSerialize for Resource {
    fn element_size(&self) -> usize {
        RESOURCE_ELEMENT_SIZE
    }

    /// Layout: id, width, height, payload length, payload.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(RESOURCE_ELEMENT_SIZE + self.data.len());
        put_u32(&mut out, self.id.value());
        put_u32(&mut out, self.width);
        put_u32(&mut out, self.height);
        put_u32(&mut out, self.data.len() as u32);
        out.extend_from_slice(&self.data);
        out
    }
}

impl BlockSerialize for Spline {
    fn element_size(&self) -> usize {
        SPLINE_ELEMENT_SIZE
    }

    /// Layout: id, point count, points (xyz), one weight per point.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(SPLINE_ELEMENT_SIZE + self.points.len() * 16);
        put_u32(&mut out, self.id.value());
        put_u32(&mut out, self.points.len() as u32);
        for point in &self.points {
            for &axis in point {
                put_f32(&mut out, axis);
            }
        }
        for &weight in &self.weights {
            put_f32(&mut out, weight);
        }
        out
    }
}
