//! Alignment-safe block serialization.
//!
//! Each entity kind encodes to a little-endian record ([`BlockSerialize`]),
//! which [`pad`] zero-extends to the kind's fixed element size and then to
//! the coarser disk-alignment boundary. Padding is append-only; the input
//! bytes are never altered or truncated. Composing padded blocks into
//! on-disk tables is the orchestrator/saver's job — this crate knows one
//! entity at a time.

pub mod pad;
pub mod serialize;

pub use pad::{pad, DISK_ALIGNMENT};
pub use serialize::{BlockSerialize, ABSENT_REF};
