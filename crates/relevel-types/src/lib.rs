//! Foundation types for Relevel.
//!
//! This crate provides the identifier, record, and collection types used
//! throughout the Relevel merge engine. Every other Relevel crate depends on
//! `relevel-types`.
//!
//! # Key Types
//!
//! - [`EntityId`] — Integer identifier, unique within a [`Namespace`]
//! - [`Namespace`] — Category of entity whose ids must be unique among themselves
//! - [`ModelDef`], [`Instance`], [`Resource`], [`Spline`] — Asset records
//! - [`ParamTable`] — Position-indexed parameter blocks (indices never compact)
//! - [`Collection`] — Ordered, id-keyed sequence of entities of one namespace
//! - [`Level`] — The donor or target aggregate the merge engine operates on
//! - [`RawRecordSource`] — Loader fallback for records not decoded in memory

pub mod collection;
pub mod entity;
pub mod error;
pub mod id;
pub mod level;
pub mod param;
pub mod raw;

pub use collection::Collection;
pub use entity::{Entity, Instance, ModelDef, ModelKind, Resource, Spline, Transform};
pub use error::TypeError;
pub use id::{EntityId, Namespace};
pub use level::{DerivedLists, Level};
pub use param::{ParamBlock, ParamTable};
pub use raw::RawRecordSource;
