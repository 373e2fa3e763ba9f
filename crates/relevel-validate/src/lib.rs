//! Referential-integrity validation for Relevel Levels.
//!
//! [`validate`] is a pure, read-only pass over a [`Level`]: it accumulates
//! every violation it can find and never mutates state, so running it twice
//! on unchanged input produces identical output. Repairing what it reports
//! is the merge orchestrator's job.
//!
//! [`Level`]: relevel_types::Level

pub mod validator;
pub mod violation;

pub use validator::validate;
pub use violation::{Violation, ViolationKind};
