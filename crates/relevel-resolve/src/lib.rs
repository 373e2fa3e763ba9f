//! Identifier conflict resolution.
//!
//! Detects id collisions within a namespace (and across the model/resource
//! namespaces when they serialize into a shared id space), renumbers the
//! losing entities, and rewrites every reference in the Level that pointed
//! at a renumbered id. The resolver owns reference rewriting — a missed
//! rewrite silently corrupts the on-disk format, so it is never left to the
//! caller.

pub mod map;
pub mod resolver;

pub use map::RenumberMap;
pub use resolver::{resolve, IdSpacePolicy};
