//! The Relevel merge orchestrator.
//!
//! Sequences the per-category import phases over a donor and target
//! [`Level`], then resolves id conflicts, validates, runs at most one repair
//! cycle, and finalizes the target's derived index lists:
//!
//! ```text
//! Init → ImportResources → ImportModels → ImportInstances
//!      → Resolve → Validate → (Repair → Revalidate)? → Finalize
//! ```
//!
//! All skippable and repairable conditions are reported in the returned
//! [`MergeReport`], never raised as errors; only session-fatal conditions
//! (nothing to merge from) abort before the target is touched. Saving the
//! finalized Level is the caller's decision, made after reading the report,
//! through the [`LevelSink`] collaborator.
//!
//! [`Level`]: relevel_types::Level

pub mod error;
pub mod policy;
pub mod repair;
pub mod report;
pub mod session;
pub mod sink;

pub use error::{MergeError, MergeResult};
pub use policy::{MergePolicy, Selection};
pub use repair::{repair, RepairSummary};
pub use report::MergeReport;
pub use session::{finalize, MergeSession};
pub use sink::{InMemorySink, LevelSink, SinkError};
