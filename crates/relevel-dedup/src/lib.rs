//! Content-signature deduplication of shared resources.
//!
//! Two resources from different Levels count as "the same" when their
//! [`Signature`]s match: identical dimensions, identical payload length, and
//! an identical BLAKE3 digest over deterministically sampled payload windows.
//! A signature is a matching heuristic, not a cryptographic identity; on a
//! signature miss a bounded probe comparison catches near-collisions before
//! a copy is made.
//!
//! # Sampling tolerance
//!
//! The digest covers the payload length, a 64-byte head and tail window, and
//! eight evenly spaced 64-byte windows in between. A false positive requires
//! two payloads agreeing in dimensions, length, and every sampled window; a
//! false negative cannot occur for byte-identical payloads because sampling
//! is a pure function of the length. Differences confined entirely to
//! unsampled gaps of payloads longer than ~640 bytes are the accepted risk.

pub mod error;
pub mod import;
pub mod signature;

pub use error::{DedupError, DedupResult};
pub use import::{import_resource, ImportOutcome};
pub use signature::{Signature, SignatureIndex};
