//! Identifier allocation for one namespace within one merge session.
//!
//! An [`IdAllocator`] owns the set of ids in use and hands out the smallest
//! free id at or above a hint. Ownership of the set is what makes the
//! contract incremental: once an id is issued it is recorded, so a later
//! call can never issue it again within the session. There are no hidden
//! process-wide counters — a session seeds an allocator from the collections
//! it is about to touch and discards it when the session ends.

pub mod allocator;

pub use allocator::IdAllocator;
