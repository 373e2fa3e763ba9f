//! Position-indexed parameter blocks.
//!
//! The on-disk format addresses parameter blocks by table position, and old
//! records keep referencing the positions they were written with. Removal
//! therefore leaves a hole; indices are never compacted and never reused.

use serde::{Deserialize, Serialize};

/// A variable-length byte buffer attached to an instance by table index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamBlock {
    pub data: Vec<u8>,
}

impl ParamBlock {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

/// The side table of parameter blocks for one Level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamTable {
    slots: Vec<Option<ParamBlock>>,
}

impl ParamTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block at a fresh tail index and return that index.
    ///
    /// Holes left by [`remove`](Self::remove) are deliberately not reused.
    pub fn insert(&mut self, block: ParamBlock) -> u32 {
        let index = self.slots.len() as u32;
        self.slots.push(Some(block));
        index
    }

    /// Clear the slot at `index`, leaving a hole. Out-of-range indices are
    /// ignored (nothing to clear).
    pub fn remove(&mut self, index: u32) {
        if let Some(slot) = self.slots.get_mut(index as usize) {
            *slot = None;
        }
    }

    pub fn get(&self, index: u32) -> Option<&ParamBlock> {
        self.slots.get(index as usize).and_then(|s| s.as_ref())
    }

    /// Total slot count including holes — the next insert index.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of occupied slots.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
