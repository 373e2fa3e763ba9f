use std::collections::HashMap;
use std::fmt;

use relevel_types::{Collection, EntityId, Resource};
use serde::{Deserialize, Serialize};

/// Bytes per sampled window.
const WINDOW: usize = 64;
/// Interior windows sampled between head and tail.
const INTERIOR_WINDOWS: usize = 8;

/// Derived matching key for a resource: dimensions plus a sampled digest.
///
/// Equal signatures mean "treat as the same resource" for deduplication.
/// See the crate docs for the sampling scheme and its tolerance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub width: u32,
    pub height: u32,
    digest: [u8; 32],
}

impl Signature {
    /// Compute the signature of a resource.
    pub fn of(resource: &Resource) -> Self {
        let data = &resource.data;
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"relevel-sig-v1:");
        hasher.update(&(data.len() as u64).to_le_bytes());

        for (offset, len) in sample_windows(data.len()) {
            hasher.update(&data[offset..offset + len]);
        }

        Self {
            width: resource.width,
            height: resource.height,
            digest: *hasher.finalize().as_bytes(),
        }
    }

    /// Hex-encoded digest, for report rendering.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signature({}x{}, {})",
            self.width,
            self.height,
            &self.digest_hex()[..8]
        )
    }
}

/// The windows sampled for a payload of `len` bytes: head, tail, and
/// [`INTERIOR_WINDOWS`] evenly spaced interior windows. Pure in `len`, so
/// byte-identical payloads always sample identically.
fn sample_windows(len: usize) -> Vec<(usize, usize)> {
    if len == 0 {
        return Vec::new();
    }
    if len <= WINDOW * 2 {
        return vec![(0, len)];
    }

    let mut windows = vec![(0, WINDOW), (len - WINDOW, WINDOW)];
    let span = len - WINDOW * 2;
    for i in 0..INTERIOR_WINDOWS {
        let offset = WINDOW + span * i / INTERIOR_WINDOWS;
        let window = WINDOW.min(len - offset);
        windows.push((offset, window));
    }
    windows
}

/// Probe offsets for the pairwise fallback comparison: a fixed number of
/// evenly spaced single-byte probes.
pub(crate) fn probe_offsets(len: usize, count: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    (0..count).map(|i| len * i / count).collect()
}

/// Exact-signature lookup table over a target collection, built once per
/// merge session and kept current as imports append.
#[derive(Debug, Default)]
pub struct SignatureIndex {
    by_signature: HashMap<Signature, EntityId>,
}

impl SignatureIndex {
    /// Build the index over every non-empty resource in the collection.
    ///
    /// When duplicates already exist, the first entry (collection order)
    /// wins, matching the conflict resolver's keep-the-first rule.
    pub fn build(collection: &Collection<Resource>) -> Self {
        let mut by_signature = HashMap::with_capacity(collection.len());
        for resource in collection {
            if resource.data.is_empty() {
                continue;
            }
            by_signature
                .entry(Signature::of(resource))
                .or_insert(resource.id);
        }
        Self { by_signature }
    }

    pub fn lookup(&self, signature: &Signature) -> Option<EntityId> {
        self.by_signature.get(signature).copied()
    }

    /// Record a freshly appended resource.
    pub fn insert(&mut self, signature: Signature, id: EntityId) {
        self.by_signature.entry(signature).or_insert(id);
    }

    pub fn len(&self) -> usize {
        self.by_signature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_signature.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: u32, w: u32, h: u32, data: Vec<u8>) -> Resource {
        Resource::new(EntityId::new(id), w, h, data)
    }

    #[test]
    fn identical_payloads_share_a_signature() {
        let a = resource(1, 32, 32, vec![7; 4096]);
        let b = resource(2, 32, 32, vec![7; 4096]);
        assert_eq!(Signature::of(&a), Signature::of(&b));
    }

    #[test]
    fn dimension_change_breaks_the_match() {
        let a = resource(1, 32, 32, vec![7; 256]);
        let b = resource(2, 64, 16, vec![7; 256]);
        assert_ne!(Signature::of(&a), Signature::of(&b));
    }

    #[test]
    fn sampled_byte_change_breaks_the_match() {
        let a = resource(1, 32, 32, vec![0; 4096]);
        let mut changed = vec![0; 4096];
        changed[0] = 1; // head window is always sampled
        let b = resource(2, 32, 32, changed);
        assert_ne!(Signature::of(&a), Signature::of(&b));
    }

    #[test]
    fn length_change_breaks_the_match() {
        let a = resource(1, 32, 32, vec![0; 4096]);
        let b = resource(2, 32, 32, vec![0; 4097]);
        assert_ne!(Signature::of(&a), Signature::of(&b));
    }

    #[test]
    fn short_payloads_are_fully_hashed() {
        let windows = sample_windows(100);
        assert_eq!(windows, vec![(0, 100)]);
    }

    #[test]
    fn long_payloads_sample_head_tail_and_interior() {
        let windows = sample_windows(10_000);
        assert_eq!(windows.len(), 2 + INTERIOR_WINDOWS);
        assert_eq!(windows[0], (0, WINDOW));
        assert_eq!(windows[1], (10_000 - WINDOW, WINDOW));
        for &(offset, len) in &windows {
            assert!(offset + len <= 10_000);
        }
    }

    #[test]
    fn index_prefers_first_entry_for_duplicates() {
        let mut collection = Collection::new();
        collection.push(resource(3, 8, 8, vec![1; 64]));
        collection.push(resource(9, 8, 8, vec![1; 64]));

        let index = SignatureIndex::build(&collection);
        let sig = Signature::of(&resource(0, 8, 8, vec![1; 64]));
        assert_eq!(index.lookup(&sig), Some(EntityId::new(3)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn index_skips_empty_payloads() {
        let mut collection = Collection::new();
        collection.push(resource(1, 8, 8, Vec::new()));
        let index = SignatureIndex::build(&collection);
        assert!(index.is_empty());
    }

    #[test]
    fn probe_offsets_stay_in_bounds() {
        for len in [1usize, 7, 64, 4096] {
            for offset in probe_offsets(len, 8) {
                assert!(offset < len);
            }
        }
        assert!(probe_offsets(0, 8).is_empty());
    }
}
