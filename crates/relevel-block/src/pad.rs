//! Zero-padding of serialized records.

/// The container format's table alignment boundary.
pub const DISK_ALIGNMENT: usize = 0x80;

/// Zero-extend `bytes` to at least `element_size`, then further until the
/// length is a multiple of `alignment`.
///
/// Pure and append-only: the first `bytes.len()` bytes of the result always
/// equal the input, and the result is never shorter than the input. An
/// `alignment` of zero or one means "no alignment constraint".
pub fn pad(mut bytes: Vec<u8>, element_size: usize, alignment: usize) -> Vec<u8> {
    if bytes.len() < element_size {
        bytes.resize(element_size, 0);
    }
    if alignment > 1 {
        let remainder = bytes.len() % alignment;
        if remainder != 0 {
            bytes.resize(bytes.len() + alignment - remainder, 0);
        }
    }
    bytes
}
