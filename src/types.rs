use core::fmt;

pub const TOPO_HASH_LEN: usize = 32;            // BLAKE3 output
pub const GROWTH_ROUNDS: usize = 50;            // Phase B recombination rounds
pub const STEPS_PER_CANDIDATE: usize = 100;     // evaluations per sampled candidate
pub const OPERATOR_PENALTY_BITS: f32 = 1.0;     // entropy charged for choosing an operator
pub const TRACE_PROBABILITY: f64 = 0.000_01;    // chance of dumping a sampled candidate

/// Byte sequence produced by evaluating an expression.
///
/// Immutable by convention: every combinator returns a fresh block.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteBlock(pub Vec<u8>);

impl ByteBlock {
    #[must_use]
    pub const fn new() -> Self { Self(Vec::new()) }

    #[must_use]
    pub fn from_ascii(s: &str) -> Self { Self(s.as_bytes().to_vec()) }

    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    /// `self || other`
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        let mut v = Vec::with_capacity(self.len() + other.len());
        v.extend_from_slice(&self.0);
        v.extend_from_slice(&other.0);
        Self(v)
    }

    /// Repeating-key XOR. An empty key leaves the block unchanged.
    #[must_use]
    pub fn xor(&self, key: &Self) -> Self {
        if key.is_empty() { return self.clone(); }
        Self(self.0.iter().zip(key.0.iter().cycle()).map(|(a, k)| a ^ k).collect())
    }

    /// Checked sub-range `[start, start + len)`.
    #[must_use]
    pub fn window(&self, start: usize, len: usize) -> Option<Self> {
        let end = start.checked_add(len)?;
        self.0.get(start..end).map(|s| Self(s.to_vec()))
    }

    /// Sub-range clamped to the available bytes.
    #[must_use]
    pub fn clamped_window(&self, start: usize, len: usize) -> Self {
        let start = start.min(self.len());
        let end = start.saturating_add(len).min(self.len());
        Self(self.0[start..end].to_vec())
    }

    /// True if `self` occurs as a contiguous run of bytes inside `longer`.
    #[must_use]
    pub fn is_window_of(&self, longer: &Self) -> bool {
        if longer.len() < self.len() { return false; }
        if self.is_empty() { return true; }
        longer.0.windows(self.len()).any(|w| w == self.0.as_slice())
    }

    /// Bitwise distance between two equal-length blocks.
    #[must_use]
    pub fn hamming_distance(&self, other: &Self) -> Option<u32> {
        if self.len() != other.len() { return None; }
        Some(self.0.iter().zip(&other.0).map(|(a, b)| (a ^ b).count_ones()).sum())
    }

    /// Printable rendering; non-ASCII bytes become `.`.
    #[must_use]
    pub fn to_ascii_lossy(&self) -> String {
        self.0.iter().map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' }).collect()
    }
}

impl From<Vec<u8>> for ByteBlock {
    fn from(v: Vec<u8>) -> Self { Self(v) }
}

impl From<&[u8]> for ByteBlock {
    fn from(b: &[u8]) -> Self { Self(b.to_vec()) }
}

impl AsRef<[u8]> for ByteBlock {
    fn as_ref(&self) -> &[u8] { &self.0 }
}

impl fmt::Debug for ByteBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteBlock({})", self.to_hex())
    }
}

/// Structural fingerprint of an expression tree, independent of enumeration state.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TopoHash(pub [u8; TOPO_HASH_LEN]);

impl fmt::Display for TopoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for TopoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopoHash({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_rejects_out_of_range() {
        let b = ByteBlock::from_ascii("abcdef");
        assert_eq!(b.window(2, 3), Some(ByteBlock::from_ascii("cde")));
        assert_eq!(b.window(4, 3), None);
        assert_eq!(b.window(usize::MAX, 2), None);
        assert_eq!(b.clamped_window(4, 3), ByteBlock::from_ascii("ef"));
        assert!(b.clamped_window(9, 3).is_empty());
    }

    #[test]
    fn containment_is_contiguous() {
        let hay = ByteBlock::from_ascii("xxabcxx");
        assert!(ByteBlock::from_ascii("abc").is_window_of(&hay));
        assert!(!ByteBlock::from_ascii("axc").is_window_of(&hay));
        assert!(!hay.is_window_of(&ByteBlock::from_ascii("abc")));
        assert!(ByteBlock::new().is_window_of(&hay));
    }

    #[test]
    fn xor_repeats_key() {
        let b = ByteBlock(vec![0x00, 0xff, 0x0f, 0xf0]);
        let k = ByteBlock(vec![0xff, 0x00]);
        assert_eq!(b.xor(&k), ByteBlock(vec![0xff, 0xff, 0xf0, 0xf0]));
        assert_eq!(b.xor(&k).xor(&k), b);
    }

    #[test]
    fn hamming_needs_equal_lengths() {
        let a = ByteBlock(vec![0b1010_1010]);
        let b = ByteBlock(vec![0b0101_0101]);
        assert_eq!(a.hamming_distance(&b), Some(8));
        assert_eq!(a.hamming_distance(&ByteBlock::new()), None);
    }
}
