//! Leaf expressions: literal constants and counters.

use crate::{
    errors::SearchError,
    expression::{describe_line, BoxedExpr, ExprKind, Expression},
    hashers::{h_tag, TAG_ASCII, TAG_CONST, TAG_NUMERIC},
    ser::le_bytes,
    types::{ByteBlock, TopoHash},
};

const ASCII_RADIX: u8 = 26;

/// Known literal bytes. A single enumeration state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Const {
    bytes: ByteBlock,
}

impl Const {
    #[must_use]
    pub const fn new(bytes: ByteBlock) -> Self { Self { bytes } }
}

impl Expression for Const {
    fn kind(&self) -> ExprKind { ExprKind::Const }

    #[allow(clippy::cast_precision_loss)]
    fn entropy(&self) -> f32 { (self.bytes.len() * 8) as f32 }

    fn eval(&self) -> ByteBlock { self.bytes.clone() }

    fn length(&self) -> usize { self.bytes.len() }

    fn max_length(&self) -> usize { self.bytes.len() }

    fn init_state(&mut self) {}

    fn next_state(&mut self) -> bool { false }

    fn deep_copy(&self) -> BoxedExpr { Box::new(self.clone()) }

    fn topological_hash(&self) -> TopoHash { h_tag(TAG_CONST, &[self.bytes.as_bytes()]) }

    fn describe_into(&self, depth: usize, out: &mut String) {
        describe_line(out, depth, format_args!("Const: {}", self.bytes.to_hex()));
    }
}

/// Little-endian unsigned counter over `byte_count` bytes, starting at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericCounter {
    byte_count: u8,
    value: u64,
}

impl NumericCounter {
    /// # Errors
    ///
    /// `byte_count` must be in `1..=8`.
    pub fn new(byte_count: u8) -> Result<Self, SearchError> {
        if !(1..=8).contains(&byte_count) {
            return Err(SearchError::InvalidParameter("numeric counter width must be 1..=8 bytes"));
        }
        Ok(Self { byte_count, value: 0 })
    }

    #[must_use]
    pub const fn value(&self) -> u64 { self.value }

    /// Largest representable value, `2^(8 * byte_count) - 1`.
    #[must_use]
    pub const fn max_value(&self) -> u64 {
        if self.byte_count >= 8 { u64::MAX } else { (1u64 << (8 * self.byte_count)) - 1 }
    }
}

impl Expression for NumericCounter {
    fn kind(&self) -> ExprKind { ExprKind::NumericCounter }

    fn entropy(&self) -> f32 { f32::from(self.byte_count) * 8.0 }

    fn eval(&self) -> ByteBlock { ByteBlock(le_bytes(self.value, usize::from(self.byte_count))) }

    fn length(&self) -> usize { usize::from(self.byte_count) }

    fn max_length(&self) -> usize { usize::from(self.byte_count) }

    fn init_state(&mut self) { self.value = 0; }

    fn next_state(&mut self) -> bool {
        if self.value >= self.max_value() {
            self.value = 0;
            return false;
        }
        self.value += 1;
        true
    }

    fn deep_copy(&self) -> BoxedExpr { Box::new(self.clone()) }

    fn topological_hash(&self) -> TopoHash { h_tag(TAG_NUMERIC, &[&[self.byte_count]]) }

    fn describe_into(&self, depth: usize, out: &mut String) {
        describe_line(out, depth, format_args!("Counter: {}", self.eval().to_hex()));
    }
}

/// Radix-26 odometer over `byte_count` letters starting at `base`, least significant first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiCounter {
    base: u8,
    digits: Vec<u8>,
}

impl AsciiCounter {
    /// # Errors
    ///
    /// `byte_count` must be non-zero and `base + 25` must fit in a byte.
    pub fn new(byte_count: u8, base: u8) -> Result<Self, SearchError> {
        if byte_count == 0 {
            return Err(SearchError::InvalidParameter("ascii counter needs at least one byte"));
        }
        if base.checked_add(ASCII_RADIX - 1).is_none() {
            return Err(SearchError::InvalidParameter("ascii counter base too large"));
        }
        Ok(Self { base, digits: vec![0; usize::from(byte_count)] })
    }
}

impl Expression for AsciiCounter {
    fn kind(&self) -> ExprKind { ExprKind::AsciiCounter }

    #[allow(clippy::cast_precision_loss)]
    fn entropy(&self) -> f32 { self.digits.len() as f32 * f32::from(ASCII_RADIX).log2() }

    fn eval(&self) -> ByteBlock { ByteBlock(self.digits.iter().map(|d| self.base + d).collect()) }

    fn length(&self) -> usize { self.digits.len() }

    fn max_length(&self) -> usize { self.digits.len() }

    fn init_state(&mut self) { self.digits.fill(0); }

    fn next_state(&mut self) -> bool {
        for d in &mut self.digits {
            *d += 1;
            if *d < ASCII_RADIX {
                return true;
            }
            *d = 0;
        }
        false
    }

    fn deep_copy(&self) -> BoxedExpr { Box::new(self.clone()) }

    fn topological_hash(&self) -> TopoHash {
        let width = u64::try_from(self.digits.len()).unwrap_or(u64::MAX).to_le_bytes();
        h_tag(TAG_ASCII, &[&[self.base], &width])
    }

    fn describe_into(&self, depth: usize, out: &mut String) {
        describe_line(out, depth, format_args!("Ascii Counter: {}", self.eval().to_ascii_lossy()));
    }
}
