use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::{errors::SearchError, types::ByteBlock};

#[inline]
#[must_use]
pub const fn le64(x: u64) -> [u8; 8] {
    x.to_le_bytes()
}

/// Convert an unsigned integer to fixed-width little-endian bytes.
///
/// Bits above `8 * width` are discarded.
#[must_use]
pub fn le_bytes(mut x: u64, width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width];
    for b in &mut out {
        *b = (x & 0xFF) as u8;
        x >>= 8;
    }
    out
}

impl ByteBlock {
    /// Decode a hex string. Both cases are accepted; the length must be even.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Hex` on odd length or a non-hex digit.
    pub fn from_hex(s: &str) -> Result<Self, SearchError> {
        Ok(Self(hex::decode(s)?))
    }

    /// Decode standard-alphabet base64 (radix-64).
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Base64` if the input is not valid base64.
    pub fn from_base64(s: &str) -> Result<Self, SearchError> {
        Ok(Self(STANDARD.decode(s)?))
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Hex split into space separated groups of `group` bytes. `0` disables grouping.
    #[must_use]
    pub fn to_hex_grouped(&self, group: usize) -> String {
        if group == 0 { return self.to_hex(); }
        self.0.chunks(group).map(hex::encode).collect::<Vec<_>>().join(" ")
    }

    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }
}
