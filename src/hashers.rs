use core::fmt;

use md4::Md4;
use md5::Md5;
use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use whirlpool::Whirlpool;

use crate::{errors::SearchError, ser::le64, types::{ByteBlock, TopoHash}};

pub const TAG_CONST: &str = "passgrind.const";
pub const TAG_NUMERIC: &str = "passgrind.numeric";
pub const TAG_ASCII: &str = "passgrind.ascii";
pub const TAG_DIGEST: &str = "passgrind.digest";
pub const TAG_SUBSTRING: &str = "passgrind.substring";
pub const TAG_CONCAT: &str = "passgrind.concat";

/// T = BLAKE3( LE64(|tag|) || tag || Σ ( LE64(|p|) || p ) )
#[must_use]
pub fn h_tag(tag: &str, parts: &[&[u8]]) -> TopoHash {
    debug_assert!(tag.starts_with("passgrind."), "non-passgrind.* tag used in topology hashing: {tag}");
    let mut h = blake3::Hasher::new();
    h.update(&le64(tag.len() as u64));
    h.update(tag.as_bytes());
    for p in parts {
        h.update(&le64(p.len() as u64));
        h.update(p);
    }
    TopoHash(*h.finalize().as_bytes())
}

/// The fixed, ordered digest list explored by `GenericDigest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Whirlpool,
    Md5,
    Sha0,
    Sha224,
    Sha1,
    Sha384,
    Sha256,
    Sha512,
    Md4,
    Ripemd160,
}

impl DigestAlgorithm {
    pub const ALL: [Self; 10] = [
        Self::Whirlpool,
        Self::Md5,
        Self::Sha0,
        Self::Sha224,
        Self::Sha1,
        Self::Sha384,
        Self::Sha256,
        Self::Sha512,
        Self::Md4,
        Self::Ripemd160,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Stable, case-exact identifier. Part of the topological hash of digest nodes.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Whirlpool => "whirlpool",
            Self::Md5 => "md5",
            Self::Sha0 => "sha",
            Self::Sha224 => "sha224",
            Self::Sha1 => "sha1",
            Self::Sha384 => "sha384",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Md4 => "md4",
            Self::Ripemd160 => "ripemd160",
        }
    }

    /// Native output size in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Whirlpool | Self::Sha512 => 64,
            Self::Md5 | Self::Md4 => 16,
            Self::Sha0 | Self::Sha1 | Self::Ripemd160 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
        }
    }

    /// Position in [`Self::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&a| a == self).unwrap_or(0)
    }

    /// Look an algorithm up by its exact name.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::UnknownAlgorithm` for any name not in the list.
    pub fn from_name(name: &str) -> Result<Self, SearchError> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == name)
            .ok_or_else(|| SearchError::UnknownAlgorithm(name.to_owned()))
    }

    #[must_use]
    pub fn digest(self, data: &[u8]) -> ByteBlock {
        match self {
            Self::Whirlpool => run::<Whirlpool>(data),
            Self::Md5 => run::<Md5>(data),
            Self::Sha0 => ByteBlock(sha0(data).to_vec()),
            Self::Sha224 => run::<Sha224>(data),
            Self::Sha1 => run::<Sha1>(data),
            Self::Sha384 => run::<Sha384>(data),
            Self::Sha256 => run::<Sha256>(data),
            Self::Sha512 => run::<Sha512>(data),
            Self::Md4 => run::<Md4>(data),
            Self::Ripemd160 => run::<Ripemd160>(data),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
fn run<D: Digest>(data: &[u8]) -> ByteBlock {
    ByteBlock(D::digest(data).to_vec())
}

const SHA0_IV: [u32; 5] = [0x6745_2301, 0xEFCD_AB89, 0x98BA_DCFE, 0x1032_5476, 0xC3D2_E1F0];

/// Original FIPS 180 SHA: SHA-1 without the one-bit rotation in the message schedule.
#[must_use]
pub fn sha0(data: &[u8]) -> [u8; 20] {
    let bit_len = (data.len() as u64).wrapping_mul(8);
    let mut msg = data.to_vec();
    msg.push(0x80);
    while msg.len() % 64 != 56 {
        msg.push(0);
    }
    msg.extend_from_slice(&bit_len.to_be_bytes());

    let mut state = SHA0_IV;
    for block in msg.chunks_exact(64) {
        let mut w = [0u32; 80];
        for (i, word) in block.chunks_exact(4).enumerate() {
            w[i] = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
        }
        for t in 16..80 {
            w[t] = w[t - 3] ^ w[t - 8] ^ w[t - 14] ^ w[t - 16];
        }

        let [mut a, mut b, mut c, mut d, mut e] = state;
        for (t, &wt) in w.iter().enumerate() {
            let (f, k) = match t {
                0..=19 => ((b & c) | (!b & d), 0x5A82_7999),
                20..=39 => (b ^ c ^ d, 0x6ED9_EBA1),
                40..=59 => ((b & c) | (b & d) | (c & d), 0x8F1B_BCDC),
                _ => (b ^ c ^ d, 0xCA62_C1D6),
            };
            let tmp = a
                .rotate_left(5)
                .wrapping_add(f)
                .wrapping_add(e)
                .wrapping_add(k)
                .wrapping_add(wt);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = tmp;
        }

        state[0] = state[0].wrapping_add(a);
        state[1] = state[1].wrapping_add(b);
        state[2] = state[2].wrapping_add(c);
        state[3] = state[3].wrapping_add(d);
        state[4] = state[4].wrapping_add(e);
    }

    let mut out = [0u8; 20];
    for (chunk, word) in out.chunks_exact_mut(4).zip(state) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha0_known_answers() {
        assert_eq!(sha0(b"abc"), hex!("0164b8a914cd2a5e74c4f7ff082c4d97f1edf880"));
        assert_eq!(sha0(b""), hex!("f96cea198ad1dd5617ac084a3d92c6107708c0ef"));
    }

    #[test]
    fn sha1_of_abc() {
        assert_eq!(
            DigestAlgorithm::Sha1.digest(b"abc").0,
            hex!("a9993e364706816aba3e25717850c26c9cd0d89d").to_vec()
        );
    }

    #[test]
    fn output_len_matches_digest() {
        for alg in DigestAlgorithm::ALL {
            assert_eq!(alg.digest(b"passgrind").len(), alg.output_len(), "{alg}");
        }
    }

    #[test]
    fn names_round_trip_and_stay_in_order() {
        let names: Vec<_> = DigestAlgorithm::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(
            names,
            ["whirlpool", "md5", "sha", "sha224", "sha1", "sha384", "sha256", "sha512", "md4", "ripemd160"]
        );
        for (i, alg) in DigestAlgorithm::ALL.iter().enumerate() {
            assert_eq!(DigestAlgorithm::from_name(alg.name()).unwrap(), *alg);
            assert_eq!(alg.index(), i);
        }
        assert!(DigestAlgorithm::from_name("SHA1").is_err());
    }

    #[test]
    fn tagged_hash_frames_parts() {
        assert_ne!(h_tag(TAG_CONCAT, &[b"ab", b"c"]), h_tag(TAG_CONCAT, &[b"a", b"bc"]));
        assert_ne!(h_tag(TAG_CONST, &[b"x"]), h_tag(TAG_CONCAT, &[b"x"]));
        assert_eq!(h_tag(TAG_CONST, &[b"x"]), h_tag(TAG_CONST, &[b"x"]));
    }
}
