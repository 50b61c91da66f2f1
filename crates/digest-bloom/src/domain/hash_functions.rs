//! Index derivation for the Bloom filter
//!
//! Every key is turned into `count` bit indices with SHA-512. Two strategies
//! are available:
//!
//! - [`HashSplitter`]: one digest per key, sliced into `count` non-overlapping
//!   fields of `bits_per_index` bits. Preferred, a single hash call serves
//!   all `k` indices.
//! - [`MultiHasher`]: `count` independently seeded digests per key, each
//!   contributing its low `bits_per_index` bits.
//!
//! Indices are produced lazily so a membership test can stop at the first
//! unset bit without deriving the rest.

use std::fmt::Debug;
use std::sync::Arc;

use primitive_types::U512;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::error::FilterError;

/// Size of the SHA-512 digest in bits
pub const DIGEST_BITS: usize = 512;

/// Widest field a single index may occupy
pub const MAX_BITS_PER_INDEX: u32 = 63;

/// Most hash functions a [`MultiHasher`] runs per key
pub const MAX_HASH_COUNT: usize = DIGEST_BITS;

/// Strategy turning a key into a fixed number of bit indices.
pub trait IndexStrategy: Debug + Send + Sync {
    /// Number of indices produced per key (k)
    fn count(&self) -> usize;

    /// Width of each raw index in bits
    fn bits_per_index(&self) -> u32;

    /// Raw indices in derivation order, each in `[0, 2^bits_per_index)`
    fn raw_index_iter<'a>(&'a self, key: &'a str) -> Box<dyn Iterator<Item = u64> + 'a>;

    /// All raw indices of a key
    fn raw_indices(&self, key: &str) -> Vec<u64> {
        self.raw_index_iter(key).collect()
    }

    /// Indices proportionally remapped into `[0, ubound)`, derived on demand.
    ///
    /// A raw field `r` maps to `floor(r * ubound / 2^bits_per_index)`. When
    /// `ubound` is the exact power of two this is the identity.
    fn indices_iter<'a>(
        &'a self,
        key: &'a str,
        ubound: usize,
    ) -> Box<dyn Iterator<Item = usize> + 'a> {
        let shift = self.bits_per_index();
        Box::new(
            self.raw_index_iter(key)
                .map(move |raw| rescale(raw, shift, ubound)),
        )
    }

    /// All remapped indices of a key
    fn indices_within(&self, key: &str, ubound: usize) -> Vec<usize> {
        self.indices_iter(key, ubound).collect()
    }
}

#[inline]
fn rescale(raw: u64, bits_per_index: u32, ubound: usize) -> usize {
    ((raw as u128 * ubound as u128) >> bits_per_index) as usize
}

#[inline]
fn field_mask(bits_per_index: u32) -> u64 {
    (1u64 << bits_per_index) - 1
}

fn check_field_width(bits_per_index: u32, count: usize) -> Result<(), FilterError> {
    if bits_per_index == 0 || bits_per_index > MAX_BITS_PER_INDEX {
        return Err(FilterError::invalid(format!(
            "bits_per_index must be within 1..={MAX_BITS_PER_INDEX}, got {bits_per_index}"
        )));
    }
    if count == 0 {
        return Err(FilterError::invalid("index count must be positive"));
    }
    Ok(())
}

/// Slices one SHA-512 digest into `count` fields of `bits_per_index` bits.
///
/// The digest is read as a big-endian 512-bit integer; field `i` holds bits
/// `[i * bits_per_index, (i + 1) * bits_per_index)` counted from the least
/// significant end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashSplitter {
    bits_per_index: u32,
    count: usize,
}

impl HashSplitter {
    /// Create a splitter, rejecting shapes the digest cannot serve.
    ///
    /// # Errors
    /// - `InvalidConfiguration` if either parameter is zero or
    ///   `bits_per_index > 63`
    /// - `CapacityViolation` if `bits_per_index * count > 512`
    pub fn new(bits_per_index: u32, count: usize) -> Result<Self, FilterError> {
        check_field_width(bits_per_index, count)?;

        let needed = (bits_per_index as usize).checked_mul(count);
        if needed.map_or(true, |bits| bits > DIGEST_BITS) {
            return Err(FilterError::CapacityViolation {
                bits_per_index,
                count,
                digest_bits: DIGEST_BITS,
            });
        }

        Ok(Self {
            bits_per_index,
            count,
        })
    }

    /// Hash a key and wrap the digest as one unsigned integer
    pub fn digest_value(key: &str) -> U512 {
        let digest = Sha512::digest(key.as_bytes());
        U512::from_big_endian(digest.as_slice())
    }
}

impl IndexStrategy for HashSplitter {
    fn count(&self) -> usize {
        self.count
    }

    fn bits_per_index(&self) -> u32 {
        self.bits_per_index
    }

    fn raw_index_iter<'a>(&'a self, key: &'a str) -> Box<dyn Iterator<Item = u64> + 'a> {
        let value = Self::digest_value(key);
        let mask = U512::from(field_mask(self.bits_per_index));
        let width = self.bits_per_index as usize;

        Box::new((0..self.count).map(move |i| ((value >> (i * width)) & mask).low_u64()))
    }
}

/// One seeded SHA-512 hash object per index.
///
/// Hash function `i` digests the big-endian `u32` seed `i` followed by the
/// key. Costs up to `count` digests per key; the field width is not bounded
/// by the digest, but `count` is capped at [`MAX_HASH_COUNT`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MultiHasher {
    bits_per_index: u32,
    count: usize,
}

impl MultiHasher {
    /// # Errors
    /// - `InvalidConfiguration` if either parameter is zero or
    ///   `bits_per_index > 63`
    /// - `CapacityViolation` if `count > MAX_HASH_COUNT`
    pub fn new(bits_per_index: u32, count: usize) -> Result<Self, FilterError> {
        check_field_width(bits_per_index, count)?;
        if count > MAX_HASH_COUNT {
            return Err(FilterError::CapacityViolation {
                bits_per_index,
                count,
                digest_bits: DIGEST_BITS,
            });
        }
        Ok(Self {
            bits_per_index,
            count,
        })
    }

    fn seeded_hash(seed: u32, key: &str) -> u64 {
        let digest = Sha512::new()
            .chain_update(seed.to_be_bytes())
            .chain_update(key.as_bytes())
            .finalize();

        // Low-order 64 bits of the big-endian digest
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&digest[digest.len() - 8..]);
        u64::from_be_bytes(tail)
    }
}

impl IndexStrategy for MultiHasher {
    fn count(&self) -> usize {
        self.count
    }

    fn bits_per_index(&self) -> u32 {
        self.bits_per_index
    }

    fn raw_index_iter<'a>(&'a self, key: &'a str) -> Box<dyn Iterator<Item = u64> + 'a> {
        let mask = field_mask(self.bits_per_index);
        // count <= MAX_HASH_COUNT, so every seed fits in a u32
        Box::new((0..self.count as u32).map(move |seed| Self::seeded_hash(seed, key) & mask))
    }
}

/// Selects the index derivation strategy of a filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexDerivation {
    /// [`HashSplitter`]
    #[default]
    SlicedDigest,
    /// [`MultiHasher`]
    MultiHash,
}

impl IndexDerivation {
    /// Build the strategy for the given field width and index count
    pub fn strategy(
        self,
        bits_per_index: u32,
        count: usize,
    ) -> Result<Arc<dyn IndexStrategy>, FilterError> {
        Ok(match self {
            IndexDerivation::SlicedDigest => Arc::new(HashSplitter::new(bits_per_index, count)?),
            IndexDerivation::MultiHash => Arc::new(MultiHasher::new(bits_per_index, count)?),
        })
    }
}
