//! Pedersen hash functions and helpers.
//!
//! The commitment and the nullifier tag are Pedersen hashes on the Jubjub
//! curve, using the windowed encoding from the Zcash protocol specification:
//! <https://zips.z.cash/protocol/protocol.pdf#concretepedersenhash>
//!
//! Each hash instance has a fixed input width and its own 8-byte domain, so the
//! two instances use independent generators.

use bitvec::prelude::*;
use once_cell::sync::Lazy;

use crate::field::Base;

#[cfg(test)]
mod tests;

/// The input width of the commitment hash: nullifier bits, then secret bits.
pub const COMMITMENT_BITS: usize = 2 * crate::bits::INPUT_BITS;

/// The input width of the nullifier tag hash.
pub const NULLIFIER_BITS: usize = crate::bits::INPUT_BITS;

/// The number of message bits in each chunk.
const CHUNK_BITS: usize = 3;

/// The number of chunks in each segment, `c` in the protocol specification.
const CHUNKS_PER_SEGMENT: usize = 63;

/// The number of message bits in each segment.
const SEGMENT_BITS: usize = CHUNK_BITS * CHUNKS_PER_SEGMENT;

/// The [Randomness Beacon][1] ("URS").
///
/// First 64 bytes of the BLAKE2s input during JubJub group hash.  URS
/// is a 64-byte US-ASCII string, i.e. the first byte is 0x30, not
/// 0x09.
///
/// [1]: https://zips.z.cash/protocol/protocol.pdf#beacon
const RANDOMNESS_BEACON_URS: &[u8; 64] =
    b"096b36a5804bfacef1691e173c366a47ff5ba84a44f26ddd7e8d9f79d5b42df0";

/// The Pedersen hash that derives note commitments.
pub static COMMITMENT_HASHER: Lazy<PedersenHasher> =
    Lazy::new(|| PedersenHasher::new(*b"ShP_cmt_", COMMITMENT_BITS));

/// The Pedersen hash that derives nullifier tags.
pub static NULLIFIER_HASHER: Lazy<PedersenHasher> =
    Lazy::new(|| PedersenHasher::new(*b"ShP_nul_", NULLIFIER_BITS));

/// GroupHash into Jubjub, aka _GroupHash_URS_
///
/// Produces a random point in the Jubjub curve. The point is
/// guaranteed to be prime order and not the identity.
///
/// d is an 8-byte domain separator ("personalization"), m is the hash
/// input.
///
/// <https://zips.z.cash/protocol/protocol.pdf#concretegrouphashjubjub>
fn jubjub_group_hash(d: [u8; 8], m: &[u8]) -> Option<jubjub::ExtendedPoint> {
    let hash = blake2s_simd::Params::new()
        .hash_length(32)
        .personal(&d)
        .to_state()
        .update(RANDOMNESS_BEACON_URS)
        .update(m)
        .finalize();

    let point = Option::<jubjub::AffinePoint>::from(jubjub::AffinePoint::from_bytes(
        *hash.as_array(),
    ))?
    .mul_by_cofactor();

    if bool::from(point.is_identity()) {
        None
    } else {
        Some(point)
    }
}

/// Finds a Jubjub generator for domain `d` and message `m`,
/// by appending a counter byte to `m` until the group hash succeeds.
///
/// # Panics
///
/// If every counter value fails, which happens with negligible probability.
fn find_group_hash(d: [u8; 8], m: &[u8]) -> jubjub::ExtendedPoint {
    let mut tag = m.to_vec();
    let i = tag.len();
    tag.push(0u8);

    loop {
        if let Some(point) = jubjub_group_hash(d, &tag) {
            return point;
        }

        // We don't want to overflow and start reusing generators
        assert!(tag[i] != u8::MAX, "no group hash for this domain and message");
        tag[i] += 1;
    }
}

/// The encoding function ⟨Mᵢ⟩
///
/// Σ j={0,k-1}: (1 - 2x₂)⋅(1 + x₀ + 2x₁)⋅2^(4⋅j)
///
/// The chunk values are computed with field arithmetic on the message bits,
/// so secret bits never select a branch.
///
/// <https://zips.z.cash/protocol/protocol.pdf#concretepedersenhash>
#[allow(non_snake_case)]
fn M_i(segment: &BitSlice<u8, Lsb0>) -> jubjub::Fr {
    let mut m_i = jubjub::Fr::zero();
    let mut weight = jubjub::Fr::one();

    for chunk in segment.chunks(CHUNK_BITS) {
        // Pad each chunk with zeros.
        let bit = |i: usize| jubjub::Fr::from(chunk.get(i).map_or(false, |bit| *bit) as u64);

        let magnitude = jubjub::Fr::one() + bit(0) + bit(1).double();
        let encoded = magnitude - (magnitude * bit(2)).double();

        m_i += encoded * weight;

        // 2^(4⋅(j+1))
        weight = weight.double().double().double().double();
    }

    m_i
}

/// A fixed-width Pedersen hash instance.
///
/// "...an algebraic hash function with collision resistance (for fixed input
/// length) derived from assumed hardness of the Discrete Logarithm Problem on
/// the Jubjub curve."
#[derive(Clone, Debug)]
pub struct PedersenHasher {
    /// The domain separator used to derive the generators.
    domain: [u8; 8],

    /// The exact number of input bits.
    width: usize,

    /// The segment generators `Iᵢ`, one per segment of the input.
    generators: Vec<jubjub::ExtendedPoint>,
}

impl PedersenHasher {
    /// Creates a hash instance for `width`-bit inputs, deriving its generators
    /// from `domain`.
    ///
    /// Iᵢ := GroupHash^URS(domain, LEBS2OSP32(I2LEBSP32(i − 1)))
    pub fn new(domain: [u8; 8], width: usize) -> Self {
        let segments = (width + SEGMENT_BITS - 1) / SEGMENT_BITS;

        let generators = (0..segments as u32)
            .map(|i| find_group_hash(domain, &i.to_le_bytes()))
            .collect();

        PedersenHasher {
            domain,
            width,
            generators,
        }
    }

    /// Returns the domain separator of this instance.
    pub fn domain(&self) -> [u8; 8] {
        self.domain
    }

    /// Returns the exact input width of this instance, in bits.
    pub fn width(&self) -> usize {
        self.width
    }

    /// PedersenHashToPoint(D, M) := Σ [⟨Mᵢ⟩] Iᵢ
    ///
    /// # Panics
    ///
    /// If `M` is not exactly [`PedersenHasher::width`] bits.
    #[allow(non_snake_case)]
    pub fn hash_to_point(&self, M: &BitSlice<u8, Lsb0>) -> jubjub::ExtendedPoint {
        assert_eq!(
            M.len(),
            self.width,
            "Pedersen hash inputs have a fixed width"
        );

        // Split M into n segments of 3 * c bits, where c = 63, padding the last
        // segment with zeros.
        M.chunks(SEGMENT_BITS)
            .zip(self.generators.iter())
            .fold(jubjub::ExtendedPoint::identity(), |acc, (segment, I_i)| {
                // Jubjub scalar multiplication is constant time.
                acc + I_i * M_i(segment)
            })
    }

    /// Returns the `u` coordinate of [`PedersenHasher::hash_to_point`].
    ///
    /// # Panics
    ///
    /// If `M` is not exactly [`PedersenHasher::width`] bits.
    #[allow(non_snake_case)]
    pub fn hash(&self, M: &BitSlice<u8, Lsb0>) -> Base {
        jubjub::AffinePoint::from(self.hash_to_point(M)).get_u()
    }
}
