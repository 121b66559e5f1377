//! The Merkle tree node hash: a MiMC sponge in Feistel mode.
//!
//! The sponge has one rate element and one capacity element. Each input is
//! added to the left half of the state, then the state is permuted by
//! [`ROUNDS`] Feistel rounds of `x ↦ x⁵`. The output is the left half.
//!
//! The round count and the key are fixed parameters of the relation. The key
//! is always zero.

use once_cell::sync::Lazy;

use crate::field::Base;

#[cfg(test)]
mod tests;

/// The number of Feistel rounds in each permutation.
pub const ROUNDS: usize = 220;

/// The BLAKE2b personalization used to derive round constants.
const ROUND_CONSTANT_PERSONALIZATION: &[u8; 16] = b"ShieldpoolMiMC__";

/// The Feistel round constants.
///
/// The first and last constants are zero. The others are derived from
/// BLAKE2b-512 of the round index, reduced into the field.
static ROUND_CONSTANTS: Lazy<[Base; ROUNDS]> = Lazy::new(|| {
    let mut constants = [Base::zero(); ROUNDS];

    for (round, constant) in constants.iter_mut().enumerate().take(ROUNDS - 1).skip(1) {
        let hash = blake2b_simd::Params::new()
            .hash_length(64)
            .personal(ROUND_CONSTANT_PERSONALIZATION)
            .to_state()
            .update(&(round as u32).to_le_bytes())
            .finalize();

        *constant = Base::from_bytes_wide(hash.as_array());
    }

    constants
});

/// The MiMC key. It is a fixed parameter of the relation.
const KEY: Base = Base::zero();

/// The MiMC-Feistel permutation of `(left, right)` under `key`.
///
/// Each round sets `(left, right) := (right + (left + key + cᵢ)⁵, left)`,
/// except the last round, which only updates `right`.
pub fn feistel(mut left: Base, mut right: Base, key: Base) -> (Base, Base) {
    for (round, constant) in ROUND_CONSTANTS.iter().enumerate() {
        let t = left + key + constant;
        let t5 = t.square().square() * t;

        if round < ROUNDS - 1 {
            let next_left = right + t5;
            right = left;
            left = next_left;
        } else {
            right += t5;
        }
    }

    (left, right)
}

/// Absorbs `inputs` into a fresh sponge, and squeezes one element.
pub fn sponge(inputs: &[Base]) -> Base {
    let (left, _right) = inputs
        .iter()
        .fold((Base::zero(), Base::zero()), |(left, right), input| {
            feistel(left + input, right, KEY)
        });

    left
}

/// Hashes a `(left, right)` pair of Merkle tree nodes into their parent node.
///
/// The hash is order-sensitive: swapping the children changes the parent.
pub fn hash_pair(left: Base, right: Base) -> Base {
    sponge(&[left, right])
}
