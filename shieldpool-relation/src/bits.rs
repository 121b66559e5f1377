//! Bit decomposition of field elements.
//!
//! The Pedersen hashes consume bit sequences, so the nullifier and secret are
//! decomposed into little-endian digits first. Each digit is held as a field
//! element, the way a constraint system holds it, so that an assignment which
//! is not boolean can be represented and rejected.
//!
//! The decomposition width is [`INPUT_BITS`], which is narrower than the 255-bit
//! field. Nullifiers and secrets must be less than `2^248`. This restriction is
//! checked when witnesses are built and again when they are evaluated.

use std::fmt;

use bitvec::prelude::*;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    error::{Constraint, RelationError, WitnessInput},
    field::Base,
};


/// The decomposition width of nullifiers and secrets.
pub const INPUT_BITS: usize = 248;

/// The number of bits in the byte encoding of a field element.
const ENCODING_BITS: usize = 256;

/// A little-endian assignment of `L` digits to a field element.
///
/// The digits are erased from memory when the decomposition is dropped,
/// and compare in constant time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Decomposition<const L: usize> {
    digits: [Base; L],
}

impl<const L: usize> fmt::Debug for Decomposition<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Decomposition")
            .field("width", &L)
            .finish_non_exhaustive()
    }
}

impl<const L: usize> ConstantTimeEq for Decomposition<L> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.digits[..].ct_eq(&other.digits[..])
    }
}

impl<const L: usize> PartialEq for Decomposition<L> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<const L: usize> Eq for Decomposition<L> {}

impl<const L: usize> Decomposition<L> {
    /// Decomposes `value` into `L` boolean digits.
    ///
    /// Returns `None` if `value >= 2^L`, because no such decomposition exists.
    ///
    /// Every bit of the encoding is visited, whatever the value,
    /// so the running time does not depend on `value`.
    pub fn assign(value: &Base) -> Option<Self> {
        let bytes = value.to_bytes();
        let bits = bytes.view_bits::<Lsb0>();

        let mut digits = [Base::zero(); L];
        for (digit, bit) in digits.iter_mut().zip(bits.iter()) {
            *digit = Base::from(*bit as u64);
        }

        // Accumulate the out of range bits without branching on them.
        let mut overflow = 0u8;
        for bit in bits[L.min(ENCODING_BITS)..].iter() {
            overflow |= *bit as u8;
        }

        let decomposition = Decomposition { digits };

        if overflow == 0 {
            Some(decomposition)
        } else {
            None
        }
    }

    /// Uses `digits` as the assignment, without checking it.
    ///
    /// Call [`Decomposition::enforce`] before relying on the digits.
    pub fn from_digits(digits: [Base; L]) -> Self {
        Decomposition { digits }
    }

    /// Returns the assigned digits, least significant first.
    pub fn digits(&self) -> &[Base; L] {
        &self.digits
    }

    /// Returns `Σ digit[i]·2^i`.
    pub fn reconstruct(&self) -> Base {
        let mut sum = Base::zero();
        let mut weight = Base::one();

        for digit in self.digits.iter() {
            sum += digit * weight;
            weight = weight.double();
        }

        sum
    }

    /// Checks that every digit is boolean, and that the digits reconstruct `value`.
    ///
    /// `input` names the decomposed witness value in any error.
    pub fn enforce(&self, value: &Base, input: WitnessInput) -> Result<(), RelationError> {
        for (digit_index, digit) in self.digits.iter().enumerate() {
            if !bool::from(is_boolean(digit)) {
                return Err(RelationError::MalformedWitness {
                    constraint: Constraint::Decomposition {
                        input,
                        digit: digit_index,
                    },
                });
            }
        }

        if !bool::from(self.reconstruct().ct_eq(value)) {
            return Err(RelationError::MalformedWitness {
                constraint: Constraint::Reconstruction { input },
            });
        }

        Ok(())
    }

    /// Returns the digits as a bit vector, least significant first.
    ///
    /// Only meaningful after [`Decomposition::enforce`] has succeeded.
    pub fn to_bits(&self) -> BitVec<u8, Lsb0> {
        self.digits
            .iter()
            .map(|digit| bool::from(digit.ct_eq(&Base::one())))
            .collect()
    }
}

/// Returns a set [`Choice`] if `value·(1 − value) = 0`, that is, if `value` is 0 or 1.
pub fn is_boolean(value: &Base) -> Choice {
    (value * (Base::one() - value)).ct_eq(&Base::zero())
}

/// Decomposes and checks a nullifier or secret, using [`INPUT_BITS`] digits.
pub fn decompose_input(
    value: &Base,
    input: WitnessInput,
) -> Result<Decomposition<INPUT_BITS>, RelationError> {
    let decomposition =
        Decomposition::assign(value).ok_or(RelationError::OutOfRangeSecret { input })?;
    decomposition.enforce(value, input)?;

    Ok(decomposition)
}
