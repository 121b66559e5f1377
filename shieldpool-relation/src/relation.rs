//! The withdrawal relation.
//!
//! Public statement: `(root, nullifier_tag)`.
//! Private witness: `(nullifier, secret, path)`.
//!
//! The relation holds when, in order:
//! 1. the nullifier and secret decompose into 248 boolean digits each,
//! 2. `commitment = PedersenHash496(nullifier_bits || secret_bits)`,
//! 3. `tag = PedersenHash248(nullifier_bits)`,
//! 4. `tag == nullifier_tag`, and
//! 5. `path` leads from `commitment` to `root`.
//!
//! The tree depth is a const generic. Trees of different depths need
//! differently-sized relations, which are different types.

use std::fmt;

use serde::{Deserialize, Serialize};
use subtle::{Choice, ConstantTimeEq};
use tracing::instrument;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    bits::{decompose_input, Decomposition, INPUT_BITS},
    error::{RelationError, WitnessInput},
    field::{self, Base},
    merkle::{self, MerklePath},
    pedersen::{COMMITMENT_BITS, COMMITMENT_HASHER, NULLIFIER_HASHER},
};


/// The tree depth of the reference withdrawal relation.
pub const DEFAULT_LEVELS: usize = 20;

/// The private inputs of one withdrawal.
///
/// The witness is erased from memory when it is dropped.
/// Witnesses compare in constant time.
#[derive(Clone, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
#[serde(try_from = "WitnessData", into = "WitnessData")]
pub struct Witness<const LEVELS: usize> {
    nullifier: Base,
    secret: Base,
    path: MerklePath<LEVELS>,
}

impl<const LEVELS: usize> fmt::Debug for Witness<LEVELS> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Witness")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<const LEVELS: usize> ConstantTimeEq for Witness<LEVELS> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.nullifier.ct_eq(&other.nullifier)
            & self.secret.ct_eq(&other.secret)
            & self.path.ct_eq(&other.path)
    }
}

impl<const LEVELS: usize> PartialEq for Witness<LEVELS> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<const LEVELS: usize> Eq for Witness<LEVELS> {}

impl<const LEVELS: usize> Witness<LEVELS> {
    /// Creates a witness, checking that the nullifier and secret are less than `2^248`.
    pub fn new(
        nullifier: Base,
        secret: Base,
        path: MerklePath<LEVELS>,
    ) -> Result<Self, RelationError> {
        check_range(&nullifier, WitnessInput::Nullifier)?;
        check_range(&secret, WitnessInput::Secret)?;

        Ok(Self::new_unchecked(nullifier, secret, path))
    }

    /// Creates a witness without any checks.
    ///
    /// The relation still rejects out of range values when it is evaluated.
    pub fn new_unchecked(nullifier: Base, secret: Base, path: MerklePath<LEVELS>) -> Self {
        Witness {
            nullifier,
            secret,
            path,
        }
    }

    /// Returns the note nullifier.
    pub fn nullifier(&self) -> &Base {
        &self.nullifier
    }

    /// Returns the note secret.
    pub fn secret(&self) -> &Base {
        &self.secret
    }

    /// Returns the authentication path.
    pub fn path(&self) -> &MerklePath<LEVELS> {
        &self.path
    }

    /// Returns a mutable reference to the authentication path.
    pub fn path_mut(&mut self) -> &mut MerklePath<LEVELS> {
        &mut self.path
    }
}

/// Checks that `value` fits in the decomposition width.
fn check_range(value: &Base, input: WitnessInput) -> Result<(), RelationError> {
    Decomposition::<INPUT_BITS>::assign(value)
        .map(|_| ())
        .ok_or(RelationError::OutOfRangeSecret { input })
}

/// The serialized form of a [`Witness`].
///
/// Path indices serialize as plain integers. Any value other than 0 or 1 is
/// kept, so that the relation can reject it. Path lengths are checked when the
/// data is converted into a [`Witness`] of a particular depth.
#[derive(Clone, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WitnessData {
    /// The note nullifier.
    #[serde(with = "field::hex_serde")]
    pub nullifier: Base,

    /// The note secret.
    #[serde(with = "field::hex_serde")]
    pub secret: Base,

    /// The sibling nodes, leaf level first.
    #[serde(with = "field::hex_vec_serde")]
    pub path_elements: Vec<Base>,

    /// The path directions, leaf level first.
    #[serde(with = "path_index_serde")]
    pub path_indices: Vec<Base>,
}

impl fmt::Debug for WitnessData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("WitnessData")
            .field("levels", &self.path_elements.len())
            .finish_non_exhaustive()
    }
}

impl ConstantTimeEq for WitnessData {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.nullifier.ct_eq(&other.nullifier)
            & self.secret.ct_eq(&other.secret)
            & self.path_elements[..].ct_eq(&other.path_elements[..])
            & self.path_indices[..].ct_eq(&other.path_indices[..])
    }
}

impl PartialEq for WitnessData {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for WitnessData {}

impl<const LEVELS: usize> TryFrom<WitnessData> for Witness<LEVELS> {
    type Error = RelationError;

    fn try_from(data: WitnessData) -> Result<Self, Self::Error> {
        let path = MerklePath::try_from_parts(&data.path_elements, &data.path_indices)?;

        Witness::new(data.nullifier, data.secret, path)
    }
}

impl<const LEVELS: usize> From<Witness<LEVELS>> for WitnessData {
    fn from(witness: Witness<LEVELS>) -> Self {
        WitnessData {
            nullifier: witness.nullifier,
            secret: witness.secret,
            path_elements: witness.path.elements().to_vec(),
            path_indices: witness.path.indices().to_vec(),
        }
    }
}

/// Path directions are integers when they fit in a `u64`, and hex field
/// elements otherwise. Both forms are accepted when deserializing.
mod path_index_serde {
    use serde::{ser::SerializeSeq, Deserialize, Deserializer, Serialize, Serializer};

    use crate::field::{self, Base};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum PathIndex {
        Integer(u64),
        Field(#[serde(with = "field::hex_serde")] Base),
    }

    impl From<&Base> for PathIndex {
        fn from(index: &Base) -> Self {
            let bytes = index.to_bytes();

            if bytes[8..].iter().all(|byte| *byte == 0) {
                let mut low = [0u8; 8];
                low.copy_from_slice(&bytes[..8]);
                PathIndex::Integer(u64::from_le_bytes(low))
            } else {
                PathIndex::Field(*index)
            }
        }
    }

    impl From<PathIndex> for Base {
        fn from(index: PathIndex) -> Self {
            match index {
                PathIndex::Integer(index) => Base::from(index),
                PathIndex::Field(index) => index,
            }
        }
    }

    pub fn serialize<S: Serializer>(indices: &[Base], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(indices.len()))?;
        for index in indices {
            seq.serialize_element(&PathIndex::from(index))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Base>, D::Error> {
        Ok(Vec::<PathIndex>::deserialize(deserializer)?
            .into_iter()
            .map(Base::from)
            .collect())
    }
}

/// The public inputs of one withdrawal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublicStatement {
    /// The root of the commitment tree the note was appended to.
    #[serde(with = "field::hex_serde")]
    pub root: Base,

    /// The nullifier tag published by this withdrawal.
    #[serde(with = "field::hex_serde")]
    pub nullifier_tag: Base,
}

/// The public values derived from a note.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    /// The note commitment, which is appended to the commitment tree on deposit.
    #[serde(with = "field::hex_serde")]
    pub commitment: Base,

    /// The nullifier tag, which the ledger records when the note is withdrawn.
    #[serde(with = "field::hex_serde")]
    pub nullifier_tag: Base,
}

/// Derives the commitment and nullifier tag of `(nullifier, secret)`.
///
/// The nullifier tag only depends on the nullifier.
pub fn derive_values(nullifier: &Base, secret: &Base) -> Result<Derived, RelationError> {
    let nullifier_bits = decompose_input(nullifier, WitnessInput::Nullifier)?.to_bits();
    let secret_bits = decompose_input(secret, WitnessInput::Secret)?.to_bits();

    let mut preimage = nullifier_bits.clone();
    preimage.extend_from_bitslice(secret_bits.as_bitslice());
    debug_assert_eq!(preimage.len(), COMMITMENT_BITS);

    let commitment = COMMITMENT_HASHER.hash(&preimage);
    let nullifier_tag = NULLIFIER_HASHER.hash(&nullifier_bits);

    for mut bits in [preimage, nullifier_bits, secret_bits] {
        bits.as_raw_mut_slice().zeroize();
    }

    Ok(Derived {
        commitment,
        nullifier_tag,
    })
}

/// The withdrawal relation for a commitment tree with `LEVELS` levels.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct WithdrawalRelation<const LEVELS: usize = DEFAULT_LEVELS>;

impl<const LEVELS: usize> WithdrawalRelation<LEVELS> {
    /// The depth of the commitment tree this relation checks inclusion in.
    pub const DEPTH: usize = LEVELS;

    /// Creates the relation.
    pub fn new() -> Self {
        WithdrawalRelation
    }

    /// Derives the commitment and nullifier tag of the witness note.
    ///
    /// The authentication path is not checked.
    #[instrument(skip_all, fields(levels = LEVELS))]
    pub fn derive(&self, witness: &Witness<LEVELS>) -> Result<Derived, RelationError> {
        derive_values(&witness.nullifier, &witness.secret)
    }

    /// Evaluates the relation.
    ///
    /// Returns the derived values if every constraint holds, or the first
    /// violated constraint otherwise.
    #[instrument(skip_all, fields(levels = LEVELS))]
    pub fn evaluate(
        &self,
        witness: &Witness<LEVELS>,
        statement: &PublicStatement,
    ) -> Result<Derived, RelationError> {
        let result = self.evaluate_constraints(witness, statement);

        match &result {
            Ok(_) => tracing::trace!("relation satisfied"),
            Err(error) => tracing::debug!(kind = error.kind(), "relation not satisfied"),
        }

        result
    }

    /// Returns true if the relation holds for `witness` and `statement`.
    pub fn is_satisfied(&self, witness: &Witness<LEVELS>, statement: &PublicStatement) -> bool {
        self.evaluate(witness, statement).is_ok()
    }

    fn evaluate_constraints(
        &self,
        witness: &Witness<LEVELS>,
        statement: &PublicStatement,
    ) -> Result<Derived, RelationError> {
        let derived = derive_values(&witness.nullifier, &witness.secret)?;

        if !bool::from(derived.nullifier_tag.ct_eq(&statement.nullifier_tag)) {
            return Err(RelationError::NullifierTagMismatch);
        }

        merkle::verify(derived.commitment, statement.root, &witness.path)?;

        Ok(derived)
    }
}
