//! Deposit notes.
//!
//! A note is the `(nullifier, secret)` pair a depositor keeps. The note string
//! is the only thing needed to withdraw a deposit later, so it must be stored
//! as carefully as a private key.

use std::{fmt, str::FromStr};

use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    error::{NoteError, RelationError},
    field::{from_short_bytes, Base},
    merkle::MerklePath,
    relation::{derive_values, Derived, Witness},
};


/// The prefix of encoded note strings.
pub const NOTE_PREFIX: &str = "shieldpool-note-";

/// The number of random bytes in a nullifier or secret.
///
/// 31 bytes always fit in the 248-bit decomposition width.
pub const NOTE_VALUE_BYTES: usize = 31;

/// The number of bytes in an encoded note body.
const NOTE_BYTES: usize = 2 * NOTE_VALUE_BYTES;

/// A secret deposit note.
///
/// Notes compare in constant time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Note {
    nullifier: Base,
    secret: Base,
}

impl ConstantTimeEq for Note {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.nullifier.ct_eq(&other.nullifier) & self.secret.ct_eq(&other.secret)
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Note {}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Note").finish_non_exhaustive()
    }
}

impl Note {
    /// Generates a new note using `csprng`.
    pub fn random<R>(csprng: &mut R) -> Self
    where
        R: RngCore + CryptoRng,
    {
        let mut bytes = [0u8; NOTE_BYTES];
        csprng.fill_bytes(&mut bytes);

        let note = Self::from_bytes(&bytes);
        bytes.zeroize();

        note
    }

    /// Returns the note nullifier.
    pub fn nullifier(&self) -> &Base {
        &self.nullifier
    }

    /// Returns the note secret.
    pub fn secret(&self) -> &Base {
        &self.secret
    }

    /// Derives the commitment and nullifier tag of this note.
    pub fn derive(&self) -> Result<Derived, RelationError> {
        derive_values(&self.nullifier, &self.secret)
    }

    /// Returns the commitment appended to the tree when this note is deposited.
    pub fn commitment(&self) -> Result<Base, RelationError> {
        Ok(self.derive()?.commitment)
    }

    /// Returns the nullifier tag published when this note is withdrawn.
    pub fn nullifier_tag(&self) -> Result<Base, RelationError> {
        Ok(self.derive()?.nullifier_tag)
    }

    /// Builds a withdrawal witness for this note, using the authentication
    /// path of its commitment.
    pub fn to_witness<const LEVELS: usize>(&self, path: MerklePath<LEVELS>) -> Witness<LEVELS> {
        // Note values are always in range.
        Witness::new_unchecked(self.nullifier, self.secret, path)
    }

    fn from_bytes(bytes: &[u8; NOTE_BYTES]) -> Self {
        let (nullifier, secret) = bytes.split_at(NOTE_VALUE_BYTES);

        Note {
            nullifier: from_short_bytes(nullifier),
            secret: from_short_bytes(secret),
        }
    }

    fn to_bytes(&self) -> [u8; NOTE_BYTES] {
        let mut bytes = [0u8; NOTE_BYTES];
        let (nullifier, secret) = bytes.split_at_mut(NOTE_VALUE_BYTES);

        nullifier.copy_from_slice(&self.nullifier.to_bytes()[..NOTE_VALUE_BYTES]);
        secret.copy_from_slice(&self.secret.to_bytes()[..NOTE_VALUE_BYTES]);

        bytes
    }
}

/// Writes the note string: the prefix, then hex of the little-endian
/// nullifier and secret bytes.
impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut bytes = self.to_bytes();
        let result = write!(f, "{NOTE_PREFIX}{}", hex::encode(bytes));
        bytes.zeroize();

        result
    }
}

impl FromStr for Note {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .trim()
            .strip_prefix(NOTE_PREFIX)
            .ok_or(NoteError::Prefix(NOTE_PREFIX))?;

        let mut decoded = hex::decode(body)?;
        if decoded.len() != NOTE_BYTES {
            let actual = decoded.len();
            decoded.zeroize();

            return Err(NoteError::Length {
                expected: NOTE_BYTES,
                actual,
            });
        }

        let mut bytes = [0u8; NOTE_BYTES];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();

        let note = Note::from_bytes(&bytes);
        bytes.zeroize();

        Ok(note)
    }
}
