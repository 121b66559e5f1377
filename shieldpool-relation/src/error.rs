//! Errors that can occur when evaluating the withdrawal relation.
//!
//! Each [`RelationError`] variant corresponds to a violated constraint, so
//! enumerating the variants enumerates every way a witness can be rejected.

use std::fmt;

use thiserror::Error;

/// The private input a constraint failure refers to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum WitnessInput {
    /// The note nullifier.
    Nullifier,
    /// The note secret.
    Secret,
}

impl fmt::Display for WitnessInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WitnessInput::Nullifier => f.write_str("nullifier"),
            WitnessInput::Secret => f.write_str("secret"),
        }
    }
}

/// A structural constraint that a witness assignment violated.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Constraint {
    /// The path direction at `level` is not 0 or 1.
    PathIndex {
        /// The tree level, counted from the leaf.
        level: usize,
    },

    /// A decomposition digit of `input` is not 0 or 1.
    Decomposition {
        /// The decomposed input.
        input: WitnessInput,
        /// The little-endian digit position.
        digit: usize,
    },

    /// The weighted digit sum does not equal `input`.
    Reconstruction {
        /// The decomposed input.
        input: WitnessInput,
    },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Constraint::PathIndex { level } => {
                write!(f, "path index at level {level} must be 0 or 1")
            }
            Constraint::Decomposition { input, digit } => {
                write!(f, "digit {digit} of the {input} decomposition must be 0 or 1")
            }
            Constraint::Reconstruction { input } => {
                write!(f, "the {input} decomposition must reconstruct the {input}")
            }
        }
    }
}

/// The reasons a withdrawal witness does not satisfy the relation.
///
/// All of these failures are terminal: the prover must build a new witness.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RelationError {
    /// A boolean digit in the witness is not 0 or 1.
    #[error("malformed witness: {constraint}")]
    MalformedWitness {
        /// The violated constraint.
        constraint: Constraint,
    },

    /// The nullifier or secret does not fit in the decomposition width.
    #[error("the {input} must be less than 2^248")]
    OutOfRangeSecret {
        /// The out of range input.
        input: WitnessInput,
    },

    /// The authentication path does not lead from the commitment to the root.
    #[error("the commitment is not included in the tree with the public root")]
    InclusionMismatch,

    /// The nullifier tag derived from the witness differs from the public one.
    #[error("the derived nullifier tag does not match the public nullifier tag")]
    NullifierTagMismatch,

    /// A serialized authentication path has the wrong depth.
    #[error("authentication path has {actual} levels, but the relation has {expected} levels")]
    PathLength {
        /// The relation depth.
        expected: usize,
        /// The number of levels supplied.
        actual: usize,
    },
}

impl RelationError {
    /// Returns a short, stable name for this error kind, for logs and tool output.
    pub fn kind(&self) -> &'static str {
        match self {
            RelationError::MalformedWitness { .. } => "malformed-witness",
            RelationError::OutOfRangeSecret { .. } => "out-of-range-secret",
            RelationError::InclusionMismatch => "inclusion-mismatch",
            RelationError::NullifierTagMismatch => "nullifier-tag-mismatch",
            RelationError::PathLength { .. } => "path-length",
        }
    }
}

/// Errors when parsing or decoding field elements.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum FieldError {
    /// The string has no hex digits.
    #[error("field element hex must have at least one digit")]
    Empty,

    /// The string is not valid hex.
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// The encoding is wider than a field element.
    #[error("field element encodings are at most 32 bytes, got {0} bytes")]
    TooLong(usize),

    /// The value is not less than the field modulus.
    #[error("value is not a canonical field element encoding")]
    NonCanonical,
}

/// Errors when appending to or reading from a commitment tree.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TreeError {
    /// All leaf positions are used.
    #[error("the tree is full: it holds {capacity} leaves")]
    Full {
        /// The number of leaves in a full tree.
        capacity: u64,
    },

    /// The position has no leaf yet.
    #[error("position {position} has not been appended, the tree has {len} leaves")]
    UnknownPosition {
        /// The requested position.
        position: u64,
        /// The number of appended leaves.
        len: u64,
    },
}

/// Errors when parsing a note string.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum NoteError {
    /// The note string does not start with the note prefix.
    #[error("notes must start with {0:?}")]
    Prefix(&'static str),

    /// The note body is not valid hex.
    #[error("invalid note hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// The note body has the wrong length.
    #[error("note bodies are {expected} bytes, got {actual} bytes")]
    Length {
        /// The encoded note length.
        expected: usize,
        /// The supplied length.
        actual: usize,
    },
}
