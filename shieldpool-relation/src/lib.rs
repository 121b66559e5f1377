//! The shielded pool withdrawal relation.
//!
//! A depositor holds a secret note `(nullifier, secret)`. The note derives a
//! public _commitment_, which is appended to a fixed-depth Merkle tree, and a
//! public _nullifier tag_, which is published when the note is withdrawn.
//!
//! [`relation::WithdrawalRelation`] is satisfied when:
//! - the commitment of the note is a leaf of the tree with the public root, and
//! - the nullifier tag of the note equals the public nullifier tag.
//!
//! Proof generation, verification keys and the ledger that stores commitments
//! and spent nullifier tags live outside this crate. This crate evaluates the
//! relation over concrete values, and derives the public values a prover needs.
#![deny(missing_docs)]
#![allow(clippy::try_err)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod bits;
pub mod config;
pub mod error;
pub mod field;
pub mod merkle;
pub mod mimc;
pub mod note;
pub mod pedersen;
pub mod relation;
pub mod selector;
pub mod tree;

pub use config::Config;
pub use error::RelationError;
pub use field::Base;
pub use relation::{Derived, PublicStatement, WithdrawalRelation, Witness, DEFAULT_LEVELS};
