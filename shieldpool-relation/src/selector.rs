//! The dual multiplexer that orders a node and its sibling.

use thiserror::Error;

use crate::{bits::is_boolean, field::Base};

#[cfg(test)]
mod tests;

/// The selector bit was not 0 or 1.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[error("selector bit must satisfy s·(1 − s) = 0")]
pub struct NonBooleanSelector;

/// Returns `(in0, in1)` if `s` is 0, and `(in1, in0)` if `s` is 1.
///
/// Rejects any other `s`. The swap is computed as
/// `out0 = in0 + s·(in1 − in0)` and `out1 = in1 − s·(in1 − in0)`,
/// so the direction bit never selects a branch.
pub fn select(in0: Base, in1: Base, s: Base) -> Result<(Base, Base), NonBooleanSelector> {
    if !bool::from(is_boolean(&s)) {
        return Err(NonBooleanSelector);
    }

    let delta = s * (in1 - in0);

    Ok((in0 + delta, in1 - delta))
}
