//! Merkle inclusion of a leaf under a root.
//!
//! The leaf is folded with its authentication path, one level at a time:
//! the selector orders the accumulator and the sibling by the path direction,
//! then the pair hash produces the next accumulator. Each level depends on the
//! previous one, so the fold is strictly sequential.

use std::fmt;

use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::{
    error::{Constraint, RelationError},
    field::{self, Base},
    mimc::hash_pair,
    selector::select,
};


/// An authentication path for a tree with `LEVELS` levels.
///
/// `elements[i]` is the sibling of the current node at level `i`, counted from
/// the leaf. `indices[i]` is 0 if the current node is a left child, and 1 if it
/// is a right child. Indices are field elements, so a direction which is not
/// boolean can be supplied, and is then rejected by the selector.
///
/// Paths compare in constant time.
#[derive(Clone, Zeroize)]
pub struct MerklePath<const LEVELS: usize> {
    elements: [Base; LEVELS],
    indices: [Base; LEVELS],
}

impl<const LEVELS: usize> fmt::Debug for MerklePath<LEVELS> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Paths are private witness data.
        f.debug_struct("MerklePath")
            .field("levels", &LEVELS)
            .finish_non_exhaustive()
    }
}

impl<const LEVELS: usize> ConstantTimeEq for MerklePath<LEVELS> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.elements[..].ct_eq(&other.elements[..]) & self.indices[..].ct_eq(&other.indices[..])
    }
}

impl<const LEVELS: usize> PartialEq for MerklePath<LEVELS> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<const LEVELS: usize> Eq for MerklePath<LEVELS> {}

impl<const LEVELS: usize> MerklePath<LEVELS> {
    /// Creates a path from sibling nodes and direction digits.
    pub fn new(elements: [Base; LEVELS], indices: [Base; LEVELS]) -> Self {
        MerklePath { elements, indices }
    }

    /// Creates a path from sibling nodes and the leaf position.
    ///
    /// Bit `i` of `position` is the direction at level `i`.
    pub fn from_position(elements: [Base; LEVELS], position: u64) -> Self {
        let mut indices = [Base::zero(); LEVELS];
        for (level, index) in indices.iter_mut().enumerate() {
            *index = Base::from(position.checked_shr(level as u32).unwrap_or(0) & 1);
        }

        MerklePath { elements, indices }
    }

    /// Creates a path from serialized parts, checking that both have `LEVELS` entries.
    pub fn try_from_parts(elements: &[Base], indices: &[Base]) -> Result<Self, RelationError> {
        let check = |actual: usize| {
            if actual == LEVELS {
                Ok(())
            } else {
                Err(RelationError::PathLength {
                    expected: LEVELS,
                    actual,
                })
            }
        };
        check(elements.len())?;
        check(indices.len())?;

        let mut path = MerklePath::new([Base::zero(); LEVELS], [Base::zero(); LEVELS]);
        path.elements.copy_from_slice(elements);
        path.indices.copy_from_slice(indices);

        Ok(path)
    }

    /// Returns the sibling nodes, leaf level first.
    pub fn elements(&self) -> &[Base; LEVELS] {
        &self.elements
    }

    /// Returns the direction digits, leaf level first.
    pub fn indices(&self) -> &[Base; LEVELS] {
        &self.indices
    }

    /// Replaces the direction digit at `level`.
    ///
    /// # Panics
    ///
    /// If `level` is not less than `LEVELS`.
    pub fn set_index(&mut self, level: usize, index: Base) {
        self.indices[level] = index;
    }

    /// Replaces the sibling node at `level`.
    ///
    /// # Panics
    ///
    /// If `level` is not less than `LEVELS`.
    pub fn set_element(&mut self, level: usize, element: Base) {
        self.elements[level] = element;
    }
}

/// Folds `leaf` with `path`, and returns the root it leads to.
///
/// Fails if any path direction is not boolean.
pub fn compute_root<const LEVELS: usize>(
    leaf: Base,
    path: &MerklePath<LEVELS>,
) -> Result<Base, RelationError> {
    let mut accumulator = leaf;

    for (level, (sibling, index)) in path.elements.iter().zip(path.indices.iter()).enumerate() {
        let (left, right) = select(accumulator, *sibling, *index).map_err(|_| {
            RelationError::MalformedWitness {
                constraint: Constraint::PathIndex { level },
            }
        })?;

        accumulator = hash_pair(left, right);
    }

    Ok(accumulator)
}

/// Checks that `path` leads from `leaf` to `root`.
pub fn verify<const LEVELS: usize>(
    leaf: Base,
    root: Base,
    path: &MerklePath<LEVELS>,
) -> Result<(), RelationError> {
    let computed = compute_root(leaf, path)?;

    if bool::from(computed.ct_eq(&root)) {
        Ok(())
    } else {
        tracing::debug!(root = %field::to_hex(&root), "inclusion mismatch");
        Err(RelationError::InclusionMismatch)
    }
}
