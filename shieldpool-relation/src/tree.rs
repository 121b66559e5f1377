//! Note commitment trees.
//!
//! A note commitment tree is an append-only Merkle tree of fixed depth. Each
//! deposit appends the commitment of a new note. A withdrawal proves that its
//! commitment is a leaf of the tree with some published root.
//!
//! The tree does not protect against double-spending: the ledger does that by
//! recording nullifier tags. This in-memory tree is what a client uses to build
//! authentication paths for witnesses.

use std::fmt;

use once_cell::sync::Lazy;

use crate::{error::TreeError, field::Base, merkle::MerklePath, mimc::hash_pair};


/// The maximum supported tree depth.
pub const MAX_DEPTH: usize = 32;

/// The value of a leaf which has not been appended yet.
pub const UNCOMMITTED: Base = Base::zero();

/// Roots of empty subtrees, indexed by height.
///
/// `EMPTY_ROOTS[0]` is an empty leaf, and `EMPTY_ROOTS[h + 1]` is the hash of
/// two empty subtrees of height `h`.
pub static EMPTY_ROOTS: Lazy<Vec<Base>> = Lazy::new(|| {
    let mut roots = vec![UNCOMMITTED];

    for height in 0..MAX_DEPTH {
        roots.push(hash_pair(roots[height], roots[height]));
    }

    roots
});

/// The index of a note commitment at the leaf layer of its tree.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Position(pub u64);

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An append-only note commitment tree with `LEVELS` levels.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MerkleTree<const LEVELS: usize> {
    /// `layers[h]` holds the non-empty nodes at height `h`, left to right.
    /// `layers[0]` holds the leaves, and `layers[LEVELS]` holds the root once
    /// a leaf has been appended.
    layers: Vec<Vec<Base>>,
}

impl<const LEVELS: usize> Default for MerkleTree<LEVELS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const LEVELS: usize> MerkleTree<LEVELS> {
    const DEPTH_IS_SUPPORTED: () = assert!(
        LEVELS <= MAX_DEPTH,
        "commitment trees have at most MAX_DEPTH levels"
    );

    /// Creates an empty tree.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::DEPTH_IS_SUPPORTED;

        MerkleTree {
            layers: vec![Vec::new(); LEVELS + 1],
        }
    }

    /// Builds a tree by appending `leaves` in order.
    pub fn from_leaves(leaves: impl IntoIterator<Item = Base>) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        for leaf in leaves {
            tree.append(leaf)?;
        }

        Ok(tree)
    }

    /// The number of leaves in a full tree.
    pub fn capacity() -> u64 {
        1u64 << LEVELS
    }

    /// Returns the number of appended leaves.
    pub fn len(&self) -> u64 {
        self.layers[0].len() as u64
    }

    /// Returns true if no leaves have been appended.
    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    /// Returns the current root of the tree.
    pub fn root(&self) -> Base {
        self.node(LEVELS, 0)
    }

    /// Returns the leaf at `position`, if it has been appended.
    pub fn leaf(&self, position: Position) -> Option<Base> {
        self.layers[0].get(position.0 as usize).copied()
    }

    /// Appends `leaf`, updating the nodes on its path to the root.
    ///
    /// Returns the position of the new leaf.
    pub fn append(&mut self, leaf: Base) -> Result<Position, TreeError> {
        let position = self.len();
        if position >= Self::capacity() {
            return Err(TreeError::Full {
                capacity: Self::capacity(),
            });
        }

        self.layers[0].push(leaf);

        let mut index = position as usize;
        let mut node = leaf;
        for height in 0..LEVELS {
            let sibling = self.node(height, index ^ 1);
            node = if index & 1 == 0 {
                hash_pair(node, sibling)
            } else {
                hash_pair(sibling, node)
            };

            index >>= 1;
            let layer = &mut self.layers[height + 1];
            if index < layer.len() {
                layer[index] = node;
            } else {
                layer.push(node);
            }
        }

        tracing::trace!(%position, "appended note commitment");

        Ok(Position(position))
    }

    /// Returns the authentication path of the leaf at `position`.
    pub fn path(&self, position: Position) -> Result<MerklePath<LEVELS>, TreeError> {
        if position.0 >= self.len() {
            return Err(TreeError::UnknownPosition {
                position: position.0,
                len: self.len(),
            });
        }

        let mut elements = [UNCOMMITTED; LEVELS];
        let mut index = position.0 as usize;
        for (height, element) in elements.iter_mut().enumerate() {
            *element = self.node(height, index ^ 1);
            index >>= 1;
        }

        Ok(MerklePath::from_position(elements, position.0))
    }

    /// Returns the node at `height` and `index`, or the empty subtree root
    /// if that node has no appended leaves under it.
    fn node(&self, height: usize, index: usize) -> Base {
        self.layers[height]
            .get(index)
            .copied()
            .unwrap_or(EMPTY_ROOTS[height])
    }
}
