//! Configuration for witness checking tools and batch evaluation.

use serde::{Deserialize, Serialize};

use crate::relation::DEFAULT_LEVELS;

/// Configuration for relation evaluation.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// The commitment tree depth of the relation to evaluate.
    ///
    /// Relations are compiled for a fixed set of depths, so tools reject
    /// depths they were not built with.
    pub levels: usize,

    /// The number of threads used for batch evaluation.
    ///
    /// If this is zero, rayon picks the number of threads,
    /// which is usually the number of CPU cores.
    pub batch_threads: usize,
}

// we like our default configs to be explicit
#[allow(unknown_lints)]
#[allow(clippy::derivable_impls)]
impl Default for Config {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS,
            batch_threads: 0,
        }
    }
}
