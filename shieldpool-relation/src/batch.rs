//! Parallel evaluation of independent withdrawals.
//!
//! Each evaluation is a pure function of its witness and statement, so a batch
//! is evaluated by mapping over the items on a rayon thread pool.

use rayon::prelude::*;
use tracing::instrument;

use crate::{
    config::Config,
    error::RelationError,
    relation::{Derived, PublicStatement, WithdrawalRelation, Witness},
};


/// The result of evaluating one batch item.
pub type ItemResult = Result<Derived, RelationError>;

/// Evaluates `relation` for each `(witness, statement)` pair in `items`,
/// on the global rayon thread pool.
///
/// Returns one result per item, in the same order as `items`.
#[instrument(skip_all, fields(levels = LEVELS, items = items.len()))]
pub fn evaluate_batch<const LEVELS: usize>(
    relation: &WithdrawalRelation<LEVELS>,
    items: &[(Witness<LEVELS>, PublicStatement)],
) -> Vec<ItemResult> {
    let results: Vec<ItemResult> = items
        .par_iter()
        .map(|(witness, statement)| relation.evaluate(witness, statement))
        .collect();

    let satisfied = results.iter().filter(|result| result.is_ok()).count();
    tracing::debug!(satisfied, "evaluated batch");

    results
}

/// Evaluates batches on a dedicated thread pool.
#[derive(Debug)]
pub struct BatchEvaluator {
    pool: rayon::ThreadPool,
}

impl BatchEvaluator {
    /// Builds a thread pool with `config.batch_threads` threads,
    /// or rayon's default number of threads if that is zero.
    pub fn new(config: &Config) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.batch_threads)
            .thread_name(|index| format!("shieldpool-batch-{index}"))
            .build()?;

        Ok(BatchEvaluator { pool })
    }

    /// Returns the number of threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Evaluates `relation` for each item in `items`, on this evaluator's pool.
    ///
    /// Returns one result per item, in the same order as `items`.
    pub fn evaluate<const LEVELS: usize>(
        &self,
        relation: &WithdrawalRelation<LEVELS>,
        items: &[(Witness<LEVELS>, PublicStatement)],
    ) -> Vec<ItemResult> {
        self.pool.install(|| evaluate_batch(relation, items))
    }
}
