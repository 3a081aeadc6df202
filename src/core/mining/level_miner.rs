// SPDX-License-Identifier: MIT OR Apache-2.0

//! Variant A: level-synchronous mining with a per-level worker pool.
//!
//! Every partition of level k is processed to completion before level k+1
//! begins. The pool runs one task per (partition, first-pattern-index)
//! pair; each task joins its pattern against all later members of the same
//! partition, accumulates children in task-local maps, and merges them
//! into a partition-level concurrent map at completion. The blocking drain
//! before the level transition is the only cross-level synchronization
//! point; join correctness requires the complete pruned result of level k
//! before any k+1 join may run.

use super::diagnostics::MiningDiagnostics;
use super::listener::{GenerationInfo, MiningListener};
use super::{
    collect_pooled_partitions, join_pattern_pair, level_one, merge_child_map, ChildMap,
    LabeledPartition, MiningResult, PatternWithOccurrences,
};
use crate::core::config::MiningConfig;
use crate::core::constraint::{ConstraintCollection, MiningConstraint};
use crate::core::error::HtpmResult;
use crate::core::event::Database;
use crate::core::util::WorkerPool;
use dashmap::DashMap;
use std::sync::Arc;

/// Level-synchronous mining engine
pub struct LevelMiner {
    config: MiningConfig,
    constraints: Arc<ConstraintCollection>,
}

impl LevelMiner {
    pub fn new(config: MiningConfig, constraints: ConstraintCollection) -> HtpmResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            constraints: Arc::new(constraints),
        })
    }

    /// Run the level-wise search over `database`
    pub fn mine(
        &self,
        database: &Database,
        listener: &mut dyn MiningListener,
    ) -> HtpmResult<MiningResult> {
        let diagnostics = Arc::new(MiningDiagnostics::default());
        let first = level_one(database, &self.constraints, &diagnostics)?;
        log::info!(
            "level 1: {} frequent patterns from {} sequences",
            first.members.len(),
            database.sequence_count()
        );
        listener.generation_complete(GenerationInfo::now(1, first.members.len()));

        let mut levels: Vec<Vec<PatternWithOccurrences>> = vec![first.members.clone()];
        let mut partitions: Arc<Vec<LabeledPartition>> = Arc::new(vec![first]);
        let mut k = 2;

        loop {
            let surviving: usize = partitions.iter().map(|p| p.members.len()).sum();
            // joins need at least two candidates somewhere
            if surviving <= 1 || !self.constraints.should_generate_patterns_of_length(k) {
                break;
            }

            let merged: Arc<DashMap<(usize, usize), ChildMap>> = Arc::new(DashMap::new());
            let pool = WorkerPool::new(self.config.pool_size)?;
            for (pi, partition) in partitions.iter().enumerate() {
                for i in 0..partition.members.len() {
                    let partitions = Arc::clone(&partitions);
                    let constraints = Arc::clone(&self.constraints);
                    let merged = Arc::clone(&merged);
                    let diagnostics = Arc::clone(&diagnostics);
                    pool.execute(move || {
                        let partition = &partitions[pi];
                        let left = &partition.members[i];
                        for j in i..partition.members.len() {
                            let right = &partition.members[j];
                            if !constraints.patterns_qualify_for_join(
                                partition.parent.as_ref(),
                                &left.pattern,
                                &right.pattern,
                                k,
                            ) {
                                diagnostics.count_pattern_pair_rejected();
                                continue;
                            }
                            let pair = join_pattern_pair(
                                partition.parent.as_ref(),
                                left,
                                right,
                                i == j,
                                k,
                                false,
                                &constraints,
                                &diagnostics,
                            )
                            .unwrap_or_else(|e| panic!("partition join failed: {e}"));
                            if !pair.first.is_empty() {
                                let mut slot = merged.entry((pi, i)).or_default();
                                merge_child_map(&mut slot, pair.first);
                            }
                            if !pair.second.is_empty() {
                                let mut slot = merged.entry((pi, j)).or_default();
                                merge_child_map(&mut slot, pair.second);
                            }
                        }
                    });
                }
            }
            pool.drain(self.config.drain_timeout)?;

            let next = collect_pooled_partitions(
                &merged,
                &partitions,
                k,
                &self.constraints,
                database,
                &diagnostics,
            );
            let level: Vec<PatternWithOccurrences> = next
                .iter()
                .flat_map(|p| p.members.iter().cloned())
                .collect();
            log::info!("level {k}: {} frequent patterns", level.len());
            listener.generation_complete(GenerationInfo::now(k, level.len()));
            if level.is_empty() {
                break;
            }
            levels.push(level);
            partitions = Arc::new(next);
            k += 1;
        }

        diagnostics.log_summary("level-miner");
        Ok(MiningResult::assemble(levels, &self.constraints))
    }
}
