// SPDX-License-Identifier: MIT OR Apache-2.0

//! Variant C: low-storage depth-first mining with streaming output.
//!
//! Depth-first like [`DfsMiner`], with two differences that bound memory to
//! the current DFS path:
//!
//! - occurrence pairs qualify for a join only when they extend the *same*
//!   prefix occurrence, tested in O(1) through the provenance link each
//!   occurrence carries to its parent occurrence;
//! - once a partition has been joined, its members are streamed to the
//!   listener as a lazy, single-pass sequence (pattern plus occurrence
//!   count) and the backing storage is dropped before the recursion
//!   continues into the children.
//!
//! Each partition join runs on the fixed-size worker pool, one task per
//! first-pattern index, with the same drain-or-die semantics as the
//! level-synchronous engine.
//!
//! [`DfsMiner`]: super::DfsMiner

use super::diagnostics::MiningDiagnostics;
use super::listener::{EmittedOccurrences, EmittedPattern, GenerationInfo, MiningListener};
use super::{
    collect_pooled_partitions, join_pattern_pair, level_one, merge_child_map, ChildMap,
    LabeledPartition,
};
use crate::core::config::MiningConfig;
use crate::core::constraint::{ConstraintCollection, MiningConstraint};
use crate::core::error::HtpmResult;
use crate::core::event::Database;
use crate::core::util::WorkerPool;
use dashmap::DashMap;
use std::sync::Arc;

/// Low-storage depth-first mining engine
pub struct LowStorageDfsMiner {
    config: MiningConfig,
    constraints: Arc<ConstraintCollection>,
}

impl LowStorageDfsMiner {
    pub fn new(config: MiningConfig, constraints: ConstraintCollection) -> HtpmResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            constraints: Arc::new(constraints),
        })
    }

    /// Run the streaming search over `database`. Occurrences are not
    /// retained; the return value carries per-generation counts only.
    pub fn mine(
        &self,
        database: &Database,
        listener: &mut dyn MiningListener,
    ) -> HtpmResult<Vec<GenerationInfo>> {
        let diagnostics = Arc::new(MiningDiagnostics::default());
        let first = level_one(database, &self.constraints, &diagnostics)?;
        let mut counts: Vec<usize> = Vec::new();
        self.descend(first, 1, database, listener, &mut counts, &diagnostics)?;

        let generations: Vec<GenerationInfo> = counts
            .iter()
            .enumerate()
            .map(|(index, count)| GenerationInfo::now(index + 1, *count))
            .collect();
        for info in &generations {
            listener.generation_complete(info.clone());
        }
        diagnostics.log_summary("low-storage-miner");
        Ok(generations)
    }

    fn descend(
        &self,
        partition: LabeledPartition,
        k: usize,
        database: &Database,
        listener: &mut dyn MiningListener,
        counts: &mut Vec<usize>,
        diagnostics: &Arc<MiningDiagnostics>,
    ) -> HtpmResult<()> {
        if counts.len() < k {
            counts.resize(k, 0);
        }
        counts[k - 1] += partition.members.len();

        let children = if !partition.members.is_empty()
            && self.constraints.should_generate_patterns_of_length(k + 1)
        {
            self.join_partition_pooled(partition.clone(), k + 1, database, diagnostics)?
        } else {
            Vec::new()
        };

        // This partition's occurrences are no longer needed: stream it out
        // and drop the storage before descending.
        let constraints = Arc::clone(&self.constraints);
        let mut stream = partition
            .members
            .into_iter()
            .filter(|m| constraints.should_output(&m.pattern, &m.occurrences))
            .map(|m| EmittedPattern {
                pattern: m.pattern,
                occurrences: EmittedOccurrences::Count(m.occurrences.len()),
            });
        listener.patterns_emitted(&mut stream);
        drop(stream);

        for child in children {
            self.descend(child, k + 1, database, listener, counts, diagnostics)?;
        }
        Ok(())
    }

    fn join_partition_pooled(
        &self,
        partition: LabeledPartition,
        k: usize,
        database: &Database,
        diagnostics: &Arc<MiningDiagnostics>,
    ) -> HtpmResult<Vec<LabeledPartition>> {
        let partitions: Arc<Vec<LabeledPartition>> = Arc::new(vec![partition]);
        let merged: Arc<DashMap<(usize, usize), ChildMap>> = Arc::new(DashMap::new());
        let pool = WorkerPool::new(self.config.pool_size)?;
        let member_count = partitions[0].members.len();
        for i in 0..member_count {
            let partitions = Arc::clone(&partitions);
            let constraints = Arc::clone(&self.constraints);
            let merged = Arc::clone(&merged);
            let diagnostics = Arc::clone(diagnostics);
            pool.execute(move || {
                let partition = &partitions[0];
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
                        true,
                        &constraints,
                        &diagnostics,
                    )
                    .unwrap_or_else(|e| panic!("partition join failed: {e}"));
                    if !pair.first.is_empty() {
                        let mut slot = merged.entry((0, i)).or_default();
                        merge_child_map(&mut slot, pair.first);
                    }
                    if !pair.second.is_empty() {
                        let mut slot = merged.entry((0, j)).or_default();
                        merge_child_map(&mut slot, pair.second);
                    }
                }
            });
        }
        pool.drain(self.config.drain_timeout)?;

        Ok(collect_pooled_partitions(
            &merged,
            &partitions,
            k,
            &self.constraints,
            database,
            diagnostics,
        ))
    }
}
