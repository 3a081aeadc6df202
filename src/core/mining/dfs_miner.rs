// SPDX-License-Identifier: MIT OR Apache-2.0

//! Variant B: depth-first mining.
//!
//! Levels 1 and 2 are materialized breadth-first; level 2 must be complete
//! before any deeper join so that precomputing constraints such as the
//! co-occurrence pre-filter observe every frequent 2-pattern. From there
//! the engine descends into each surviving child partition immediately
//! instead of finishing a level first, so peak memory is bounded by the
//! active recursion path rather than by the widest level. Siblings are
//! only shared at the same recursion depth.

use super::diagnostics::MiningDiagnostics;
use super::listener::{GenerationInfo, MiningListener};
use super::{join_partition, level_one, LabeledPartition, MiningResult, PatternWithOccurrences};
use crate::core::constraint::{ConstraintCollection, MiningConstraint};
use crate::core::error::HtpmResult;
use crate::core::event::Database;
use std::sync::Arc;

/// Depth-first mining engine
pub struct DfsMiner {
    constraints: Arc<ConstraintCollection>,
}

impl DfsMiner {
    pub fn new(constraints: ConstraintCollection) -> Self {
        Self {
            constraints: Arc::new(constraints),
        }
    }

    /// Run the depth-first search over `database`
    pub fn mine(
        &self,
        database: &Database,
        listener: &mut dyn MiningListener,
    ) -> HtpmResult<MiningResult> {
        let diagnostics = MiningDiagnostics::default();
        let first = level_one(database, &self.constraints, &diagnostics)?;
        let mut levels: Vec<Vec<PatternWithOccurrences>> = vec![first.members.clone()];
        self.descend(&first, 2, database, &mut levels, &diagnostics)?;

        // Levels complete out of order under DFS; generation summaries are
        // reported once the whole run has finished.
        for (index, level) in levels.iter().enumerate() {
            listener.generation_complete(GenerationInfo::now(index + 1, level.len()));
        }
        diagnostics.log_summary("dfs-miner");
        Ok(MiningResult::assemble(levels, &self.constraints))
    }

    fn descend(
        &self,
        partition: &LabeledPartition,
        k: usize,
        database: &Database,
        levels: &mut Vec<Vec<PatternWithOccurrences>>,
        diagnostics: &MiningDiagnostics,
    ) -> HtpmResult<()> {
        if partition.members.is_empty() || !self.constraints.should_generate_patterns_of_length(k)
        {
            return Ok(());
        }
        let children = join_partition(
            partition,
            k,
            false,
            &self.constraints,
            database,
            diagnostics,
        )?;
        if children.is_empty() {
            return Ok(());
        }
        if levels.len() < k {
            levels.resize_with(k, Vec::new);
        }
        for child in &children {
            levels[k - 1].extend(child.members.iter().cloned());
        }
        for child in &children {
            self.descend(child, k + 1, database, levels, diagnostics)?;
        }
        Ok(())
    }
}
