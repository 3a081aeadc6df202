// SPDX-License-Identifier: MIT OR Apache-2.0

//! Variant D: fully parallel fork-join mining.
//!
//! There is no level barrier: every surviving child partition spawns a new
//! mining task immediately, constrained only by the "can this branch still
//! produce results" test (a non-empty partition and a generation length the
//! constraints still admit). Scheduling is recursive task spawning on the
//! rayon pool.
//!
//! Listener output is routed through a dedicated single-consumer channel
//! drained by one thread, so consumers observe whole partitions in
//! submission order and never interleaved partial generations, even though
//! mining itself is unordered. Generation summaries are submitted through
//! the same channel once all tasks have finished.
//!
//! A panicking task aborts the whole run; the panic surfaces as a
//! [`Concurrency`] error and no partial results are returned.
//!
//! [`Concurrency`]: crate::core::error::HtpmError::Concurrency

use super::diagnostics::MiningDiagnostics;
use super::listener::{EmittedPattern, GenerationInfo, MiningListener};
use super::{
    emitted_patterns, join_partition, level_one, LabeledPartition, MiningResult,
    PatternWithOccurrences,
};
use crate::core::constraint::{ConstraintCollection, MiningConstraint};
use crate::core::error::{HtpmError, HtpmResult};
use crate::core::event::Database;
use crate::core::util::executor::panic_message;
use crossbeam_channel::Sender;
use dashmap::DashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

enum OutputEvent {
    Patterns(Vec<EmittedPattern>),
    Generation(GenerationInfo),
}

/// Fork-join mining engine
pub struct ForkJoinMiner {
    constraints: Arc<ConstraintCollection>,
}

impl ForkJoinMiner {
    pub fn new(constraints: ConstraintCollection) -> Self {
        Self {
            constraints: Arc::new(constraints),
        }
    }

    /// Run the fork-join search over `database`
    pub fn mine(
        &self,
        database: &Database,
        listener: &mut dyn MiningListener,
    ) -> HtpmResult<MiningResult> {
        let diagnostics = Arc::new(MiningDiagnostics::default());
        let first = level_one(database, &self.constraints, &diagnostics)?;
        let results: DashMap<usize, Vec<PatternWithOccurrences>> = DashMap::new();
        results.insert(1, first.members.clone());

        let (tx, rx) = crossbeam_channel::unbounded::<OutputEvent>();
        let (mined, consumer_outcome) = std::thread::scope(|scope| {
            let consumer = scope.spawn(move || {
                while let Ok(event) = rx.recv() {
                    match event {
                        OutputEvent::Patterns(patterns) => {
                            listener.patterns_emitted(&mut patterns.into_iter());
                        }
                        OutputEvent::Generation(info) => listener.generation_complete(info),
                    }
                }
            });

            let _ = tx.send(OutputEvent::Patterns(emitted_patterns(
                &first.members,
                &self.constraints,
                true,
            )));
            let mined = catch_unwind(AssertUnwindSafe(|| {
                rayon::scope(|s| {
                    self.mine_task(s, first, 2, database, &results, &tx, &diagnostics)
                });
            }));

            if mined.is_ok() {
                let mut generations: Vec<usize> =
                    results.iter().map(|entry| *entry.key()).collect();
                generations.sort_unstable();
                for k in generations {
                    let count = results.get(&k).map(|v| v.len()).unwrap_or(0);
                    let _ = tx.send(OutputEvent::Generation(GenerationInfo::now(k, count)));
                }
            }
            drop(tx);
            (mined, consumer.join())
        });

        consumer_outcome
            .map_err(|_| HtpmError::concurrency("output consumer thread panicked"))?;
        mined.map_err(|panic| {
            HtpmError::concurrency(format!("mining task panicked: {}", panic_message(&panic)))
        })?;

        let max_level = results.iter().map(|entry| *entry.key()).max().unwrap_or(0);
        let mut levels = Vec::with_capacity(max_level);
        for k in 1..=max_level {
            levels.push(results.remove(&k).map(|(_, v)| v).unwrap_or_default());
        }
        diagnostics.log_summary("fork-join-miner");
        Ok(MiningResult::assemble(levels, &self.constraints))
    }

    fn mine_task<'s>(
        &'s self,
        scope: &rayon::Scope<'s>,
        partition: LabeledPartition,
        k: usize,
        database: &'s Database,
        results: &'s DashMap<usize, Vec<PatternWithOccurrences>>,
        tx: &'s Sender<OutputEvent>,
        diagnostics: &'s Arc<MiningDiagnostics>,
    ) {
        if partition.members.is_empty() || !self.constraints.should_generate_patterns_of_length(k)
        {
            return;
        }
        let children = join_partition(
            &partition,
            k,
            false,
            &self.constraints,
            database,
            diagnostics,
        )
        .unwrap_or_else(|e| panic!("fork-join partition failed: {e}"));
        drop(partition);

        for child in children {
            results
                .entry(k)
                .or_default()
                .extend(child.members.iter().cloned());
            let _ = tx.send(OutputEvent::Patterns(emitted_patterns(
                &child.members,
                &self.constraints,
                true,
            )));
            scope.spawn(move |scope| {
                self.mine_task(scope, child, k + 1, database, results, tx, diagnostics)
            });
        }
    }
}
