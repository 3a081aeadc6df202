// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generate/join/prune mining engines.
//!
//! All four engine variants share the same machinery: level-1 seeding from
//! the raw sequences, the pairwise join inside a canonical-parent
//! partition, and pattern-level filtering at partition completion. They
//! differ only in scheduling:
//!
//! - [`LevelMiner`]: level-synchronous. A worker pool processes every
//!   partition of a level to completion before the next level begins.
//! - [`DfsMiner`]: depth-first. Descends into each surviving child
//!   partition immediately, bounding peak memory to the recursion stack.
//! - [`LowStorageDfsMiner`]: depth-first with streaming output. Completed
//!   partitions are handed to the listener and discarded; occurrence pairs
//!   qualify through prefix-occurrence identity.
//! - [`ForkJoinMiner`]: fully parallel. Every surviving partition spawns a
//!   new task immediately, with listener output serialized through a
//!   single-consumer channel.
//!
//! A partition is the set of same-length patterns sharing one canonical
//! parent; joins happen only within a partition, which is what keeps the
//! pairwise join space sub-quadratic.

pub mod dfs_miner;
pub mod diagnostics;
pub mod fork_join_miner;
pub mod level_miner;
pub mod listener;
pub mod low_storage_miner;

pub use dfs_miner::DfsMiner;
pub use diagnostics::MiningDiagnostics;
pub use fork_join_miner::ForkJoinMiner;
pub use level_miner::LevelMiner;
pub use listener::{
    CollectingListener, EmittedOccurrences, EmittedPattern, GenerationInfo, LogMiningListener,
    MiningListener, NoopListener,
};
pub use low_storage_miner::LowStorageDfsMiner;

use crate::core::constraint::support::relative_support;
use crate::core::constraint::{ConstraintCollection, MiningConstraint};
use crate::core::error::HtpmResult;
use crate::core::event::Database;
use crate::core::pattern::{or_align, AlignedParent, HybridTemporalPattern, Occurrence, PatternBuilder};
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A frequent pattern together with all of its retained occurrences
#[derive(Debug, Clone)]
pub struct PatternWithOccurrences {
    pub pattern: Arc<HybridTemporalPattern>,
    pub occurrences: Vec<Arc<Occurrence>>,
}

impl PatternWithOccurrences {
    /// Relative support of this pattern within `database`
    pub fn support(&self, database: &Database) -> f64 {
        relative_support(&self.occurrences, database.sequence_count())
    }
}

/// The patterns of one level sharing a single canonical parent.
///
/// `parent` is `None` only for the level-1 partition, whose canonical
/// parent is the empty pattern.
#[derive(Debug, Clone)]
pub struct LabeledPartition {
    pub parent: Option<Arc<HybridTemporalPattern>>,
    pub members: Vec<PatternWithOccurrences>,
}

/// Frequent patterns grouped by level, with occurrences retained
#[derive(Debug, Default)]
pub struct MiningResult {
    levels: Vec<Vec<PatternWithOccurrences>>,
}

impl MiningResult {
    pub(crate) fn assemble(
        mut levels: Vec<Vec<PatternWithOccurrences>>,
        constraints: &ConstraintCollection,
    ) -> Self {
        for level in &mut levels {
            level.retain(|m| constraints.should_output(&m.pattern, &m.occurrences));
        }
        while matches!(levels.last(), Some(level) if level.is_empty()) {
            levels.pop();
        }
        Self { levels }
    }

    pub fn levels(&self) -> &[Vec<PatternWithOccurrences>] {
        &self.levels
    }

    /// Patterns of level `k` (1-based)
    pub fn level(&self, k: usize) -> &[PatternWithOccurrences] {
        self.levels
            .get(k.wrapping_sub(1))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn all_patterns(&self) -> impl Iterator<Item = &PatternWithOccurrences> {
        self.levels.iter().flatten()
    }

    pub fn total_pattern_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Look up a pattern by its canonical string
    pub fn get(&self, pattern_string: &str) -> Option<&PatternWithOccurrences> {
        self.all_patterns()
            .find(|m| m.pattern.pattern_string() == pattern_string)
    }

    pub fn contains(&self, pattern_string: &str) -> bool {
        self.get(pattern_string).is_some()
    }
}

pub(crate) type ChildMap = HashMap<Arc<HybridTemporalPattern>, HashSet<Arc<Occurrence>>>;

/// Children of one pattern pair, split by which source became the
/// canonical parent
#[derive(Debug, Default)]
pub(crate) struct PairJoin {
    pub first: ChildMap,
    pub second: ChildMap,
}

pub(crate) fn merge_child_map(into: &mut ChildMap, from: ChildMap) {
    for (pattern, occurrences) in from {
        into.entry(pattern).or_default().extend(occurrences);
    }
}

/// Join every qualifying occurrence pair of `left` and `right`.
///
/// A self-join (`self_pair`) visits each unordered occurrence pair exactly
/// once and never pairs an occurrence with itself.
pub(crate) fn join_pattern_pair(
    prefix: Option<&Arc<HybridTemporalPattern>>,
    left: &PatternWithOccurrences,
    right: &PatternWithOccurrences,
    self_pair: bool,
    k: usize,
    require_shared_parent: bool,
    constraints: &ConstraintCollection,
    diagnostics: &MiningDiagnostics,
) -> HtpmResult<PairJoin> {
    let mut out = PairJoin::default();
    for (i, o1) in left.occurrences.iter().enumerate() {
        let start = if self_pair { i + 1 } else { 0 };
        for o2 in &right.occurrences[start..] {
            if o1.sequence_id() != o2.sequence_id() {
                continue;
            }
            if require_shared_parent && !o1.shares_prefix_occurrence(o2) {
                continue;
            }
            if !constraints.occurrence_records_qualify_for_join(
                &left.pattern,
                o1,
                &right.pattern,
                o2,
                k,
            ) {
                diagnostics.count_occurrence_pair_rejected();
                continue;
            }
            diagnostics.count_alignment();
            let aligned = match or_align(prefix, &left.pattern, o1, &right.pattern, o2)? {
                Some(aligned) => aligned,
                None => continue,
            };
            if !constraints.new_occurrence_fulfills_constraints(
                &aligned.pattern,
                &aligned.occurrence,
                k,
            ) {
                diagnostics.count_occurrence_rejected();
                continue;
            }
            let map = match aligned.parent {
                AlignedParent::First => &mut out.first,
                AlignedParent::Second => &mut out.second,
            };
            map.entry(aligned.pattern)
                .or_default()
                .insert(aligned.occurrence);
        }
    }
    Ok(out)
}

/// Apply pattern-level filtering to the accumulated children of one
/// canonical parent, record supports, and notify precomputing constraints.
pub(crate) fn filter_partition(
    parent: Option<Arc<HybridTemporalPattern>>,
    children: ChildMap,
    k: usize,
    constraints: &ConstraintCollection,
    database: &Database,
    diagnostics: &MiningDiagnostics,
) -> LabeledPartition {
    let mut members = Vec::new();
    for (pattern, occurrence_set) in children {
        let occurrences: Vec<Arc<Occurrence>> = occurrence_set.into_iter().collect();
        if constraints.pattern_fulfills_constraints(&pattern, &occurrences, k) {
            database.record_support(
                (*pattern).clone(),
                relative_support(&occurrences, database.sequence_count()),
            );
            constraints.observe_frequent_pattern(k, &pattern);
            members.push(PatternWithOccurrences {
                pattern,
                occurrences,
            });
        } else {
            diagnostics.count_pattern_rejected();
        }
    }
    members.sort_by_key(|m| m.pattern.pattern_string());
    LabeledPartition { parent, members }
}

/// Build the single level-1 partition: one length-1 pattern per event
/// shape, all sharing the empty canonical parent.
pub(crate) fn level_one(
    database: &Database,
    constraints: &ConstraintCollection,
    diagnostics: &MiningDiagnostics,
) -> HtpmResult<LabeledPartition> {
    let mut children: ChildMap = HashMap::new();
    for sequence in database.sequences() {
        for event in sequence.events() {
            let (pattern, occurrence) = PatternBuilder::length_one(sequence.id_arc(), event)?;
            if !constraints.new_occurrence_fulfills_constraints(&pattern, &occurrence, 1) {
                diagnostics.count_occurrence_rejected();
                continue;
            }
            children.entry(pattern).or_default().insert(occurrence);
        }
    }
    Ok(filter_partition(
        None,
        children,
        1,
        constraints,
        database,
        diagnostics,
    ))
}

/// Sequentially join one partition into its child partitions for level `k`
pub(crate) fn join_partition(
    partition: &LabeledPartition,
    k: usize,
    require_shared_parent: bool,
    constraints: &ConstraintCollection,
    database: &Database,
    diagnostics: &MiningDiagnostics,
) -> HtpmResult<Vec<LabeledPartition>> {
    let member_count = partition.members.len();
    let mut slots: HashMap<usize, ChildMap> = HashMap::new();
    for i in 0..member_count {
        for j in i..member_count {
            let left = &partition.members[i];
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
                require_shared_parent,
                constraints,
                diagnostics,
            )?;
            if !pair.first.is_empty() {
                merge_child_map(slots.entry(i).or_default(), pair.first);
            }
            if !pair.second.is_empty() {
                merge_child_map(slots.entry(j).or_default(), pair.second);
            }
        }
    }

    let mut indices: Vec<usize> = slots.keys().copied().collect();
    indices.sort_unstable();
    let mut out = Vec::new();
    for index in indices {
        if let Some(children) = slots.remove(&index) {
            let parent = Arc::clone(&partition.members[index].pattern);
            let child =
                filter_partition(Some(parent), children, k, constraints, database, diagnostics);
            if !child.members.is_empty() {
                out.push(child);
            }
        }
    }
    Ok(out)
}

/// Collect the merged slot maps of a pooled level join into the surviving
/// child partitions, in slot order.
pub(crate) fn collect_pooled_partitions(
    merged: &DashMap<(usize, usize), ChildMap>,
    partitions: &[LabeledPartition],
    k: usize,
    constraints: &ConstraintCollection,
    database: &Database,
    diagnostics: &MiningDiagnostics,
) -> Vec<LabeledPartition> {
    let mut keys: Vec<(usize, usize)> = merged.iter().map(|entry| *entry.key()).collect();
    keys.sort_unstable();
    let mut out = Vec::new();
    for key in keys {
        if let Some((_, children)) = merged.remove(&key) {
            let parent = Arc::clone(&partitions[key.0].members[key.1].pattern);
            let child =
                filter_partition(Some(parent), children, k, constraints, database, diagnostics);
            if !child.members.is_empty() {
                out.push(child);
            }
        }
    }
    out
}

/// Emission payload of a partition's members, output-filtered
pub(crate) fn emitted_patterns(
    members: &[PatternWithOccurrences],
    constraints: &ConstraintCollection,
    retain_occurrences: bool,
) -> Vec<EmittedPattern> {
    members
        .iter()
        .filter(|m| constraints.should_output(&m.pattern, &m.occurrences))
        .map(|m| EmittedPattern {
            pattern: Arc::clone(&m.pattern),
            occurrences: if retain_occurrences {
                EmittedOccurrences::Retained(m.occurrences.clone())
            } else {
                EmittedOccurrences::Count(m.occurrences.len())
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{Event, HybridEventSequence};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct PairProbe {
        pairs: Arc<AtomicUsize>,
    }

    impl MiningConstraint for PairProbe {
        fn occurrence_records_qualify_for_join(
            &self,
            _p1: &HybridTemporalPattern,
            _o1: &Occurrence,
            _p2: &HybridTemporalPattern,
            _o2: &Occurrence,
            _k: usize,
        ) -> bool {
            self.pairs.fetch_add(1, Ordering::Relaxed);
            true
        }
    }

    fn point_db(times: &[f64]) -> Database {
        let mut sequence = HybridEventSequence::new("s");
        for &time in times {
            sequence.push(Event::point("mn_c", time).unwrap());
        }
        Database::from_sequences(vec![sequence])
    }

    #[test]
    fn test_self_join_visits_each_unordered_pair_once() {
        let database = point_db(&[1.0, 2.0, 3.0]);
        let pairs = Arc::new(AtomicUsize::new(0));
        let constraints = ConstraintCollection::new().with(Box::new(PairProbe {
            pairs: Arc::clone(&pairs),
        }));
        let diagnostics = MiningDiagnostics::default();

        let first = level_one(&database, &constraints, &diagnostics).unwrap();
        assert_eq!(first.members.len(), 1);
        assert_eq!(first.members[0].occurrences.len(), 3);

        let children =
            join_partition(&first, 2, false, &constraints, &database, &diagnostics).unwrap();

        // three occurrences self-join as exactly C(3, 2) unordered pairs
        assert_eq!(pairs.load(Ordering::Relaxed), 3);
        assert_eq!(children.len(), 1);
        let child = &children[0].members[0];
        assert_eq!(child.pattern.pattern_string(), "mn_c<mn_c");
        assert_eq!(child.occurrences.len(), 3);
    }

    #[test]
    fn test_level_one_groups_by_pattern_shape() {
        let mut s1 = HybridEventSequence::new("s1");
        s1.push(Event::point("mn_p", 1.0).unwrap());
        s1.push(Event::interval("mn_i", 2.0, 4.0).unwrap());
        let mut s2 = HybridEventSequence::new("s2");
        s2.push(Event::point("mn_p", 7.0).unwrap());
        let database = Database::from_sequences(vec![s1, s2]);
        let diagnostics = MiningDiagnostics::default();

        let first = level_one(&database, &ConstraintCollection::new(), &diagnostics).unwrap();
        assert_eq!(first.members.len(), 2);
        let point = first
            .members
            .iter()
            .find(|m| m.pattern.pattern_string() == "mn_p")
            .unwrap();
        assert_eq!(point.occurrences.len(), 2);
        assert!(first.parent.is_none());
    }
}
