// SPDX-License-Identifier: MIT OR Apache-2.0

//! All four engine variants must discover the same frequent pattern set.

mod common;
use common::{init_logging, pattern_strings, scenario_db};

use htpm_rust::core::config::MiningConfig;
use htpm_rust::core::mining::{
    CollectingListener, DfsMiner, ForkJoinMiner, LevelMiner, LowStorageDfsMiner, NoopListener,
};

#[test]
fn test_variants_agree_on_scenario() {
    init_logging();
    let database = scenario_db();
    let config = MiningConfig::new(0.5);

    let level = LevelMiner::new(config.clone(), config.base_constraints(&database).unwrap())
        .unwrap()
        .mine(&database, &mut NoopListener)
        .unwrap();
    let dfs = DfsMiner::new(config.base_constraints(&database).unwrap())
        .mine(&database, &mut NoopListener)
        .unwrap();
    let fork_join = ForkJoinMiner::new(config.base_constraints(&database).unwrap())
        .mine(&database, &mut NoopListener)
        .unwrap();

    assert_eq!(level.levels().len(), dfs.levels().len());
    assert_eq!(level.levels().len(), fork_join.levels().len());
    for k in 1..=level.levels().len() {
        let expected = pattern_strings(level.level(k));
        assert_eq!(pattern_strings(dfs.level(k)), expected, "dfs level {k}");
        assert_eq!(
            pattern_strings(fork_join.level(k)),
            expected,
            "fork-join level {k}"
        );
    }
}

#[test]
fn test_low_storage_streams_the_same_patterns() {
    init_logging();
    let database = scenario_db();
    let config = MiningConfig::new(0.5);

    let level = LevelMiner::new(config.clone(), config.base_constraints(&database).unwrap())
        .unwrap()
        .mine(&database, &mut NoopListener)
        .unwrap();
    let mut expected: Vec<String> = level
        .all_patterns()
        .map(|p| p.pattern.pattern_string())
        .collect();
    expected.sort();

    let mut listener = CollectingListener::new();
    let generations = LowStorageDfsMiner::new(
        config.clone(),
        config.base_constraints(&database).unwrap(),
    )
    .unwrap()
    .mine(&database, &mut listener)
    .unwrap();

    let mut streamed: Vec<String> = listener
        .patterns
        .iter()
        .map(|e| e.pattern.pattern_string())
        .collect();
    streamed.sort();
    assert_eq!(streamed, expected);

    // the streaming engine reports occurrence counts, not occurrences
    let key = listener
        .patterns
        .iter()
        .find(|e| e.pattern.pattern_string() == "b+0<a+0<a-0=b-0")
        .unwrap();
    assert_eq!(key.occurrences.count(), 3);

    let counts: Vec<(usize, usize)> = generations
        .iter()
        .map(|g| (g.generation, g.pattern_count))
        .collect();
    assert_eq!(counts, vec![(1, 3), (2, 7), (3, 4), (4, 1)]);
}

#[test]
fn test_fork_join_emits_whole_partitions_in_order() {
    init_logging();
    let database = scenario_db();
    let config = MiningConfig::new(0.5);

    let mut listener = CollectingListener::new();
    ForkJoinMiner::new(config.base_constraints(&database).unwrap())
        .mine(&database, &mut listener)
        .unwrap();

    // every frequent pattern is emitted exactly once, and the generation
    // summaries arrive in level order after all patterns
    assert_eq!(listener.patterns.len(), 15);
    let counts: Vec<(usize, usize)> = listener
        .generations
        .iter()
        .map(|g| (g.generation, g.pattern_count))
        .collect();
    assert_eq!(counts, vec![(1, 3), (2, 7), (3, 4), (4, 1)]);
}
