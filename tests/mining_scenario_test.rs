// SPDX-License-Identifier: MIT OR Apache-2.0

//! Level-wise mining of the reference scenario: three sequences,
//! min-support 0.5.

mod common;
use common::{init_logging, pattern_strings, scenario_db};

use htpm_rust::core::config::MiningConfig;
use htpm_rust::core::mining::{CollectingListener, LevelMiner};

#[test]
fn test_scenario_level_one() {
    init_logging();
    let database = scenario_db();
    let config = MiningConfig::new(0.5);
    let constraints = config.base_constraints(&database).unwrap();
    let miner = LevelMiner::new(config, constraints).unwrap();
    let result = miner.mine(&database, &mut CollectingListener::new()).unwrap();

    assert_eq!(
        pattern_strings(result.level(1)),
        vec!["a+0<a-0", "b+0<b-0", "c"]
    );

    // (c) occurs in every sequence, five times overall
    let c = result.get("c").unwrap();
    assert_eq!(c.occurrences.len(), 5);
    assert_eq!(c.support(&database), 1.0);

    // (a+0<a-0) has two occurrences in sequences "1" and "3"
    let a = result.get("a+0<a-0").unwrap();
    assert_eq!(a.support(&database), 1.0);
    let per_seq = |seq: &str| {
        a.occurrences
            .iter()
            .filter(|o| o.sequence_id() == seq)
            .count()
    };
    assert_eq!(per_seq("1"), 2);
    assert_eq!(per_seq("2"), 1);
    assert_eq!(per_seq("3"), 2);

    let b = result.get("b+0<b-0").unwrap();
    assert_eq!(b.occurrences.len(), 3);
}

#[test]
fn test_scenario_deeper_levels() {
    init_logging();
    let database = scenario_db();
    let config = MiningConfig::new(0.5);
    let constraints = config.base_constraints(&database).unwrap();
    let miner = LevelMiner::new(config, constraints).unwrap();
    let result = miner.mine(&database, &mut CollectingListener::new()).unwrap();

    assert_eq!(
        pattern_strings(result.level(2)),
        vec![
            "a+0<a+1<a-0<a-1",
            "b+0<a+0<a-0=b-0",
            "b+0<c<b-0",
            "c<a+0<a-0",
            "c<c",
            "c=a+0<a-0",
            "c=b+0<b-0",
        ]
    );
    assert_eq!(
        pattern_strings(result.level(3)),
        vec![
            "b+0<c=a+0<a-0=b-0",
            "c<c=a+0<a-0",
            "c=b+0<a+0<a-0=b-0",
            "c=b+0<c<b-0",
        ]
    );
    assert_eq!(pattern_strings(result.level(4)), vec!["c=b+0<c=a+0<a-0=b-0"]);
    assert_eq!(result.levels().len(), 4);
    assert_eq!(result.total_pattern_count(), 15);

    // the paper's pattern occurs exactly once per sequence
    let key = result.get("b+0<a+0<a-0=b-0").unwrap();
    assert_eq!(key.support(&database), 1.0);
    assert_eq!(key.occurrences.len(), 3);
    for seq in ["1", "2", "3"] {
        assert_eq!(
            key.occurrences
                .iter()
                .filter(|o| o.sequence_id() == seq)
                .count(),
            1,
            "expected exactly one occurrence in sequence {seq}"
        );
    }

    // supports are memoized on the database, keyed structurally
    let parsed = htpm_rust::parse_pattern("b+0<a+0<a-0=b-0").unwrap();
    assert_eq!(database.cached_support(&parsed), Some(1.0));
}

#[test]
fn test_generation_listener() {
    init_logging();
    let database = scenario_db();
    let config = MiningConfig::new(0.5);
    let constraints = config.base_constraints(&database).unwrap();
    let miner = LevelMiner::new(config, constraints).unwrap();
    let mut listener = CollectingListener::new();
    miner.mine(&database, &mut listener).unwrap();

    let counts: Vec<(usize, usize)> = listener
        .generations
        .iter()
        .map(|g| (g.generation, g.pattern_count))
        .collect();
    assert_eq!(counts, vec![(1, 3), (2, 7), (3, 4), (4, 1)]);
    for window in listener.generations.windows(2) {
        assert!(window[0].timestamp_millis <= window[1].timestamp_millis);
    }
}
