// SPDX-License-Identifier: MIT OR Apache-2.0

//! Behavior of the concrete pruning rules over the reference scenario.

mod common;
use common::{init_logging, pattern_strings, scenario_db};

use htpm_rust::core::config::MiningConfig;
use htpm_rust::core::constraint::{
    ConstraintCollection, CooccurrenceConstraint, MaxDurationConstraint, MinOccurrencesConstraint,
    MinSupportConstraint, PatternSizeConstraint, RegexConstraint,
};
use htpm_rust::core::event::Database;
use htpm_rust::core::mining::{LevelMiner, MiningResult, NoopListener};

fn mine_with(database: &Database, constraints: ConstraintCollection) -> MiningResult {
    LevelMiner::new(MiningConfig::new(0.5), constraints)
        .unwrap()
        .mine(database, &mut NoopListener)
        .unwrap()
}

fn support_constraints(database: &Database) -> ConstraintCollection {
    ConstraintCollection::new().with(Box::new(
        MinSupportConstraint::new(0.5, database.sequence_count()).unwrap(),
    ))
}

#[test]
fn test_anti_monotonicity_across_levels() {
    init_logging();
    let database = scenario_db();
    let result = mine_with(&database, support_constraints(&database));
    assert!(result.levels().len() >= 3);

    // support never grows along the canonical-parent lineage
    let mut checked = 0;
    for member in result.all_patterns() {
        if let Some(parent) = member.pattern.canonical_prefix() {
            let parent_support = database
                .cached_support(&parent)
                .expect("parent support must be memoized");
            assert!(
                member.support(&database) <= parent_support,
                "support of {} exceeds its parent {}",
                member.pattern,
                parent
            );
            checked += 1;
        }
    }
    // every pattern beyond level 1 has a recorded parent
    assert_eq!(checked, result.total_pattern_count() - result.level(1).len());
}

#[test]
fn test_cooccurrence_prefilter_loses_nothing() {
    init_logging();
    let database = scenario_db();
    let plain = mine_with(&database, support_constraints(&database));
    let filtered = mine_with(
        &database,
        support_constraints(&database).with(Box::new(CooccurrenceConstraint::new())),
    );

    assert_eq!(plain.levels().len(), filtered.levels().len());
    for k in 1..=plain.levels().len() {
        assert_eq!(
            pattern_strings(filtered.level(k)),
            pattern_strings(plain.level(k)),
            "co-occurrence pruning changed level {k}"
        );
    }
}

#[test]
fn test_max_duration_excludes_wide_occurrences() {
    init_logging();
    let database = scenario_db();
    let result = mine_with(
        &database,
        support_constraints(&database).with(Box::new(MaxDurationConstraint::new(5.0).unwrap())),
    );

    // every b interval except b[6,11] spans more than 5
    assert!(result.contains("c"));
    assert!(result.contains("a+0<a-0"));
    assert!(!result.contains("b+0<b-0"));
    assert!(result
        .all_patterns()
        .all(|p| !p.pattern.pattern_string().contains('b')));

    // c@8 joins stay inside the bound, c@6 joins with a[8,12] do not
    assert!(result.contains("c=a+0<a-0"));
    assert!(!result.contains("c<a+0<a-0"));
}

#[test]
fn test_min_occurrences_counts_absolutely() {
    init_logging();
    let database = scenario_db();
    let result = mine_with(
        &database,
        support_constraints(&database).with(Box::new(MinOccurrencesConstraint::new(3).unwrap())),
    );

    // three occurrences across all sequences survive, two do not
    assert!(result.contains("b+0<a+0<a-0=b-0"));
    assert!(result.contains("c=b+0<a+0<a-0=b-0"));
    assert!(!result.contains("c<c"));
    assert!(!result.contains("a+0<a+1<a-0<a-1"));
}

#[test]
fn test_size_constraint_caps_generation_and_output() {
    init_logging();
    let database = scenario_db();
    let capped = mine_with(
        &database,
        support_constraints(&database)
            .with(Box::new(PatternSizeConstraint::max_length(2).unwrap())),
    );
    assert_eq!(capped.levels().len(), 2);

    // a minimum output length hides short patterns without removing them
    // from the join material
    let hidden = mine_with(
        &database,
        support_constraints(&database)
            .with(Box::new(PatternSizeConstraint::new(None, 2).unwrap())),
    );
    assert!(hidden.level(1).is_empty());
    assert!(hidden.contains("b+0<a+0<a-0=b-0"));
    assert!(hidden.contains("c=b+0<c=a+0<a-0=b-0"));
}

#[test]
fn test_regex_filters_output_only() {
    init_logging();
    let database = scenario_db();
    let result = mine_with(
        &database,
        support_constraints(&database).with(Box::new(RegexConstraint::new("^b").unwrap())),
    );

    // only patterns opening with b are emitted, but the level-4 pattern
    // derived from non-matching parents was still mined
    assert!(result.contains("b+0<a+0<a-0=b-0"));
    assert!(result.contains("b+0<c<b-0"));
    assert!(!result.contains("c"));
    assert!(!result.contains("c=b+0<c=a+0<a-0=b-0"));
    for member in result.all_patterns() {
        assert!(member.pattern.pattern_string().starts_with('b'));
    }
}
