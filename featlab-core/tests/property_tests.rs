//! Property tests for expansion invariants.
//!
//! Uses proptest to verify:
//! 1. Collinearity: no accepted pair reaches the cutoff (redundancy mode)
//! 2. Significance monotonicity: every survivor beats all of its parents
//! 3. Domain rejection: reciprocal of a column containing 0 never appears
//! 4. Uniqueness and closure: names are distinct and parents are retained
//! 5. Idempotence: zero iterations returns exactly the cleaned input

use std::collections::HashSet;

use featlab_core::filter::RedundancyFilter;
use featlab_core::fixtures::{abs_corr, by_sum};
use featlab_core::{run_expansion, ExpansionConfig, Parameter, ParameterTable};
use proptest::prelude::*;

const SAMPLES: usize = 8;

fn to_table(columns: Vec<Vec<f64>>) -> ParameterTable {
    ParameterTable::from_parameters(
        columns
            .into_iter()
            .enumerate()
            .map(|(i, v)| Parameter::raw(format!("c{i}"), v)),
    )
    .unwrap()
}

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_column() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-5.0..5.0_f64, SAMPLES)
        .prop_map(|v| v.into_iter().map(|x| (x * 100.0).round() / 100.0).collect())
}

fn arb_columns() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(arb_column(), 2..=4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // ── 1. Collinearity ──────────────────────────────────────────────

    #[test]
    fn accepted_pairs_stay_below_cutoff(columns in arb_columns(), cutoff in 0.3..0.95_f64) {
        let config = ExpansionConfig {
            colinearity_cutoff: cutoff,
            iterations: 1,
            ..Default::default()
        };
        let outcome = run_expansion(to_table(columns), &config, &abs_corr, None).unwrap();
        let params = outcome.table.as_slice();
        for (i, p) in params.iter().enumerate() {
            for q in &params[i + 1..] {
                let score = abs_corr(&p.values, &q.values);
                prop_assert!(score < cutoff, "{} ~ {} = {}", p.name, q.name, score);
            }
        }
    }

    // ── 2. Significance monotonicity ─────────────────────────────────

    #[test]
    fn survivors_improve_on_every_parent(columns in arb_columns(), target in arb_column()) {
        let mut table = to_table(columns);
        table.insert(Parameter::raw("y", target)).unwrap();
        let config = ExpansionConfig {
            iterations: 2,
            evaluate_significance: true,
            target_name: Some("y".into()),
            ..Default::default()
        };
        let outcome = run_expansion(table, &config, &abs_corr, Some(&by_sum)).unwrap();
        prop_assert!(!outcome.table.contains("y"));
        for p in outcome.table.iter().filter(|p| !p.provenance.is_raw()) {
            let own = outcome.p_value(&p.name).unwrap();
            for parent in p.provenance.parents() {
                let parent_p = outcome.p_value(parent).unwrap();
                prop_assert!(own < parent_p, "{} ({}) vs {} ({})", p.name, own, parent, parent_p);
            }
        }
    }

    // ── 3. Domain rejection ──────────────────────────────────────────

    #[test]
    fn reciprocal_of_zero_column_never_survives(mut columns in arb_columns(), at in 0..SAMPLES) {
        columns[0][at] = 0.0;
        let config = ExpansionConfig {
            colinearity_cutoff: 1.0,
            iterations: 1,
            ..Default::default()
        };
        let outcome = run_expansion(to_table(columns), &config, &abs_corr, None).unwrap();
        prop_assert!(!outcome.table.contains("c0_1/"));
        prop_assert!(!outcome.table.contains("c0_ln"));
        prop_assert!(outcome.rounds[0].domain_rejected >= 2);
    }

    // ── 4. Uniqueness and closure ────────────────────────────────────

    #[test]
    fn names_are_unique_and_parents_retained(columns in arb_columns()) {
        let config = ExpansionConfig {
            iterations: 2,
            ..Default::default()
        };
        let outcome = run_expansion(to_table(columns), &config, &abs_corr, None).unwrap();
        let names: HashSet<&str> = outcome.table.names().collect();
        prop_assert_eq!(names.len(), outcome.table.len());
        for p in outcome.table.iter() {
            for parent in p.provenance.parents() {
                prop_assert!(names.contains(parent.as_str()));
            }
        }
    }

    // ── 5. Idempotence at zero iterations ────────────────────────────

    #[test]
    fn zero_iterations_equals_cleaning(columns in arb_columns()) {
        let config = ExpansionConfig {
            iterations: 0,
            ..Default::default()
        };
        let table = to_table(columns);
        let cleaned = RedundancyFilter::new(&abs_corr, config.colinearity_cutoff).clean(&table);
        let outcome = run_expansion(table, &config, &abs_corr, None).unwrap();
        let names: Vec<String> = outcome.table.names().map(String::from).collect();
        prop_assert_eq!(names, cleaned.kept);
        prop_assert!(outcome.rounds.is_empty());
    }
}
