//! End-to-end expansion scenarios on small hand-built tables.

use featlab_core::fixtures::abs_corr;
use featlab_core::{
    run_expansion, ConfigError, ExpansionConfig, ExpansionEngine, ExpansionError, Parameter,
    ParameterTable, SignificanceOutcome,
};

// ── Helpers ──────────────────────────────────────────────────────────

/// 1 − r² against the target: a deterministic stand-in for a permutation p-value.
fn one_minus_r2(values: &[f64], target: &[f64], _seed: u64) -> SignificanceOutcome {
    let r = abs_corr(values, target);
    SignificanceOutcome {
        fit_score: r * r,
        permutation_scores: Vec::new(),
        p_value: 1.0 - r * r,
    }
}

/// Walsh function `s` of length 8: mutually orthogonal, zero mean.
fn walsh(s: usize) -> Vec<f64> {
    (0..8usize)
        .map(|i| if (i & s).count_ones() % 2 == 0 { 1.0 } else { -1.0 })
        .collect()
}

/// Three mutually uncorrelated, strictly positive columns.
fn independent_table() -> ParameterTable {
    let column = |main: usize, minor: usize| -> Vec<f64> {
        walsh(main)
            .iter()
            .zip(walsh(minor))
            .map(|(a, b)| 3.0 + a + 0.5 * b)
            .collect()
    };
    ParameterTable::from_parameters([
        Parameter::raw("a", column(1, 3)),
        Parameter::raw("b", column(2, 6)),
        Parameter::raw("c", column(4, 5)),
    ])
    .unwrap()
}

fn assert_pairwise_below(table: &ParameterTable, cutoff: f64) {
    let params = table.as_slice();
    for (i, p) in params.iter().enumerate() {
        for q in &params[i + 1..] {
            let score = abs_corr(&p.values, &q.values);
            assert!(score < cutoff, "{} ~ {} = {score}", p.name, q.name);
        }
    }
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn independent_columns_expand_without_collinear_pairs() {
    let config = ExpansionConfig {
        colinearity_cutoff: 0.7,
        iterations: 1,
        ..Default::default()
    };
    let outcome = run_expansion(independent_table(), &config, &abs_corr, None).unwrap();

    assert_eq!(outcome.cleaning.kept, 3);
    let names: Vec<&str> = outcome.table.names().collect();
    assert_eq!(&names[..3], &["a", "b", "c"]);
    assert_eq!(outcome.table.len(), 3 + outcome.rounds[0].accepted());
    assert_pairwise_below(&outcome.table, 0.7);
}

#[test]
fn perfectly_associated_pair_drops_later_name() {
    let x1 = vec![1.0, 2.0, 3.0, 5.0, 8.0];
    let x2: Vec<f64> = x1.iter().map(|v| 2.0 * v + 1.0).collect();
    let raw = ParameterTable::from_parameters([
        Parameter::raw("x2", x2),
        Parameter::raw("x1", x1),
    ])
    .unwrap();
    let config = ExpansionConfig {
        iterations: 0,
        ..Default::default()
    };
    let outcome = run_expansion(raw, &config, &abs_corr, None).unwrap();
    assert_eq!(outcome.table.names().collect::<Vec<_>>(), vec!["x1"]);
    assert_eq!(outcome.cleaning.dropped, vec!["x2".to_string()]);
}

#[test]
fn significance_gate_is_consistent_with_scorer() {
    let x1: Vec<f64> = (1..=10).map(f64::from).collect();
    let x2 = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0];
    let y: Vec<f64> = x1
        .iter()
        .enumerate()
        .map(|(i, v)| 2.0 * v + if i % 2 == 0 { 0.3 } else { -0.3 })
        .collect();
    let raw = ParameterTable::from_parameters([
        Parameter::raw("x1", x1.clone()),
        Parameter::raw("x2", x2),
        Parameter::raw("y", y.clone()),
    ])
    .unwrap();
    let config = ExpansionConfig {
        iterations: 1,
        evaluate_significance: true,
        target_name: Some("y".into()),
        ..Default::default()
    };
    let outcome = run_expansion(raw, &config, &abs_corr, Some(&one_minus_r2)).unwrap();

    assert!(outcome.table.contains("x1"));
    assert!(!outcome.table.contains("y"));

    let p_x1 = one_minus_r2(&x1, &y, 42).p_value;
    let squared: Vec<f64> = x1.iter().map(|v| v * v).collect();
    let p_sq = one_minus_r2(&squared, &y, 42).p_value;
    assert_eq!(outcome.table.contains("x1_^2"), p_sq < p_x1);
    assert_eq!(outcome.p_value("x1"), Some(p_x1));
}

#[test]
fn thread_count_does_not_change_the_result() {
    let run = |threads: usize| {
        let config = ExpansionConfig {
            iterations: 2,
            threads: Some(threads),
            ..Default::default()
        };
        run_expansion(independent_table(), &config, &abs_corr, None).unwrap()
    };
    let single = run(1);
    let pooled = run(4);
    assert_eq!(single.table, pooled.table);
    assert_eq!(single.rounds, pooled.rounds);
}

#[test]
fn second_round_names_group_binary_parents() {
    let config = ExpansionConfig {
        colinearity_cutoff: 0.99,
        iterations: 2,
        ..Default::default()
    };
    let outcome = run_expansion(independent_table(), &config, &abs_corr, None).unwrap();
    for p in outcome.table.iter().filter(|p| p.provenance.round() == 2) {
        for parent in p.provenance.parents() {
            let compound = outcome
                .table
                .get(parent)
                .map(|q| q.provenance.round() > 0 && q.provenance.parents().len() == 2)
                .unwrap_or(false);
            if compound {
                assert!(p.name.contains(&format!("({parent})")), "{}", p.name);
            }
        }
    }
}

#[test]
fn raw_name_shadowing_a_candidate_is_fatal() {
    let raw = ParameterTable::from_parameters([
        Parameter::raw("x", vec![1.0, 4.0, 9.0, 16.0]),
        Parameter::raw("x_sqrt", vec![2.0, 1.0, 2.0, 1.0]),
    ])
    .unwrap();
    let config = ExpansionConfig {
        iterations: 1,
        ..Default::default()
    };
    let err = run_expansion(raw, &config, &abs_corr, None).unwrap_err();
    assert!(matches!(err, ExpansionError::NamingCollision { ref name, .. } if name == "x_sqrt"));
}

#[test]
fn significance_without_target_is_rejected_up_front() {
    let config = ExpansionConfig {
        evaluate_significance: true,
        ..Default::default()
    };
    let err = ExpansionEngine::new(&config, &abs_corr)
        .with_significance(&one_minus_r2)
        .run(independent_table())
        .unwrap_err();
    assert!(matches!(err, ExpansionError::Config(ConfigError::MissingTarget)));
}
