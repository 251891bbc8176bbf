//! Candidate generation and evaluation for one round.
//!
//! Generation is cheap and sequential: it only builds [`CandidateSpec`]s.
//! Evaluation (operator application plus screening against the accepted set)
//! is pure per candidate and runs on the rayon pool. Spec lists are sorted
//! before evaluation, and rayon's indexed `collect` keeps that order, so the
//! merge that follows sees the same sequence regardless of scheduling.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::domain::{Parameter, ParameterTable, Provenance};
use crate::error::ExpansionError;
use crate::filter::{
    is_degenerate, RedundancyFilter, RejectReason, SignificanceFilter, SignificanceRecord,
};
use crate::operators::{BinaryOp, CandidateSpec, Operator, UnaryOp};

fn is_compound(p: &Parameter) -> bool {
    matches!(
        p.provenance,
        Provenance::Derived {
            operator: Operator::Binary(_),
            ..
        }
    )
}

/// Every unary operator on every accepted parameter, sorted.
pub fn univariate_specs(accepted: &ParameterTable) -> Vec<CandidateSpec> {
    let mut specs: Vec<CandidateSpec> = accepted
        .iter()
        .flat_map(|p| {
            let grouped = [is_compound(p)];
            UnaryOp::ALL
                .into_iter()
                .map(move |op| CandidateSpec::unary(op, p.name.as_str()).with_grouping(&grouped))
        })
        .collect();
    specs.sort();
    specs
}

/// Every binary operator on every unordered pair of distinct accepted
/// parameters, sorted. Within a pair the smaller name comes first.
pub fn bivariate_specs(accepted: &ParameterTable) -> Vec<CandidateSpec> {
    let mut params: Vec<&Parameter> = accepted.iter().collect();
    params.sort_by(|a, b| a.name.cmp(&b.name));

    let mut specs = Vec::new();
    for (i, a) in params.iter().enumerate() {
        for b in &params[i + 1..] {
            for op in BinaryOp::ALL {
                for (x, y) in op.orderings(*a, *b) {
                    let grouped = [is_compound(x), is_compound(y)];
                    specs.push(
                        CandidateSpec::binary(op, x.name.as_str(), y.name.as_str())
                            .with_grouping(&grouped),
                    );
                }
            }
        }
    }
    specs.sort();
    specs
}

/// Specs that still need evaluating this round.
#[derive(Debug, Default)]
pub struct Plan {
    pub fresh: Vec<CandidateSpec>,
    /// Specs whose name already exists in the accepted set with the same
    /// derivation (e.g. `x_^2` regenerated from raw `x` in round 2).
    pub already_explored: usize,
}

/// Drop already-explored specs and check name uniqueness.
///
/// `seen` carries the names claimed earlier in the same round, so one map
/// spans both the univariate and the bivariate plan.
pub fn plan(
    specs: Vec<CandidateSpec>,
    accepted: &ParameterTable,
    seen: &mut HashMap<String, CandidateSpec>,
) -> Result<Plan, ExpansionError> {
    let mut plan = Plan::default();
    for spec in specs {
        let name = spec.name();
        if let Some(existing) = accepted.get(&name) {
            if existing.provenance.matches(&spec) {
                plan.already_explored += 1;
                continue;
            }
            return Err(ExpansionError::NamingCollision {
                detail: format!("{spec} collides with accepted parameter ({})", existing.provenance),
                name,
            });
        }
        if let Some(previous) = seen.get(&name) {
            return Err(ExpansionError::NamingCollision {
                detail: format!("{spec} and {previous} produce the same name"),
                name,
            });
        }
        seen.insert(name, spec.clone());
        plan.fresh.push(spec);
    }
    Ok(plan)
}

/// Acceptance gate for a round.
pub enum Gate<'a> {
    Redundancy(RedundancyFilter<'a>),
    Significance {
        filter: SignificanceFilter<'a>,
        record: &'a SignificanceRecord,
    },
}

/// A candidate that passed the gate against the accepted set.
#[derive(Debug)]
pub struct Candidate {
    pub spec: CandidateSpec,
    pub values: Vec<f64>,
    pub p_value: Option<f64>,
}

#[derive(Debug)]
pub enum Evaluation {
    Passed(Candidate),
    Rejected {
        spec: CandidateSpec,
        reason: RejectReason,
    },
}

/// Evaluate specs in parallel, preserving their order.
pub fn evaluate(
    specs: &[CandidateSpec],
    accepted: &ParameterTable,
    gate: &Gate<'_>,
) -> Result<Vec<Evaluation>, ExpansionError> {
    specs
        .par_iter()
        .map(|spec| evaluate_one(spec, accepted, gate))
        .collect()
}

fn evaluate_one(
    spec: &CandidateSpec,
    accepted: &ParameterTable,
    gate: &Gate<'_>,
) -> Result<Evaluation, ExpansionError> {
    let inputs = accepted.resolve(spec.parents())?;
    let values = match spec.operator().apply(&inputs) {
        Ok(values) => values,
        Err(violation) => {
            return Ok(Evaluation::Rejected {
                spec: spec.clone(),
                reason: RejectReason::Domain(violation),
            })
        }
    };
    if is_degenerate(&values) {
        return Ok(Evaluation::Rejected {
            spec: spec.clone(),
            reason: RejectReason::Degenerate {
                value: values.first().copied().unwrap_or(f64::NAN),
            },
        });
    }

    let (verdict, p_value) = match gate {
        Gate::Redundancy(filter) => (filter.screen(&values, accepted.iter()), None),
        Gate::Significance { filter, record } => {
            let p = filter.p_value(&values);
            (filter.screen(p, spec.parents(), record), Some(p))
        }
    };

    Ok(match verdict {
        Ok(()) => Evaluation::Passed(Candidate {
            spec: spec.clone(),
            values,
            p_value,
        }),
        Err(reason) => Evaluation::Rejected {
            spec: spec.clone(),
            reason,
        },
    })
}
