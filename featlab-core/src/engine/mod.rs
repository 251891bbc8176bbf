//! Expansion engine — the orchestrator.
//!
//! One [`ExpansionEngine::run`] call walks the stages
//! `Init → Cleaning → Iterating(1..=n) → Finalize` over a [`RunState`] it
//! owns exclusively:
//!
//! 1. Init: split the target and ignored columns off the raw table
//! 2. Cleaning: global collinearity over the raw features, baseline p-values
//! 3. Iterating: generate, evaluate in parallel, merge survivors in key order
//! 4. Finalize: hand the accepted set back as an [`ExpansionOutcome`]

pub mod expansion;
pub mod progress;
pub mod state;

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, info, warn};

use crate::config::{ExpansionConfig, RECOMMENDED_MAX_ITERATIONS};
use crate::domain::{Parameter, ParameterTable};
use crate::error::{ConfigError, DataShapeError, ExpansionError};
use crate::filter::{
    RedundancyFilter, RejectReason, Rejection, SignificanceFilter, SignificanceRecord,
};
use crate::scoring::{AssociationScorer, SignificanceScorer};

pub use expansion::{bivariate_specs, univariate_specs, Candidate, Evaluation, Gate, Plan};
pub use progress::{ExpansionProgress, NullProgress};
pub use state::{CleaningSummary, RoundSummary, RunState, Stage};

/// Everything a finished run produced.
#[derive(Debug)]
pub struct ExpansionOutcome {
    /// Final accepted set: cleaned raw columns first, then each round's
    /// survivors in merge order.
    pub table: ParameterTable,
    /// Target column, if one was named. Never part of `table`.
    pub target: Option<Vec<f64>>,
    /// p-values of every accepted parameter (significance mode only).
    pub significance: Option<SignificanceRecord>,
    pub cleaning: CleaningSummary,
    pub rounds: Vec<RoundSummary>,
    /// Empty unless `record_rejections` was set.
    pub rejections: Vec<Rejection>,
}

impl ExpansionOutcome {
    pub fn p_value(&self, name: &str) -> Option<f64> {
        self.significance.as_ref().and_then(|r| r.get(name))
    }

    /// Parameters added by expansion (excludes the cleaned raw columns).
    pub fn derived_count(&self) -> usize {
        self.rounds.iter().map(RoundSummary::accepted).sum()
    }

    /// Rejection totals by kind, taken from the summaries so they are
    /// available even without a rejection log. Every cleaning drop counts
    /// under `"cleaning"`.
    pub fn rejection_counts(&self) -> BTreeMap<&'static str, usize> {
        let screened = if self.significance.is_some() {
            "not_significant"
        } else {
            "collinear"
        };
        let mut counts = BTreeMap::new();
        counts.insert("cleaning", self.cleaning.dropped.len());
        counts.insert(
            "domain",
            self.rounds.iter().map(|r| r.domain_rejected).sum(),
        );
        counts.insert(
            "degenerate",
            self.rounds.iter().map(|r| r.degenerate_rejected).sum(),
        );
        counts.insert(screened, self.rounds.iter().map(|r| r.screened_out).sum());
        counts
    }
}

/// Drives one expansion run.
///
/// The engine only borrows its collaborators, so one configuration and one
/// set of scorers can serve many runs.
pub struct ExpansionEngine<'a> {
    config: &'a ExpansionConfig,
    association: &'a dyn AssociationScorer,
    significance: Option<&'a dyn SignificanceScorer>,
    progress: &'a dyn ExpansionProgress,
}

impl<'a> ExpansionEngine<'a> {
    pub fn new(config: &'a ExpansionConfig, association: &'a dyn AssociationScorer) -> Self {
        Self {
            config,
            association,
            significance: None,
            progress: &NullProgress,
        }
    }

    pub fn with_significance(mut self, scorer: &'a dyn SignificanceScorer) -> Self {
        self.significance = Some(scorer);
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ExpansionProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Run all stages over `raw`.
    ///
    /// Configuration problems are reported before any column is touched.
    /// With `threads` set, candidate evaluation runs on a dedicated pool of
    /// that size; otherwise on rayon's global pool.
    pub fn run(&self, raw: ParameterTable) -> Result<ExpansionOutcome, ExpansionError> {
        self.config.validate()?;
        if self.config.evaluate_significance && self.significance.is_none() {
            return Err(ConfigError::MissingSignificanceScorer.into());
        }

        match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| ExpansionError::ThreadPool(e.to_string()))?;
                pool.install(|| self.run_stages(raw))
            }
            None => self.run_stages(raw),
        }
    }

    fn run_stages(&self, raw: ParameterTable) -> Result<ExpansionOutcome, ExpansionError> {
        let mut state = self.init(raw)?;
        self.clean(&mut state);
        for round in 1..=self.config.iterations {
            self.iterate(&mut state, round)?;
        }
        Ok(self.finalize(state))
    }

    fn active_significance(&self) -> Option<&'a dyn SignificanceScorer> {
        self.significance
            .filter(|_| self.config.evaluate_significance)
    }

    fn init(&self, mut raw: ParameterTable) -> Result<RunState, ExpansionError> {
        self.progress.on_stage(Stage::Init);

        let target = match &self.config.target_name {
            Some(name) => match raw.take(name) {
                Some(column) => Some(column.values),
                None if self.config.evaluate_significance => {
                    return Err(ConfigError::TargetNotFound(name.clone()).into());
                }
                None => {
                    return Err(DataShapeError::MissingColumn {
                        name: name.clone(),
                        role: "target",
                    }
                    .into());
                }
            },
            None => None,
        };

        for name in &self.config.ignored_names {
            if self.config.target_name.as_ref() == Some(name) {
                continue;
            }
            if raw.take(name).is_none() {
                return Err(DataShapeError::MissingColumn {
                    name: name.clone(),
                    role: "ignored",
                }
                .into());
            }
        }

        if self.config.iterations > RECOMMENDED_MAX_ITERATIONS {
            let message = format!(
                "iterations = {} exceeds the recommended maximum of {}; \
                 bivariate expansion grows quadratically with the accepted set",
                self.config.iterations, RECOMMENDED_MAX_ITERATIONS
            );
            warn!("{message}");
            self.progress.on_warning(&message);
        }

        info!(
            "expanding {} features over {} samples ({} rounds, {} gate)",
            raw.len(),
            raw.n_samples(),
            self.config.iterations,
            if self.config.evaluate_significance {
                "significance"
            } else {
                "redundancy"
            }
        );
        Ok(RunState::new(raw, target))
    }

    fn clean(&self, state: &mut RunState) {
        state.advance(Stage::Cleaning);
        self.progress.on_stage(Stage::Cleaning);

        let input = state.accepted.len();
        let result =
            RedundancyFilter::new(self.association, self.config.colinearity_cutoff).clean(&state.accepted);
        for rejection in &result.dropped {
            debug!("cleaning: dropped '{}': {}", rejection.candidate, rejection.reason);
        }

        let keep: HashSet<String> = result.kept.into_iter().collect();
        state.accepted.retain(|p| keep.contains(&p.name));
        state.cleaning = CleaningSummary {
            input,
            kept: state.accepted.len(),
            dropped: result.dropped.iter().map(|r| r.candidate.clone()).collect(),
        };
        if self.config.record_rejections {
            state.rejections.extend(result.dropped);
        }

        if let (Some(scorer), Some(target)) = (self.active_significance(), state.target.as_deref()) {
            let filter = SignificanceFilter::new(scorer, target, self.config.seed);
            state.significance = Some(filter.baseline(&state.accepted));
        }

        info!(
            "cleaning: kept {} of {} features",
            state.cleaning.kept, state.cleaning.input
        );
        self.progress.on_cleaned(&state.cleaning);
    }

    fn iterate(&self, state: &mut RunState, round: usize) -> Result<(), ExpansionError> {
        state.advance(Stage::Iterating(round));
        self.progress.on_stage(Stage::Iterating(round));

        let accepted_before = state.accepted.len();
        if let Some(cap) = self.config.max_accepted {
            if accepted_before > cap {
                return Err(ExpansionError::CapacityExceeded {
                    round,
                    accepted: accepted_before,
                    cap,
                });
            }
        }
        self.progress
            .on_round_start(round, self.config.iterations, accepted_before);

        let univariate = univariate_specs(&state.accepted);
        let bivariate = bivariate_specs(&state.accepted);
        let mut summary = RoundSummary {
            round,
            accepted_before,
            generated: univariate.len() + bivariate.len(),
            ..Default::default()
        };

        let mut seen = HashMap::new();
        let univariate = expansion::plan(univariate, &state.accepted, &mut seen)?;
        let bivariate = expansion::plan(bivariate, &state.accepted, &mut seen)?;
        summary.already_explored = univariate.already_explored + bivariate.already_explored;

        let gate = match (
            self.active_significance(),
            state.target.as_deref(),
            state.significance.as_ref(),
        ) {
            (Some(scorer), Some(target), Some(record)) => Gate::Significance {
                filter: SignificanceFilter::new(scorer, target, self.config.seed),
                record,
            },
            _ => Gate::Redundancy(RedundancyFilter::new(
                self.association,
                self.config.colinearity_cutoff,
            )),
        };

        let evaluated = expansion::evaluate(&univariate.fresh, &state.accepted, &gate)?
            .into_iter()
            .chain(expansion::evaluate(&bivariate.fresh, &state.accepted, &gate)?);

        // Survivors are folded in key order. In redundancy mode a survivor is
        // also screened against those admitted before it in this round.
        let in_round = match &gate {
            Gate::Redundancy(filter) => Some(filter),
            Gate::Significance { .. } => None,
        };
        let mut admitted: Vec<(Parameter, Option<f64>)> = Vec::new();
        for evaluation in evaluated {
            let (spec, reason) = match evaluation {
                Evaluation::Rejected { spec, reason } => (spec, reason),
                Evaluation::Passed(candidate) => {
                    let verdict = match in_round {
                        Some(filter) => {
                            filter.screen(&candidate.values, admitted.iter().map(|(p, _)| p))
                        }
                        None => Ok(()),
                    };
                    match verdict {
                        Ok(()) => {
                            if candidate.spec.is_unary() {
                                summary.univariate_accepted += 1;
                            } else {
                                summary.bivariate_accepted += 1;
                            }
                            admitted.push((
                                Parameter::derived(&candidate.spec, candidate.values, round),
                                candidate.p_value,
                            ));
                            continue;
                        }
                        Err(reason) => (candidate.spec, reason),
                    }
                }
            };

            match reason {
                RejectReason::Domain(_) => summary.domain_rejected += 1,
                RejectReason::Degenerate { .. } => summary.degenerate_rejected += 1,
                _ => summary.screened_out += 1,
            }
            debug!("round {round}: rejected {} = {spec}: {reason}", spec.name());
            if self.config.record_rejections {
                state.rejections.push(Rejection {
                    candidate: spec.name(),
                    round,
                    reason,
                });
            }
        }

        for (parameter, p_value) in admitted {
            if let (Some(record), Some(p)) = (state.significance.as_mut(), p_value) {
                record.insert(parameter.name.clone(), p);
            }
            state.accepted.insert(parameter)?;
        }

        if summary.is_no_progress() {
            info!("round {round}: no candidate survived screening");
            self.progress.on_no_progress(round);
        }
        info!(
            "round {round}/{}: {} generated, {} already explored, {} domain-rejected, \
             {} constant, {} screened out, {} accepted; accepted set {} -> {}",
            self.config.iterations,
            summary.generated,
            summary.already_explored,
            summary.domain_rejected,
            summary.degenerate_rejected,
            summary.screened_out,
            summary.accepted(),
            summary.accepted_before,
            summary.accepted_after()
        );
        self.progress.on_round_complete(&summary);
        state.rounds.push(summary);
        Ok(())
    }

    fn finalize(&self, mut state: RunState) -> ExpansionOutcome {
        state.advance(Stage::Finalize);
        self.progress.on_stage(Stage::Finalize);

        ExpansionOutcome {
            table: state.accepted,
            target: state.target,
            significance: state.significance,
            cleaning: state.cleaning,
            rounds: state.rounds,
            rejections: state.rejections,
        }
    }
}

/// Convenience wrapper for a run without progress reporting.
pub fn run_expansion(
    raw: ParameterTable,
    config: &ExpansionConfig,
    association: &dyn AssociationScorer,
    significance: Option<&dyn SignificanceScorer>,
) -> Result<ExpansionOutcome, ExpansionError> {
    let mut engine = ExpansionEngine::new(config, association);
    if let Some(scorer) = significance {
        engine = engine.with_significance(scorer);
    }
    engine.run(raw)
}
