//! Progress reporting for expansion runs.

use super::state::{CleaningSummary, RoundSummary, Stage};

/// Trait for receiving orchestrator progress.
///
/// All methods default to no-ops so reporters implement only what they show.
pub trait ExpansionProgress: Send + Sync {
    /// Called on every stage transition.
    fn on_stage(&self, _stage: Stage) {}

    /// Called once cleaning has produced the round-0 accepted set.
    fn on_cleaned(&self, _summary: &CleaningSummary) {}

    /// Called before round `round` of `total` expands `accepted` parameters.
    fn on_round_start(&self, _round: usize, _total: usize, _accepted: usize) {}

    /// Called after a round's survivors have been merged.
    fn on_round_complete(&self, _summary: &RoundSummary) {}

    /// Called when a round accepted nothing. The run continues.
    fn on_no_progress(&self, _round: usize) {}

    /// Non-fatal advisory (e.g. an iteration count that is unsafe to run).
    fn on_warning(&self, _message: &str) {}
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ExpansionProgress for NullProgress {}
