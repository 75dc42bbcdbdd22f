// ========================================================================================
//
//                        The scoring pipeline: one run, end to end
//
// ========================================================================================
//
// Loader -> Validator -> Aggregator -> Evaluator, strictly in that order. Validation
// finishes before the first aggregation row is read, so a rejected submission never
// yields a score. Any failure ends the run; nothing is retried.

use crate::aggregate::aggregate_submission;
use crate::ams::ams;
use crate::config::ScoringConfig;
use crate::solution::load_solution;
use crate::types::{ScoreError, ScoreReport};
use crate::validate::check_submission;
use log::info;
use std::time::Instant;

/// Runs the full scoring pipeline described by `config`.
pub fn run(config: &ScoringConfig) -> Result<ScoreReport, ScoreError> {
    config.validate()?;
    let start = Instant::now();

    // --- Phase 1: Ground truth ---
    let solution = load_solution(&config.solution_path)?;

    // --- Phase 2: Rank-order validation ---
    check_submission(
        &config.submission_path,
        config.expected_events,
        config.rank_check,
    )?;

    // --- Phase 3: Weighted aggregation ---
    let sums = aggregate_submission(&config.submission_path, &solution)?;

    // --- Phase 4: Significance ---
    let significance = ams(sums.signal, sums.background)?;

    info!(
        "Scored '{}' against '{}' in {:.2?}",
        config.submission_path.display(),
        config.solution_path.display(),
        start.elapsed()
    );

    Ok(ScoreReport {
        signal: sums.signal,
        background: sums.background,
        ams: significance,
        predicted_signal_rows: sums.predicted_signal_rows,
    })
}
