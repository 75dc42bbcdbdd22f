// ========================================================================================
//
//                     Submission validator: the rank-order contract
//
// ========================================================================================
//
// A submission declares a rank for every event in its second column. Before any score
// is computed, the set of declared ranks must look like a permutation of 1..=N. Two
// policies exist:
//
// - `Legacy` reproduces the competition's published checker exactly. Ranks are
//   collected as raw field text. The run fails if the number of distinct raw values
//   differs from N, or if not a single value names an integer in [1, N]. This second
//   test only proves overlap, so a submission with N distinct values that are not a
//   true permutation (e.g. "1", "x2", "x3", ...) is accepted.
// - `Strict` parses every rank as an integer, rejects anything outside [1, N], and
//   then requires N distinct values, which together force the set to be exactly
//   {1, ..., N}. It is opt-in because it changes which submissions are accepted.

use crate::io::CsvRows;
use crate::types::ScoreError;
use ahash::AHashSet;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

const RANK_ORDER_COLUMN: usize = 1;

/// Which rank-order rules a submission must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankCheck {
    /// Cardinality plus a non-disjointness test on raw field text.
    #[default]
    Legacy,
    /// Ranks must be exactly the integers 1..=N.
    Strict,
}

/// The rank-order invariant a submission violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error(
        "RankOrder column must contain unique values: found {found} distinct ranks, expected {expected}."
    )]
    RankCardinality { found: usize, expected: usize },
    #[error("RankOrder column must contain all numbers from [1..{expected}]: none were found.")]
    RankRangeDisjoint { expected: usize },
    #[error("RankOrder value '{value}' on line {line} is not an integer.")]
    NonIntegerRank { line: u64, value: String },
    #[error("RankOrder value {value} on line {line} lies outside [1..{expected}].")]
    RankOutOfRange {
        line: u64,
        value: i64,
        expected: usize,
    },
}

/// Streams the submission once and checks its rank-order column under `policy`.
///
/// The rank set exists only for the duration of this call.
pub fn check_submission(
    path: &Path,
    expected_events: usize,
    policy: RankCheck,
) -> Result<(), ScoreError> {
    let mut rows = CsvRows::open(path)?;
    match policy {
        RankCheck::Legacy => check_legacy(&mut rows, expected_events)?,
        RankCheck::Strict => check_strict(&mut rows, expected_events)?,
    }
    info!(
        "RankOrder column of '{}' passed the {:?} check for {expected_events} events",
        rows.path().display(),
        policy
    );
    Ok(())
}

fn check_legacy(rows: &mut CsvRows, expected_events: usize) -> Result<(), ScoreError> {
    let mut ranks: AHashSet<String> = AHashSet::new();
    while let Some(row) = rows.next_row()? {
        let rank = row.field(RANK_ORDER_COLUMN, "RankOrder")?;
        if !ranks.contains(rank) {
            ranks.insert(rank.to_string());
        }
    }
    debug!("Collected {} distinct raw rank values", ranks.len());

    if ranks.len() != expected_events {
        return Err(ValidationFailure::RankCardinality {
            found: ranks.len(),
            expected: expected_events,
        }
        .into());
    }
    if !ranks
        .iter()
        .any(|rank| names_rank_in_range(rank, expected_events))
    {
        return Err(ValidationFailure::RankRangeDisjoint {
            expected: expected_events,
        }
        .into());
    }
    Ok(())
}

fn check_strict(rows: &mut CsvRows, expected_events: usize) -> Result<(), ScoreError> {
    let mut ranks: AHashSet<i64> = AHashSet::with_capacity(expected_events);
    while let Some(row) = rows.next_row()? {
        let raw = row.field(RANK_ORDER_COLUMN, "RankOrder")?;
        let rank: i64 = raw
            .parse()
            .map_err(|_| ValidationFailure::NonIntegerRank {
                line: row.line(),
                value: raw.to_string(),
            })?;
        if rank < 1 || rank as u64 > expected_events as u64 {
            return Err(ValidationFailure::RankOutOfRange {
                line: row.line(),
                value: rank,
                expected: expected_events,
            }
            .into());
        }
        ranks.insert(rank);
    }

    // Every member is already known to lie in [1, N], so N distinct members is the full range.
    if ranks.len() != expected_events {
        return Err(ValidationFailure::RankCardinality {
            found: ranks.len(),
            expected: expected_events,
        }
        .into());
    }
    Ok(())
}

/// True if the raw rank text is the decimal form of an integer in [1, N].
#[inline]
fn names_rank_in_range(rank: &str, expected_events: usize) -> bool {
    rank.parse::<u64>()
        .is_ok_and(|value| value >= 1 && value <= expected_events as u64)
}
