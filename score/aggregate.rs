// ========================================================================================
//
//                  Score aggregator: joining predictions to the truth
//
// ========================================================================================
//
// Streams a validated submission and, for every event predicted as signal, adds the
// event's true weight to the signal or background accumulator. Summation follows file
// order so that repeated runs over the same files produce bit-identical sums.

use crate::io::CsvRows;
use crate::types::{AggregateSums, EventClass, SIGNAL_LABEL, ScoreError, SolutionLookup};
use log::{debug, info, warn};
use std::path::Path;

const EVENT_ID_COLUMN: usize = 0;
const CLASS_COLUMN: usize = 2;

/// Computes the weighted signal and background sums over predicted-signal rows.
///
/// Rows predicted as anything other than `s` are skipped without looking at their
/// identifier. A predicted-signal row whose identifier is absent from `solution`
/// fails the run with `UnknownEventIdentifier`.
pub fn aggregate_submission(
    path: &Path,
    solution: &SolutionLookup,
) -> Result<AggregateSums, ScoreError> {
    let mut rows = CsvRows::open(path)?;
    let mut sums = AggregateSums::default();
    let mut unlabelled: u64 = 0;

    while let Some(row) = rows.next_row()? {
        if row.field(CLASS_COLUMN, "Class")? != SIGNAL_LABEL {
            continue;
        }
        sums.predicted_signal_rows += 1;

        let event_id = row.field(EVENT_ID_COLUMN, "EventId")?;
        let entry = solution
            .get(event_id)
            .ok_or_else(|| ScoreError::UnknownEventIdentifier {
                event_id: event_id.to_string(),
                line: row.line(),
            })?;

        match entry.class() {
            Some(EventClass::Signal) => sums.signal += parse_weight(event_id, &entry.weight)?,
            Some(EventClass::Background) => {
                sums.background += parse_weight(event_id, &entry.weight)?
            }
            None => {
                unlabelled += 1;
                debug!(
                    "Event '{event_id}' has solution label '{}', which is neither signal nor background; it is not scored",
                    entry.label
                );
            }
        }
    }

    if unlabelled > 0 {
        warn!(
            "{unlabelled} predicted-signal event(s) carried an unrecognised solution label and contributed to neither sum"
        );
    }
    info!(
        "Aggregated {} predicted-signal rows from '{}': signal = {}, background = {}",
        sums.predicted_signal_rows,
        rows.path().display(),
        sums.signal,
        sums.background
    );

    Ok(sums)
}

#[inline]
fn parse_weight(event_id: &str, raw: &str) -> Result<f64, ScoreError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite())
        .ok_or_else(|| ScoreError::InvalidWeight {
            event_id: event_id.to_string(),
            value: raw.to_string(),
        })
}
