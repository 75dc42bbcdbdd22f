// ========================================================================================
//                             High-Level Data Contracts
// ========================================================================================

// This file is ONLY for types that are SHARED BETWEEN FILES, not types that only are used in one file.

use crate::config::ConfigError;
use crate::validate::ValidationFailure;
use ahash::AHashMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The expected number of events in the competition test set. Both the solution and
/// the submission producers agree on this value; it is never inferred from a file.
pub const DEFAULT_EXPECTED_EVENTS: usize = 550_000;

/// Field value that marks an event as signal, in both the solution and the submission.
pub const SIGNAL_LABEL: &str = "s";
/// Field value that marks an event as background.
pub const BACKGROUND_LABEL: &str = "b";

/// One of the two mutually exclusive event classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    Signal,
    Background,
}

impl EventClass {
    /// Interprets a raw label field. Anything other than the two canonical labels
    /// is not a class at all.
    #[inline]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            SIGNAL_LABEL => Some(EventClass::Signal),
            BACKGROUND_LABEL => Some(EventClass::Background),
            _ => None,
        }
    }
}

impl fmt::Display for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventClass::Signal => write!(f, "signal"),
            EventClass::Background => write!(f, "background"),
        }
    }
}

/// The ground truth for a single event, retained exactly as read from the solution file.
/// The weight is parsed only when an event is actually scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionEntry {
    pub label: String,
    pub weight: String,
}

impl SolutionEntry {
    #[inline]
    pub fn class(&self) -> Option<EventClass> {
        EventClass::from_label(&self.label)
    }
}

/// Read-only map from event identifier to its ground truth, built once per run.
#[derive(Debug, Default)]
pub struct SolutionLookup {
    entries: AHashMap<String, SolutionEntry>,
}

impl SolutionLookup {
    /// Inserts an entry unless the identifier is already present. Returns `false`
    /// when the identifier was a duplicate and the existing entry was kept.
    pub(crate) fn insert_first(&mut self, event_id: String, entry: SolutionEntry) -> bool {
        match self.entries.entry(event_id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    #[inline]
    pub fn get(&self, event_id: &str) -> Option<&SolutionEntry> {
        self.entries.get(event_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Weighted sums of the events a submission predicted as signal, split by true class.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregateSums {
    /// Total weight of predicted-signal events that are truly signal (`s`).
    pub signal: f64,
    /// Total weight of predicted-signal events that are truly background (`b`).
    pub background: f64,
    /// Number of submission rows predicted as signal.
    pub predicted_signal_rows: usize,
}

/// The outcome of one complete scoring run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreReport {
    pub signal: f64,
    pub background: f64,
    pub ams: f64,
    pub predicted_signal_rows: usize,
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug formatting keeps the trailing ".0" on integral values.
        writeln!(
            f,
            "signal = {:?}, background = {:?}",
            self.signal, self.background
        )?;
        write!(f, "AMS = {:?}", self.ams)
    }
}

/// Every way a scoring run can fail. All of them are fatal to the run.
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Row {line} of '{}' has no '{column}' field.", path.display())]
    MissingField {
        path: PathBuf,
        line: u64,
        column: &'static str,
    },
    #[error("Submission rejected: {0}")]
    Validation(#[from] ValidationFailure),
    #[error(
        "Submission row {line} references event '{event_id}', which does not appear in the solution file."
    )]
    UnknownEventIdentifier { event_id: String, line: u64 },
    #[error("Solution weight '{value}' for event '{event_id}' is not a finite real number.")]
    InvalidWeight { event_id: String, value: String },
    #[error("AMS radicand is negative ({radicand}); refusing to take its square root.")]
    NegativeRadicand { radicand: f64 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
