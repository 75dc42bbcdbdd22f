// ========================================================================================
//
//                          Solution loader: the ground truth
//
// ========================================================================================
//
// Reads the organizer's solution file (`EventId,Label,Weight`, header first) into the
// read-only lookup that the aggregator joins against. Fields are kept as read; the
// weight is parsed later, and only for events that are actually scored.

use crate::io::CsvRows;
use crate::types::{ScoreError, SolutionEntry, SolutionLookup};
use log::{debug, info, warn};
use std::path::Path;

const EVENT_ID_COLUMN: usize = 0;
const LABEL_COLUMN: usize = 1;
const WEIGHT_COLUMN: usize = 2;

/// Loads the solution file into an identifier-keyed lookup.
///
/// Duplicate identifiers are tolerated: the first occurrence wins. A row that the
/// CSV parser rejects (for example one with a different number of fields than the
/// header) aborts the load.
pub fn load_solution(path: &Path) -> Result<SolutionLookup, ScoreError> {
    let mut rows = CsvRows::open(path)?;
    let mut lookup = SolutionLookup::default();
    let mut duplicates: u64 = 0;

    while let Some(row) = rows.next_row()? {
        let event_id = row.field(EVENT_ID_COLUMN, "EventId")?;
        let entry = SolutionEntry {
            label: row.field(LABEL_COLUMN, "Label")?.to_string(),
            weight: row.field(WEIGHT_COLUMN, "Weight")?.to_string(),
        };

        if !lookup.insert_first(event_id.to_string(), entry) {
            duplicates += 1;
            debug!(
                "Ignoring repeated solution entry for event '{event_id}' on line {}",
                row.line()
            );
        }
    }

    if duplicates > 0 {
        warn!(
            "Solution file '{}' repeats {duplicates} event identifier(s); the first occurrence of each was kept.",
            path.display()
        );
    }
    info!(
        "Loaded {} solution events from '{}'",
        lookup.len(),
        path.display()
    );

    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> io::Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{}", content)?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn loads_entries_and_discards_header() {
        let file =
            create_test_csv("EventId,Label,Weight\n350000,s,0.0018\n350001,b,2.233\n").unwrap();
        let lookup = load_solution(file.path()).unwrap();

        assert_eq!(lookup.len(), 2);
        assert!(lookup.get("EventId").is_none());
        let entry = lookup.get("350000").unwrap();
        assert_eq!(entry.label, "s");
        assert_eq!(entry.weight, "0.0018");
        assert_eq!(lookup.get("350001").unwrap().label, "b");
    }

    #[test]
    fn first_duplicate_wins() {
        let file = create_test_csv("EventId,Label,Weight\nE1,s,1.0\nE1,b,5.0\nE2,b,2.0\n").unwrap();
        let lookup = load_solution(file.path()).unwrap();

        assert_eq!(lookup.len(), 2);
        let entry = lookup.get("E1").unwrap();
        assert_eq!(entry.label, "s");
        assert_eq!(entry.weight, "1.0");
    }

    #[test]
    fn weight_is_not_coerced_by_the_loader() {
        let file = create_test_csv("EventId,Label,Weight\nE1,s,not-a-number\n").unwrap();
        let lookup = load_solution(file.path()).unwrap();
        assert_eq!(lookup.get("E1").unwrap().weight, "not-a-number");
    }

    #[test]
    fn missing_file_is_an_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_solution(&dir.path().join("solution.csv")).unwrap_err();
        match err {
            ScoreError::Io { path, .. } => assert!(path.ends_with("solution.csv")),
            other => panic!("Expected Io, got {:?}", other),
        }
    }

    #[test]
    fn ragged_row_is_rejected_by_the_parser() {
        let file = create_test_csv("EventId,Label,Weight\nE1,s\n").unwrap();
        let err = load_solution(file.path()).unwrap_err();
        assert!(
            matches!(err, ScoreError::Csv { .. }),
            "Expected Csv, got {:?}",
            err
        );
    }

    #[test]
    fn narrow_file_reports_missing_field() {
        let file = create_test_csv("EventId,Label\nE1,s\n").unwrap();
        let err = load_solution(file.path()).unwrap_err();
        match err {
            ScoreError::MissingField { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "Weight");
            }
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }
}
