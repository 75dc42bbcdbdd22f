// ========================================================================================
//
//                     Row streaming for the solution and submission files
//
// ========================================================================================
//
// Both inputs are small comma-delimited tables with a header row. Each pass opens its
// own reader; the file handle lives inside the reader and is closed when the reader
// is dropped, on success and on every early return alike.

use crate::types::ScoreError;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A header-skipping CSV reader bound to the path it was opened from, so that every
/// error it produces can name the offending file.
pub struct CsvRows {
    reader: csv::Reader<File>,
    record: csv::StringRecord,
    path: PathBuf,
}

impl CsvRows {
    pub fn open(path: &Path) -> Result<Self, ScoreError> {
        let file = File::open(path).map_err(|source| ScoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(b',')
            .from_reader(file);
        Ok(Self {
            reader,
            record: csv::StringRecord::new(),
            path: path.to_path_buf(),
        })
    }

    /// Advances to the next data row. Returns `None` at end of file.
    pub fn next_row(&mut self) -> Result<Option<Row<'_>>, ScoreError> {
        let more = self
            .reader
            .read_record(&mut self.record)
            .map_err(|source| ScoreError::Csv {
                path: self.path.clone(),
                source,
            })?;
        if !more {
            return Ok(None);
        }
        Ok(Some(Row {
            record: &self.record,
            path: &self.path,
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A borrowed view of the current data row.
pub struct Row<'a> {
    record: &'a csv::StringRecord,
    path: &'a Path,
}

impl<'a> Row<'a> {
    /// The 1-based line number of this row in its file (the header is line 1).
    #[inline]
    pub fn line(&self) -> u64 {
        self.record.position().map_or(0, |p| p.line())
    }

    /// Fetches a field by index, naming the column in the error if the row is too short.
    #[inline]
    pub fn field(&self, index: usize, column: &'static str) -> Result<&'a str, ScoreError> {
        self.record
            .get(index)
            .ok_or_else(|| ScoreError::MissingField {
                path: self.path.to_path_buf(),
                line: self.line(),
                column,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn streams_rows_after_the_header() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a,b\n1,2\n3,4\n").unwrap();
        file.flush().unwrap();

        let mut rows = CsvRows::open(file.path()).unwrap();
        let mut seen = Vec::new();
        while let Some(row) = rows.next_row().unwrap() {
            seen.push((row.line(), row.field(0, "a").unwrap().to_string()));
        }
        assert_eq!(seen, vec![(2, "1".to_string()), (3, "3".to_string())]);
    }

    #[test]
    fn short_row_names_the_missing_column() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a\n1\n").unwrap();
        file.flush().unwrap();

        let mut rows = CsvRows::open(file.path()).unwrap();
        let row = rows.next_row().unwrap().unwrap();
        match row.field(1, "b") {
            Err(ScoreError::MissingField { line, column, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "b");
            }
            other => panic!("Expected MissingField, got {:?}", other.map(str::to_string)),
        }
    }
}
