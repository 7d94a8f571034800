//! Core data models for song list deduplication.
//!
//! This module contains the table/record representation shared by the
//! reader, the deduplicator and the writer, plus the run summary.

use serde::Serialize;
use std::path::PathBuf;

// ============================================================================
// Tabular Models
// ============================================================================

/// One row of a song list. Cells are aligned with the owning table's headers;
/// `None` marks a missing value (short row or NA marker).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub cells: Vec<Option<String>>,
}

impl Record {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Build a record from present text values (test and fixture helper).
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: values.into_iter().map(|v| Some(v.into())).collect(),
        }
    }

    /// Cell at `index`, treating cells beyond the row's end as missing.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }
}

/// A loaded song list: header row plus data rows in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    /// Label used in messages, usually the source file name.
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Position of the first header equal to `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Names of the artist and title columns of one list.
/// The two lists use different schemas, so each carries its own pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyColumns {
    pub artist: String,
    pub title: String,
}

impl KeyColumns {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }
}

/// Resolved (artist, title) column positions within a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyIndices {
    pub artist: usize,
    pub title: usize,
}

/// Normalized "artist||title" key. Two records match iff their keys are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComparisonKey(pub String);

impl ComparisonKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Results
// ============================================================================

/// Result of filtering List A against List B.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DedupOutcome {
    /// Surviving List A rows, original order and columns.
    pub kept: Table,
    /// List A rows whose key was found in List B.
    pub removed: usize,
    /// List A rows that took part in matching (after dropping incomplete rows).
    pub considered: usize,
    /// List A rows dropped for a missing artist or title.
    pub dropped_a: usize,
    /// List B rows dropped for a missing artist or title.
    pub dropped_b: usize,
}

/// End-of-run statistics, printed to the console and optionally written as JSON.
#[derive(Default, Debug, Clone, Serialize)]
pub struct RunSummary {
    pub list_a_path: PathBuf,
    pub list_b_path: PathBuf,
    pub output_path: PathBuf,

    // Loading
    pub list_a_rows_loaded: usize,
    pub list_b_rows_loaded: usize,
    pub list_b_rows_skipped_malformed: usize,

    // Matching
    pub list_a_rows_dropped_missing: usize,
    pub list_b_rows_dropped_missing: usize,
    pub original_songs: usize,
    pub removed_songs: usize,
    pub final_songs: usize,

    // Timing
    pub elapsed_seconds: f64,
}

impl RunSummary {
    /// Print the human-readable summary block.
    pub fn print(&self) {
        println!("\n--- Process Complete! ---");
        println!("Original songs in LIST1: {}", self.original_songs);
        println!("Songs to be removed (found in LIST2): {}", self.removed_songs);
        println!("Final list of unique songs: {}", self.final_songs);
        if self.list_a_rows_dropped_missing > 0 || self.list_b_rows_dropped_missing > 0 {
            println!(
                "Rows skipped for missing artist/title: {} in LIST1, {} in LIST2",
                self.list_a_rows_dropped_missing, self.list_b_rows_dropped_missing
            );
        }
        if self.list_b_rows_skipped_malformed > 0 {
            println!(
                "Malformed rows skipped in LIST2: {}",
                self.list_b_rows_skipped_malformed
            );
        }
        println!(
            "The final list has been saved to: '{}'",
            self.output_path.display()
        );
    }

    /// Write the summary to a JSON file
    pub fn write_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
