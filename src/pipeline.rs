//! The linear comparison run: load both lists, filter, write the result.
//!
//! Output is written only after every earlier phase has succeeded.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;

use crate::dedup::dedup;
use crate::models::{KeyColumns, RunSummary};
use crate::progress::{create_spinner, finish_phase, format_duration};
use crate::safety::validate_output_path;
use crate::source::{read_table, write_table, BadRowPolicy, LoadedTable, SourceSpec, TextEncoding};

// ============================================================================
// DEFAULTS
// ============================================================================

pub const LIST1_FILE_PATH: &str = "list1.csv";
pub const LIST2_FILE_PATH: &str = "list2.csv";
pub const OUTPUT_FILE_PATH: &str = "final_list.csv";

/// Column names in LIST 1 (tab-separated, UTF-16)
pub const L1_SONG_TITLE_COL: &str = "Name";
pub const L1_ARTIST_COL: &str = "Artist";

/// Column names in LIST 2 (comma-separated, Latin-1)
pub const L2_SONG_TITLE_COL: &str = "Title";
pub const L2_ARTIST_COL: &str = "Artist";

/// Inputs, key columns and output of one run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub list_a: SourceSpec,
    pub list_b: SourceSpec,
    pub keys_a: KeyColumns,
    pub keys_b: KeyColumns,
    pub output: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            list_a: SourceSpec::new(LIST1_FILE_PATH, b'\t', TextEncoding::Utf16),
            list_b: SourceSpec::new(LIST2_FILE_PATH, b',', TextEncoding::Latin1)
                .with_bad_rows(BadRowPolicy::Warn),
            keys_a: KeyColumns::new(L1_ARTIST_COL, L1_SONG_TITLE_COL),
            keys_b: KeyColumns::new(L2_ARTIST_COL, L2_SONG_TITLE_COL),
            output: PathBuf::from(OUTPUT_FILE_PATH),
        }
    }
}

fn load(spec: &SourceSpec) -> Result<LoadedTable> {
    let spinner = create_spinner(&format!(
        "Reading '{}' with '{}' encoding...",
        spec.path.display(),
        spec.encoding.label()
    ));
    let loaded = read_table(spec)
        .with_context(|| format!("Failed to load '{}'", spec.path.display()))?;
    finish_phase(
        &spinner,
        format!(
            "Successfully loaded '{}' ({} rows).",
            spec.path.display(),
            loaded.table.len()
        ),
    );
    Ok(loaded)
}

/// Execute one comparison run and return its summary.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let start = Instant::now();

    validate_output_path(
        &config.output,
        &[config.list_a.path.as_path(), config.list_b.path.as_path()],
    )?;

    // Phase 1: Load both lists
    let list_a = load(&config.list_a)?;
    let list_b = load(&config.list_b)?;

    // Phase 2: Normalize and filter
    let spinner = create_spinner("Finding common songs by matching Artist and Title...");
    let outcome = dedup(&list_a.table, &list_b.table, &config.keys_a, &config.keys_b)?;
    finish_phase(
        &spinner,
        format!(
            "Matched {} of {} songs against LIST2",
            outcome.removed, outcome.considered
        ),
    );

    // Phase 3: Write the result
    let spinner = create_spinner(&format!("Writing '{}'...", config.output.display()));
    write_table(&outcome.kept, &config.output)
        .with_context(|| format!("Failed to write '{}'", config.output.display()))?;
    finish_phase(&spinner, format!("Wrote {} songs", outcome.kept.len()));

    let elapsed = start.elapsed();
    println!("Elapsed: {}", format_duration(elapsed));

    Ok(RunSummary {
        list_a_path: config.list_a.path.clone(),
        list_b_path: config.list_b.path.clone(),
        output_path: config.output.clone(),
        list_a_rows_loaded: list_a.table.len(),
        list_b_rows_loaded: list_b.table.len(),
        list_b_rows_skipped_malformed: list_b.skipped_rows,
        list_a_rows_dropped_missing: outcome.dropped_a,
        list_b_rows_dropped_missing: outcome.dropped_b,
        original_songs: outcome.considered,
        removed_songs: outcome.removed,
        final_songs: outcome.kept.len(),
        elapsed_seconds: elapsed.as_secs_f64(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
