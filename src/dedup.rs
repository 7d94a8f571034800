//! Set-difference of two song lists by normalized (artist, title).
//!
//! List A is the working set and is filtered; List B only contributes keys.
//! Matching is by comparison key, never by full-row equality, so the two
//! lists may have entirely different column layouts.

use rustc_hash::FxHashSet;

use crate::errors::{CompareError, Result};
use crate::models::{ComparisonKey, DedupOutcome, KeyColumns, KeyIndices, Record, Table};
use crate::normalize::comparison_key;

/// Resolve the artist/title column names of `keys` against `table`'s header.
pub fn resolve_keys(table: &Table, keys: &KeyColumns) -> Result<KeyIndices> {
    let lookup = |column: &str| {
        table
            .column_index(column)
            .ok_or_else(|| CompareError::MissingColumn {
                column: column.to_string(),
                table: table.name.clone(),
            })
    };
    Ok(KeyIndices {
        title: lookup(&keys.title)?,
        artist: lookup(&keys.artist)?,
    })
}

/// Drop rows with a missing artist or title. Returns the remaining rows in
/// order and how many were dropped.
pub fn drop_incomplete(rows: Vec<Record>, idx: KeyIndices) -> (Vec<Record>, usize) {
    let before = rows.len();
    let complete: Vec<Record> = rows
        .into_iter()
        .filter(|r| r.get(idx.artist).is_some() && r.get(idx.title).is_some())
        .collect();
    let dropped = before - complete.len();
    (complete, dropped)
}

fn record_key(record: &Record, idx: KeyIndices) -> ComparisonKey {
    comparison_key(record.get(idx.artist), record.get(idx.title))
}

/// Build the set of comparison keys present in `rows`.
pub fn key_set(rows: &[Record], idx: KeyIndices) -> FxHashSet<ComparisonKey> {
    rows.iter().map(|r| record_key(r, idx)).collect()
}

/// Filter `list_a` down to the rows whose normalized (artist, title) does not
/// appear in `list_b`.
///
/// Both lists first lose their rows with a missing artist or title. The
/// surviving rows keep List A's order and every original cell.
///
/// # Errors
/// `MissingColumn` if any of the four key columns is absent from its table's
/// header. No other failure is possible.
pub fn dedup(
    list_a: &Table,
    list_b: &Table,
    keys_a: &KeyColumns,
    keys_b: &KeyColumns,
) -> Result<DedupOutcome> {
    let idx_a = resolve_keys(list_a, keys_a)?;
    let idx_b = resolve_keys(list_b, keys_b)?;

    let (rows_a, dropped_a) = drop_incomplete(list_a.rows.clone(), idx_a);
    let (rows_b, dropped_b) = drop_incomplete(list_b.rows.clone(), idx_b);

    let exclude = key_set(&rows_b, idx_b);

    let considered = rows_a.len();
    let kept_rows: Vec<Record> = rows_a
        .into_iter()
        .filter(|r| !exclude.contains(&record_key(r, idx_a)))
        .collect();
    let removed = considered - kept_rows.len();

    Ok(DedupOutcome {
        kept: Table::new(list_a.name.clone(), list_a.headers.clone(), kept_rows),
        removed,
        considered,
        dropped_a,
        dropped_b,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn list_a(rows: &[&[&str]]) -> Table {
        Table::new(
            "list1.csv",
            vec!["Name".into(), "Artist".into(), "Plays".into()],
            rows.iter().map(|r| Record::from_values(r.iter().copied())).collect(),
        )
    }

    fn list_b(rows: &[&[&str]]) -> Table {
        Table::new(
            "list2.csv",
            vec!["Title".into(), "Artist".into()],
            rows.iter().map(|r| Record::from_values(r.iter().copied())).collect(),
        )
    }

    fn keys_a() -> KeyColumns {
        KeyColumns::new("Artist", "Name")
    }

    fn keys_b() -> KeyColumns {
        KeyColumns::new("Artist", "Title")
    }

    #[test]
    fn test_end_to_end_scenario() {
        let a = Table::new(
            "list1.csv",
            vec!["Name".into(), "Artist".into()],
            vec![
                Record::from_values(["Yesterday", "The Beatles"]),
                Record::from_values(["Let It Be (Remastered)", "The Beatles"]),
            ],
        );
        let b = list_b(&[&["yesterday", "the beatles"]]);

        let outcome = dedup(&a, &b, &keys_a(), &keys_b()).unwrap();
        assert_eq!(
            outcome.kept.rows,
            vec![Record::from_values(["Let It Be (Remastered)", "The Beatles"])]
        );
        assert_eq!(outcome.kept.headers, vec!["Name", "Artist"]);
        assert_eq!(outcome.removed, 1);
    }

    #[test]
    fn test_matches_by_key_not_full_row() {
        // Extra column in A and different casing/punctuation still match
        let a = list_a(&[&["Don't Stop (Live)", "Fleetwood Mac", "42"]]);
        let b = list_b(&[&["dont stop", "FLEETWOOD MAC!"]]);

        let outcome = dedup(&a, &b, &keys_a(), &keys_b()).unwrap();
        assert!(outcome.kept.is_empty());
        assert_eq!(outcome.removed, 1);
    }

    #[test]
    fn test_order_and_cells_preserved() {
        let a = list_a(&[
            &["Song C", "Zed", "3"],
            &["Song A", "Alpha", "1"],
            &["Song B", "Beta", "2"],
            &["Song A", "Alpha", "9"],
        ]);
        let b = list_b(&[&["song a", "alpha"]]);

        let outcome = dedup(&a, &b, &keys_a(), &keys_b()).unwrap();
        assert_eq!(
            outcome.kept.rows,
            vec![
                Record::from_values(["Song C", "Zed", "3"]),
                Record::from_values(["Song B", "Beta", "2"]),
            ]
        );
        // Duplicates within A are both removed
        assert_eq!(outcome.removed, 2);
    }

    #[test]
    fn test_artist_must_match_too() {
        let a = list_a(&[&["Yesterday", "The Beatles", "1"]]);
        let b = list_b(&[&["Yesterday", "Boyz II Men"]]);

        let outcome = dedup(&a, &b, &keys_a(), &keys_b()).unwrap();
        assert_eq!(outcome.kept.len(), 1);
        assert_eq!(outcome.removed, 0);
    }

    #[test]
    fn test_incomplete_rows_dropped_from_both_lists() {
        let a = Table::new(
            "list1.csv",
            vec!["Name".into(), "Artist".into()],
            vec![
                Record::from_values(["Yesterday", "The Beatles"]),
                Record::new(vec![Some("Orphan".into()), None]),
                Record::new(vec![None, Some("Nobody".into())]),
                // Short row: artist cell absent
                Record::new(vec![Some("Short".into())]),
                Record::from_values(["Help!", "The Beatles"]),
            ],
        );
        let b = Table::new(
            "list2.csv",
            vec!["Title".into(), "Artist".into()],
            vec![
                Record::new(vec![None, Some("The Beatles".into())]),
                Record::from_values(["help", "the beatles"]),
            ],
        );

        let outcome = dedup(&a, &b, &keys_a(), &keys_b()).unwrap();
        assert_eq!(outcome.dropped_a, 3);
        assert_eq!(outcome.dropped_b, 1);
        assert_eq!(outcome.considered, 2);
        assert_eq!(outcome.removed, 1);
        assert_eq!(
            outcome.kept.rows,
            vec![Record::from_values(["Yesterday", "The Beatles"])]
        );
    }

    #[test]
    fn test_completeness_invariant() {
        let a = list_a(&[
            &["One", "X", "1"],
            &["Two", "Y", "2"],
            &["Three", "Z", "3"],
        ]);
        let b = list_b(&[&["two", "y"], &["four", "w"]]);

        let outcome = dedup(&a, &b, &keys_a(), &keys_b()).unwrap();
        assert_eq!(outcome.kept.len() + outcome.removed, outcome.considered);
        assert_eq!(outcome.considered, 3);
    }

    #[test]
    fn test_fully_stripped_fields_still_match() {
        // Both sides normalize to empty strings and therefore collide
        let a = list_a(&[&["(Intro)", "!!!", "1"]]);
        let b = list_b(&[&["[Intro]", "???"]]);

        let outcome = dedup(&a, &b, &keys_a(), &keys_b()).unwrap();
        assert_eq!(outcome.removed, 1);
    }

    #[test]
    fn test_empty_reference_keeps_everything() {
        let a = list_a(&[&["One", "X", "1"], &["Two", "Y", "2"]]);
        let b = list_b(&[]);

        let outcome = dedup(&a, &b, &keys_a(), &keys_b()).unwrap();
        assert_eq!(outcome.kept, a);
        assert_eq!(outcome.removed, 0);
    }

    #[test]
    fn test_missing_column_reported() {
        let a = list_a(&[&["One", "X", "1"]]);
        let b = list_b(&[]);

        let err = dedup(&a, &b, &keys_a(), &KeyColumns::new("Artist", "Song")).unwrap_err();
        match err {
            CompareError::MissingColumn { column, table } => {
                assert_eq!(column, "Song");
                assert_eq!(table, "list2.csv");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_key_set_collapses_duplicates() {
        let b = list_b(&[&["Yesterday", "The Beatles"], &["yesterday!", "the beatles"]]);
        let idx = resolve_keys(&b, &keys_b()).unwrap();
        assert_eq!(key_set(&b.rows, idx).len(), 1);
    }
}
