//! Reading and writing delimited song lists.
//!
//! The two inputs differ in delimiter, text encoding and tolerance for bad
//! rows, so each is described by its own [`SourceSpec`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::errors::{CompareError, Result};
use crate::models::{Record, Table};

/// Cell texts treated as missing values when reading.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Text encoding of an input file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TextEncoding {
    /// UTF-16, byte order from the BOM, little-endian when there is none
    Utf16,
    /// ISO-8859-1, one byte per character
    Latin1,
    /// UTF-8, optional BOM
    Utf8,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf16 => "utf-16",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Utf8 => "utf-8",
        }
    }

    /// Decode raw file bytes. Returns `None` on malformed input.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf16 => {
                let (text, _, had_errors) = encoding_rs::UTF_16LE.decode(bytes);
                (!had_errors).then(|| text.into_owned())
            }
            TextEncoding::Utf8 => {
                let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
                (!had_errors).then(|| text.into_owned())
            }
            // Every byte maps to the code point of the same value
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// What to do with a row that has more fields than the header or fails to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadRowPolicy {
    /// Abort the load
    Error,
    /// Print a warning, skip the row and keep going
    Warn,
}

/// Everything needed to load one input list.
#[derive(Clone, Debug)]
pub struct SourceSpec {
    pub path: PathBuf,
    pub delimiter: u8,
    pub encoding: TextEncoding,
    pub bad_rows: BadRowPolicy,
    pub na_values: Vec<String>,
}

impl SourceSpec {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8, encoding: TextEncoding) -> Self {
        Self {
            path: path.into(),
            delimiter,
            encoding,
            bad_rows: BadRowPolicy::Error,
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_bad_rows(mut self, policy: BadRowPolicy) -> Self {
        self.bad_rows = policy;
        self
    }

    pub fn with_na_values(mut self, na_values: Vec<String>) -> Self {
        self.na_values = na_values;
        self
    }

    fn cell(&self, raw: &str) -> Option<String> {
        if self.na_values.iter().any(|na| na == raw) {
            None
        } else {
            Some(raw.to_string())
        }
    }
}

/// A loaded table plus the number of bad rows skipped under [`BadRowPolicy::Warn`].
#[derive(Clone, Debug)]
pub struct LoadedTable {
    pub table: Table,
    pub skipped_rows: usize,
}

/// Read the whole file at `spec.path` into a table.
pub fn read_table(spec: &SourceSpec) -> Result<LoadedTable> {
    let bytes = std::fs::read(&spec.path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CompareError::FileNotFound {
            path: spec.path.clone(),
        },
        _ => CompareError::Io(e),
    })?;

    let text = spec
        .encoding
        .decode(&bytes)
        .ok_or_else(|| CompareError::Decode {
            path: spec.path.clone(),
            encoding: spec.encoding.label().to_string(),
        })?;

    parse_table(spec, &text)
}

/// Parse already-decoded text according to `spec`.
pub fn parse_table(spec: &SourceSpec, text: &str) -> Result<LoadedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(spec.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let width = headers.len();

    let mut rows = Vec::new();
    let mut skipped_rows = 0;

    for result in reader.records() {
        let (line, detail) = match result {
            Ok(record) if record.len() <= width => {
                rows.push(Record::new(record.iter().map(|c| spec.cell(c)).collect()));
                continue;
            }
            Ok(record) => (
                record.position().map_or(0, |p| p.line()),
                format!("expected {} fields, saw {}", width, record.len()),
            ),
            Err(e) => (e.position().map_or(0, |p| p.line()), e.to_string()),
        };

        match spec.bad_rows {
            BadRowPolicy::Error => {
                return Err(CompareError::MalformedRow {
                    path: spec.path.clone(),
                    line,
                    detail,
                })
            }
            BadRowPolicy::Warn => {
                eprintln!(
                    "Warning: skipping line {} in '{}': {}",
                    line,
                    spec.path.display(),
                    detail
                );
                skipped_rows += 1;
            }
        }
    }

    let name = spec.path.display().to_string();
    Ok(LoadedTable {
        table: Table::new(name, headers, rows),
        skipped_rows,
    })
}

/// Temp file for the output. On unix it is opened with mode 0666 so the umask
/// decides the final permissions, as for any newly created file.
#[cfg(unix)]
fn output_tempfile(dir: &Path) -> std::io::Result<tempfile::NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .permissions(std::fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn output_tempfile(dir: &Path) -> std::io::Result<tempfile::NamedTempFile> {
    tempfile::NamedTempFile::new_in(dir)
}

/// Write `table` as comma-separated UTF-8 with its header row.
///
/// The file is written next to `path` under a temporary name and renamed into
/// place once complete, so a failure never leaves a partial output behind.
/// Missing cells are written as empty fields.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let temp = output_tempfile(dir)?;

    {
        let mut writer = csv::WriterBuilder::new().from_writer(temp.as_file());
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record((0..table.headers.len()).map(|i| row.get(i).unwrap_or("")))?;
        }
        writer.flush()?;
    }

    temp.persist(path).map_err(|e| CompareError::Io(e.error))?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
