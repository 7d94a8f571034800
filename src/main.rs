use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use songlist_dedup::errors::CompareError;
use songlist_dedup::models::KeyColumns;
use songlist_dedup::pipeline::{
    self, RunConfig, L1_ARTIST_COL, L1_SONG_TITLE_COL, L2_ARTIST_COL, L2_SONG_TITLE_COL,
    LIST1_FILE_PATH, LIST2_FILE_PATH, OUTPUT_FILE_PATH,
};
use songlist_dedup::progress::set_log_only;
use songlist_dedup::source::TextEncoding;

#[derive(Parser)]
#[command(name = "songlist-dedup")]
#[command(
    about = "Remove songs from LIST1 that already appear in LIST2, matching by normalized artist and title"
)]
struct Args {
    /// Working list to filter
    #[arg(long, default_value = LIST1_FILE_PATH)]
    list1: PathBuf,

    /// Reference list whose songs are removed from LIST1
    #[arg(long, default_value = LIST2_FILE_PATH)]
    list2: PathBuf,

    #[arg(long, short, default_value = OUTPUT_FILE_PATH)]
    output: PathBuf,

    #[arg(long, default_value = L1_SONG_TITLE_COL)]
    list1_title: String,

    #[arg(long, default_value = L1_ARTIST_COL)]
    list1_artist: String,

    #[arg(long, default_value = L2_SONG_TITLE_COL)]
    list2_title: String,

    #[arg(long, default_value = L2_ARTIST_COL)]
    list2_artist: String,

    /// Field delimiter of LIST1 ("tab", "comma" or a single character)
    #[arg(long, default_value = "tab", value_parser = parse_delimiter)]
    list1_delimiter: u8,

    /// Field delimiter of LIST2 ("tab", "comma" or a single character)
    #[arg(long, default_value = "comma", value_parser = parse_delimiter)]
    list2_delimiter: u8,

    #[arg(long, value_enum, default_value_t = TextEncoding::Utf16)]
    list1_encoding: TextEncoding,

    #[arg(long, value_enum, default_value_t = TextEncoding::Latin1)]
    list2_encoding: TextEncoding,

    /// Treat NA markers ("NA", "null", "None", ...) as ordinary text
    #[arg(long)]
    keep_na_text: bool,

    /// Write run statistics as JSON to this path
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Hide spinners and print plain phase lines (tail-friendly)
    #[arg(long)]
    log_only: bool,
}

fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => bail!("delimiter must be 'tab', 'comma' or a single ASCII character"),
    }
}

impl Args {
    fn into_config(self) -> RunConfig {
        let mut config = RunConfig::default();

        config.list_a.path = self.list1;
        config.list_a.delimiter = self.list1_delimiter;
        config.list_a.encoding = self.list1_encoding;

        config.list_b.path = self.list2;
        config.list_b.delimiter = self.list2_delimiter;
        config.list_b.encoding = self.list2_encoding;

        if self.keep_na_text {
            config.list_a.na_values.clear();
            config.list_b.na_values.clear();
        }

        config.keys_a = KeyColumns::new(self.list1_artist, self.list1_title);
        config.keys_b = KeyColumns::new(self.list2_artist, self.list2_title);
        config.output = self.output;
        config
    }
}

/// User-facing message for a failed run.
fn error_message(err: &anyhow::Error) -> String {
    let known = err.chain().find_map(|e| e.downcast_ref::<CompareError>());
    match known {
        Some(CompareError::FileNotFound { path }) => format!(
            "ERROR: File not found. Please make sure '{}' exists.",
            path.display()
        ),
        Some(CompareError::MissingColumn { column, table }) => format!(
            "\nERROR: A column was not found. \
             Please check the column names passed on the command line.\n\
             Column mentioned in error: '{}' (in '{}')",
            column, table
        ),
        _ => format!("An unexpected error occurred: {:#}", err),
    }
}

fn report_error(err: &anyhow::Error) {
    println!("{}", error_message(err));
}

fn run(args: Args) -> Result<()> {
    set_log_only(args.log_only);
    let stats_path = args.stats.clone();
    let config = args.into_config();

    println!("Starting song comparison with separate Artist/Title columns...");
    let summary = pipeline::run(&config)?;
    summary.print();

    if let Some(path) = stats_path {
        summary.write_to_file(&path)?;
        println!("Statistics written to: '{}'", path.display());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    // Failures are reported on the console; the process still exits normally.
    if let Err(err) = run(args) {
        report_error(&err);
    }
}
