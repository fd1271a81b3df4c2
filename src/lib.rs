use std::io::Write;
use std::path::Path;

use color_eyre::Result;

pub mod config;
pub mod diff;
pub mod report;
pub mod scraper;
pub mod storage;

use crate::config::Config;
use crate::scraper::Extractor;
use crate::storage::Selection;

/// Message for a directory holding no `*.{extension}` captures.
pub fn no_files_message(extension: &str) -> String {
    format!(
        "No {} files found in the directory.",
        extension.to_uppercase()
    )
}

pub fn not_enough_files_message(extension: &str) -> String {
    format!("Not enough {} files to compare.", extension.to_uppercase())
}

/// Compares the two newest captures in `dir` and writes the report to `out`.
///
/// A directory with fewer than two captures is reported, not treated as an
/// error.
pub fn run(dir: &Path, config: &Config, out: &mut impl Write) -> Result<()> {
    let extractor = Extractor::new(&config.markers())?;

    let pair = match storage::latest_captures(dir, &config.extension)? {
        Selection::Pair(pair) => pair,
        Selection::NoFilesFound => {
            writeln!(out, "{}", no_files_message(&config.extension))?;
            return Ok(());
        }
        Selection::NotEnoughFiles => {
            writeln!(out, "{}", not_enough_files_message(&config.extension))?;
            return Ok(());
        }
    };

    let newer = storage::load_snapshot(&pair.newer, &extractor)?;
    let older = storage::load_snapshot(&pair.older, &extractor)?;
    let diff = diff::compute_diff(&older, &newer)?;

    report::render(out, &pair, &newer, &older, &diff)?;
    Ok(())
}
