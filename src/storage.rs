use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::scraper::{CatalogSnapshot, Extractor};

use color_eyre::{Result, eyre::Context};
use log::{debug, info};

/// The two most recent captures, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturePair {
    pub newer: PathBuf,
    pub older: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Pair(CapturePair),
    NoFilesFound,
    NotEnoughFiles,
}

struct Candidate {
    modified: SystemTime,
    name: String,
    path: PathBuf,
}

fn has_extension(name: &str, extension: &str) -> bool {
    name.strip_suffix(extension)
        .is_some_and(|stem| stem.ends_with('.'))
}

/// Picks the two most recently modified `*.{extension}` files in `dir`.
///
/// Equal modification times are ordered by file name, the greater name
/// counting as newer.
pub fn latest_captures(dir: &Path, extension: &str) -> Result<Selection> {
    let entries = fs::read_dir(dir)
        .wrap_err_with(|| format!("failed to read capture directory {}", dir.display()))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.wrap_err_with(|| format!("failed to list {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !has_extension(&name, extension) {
            continue;
        }

        let path = entry.path();
        let metadata =
            fs::metadata(&path).wrap_err_with(|| format!("failed to stat {}", path.display()))?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata
            .modified()
            .wrap_err_with(|| format!("no modification time for {}", path.display()))?;

        debug!("Found capture {}", path.display());
        candidates.push(Candidate {
            modified,
            name,
            path,
        });
    }

    candidates.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| b.name.cmp(&a.name))
    });

    let mut newest = candidates.into_iter().map(|c| c.path);
    let selection = match (newest.next(), newest.next()) {
        (None, _) => Selection::NoFilesFound,
        (Some(_), None) => Selection::NotEnoughFiles,
        (Some(newer), Some(older)) => {
            info!("Comparing {} against {}", newer.display(), older.display());
            Selection::Pair(CapturePair { newer, older })
        }
    };

    Ok(selection)
}

/// Reads a capture as UTF-8 and extracts its snapshot.
pub fn load_snapshot(path: &Path, extractor: &Extractor) -> Result<CatalogSnapshot> {
    let html = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read capture {}", path.display()))?;
    let snapshot = extractor.extract(&html);
    debug!(
        "Loaded {}: {} groups, {} items",
        path.display(),
        snapshot.len(),
        snapshot.total_items()
    );
    Ok(snapshot)
}
