//! Utility functions used in all other sulctools modules.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;

/// Check whether the file extension ends with ".gz".
pub fn is_gz_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}


/// Read the non-empty lines of a newline-separated list file.
///
/// Subject lists and label lists are plain text files with one entry per line.
/// Surrounding whitespace is trimmed and blank lines are skipped.
pub fn read_list_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = BufReader::new(File::open(path)?);
    let mut entries: Vec<String> = Vec::new();
    for line in file.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            entries.push(String::from(trimmed));
        }
    }
    Ok(entries)
}
