//! Removal of overlapping vertices between two surface labels.
//!
//! Two labels of the same subject and hemisphere may share vertices, e.g. when
//! adjacent sulci were labeled independently. This module removes the shared
//! vertices from the first label, so that the second label keeps them
//! exclusively. Removing a large number of vertices requires explicit
//! confirmation; inspect both labels in FreeSurfer before agreeing.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::error::{Result, SulcToolsError};
use crate::fs_label::{read_label, FsLabel};
use crate::subject::{Hemisphere, SubjectsDir};

/// Number of shared vertices from which on removal requires confirmation.
pub const DEFAULT_OVERLAP_THRESHOLD: usize = 50;


/// Settings for overlap removal.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapConfig {
    /// Shared-vertex count from which on the removal must be confirmed.
    pub threshold: usize,
}

impl Default for OverlapConfig {
    fn default() -> OverlapConfig {
        OverlapConfig {
            threshold: DEFAULT_OVERLAP_THRESHOLD,
        }
    }
}


/// A source of interactive answers.
///
/// Injectable so that batch tools and tests can supply answers without console I/O.
pub trait Confirmation {
    /// Present `prompt` to the user and return one line of input.
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// Prints the prompt to stdout and reads the answer from stdin.
#[derive(Debug, Default)]
pub struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        Ok(answer)
    }
}

/// Answers every prompt with "yes" without asking.
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn ask(&mut self, _prompt: &str) -> Result<String> {
        Ok(String::from("yes"))
    }
}

/// Ask until the answer is literally `yes` or `no`.
fn confirm_yes_no(confirm: &mut dyn Confirmation, prompt: &str) -> Result<bool> {
    loop {
        let answer = confirm.ask(prompt)?;
        match answer.trim() {
            "yes" => return Ok(true),
            "no" => return Ok(false),
            other => {
                warn!("invalid input '{}'", other);
            }
        }
    }
}


/// Remove from `label_a` every vertex it shares with `label_b`.
///
/// Returns a new label preserving the row order of `label_a`, with coordinates
/// taken from `label_a`. Zero overlap returns `label_a` unchanged. If the
/// number of shared vertices reaches `config.threshold`, the removal must be
/// confirmed; a declined confirmation yields [`SulcToolsError::UserRefused`]
/// carrying the subject id. This function never touches the filesystem.
pub fn remove_overlap(
    subject: &str,
    label_a: &FsLabel,
    label_b: &FsLabel,
    config: &OverlapConfig,
    confirm: &mut dyn Confirmation,
) -> Result<FsLabel> {
    let set_a = label_a.vertex_set();
    let set_b = label_b.vertex_set();
    let shared: HashSet<i32> = set_a.intersection(&set_b).copied().collect();

    debug!(
        "{} of the {} vertices of label A are shared with label B.",
        shared.len(),
        label_a.len()
    );

    if shared.is_empty() {
        return Ok(label_a.clone());
    }

    if shared.len() >= config.threshold {
        let prompt = format!(
            "WARNING: You are replacing a very large number of vertices ({}). Are you sure you want to proceed?\nyes/no:",
            shared.len()
        );
        if !confirm_yes_no(confirm, &prompt)? {
            return Err(SulcToolsError::UserRefused(String::from(subject)));
        }
    }

    let kept: Vec<i32> = label_a
        .vertex_index
        .iter()
        .copied()
        .filter(|v| !shared.contains(v))
        .collect();

    FsLabel::from_vertices(&kept, label_a, subject)
}


/// Run overlap removal for every subject and both hemispheres.
///
/// For each (subject, hemisphere) pair, `<hemi>.<label_a>.label` is filtered
/// against `<hemi>.<label_b>.label` and written as `<hemi>.<label_a>_new.label`
/// next to the originals. A declined confirmation skips that subject and
/// hemisphere only; the original file is left untouched either way.
pub fn remove_overlap_batch(
    subjects_dir: &SubjectsDir,
    subjects: &[String],
    label_a: &str,
    label_b: &str,
    config: &OverlapConfig,
    confirm: &mut dyn Confirmation,
) -> Result<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::new();
    for subject in subjects {
        for hemi in Hemisphere::BOTH {
            let a = read_label(subjects_dir.label_path(subject, hemi, label_a))?;
            let b = read_label(subjects_dir.label_path(subject, hemi, label_b))?;

            match remove_overlap(subject, &a, &b, config, confirm) {
                Ok(filtered) => {
                    let out_path = subjects_dir.new_label_path(subject, hemi, label_a);
                    filtered.write_to_file(&out_path)?;
                    info!("label saved as {}", out_path.display());
                    written.push(out_path);
                }
                Err(SulcToolsError::UserRefused(sub)) => {
                    warn!("cannot overwrite vertices for {}", sub);
                }
                Err(other) => return Err(other),
            }
        }
    }
    Ok(written)
}
