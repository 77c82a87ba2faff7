//! Addressing into a FreeSurfer subjects directory.
//!
//! All per-subject surface data is partitioned by hemisphere, and the scripts
//! in this crate locate their inputs through the standard `recon-all` output
//! layout: `<subjects_dir>/<subject>/label/...` and `<subjects_dir>/<subject>/surf/...`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::SulcToolsError;

/// A cortical hemisphere, the top-level partition of all per-subject surface data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    Lh,
    Rh,
}

impl Hemisphere {
    /// Both hemispheres, in FreeSurfer's customary left-first order.
    pub const BOTH: [Hemisphere; 2] = [Hemisphere::Lh, Hemisphere::Rh];
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Hemisphere::Lh => write!(f, "lh"),
            Hemisphere::Rh => write!(f, "rh"),
        }
    }
}

impl FromStr for Hemisphere {
    type Err = SulcToolsError;

    fn from_str(s: &str) -> ::std::result::Result<Hemisphere, SulcToolsError> {
        match s {
            "lh" => Ok(Hemisphere::Lh),
            "rh" => Ok(Hemisphere::Rh),
            other => Err(SulcToolsError::InvalidHemisphere(String::from(other))),
        }
    }
}


/// A FreeSurfer subjects directory, with path builders for the artifacts this crate consumes and produces.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectsDir {
    base: PathBuf,
}

impl SubjectsDir {
    pub fn new<P: AsRef<Path>>(base: P) -> SubjectsDir {
        SubjectsDir {
            base: base.as_ref().to_path_buf(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path to a surface label: `<base>/<subject>/label/<hemi>.<label>.label`.
    pub fn label_path(&self, subject: &str, hemi: Hemisphere, label: &str) -> PathBuf {
        self.base
            .join(subject)
            .join("label")
            .join(format!("{}.{}.label", hemi, label))
    }

    /// Path for a filtered copy of a label, with `_new` appended to the label name.
    pub fn new_label_path(&self, subject: &str, hemi: Hemisphere, label: &str) -> PathBuf {
        self.base
            .join(subject)
            .join("label")
            .join(format!("{}.{}_new.label", hemi, label))
    }

    /// Path to the `mris_anatomical_stats` output for a label:
    /// `<base>/<subject>/label/label_stats/<hemi>.<label>.stats.txt`.
    pub fn label_stats_path(&self, subject: &str, hemi: Hemisphere, label: &str) -> PathBuf {
        self.base
            .join(subject)
            .join("label")
            .join("label_stats")
            .join(format!("{}.{}.stats.txt", hemi, label))
    }

    /// Path to the per-vertex sulcal depth map: `<base>/<subject>/surf/<hemi>.sulc`.
    pub fn sulc_path(&self, subject: &str, hemi: Hemisphere) -> PathBuf {
        self.base
            .join(subject)
            .join("surf")
            .join(format!("{}.sulc", hemi))
    }

    /// Path to the precomputed smoothed depth map shipped with template subjects.
    pub fn smoothsulc_path(&self, subject: &str, hemi: Hemisphere) -> PathBuf {
        self.base
            .join(subject)
            .join("surf")
            .join(format!("{}.smoothsulc", hemi))
    }

    /// Path to the spherical registration surface produced by `recon-all`.
    pub fn sphere_reg_path(&self, subject: &str, hemi: Hemisphere) -> PathBuf {
        self.base
            .join(subject)
            .join("surf")
            .join(format!("{}.sphere.reg", hemi))
    }

    /// Path to an annotation file: `<base>/<subject>/label/<hemi>.<name>.annot`.
    pub fn annot_path(&self, subject: &str, hemi: Hemisphere, name: &str) -> PathBuf {
        self.base
            .join(subject)
            .join("label")
            .join(format!("{}.{}.annot", hemi, name))
    }
}

impl fmt::Display for SubjectsDir {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Subjects directory at '{}'.", self.base.display())
    }
}
