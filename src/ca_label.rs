//! Thin wrapper around the FreeSurfer `mris_ca_label` classifier.
//!
//! `mris_ca_label` assigns a neuroanatomical region to every cortical surface
//! vertex, producing an annotation file from a `.gcs` atlas. The behavioral
//! contract is owned entirely by the external binary; this module only
//! assembles its environment and arguments.
//! See <https://surfer.nmr.mgh.harvard.edu/fswiki/mris_ca_label>.

use std::path::PathBuf;
use std::process::Command;

use log::info;

use crate::error::{Result, SulcToolsError};
use crate::subject::{Hemisphere, SubjectsDir};

/// Program name of the FreeSurfer per-vertex classifier.
pub const CA_LABEL_PROGRAM: &str = "mris_ca_label";


/// Everything one `mris_ca_label` invocation needs, as explicit configuration.
///
/// The FreeSurfer environment variables are set on the child process only;
/// the ambient environment is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct CaLabelConfig {
    /// FreeSurfer installation, exported as `FREESURFER_HOME`.
    pub freesurfer_home: PathBuf,
    /// Exported as `SUBJECTS_DIR` and used to derive the surface and output paths.
    pub subjects_dir: SubjectsDir,
    /// Colortable file describing the atlas regions.
    pub colortable: PathBuf,
    /// Atlas classifier file (`.gcs`), usually `<data_dir>/<hemi>.<atlas>.gcs`.
    pub atlas: PathBuf,
    pub subject: String,
    pub hemi: Hemisphere,
    /// Name of the annotation to create, without hemisphere prefix or `.annot` suffix.
    pub annot_name: String,
    /// Program to invoke instead of [`CA_LABEL_PROGRAM`].
    pub program: String,
}

impl CaLabelConfig {
    /// The annotation file this invocation will create.
    pub fn output_path(&self) -> PathBuf {
        self.subjects_dir
            .annot_path(&self.subject, self.hemi, &self.annot_name)
    }

    /// Build the invocation:
    /// `mris_ca_label -t <colortable> <subject> <hemi> <sphere.reg> <atlas> <output.annot>`.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.env("FREESURFER_HOME", &self.freesurfer_home)
            .env("SUBJECTS_DIR", self.subjects_dir.base())
            .arg("-t")
            .arg(&self.colortable)
            .arg(&self.subject)
            .arg(self.hemi.to_string())
            .arg(self.subjects_dir.sphere_reg_path(&self.subject, self.hemi))
            .arg(&self.atlas)
            .arg(self.output_path());
        cmd
    }

    /// Run the classifier and block until it exits.
    ///
    /// Returns the path of the created annotation. A non-zero exit status is
    /// [`SulcToolsError::CommandFailed`].
    pub fn run(&self) -> Result<PathBuf> {
        info!(
            "Invoking {} for {}.{}",
            self.program, self.hemi, self.subject
        );
        let status = self.command().status()?;
        if !status.success() {
            return Err(SulcToolsError::CommandFailed(self.program.clone(), status));
        }
        Ok(self.output_path())
    }
}
