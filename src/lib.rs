//! Rust tooling for sulcal-label workflows built on FreeSurfer.
//!
//! The focus is on surface labels produced during sulcal morphometry studies:
//! writing and filtering label files, removing overlapping vertices between
//! labels, aggregating anatomical stats and sulcal depth across subjects,
//! composing figure panels into grids, and driving the FreeSurfer per-vertex
//! classifier to create annotations from an atlas.

pub mod ca_label;
pub mod error;
pub mod fs_curv;
pub mod fs_label;
pub mod img_grid;
pub mod morph;
pub mod overlap;
pub mod subject;
pub mod util;

pub use ca_label::{CaLabelConfig, CA_LABEL_PROGRAM};
pub use error::{Result, SulcToolsError};
pub use fs_curv::{read_curv, CurvHeader, FsCurv};
pub use fs_label::{read_label, FsLabel};
pub use img_grid::{compose_grid, write_grid, GridConfig};
pub use morph::{
    aggregate, morph_row, read_anat_stats, write_morph_table, AnatStats, DepthMap, DepthStats,
    MorphConfig, MorphRow, MORPH_COLUMNS, NA,
};
pub use overlap::{
    remove_overlap, remove_overlap_batch, AssumeYes, Confirmation, OverlapConfig,
    StdinConfirmation, DEFAULT_OVERLAP_THRESHOLD,
};
pub use subject::{Hemisphere, SubjectsDir};
pub use util::read_list_file;
