//! Aggregation of sulcal morphology across subjects, hemispheres and labels.
//!
//! Combines the summary line of `mris_anatomical_stats` output with sulcal
//! depth statistics computed from per-vertex depth maps, and collects one row
//! per (subject, hemisphere, label) into a single table. Missing or unreadable
//! source files degrade to `NA` fields; a batch run never aborts because one
//! subject lacks a label.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};
use ndarray::Array1;
use ndarray_stats::QuantileExt;

use crate::error::{Result, SulcToolsError};
use crate::fs_curv::read_curv;
use crate::fs_label::read_label;
use crate::subject::{Hemisphere, SubjectsDir};

/// Number of numeric fields on the summary line of a label stats file.
pub const NUM_ANAT_FIELDS: usize = 9;

/// Sentinel written for fields whose source could not be read.
pub const NA: &str = "NA";

/// Column headers of the morphology table.
pub const MORPH_COLUMNS: [&str; 15] = [
    "sub",
    "hemi",
    "label",
    "vertices",
    "total_surface_area_(mm^2)",
    "total_gray_matter_volume_(mm^3)",
    "cortical_thickness_mean",
    "cortical_thickness_std",
    "rectified_mean_curvature",
    "rectified_Gaussian_curvature",
    "folding_index",
    "intrinsic_curvature_index",
    "sulcal_depth_mean",
    "sulcal_depth_max",
    "sulcal_depth_mean_pct",
];


/// The nine per-label metrics from the `mris_anatomical_stats` summary line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnatStats {
    pub num_vertices: f64,
    pub surface_area: f64,
    pub gray_matter_volume: f64,
    pub thickness_mean: f64,
    pub thickness_std: f64,
    pub mean_curvature: f64,
    pub gaussian_curvature: f64,
    pub folding_index: f64,
    pub intrinsic_curvature_index: f64,
}

/// Parse the summary line of a `mris_anatomical_stats` label stats file.
///
/// The stats are on the final non-empty line: nine numbers followed by the
/// structure name. A missing file surfaces as [`SulcToolsError::Io`], a
/// malformed line as [`SulcToolsError::StatsParseFailed`], so callers can
/// tell the two apart.
pub fn read_anat_stats<P: AsRef<Path>>(path: P) -> Result<AnatStats> {
    let path_str = path.as_ref().display().to_string();
    let file = BufReader::new(File::open(&path)?);

    let mut last_line: Option<String> = None;
    for line in file.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            last_line = Some(line);
        }
    }
    let line = last_line.ok_or_else(|| SulcToolsError::StatsParseFailed(path_str.clone()))?;

    // nine numbers, then the structure name
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != NUM_ANAT_FIELDS + 1 {
        return Err(SulcToolsError::StatsParseFailed(path_str));
    }

    let mut fields = [0.0_f64; NUM_ANAT_FIELDS];
    for (slot, token) in fields.iter_mut().zip(&tokens[..NUM_ANAT_FIELDS]) {
        *slot = token
            .parse()
            .map_err(|_| SulcToolsError::StatsParseFailed(path_str.clone()))?;
    }

    Ok(AnatStats {
        num_vertices: fields[0],
        surface_area: fields[1],
        gray_matter_volume: fields[2],
        thickness_mean: fields[3],
        thickness_std: fields[4],
        mean_curvature: fields[5],
        gaussian_curvature: fields[6],
        folding_index: fields[7],
        intrinsic_curvature_index: fields[8],
    })
}


/// Sulcal depth statistics for one label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthStats {
    pub mean: f64,
    pub max: f64,
    /// Mean depth over the label as a fraction of the deepest point in the hemisphere.
    pub mean_pct_max: f64,
}

/// A per-vertex sulcal depth map for one hemisphere.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthMap {
    data: Array1<f32>,
}

impl DepthMap {
    pub fn new(data: Array1<f32>) -> DepthMap {
        DepthMap { data }
    }

    /// Load the depth map from a FreeSurfer curv file, e.g. `lh.sulc`.
    pub fn from_curv_file<P: AsRef<Path>>(path: P) -> Result<DepthMap> {
        let curv = read_curv(path)?;
        Ok(DepthMap::new(curv.data))
    }

    pub fn num_vertices(&self) -> usize {
        self.data.len()
    }

    /// Depth statistics over the given label vertices.
    ///
    /// The hemisphere-wide maximum used for normalization is taken from this
    /// map. A vertex id outside the map is [`SulcToolsError::VertexOutOfRange`],
    /// an empty vertex list is [`SulcToolsError::EmptyLabel`].
    pub fn label_depth_stats(&self, vertices: &[i32]) -> Result<DepthStats> {
        let mut depths: Vec<f32> = Vec::with_capacity(vertices.len());
        for &vertex in vertices {
            let depth = self
                .data
                .get(vertex as usize)
                .copied()
                .ok_or(SulcToolsError::VertexOutOfRange(vertex, self.data.len()))?;
            depths.push(depth);
        }

        let depths = Array1::from(depths);
        let label_mean = f64::from(depths.mean().ok_or(SulcToolsError::EmptyLabel)?);
        let label_max = f64::from(*depths.max().map_err(|_| SulcToolsError::EmptyLabel)?);
        let hemi_max = f64::from(*self.data.max().map_err(|_| SulcToolsError::EmptyLabel)?);

        Ok(DepthStats {
            mean: label_mean,
            max: label_max,
            mean_pct_max: label_mean / hemi_max,
        })
    }
}


/// One output row of the morphology table.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphRow {
    pub subject: String,
    pub hemi: Hemisphere,
    pub label: String,
    pub anat: Option<AnatStats>,
    pub depth: Option<DepthStats>,
}

impl MorphRow {
    /// The row as one CSV record, `NA` standing in for missing field groups.
    pub fn csv_record(&self) -> Vec<String> {
        let mut record = vec![
            self.subject.clone(),
            self.hemi.to_string(),
            self.label.clone(),
        ];
        match self.anat {
            Some(a) => {
                record.push(a.num_vertices.to_string());
                record.push(a.surface_area.to_string());
                record.push(a.gray_matter_volume.to_string());
                record.push(a.thickness_mean.to_string());
                record.push(a.thickness_std.to_string());
                record.push(a.mean_curvature.to_string());
                record.push(a.gaussian_curvature.to_string());
                record.push(a.folding_index.to_string());
                record.push(a.intrinsic_curvature_index.to_string());
            }
            None => record.extend(::std::iter::repeat(String::from(NA)).take(NUM_ANAT_FIELDS)),
        }
        match self.depth {
            Some(d) => {
                record.push(d.mean.to_string());
                record.push(d.max.to_string());
                record.push(d.mean_pct_max.to_string());
            }
            None => record.extend(::std::iter::repeat(String::from(NA)).take(3)),
        }
        record
    }
}


/// Settings for the morphology aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphConfig {
    /// Subject whose depth map comes from a precomputed smoothed-depth file
    /// (`<hemi>.smoothsulc`) instead of `<hemi>.sulc`. Template subjects like
    /// `fsaverage` ship no raw depth map.
    pub reference_subject: String,
}

impl Default for MorphConfig {
    fn default() -> MorphConfig {
        MorphConfig {
            reference_subject: String::from("fsaverage"),
        }
    }
}


fn depth_stats_for_label(
    subjects_dir: &SubjectsDir,
    subject: &str,
    hemi: Hemisphere,
    label: &str,
    config: &MorphConfig,
) -> Result<DepthStats> {
    // The reference subject's smoothed map serves both the label statistics
    // and the normalization.
    let depth_path = if subject == config.reference_subject {
        subjects_dir.smoothsulc_path(subject, hemi)
    } else {
        subjects_dir.sulc_path(subject, hemi)
    };
    let depth_map = DepthMap::from_curv_file(&depth_path)?;
    debug!(
        "Loaded depth map with {} vertices from {}.",
        depth_map.num_vertices(),
        depth_path.display()
    );

    let label_file = read_label(subjects_dir.label_path(subject, hemi, label))?;
    depth_map.label_depth_stats(&label_file.vertex_index)
}

/// Compute one morphology row.
///
/// A source that cannot be read leaves its field group `None` and the row is
/// still produced.
pub fn morph_row(
    subjects_dir: &SubjectsDir,
    subject: &str,
    hemi: Hemisphere,
    label: &str,
    config: &MorphConfig,
) -> MorphRow {
    let stats_path = subjects_dir.label_stats_path(subject, hemi, label);
    let anat = match read_anat_stats(&stats_path) {
        Ok(stats) => Some(stats),
        Err(err) => {
            warn!(
                "No anatomical stats for {} {} {}: {}",
                subject, hemi, label, err
            );
            None
        }
    };

    let depth = match depth_stats_for_label(subjects_dir, subject, hemi, label, config) {
        Ok(stats) => Some(stats),
        Err(err) => {
            warn!("No depth stats for {} {} {}: {}", subject, hemi, label, err);
            None
        }
    };

    MorphRow {
        subject: String::from(subject),
        hemi,
        label: String::from(label),
        anat,
        depth,
    }
}

/// Aggregate morphology over all subjects, both hemispheres, and all labels.
///
/// Produces exactly one row per (subject, hemisphere, label) triple.
pub fn aggregate(
    subjects_dir: &SubjectsDir,
    subjects: &[String],
    labels: &[String],
    config: &MorphConfig,
) -> Vec<MorphRow> {
    let mut rows: Vec<MorphRow> = Vec::with_capacity(subjects.len() * 2 * labels.len());
    for subject in subjects {
        for hemi in Hemisphere::BOTH {
            for label in labels {
                rows.push(morph_row(subjects_dir, subject, hemi, label, config));
            }
        }
    }
    rows
}

/// Write the morphology table as CSV to an explicit output path.
pub fn write_morph_table<P: AsRef<Path>>(rows: &[MorphRow], path: P) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&MORPH_COLUMNS)?;
    for row in rows {
        writer.write_record(row.csv_record())?;
    }
    writer.flush()?;
    Ok(())
}
