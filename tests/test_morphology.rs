//! End-to-end tests for morphology aggregation on a synthetic subjects directory.

use std::fs;
use std::path::Path;

use approx::assert_abs_diff_eq;
use sulctools::{aggregate, write_morph_table, FsLabel, Hemisphere, MorphConfig, SubjectsDir, NA};

/// New-format curv file bytes for the given per-vertex values.
fn curv_bytes(values: &[f32]) -> Vec<u8> {
    let mut bytes: Vec<u8> = vec![0xFF, 0xFF, 0xFF];
    bytes.extend_from_slice(&(values.len() as i32).to_be_bytes());
    bytes.extend_from_slice(&0_i32.to_be_bytes());
    bytes.extend_from_slice(&1_i32.to_be_bytes());
    for v in values {
        bytes.extend_from_slice(&v.to_be_bytes());
    }
    bytes
}

fn write_subject(dir: &Path, subject: &str, depth_file: &str) {
    for hemi in Hemisphere::BOTH {
        let label_dir = dir.join(subject).join("label");
        let surf_dir = dir.join(subject).join("surf");
        fs::create_dir_all(label_dir.join("label_stats")).unwrap();
        fs::create_dir_all(&surf_dir).unwrap();

        // label over vertices 0 and 2 of a 4-vertex hemisphere
        let mut label = FsLabel::new_for_subject(subject);
        for &v in &[0, 2] {
            label.vertex_index.push(v);
            label.coord1.push(0.0);
            label.coord2.push(0.0);
            label.coord3.push(0.0);
            label.value.push(0.0);
        }
        label
            .write_to_file(label_dir.join(format!("{}.MFS.label", hemi)))
            .unwrap();

        fs::write(
            surf_dir.join(format!("{}.{}", hemi, depth_file)),
            curv_bytes(&[1.0, 5.0, 3.0, 8.0]),
        )
        .unwrap();
    }
}

fn write_stats(dir: &Path, subject: &str, hemi: Hemisphere) {
    let stats_dir = dir.join(subject).join("label").join("label_stats");
    fs::write(
        stats_dir.join(format!("{}.MFS.stats.txt", hemi)),
        "# header line\n2  1.5  3.0  2.5 0.5  0.1  0.02  1  0.4  MFS\n",
    )
    .unwrap();
}

#[test]
fn one_row_per_triple_with_na_for_missing_stats() {
    let tmp = tempfile::tempdir().unwrap();
    let sd = SubjectsDir::new(tmp.path());

    write_subject(tmp.path(), "sub_1", "sulc");
    write_subject(tmp.path(), "sub_2", "sulc");
    write_stats(tmp.path(), "sub_1", Hemisphere::Lh);
    write_stats(tmp.path(), "sub_1", Hemisphere::Rh);
    write_stats(tmp.path(), "sub_2", Hemisphere::Lh);
    // sub_2 rh stats file deliberately absent

    let subjects = vec![String::from("sub_1"), String::from("sub_2")];
    let labels = vec![String::from("MFS")];
    let rows = aggregate(&sd, &subjects, &labels, &MorphConfig::default());

    assert_eq!(4, rows.len());

    let missing = rows
        .iter()
        .find(|r| r.subject == "sub_2" && r.hemi == Hemisphere::Rh)
        .unwrap();
    assert!(missing.anat.is_none());
    // depth sources are intact, so those fields still carry values
    let depth = missing.depth.unwrap();
    assert_abs_diff_eq!(2.0, depth.mean, epsilon = 1e-9);
    assert_abs_diff_eq!(3.0, depth.max, epsilon = 1e-9);
    assert_abs_diff_eq!(0.25, depth.mean_pct_max, epsilon = 1e-9);

    for row in rows.iter().filter(|r| !(r.subject == "sub_2" && r.hemi == Hemisphere::Rh)) {
        let anat = row.anat.unwrap();
        assert_abs_diff_eq!(2.0, anat.num_vertices);
        assert_abs_diff_eq!(1.5, anat.surface_area);
        assert_abs_diff_eq!(0.4, anat.intrinsic_curvature_index);
    }
}

#[test]
fn the_reference_subject_reads_the_smoothed_depth_map() {
    let tmp = tempfile::tempdir().unwrap();
    let sd = SubjectsDir::new(tmp.path());

    // fsaverage ships only <hemi>.smoothsulc, no <hemi>.sulc
    write_subject(tmp.path(), "fsaverage", "smoothsulc");
    write_stats(tmp.path(), "fsaverage", Hemisphere::Lh);
    write_stats(tmp.path(), "fsaverage", Hemisphere::Rh);

    let subjects = vec![String::from("fsaverage")];
    let labels = vec![String::from("MFS")];
    let rows = aggregate(&sd, &subjects, &labels, &MorphConfig::default());

    assert_eq!(2, rows.len());
    for row in &rows {
        let depth = row.depth.unwrap();
        assert_abs_diff_eq!(2.0, depth.mean, epsilon = 1e-9);
    }
}

#[test]
fn a_missing_depth_map_degrades_to_na_without_dropping_the_row() {
    let tmp = tempfile::tempdir().unwrap();
    let sd = SubjectsDir::new(tmp.path());

    write_subject(tmp.path(), "sub_1", "sulc");
    write_stats(tmp.path(), "sub_1", Hemisphere::Lh);
    write_stats(tmp.path(), "sub_1", Hemisphere::Rh);
    fs::remove_file(sd.sulc_path("sub_1", Hemisphere::Rh)).unwrap();

    let subjects = vec![String::from("sub_1")];
    let labels = vec![String::from("MFS")];
    let rows = aggregate(&sd, &subjects, &labels, &MorphConfig::default());

    assert_eq!(2, rows.len());
    let degraded = rows.iter().find(|r| r.hemi == Hemisphere::Rh).unwrap();
    assert!(degraded.depth.is_none());
    assert!(degraded.anat.is_some());
}

#[test]
fn the_csv_table_has_the_fixed_columns_and_na_sentinels() {
    let tmp = tempfile::tempdir().unwrap();
    let sd = SubjectsDir::new(tmp.path());

    write_subject(tmp.path(), "sub_1", "sulc");
    // no stats files at all for sub_1

    let subjects = vec![String::from("sub_1")];
    let labels = vec![String::from("MFS")];
    let rows = aggregate(&sd, &subjects, &labels, &MorphConfig::default());

    let out_path = tmp.path().join("morphological_metrics.csv");
    write_morph_table(&rows, &out_path).unwrap();

    let content = fs::read_to_string(&out_path).unwrap();
    let mut lines = content.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("sub,hemi,label,vertices,total_surface_area_(mm^2)"));
    assert_eq!(2, lines.count());
    assert!(content.contains(NA));
}
