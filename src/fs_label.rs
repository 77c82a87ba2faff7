//! Functions for reading and writing FreeSurfer ASCII label files.
//!
//! A label names a subset of the vertices of a brain surface mesh and stores for
//! each vertex its RAS coordinates and one scalar value. The file format is a
//! two-line ASCII header (a `#`-prefixed comment line, then the vertex count)
//! followed by one whitespace-separated data row per vertex.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{Result, SulcToolsError};


/// A FreeSurfer surface label: a subset of the vertices of a brain surface mesh.
///
/// Vertex ids are unique within a label but carry no required ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct FsLabel {
    /// The header comment line, including the leading `#`.
    pub comment: String,
    pub vertex_index: Vec<i32>,
    pub coord1: Vec<f32>,
    pub coord2: Vec<f32>,
    pub coord3: Vec<f32>,
    pub value: Vec<f32>,
}

impl FsLabel {
    /// An empty label with the standard header comment for the given subject.
    pub fn new_for_subject(subject: &str) -> FsLabel {
        FsLabel {
            comment: format!(
                "#ascii label  , from subject {} vox2ras=TkReg coords=white",
                subject
            ),
            vertex_index: Vec::new(),
            coord1: Vec::new(),
            coord2: Vec::new(),
            coord3: Vec::new(),
            value: Vec::new(),
        }
    }

    /// Read an FsLabel instance from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<FsLabel> {
        let path_str = path.as_ref().display().to_string();
        let file = BufReader::new(File::open(&path)?);
        let mut lines = file.lines();

        let comment = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(SulcToolsError::InvalidLabelFormat(
                    path_str,
                    String::from("empty file"),
                ))
            }
        };

        let count_line = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(SulcToolsError::InvalidLabelFormat(
                    path_str,
                    String::from("missing vertex count line"),
                ))
            }
        };
        let num_vertices: usize = count_line.trim().parse().map_err(|_| {
            SulcToolsError::InvalidLabelFormat(
                path_str.clone(),
                format!("invalid vertex count '{}'", count_line.trim()),
            )
        })?;

        let mut label = FsLabel {
            comment,
            vertex_index: Vec::with_capacity(num_vertices),
            coord1: Vec::with_capacity(num_vertices),
            coord2: Vec::with_capacity(num_vertices),
            coord3: Vec::with_capacity(num_vertices),
            value: Vec::with_capacity(num_vertices),
        };

        for line in lines {
            let line = line?;
            let row = line.trim();
            if row.is_empty() {
                continue;
            }
            let fields: Vec<&str> = row.split_whitespace().collect();
            if fields.len() != 5 {
                return Err(SulcToolsError::InvalidLabelFormat(
                    path_str,
                    format!("expected 5 columns, found {}", fields.len()),
                ));
            }
            label.vertex_index.push(parse_field(fields[0], &path_str)?);
            label.coord1.push(parse_field(fields[1], &path_str)?);
            label.coord2.push(parse_field(fields[2], &path_str)?);
            label.coord3.push(parse_field(fields[3], &path_str)?);
            label.value.push(parse_field(fields[4], &path_str)?);
        }

        if label.len() != num_vertices {
            return Err(SulcToolsError::InvalidLabelFormat(
                path_str,
                format!(
                    "header announces {} vertices but file contains {} data rows",
                    num_vertices,
                    label.len()
                ),
            ));
        }

        Ok(label)
    }

    /// Build a new label for `vertices`, looking up coordinates and value per vertex in `source`.
    ///
    /// A vertex unknown to `source` is an error: coordinates are never silently
    /// zero-filled. The header comment names `subject`.
    pub fn from_vertices(vertices: &[i32], source: &FsLabel, subject: &str) -> Result<FsLabel> {
        let mut label = FsLabel::new_for_subject(subject);
        for &vertex in vertices {
            let idx = source
                .vertex_index
                .iter()
                .position(|&v| v == vertex)
                .ok_or(SulcToolsError::MissingCoordinates(vertex))?;
            label.vertex_index.push(vertex);
            label.coord1.push(source.coord1[idx]);
            label.coord2.push(source.coord2[idx]);
            label.coord3.push(source.coord3[idx]);
            label.value.push(source.value[idx]);
        }
        Ok(label)
    }

    pub fn len(&self) -> usize {
        self.vertex_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_index.is_empty()
    }

    /// The vertex ids of this label as a set.
    pub fn vertex_set(&self) -> HashSet<i32> {
        self.vertex_index.iter().copied().collect()
    }

    /// Serialize into the FreeSurfer ASCII label format.
    ///
    /// The vertex count on the second header line always equals the number of
    /// data rows. Rows are formatted like FreeSurfer writes them:
    /// `%-2d  %2.3f  %2.3f  %2.3f %1.10f`.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(48 * (self.len() + 2));
        out.push_str(&self.comment);
        out.push('\n');
        out.push_str(&self.len().to_string());
        out.push('\n');
        for i in 0..self.len() {
            out.push_str(&format!(
                "{:<2}  {:2.3}  {:2.3}  {:2.3} {:1.10}\n",
                self.vertex_index[i], self.coord1[i], self.coord2[i], self.coord3[i], self.value[i]
            ));
        }
        out
    }

    /// Write the label to a file, replacing any existing file at `path`.
    ///
    /// The full content is built in memory and written in a single pass.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.to_ascii().as_bytes())?;
        Ok(())
    }
}

fn parse_field<T: ::std::str::FromStr>(token: &str, path: &str) -> Result<T> {
    token.parse().map_err(|_| {
        SulcToolsError::InvalidLabelFormat(String::from(path), format!("invalid field '{}'", token))
    })
}


impl fmt::Display for FsLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Label containing {} vertices.", self.len())
    }
}


/// Read a surface label from a FreeSurfer label file.
///
/// # Examples
///
/// ```no_run
/// let label = sulctools::read_label("/path/to/subjects_dir/subject1/label/lh.MFS.label").unwrap();
/// println!("The label contains {} vertices.", label.len());
/// ```
pub fn read_label<P: AsRef<Path>>(path: P) -> Result<FsLabel> {
    FsLabel::from_file(path)
}


#[cfg(test)]
mod test {
    use super::*;

    fn small_label() -> FsLabel {
        FsLabel {
            comment: String::from(
                "#ascii label  , from subject sub_1 vox2ras=TkReg coords=white",
            ),
            vertex_index: vec![12, 7, 3085],
            coord1: vec![-1.5, 0.25, 33.125],
            coord2: vec![10.0, -20.5, 0.0],
            coord3: vec![2.0, 4.5, -8.25],
            value: vec![0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn labels_survive_a_write_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lh.MFS_new.label");

        let label = small_label();
        label.write_to_file(&path).unwrap();
        let reread = read_label(&path).unwrap();

        assert_eq!(label.vertex_index, reread.vertex_index);
        assert_eq!(label.comment, reread.comment);
        assert_eq!(label.len(), reread.len());
    }

    #[test]
    fn header_count_always_equals_row_count() {
        let ascii = small_label().to_ascii();
        let mut lines = ascii.lines();
        let _comment = lines.next().unwrap();
        let count: usize = lines.next().unwrap().parse().unwrap();
        assert_eq!(count, lines.count());
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lh.broken.label");
        std::fs::write(&path, "#ascii label\n5\n1  0.0  0.0  0.0 0.0\n").unwrap();

        assert!(matches!(
            read_label(&path),
            Err(SulcToolsError::InvalidLabelFormat(_, _))
        ));
    }

    #[test]
    fn unknown_vertices_have_no_coordinates() {
        let source = small_label();
        let err = FsLabel::from_vertices(&[12, 99], &source, "sub_1").unwrap_err();
        assert!(matches!(err, SulcToolsError::MissingCoordinates(99)));
    }

    #[test]
    fn from_vertices_copies_coordinates_by_vertex_id() {
        let source = small_label();
        let label = FsLabel::from_vertices(&[3085, 12], &source, "sub_1").unwrap();

        assert_eq!(vec![3085, 12], label.vertex_index);
        assert_eq!(vec![33.125, -1.5], label.coord1);
        assert_eq!(vec![0.0, 10.0], label.coord2);
        assert_eq!(vec![-8.25, 2.0], label.coord3);
        assert_eq!(vec![1.0, 0.0], label.value);
    }
}
