//! Functions for reading FreeSurfer per-vertex data from binary 'curv' files.
//!
//! These files store 1 scalar value (typically a morphological descriptor, like
//! cortical thickness or sulcal depth at that point) for each vertex of the
//! respective brain surface mesh. All values are big-endian.

use byteordered::ByteOrdered;
use flate2::bufread::GzDecoder;
use ndarray::Array1;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Result, SulcToolsError};
use crate::util::is_gz_file;

/// The magic number of new-format curv files, stored as a 24 bit integer.
pub const CURV_MAGIC_FILE_TYPE_NUMBER: i32 = 16777215;


#[derive(Debug, Clone, PartialEq)]
pub struct CurvHeader {
    pub curv_magic: [u8; 3],
    pub num_vertices: i32,
    pub num_faces: i32,
    pub num_values_per_vertex: i32,
}


impl Default for CurvHeader {
    fn default() -> CurvHeader {
        CurvHeader {
            curv_magic: [255; 3],
            num_vertices: 0,
            num_faces: 0,
            num_values_per_vertex: 1,
        }
    }
}

impl CurvHeader {
    /// Read a Curv header from a file.
    /// If the file's name ends with ".gz", the file is assumed to need GZip decoding. This is not typically the case
    /// for FreeSurfer Curv files, but very handy (and it helps us to reduce the size of our test data).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<CurvHeader> {
        let gz = is_gz_file(&path);
        let mut file = BufReader::new(File::open(path)?);
        if gz {
            CurvHeader::from_reader(&mut GzDecoder::new(file))
        } else {
            CurvHeader::from_reader(&mut file)
        }
    }

    /// Read a Curv header from the given byte stream.
    /// It is assumed that the input is currently at the start of the
    /// Curv header.
    pub fn from_reader<S>(input: &mut S) -> Result<CurvHeader>
    where
        S: Read,
    {
        let mut hdr = CurvHeader::default();

        let mut input = ByteOrdered::be(input);

        for v in &mut hdr.curv_magic {
            *v = input.read_u8()?;
        }

        hdr.num_vertices = input.read_i32()?;
        hdr.num_faces = input.read_i32()?;
        hdr.num_values_per_vertex = input.read_i32()?;

        let magic = interpret_fs_int24(hdr.curv_magic[0], hdr.curv_magic[1], hdr.curv_magic[2]);

        if magic != CURV_MAGIC_FILE_TYPE_NUMBER || hdr.num_values_per_vertex != 1 {
            Err(SulcToolsError::InvalidCurvFormat)
        } else {
            Ok(hdr)
        }
    }
}


/// Interpret three bytes as a single 24 bit integer, FreeSurfer style.
pub fn interpret_fs_int24(b1: u8, b2: u8, b3: u8) -> i32 {
    let c1 = (b1 as u32).checked_shl(16).unwrap_or(0);
    let c2 = (b2 as u32).checked_shl(8).unwrap_or(0);
    let c3 = b3 as i32;

    c1 as i32 + c2 as i32 + c3
}


/// Per-vertex scalar data read from a curv file.
#[derive(Debug, Clone, PartialEq)]
pub struct FsCurv {
    pub header: CurvHeader,
    pub data: Array1<f32>,
}

impl FsCurv {
    /// Read an FsCurv instance from a file, transparently decoding ".gz" files.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<FsCurv> {
        let gz = is_gz_file(&path);
        let file = BufReader::new(File::open(path)?);
        if gz {
            FsCurv::from_reader(GzDecoder::new(file))
        } else {
            FsCurv::from_reader(file)
        }
    }

    /// Read an FsCurv instance from the given byte stream, header included.
    pub fn from_reader<S>(mut input: S) -> Result<FsCurv>
    where
        S: Read,
    {
        let hdr = CurvHeader::from_reader(&mut input)?;

        let mut input = ByteOrdered::be(input);
        let mut data: Vec<f32> = Vec::with_capacity(hdr.num_vertices as usize);
        for _ in 1..=hdr.num_vertices {
            data.push(input.read_f32()?);
        }

        Ok(FsCurv {
            header: hdr,
            data: Array1::from(data),
        })
    }
}

impl ::std::fmt::Display for FsCurv {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "Per-vertex data for {} vertices.", self.data.len())
    }
}


/// Read per-vertex data from a FreeSurfer curv file.
///
/// # Examples
///
/// ```no_run
/// let curv = sulctools::read_curv("/path/to/subjects_dir/subject1/surf/lh.sulc").unwrap();
/// println!("Loaded {} sulcal depth values.", curv.data.len());
/// ```
pub fn read_curv<P: AsRef<Path>>(path: P) -> Result<FsCurv> {
    FsCurv::from_file(path)
}


#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    pub fn curv_bytes(values: &[f32]) -> Vec<u8> {
        let mut bytes: Vec<u8> = vec![0xFF, 0xFF, 0xFF];
        bytes.extend_from_slice(&(values.len() as i32).to_be_bytes());
        bytes.extend_from_slice(&0_i32.to_be_bytes());
        bytes.extend_from_slice(&1_i32.to_be_bytes());
        for v in values {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        bytes
    }

    #[test]
    fn curv_data_is_read_in_order() {
        let bytes = curv_bytes(&[1.5, -0.25, 8.0, 0.0]);
        let curv = FsCurv::from_reader(&bytes[..]).unwrap();

        assert_eq!(4, curv.header.num_vertices);
        assert_eq!(1, curv.header.num_values_per_vertex);
        assert_eq!(4, curv.data.len());
        assert_abs_diff_eq!(1.5, curv.data[0]);
        assert_abs_diff_eq!(-0.25, curv.data[1]);
        assert_abs_diff_eq!(8.0, curv.data[2]);
    }

    #[test]
    fn a_wrong_magic_number_is_rejected() {
        let mut bytes = curv_bytes(&[1.0]);
        bytes[0] = 0x00;

        assert!(matches!(
            FsCurv::from_reader(&bytes[..]),
            Err(SulcToolsError::InvalidCurvFormat)
        ));
    }

    #[test]
    fn gz_compressed_curv_files_are_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lh.sulc.gz");

        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(&curv_bytes(&[2.0, 4.0])).unwrap();
        encoder.finish().unwrap();

        let curv = read_curv(&path).unwrap();
        assert_eq!(2, curv.header.num_vertices);
        assert_abs_diff_eq!(4.0, curv.data[1]);
    }
}
