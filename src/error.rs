use quick_error::quick_error;
use std::io::Error as IOError;
use std::process::ExitStatus;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum SulcToolsError {
        /// Invalid label file: malformed header or data rows.
        InvalidLabelFormat(path: String, detail: String) {
            display("Invalid label file '{}': {}", path, detail)
        }

        /// Invalid curv file: wrong magic number or unsupported layout.
        InvalidCurvFormat {
            display("Invalid Curv file")
        }

        /// Not a valid hemisphere identifier ('lh' or 'rh').
        InvalidHemisphere(name: String) {
            display("Invalid hemisphere '{}', expected 'lh' or 'rh'", name)
        }

        /// The summary line of an anatomical stats file could not be parsed.
        StatsParseFailed(path: String) {
            display("Cannot parse anatomical stats summary line of '{}'", path)
        }

        /// A vertex id has no coordinates in the source label.
        MissingCoordinates(vertex: i32) {
            display("No coordinates known for vertex {}", vertex)
        }

        /// A label vertex id lies outside the per-vertex data of its hemisphere.
        VertexOutOfRange(vertex: i32, num_values: usize) {
            display("Vertex {} out of range for per-vertex data of length {}", vertex, num_values)
        }

        /// The label names no vertices.
        EmptyLabel {
            display("Label contains no vertices")
        }

        /// An image in a grid batch does not share the dimensions of the first image.
        ImageShapeMismatch(path: String, expected: (u32, u32), actual: (u32, u32)) {
            display("Image '{}' is {}x{}, expected {}x{}", path, actual.0, actual.1, expected.0, expected.1)
        }

        /// No PNG images found in the grid input directory.
        EmptyImageDir(dir: String) {
            display("No .png images found in '{}'", dir)
        }

        /// The user declined to remove a large vertex overlap.
        UserRefused(subject: String) {
            display("cannot overwrite vertices for {}", subject)
        }

        /// An external FreeSurfer command exited with a non-zero status.
        CommandFailed(program: String, status: ExitStatus) {
            display("Command '{}' failed: {}", program, status)
        }

        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
        }

        /// Image decoding or encoding error.
        Image(err: image::ImageError) {
            from()
            source(err)
        }

        /// CSV output error.
        Csv(err: csv::Error) {
            from()
            source(err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, SulcToolsError>;
