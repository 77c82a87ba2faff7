//! Command line interface to the sulctools operations.
//!
//! One subcommand per workflow step; all paths are explicit arguments.
//! `RUST_LOG` controls log verbosity.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use sulctools::{
    aggregate, read_list_file, remove_overlap_batch, write_grid, write_morph_table, AssumeYes,
    CaLabelConfig, Confirmation, GridConfig, Hemisphere, MorphConfig, OverlapConfig,
    StdinConfirmation, SubjectsDir, CA_LABEL_PROGRAM, DEFAULT_OVERLAP_THRESHOLD,
};

#[derive(Parser)]
#[command(
    name = "sulctools",
    version,
    about = "Sulcal label tooling for FreeSurfer subjects"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove vertices shared with a second label from the first label, for every subject.
    RemoveOverlap {
        /// FreeSurfer subjects directory.
        subjects_dir: PathBuf,
        /// Text file with one subject id per line.
        subject_list: PathBuf,
        /// Label to filter; a `<label>_new.label` copy is written next to it.
        label_a: String,
        /// Label whose vertices are removed from the first label.
        label_b: String,
        /// Shared-vertex count from which on removal must be confirmed.
        #[arg(long, default_value_t = DEFAULT_OVERLAP_THRESHOLD)]
        threshold: usize,
        /// Answer every confirmation prompt with yes.
        #[arg(long)]
        assume_yes: bool,
    },
    /// Aggregate anatomical stats and sulcal depth into one CSV table.
    Morphology {
        /// FreeSurfer subjects directory.
        subjects_dir: PathBuf,
        /// Text file with one subject id per line.
        subject_list: PathBuf,
        /// Text file with one label name per line.
        label_list: PathBuf,
        /// Output CSV path.
        #[arg(long)]
        out: PathBuf,
        /// Subject whose depth map is read from a precomputed `<hemi>.smoothsulc` file.
        #[arg(long, default_value = "fsaverage")]
        reference_subject: String,
    },
    /// Tile every PNG in a directory into one composite image.
    ImageGrid {
        /// Directory containing the figure panels.
        dir: PathBuf,
        /// Output PNG path.
        #[arg(long)]
        out: PathBuf,
        /// Number of panels per grid row.
        #[arg(long, default_value_t = 4)]
        images_per_row: u32,
        /// Padding in pixels around every panel.
        #[arg(long, default_value_t = 1)]
        padding: u32,
    },
    /// Create a per-vertex annotation from an atlas via mris_ca_label.
    AtlasToAnnot {
        /// FreeSurfer subjects directory.
        subjects_dir: PathBuf,
        /// Directory containing the atlas `.gcs` files.
        data_dir: PathBuf,
        /// Subject to annotate.
        subject: String,
        /// Hemisphere (lh or rh).
        hemi: String,
        /// Colortable file for the atlas regions.
        #[arg(long)]
        colortable: PathBuf,
        /// Atlas name; the classifier file is `<data_dir>/<hemi>.<atlas>.gcs`.
        #[arg(long)]
        atlas: String,
        /// Name of the annotation to create.
        #[arg(long)]
        annot_name: String,
        /// FreeSurfer installation directory.
        #[arg(long, default_value = "/usr/local/freesurfer")]
        freesurfer_home: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> sulctools::Result<()> {
    match cli.command {
        Commands::RemoveOverlap {
            subjects_dir,
            subject_list,
            label_a,
            label_b,
            threshold,
            assume_yes,
        } => {
            let subjects = read_list_file(subject_list)?;
            let dir = SubjectsDir::new(subjects_dir);
            let config = OverlapConfig { threshold };

            let mut stdin_confirm = StdinConfirmation;
            let mut yes_confirm = AssumeYes;
            let confirm: &mut dyn Confirmation = if assume_yes {
                &mut yes_confirm
            } else {
                &mut stdin_confirm
            };

            let written =
                remove_overlap_batch(&dir, &subjects, &label_a, &label_b, &config, confirm)?;
            println!("Wrote {} filtered labels.", written.len());
        }
        Commands::Morphology {
            subjects_dir,
            subject_list,
            label_list,
            out,
            reference_subject,
        } => {
            let subjects = read_list_file(subject_list)?;
            let labels = read_list_file(label_list)?;
            let dir = SubjectsDir::new(subjects_dir);
            let config = MorphConfig { reference_subject };

            let rows = aggregate(&dir, &subjects, &labels, &config);
            write_morph_table(&rows, &out)?;
            println!("Wrote {} morphology rows to {}.", rows.len(), out.display());
        }
        Commands::ImageGrid {
            dir,
            out,
            images_per_row,
            padding,
        } => {
            let config = GridConfig {
                images_per_row,
                padding,
            };
            write_grid(&dir, &out, &config)?;
            println!("Grid image saved as {}.", out.display());
        }
        Commands::AtlasToAnnot {
            subjects_dir,
            data_dir,
            subject,
            hemi,
            colortable,
            atlas,
            annot_name,
            freesurfer_home,
        } => {
            let hemi: Hemisphere = hemi.parse()?;
            let config = CaLabelConfig {
                freesurfer_home,
                subjects_dir: SubjectsDir::new(subjects_dir),
                colortable,
                atlas: data_dir.join(format!("{}.{}.gcs", hemi, atlas)),
                subject,
                hemi,
                annot_name,
                program: String::from(CA_LABEL_PROGRAM),
            };

            let annot = config.run()?;
            println!(
                "Annotation created for {}.{}: {}",
                hemi,
                config.subject,
                annot.display()
            );
        }
    }
    Ok(())
}
