//! Composition of figure panels into a single image grid.
//!
//! Reads every PNG file of a directory in alphabetical order and tiles them
//! into one composite image, row-major, with configurable row width and
//! inter-image padding.

use std::fs;
use std::path::{Path, PathBuf};

use image::{GenericImage, Rgba, RgbaImage};
use log::debug;

use crate::error::{Result, SulcToolsError};


/// Settings for the grid layout.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Number of images placed next to each other in one grid row.
    pub images_per_row: u32,
    /// Padding in pixels around every tile.
    pub padding: u32,
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig {
            images_per_row: 4,
            padding: 1,
        }
    }
}


/// List the `.png` files of `dir` in alphabetical order.
pub fn png_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("png") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(SulcToolsError::EmptyImageDir(
            dir.as_ref().display().to_string(),
        ));
    }
    Ok(files)
}


/// Tile every PNG image of a directory into one grid image.
///
/// All images must share the dimensions of the (alphabetically) first one;
/// a deviating image fails the whole composition. The grid is `images_per_row`
/// tiles wide (fewer if the batch is smaller) with `padding` pixels around
/// every tile, so a batch of n images spans
/// `ceil(n / images_per_row)` rows.
pub fn compose_grid<P: AsRef<Path>>(dir: P, config: &GridConfig) -> Result<RgbaImage> {
    let files = png_files(dir)?;

    let mut tiles: Vec<RgbaImage> = Vec::with_capacity(files.len());
    for path in &files {
        let img = image::open(path)?.to_rgba8();
        if let Some(first) = tiles.first() {
            if img.dimensions() != first.dimensions() {
                return Err(SulcToolsError::ImageShapeMismatch(
                    path.display().to_string(),
                    first.dimensions(),
                    img.dimensions(),
                ));
            }
        }
        tiles.push(img);
    }

    let (tile_w, tile_h) = tiles[0].dimensions();
    let cols = config.images_per_row.max(1).min(tiles.len() as u32);
    let rows = (tiles.len() as u32 + cols - 1) / cols;
    let pad = config.padding;

    let grid_w = cols * tile_w + (cols + 1) * pad;
    let grid_h = rows * tile_h + (rows + 1) * pad;
    debug!(
        "Composing {} images into {} rows of {}: {}x{} pixels.",
        tiles.len(),
        rows,
        cols,
        grid_w,
        grid_h
    );

    let mut grid = RgbaImage::from_pixel(grid_w, grid_h, Rgba([0, 0, 0, 255]));
    for (idx, tile) in tiles.iter().enumerate() {
        let row = idx as u32 / cols;
        let col = idx as u32 % cols;
        let x = pad + col * (tile_w + pad);
        let y = pad + row * (tile_h + pad);
        grid.copy_from(tile, x, y)?;
    }

    Ok(grid)
}

/// Compose the grid and write it as one PNG file.
pub fn write_grid<P: AsRef<Path>, Q: AsRef<Path>>(
    dir: P,
    out_path: Q,
    config: &GridConfig,
) -> Result<()> {
    let grid = compose_grid(dir, config)?;
    grid.save(out_path)?;
    Ok(())
}
