//! Rasterising a model and PNG export
//!
//! Observed cells draw their variant's bitmap. Undecided cells draw the
//! weight-averaged blend of their remaining candidates, and cells with no
//! candidate left are opaque black. Tile sets without bitmaps are drawn as
//! flat squares with one colour per variant.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::algorithm::model::Model;
use crate::io::configuration::PLACEHOLDER_CELL_SIZE;
use crate::io::error::{Result, WfcError};
use crate::math::hashing::hash2d;
use crate::spatial::tiles::TileSet;

const CONTRADICTION_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Edge length in pixels of one cell when rendering `tiles`
pub fn cell_size(tiles: &TileSet) -> u32 {
    tiles.tile_size().unwrap_or(PLACEHOLDER_CELL_SIZE)
}

/// Flat colour standing in for a variant without a bitmap
pub fn placeholder_color(tile: usize) -> Rgba<u8> {
    let channel = |salt: u32| (64.0 + hash2d(tile as u32, salt, 0x5eed) * 191.0).round() as u8;
    Rgba([channel(0), channel(1), channel(2), 255])
}

fn variant_pixel(tiles: &TileSet, tile: usize, x: u32, y: u32) -> Rgba<u8> {
    tiles
        .variant(tile)
        .and_then(|variant| variant.bitmap.as_ref())
        .and_then(|bitmap| bitmap.get_pixel_checked(x, y))
        .copied()
        .unwrap_or_else(|| placeholder_color(tile))
}

/// Render the current state of a model
pub fn render_model(model: &Model) -> RgbaImage {
    let tiles = model.tiles();
    let grid = model.grid();
    let size = cell_size(tiles);
    let mut img = RgbaImage::new(grid.width() as u32 * size, grid.height() as u32 * size);

    for cell in 0..grid.cell_count() {
        let [cx, cy] = grid.coordinates(cell);
        let observed = model.observed(cell);
        let candidates = if observed.is_some() {
            Vec::new()
        } else {
            model.cell_candidates(cell)
        };

        for dy in 0..size {
            for dx in 0..size {
                let color = match observed {
                    Some(tile) => variant_pixel(tiles, tile, dx, dy),
                    None => blend(tiles, &candidates, dx, dy),
                };
                img.put_pixel(cx as u32 * size + dx, cy as u32 * size + dy, color);
            }
        }
    }

    img
}

/// Weighted average colour of the candidates at one pixel
fn blend(tiles: &TileSet, candidates: &[(usize, f64)], x: u32, y: u32) -> Rgba<u8> {
    let total: f64 = candidates.iter().map(|&(_, weight)| weight.max(0.0)).sum();
    if candidates.is_empty() || total <= 0.0 {
        return CONTRADICTION_COLOR;
    }

    let mut sums = [0.0_f64; 4];
    for &(tile, weight) in candidates {
        let pixel = variant_pixel(tiles, tile, x, y);
        for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
            *sum += f64::from(channel) * weight.max(0.0);
        }
    }

    Rgba(sums.map(|sum| (sum / total).round().clamp(0.0, 255.0) as u8))
}

/// Save an image as PNG, creating parent directories
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_png(img: &RgbaImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| WfcError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path).map_err(|e| WfcError::ImageExport {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
