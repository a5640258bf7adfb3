//! Drawing grids and paths.
//!
//! Rendered images use the same colours maze images are loaded with, so they
//! can be loaded back as problems.

use std::path::Path as FsPath;
use std::path::PathBuf;

use image::Rgb;
use image::RgbImage;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::problems::grid_2d::BLACK;
use crate::problems::grid_2d::BLUE;
use crate::problems::grid_2d::GREEN;
use crate::problems::grid_2d::Grid2DCell;
use crate::problems::grid_2d::Grid2DCost;
use crate::problems::grid_2d::Grid2DProblem;
use crate::problems::grid_2d::Grid2DState;
use crate::problems::grid_2d::RED;
use crate::problems::grid_2d::WHITE;
use crate::space::Path;

/// Darkest shade used for expensive cells.
const MIN_SHADE: u8 = 96;
const SHADE_STEP: u8 = 16;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Scale must be at least 1")]
    InvalidScale,
    #[error("A {rows}x{cols} grid at scale {scale} doesn't fit in an image")]
    TooLarge { rows: usize, cols: usize, scale: u32 },
    #[error("Image error when saving '{p}': {e}")]
    ImageError { p: PathBuf, e: image::ImageError },
}

/// Free cells get darker the more they cost to enter.
fn colour(cell: Grid2DCell) -> [u8; 3] {
    match cell {
        Grid2DCell::Wall => BLACK,
        Grid2DCell::Free(c) if c <= 1 => WHITE,
        Grid2DCell::Free(c) => {
            let steps = u8::try_from(c - 1).unwrap_or(u8::MAX);
            let shade = u8::MAX
                .saturating_sub(steps.saturating_mul(SHADE_STEP))
                .max(MIN_SHADE);
            [shade, shade, shade]
        }
    }
}

/// Draws each cell as a `scale`x`scale` square.
///
/// Walls are black, path cells red, the start blue and the goal green.
pub fn render(
    problem: &Grid2DProblem,
    path: &Path<Grid2DState, Grid2DCost>,
    scale: u32,
) -> Result<RgbImage, RenderError> {
    if scale == 0 {
        return Err(RenderError::InvalidScale);
    }
    let (rows, cols) = problem.grid().dimensions();
    let too_large = || RenderError::TooLarge { rows, cols, scale };
    let width = u32::try_from(cols)
        .ok()
        .and_then(|c| c.checked_mul(scale))
        .ok_or_else(too_large)?;
    let height = u32::try_from(rows)
        .ok()
        .and_then(|r| r.checked_mul(scale))
        .ok_or_else(too_large)?;

    let on_path: FxHashSet<Grid2DState> = path.states().iter().copied().collect();
    let mut img = RgbImage::new(width, height);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let row = (y / scale) as usize;
        let col = (x / scale) as usize;
        let Some(s) = Grid2DState::new(row, col) else {
            continue;
        };

        *px = Rgb(if s == problem.start() {
            BLUE
        } else if s == problem.goal() {
            GREEN
        } else if on_path.contains(&s) {
            RED
        } else {
            colour(problem.grid().at(&s))
        });
    }

    Ok(img)
}

/// Renders to a file. The format follows the file's extension.
pub fn save(
    problem: &Grid2DProblem,
    path: &Path<Grid2DState, Grid2DCost>,
    scale: u32,
    file: &FsPath,
) -> Result<(), RenderError> {
    let img = render(problem, path, scale)?;
    img.save(file).map_err(|e| RenderError::ImageError {
        p: file.to_path_buf(),
        e,
    })?;
    log::debug!("Saved {}x{} render to {}", img.width(), img.height(), file.display());
    Ok(())
}
