//! Contrast-limited adaptive histogram equalization.
//!
//! `imageproc` ships a global `equalize_histogram` but no tiled variant,
//! so the localized equalization used by the `contrast_enhancement`
//! strategy is implemented here. The algorithm is the usual one: clip each
//! tile's histogram at a limit proportional to the tile area, redistribute
//! the excess uniformly, build a per-tile lookup table from the cumulative
//! distribution, and bilinearly interpolate between the four nearest tile
//! tables at every pixel. Integer histograms and a fixed redistribution
//! order keep the output fully deterministic.

use image::{GrayImage, Luma};

/// Applies CLAHE to a grayscale image.
///
/// # Arguments
///
/// * `image` - The input image. Returned unchanged if it is empty.
/// * `grid` - The tile grid as (columns, rows). Clamped so every tile is
///   at least one pixel.
/// * `clip_limit` - Histogram clip limit relative to a uniform
///   distribution over the tile (2.0 means "twice the uniform bin count").
pub fn clahe(image: &GrayImage, grid: (u32, u32), clip_limit: f32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let tiles_x = grid.0.clamp(1, width) as usize;
    let tiles_y = grid.1.clamp(1, height) as usize;
    let tile_w = width.div_ceil(tiles_x as u32);
    let tile_h = height.div_ceil(tiles_y as u32);

    // One 256-entry lookup table per tile.
    let mut luts = vec![[0u8; 256]; tiles_x * tiles_y];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx as u32 * tile_w;
            let y0 = ty as u32 * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);
            luts[ty * tiles_x + tx] = tile_lut(image, x0, y0, x1, y1, clip_limit);
        }
    }

    let sample = |tx: usize, ty: usize, value: u8| -> f32 {
        f32::from(luts[ty * tiles_x + tx][value as usize])
    };

    GrayImage::from_fn(width, height, |x, y| {
        let value = image.get_pixel(x, y)[0];

        // Position in tile-center coordinates.
        let gx = (x as f32 + 0.5) / tile_w as f32 - 0.5;
        let gy = (y as f32 + 0.5) / tile_h as f32 - 0.5;
        let (tx0, tx1, fx) = split_axis(gx, tiles_x);
        let (ty0, ty1, fy) = split_axis(gy, tiles_y);

        let top = sample(tx0, ty0, value) * (1.0 - fx) + sample(tx1, ty0, value) * fx;
        let bottom = sample(tx0, ty1, value) * (1.0 - fx) + sample(tx1, ty1, value) * fx;
        let blended = top * (1.0 - fy) + bottom * fy;
        Luma([blended.round().clamp(0.0, 255.0) as u8])
    })
}

/// Splits a tile-center coordinate into the two neighboring tile indices
/// and the interpolation fraction, clamping at the grid borders.
fn split_axis(g: f32, tiles: usize) -> (usize, usize, f32) {
    if g <= 0.0 {
        return (0, 0, 0.0);
    }
    let floor = g.floor();
    let i0 = floor as usize;
    if i0 >= tiles - 1 {
        return (tiles - 1, tiles - 1, 0.0);
    }
    (i0, i0 + 1, g - floor)
}

/// Builds the clipped, equalized lookup table for one tile region.
fn tile_lut(image: &GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, clip_limit: f32) -> [u8; 256] {
    let mut hist = [0u32; 256];
    for y in y0..y1 {
        for x in x0..x1 {
            hist[image.get_pixel(x, y)[0] as usize] += 1;
        }
    }
    let area = x1.saturating_sub(x0) * y1.saturating_sub(y0);
    if area == 0 {
        return std::array::from_fn(|i| i as u8);
    }

    let clip = ((clip_limit * area as f32 / 256.0) as u32).max(1);
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > clip {
            excess += *bin - clip;
            *bin = clip;
        }
    }

    // Redistribute the clipped mass uniformly, remainder to the low bins.
    let bonus = excess / 256;
    let remainder = (excess % 256) as usize;
    for (i, bin) in hist.iter_mut().enumerate() {
        *bin += bonus;
        if i < remainder {
            *bin += 1;
        }
    }

    let scale = 255.0 / area as f32;
    let mut cumulative = 0u32;
    std::array::from_fn(|i| {
        cumulative += hist[i];
        (cumulative as f32 * scale).round().clamp(0.0, 255.0) as u8
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_preserved() {
        let img = GrayImage::from_fn(100, 60, |x, y| Luma([((x + y) % 256) as u8]));
        let out = clahe(&img, (8, 8), 2.0);
        assert_eq!(out.dimensions(), (100, 60));
    }

    #[test]
    fn test_uniform_image_stays_uniform() {
        let img = GrayImage::from_pixel(64, 64, Luma([90u8]));
        let out = clahe(&img, (8, 8), 2.0);
        let first = out.get_pixel(0, 0)[0];
        assert!(out.pixels().all(|p| p[0] == first));
    }

    #[test]
    fn test_deterministic() {
        let img = GrayImage::from_fn(80, 50, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]));
        let a = clahe(&img, (8, 8), 2.0);
        let b = clahe(&img, (8, 8), 2.0);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_raises_local_contrast() {
        // A faint gradient occupying a narrow band of gray levels.
        let img = GrayImage::from_fn(64, 64, |x, _| Luma([(100 + x / 8) as u8]));
        let out = clahe(&img, (8, 8), 2.0);
        let min_in = img.pixels().map(|p| p[0]).min().unwrap();
        let max_in = img.pixels().map(|p| p[0]).max().unwrap();
        let min_out = out.pixels().map(|p| p[0]).min().unwrap();
        let max_out = out.pixels().map(|p| p[0]).max().unwrap();
        assert!(max_out - min_out > max_in - min_in);
    }

    #[test]
    fn test_grid_larger_than_image_is_clamped() {
        let img = GrayImage::from_pixel(4, 4, Luma([128u8]));
        let out = clahe(&img, (8, 8), 2.0);
        assert_eq!(out.dimensions(), (4, 4));
    }

    #[test]
    fn test_empty_image_passthrough() {
        let img = GrayImage::new(0, 0);
        let out = clahe(&img, (8, 8), 2.0);
        assert_eq!(out.dimensions(), (0, 0));
    }
}
