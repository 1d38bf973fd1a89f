//! Cell-based filters: crystallize (Voronoi) and pixellate (square blocks).

use image::{Rgb, RgbImage};

/// Deterministic hash of a lattice cell to a pair of offsets in `[0, 1)`.
fn cell_jitter(i: i64, j: i64) -> (f32, f32) {
    // SplitMix64 finalizer over the packed cell coordinates
    let mut z = (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (j as u64).rotate_left(32);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;

    let unit = |bits: u64| (bits & 0xFFFF) as f32 / 65536.0;
    (unit(z), unit(z >> 16))
}

/// Replace the image with Voronoi cells whose seeds sit on a jittered
/// lattice of pitch `radius` pixels. Each pixel takes the source colour at
/// the nearest seed.
///
/// A radius below one pixel returns an unmodified copy.
pub fn crystallize(image: &RgbImage, radius: f32) -> RgbImage {
    if radius.is_nan() || radius < 1.0 {
        return image.clone();
    }

    let (width, height) = image.dimensions();
    let pitch = radius;
    let seed = |i: i64, j: i64| {
        let (jx, jy) = cell_jitter(i, j);
        ((i as f32 + jx) * pitch, (j as f32 + jy) * pitch)
    };
    let sample = |sx: f32, sy: f32| {
        let x = (sx.floor().max(0.0) as u32).min(width - 1);
        let y = (sy.floor().max(0.0) as u32).min(height - 1);
        *image.get_pixel(x, y)
    };

    RgbImage::from_fn(width, height, |x, y| {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        let ci = (px / pitch).floor() as i64;
        let cj = (py / pitch).floor() as i64;

        let mut best = (f32::INFINITY, (px, py));
        for j in cj - 1..=cj + 1 {
            for i in ci - 1..=ci + 1 {
                let (sx, sy) = seed(i, j);
                let d = (sx - px) * (sx - px) + (sy - py) * (sy - py);
                if d < best.0 {
                    best = (d, (sx, sy));
                }
            }
        }
        let (_, (sx, sy)) = best;
        sample(sx, sy)
    })
}

/// Block boundaries along one axis: a boundary passes through `centre`, and
/// the partial blocks at either end are clipped to `[0, len)`.
fn block_spans(len: u32, centre: u32, block: u32) -> Vec<(u32, u32)> {
    let mut spans = Vec::with_capacity((len / block + 2) as usize);
    let first = centre % block;
    if first > 0 {
        spans.push((0, first));
    }
    let mut start = first;
    while start < len {
        let end = start.saturating_add(block).min(len);
        spans.push((start, end));
        start = end;
    }
    spans
}

/// Fill square blocks of `scale` pixels with their mean colour. The block
/// grid is anchored at the image centre.
///
/// A scale below one pixel returns an unmodified copy. Blocks never grow
/// past the longest image edge.
pub fn pixellate(image: &RgbImage, scale: f32) -> RgbImage {
    if scale.is_nan() || scale < 1.0 {
        return image.clone();
    }

    let (width, height) = image.dimensions();
    let block = (scale.round().min(u32::MAX as f32) as u32).clamp(1, width.max(height).max(1));
    let mut out = RgbImage::new(width, height);

    for &(y0, y1) in &block_spans(height, height / 2, block) {
        for &(x0, x1) in &block_spans(width, width / 2, block) {
            let mut sum = [0u64; 3];
            for y in y0..y1 {
                for x in x0..x1 {
                    let p = image.get_pixel(x, y);
                    for c in 0..3 {
                        sum[c] += p[c] as u64;
                    }
                }
            }
            let count = ((x1 - x0) as u64) * ((y1 - y0) as u64);
            let mean = Rgb(sum.map(|s| ((s + count / 2) / count) as u8));
            for y in y0..y1 {
                for x in x0..x1 {
                    out.put_pixel(x, y, mean);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_images::{gradient, total_difference};
    use std::collections::HashSet;

    fn distinct_colours(img: &RgbImage) -> usize {
        img.pixels().map(|p| p.0).collect::<HashSet<_>>().len()
    }

    #[test]
    fn test_block_spans_anchor_at_centre() {
        assert_eq!(block_spans(10, 5, 4), vec![(0, 1), (1, 5), (5, 9), (9, 10)]);
        assert_eq!(block_spans(8, 4, 4), vec![(0, 4), (4, 8)]);
        assert_eq!(block_spans(3, 1, 8), vec![(0, 1), (1, 3)]);
    }

    #[test]
    fn test_block_spans_huge_block_does_not_overflow() {
        assert_eq!(block_spans(4, 2, u32::MAX), vec![(0, 2), (2, 4)]);
        assert_eq!(block_spans(5, 0, u32::MAX), vec![(0, 5)]);
    }

    #[test]
    fn test_pixellate_huge_scale_is_one_block_per_quadrant() {
        let img = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
        let out = pixellate(&img, 1e10);
        assert_eq!(out, img);

        let grad = gradient(6, 6);
        let out = pixellate(&grad, f32::MAX);
        assert_eq!(out.get_pixel(0, 0), out.get_pixel(2, 2));
        assert_eq!(out.get_pixel(3, 3), out.get_pixel(5, 5));
    }

    #[test]
    fn test_pixellate_blocks_are_uniform() {
        let img = gradient(16, 16);
        let out = pixellate(&img, 4.0);
        // 16 / 2 = 8 is a multiple of 4, so blocks are aligned to 0
        for by in 0..4 {
            for bx in 0..4 {
                let first = out.get_pixel(bx * 4, by * 4);
                for y in 0..4 {
                    for x in 0..4 {
                        assert_eq!(out.get_pixel(bx * 4 + x, by * 4 + y), first);
                    }
                }
            }
        }
    }

    #[test]
    fn test_pixellate_mean_colour() {
        // 4x4 with centre at (2, 2): the top-left block is x, y in 0..2
        let mut img = RgbImage::new(4, 4);
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([100, 0, 0]));
        img.put_pixel(0, 1, Rgb([200, 0, 0]));
        img.put_pixel(1, 1, Rgb([100, 40, 0]));
        let out = pixellate(&img, 2.0);
        assert_eq!(out.get_pixel(0, 0).0, [100, 10, 0]);
        assert_eq!(out.get_pixel(1, 1).0, [100, 10, 0]);
        assert_eq!(out.get_pixel(3, 3).0, [0, 0, 0]);
    }

    #[test]
    fn test_pixellate_small_scale_is_identity() {
        let img = gradient(8, 8);
        assert_eq!(pixellate(&img, 0.0), img);
        assert_eq!(pixellate(&img, 1.0), img);
    }

    #[test]
    fn test_pixellate_larger_blocks_lose_more_detail() {
        let img = gradient(32, 32);
        assert!(distinct_colours(&pixellate(&img, 8.0)) < distinct_colours(&pixellate(&img, 2.0)));
    }

    #[test]
    fn test_crystallize_small_radius_is_identity() {
        let img = gradient(8, 8);
        assert_eq!(crystallize(&img, 0.5), img);
    }

    #[test]
    fn test_crystallize_reduces_palette() {
        let img = gradient(32, 32);
        let out = crystallize(&img, 6.0);
        assert!(distinct_colours(&out) < distinct_colours(&img));
        assert!(total_difference(&out, &img) > 0);
    }

    #[test]
    fn test_crystallize_colours_come_from_source() {
        let img = gradient(20, 20);
        let source: HashSet<_> = img.pixels().map(|p| p.0).collect();
        let out = crystallize(&img, 5.0);
        assert!(out.pixels().all(|p| source.contains(&p.0)));
    }

    #[test]
    fn test_crystallize_deterministic() {
        let img = gradient(24, 24);
        assert_eq!(crystallize(&img, 7.0), crystallize(&img, 7.0));
    }

    #[test]
    fn test_cell_jitter_in_unit_range() {
        for i in -5..5 {
            for j in -5..5 {
                let (x, y) = cell_jitter(i, j);
                assert!((0.0..1.0).contains(&x));
                assert!((0.0..1.0).contains(&y));
            }
        }
    }
}
