//! Pixel resampler
//!
//! Applies a finished backward displacement map to a raster: every output
//! pixel samples the source at its mapped coordinate with bilinear 2x2
//! interpolation per channel. Source coordinates outside the valid range
//! produce a fully transparent output pixel rather than a guessed color.
//!
//! The masked variant additionally inpaints vacated source regions with a
//! local neighborhood average before compositing the deformed layer on
//! top, hiding the hole a strongly moved feature leaves behind.

use rayon::prelude::*;

use crate::error::{DeformError, DeformResult};
use facewarp_core::{DisplacementMap, MovementMask, Raster, color};

/// Half-width of the inpainting neighborhood (5x5 box)
const INPAINT_REACH: i64 = 2;

/// Resample a raster through a backward displacement map
///
/// # Arguments
/// * `src` - Source pixel buffer
/// * `map` - Backward map; must match the source dimensions
///
/// # Errors
/// Returns `DeformError::SizeMismatch` when the map and raster dimensions
/// disagree.
///
/// # Examples
///
/// ```
/// use facewarp_core::{DisplacementMap, Raster};
/// use facewarp_deform::resample;
///
/// let src = Raster::new(16, 16).unwrap();
/// let map = DisplacementMap::identity(16, 16).unwrap();
/// let out = resample(&src, &map).unwrap();
/// assert!(out.equals(&src));
/// ```
pub fn resample(src: &Raster, map: &DisplacementMap) -> DeformResult<Raster> {
    check_dimensions(src, map)?;

    let (width, height) = src.dimensions();
    let mut out = Raster::new(width, height)?;
    let w = width as usize;
    let (plane_x, plane_y) = map.planes();

    out.data_mut()
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            let row_x = &plane_x[y * w..(y + 1) * w];
            let row_y = &plane_y[y * w..(y + 1) * w];
            for x in 0..w {
                row[x] = sample_bilinear(src, row_x[x], row_y[x]);
            }
        });

    Ok(out)
}

/// Resample with movement-mask inpainting
///
/// Source pixels whose mask intensity exceeds `threshold` are replaced by
/// the average of non-vacated pixels in their 5x5 neighborhood, then the
/// deformed layer is alpha-composited over the repaired background.
///
/// # Errors
/// Returns `DeformError::SizeMismatch` when the map or mask dimensions
/// disagree with the raster.
pub fn resample_with_mask(
    src: &Raster,
    map: &DisplacementMap,
    mask: &MovementMask,
    threshold: f32,
) -> DeformResult<Raster> {
    check_dimensions(src, map)?;
    if (mask.width(), mask.height()) != src.dimensions() {
        return Err(DeformError::SizeMismatch {
            map_width: mask.width(),
            map_height: mask.height(),
            raster_width: src.width(),
            raster_height: src.height(),
        });
    }

    let deformed = resample(src, map)?;
    let mut out = inpaint_vacated(src, mask, threshold)?;

    // Deformed layer over the repaired background.
    let (width, height) = src.dimensions();
    for y in 0..height {
        for x in 0..width {
            let over = deformed.get_pixel_unchecked(x, y);
            let under = out.get_pixel_unchecked(x, y);
            out.set_pixel_unchecked(x, y, composite_over(over, under));
        }
    }

    Ok(out)
}

fn check_dimensions(src: &Raster, map: &DisplacementMap) -> DeformResult<()> {
    if map.dimensions() != src.dimensions() {
        return Err(DeformError::SizeMismatch {
            map_width: map.width(),
            map_height: map.height(),
            raster_width: src.width(),
            raster_height: src.height(),
        });
    }
    Ok(())
}

/// Bilinear sample at a fractional source coordinate
///
/// Out-of-range coordinates return the transparent fill. Integer
/// coordinates reproduce the exact source pixel.
fn sample_bilinear(src: &Raster, sx: f32, sy: f32) -> u32 {
    let max_x = (src.width() - 1) as f32;
    let max_y = (src.height() - 1) as f32;
    if !(0.0..=max_x).contains(&sx) || !(0.0..=max_y).contains(&sy) {
        return color::TRANSPARENT;
    }

    let x0 = sx.floor() as u32;
    let y0 = sy.floor() as u32;
    let x1 = (x0 + 1).min(src.width() - 1);
    let y1 = (y0 + 1).min(src.height() - 1);
    let fx = sx - x0 as f32;
    let fy = sy - y0 as f32;

    let p00 = src.get_pixel_unchecked(x0, y0);
    let p10 = src.get_pixel_unchecked(x1, y0);
    let p01 = src.get_pixel_unchecked(x0, y1);
    let p11 = src.get_pixel_unchecked(x1, y1);

    let lerp2 = |c: fn(u32) -> u8| -> u8 {
        let top = (c(p00) as f32) * (1.0 - fx) + (c(p10) as f32) * fx;
        let bottom = (c(p01) as f32) * (1.0 - fx) + (c(p11) as f32) * fx;
        (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8
    };

    color::compose_rgba(
        lerp2(color::red),
        lerp2(color::green),
        lerp2(color::blue),
        lerp2(color::alpha),
    )
}

/// Copy of `src` with vacated pixels replaced by a neighborhood average
fn inpaint_vacated(src: &Raster, mask: &MovementMask, threshold: f32) -> DeformResult<Raster> {
    let (width, height) = src.dimensions();
    let mut out = src.clone();

    for y in 0..height {
        for x in 0..width {
            if mask.get(x, y) <= threshold {
                continue;
            }
            if let Some(fill) = box_average(src, mask, threshold, x, y) {
                out.set_pixel_unchecked(x, y, fill);
            }
        }
    }

    Ok(out)
}

/// Average of non-vacated pixels in the 5x5 box around (cx, cy)
fn box_average(
    src: &Raster,
    mask: &MovementMask,
    threshold: f32,
    cx: u32,
    cy: u32,
) -> Option<u32> {
    let (width, height) = src.dimensions();
    let mut sum = [0.0f32; 4];
    let mut count = 0u32;

    for dy in -INPAINT_REACH..=INPAINT_REACH {
        for dx in -INPAINT_REACH..=INPAINT_REACH {
            let nx = cx as i64 + dx;
            let ny = cy as i64 + dy;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                continue;
            }
            let (nx, ny) = (nx as u32, ny as u32);
            if mask.get(nx, ny) > threshold {
                continue;
            }
            let (r, g, b, a) = color::extract_rgba(src.get_pixel_unchecked(nx, ny));
            sum[0] += r as f32;
            sum[1] += g as f32;
            sum[2] += b as f32;
            sum[3] += a as f32;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    let n = count as f32;
    Some(color::compose_rgba(
        (sum[0] / n).round() as u8,
        (sum[1] / n).round() as u8,
        (sum[2] / n).round() as u8,
        (sum[3] / n).round() as u8,
    ))
}

/// Standard alpha compositing of `over` onto `under`
fn composite_over(over: u32, under: u32) -> u32 {
    let oa = color::alpha(over) as f32 / 255.0;
    if oa >= 1.0 {
        return over;
    }
    if oa <= 0.0 {
        return under;
    }

    let ua = color::alpha(under) as f32 / 255.0;
    let out_a = oa + ua * (1.0 - oa);
    if out_a <= 0.0 {
        return color::TRANSPARENT;
    }

    let blend = |oc: u8, uc: u8| -> u8 {
        let c = ((oc as f32) * oa + (uc as f32) * ua * (1.0 - oa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };

    color::compose_rgba(
        blend(color::red(over), color::red(under)),
        blend(color::green(over), color::green(under)),
        blend(color::blue(over), color::blue(under)),
        (out_a * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_raster(width: u32, height: u32) -> Raster {
        let mut raster = Raster::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                let px = color::compose_rgba((x * 7 % 256) as u8, (y * 11 % 256) as u8, 128, 255);
                raster.set_pixel_unchecked(x, y, px);
            }
        }
        raster
    }

    #[test]
    fn test_identity_map_reproduces_source() {
        let src = gradient_raster(20, 15);
        let map = DisplacementMap::identity(20, 15).unwrap();
        let out = resample(&src, &map).unwrap();
        assert!(out.equals(&src));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let src = gradient_raster(10, 10);
        let map = DisplacementMap::identity(11, 10).unwrap();
        assert!(matches!(
            resample(&src, &map),
            Err(DeformError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_integer_shift_exact() {
        let src = gradient_raster(16, 16);
        let mut map = DisplacementMap::identity(16, 16).unwrap();
        // Every output pixel samples 3 columns to the right.
        for y in 0..16u32 {
            for x in 0..16u32 {
                map.set_source(x, y, x as f32 + 3.0, y as f32);
            }
        }

        let out = resample(&src, &map).unwrap();
        for y in 0..16u32 {
            for x in 0..13u32 {
                assert_eq!(
                    out.get_pixel_unchecked(x, y),
                    src.get_pixel_unchecked(x + 3, y)
                );
            }
        }
    }

    #[test]
    fn test_out_of_bounds_transparent() {
        let src = gradient_raster(8, 8);
        let mut map = DisplacementMap::identity(8, 8).unwrap();
        map.set_source(0, 0, -1.0, 0.0);
        map.set_source(1, 0, 0.0, 7.5);
        map.set_source(2, 0, 7.001, 0.0);

        let out = resample(&src, &map).unwrap();
        assert_eq!(out.get_pixel_unchecked(0, 0), color::TRANSPARENT);
        // y = 7.5 is beyond the last row
        assert_eq!(out.get_pixel_unchecked(1, 0), color::TRANSPARENT);
        assert_eq!(out.get_pixel_unchecked(2, 0), color::TRANSPARENT);
    }

    #[test]
    fn test_halfway_sample_averages_neighbors() {
        let mut src = Raster::new(2, 1).unwrap();
        src.set_pixel_unchecked(0, 0, color::compose_rgba(100, 0, 0, 255));
        src.set_pixel_unchecked(1, 0, color::compose_rgba(200, 0, 0, 255));

        let mut map = DisplacementMap::identity(2, 1).unwrap();
        map.set_source(0, 0, 0.5, 0.0);

        let out = resample(&src, &map).unwrap();
        assert_eq!(color::red(out.get_pixel_unchecked(0, 0)), 150);
    }

    #[test]
    fn test_inpaint_fills_vacated_pixels() {
        let mut src = Raster::new(8, 8).unwrap();
        let bg = color::compose_rgba(50, 50, 50, 255);
        for y in 0..8u32 {
            for x in 0..8u32 {
                src.set_pixel_unchecked(x, y, bg);
            }
        }
        src.set_pixel_unchecked(4, 4, color::compose_rgba(255, 0, 0, 255));

        let mut mask = MovementMask::new(8, 8).unwrap();
        mask.set(4, 4, 1.0);

        // Identity map: the deformed layer reproduces the source, but the
        // vacated pixel is repaired before compositing. With a fully opaque
        // deformed layer the composite hides the repair, so sample through
        // the inpaint step directly.
        let repaired = inpaint_vacated(&src, &mask, 0.5).unwrap();
        assert_eq!(repaired.get_pixel_unchecked(4, 4), bg);
    }

    #[test]
    fn test_masked_resample_transparent_hole_filled() {
        let mut src = Raster::new(8, 8).unwrap();
        let bg = color::compose_rgba(50, 50, 50, 255);
        for y in 0..8u32 {
            for x in 0..8u32 {
                src.set_pixel_unchecked(x, y, bg);
            }
        }

        // Map pixel (4, 4) out of bounds so the deformed layer is
        // transparent there; the repaired background must show through.
        let mut map = DisplacementMap::identity(8, 8).unwrap();
        map.set_source(4, 4, -5.0, -5.0);
        let mut mask = MovementMask::new(8, 8).unwrap();
        mask.set(4, 4, 1.0);

        let out = resample_with_mask(&src, &map, &mask, 0.5).unwrap();
        assert_eq!(out.get_pixel_unchecked(4, 4), bg);
    }

    #[test]
    fn test_composite_opaque_over_wins() {
        let over = color::compose_rgba(10, 20, 30, 255);
        let under = color::compose_rgba(200, 200, 200, 255);
        assert_eq!(composite_over(over, under), over);
    }

    #[test]
    fn test_composite_transparent_over_passes_under() {
        let under = color::compose_rgba(200, 100, 50, 255);
        assert_eq!(composite_over(color::TRANSPARENT, under), under);
    }
}
