//! End-to-end warp pipeline
//!
//! Ties the stages together: control point generation, displacement map
//! construction under the selected strategy, optional inpainting, and
//! resampling. One invocation is a single linear pass; every numeric
//! degeneracy inside the stages degrades to identity at the smallest
//! granularity, so the pipeline itself never retries.

use rayon::prelude::*;

use crate::control::{AnchorPolicy, generate_control_points};
use crate::diagnostics::WarpDiagnostics;
use crate::engine::{BlendPolicy, build_displacement_map, movement_mask};
use crate::error::DeformResult;
use crate::mls::{MlsConfig, mls_transform_backward};
use crate::resample::{resample, resample_with_mask};
use crate::segment::segment_parts;
use crate::tps::{TpsConfig, TpsParams};
use facewarp_core::{DisplacementMap, FaceLandmarks, FaceParams, Point, Raster};

/// Which solver fills the displacement map
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WarpStrategy {
    /// Global thin-plate spline interpolation
    Tps(TpsConfig),
    /// Local moving least squares interpolation
    Mls(MlsConfig),
    /// Per-region independent deformation with barrier damping
    Independent(BlendPolicy),
}

impl Default for WarpStrategy {
    fn default() -> Self {
        WarpStrategy::Independent(BlendPolicy::default())
    }
}

/// Options for one warp invocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpOptions {
    /// Solver selection
    pub strategy: WarpStrategy,
    /// Whether unchanged features emit anchoring control points
    pub anchor_policy: AnchorPolicy,
    /// Landmark-space to pixel-space scale factor
    pub image_scale: f32,
    /// Displacement magnitude counted as extreme in the diagnostics
    pub extreme_displacement_threshold: f32,
    /// Movement-mask intensity above which vacated source pixels are
    /// inpainted; `None` disables inpainting
    pub inpaint_threshold: Option<f32>,
}

impl Default for WarpOptions {
    fn default() -> Self {
        Self {
            strategy: WarpStrategy::default(),
            anchor_policy: AnchorPolicy::default(),
            image_scale: 1.0,
            extreme_displacement_threshold: 50.0,
            inpaint_threshold: None,
        }
    }
}

/// Result of one warp invocation
#[derive(Debug, Clone)]
pub struct WarpOutput {
    /// The warped pixel buffer
    pub raster: Raster,
    /// The backward displacement map that produced it
    pub displacement: DisplacementMap,
    /// Per-invocation summary statistics
    pub diagnostics: WarpDiagnostics,
}

/// Warp a face image according to per-feature parameters
///
/// # Arguments
/// * `src` - Source pixel buffer
/// * `landmarks` - Detected landmark groups in landmark space
/// * `params` - Per-feature adjustment parameters
/// * `options` - Strategy and tuning options
///
/// # Returns
/// The warped raster plus the displacement map and diagnostics. Identity
/// parameters (or landmarks too sparse to form control points) yield an
/// output byte-identical to the input.
///
/// # Errors
/// Propagates dimension and buffer contract violations from the stages;
/// numeric degeneracies never surface as errors.
pub fn warp_face(
    src: &Raster,
    landmarks: &FaceLandmarks,
    params: &FaceParams,
    options: &WarpOptions,
) -> DeformResult<WarpOutput> {
    let canvas = src.dimensions();
    let points = generate_control_points(landmarks, params, options.image_scale, options.anchor_policy);

    if points.is_empty() {
        let displacement = DisplacementMap::identity(canvas.0, canvas.1)?;
        let diagnostics =
            WarpDiagnostics::collect(&points, &displacement, options.extreme_displacement_threshold);
        return Ok(WarpOutput {
            raster: src.clone(),
            displacement,
            diagnostics,
        });
    }

    let displacement = match options.strategy {
        WarpStrategy::Independent(policy) => {
            let (regions, barriers) = segment_parts(landmarks, options.image_scale, canvas);
            build_displacement_map(&points, &regions, &barriers, canvas, policy)?
        }
        WarpStrategy::Tps(config) => {
            let tps = TpsParams::fit_backward(&points, &config);
            fill_map(canvas, |q| tps.evaluate(q))?
        }
        WarpStrategy::Mls(config) => {
            fill_map(canvas, |q| mls_transform_backward(q, &points, &config))?
        }
    };

    let raster = match options.inpaint_threshold {
        Some(threshold) => {
            let mask = movement_mask(&displacement)?;
            resample_with_mask(src, &displacement, &mask, threshold)?
        }
        None => resample(src, &displacement)?,
    };

    let diagnostics =
        WarpDiagnostics::collect(&points, &displacement, options.extreme_displacement_threshold);

    Ok(WarpOutput {
        raster,
        displacement,
        diagnostics,
    })
}

/// Fill a displacement map by evaluating a backward transform per pixel,
/// row-partitioned across the rayon pool
fn fill_map<F>(canvas: (u32, u32), transform: F) -> DeformResult<DisplacementMap>
where
    F: Fn(Point) -> Point + Sync,
{
    let (width, height) = canvas;
    let mut map = DisplacementMap::identity(width, height)?;
    let w = width as usize;

    let (sx, sy) = map.planes_mut();
    sx.par_chunks_mut(w)
        .zip(sy.par_chunks_mut(w))
        .enumerate()
        .for_each(|(y, (row_x, row_y))| {
            for x in 0..w {
                let s = transform(Point::new(x as f32, y as f32));
                row_x[x] = s.x;
                row_y[x] = s.y;
            }
        });

    Ok(map)
}

/// Convenience entry point using default options
pub fn warp_face_default(
    src: &Raster,
    landmarks: &FaceLandmarks,
    params: &FaceParams,
) -> DeformResult<WarpOutput> {
    warp_face(src, landmarks, params, &WarpOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use facewarp_core::color;

    fn eye_landmarks() -> FaceLandmarks {
        let mut lm = FaceLandmarks::new();
        lm.left_eye = (0..6)
            .map(|k| {
                let t = (k as f32) * std::f32::consts::TAU / 6.0;
                Point::new(100.0 + 10.0 * t.cos(), 100.0 + 5.0 * t.sin())
            })
            .collect();
        lm
    }

    fn gradient_raster(width: u32, height: u32) -> Raster {
        let mut raster = Raster::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                raster.set_pixel_unchecked(
                    x,
                    y,
                    color::compose_rgba((x % 256) as u8, (y % 256) as u8, 100, 255),
                );
            }
        }
        raster
    }

    #[test]
    fn test_identity_params_byte_identical() {
        let src = gradient_raster(64, 64);
        let out = warp_face_default(&src, &eye_landmarks(), &FaceParams::default()).unwrap();
        assert!(out.raster.equals(&src));
        assert!(out.displacement.is_identity(0.0));
        assert_eq!(out.diagnostics.control_points_per_feature, [0; 4]);
    }

    #[test]
    fn test_eye_enlargement_changes_pixels() {
        let src = gradient_raster(200, 200);
        let mut params = FaceParams::default();
        params.left_eye.size = 1.5;

        for strategy in [
            WarpStrategy::Independent(BlendPolicy::Weighted),
            WarpStrategy::Tps(TpsConfig::default()),
            WarpStrategy::Mls(MlsConfig::default()),
        ] {
            let options = WarpOptions {
                strategy,
                ..WarpOptions::default()
            };
            let out = warp_face(&src, &eye_landmarks(), &params, &options).unwrap();
            assert!(
                !out.displacement.is_identity(1e-3),
                "strategy {strategy:?} produced no deformation"
            );
            assert!(!out.raster.equals(&src));
            assert_eq!(out.raster.dimensions(), src.dimensions());
        }
    }

    #[test]
    fn test_diagnostics_reflect_control_points() {
        let src = gradient_raster(200, 200);
        let mut params = FaceParams::default();
        params.left_eye.size = 1.2;

        let out = warp_face_default(&src, &eye_landmarks(), &params).unwrap();
        // 6 boundary + anchor + 8 iris ring points for the left eye
        assert_eq!(out.diagnostics.control_points_per_feature, [15, 0, 0, 0]);
    }

    #[test]
    fn test_inpainting_path_runs() {
        let src = gradient_raster(128, 128);
        let mut params = FaceParams::default();
        params.left_eye.position_x = 20.0;

        let options = WarpOptions {
            inpaint_threshold: Some(0.3),
            ..WarpOptions::default()
        };
        let out = warp_face(&src, &eye_landmarks(), &params, &options).unwrap();
        assert_eq!(out.raster.dimensions(), src.dimensions());
    }
}
