//! Independent deformation engine
//!
//! Builds a dense backward displacement map from per-feature influence
//! regions. Each region computes its own candidate displacement in
//! isolation (an inverse-distance-weighted average over its own control
//! points, faded by the region's zone profile and damped near barriers);
//! candidates from overlapping regions are then combined by the configured
//! blend policy. Pixels outside every region keep the identity mapping.
//!
//! The per-pixel fill is row-partitioned across the rayon pool; rows are
//! written through disjoint mutable slices while the control point, region,
//! and barrier inputs are shared read-only.

use rayon::prelude::*;

use crate::control::ControlPoint;
use crate::error::{DeformError, DeformResult};
use crate::segment::{Barrier, PartRegion};
use facewarp_core::{
    DisplacementMap, FeatureId, FeatureProfile, MovementMask, Point, distance_to_segment,
};

/// Inverse-distance weighting exponent for the per-region average
const IDW_ALPHA: f32 = 2.0;
/// Distance floor in the inverse-distance weight
const IDW_EPS: f32 = 1e-6;
/// Displacement magnitude cap, as a fraction of the region radius
const CLAMP_RATIO: f32 = 0.5;
/// Displacements below this magnitude don't mark the movement mask
const MASK_MIN_DISPLACEMENT: f32 = 0.5;

/// How overlapping region candidates are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendPolicy {
    /// Take the candidate of the region with the strongest local influence
    Dominant,
    /// Average the candidates, weighted by each region's local strength
    #[default]
    Weighted,
}

/// Build the backward displacement map for a canvas
///
/// # Arguments
/// * `points` - Control point set from the generator
/// * `regions` - Per-feature influence regions
/// * `barriers` - Inter-feature damping lines
/// * `canvas` - Output dimensions (width, height)
/// * `policy` - Blend policy for overlapping regions
///
/// # Errors
/// Returns `DeformError::InvalidCanvas` for a zero-sized canvas.
pub fn build_displacement_map(
    points: &[ControlPoint],
    regions: &[PartRegion],
    barriers: &[Barrier],
    canvas: (u32, u32),
    policy: BlendPolicy,
) -> DeformResult<DisplacementMap> {
    let (width, height) = canvas;
    if width == 0 || height == 0 {
        return Err(DeformError::InvalidCanvas { width, height });
    }

    let mut map = DisplacementMap::identity(width, height)?;
    if points.is_empty() || regions.is_empty() {
        return Ok(map);
    }

    let by_feature = group_by_feature(points);
    let w = width as usize;

    let (sx, sy) = map.planes_mut();
    sx.par_chunks_mut(w)
        .zip(sy.par_chunks_mut(w))
        .enumerate()
        .for_each(|(y, (row_x, row_y))| {
            for x in 0..w {
                let p = Point::new(x as f32, y as f32);
                if let Some(disp) = pixel_displacement(p, regions, barriers, &by_feature, policy) {
                    row_x[x] = p.x + disp.x;
                    row_y[x] = p.y + disp.y;
                }
            }
        });

    Ok(map)
}

/// Build the displacement map together with its movement mask
///
/// The mask marks source pixels whose content was pulled elsewhere, with
/// intensity proportional to the displacement magnitude, normalized to
/// `[0, 1]`.
///
/// # Errors
/// Same contract as [`build_displacement_map`].
pub fn build_displacement_map_with_mask(
    points: &[ControlPoint],
    regions: &[PartRegion],
    barriers: &[Barrier],
    canvas: (u32, u32),
    policy: BlendPolicy,
) -> DeformResult<(DisplacementMap, MovementMask)> {
    let map = build_displacement_map(points, regions, barriers, canvas, policy)?;
    let mask = movement_mask(&map)?;
    Ok((map, mask))
}

/// Derive the movement mask from a finished displacement map
///
/// Scatter pass over all output pixels: each displaced pixel marks its
/// source location with the displacement magnitude, keeping the maximum
/// when several outputs share a source. The result is normalized.
pub fn movement_mask(map: &DisplacementMap) -> DeformResult<MovementMask> {
    let (width, height) = map.dimensions();
    let mut mask = MovementMask::new(width, height)?;

    for y in 0..height {
        for x in 0..width {
            let (src_x, src_y) = map.source(x, y);
            let dx = src_x - x as f32;
            let dy = src_y - y as f32;
            let mag = (dx * dx + dy * dy).sqrt();
            if mag <= MASK_MIN_DISPLACEMENT {
                continue;
            }

            let mx = src_x.round();
            let my = src_y.round();
            if mx < 0.0 || my < 0.0 || mx >= width as f32 || my >= height as f32 {
                continue;
            }
            let (mx, my) = (mx as u32, my as u32);
            if mag > mask.get(mx, my) {
                mask.set(mx, my, mag);
            }
        }
    }

    mask.normalize();
    Ok(mask)
}

/// Index control points by adjustable feature
fn group_by_feature(points: &[ControlPoint]) -> [Vec<&ControlPoint>; 4] {
    let mut by_feature: [Vec<&ControlPoint>; 4] = Default::default();
    for cp in points {
        if let Some(i) = cp.feature.adjustable_index() {
            by_feature[i].push(cp);
        }
    }
    by_feature
}

/// Combined backward displacement at one pixel, or `None` when untouched
fn pixel_displacement(
    p: Point,
    regions: &[PartRegion],
    barriers: &[Barrier],
    by_feature: &[Vec<&ControlPoint>; 4],
    policy: BlendPolicy,
) -> Option<Point> {
    let mut acc = Point::new(0.0, 0.0);
    let mut acc_strength = 0.0f32;
    let mut best = Point::new(0.0, 0.0);
    let mut best_strength = 0.0f32;
    let mut hit = false;

    for region in regions {
        if !region.contains(p) {
            continue;
        }
        let strength = zone_strength(p, region);
        if strength <= 0.0 {
            continue;
        }
        let Some(i) = region.feature.adjustable_index() else {
            continue;
        };
        let Some(raw) = feature_displacement(p, &by_feature[i]) else {
            continue;
        };

        let clamped = clamp_magnitude(raw, CLAMP_RATIO * region.influence_radius);
        let damping = barrier_damping(p, region.feature, barriers);
        let candidate = clamped.scaled(strength * damping, strength * damping);

        hit = true;
        acc.x += strength * candidate.x;
        acc.y += strength * candidate.y;
        acc_strength += strength;
        if strength > best_strength {
            best_strength = strength;
            best = candidate;
        }
    }

    if !hit {
        return None;
    }
    Some(match policy {
        BlendPolicy::Dominant => best,
        BlendPolicy::Weighted => acc.scaled(1.0 / acc_strength, 1.0 / acc_strength),
    })
}

/// Zone falloff for a pixel inside a region: full strength in the core
/// zone, linear fade to zero at the gradient zone edge
fn zone_strength(p: Point, region: &PartRegion) -> f32 {
    let profile = FeatureProfile::of(region.feature);
    let d = p.distance(region.center);
    let core = profile.core_zone_ratio * region.influence_radius;
    let edge = profile.gradient_zone_ratio * region.influence_radius;

    if d <= core {
        1.0
    } else if d >= edge {
        0.0
    } else {
        1.0 - (d - core) / (edge - core)
    }
}

/// Inverse-distance-weighted average of `original - target` over one
/// feature's control points, or `None` when no point covers the pixel
fn feature_displacement(p: Point, points: &[&ControlPoint]) -> Option<Point> {
    let mut total = 0.0f32;
    let mut disp = Point::new(0.0, 0.0);

    for cp in points {
        let d = p.distance(cp.target);
        if d > cp.influence_radius {
            continue;
        }
        let w = cp.weight / (d + IDW_EPS).powf(IDW_ALPHA);
        disp.x += w * (cp.original.x - cp.target.x);
        disp.y += w * (cp.original.y - cp.target.y);
        total += w;
    }

    if total <= 0.0 {
        return None;
    }
    Some(disp.scaled(1.0 / total, 1.0 / total))
}

/// Product of barrier damping factors for barriers near the pixel
fn barrier_damping(p: Point, feature: FeatureId, barriers: &[Barrier]) -> f32 {
    let mut factor = 1.0f32;
    for barrier in barriers {
        if !barrier.affects(feature) {
            continue;
        }
        let d = distance_to_segment(p, barrier.line[0], barrier.line[1]);
        if d < barrier.radius {
            factor *= (1.0 - (1.0 - d / barrier.radius) * barrier.strength).max(0.0);
        }
    }
    factor
}

/// Cap a displacement vector's magnitude, preserving its direction
fn clamp_magnitude(v: Point, max: f32) -> Point {
    let mag = v.magnitude();
    if mag <= max || mag <= 0.0 {
        v
    } else {
        let s = max / mag;
        v.scaled(s, s)
    }
}
