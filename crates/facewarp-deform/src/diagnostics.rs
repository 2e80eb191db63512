//! Per-invocation warp diagnostics
//!
//! A single summary produced after the displacement map is built, cheap
//! enough to compute unconditionally. Nothing here runs inside the
//! per-pixel loops.

use crate::control::ControlPoint;
use facewarp_core::{DisplacementMap, FeatureId};

/// Summary statistics for one warp invocation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WarpDiagnostics {
    /// Control point count per adjustable feature, indexed by
    /// `FeatureId::adjustable_index`
    pub control_points_per_feature: [usize; 4],
    /// Fraction of output pixels whose source coordinate falls outside the
    /// valid sampling range
    pub out_of_bounds_fraction: f32,
    /// Fraction of output pixels displaced farther than the configured
    /// threshold
    pub extreme_displacement_fraction: f32,
}

impl WarpDiagnostics {
    /// Collect diagnostics from a control point set and a finished map
    pub fn collect(
        points: &[ControlPoint],
        map: &DisplacementMap,
        extreme_threshold: f32,
    ) -> Self {
        let mut per_feature = [0usize; 4];
        for cp in points {
            if let Some(i) = cp.feature.adjustable_index() {
                per_feature[i] += 1;
            }
        }

        let (width, height) = map.dimensions();
        let max_x = (width - 1) as f32;
        let max_y = (height - 1) as f32;
        let mut out_of_bounds = 0usize;
        let mut extreme = 0usize;

        for y in 0..height {
            for x in 0..width {
                let (sx, sy) = map.source(x, y);
                if !(0.0..=max_x).contains(&sx) || !(0.0..=max_y).contains(&sy) {
                    out_of_bounds += 1;
                }
                let dx = sx - x as f32;
                let dy = sy - y as f32;
                if (dx * dx + dy * dy).sqrt() > extreme_threshold {
                    extreme += 1;
                }
            }
        }

        let total = (width as usize * height as usize) as f32;
        Self {
            control_points_per_feature: per_feature,
            out_of_bounds_fraction: out_of_bounds as f32 / total,
            extreme_displacement_fraction: extreme as f32 / total,
        }
    }

    /// Control point count for one feature
    pub fn control_points(&self, feature: FeatureId) -> usize {
        feature
            .adjustable_index()
            .map(|i| self.control_points_per_feature[i])
            .unwrap_or(0)
    }
}
