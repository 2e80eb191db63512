//! Control point generation
//!
//! Turns landmarks plus per-feature parameters into weighted correspondence
//! pairs. Every target is derived deterministically from its original by a
//! scale about the owning feature's centroid plus a gained translation, so
//! the correspondence set always encodes a similarity transform per feature.
//!
//! Eyes get two kinds of synthetic reinforcement on top of their boundary
//! landmarks: a high-weight anchor at the centroid that pins the eye in
//! place, and a ring of points at the estimated iris radius that preserves
//! circular shape under scaling.

use facewarp_core::{BoundingBox, FaceLandmarks, FaceParams, FeatureId, FeatureProfile, Point, centroid};

/// Weight of ordinary boundary control points
const BOUNDARY_WEIGHT: f32 = 1.0;
/// Weight of the eye centroid anchor
const ANCHOR_WEIGHT: f32 = 8.0;
/// Weight of synthetic iris ring points
const IRIS_RING_WEIGHT: f32 = 1.5;
/// Number of synthetic points on the iris ring
const IRIS_RING_POINTS: usize = 8;
/// Iris radius as a fraction of eye width
const IRIS_RADIUS_RATIO: f32 = 0.35;
/// Minimum landmark count for a feature to produce control points
const MIN_FEATURE_POINTS: usize = 2;

/// A correspondence pair defining part of the warp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    /// Location in the source image
    pub original: Point,
    /// Where the original should end up
    pub target: Point,
    /// Relative weight, >= 0
    pub weight: f32,
    /// Feature that owns this correspondence
    pub feature: FeatureId,
    /// Maximum distance at which this point influences a pixel
    pub influence_radius: f32,
}

/// Whether unchanged features still emit anchoring control points
///
/// With `ChangedOnly` a feature whose parameters are identity contributes
/// nothing, and an entirely untouched face yields an empty control point
/// list (the caller then short-circuits to the identity deformation).
/// `AlwaysAnchor` emits identity correspondences for unchanged features as
/// well, which stiffens the global solvers around untouched features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorPolicy {
    /// Only features with non-identity parameters emit control points
    #[default]
    ChangedOnly,
    /// Every feature with enough landmarks emits control points
    AlwaysAnchor,
}

/// Generate control points for all adjustable features
///
/// # Arguments
/// * `landmarks` - Detected landmark groups in source-image space
/// * `params` - Per-feature adjustment parameters
/// * `image_scale` - Landmark-space to pixel-space scale factor
/// * `policy` - Anchoring policy for unchanged features
///
/// # Returns
/// The combined control point list. Features with fewer than two landmark
/// points are skipped; an empty result means the warp is the identity.
pub fn generate_control_points(
    landmarks: &FaceLandmarks,
    params: &FaceParams,
    image_scale: f32,
    policy: AnchorPolicy,
) -> Vec<ControlPoint> {
    let mut points = Vec::new();

    for feature in FeatureId::ADJUSTABLE {
        if policy == AnchorPolicy::ChangedOnly && params.is_feature_identity(feature) {
            continue;
        }
        generate_for_feature(landmarks, params, image_scale, feature, &mut points);
    }

    points
}

/// Generate the control points of one feature into `out`
fn generate_for_feature(
    landmarks: &FaceLandmarks,
    params: &FaceParams,
    image_scale: f32,
    feature: FeatureId,
    out: &mut Vec<ControlPoint>,
) {
    let group = landmarks.group(feature);
    if group.len() < MIN_FEATURE_POINTS {
        return;
    }

    let scaled: Vec<Point> = group
        .iter()
        .map(|p| p.scaled(image_scale, image_scale))
        .collect();

    // Centroid exists: the group has at least two points.
    let Some(center) = centroid(&scaled) else {
        return;
    };
    let Some((sx, sy)) = params.scale(feature) else {
        return;
    };
    let Some(position) = params.position(feature) else {
        return;
    };

    let profile = FeatureProfile::of(feature);
    let new_center = Point::new(
        center.x + position.x * profile.translation_gain,
        center.y + position.y * profile.translation_gain,
    );
    let radius = profile.max_radius;

    for p in &scaled {
        let offset = p.offset_from(center);
        out.push(ControlPoint {
            original: *p,
            target: Point::new(new_center.x + offset.x * sx, new_center.y + offset.y * sy),
            weight: BOUNDARY_WEIGHT,
            feature,
            influence_radius: radius,
        });
    }

    if matches!(feature, FeatureId::LeftEye | FeatureId::RightEye) {
        emit_eye_reinforcement(&scaled, center, new_center, sx, feature, radius, out);
    }
}

/// Emit the centroid anchor and iris ring for one eye
fn emit_eye_reinforcement(
    scaled: &[Point],
    center: Point,
    new_center: Point,
    scale: f32,
    feature: FeatureId,
    radius: f32,
    out: &mut Vec<ControlPoint>,
) {
    // Anchor pins the eye center to its (possibly translated) new position.
    out.push(ControlPoint {
        original: center,
        target: new_center,
        weight: ANCHOR_WEIGHT,
        feature,
        influence_radius: radius,
    });

    let Ok(bounds) = BoundingBox::of(scaled) else {
        return;
    };
    let iris_radius = IRIS_RADIUS_RATIO * bounds.width();
    if iris_radius <= f32::EPSILON {
        return;
    }

    for k in 0..IRIS_RING_POINTS {
        let angle = (k as f32) * std::f32::consts::TAU / (IRIS_RING_POINTS as f32);
        let offset = Point::new(iris_radius * angle.cos(), iris_radius * angle.sin());
        out.push(ControlPoint {
            original: center.translated(offset),
            target: Point::new(
                new_center.x + offset.x * scale,
                new_center.y + offset.y * scale,
            ),
            weight: IRIS_RING_WEIGHT,
            feature,
            influence_radius: radius,
        });
    }
}
