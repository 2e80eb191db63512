//! Part segmentation
//!
//! Partitions the canvas into per-feature influence regions and generates
//! barrier lines between anatomically adjacent features. Region radii adapt
//! to the feature's landmark extent but are clamped to canvas-derived
//! bounds; barriers damp displacement near a neighbor so one feature's edit
//! cannot leak into the next.

use facewarp_core::{BoundingBox, FaceLandmarks, FeatureId, FeatureProfile, Point, centroid};

/// Canvas-relative lower bound on the influence radius (fraction of the
/// smaller canvas dimension), with an absolute floor of 15 px
const MIN_RADIUS_RATIO: f32 = 0.02;
const MIN_RADIUS_FLOOR: f32 = 15.0;
/// Canvas-relative upper bound on the influence radius, with an absolute
/// ceiling of 100 px
const MAX_RADIUS_RATIO: f32 = 0.15;
const MAX_RADIUS_CEIL: f32 = 100.0;

/// Barrier strength between adjacent features
const BARRIER_STRENGTH: f32 = 0.8;
/// Barrier damping radius in pixels.
/// Fixed regardless of image resolution; tunable, not resolution-invariant.
const BARRIER_RADIUS: f32 = 25.0;
/// Half-length of an eye-nose barrier segment
const EYE_NOSE_BARRIER_HALFSPAN: f32 = 15.0;
/// Minimum half-length of the nose-mouth barrier segment
const NOSE_MOUTH_BARRIER_MIN_HALFSPAN: f32 = 20.0;

/// Minimum landmark count for a feature to form a region
const MIN_REGION_POINTS: usize = 2;

/// Influence footprint of one feature
#[derive(Debug, Clone)]
pub struct PartRegion {
    /// Feature this region belongs to
    pub feature: FeatureId,
    /// Region center (landmark centroid in pixel space)
    pub center: Point,
    /// Bounding box of the feature's landmarks in pixel space
    pub bounds: BoundingBox,
    /// Maximum distance from `center` at which the feature affects a pixel
    pub influence_radius: f32,
    /// The feature's landmark outline in pixel space
    pub boundary_points: Vec<Point>,
}

impl PartRegion {
    /// Whether a pixel lies inside this region's influence
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.center.distance(p) < self.influence_radius
    }
}

/// A line whose proximity damps displacement for the named features
#[derive(Debug, Clone)]
pub struct Barrier {
    /// Endpoints of the barrier segment
    pub line: [Point; 2],
    /// The two features this barrier separates
    pub affected: [FeatureId; 2],
    /// Damping strength in [0, 1]; 1 fully blocks displacement at the line
    pub strength: f32,
    /// Distance over which the damping falls off
    pub radius: f32,
}

impl Barrier {
    /// Whether this barrier applies to the given feature
    #[inline]
    pub fn affects(&self, feature: FeatureId) -> bool {
        self.affected[0] == feature || self.affected[1] == feature
    }
}

/// The minimum influence radius for a canvas
#[inline]
pub fn min_influence_radius(canvas: (u32, u32)) -> f32 {
    let m = canvas.0.min(canvas.1) as f32;
    MIN_RADIUS_FLOOR.max(MIN_RADIUS_RATIO * m)
}

/// The maximum influence radius for a canvas
#[inline]
pub fn max_influence_radius(canvas: (u32, u32)) -> f32 {
    let m = canvas.0.min(canvas.1) as f32;
    MAX_RADIUS_CEIL.min(MAX_RADIUS_RATIO * m)
}

/// Derive per-feature regions and inter-feature barriers
///
/// # Arguments
/// * `landmarks` - Detected landmark groups in source-image space
/// * `image_scale` - Landmark-space to pixel-space scale factor
/// * `canvas` - Target canvas dimensions (width, height)
///
/// # Returns
/// One region per feature with at least two landmark points, and barriers
/// between each pair of adjacent features that both formed a region.
pub fn segment_parts(
    landmarks: &FaceLandmarks,
    image_scale: f32,
    canvas: (u32, u32),
) -> (Vec<PartRegion>, Vec<Barrier>) {
    let mut regions = Vec::new();

    for feature in FeatureId::ADJUSTABLE {
        if let Some(region) = region_for(landmarks, image_scale, canvas, feature) {
            regions.push(region);
        }
    }

    let barriers = build_barriers(landmarks, image_scale, &regions);
    (regions, barriers)
}

/// Build the region for one feature, or `None` if it has too few landmarks
fn region_for(
    landmarks: &FaceLandmarks,
    image_scale: f32,
    canvas: (u32, u32),
    feature: FeatureId,
) -> Option<PartRegion> {
    let group = landmarks.group(feature);
    if group.len() < MIN_REGION_POINTS {
        return None;
    }

    let scaled: Vec<Point> = group
        .iter()
        .map(|p| p.scaled(image_scale, image_scale))
        .collect();
    let center = centroid(&scaled)?;
    let bounds = BoundingBox::of(&scaled).ok()?;

    let profile = FeatureProfile::of(feature);
    let base_radius = bounds.half_diagonal();
    let min_r = min_influence_radius(canvas);
    let max_r = max_influence_radius(canvas);

    let influence_radius = (base_radius * profile.radius_multiplier)
        .max(min_r)
        .min(max_r)
        .min(profile.max_radius.max(min_r));

    Some(PartRegion {
        feature,
        center,
        bounds,
        influence_radius,
        boundary_points: scaled,
    })
}

/// Build barriers between anatomically adjacent features
fn build_barriers(
    landmarks: &FaceLandmarks,
    image_scale: f32,
    regions: &[PartRegion],
) -> Vec<Barrier> {
    let mut barriers = Vec::new();

    let find = |feature: FeatureId| regions.iter().find(|r| r.feature == feature);

    // Nose <-> mouth: a horizontal line halfway between the nose tip and
    // the upper lip.
    if let (Some(_), Some(mouth)) = (find(FeatureId::Nose), find(FeatureId::Mouth)) {
        let nose_tip = lowest_point(landmarks.group(FeatureId::Nose), image_scale);
        let upper_lip = highest_point(landmarks.group(FeatureId::Mouth), image_scale);
        if let (Some(tip), Some(lip)) = (nose_tip, upper_lip) {
            let mid = Point::new(0.5 * (tip.x + lip.x), 0.5 * (tip.y + lip.y));
            let halfspan = (0.75 * mouth.bounds.width()).max(NOSE_MOUTH_BARRIER_MIN_HALFSPAN);
            barriers.push(Barrier {
                line: [
                    Point::new(mid.x - halfspan, mid.y),
                    Point::new(mid.x + halfspan, mid.y),
                ],
                affected: [FeatureId::Nose, FeatureId::Mouth],
                strength: BARRIER_STRENGTH,
                radius: BARRIER_RADIUS,
            });
        }
    }

    // Each eye <-> nose: the perpendicular bisector of the segment joining
    // the region centers.
    for eye_id in [FeatureId::LeftEye, FeatureId::RightEye] {
        if let (Some(eye), Some(nose)) = (find(eye_id), find(FeatureId::Nose)) {
            if let Some(barrier) = bisector_barrier(eye.center, nose.center, eye_id) {
                barriers.push(barrier);
            }
        }
    }

    barriers
}

/// Perpendicular bisector barrier between two region centers
fn bisector_barrier(a: Point, b: Point, eye_id: FeatureId) -> Option<Barrier> {
    let mid = Point::new(0.5 * (a.x + b.x), 0.5 * (a.y + b.y));
    let dir = b.offset_from(a);
    let len = dir.magnitude();
    if len < 1e-6 {
        return None;
    }

    // Unit perpendicular to the center-connecting segment
    let perp = Point::new(-dir.y / len, dir.x / len);
    Some(Barrier {
        line: [
            Point::new(
                mid.x - perp.x * EYE_NOSE_BARRIER_HALFSPAN,
                mid.y - perp.y * EYE_NOSE_BARRIER_HALFSPAN,
            ),
            Point::new(
                mid.x + perp.x * EYE_NOSE_BARRIER_HALFSPAN,
                mid.y + perp.y * EYE_NOSE_BARRIER_HALFSPAN,
            ),
        ],
        affected: [eye_id, FeatureId::Nose],
        strength: BARRIER_STRENGTH,
        radius: BARRIER_RADIUS,
    })
}

/// The point with the largest y in a group, scaled to pixel space
fn lowest_point(group: &[Point], image_scale: f32) -> Option<Point> {
    group
        .iter()
        .max_by(|a, b| a.y.total_cmp(&b.y))
        .map(|p| p.scaled(image_scale, image_scale))
}

/// The point with the smallest y in a group, scaled to pixel space
fn highest_point(group: &[Point], image_scale: f32) -> Option<Point> {
    group
        .iter()
        .min_by(|a, b| a.y.total_cmp(&b.y))
        .map(|p| p.scaled(image_scale, image_scale))
}
