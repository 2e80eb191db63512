//! Eye scaling regression test
//!
//! The canonical enlargement scenario: a single 6-point eye centered at
//! (100, 100) scaled by 1.5. Control point targets must sit at exactly
//! 1.5x their original offset from the centroid, the warp must move pixels
//! near the eye, and pixels far outside the influence region must be
//! untouched.

use facewarp_core::{FaceParams, Point};
use facewarp_deform::{AnchorPolicy, WarpOptions, generate_control_points, warp_face};
use facewarp_test::{RegParams, fixtures};

#[test]
fn eye_scale_reg() {
    let mut rp = RegParams::new("eye_scale");

    let center = Point::new(100.0, 100.0);
    let landmarks = fixtures::single_eye_landmarks(center);
    let mut params = FaceParams::default();
    params.left_eye.size = 1.5;

    // Control point exactness: every target offset is 1.5x the original.
    let points = generate_control_points(&landmarks, &params, 1.0, AnchorPolicy::ChangedOnly);
    rp.compare_bool(false, points.is_empty(), "control points generated");
    for cp in &points {
        let original_offset = cp.original.distance(center);
        let target_offset = cp.target.distance(center);
        rp.compare_values(
            (1.5 * original_offset) as f64,
            target_offset as f64,
            1e-3,
        );
    }

    // End-to-end: pixels move near the eye, stay put far away.
    let src = fixtures::gradient_raster(200, 200);
    let out = warp_face(&src, &landmarks, &params, &WarpOptions::default()).expect("eye warp");

    rp.compare_bool(false, out.displacement.is_identity(1e-3), "map deformed");
    let (sx, sy) = out.displacement.source(10, 10);
    rp.compare_points(Point::new(10.0, 10.0), Point::new(sx, sy), 0.0);

    // A pixel between the eye boundary and its new, larger extent samples
    // from closer to the center (backward map pulls inward).
    let (sx, _) = out.displacement.source(108, 100);
    rp.compare_bool(true, sx < 108.0, "backward pull toward center");

    assert!(rp.cleanup());
}
