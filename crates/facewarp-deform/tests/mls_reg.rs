//! Moving least squares regression test
//!
//! Covers the saturation behavior at a coincident query, the optional
//! influence radius cutoff, and local deformation: queries close to a
//! moved control point follow it more strongly than distant queries.

use facewarp_core::{FeatureId, Point};
use facewarp_deform::{ControlPoint, MlsConfig, mls_transform};
use facewarp_test::RegParams;

fn cp(original: Point, target: Point) -> ControlPoint {
    ControlPoint {
        original,
        target,
        weight: 1.0,
        feature: FeatureId::Mouth,
        influence_radius: 100.0,
    }
}

#[test]
fn mls_saturation_reg() {
    let mut rp = RegParams::new("mls_saturation");

    let points = vec![
        cp(Point::new(50.0, 50.0), Point::new(58.0, 50.0)),
        cp(Point::new(0.0, 0.0), Point::new(0.0, 0.0)),
        cp(Point::new(100.0, 0.0), Point::new(100.0, 0.0)),
        cp(Point::new(0.0, 100.0), Point::new(0.0, 100.0)),
    ];

    // Query exactly on the moved point: the saturated weight pins the
    // result to its target.
    let r = mls_transform(Point::new(50.0, 50.0), &points, &MlsConfig::default());
    rp.compare_points(Point::new(58.0, 50.0), r, 0.05);

    // Pinned points map to themselves.
    let r = mls_transform(Point::new(0.0, 0.0), &points, &MlsConfig::default());
    rp.compare_points(Point::new(0.0, 0.0), r, 0.05);

    assert!(rp.cleanup());
}

#[test]
fn mls_locality_reg() {
    let mut rp = RegParams::new("mls_locality");

    let points = vec![
        cp(Point::new(50.0, 50.0), Point::new(60.0, 50.0)),
        cp(Point::new(0.0, 0.0), Point::new(0.0, 0.0)),
        cp(Point::new(100.0, 0.0), Point::new(100.0, 0.0)),
        cp(Point::new(0.0, 100.0), Point::new(0.0, 100.0)),
        cp(Point::new(100.0, 100.0), Point::new(100.0, 100.0)),
    ];
    let config = MlsConfig::default();

    // Deformation decays with distance from the moved point.
    let near = mls_transform(Point::new(52.0, 50.0), &points, &config);
    let far = mls_transform(Point::new(90.0, 95.0), &points, &config);
    let near_shift = (near.x - 52.0).abs();
    let far_shift = (far.x - 90.0).abs();
    rp.compare_bool(true, near_shift > far_shift, "deformation decays");
    rp.compare_bool(true, near_shift > 1.0, "near query follows the move");

    assert!(rp.cleanup());
}

#[test]
fn mls_radius_cutoff_reg() {
    let mut rp = RegParams::new("mls_radius_cutoff");

    let points = vec![cp(Point::new(200.0, 200.0), Point::new(220.0, 200.0))];
    let config = MlsConfig {
        influence_radius: Some(50.0),
        ..MlsConfig::default()
    };

    // Every control point out of range: the query is unchanged.
    let q = Point::new(0.0, 0.0);
    rp.compare_points(q, mls_transform(q, &points, &config), 0.0);

    // In range, the single-point fit degenerates to the point's target.
    let q = Point::new(195.0, 200.0);
    let r = mls_transform(q, &points, &config);
    rp.compare_points(Point::new(220.0, 200.0), r, 0.05);

    assert!(rp.cleanup());
}
