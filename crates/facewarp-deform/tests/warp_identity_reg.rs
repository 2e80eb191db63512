//! Identity warp regression test
//!
//! Identity parameters must produce output byte-identical to the input
//! under every strategy, with an identity displacement map and zero
//! control points. Landmarks too sparse to form control points degrade
//! the same way.

use facewarp_core::{FaceParams, Point};
use facewarp_deform::{
    BlendPolicy, MlsConfig, TpsConfig, WarpOptions, WarpStrategy, warp_face,
};
use facewarp_test::{RegParams, fixtures};

#[test]
fn warp_identity_reg() {
    let mut rp = RegParams::new("warp_identity");

    let src = fixtures::gradient_raster(200, 200);
    let landmarks = fixtures::synthetic_landmarks();
    let params = FaceParams::default();

    for strategy in [
        WarpStrategy::Independent(BlendPolicy::Weighted),
        WarpStrategy::Independent(BlendPolicy::Dominant),
        WarpStrategy::Tps(TpsConfig::default()),
        WarpStrategy::Mls(MlsConfig::default()),
    ] {
        let options = WarpOptions {
            strategy,
            ..WarpOptions::default()
        };
        let out = warp_face(&src, &landmarks, &params, &options).expect("identity warp");

        rp.compare_rasters(&src, &out.raster);
        rp.compare_bool(true, out.displacement.is_identity(0.0), "identity map");
        rp.compare_values(
            0.0,
            out.diagnostics
                .control_points_per_feature
                .iter()
                .sum::<usize>() as f64,
            0.0,
        );
    }

    assert!(rp.cleanup());
}

#[test]
fn warp_sparse_landmarks_reg() {
    let mut rp = RegParams::new("warp_sparse_landmarks");

    let src = fixtures::gradient_raster(100, 100);
    // Single-point groups can't form control points even with parameters set.
    let mut landmarks = facewarp_core::FaceLandmarks::new();
    landmarks.left_eye = vec![Point::new(50.0, 50.0)];
    landmarks.nose = vec![Point::new(50.0, 70.0)];

    let mut params = FaceParams::default();
    params.left_eye.size = 2.0;
    params.nose.width = 1.5;

    let out = warp_face(&src, &landmarks, &params, &WarpOptions::default())
        .expect("sparse landmark warp");

    rp.compare_rasters(&src, &out.raster);
    rp.compare_bool(true, out.displacement.is_identity(0.0), "identity map");

    assert!(rp.cleanup());
}
