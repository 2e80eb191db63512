//! Facewarp - Geometric face-feature deformation for Rust
//!
//! A pure geometric deformation engine: given a pixel buffer, detected
//! facial landmarks, and per-feature adjustment parameters, it produces a
//! warped pixel buffer plus the displacement map and diagnostics that
//! describe the warp.
//!
//! # Overview
//!
//! The pipeline has five stages, each usable on its own:
//!
//! - Control point generation ([`generate_control_points`])
//! - Part segmentation with inter-feature barriers ([`segment_parts`])
//! - Displacement solvers: thin-plate spline ([`TpsParams`]), moving least
//!   squares ([`mls_transform`]), or the independent per-region engine
//!   ([`build_displacement_map`])
//! - Bilinear resampling with optional inpainting ([`resample`])
//! - The end-to-end entry point ([`warp_face`])
//!
//! Face detection, image I/O, and rendering are out of scope; the engine
//! works on in-memory buffers only.
//!
//! # Example
//!
//! ```
//! use facewarp::{FaceLandmarks, FaceParams, Point, Raster, warp_face_default};
//!
//! let src = Raster::new(200, 200).unwrap();
//! let mut landmarks = FaceLandmarks::new();
//! landmarks.left_eye = (0..6)
//!     .map(|k| {
//!         let t = (k as f32) * std::f32::consts::TAU / 6.0;
//!         Point::new(70.0 + 10.0 * t.cos(), 80.0 + 5.0 * t.sin())
//!     })
//!     .collect();
//!
//! let mut params = FaceParams::default();
//! params.left_eye.size = 1.3;
//!
//! let output = warp_face_default(&src, &landmarks, &params).unwrap();
//! assert_eq!(output.raster.dimensions(), (200, 200));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use facewarp_core::{
    BoundingBox, DisplacementMap, Error, EyeParams, FaceLandmarks, FaceParams, FeatureId,
    FeatureProfile, Mat2, MouthNoseParams, MovementMask, Point, Raster, Result, centroid, color,
    distance_to_segment,
};

// Re-export the deformation engine surface
pub use facewarp_deform::{
    AnchorPolicy, Barrier, BlendPolicy, ControlPoint, DeformError, DeformResult, MlsConfig,
    PartRegion, TpsAffine, TpsConfig, TpsParams, WarpDiagnostics, WarpOptions, WarpOutput,
    WarpStrategy, build_displacement_map, build_displacement_map_with_mask,
    generate_control_points, max_influence_radius, min_influence_radius, mls_transform,
    mls_transform_backward, movement_mask, resample, resample_with_mask, segment_parts, warp_face,
    warp_face_default,
};

// Also expose the crates as modules for qualified access
pub use facewarp_deform as deform;
