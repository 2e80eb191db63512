//! facewarp-deform - Geometric deformation engine
//!
//! This crate implements the warping algorithms of the facewarp library:
//!
//! - [`control`] - Control point generation from landmarks and parameters
//! - [`segment`] - Per-feature influence regions and inter-feature barriers
//! - [`tps`] - Global thin-plate spline solver
//! - [`mls`] - Local moving least squares solver
//! - [`engine`] - Independent per-region deformation with barrier damping
//! - [`resample`] - Bilinear pixel resampling with optional inpainting
//! - [`pipeline`] - End-to-end [`warp_face`] entry point
//! - [`diagnostics`] - Per-invocation summary statistics
//!
//! Data structures (rasters, displacement maps, landmarks) come from
//! `facewarp-core`.

pub mod control;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod mls;
pub mod pipeline;
pub mod resample;
pub mod segment;
pub mod tps;

pub use control::{AnchorPolicy, ControlPoint, generate_control_points};
pub use diagnostics::WarpDiagnostics;
pub use engine::{
    BlendPolicy, build_displacement_map, build_displacement_map_with_mask, movement_mask,
};
pub use error::{DeformError, DeformResult};
pub use mls::{MlsConfig, mls_transform, mls_transform_backward};
pub use pipeline::{WarpOptions, WarpOutput, WarpStrategy, warp_face, warp_face_default};
pub use resample::{resample, resample_with_mask};
pub use segment::{
    Barrier, PartRegion, max_influence_radius, min_influence_radius, segment_parts,
};
pub use tps::{TpsAffine, TpsConfig, TpsParams};
