//! facewarp-core - Basic data structures for face warping
//!
//! This crate provides the fundamental data structures used throughout
//! the facewarp library:
//!
//! - [`Point`] / [`Mat2`] / [`BoundingBox`] - Geometry primitives
//! - [`Raster`] - RGBA pixel buffer (packed `0xRRGGBBAA` words)
//! - [`DisplacementMap`] / [`MovementMask`] - Dense backward mapping and
//!   vacated-region mask
//! - [`FaceLandmarks`] / [`FaceParams`] - Detected landmarks and per-feature
//!   adjustment parameters
//! - [`FeatureProfile`] - Per-feature tuning table
//!
//! The deformation algorithms themselves live in `facewarp-deform`.

pub mod dispmap;
pub mod error;
pub mod geom;
pub mod landmarks;
pub mod raster;

pub use dispmap::{DisplacementMap, MovementMask};
pub use error::{Error, Result};
pub use geom::{BoundingBox, Mat2, Point, centroid, distance_to_segment};
pub use landmarks::{
    EyeParams, FaceLandmarks, FaceParams, FeatureId, FeatureProfile, MouthNoseParams,
};
pub use raster::{Raster, color};
