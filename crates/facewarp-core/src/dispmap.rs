//! Displacement map and movement mask
//!
//! `DisplacementMap` is the dense backward mapping produced by the
//! deformation solvers: for every output pixel it stores the source
//! coordinate to sample from. The default (no deformation) is the identity
//! map `(x, y) -> (x, y)`.
//!
//! `MovementMask` is a per-pixel intensity plane in `[0, 1]` marking source
//! regions vacated by feature motion, used by the resampler to decide where
//! to inpaint.
//!
//! # Memory Layout
//!
//! Both structures store one `f32` plane per component in row-major order
//! with no padding, the same layout the rest of the pipeline assumes when
//! partitioning rows across worker threads.

use crate::error::{Error, Result};

/// Dense backward mapping from output pixel to source coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacementMap {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Source X coordinate per output pixel (row-major)
    src_x: Vec<f32>,
    /// Source Y coordinate per output pixel (row-major)
    src_y: Vec<f32>,
}

impl DisplacementMap {
    /// Create the identity map `(x, y) -> (x, y)`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn identity(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let size = (width as usize) * (height as usize);
        let mut src_x = Vec::with_capacity(size);
        let mut src_y = Vec::with_capacity(size);
        for y in 0..height {
            for x in 0..width {
                src_x.push(x as f32);
                src_y.push(y as f32);
            }
        }

        Ok(Self {
            width,
            height,
            src_x,
            src_y,
        })
    }

    /// Create a map from raw component planes
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or plane lengths don't
    /// match `width * height`.
    pub fn from_planes(width: u32, height: u32, src_x: Vec<f32>, src_y: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let expected = (width as usize) * (height as usize);
        if src_x.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: src_x.len(),
            });
        }
        if src_y.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: src_y.len(),
            });
        }

        Ok(Self {
            width,
            height,
            src_x,
            src_y,
        })
    }

    /// Map width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Map height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Map dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Source coordinate for output pixel (x, y)
    ///
    /// Callers must guarantee `x < width` and `y < height`.
    #[inline]
    pub fn source(&self, x: u32, y: u32) -> (f32, f32) {
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        (self.src_x[idx], self.src_y[idx])
    }

    /// Set the source coordinate for output pixel (x, y)
    ///
    /// Callers must guarantee `x < width` and `y < height`.
    #[inline]
    pub fn set_source(&mut self, x: u32, y: u32, sx: f32, sy: f32) {
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.src_x[idx] = sx;
        self.src_y[idx] = sy;
    }

    /// Borrow the component planes
    #[inline]
    pub fn planes(&self) -> (&[f32], &[f32]) {
        (&self.src_x, &self.src_y)
    }

    /// Mutably borrow the component planes, for row-partitioned fills
    #[inline]
    pub fn planes_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.src_x, &mut self.src_y)
    }

    /// Check whether every pixel maps to itself within a tolerance
    pub fn is_identity(&self, tol: f32) -> bool {
        for y in 0..self.height {
            for x in 0..self.width {
                let (sx, sy) = self.source(x, y);
                if (sx - x as f32).abs() > tol || (sy - y as f32).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

/// Per-pixel intensity plane in `[0, 1]` marking vacated source regions
#[derive(Debug, Clone, PartialEq)]
pub struct MovementMask {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Intensity data (row-major)
    data: Vec<f32>,
}

impl MovementMask {
    /// Create a mask with all intensities at zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let size = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            data: vec![0.0; size],
        })
    }

    /// Mask width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Intensity at (x, y)
    ///
    /// Callers must guarantee `x < width` and `y < height`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Set the intensity at (x, y)
    ///
    /// Callers must guarantee `x < width` and `y < height`.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        self.data[(y as usize) * (self.width as usize) + (x as usize)] = value;
    }

    /// Borrow the raw intensity data (row-major)
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutably borrow the raw intensity data (row-major)
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Scale all intensities so the maximum is 1.0
    ///
    /// A mask with no nonzero intensity is left unchanged.
    pub fn normalize(&mut self) {
        let max = self.data.iter().cloned().fold(0.0f32, f32::max);
        if max > 0.0 {
            for v in &mut self.data {
                *v /= max;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_map() {
        let map = DisplacementMap::identity(5, 4).unwrap();
        assert_eq!(map.dimensions(), (5, 4));
        assert_eq!(map.source(3, 2), (3.0, 2.0));
        assert!(map.is_identity(0.0));
    }

    #[test]
    fn test_identity_zero_dimension() {
        assert!(DisplacementMap::identity(0, 4).is_err());
        assert!(DisplacementMap::identity(4, 0).is_err());
    }

    #[test]
    fn test_set_source_breaks_identity() {
        let mut map = DisplacementMap::identity(4, 4).unwrap();
        map.set_source(1, 1, 2.5, 3.5);
        assert_eq!(map.source(1, 1), (2.5, 3.5));
        assert!(!map.is_identity(1e-6));
    }

    #[test]
    fn test_from_planes_mismatch() {
        let err = DisplacementMap::from_planes(3, 3, vec![0.0; 9], vec![0.0; 8]);
        assert!(err.is_err());
    }

    #[test]
    fn test_movement_mask_normalize() {
        let mut mask = MovementMask::new(2, 2).unwrap();
        mask.set(0, 0, 4.0);
        mask.set(1, 1, 2.0);
        mask.normalize();
        assert_eq!(mask.get(0, 0), 1.0);
        assert_eq!(mask.get(1, 1), 0.5);
    }

    #[test]
    fn test_movement_mask_normalize_empty() {
        let mut mask = MovementMask::new(2, 2).unwrap();
        mask.normalize();
        assert!(mask.data().iter().all(|&v| v == 0.0));
    }
}
