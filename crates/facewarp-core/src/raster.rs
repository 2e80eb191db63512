//! Raster - RGBA pixel buffer
//!
//! `Raster` is the pixel container consumed and produced by the warp
//! pipeline. Pixels are stored as packed 32-bit `0xRRGGBBAA` words in
//! row-major order with no padding.
//!
//! # Examples
//!
//! ```
//! use facewarp_core::{Raster, color};
//!
//! let mut raster = Raster::new(100, 100).unwrap();
//! raster.set_pixel(10, 20, color::compose_rgba(255, 0, 0, 255)).unwrap();
//! assert_eq!(color::red(raster.get_pixel(10, 20).unwrap()), 255);
//! ```

use crate::error::{Error, Result};

/// Color channel helpers for 32-bit RGBA pixels.
///
/// # Pixel format
///
/// 32-bit pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB).
pub mod color {
    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;
    pub const ALPHA_SHIFT: u32 = 0;

    /// Extract red component from a 32-bit pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a 32-bit pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a 32-bit pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Extract alpha component from a 32-bit pixel.
    #[inline]
    pub fn alpha(pixel: u32) -> u8 {
        ((pixel >> ALPHA_SHIFT) & 0xff) as u8
    }

    /// Compose a 32-bit RGBA pixel.
    #[inline]
    pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
        ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
            | ((a as u32) << ALPHA_SHIFT)
    }

    /// Extract RGBA values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgba(pixel: u32) -> (u8, u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel), alpha(pixel))
    }

    /// Fully transparent black, the "don't guess" fill for out-of-bounds samples.
    pub const TRANSPARENT: u32 = 0;
}

/// RGBA image buffer
///
/// # Memory Layout
///
/// Data is stored in row-major order with no padding. The pixel at (x, y)
/// is at index `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Packed RGBA pixel data (row-major, no padding)
    data: Vec<u32>,
}

impl Raster {
    /// Create a new raster with all pixels fully transparent
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let size = (width as usize) * (height as usize);
        Ok(Raster {
            width,
            height,
            data: vec![color::TRANSPARENT; size],
        })
    }

    /// Create a raster from packed pixel data
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or the data length
    /// doesn't match `width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Raster {
            width,
            height,
            data,
        })
    }

    /// Get the image width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the image dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the pixel value at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<u32> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: (y as usize) * (self.width as usize) + (x as usize),
                len: self.data.len(),
            });
        }
        Ok(self.data[(y as usize) * (self.width as usize) + (x as usize)])
    }

    /// Get the pixel value at (x, y) without bounds checking the arguments
    ///
    /// Callers must guarantee `x < width` and `y < height`.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Set the pixel value at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: (y as usize) * (self.width as usize) + (x as usize),
                len: self.data.len(),
            });
        }
        self.data[(y as usize) * (self.width as usize) + (x as usize)] = value;
        Ok(())
    }

    /// Set the pixel value at (x, y) without bounds checking the arguments
    ///
    /// Callers must guarantee `x < width` and `y < height`.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, value: u32) {
        self.data[(y as usize) * (self.width as usize) + (x as usize)] = value;
    }

    /// Borrow the raw pixel data (row-major)
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Mutably borrow the raw pixel data (row-major)
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Exact pixel-for-pixel equality with another raster
    pub fn equals(&self, other: &Raster) -> bool {
        self.width == other.width && self.height == other.height && self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zero_dimension() {
        assert!(Raster::new(0, 10).is_err());
        assert!(Raster::new(10, 0).is_err());
    }

    #[test]
    fn test_new_transparent() {
        let raster = Raster::new(4, 3).unwrap();
        assert_eq!(raster.dimensions(), (4, 3));
        assert!(raster.data().iter().all(|&p| p == color::TRANSPARENT));
    }

    #[test]
    fn test_from_data_length_mismatch() {
        let err = Raster::from_data(4, 4, vec![0u32; 15]);
        assert!(matches!(
            err,
            Err(Error::BufferSizeMismatch {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn test_get_set_pixel() {
        let mut raster = Raster::new(8, 8).unwrap();
        let px = color::compose_rgba(10, 20, 30, 255);
        raster.set_pixel(3, 5, px).unwrap();
        assert_eq!(raster.get_pixel(3, 5).unwrap(), px);
        assert!(raster.get_pixel(8, 0).is_err());
        assert!(raster.set_pixel(0, 8, 0).is_err());
    }

    #[test]
    fn test_color_roundtrip() {
        let px = color::compose_rgba(1, 2, 3, 4);
        assert_eq!(color::extract_rgba(px), (1, 2, 3, 4));
    }
}
