//! Geometry primitives
//!
//! 2D points, 2x2 matrices, centroids, bounding boxes and distance helpers
//! used throughout the deformation pipeline. All coordinates are in
//! image space (x right, y down) with `f32` precision.

use crate::error::{Error, Result};

/// A 2D point with floating-point coordinates
///
/// Used for landmarks, control points and displacement targets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Squared Euclidean distance (avoids the square root)
    #[inline]
    pub fn distance_sq(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Offset of this point from another (self - other)
    #[inline]
    pub fn offset_from(&self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Translate by another point treated as a vector
    #[inline]
    pub fn translated(&self, d: Point) -> Point {
        Point::new(self.x + d.x, self.y + d.y)
    }

    /// Component-wise scale
    #[inline]
    pub fn scaled(&self, sx: f32, sy: f32) -> Point {
        Point::new(self.x * sx, self.y * sy)
    }

    /// Vector magnitude when the point is treated as a displacement
    #[inline]
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// 2x2 matrix with row-major components
///
/// Represents the linear part of a local affine transform:
/// ```text
/// | a  b |
/// | c  d |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mat2 {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Mat2 {
    /// Create a matrix from components
    #[inline]
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    /// The zero matrix
    #[inline]
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// The identity matrix
    #[inline]
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0)
    }

    /// Determinant
    #[inline]
    pub fn det(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Matrix inverse, or `None` when the matrix is numerically singular
    pub fn inverse(&self) -> Option<Mat2> {
        let det = self.det();
        if det.abs() < 1e-10 {
            return None;
        }
        let inv = 1.0 / det;
        Some(Mat2::new(
            self.d * inv,
            -self.b * inv,
            -self.c * inv,
            self.a * inv,
        ))
    }

    /// Matrix product self * other
    pub fn mul(&self, other: Mat2) -> Mat2 {
        Mat2::new(
            self.a * other.a + self.b * other.c,
            self.a * other.b + self.b * other.d,
            self.c * other.a + self.d * other.c,
            self.c * other.b + self.d * other.d,
        )
    }

    /// Apply the matrix to a vector
    #[inline]
    pub fn mul_vec(&self, v: Point) -> Point {
        Point::new(self.a * v.x + self.b * v.y, self.c * v.x + self.d * v.y)
    }
}

/// Axis-aligned bounding box of a point set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner
    pub min: Point,
    /// Maximum corner
    pub max: Point,
}

impl BoundingBox {
    /// Compute the bounding box of a point slice
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` for an empty slice.
    pub fn of(points: &[Point]) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyInput("bounding box of empty point set"));
        }

        let mut min = points[0];
        let mut max = points[0];
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Ok(Self { min, max })
    }

    /// Width of the box
    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the box
    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Box center
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            0.5 * (self.min.x + self.max.x),
            0.5 * (self.min.y + self.max.y),
        )
    }

    /// Half the diagonal length
    #[inline]
    pub fn half_diagonal(&self) -> f32 {
        0.5 * self.min.distance(self.max)
    }
}

/// Centroid (arithmetic mean) of a point set
///
/// Returns `None` for an empty slice.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let mut sx = 0.0f32;
    let mut sy = 0.0f32;
    for p in points {
        sx += p.x;
        sy += p.y;
    }
    let n = points.len() as f32;
    Some(Point::new(sx / n, sy / n))
}

/// Distance from a point to a line segment [a, b]
///
/// Degenerate segments (a == b) fall back to point distance.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let ab = b.offset_from(a);
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq < 1e-12 {
        return p.distance(a);
    }

    let ap = p.offset_from(a);
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * ab.x, a.y + t * ab.y);
    p.distance(proj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_relative_eq!(a.distance(b), 5.0, epsilon = 1e-6);
        assert_relative_eq!(a.distance_sq(b), 25.0, epsilon = 1e-6);
    }

    #[test]
    fn test_centroid() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        let c = centroid(&pts).unwrap();
        assert_relative_eq!(c.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(c.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_centroid_empty() {
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn test_mat2_inverse() {
        let m = Mat2::new(2.0, 1.0, 1.0, 3.0);
        let inv = m.inverse().unwrap();
        let prod = m.mul(inv);
        assert_relative_eq!(prod.a, 1.0, epsilon = 1e-5);
        assert_relative_eq!(prod.b, 0.0, epsilon = 1e-5);
        assert_relative_eq!(prod.c, 0.0, epsilon = 1e-5);
        assert_relative_eq!(prod.d, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_mat2_singular_inverse() {
        // Rank-1 matrix has no inverse
        let m = Mat2::new(1.0, 2.0, 2.0, 4.0);
        assert!(m.inverse().is_none());
    }

    #[test]
    fn test_bounding_box() {
        let pts = [
            Point::new(1.0, 5.0),
            Point::new(4.0, 1.0),
            Point::new(3.0, 3.0),
        ];
        let bb = BoundingBox::of(&pts).unwrap();
        assert_relative_eq!(bb.width(), 3.0, epsilon = 1e-6);
        assert_relative_eq!(bb.height(), 4.0, epsilon = 1e-6);
        assert_relative_eq!(bb.half_diagonal(), 2.5, epsilon = 1e-6);
    }

    #[test]
    fn test_bounding_box_empty() {
        assert!(BoundingBox::of(&[]).is_err());
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        // Perpendicular distance inside the segment span
        assert_relative_eq!(
            distance_to_segment(Point::new(5.0, 3.0), a, b),
            3.0,
            epsilon = 1e-6
        );
        // Beyond the endpoint, distance is to the endpoint itself
        assert_relative_eq!(
            distance_to_segment(Point::new(13.0, 4.0), a, b),
            5.0,
            epsilon = 1e-6
        );
        // Degenerate segment
        assert_relative_eq!(
            distance_to_segment(Point::new(3.0, 4.0), a, a),
            5.0,
            epsilon = 1e-6
        );
    }
}
