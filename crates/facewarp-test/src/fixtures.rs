//! Synthetic test fixtures
//!
//! Deterministic rasters and landmark sets shared by the regression tests.
//! No file I/O: fixtures are generated, so tests need no data directory.

use facewarp_core::{FaceLandmarks, Point, Raster, color};

/// Deterministic color gradient raster, fully opaque
pub fn gradient_raster(width: u32, height: u32) -> Raster {
    let mut raster = Raster::new(width, height).expect("nonzero fixture dimensions");
    for y in 0..height {
        for x in 0..width {
            let px = color::compose_rgba(
                ((x * 7) % 256) as u8,
                ((y * 11) % 256) as u8,
                ((x + y) % 256) as u8,
                255,
            );
            raster.set_pixel_unchecked(x, y, px);
        }
    }
    raster
}

/// Points on an axis-aligned ellipse, counterclockwise from the +x axis
pub fn ellipse_points(center: Point, rx: f32, ry: f32, count: usize) -> Vec<Point> {
    (0..count)
        .map(|k| {
            let t = (k as f32) * std::f32::consts::TAU / (count as f32);
            Point::new(center.x + rx * t.cos(), center.y + ry * t.sin())
        })
        .collect()
}

/// A plausible full landmark set for a face centered in a 200x200 canvas
pub fn synthetic_landmarks() -> FaceLandmarks {
    let mut lm = FaceLandmarks::new();
    lm.left_eye = ellipse_points(Point::new(70.0, 80.0), 12.0, 6.0, 6);
    lm.right_eye = ellipse_points(Point::new(130.0, 80.0), 12.0, 6.0, 6);
    lm.nose = vec![
        Point::new(92.0, 105.0),
        Point::new(108.0, 105.0),
        Point::new(100.0, 95.0),
        Point::new(100.0, 115.0),
    ];
    lm.mouth = ellipse_points(Point::new(100.0, 145.0), 20.0, 8.0, 8);
    lm.jawline = vec![
        Point::new(40.0, 90.0),
        Point::new(50.0, 140.0),
        Point::new(75.0, 175.0),
        Point::new(100.0, 185.0),
        Point::new(125.0, 175.0),
        Point::new(150.0, 140.0),
        Point::new(160.0, 90.0),
    ];
    lm
}

/// A single isolated eye, for scale-exactness scenarios
pub fn single_eye_landmarks(center: Point) -> FaceLandmarks {
    let mut lm = FaceLandmarks::new();
    lm.left_eye = ellipse_points(center, 10.0, 5.0, 6);
    lm
}
