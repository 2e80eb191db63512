//! Regression test parameters and operations

use facewarp_core::{Point, Raster};

/// Regression test parameters
///
/// Tracks the state of one regression test: the test name, the running
/// comparison index, and the recorded failures.
pub struct RegParams {
    /// Name of the test (e.g., "warp_identity")
    pub test_name: String,
    /// Current comparison index (incremented before each comparison)
    index: usize,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "warp_identity")
    pub fn new(test_name: &str) -> Self {
        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current comparison index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            eprintln!("{}", msg);
            self.failures.push(msg);
            self.success = false;
            false
        } else {
            true
        }
    }

    /// Compare two points within a per-component tolerance
    pub fn compare_points(&mut self, expected: Point, actual: Point, delta: f32) -> bool {
        self.index += 1;

        if (expected.x - actual.x).abs() > delta || (expected.y - actual.y).abs() > delta {
            let msg = format!(
                "Failure in {}_reg: point comparison for index {}\n\
                 expected = ({}, {}), actual = ({}, {}), delta = {}",
                self.test_name, self.index, expected.x, expected.y, actual.x, actual.y, delta
            );
            eprintln!("{}", msg);
            self.failures.push(msg);
            self.success = false;
            false
        } else {
            true
        }
    }

    /// Compare two rasters for exact pixel equality
    ///
    /// # Returns
    ///
    /// `true` if rasters are identical, `false` otherwise.
    pub fn compare_rasters(&mut self, raster1: &Raster, raster2: &Raster) -> bool {
        self.index += 1;

        if raster1.dimensions() != raster2.dimensions() {
            let msg = format!(
                "Failure in {}_reg: raster comparison for index {} - dimension mismatch",
                self.test_name, self.index
            );
            eprintln!("{}", msg);
            self.failures.push(msg);
            self.success = false;
            return false;
        }

        let (width, height) = raster1.dimensions();
        for y in 0..height {
            for x in 0..width {
                let p1 = raster1.get_pixel_unchecked(x, y);
                let p2 = raster2.get_pixel_unchecked(x, y);
                if p1 != p2 {
                    let msg = format!(
                        "Failure in {}_reg: raster comparison for index {} - pixel mismatch at ({}, {})",
                        self.test_name, self.index, x, y
                    );
                    eprintln!("{}", msg);
                    self.failures.push(msg);
                    self.success = false;
                    return false;
                }
            }
        }

        true
    }

    /// Assert a boolean condition
    pub fn compare_bool(&mut self, expected: bool, actual: bool, label: &str) -> bool {
        self.index += 1;

        if expected != actual {
            let msg = format!(
                "Failure in {}_reg: condition '{}' for index {}: expected {}, got {}",
                self.test_name, label, self.index, expected, actual
            );
            eprintln!("{}", msg);
            self.failures.push(msg);
            self.success = false;
            false
        } else {
            true
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all comparisons passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all comparisons have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
