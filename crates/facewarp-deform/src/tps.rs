//! Thin-plate spline solver
//!
//! Global smooth interpolation built from the radial kernel
//! `U(r) = r^2 ln(r)` plus an affine term. Solving for a control point set
//! means building an `(n+3) x (n+3)` linear system — an `n x n` kernel
//! block with the regularization on its diagonal, bordered by the degree-1
//! polynomial constraint `[1, x, y]` — and solving it independently for the
//! x and y target vectors with Gauss-Jordan elimination under partial
//! pivoting.
//!
//! Degenerate inputs (fewer than 3 points, collinear or coincident sites)
//! never produce a partial solution: the solver falls back to the identity
//! affine with zero kernel weights.

use crate::control::ControlPoint;
use facewarp_core::Point;

/// Pivot magnitudes below this are treated as zero
const PIVOT_EPS: f64 = 1e-10;

/// Tuning knobs for the thin-plate solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TpsConfig {
    /// Value added to the kernel diagonal; relaxes exact interpolation in
    /// favor of smoothness and conditioning
    pub regularization: f32,
    /// Fraction in [0, 1] by which the bending (kernel) part is suppressed;
    /// 1.0 leaves only the affine fit
    pub local_rigidity: f32,
}

impl Default for TpsConfig {
    fn default() -> Self {
        Self {
            regularization: 1e-4,
            local_rigidity: 0.0,
        }
    }
}

/// Affine part of a solved thin-plate spline
///
/// ```text
/// x' = a*x + b*y + tx
/// y' = c*x + d*y + ty
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TpsAffine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl TpsAffine {
    /// The identity transform
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }
}

/// A solved thin-plate spline, evaluable at any query point
#[derive(Debug, Clone)]
pub struct TpsParams {
    /// Affine part
    pub affine: TpsAffine,
    /// Kernel weight per site for the x output
    pub weights_x: Vec<f32>,
    /// Kernel weight per site for the y output
    pub weights_y: Vec<f32>,
    /// Interpolation sites (source positions of the correspondence)
    sites: Vec<Point>,
    /// Scale applied to the kernel sum when evaluating
    kernel_scale: f32,
}

impl TpsParams {
    /// Fit a spline mapping `sources[i]` to `targets[i]`
    ///
    /// Fewer than 3 correspondences, mismatched slice lengths, or a
    /// singular system all yield the identity fallback.
    pub fn fit(sources: &[Point], targets: &[Point], config: &TpsConfig) -> Self {
        let n = sources.len();
        if n < 3 || targets.len() != n {
            return Self::identity_fallback(sources, config);
        }

        let size = n + 3;
        // Augmented system: coefficient block plus both right-hand sides.
        let mut m = vec![vec![0.0f64; size + 2]; size];

        for i in 0..n {
            for j in 0..n {
                m[i][j] = if i == j {
                    config.regularization as f64
                } else {
                    kernel(sources[i].distance(sources[j]) as f64)
                };
            }
            let (x, y) = (sources[i].x as f64, sources[i].y as f64);
            m[i][n] = 1.0;
            m[i][n + 1] = x;
            m[i][n + 2] = y;
            m[n][i] = 1.0;
            m[n + 1][i] = x;
            m[n + 2][i] = y;

            m[i][size] = targets[i].x as f64;
            m[i][size + 1] = targets[i].y as f64;
        }

        let Some(solution) = gauss_jordan(&mut m, size) else {
            return Self::identity_fallback(sources, config);
        };

        let mut weights_x = Vec::with_capacity(n);
        let mut weights_y = Vec::with_capacity(n);
        for row in solution.iter().take(n) {
            weights_x.push(row.0 as f32);
            weights_y.push(row.1 as f32);
        }

        let affine = TpsAffine {
            tx: solution[n].0 as f32,
            a: solution[n + 1].0 as f32,
            b: solution[n + 2].0 as f32,
            ty: solution[n].1 as f32,
            c: solution[n + 1].1 as f32,
            d: solution[n + 2].1 as f32,
        };

        Self {
            affine,
            weights_x,
            weights_y,
            sites: sources.to_vec(),
            kernel_scale: 1.0 - config.local_rigidity.clamp(0.0, 1.0),
        }
    }

    /// Fit the forward map `original -> target` of a control point set
    pub fn fit_control_points(points: &[ControlPoint], config: &TpsConfig) -> Self {
        let sources: Vec<Point> = points.iter().map(|cp| cp.original).collect();
        let targets: Vec<Point> = points.iter().map(|cp| cp.target).collect();
        Self::fit(&sources, &targets, config)
    }

    /// Fit the backward map `target -> original`, used to fill a
    /// backward-sampling displacement map
    pub fn fit_backward(points: &[ControlPoint], config: &TpsConfig) -> Self {
        let sources: Vec<Point> = points.iter().map(|cp| cp.target).collect();
        let targets: Vec<Point> = points.iter().map(|cp| cp.original).collect();
        Self::fit(&sources, &targets, config)
    }

    /// Evaluate the spline at a query point
    pub fn evaluate(&self, q: Point) -> Point {
        let mut x = self.affine.a * q.x + self.affine.b * q.y + self.affine.tx;
        let mut y = self.affine.c * q.x + self.affine.d * q.y + self.affine.ty;

        if self.kernel_scale > 0.0 && !self.sites.is_empty() {
            let mut kx = 0.0f32;
            let mut ky = 0.0f32;
            for (i, site) in self.sites.iter().enumerate() {
                let u = kernel(q.distance(*site) as f64) as f32;
                kx += self.weights_x[i] * u;
                ky += self.weights_y[i] * u;
            }
            x += self.kernel_scale * kx;
            y += self.kernel_scale * ky;
        }

        Point::new(x, y)
    }

    /// The interpolation sites this spline was fitted on
    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    /// Identity affine with zero weights; the documented degenerate fallback
    fn identity_fallback(sources: &[Point], config: &TpsConfig) -> Self {
        Self {
            affine: TpsAffine::identity(),
            weights_x: vec![0.0; sources.len()],
            weights_y: vec![0.0; sources.len()],
            sites: sources.to_vec(),
            kernel_scale: 1.0 - config.local_rigidity.clamp(0.0, 1.0),
        }
    }
}

/// The thin-plate kernel `U(r) = r^2 ln(r)`, with `U(0) = 0`
#[inline]
fn kernel(r: f64) -> f64 {
    if r < 1e-10 { 0.0 } else { r * r * r.ln() }
}

/// Gauss-Jordan elimination with partial pivoting on an augmented matrix
///
/// `m` holds `size` rows of `size + 2` columns: the coefficient matrix plus
/// two right-hand-side columns (x and y targets), solved simultaneously.
/// Returns one `(x, y)` solution pair per row, or `None` when a pivot
/// vanishes (singular system).
fn gauss_jordan(m: &mut [Vec<f64>], size: usize) -> Option<Vec<(f64, f64)>> {
    for col in 0..size {
        // Partial pivoting: bring the largest remaining magnitude up.
        let mut pivot_row = col;
        let mut pivot_mag = m[col][col].abs();
        for (row, candidate) in m.iter().enumerate().skip(col + 1) {
            let mag = candidate[col].abs();
            if mag > pivot_mag {
                pivot_row = row;
                pivot_mag = mag;
            }
        }
        if pivot_mag < PIVOT_EPS {
            return None;
        }
        m.swap(col, pivot_row);

        let pivot = m[col][col];
        for v in m[col].iter_mut() {
            *v /= pivot;
        }

        for row in 0..size {
            if row == col {
                continue;
            }
            let factor = m[row][col];
            if factor == 0.0 {
                continue;
            }
            let (pivot_row_data, target_row) = if row < col {
                let (head, tail) = m.split_at_mut(col);
                (&tail[0], &mut head[row])
            } else {
                let (head, tail) = m.split_at_mut(row);
                (&head[col], &mut tail[0])
            };
            for (t, p) in target_row.iter_mut().zip(pivot_row_data.iter()) {
                *t -= factor * p;
            }
        }
    }

    Some(
        m.iter()
            .take(size)
            .map(|row| (row[size], row[size + 1]))
            .collect(),
    )
}
