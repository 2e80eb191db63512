//! Moving least squares solver
//!
//! Local affine interpolation: every query point gets its own weighted
//! affine fit over the control point set, with weights falling off as an
//! inverse power of distance. Unlike the thin-plate spline there is no
//! global solve; each evaluation is independent, which makes the dense
//! per-pixel fill embarrassingly parallel.

use crate::control::ControlPoint;
use facewarp_core::{Mat2, Point};

/// Weight assigned when a query coincides with a control point; large
/// enough to saturate the weighted averages toward that point
const COINCIDENT_WEIGHT: f32 = 1e10;

/// Tuning knobs for the moving least squares evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MlsConfig {
    /// Distance falloff exponent; larger values localize the fit
    pub alpha: f32,
    /// Distance floor guarding the weight against division blowup
    pub epsilon: f32,
    /// Control points farther than this contribute nothing; `None` keeps
    /// every point in every fit
    pub influence_radius: Option<f32>,
}

impl Default for MlsConfig {
    fn default() -> Self {
        Self {
            alpha: 2.0,
            epsilon: 1e-6,
            influence_radius: None,
        }
    }
}

/// Evaluate the forward map `original -> target` at a query point
///
/// # Arguments
/// * `query` - Point to transform, in pixel space
/// * `points` - Control point set; per-point weights multiply the
///   distance-based weights
/// * `config` - Falloff and cutoff parameters
///
/// # Returns
/// The transformed point. An empty set, an all-out-of-range set, or a
/// zero total weight all return `query` unchanged.
pub fn mls_transform(query: Point, points: &[ControlPoint], config: &MlsConfig) -> Point {
    solve(
        query,
        points.iter().map(|cp| (cp.original, cp.target, cp.weight)),
        config,
    )
}

/// Evaluate the backward map `target -> original` at a query point
///
/// Used when filling a backward-sampling displacement map: the query is an
/// output pixel, the result is the source coordinate to sample from.
pub fn mls_transform_backward(query: Point, points: &[ControlPoint], config: &MlsConfig) -> Point {
    solve(
        query,
        points.iter().map(|cp| (cp.target, cp.original, cp.weight)),
        config,
    )
}

/// Weighted-affine fit and evaluation for one query
fn solve<I>(query: Point, sites: I, config: &MlsConfig) -> Point
where
    I: Iterator<Item = (Point, Point, f32)> + Clone,
{
    let mut total_weight = 0.0f32;
    let mut p_star = Point::new(0.0, 0.0);
    let mut q_star = Point::new(0.0, 0.0);

    let weighted = sites.filter_map(|(p, q, site_weight)| {
        let w = distance_weight(query, p, config)? * site_weight;
        Some((p, q, w))
    });

    for (p, q, w) in weighted.clone() {
        total_weight += w;
        p_star.x += w * p.x;
        p_star.y += w * p.y;
        q_star.x += w * q.x;
        q_star.y += w * q.y;
    }

    if total_weight <= 0.0 {
        return query;
    }
    p_star = p_star.scaled(1.0 / total_weight, 1.0 / total_weight);
    q_star = q_star.scaled(1.0 / total_weight, 1.0 / total_weight);

    // M = sum w * q_hat p_hat^T, N = sum w * p_hat p_hat^T, A = M N^-1.
    let mut m = Mat2::zero();
    let mut n = Mat2::zero();
    for (p, q, w) in weighted {
        let ph = p.offset_from(p_star);
        let qh = q.offset_from(q_star);
        m = m_add(m, outer(qh, ph), w);
        n = m_add(n, outer(ph, ph), w);
    }

    // Singular moment matrix (all sites collinear through p*): the affine
    // part degenerates to zero and the result is the weighted target mean.
    let a = match n.inverse() {
        Some(n_inv) => m.mul(n_inv),
        None => Mat2::zero(),
    };

    let rel = query.offset_from(p_star);
    q_star.translated(a.mul_vec(rel))
}

/// Distance-based weight, or `None` when the site is out of range
#[inline]
fn distance_weight(query: Point, site: Point, config: &MlsConfig) -> Option<f32> {
    let d = query.distance(site);
    if let Some(radius) = config.influence_radius
        && d > radius
    {
        return None;
    }
    if d < config.epsilon {
        Some(COINCIDENT_WEIGHT)
    } else {
        Some(1.0 / (d + config.epsilon).powf(config.alpha))
    }
}

#[inline]
fn outer(u: Point, v: Point) -> Mat2 {
    Mat2::new(u.x * v.x, u.x * v.y, u.y * v.x, u.y * v.y)
}

#[inline]
fn m_add(acc: Mat2, m: Mat2, w: f32) -> Mat2 {
    Mat2::new(
        acc.a + w * m.a,
        acc.b + w * m.b,
        acc.c + w * m.c,
        acc.d + w * m.d,
    )
}
