//! Cubic spline solvers producing per-interval Bézier control points.
//!
//! Every solver takes parallel `x`/`y` slices and returns one [`ControlPair`]
//! per consecutive sample pair. Degenerate arithmetic (duplicate x values,
//! zero-length intervals, NaN inputs) is coerced to `0.0` so the output is
//! always finite.

use serde::{Deserialize, Serialize};

use crate::core::primitives::{days_in_month_of, days_in_year_of, finite_or_zero};
use crate::core::segment::SplineSegment;
use crate::core::types::{Point, SplineKind};

const ONE_THIRD: f64 = 1.0 / 3.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;
const NOMINAL_DAYS_PER_MONTH: f64 = 30.4375;
const NOMINAL_DAYS_PER_YEAR: f64 = 365.25;

/// Two inner control points of one cubic Bézier interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPair {
    pub c1: Point,
    pub c2: Point,
}

impl ControlPair {
    fn sanitized(c1: Point, c2: Point) -> Self {
        Self {
            c1: Point::new(finite_or_zero(c1.x), finite_or_zero(c1.y)),
            c2: Point::new(finite_or_zero(c2.x), finite_or_zero(c2.y)),
        }
    }
}

/// Calendar unit used to normalize cardinal tangents on date axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateUnit {
    Months,
    Years,
}

fn sanitized_y(ys: &[f64]) -> Vec<f64> {
    ys.iter().copied().map(finite_or_zero).collect()
}

/// Second derivatives of the natural cubic spline through the samples.
///
/// Solves the tridiagonal system with `y''[0] = y''[n-1] = 0` by forward
/// elimination and back substitution.
#[must_use]
pub fn natural_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len().min(ys.len());
    let mut y2 = vec![0.0; n];
    if n < 3 {
        return y2;
    }

    let ys = sanitized_y(&ys[..n]);
    let mut u = vec![0.0; n];
    for i in 1..n - 1 {
        let sig = finite_or_zero((xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]));
        let p = sig * y2[i - 1] + 2.0;
        y2[i] = finite_or_zero((sig - 1.0) / p);
        let slope_diff = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
            - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        u[i] = finite_or_zero(
            (6.0 * finite_or_zero(slope_diff) / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p,
        );
    }

    y2[n - 1] = 0.0;
    for k in (0..n - 1).rev() {
        y2[k] = finite_or_zero(y2[k] * y2[k + 1] + u[k]);
    }
    y2
}

/// Control points of the natural cubic spline.
#[must_use]
pub fn natural_control_points(xs: &[f64], ys: &[f64]) -> Vec<ControlPair> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return Vec::new();
    }

    let y2 = natural_second_derivatives(xs, ys);
    let ys = sanitized_y(&ys[..n]);
    (0..n - 1)
        .map(|i| {
            let (x0, x1) = (xs[i], xs[i + 1]);
            let (y0, y1) = (ys[i], ys[i + 1]);
            let dx2 = (x1 - x0) * (x1 - x0);
            let c1 = Point::new(
                TWO_THIRDS * x0 + ONE_THIRD * x1,
                ONE_THIRD * (2.0 * y0 + y1 - ONE_THIRD * dx2 * (y2[i] + 0.5 * y2[i + 1])),
            );
            let c2 = Point::new(
                ONE_THIRD * x0 + TWO_THIRDS * x1,
                ONE_THIRD * (y0 + 2.0 * y1 - ONE_THIRD * dx2 * (0.5 * y2[i] + y2[i + 1])),
            );
            ControlPair::sanitized(c1, c2)
        })
        .collect()
}

fn date_tangent_scale(x: f64, unit: DateUnit) -> f64 {
    let (actual, nominal) = match unit {
        DateUnit::Months => (days_in_month_of(x), NOMINAL_DAYS_PER_MONTH),
        DateUnit::Years => (days_in_year_of(x), NOMINAL_DAYS_PER_YEAR),
    };
    actual.map_or(1.0, |days| nominal / f64::from(days))
}

/// Per-sample tangents `(tx, ty)` of the cardinal spline.
///
/// Tangents are only computed for three or more samples; shorter inputs get
/// zero tangents, which degrades to a straight segment.
#[must_use]
pub fn cardinal_tangents(
    xs: &[f64],
    ys: &[f64],
    date_unit: Option<DateUnit>,
) -> Vec<(f64, f64)> {
    let n = xs.len().min(ys.len());
    let mut tangents = vec![(0.0, 0.0); n];
    if n < 3 {
        return tangents;
    }

    let ys = sanitized_y(&ys[..n]);
    for (i, tangent) in tangents.iter_mut().enumerate() {
        let (tx, ty) = if i == 0 {
            (xs[1] - xs[0], ys[1] - ys[0])
        } else if i == n - 1 {
            (xs[n - 1] - xs[n - 2], ys[n - 1] - ys[n - 2])
        } else {
            (0.5 * (xs[i + 1] - xs[i - 1]), 0.5 * (ys[i + 1] - ys[i - 1]))
        };
        let scale = date_unit.map_or(1.0, |unit| date_tangent_scale(xs[i], unit));
        *tangent = (finite_or_zero(tx), finite_or_zero(ty * scale));
    }
    tangents
}

/// Control points of the cardinal spline, placed at `point ± tangent / 3`.
#[must_use]
pub fn cardinal_control_points(
    xs: &[f64],
    ys: &[f64],
    date_unit: Option<DateUnit>,
) -> Vec<ControlPair> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return Vec::new();
    }

    let tangents = cardinal_tangents(xs, ys, date_unit);
    let ys = sanitized_y(&ys[..n]);
    (0..n - 1)
        .map(|i| {
            let (tx0, ty0) = tangents[i];
            let (tx1, ty1) = tangents[i + 1];
            ControlPair::sanitized(
                Point::new(xs[i] + tx0 * ONE_THIRD, ys[i] + ty0 * ONE_THIRD),
                Point::new(xs[i + 1] - tx1 * ONE_THIRD, ys[i + 1] - ty1 * ONE_THIRD),
            )
        })
        .collect()
}

/// Fritsch–Carlson tangent coefficients, one per sample.
#[must_use]
pub fn monotonic_coefficients(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return vec![0.0; n];
    }

    let ys = sanitized_y(&ys[..n]);
    let dx: Vec<f64> = xs[..n].windows(2).map(|w| w[1] - w[0]).collect();
    let slopes: Vec<f64> = (0..n - 1)
        .map(|i| finite_or_zero((ys[i + 1] - ys[i]) / dx[i]))
        .collect();

    let mut coefficients = vec![0.0; n];
    coefficients[0] = slopes[0];
    coefficients[n - 1] = slopes[n - 2];
    for i in 1..n - 1 {
        let (m0, m1) = (slopes[i - 1], slopes[i]);
        if m0 == 0.0 || m1 == 0.0 || (m0 > 0.0) != (m1 > 0.0) {
            coefficients[i] = 0.0;
            continue;
        }
        let (d0, d1) = (dx[i - 1], dx[i]);
        let sum = d0 + d1;
        coefficients[i] = finite_or_zero(3.0 * sum / ((sum + d1) / m0 + (sum + d0) / m1));
    }
    coefficients
}

/// Control points of the monotone cubic interpolant; never overshoots.
#[must_use]
pub fn monotonic_control_points(xs: &[f64], ys: &[f64]) -> Vec<ControlPair> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return Vec::new();
    }

    let coefficients = monotonic_coefficients(xs, ys);
    let ys = sanitized_y(&ys[..n]);
    (0..n - 1)
        .map(|i| {
            let third = (xs[i + 1] - xs[i]) * ONE_THIRD;
            ControlPair::sanitized(
                Point::new(xs[i] + third, ys[i] + coefficients[i] * third),
                Point::new(xs[i + 1] - third, ys[i + 1] - coefficients[i + 1] * third),
            )
        })
        .collect()
}

/// Dispatches to the solver for `kind`.
#[must_use]
pub fn solve_control_points(
    kind: SplineKind,
    xs: &[f64],
    ys: &[f64],
    date_unit: Option<DateUnit>,
) -> Vec<ControlPair> {
    match kind {
        SplineKind::Natural => natural_control_points(xs, ys),
        SplineKind::Cardinal => cardinal_control_points(xs, ys, date_unit),
        SplineKind::Monotonic => monotonic_control_points(xs, ys),
    }
}

/// Solves and assembles full Bézier segments, one per consecutive pair.
#[must_use]
pub fn spline_segments(
    kind: SplineKind,
    xs: &[f64],
    ys: &[f64],
    date_unit: Option<DateUnit>,
) -> Vec<SplineSegment> {
    let controls = solve_control_points(kind, xs, ys, date_unit);
    controls
        .iter()
        .enumerate()
        .map(|(i, pair)| SplineSegment {
            p0: Point::new(xs[i], finite_or_zero(ys[i])),
            c1: pair.c1,
            c2: pair.c2,
            p1: Point::new(xs[i + 1], finite_or_zero(ys[i + 1])),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn natural_second_derivatives_match_hand_solution() {
        let y2 = natural_second_derivatives(&[0.0, 1.0, 2.0, 3.0], &[0.0, 5.0, 5.0, 10.0]);
        assert_relative_eq!(y2[0], 0.0);
        assert_relative_eq!(y2[1], -10.0, epsilon = 1e-9);
        assert_relative_eq!(y2[2], 10.0, epsilon = 1e-9);
        assert_relative_eq!(y2[3], 0.0);
    }

    #[test]
    fn two_points_degrade_to_straight_thirds() {
        for kind in [SplineKind::Natural, SplineKind::Monotonic] {
            let pairs = solve_control_points(kind, &[0.0, 3.0], &[0.0, 6.0], None);
            assert_eq!(pairs.len(), 1);
            assert_relative_eq!(pairs[0].c1.x, 1.0, epsilon = 1e-12);
            assert_relative_eq!(pairs[0].c1.y, 2.0, epsilon = 1e-12);
            assert_relative_eq!(pairs[0].c2.x, 2.0, epsilon = 1e-12);
            assert_relative_eq!(pairs[0].c2.y, 4.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn cardinal_with_two_points_keeps_controls_on_endpoints() {
        let pairs = cardinal_control_points(&[0.0, 3.0], &[0.0, 6.0], None);
        assert_eq!(pairs[0].c1, Point::new(0.0, 0.0));
        assert_eq!(pairs[0].c2, Point::new(3.0, 6.0));
    }

    #[test]
    fn cardinal_interior_tangent_is_half_the_neighbor_span() {
        let tangents = cardinal_tangents(&[0.0, 1.0, 3.0], &[0.0, 2.0, 2.0], None);
        assert_eq!(tangents[0], (1.0, 2.0));
        assert_eq!(tangents[1], (1.5, 1.0));
        assert_eq!(tangents[2], (2.0, 0.0));
    }

    #[test]
    fn duplicate_x_values_yield_finite_controls() {
        let xs = [0.0, 1.0, 1.0, 2.0];
        let ys = [1.0, 2.0, 3.0, f64::NAN];
        for kind in [SplineKind::Natural, SplineKind::Cardinal, SplineKind::Monotonic] {
            for pair in solve_control_points(kind, &xs, &ys, None) {
                assert!(pair.c1.x.is_finite() && pair.c1.y.is_finite());
                assert!(pair.c2.x.is_finite() && pair.c2.y.is_finite());
            }
        }
    }

    #[test]
    fn monotonic_zeroes_tangent_at_local_extremum() {
        let coefficients = monotonic_coefficients(&[0.0, 1.0, 2.0], &[0.0, 4.0, 1.0]);
        assert_eq!(coefficients[1], 0.0);
        assert_eq!(coefficients[0], 4.0);
        assert_eq!(coefficients[2], -3.0);
    }
}
