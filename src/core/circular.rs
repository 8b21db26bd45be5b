//! Angular layout of pie and doughnut series.
//!
//! Public angles are degrees; everything stored in a [`CircularPlan`] is in
//! radians. Screen orientation is assumed: 90° points towards `+y`.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::primitives::{degrees_to_radians, finite_or_zero, radians_to_degrees};
use crate::core::types::Point;

/// How a group-to threshold is evaluated against each slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GroupToMode {
    #[default]
    Value,
    Percentage,
    Angle,
}

/// Slices whose evaluated magnitude is below `threshold` merge into "Others".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupTo {
    pub threshold: f64,
    #[serde(default)]
    pub mode: GroupToMode,
}

/// Where a slice of the plan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SliceSource {
    Sample(usize),
    Others,
}

/// Slice values after group-to aggregation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupedSlices {
    pub values: Vec<f64>,
    pub sources: Vec<SliceSource>,
    /// Sample positions folded into the "Others" slice, kept for drill-down.
    pub merged: Vec<usize>,
}

/// Applies group-to aggregation; the synthetic slice, if any, is appended last.
///
/// NaN values are never merged. `arc_degrees` is the span used by
/// [`GroupToMode::Angle`].
#[must_use]
pub fn group_to_others(values: &[f64], group_to: Option<GroupTo>, arc_degrees: f64) -> GroupedSlices {
    let Some(group_to) = group_to.filter(|g| g.threshold > 0.0) else {
        return GroupedSlices {
            values: values.to_vec(),
            sources: (0..values.len()).map(SliceSource::Sample).collect(),
            merged: Vec::new(),
        };
    };

    let total: f64 = values.iter().map(|v| finite_or_zero(*v).abs()).sum();
    let evaluate = |value: f64| -> f64 {
        let magnitude = value.abs();
        match group_to.mode {
            GroupToMode::Value => magnitude,
            GroupToMode::Percentage => finite_or_zero(magnitude / total * 100.0),
            GroupToMode::Angle => finite_or_zero(magnitude / total * arc_degrees.abs()),
        }
    };

    let mut grouped = GroupedSlices::default();
    let mut others = 0.0;
    for (position, &value) in values.iter().enumerate() {
        if !value.is_nan() && evaluate(value) < group_to.threshold {
            others += finite_or_zero(value);
            grouped.merged.push(position);
        } else {
            grouped.values.push(value);
            grouped.sources.push(SliceSource::Sample(position));
        }
    }
    if !grouped.merged.is_empty() {
        grouped.values.push(others);
        grouped.sources.push(SliceSource::Others);
    }
    grouped
}

/// Arc span in radians for the given degree bounds, reduced modulo a full turn
/// when it exceeds one.
#[must_use]
pub fn arc_length(start_angle_deg: f64, end_angle_deg: f64) -> f64 {
    let length = degrees_to_radians(end_angle_deg - start_angle_deg);
    if length.abs() > TAU {
        length % TAU
    } else {
        length
    }
}

/// Start/end angle of one slice, radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceAngle {
    pub start: f64,
    pub end: f64,
}

impl SliceAngle {
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end - self.start
    }
}

/// Contiguous slices proportional to `|value|`, starting at `start`.
#[must_use]
pub fn proportional_slices(values: &[f64], start: f64, arc: f64) -> (Vec<SliceAngle>, f64) {
    let total: f64 = values.iter().map(|v| finite_or_zero(*v).abs()).sum();
    let mut cursor = start;
    let slices = values
        .iter()
        .map(|value| {
            let sweep = finite_or_zero(arc * finite_or_zero(*value).abs() / total);
            let slice = SliceAngle {
                start: cursor,
                end: cursor + sweep,
            };
            cursor += sweep;
            slice
        })
        .collect();
    (slices, total)
}

/// Stacked-doughnut slices: all begin at `start`, sweep is `|value| / capacity`
/// of the arc, capped at the full arc.
#[must_use]
pub fn stacked_slices(
    values: &[f64],
    start: f64,
    arc: f64,
    capacity: Option<f64>,
) -> (Vec<SliceAngle>, f64) {
    let largest = values
        .iter()
        .map(|v| finite_or_zero(*v).abs())
        .fold(0.0, f64::max);
    let capacity = capacity
        .filter(|c| c.is_finite() && *c > 0.0)
        .unwrap_or(largest);
    let slices = values
        .iter()
        .map(|value| {
            let fraction = finite_or_zero(finite_or_zero(*value).abs() / capacity).min(1.0);
            SliceAngle {
                start,
                end: start + arc * fraction,
            }
        })
        .collect();
    (slices, capacity)
}

/// Cardinal directions on a screen-oriented circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardinalDirection {
    East,
    South,
    West,
    North,
}

impl CardinalDirection {
    fn from_degrees(degrees: i64) -> Self {
        match degrees.rem_euclid(360) {
            0 => Self::East,
            90 => Self::South,
            180 => Self::West,
            _ => Self::North,
        }
    }

    fn extreme(self, center: Point, radius: f64) -> Point {
        match self {
            Self::East => Point::new(center.x + radius, center.y),
            Self::South => Point::new(center.x, center.y + radius),
            Self::West => Point::new(center.x - radius, center.y),
            Self::North => Point::new(center.x, center.y - radius),
        }
    }
}

/// Cardinal directions lying strictly between the two angles (degrees).
#[must_use]
pub fn crossed_directions(start_deg: f64, end_deg: f64) -> SmallVec<[CardinalDirection; 4]> {
    let (lo, hi) = if start_deg <= end_deg {
        (start_deg, end_deg)
    } else {
        (end_deg, start_deg)
    };
    let mut crossed = SmallVec::new();
    if !lo.is_finite() || !hi.is_finite() {
        return crossed;
    }

    let mut quarter = (lo / 90.0).floor() as i64 + 1;
    while (quarter as f64) * 90.0 < hi && crossed.len() < 4 {
        let direction = CardinalDirection::from_degrees(quarter * 90);
        if !crossed.contains(&direction) {
            crossed.push(direction);
        }
        quarter += 1;
    }
    crossed
}

fn point_on_circle(center: Point, radius: f64, degrees: f64) -> Point {
    let radians = degrees_to_radians(degrees);
    Point::new(
        center.x + radius * radians.cos(),
        center.y + radius * radians.sin(),
    )
}

/// Visual center for an arc that does not span a full circle.
///
/// The wedge silhouette (center, arc endpoints and every crossed cardinal
/// extreme) is bounded per axis and the center moves by half the offset
/// between that box's midpoint and the geometric center, capped to `radius`.
#[must_use]
pub fn actual_center(center: Point, radius: f64, start_deg: f64, end_deg: f64) -> Point {
    let sweep = end_deg - start_deg;
    if !sweep.is_finite() || sweep == 0.0 || sweep.abs() >= 360.0 || radius <= 0.0 {
        return center;
    }

    let mut silhouette: SmallVec<[Point; 7]> = SmallVec::new();
    silhouette.push(center);
    silhouette.push(point_on_circle(center, radius, start_deg));
    silhouette.push(point_on_circle(center, radius, end_deg));
    let crossed = crossed_directions(start_deg, end_deg);
    silhouette.extend(crossed.iter().map(|direction| direction.extreme(center, radius)));

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for point in &silhouette {
        min_x = min_x.min(point.x);
        max_x = max_x.max(point.x);
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }

    let mut shift_x = 0.5 * (center.x - 0.5 * (min_x + max_x));
    let mut shift_y = 0.5 * (center.y - 0.5 * (min_y + max_y));
    let distance = shift_x.hypot(shift_y);
    if distance > radius {
        let scale = radius / distance;
        shift_x *= scale;
        shift_y *= scale;
    }
    trace!(crossed = crossed.len(), shift_x, shift_y, "eccentric center correction");
    Point::new(center.x + shift_x, center.y + shift_y)
}

/// Square region the circle is laid out in, in host units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularFrame {
    pub center: Point,
    pub radius: f64,
}

impl Default for CircularFrame {
    fn default() -> Self {
        Self {
            center: Point::new(0.5, 0.5),
            radius: 0.5,
        }
    }
}

/// Radial band, as fractions of the frame radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusBand {
    pub inner: f64,
    pub outer: f64,
}

/// Band of the `index`-th of `count` concentric series between `hole` and
/// `outer`, split evenly.
#[must_use]
pub fn concentric_band(index: usize, count: usize, hole: f64, outer: f64) -> RadiusBand {
    let count = count.max(1);
    let index = index.min(count - 1);
    let width = (outer - hole).max(0.0) / count as f64;
    let inner = hole + width * index as f64;
    RadiusBand {
        inner,
        outer: inner + width,
    }
}

/// Layout settings for a circular series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularOptions {
    /// Degrees.
    pub start_angle: f64,
    /// Degrees; may be below `start_angle` or more than a turn away.
    pub end_angle: f64,
    pub group_to: Option<GroupTo>,
    /// Stacked doughnut: one ring per slice instead of angular partitioning.
    pub stacked: bool,
    pub capacity: Option<f64>,
}

impl Default for CircularOptions {
    fn default() -> Self {
        Self {
            start_angle: 0.0,
            end_angle: 360.0,
            group_to: None,
            stacked: false,
            capacity: None,
        }
    }
}

/// Result of one circular layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularPlan {
    pub slice_angles: Vec<SliceAngle>,
    pub sources: Vec<SliceSource>,
    pub values: Vec<f64>,
    /// Sum of magnitudes (or capacity for stacked doughnuts).
    pub total: f64,
    pub center: Point,
    /// Signed arc span, radians.
    pub arc_length: f64,
    pub band: RadiusBand,
    pub others: Vec<usize>,
}

/// Computes slice angles, group-to aggregation and the corrected center.
#[must_use]
pub fn layout_circular(
    values: &[f64],
    options: &CircularOptions,
    frame: CircularFrame,
    band: RadiusBand,
) -> CircularPlan {
    let arc = arc_length(options.start_angle, options.end_angle);
    let grouped = group_to_others(values, options.group_to, radians_to_degrees(arc));
    let start = degrees_to_radians(options.start_angle);
    let (slice_angles, total) = if options.stacked {
        stacked_slices(&grouped.values, start, arc, options.capacity)
    } else {
        proportional_slices(&grouped.values, start, arc)
    };

    let center = actual_center(
        frame.center,
        frame.radius,
        options.start_angle,
        options.start_angle + radians_to_degrees(arc),
    );

    CircularPlan {
        slice_angles,
        sources: grouped.sources,
        values: grouped.values,
        total,
        center,
        arc_length: arc,
        band,
        others: grouped.merged,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn arc_length_reduces_beyond_one_turn() {
        assert_relative_eq!(arc_length(0.0, 360.0), TAU, epsilon = 1e-12);
        assert_relative_eq!(arc_length(0.0, 450.0), TAU / 4.0, epsilon = 1e-12);
        assert_relative_eq!(arc_length(360.0, 0.0), -TAU, epsilon = 1e-12);
    }

    #[test]
    fn crossed_directions_cover_quarter_boundaries() {
        assert!(crossed_directions(10.0, 80.0).is_empty());
        assert_eq!(
            crossed_directions(45.0, 135.0).as_slice(),
            &[CardinalDirection::South]
        );
        assert_eq!(
            crossed_directions(-45.0, 135.0).as_slice(),
            &[CardinalDirection::East, CardinalDirection::South]
        );
        assert_eq!(
            crossed_directions(135.0, -45.0).as_slice(),
            &[CardinalDirection::East, CardinalDirection::South]
        );
        assert!(crossed_directions(0.0, 90.0).is_empty());
    }

    #[test]
    fn quarter_arc_center_moves_opposite_to_the_wedge() {
        let center = actual_center(Point::new(0.0, 0.0), 10.0, 0.0, 90.0);
        assert_relative_eq!(center.x, -2.5, epsilon = 1e-9);
        assert_relative_eq!(center.y, -2.5, epsilon = 1e-9);
    }

    #[test]
    fn half_arc_center_moves_along_one_axis() {
        let center = actual_center(Point::new(0.0, 0.0), 10.0, 180.0, 360.0);
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(center.y, 2.5, epsilon = 1e-9);
    }

    #[test]
    fn stacked_slices_share_start_angle() {
        let (slices, capacity) = stacked_slices(&[50.0, 100.0, 25.0], 0.0, TAU, None);
        assert_eq!(capacity, 100.0);
        assert!(slices.iter().all(|s| s.start == 0.0));
        assert_relative_eq!(slices[0].end, TAU / 2.0);
        assert_relative_eq!(slices[1].end, TAU);
    }

    #[test]
    fn concentric_bands_split_the_ring_evenly() {
        let band = concentric_band(1, 4, 0.2, 1.0);
        assert_relative_eq!(band.inner, 0.4, epsilon = 1e-12);
        assert_relative_eq!(band.outer, 0.6, epsilon = 1e-12);
    }
}
