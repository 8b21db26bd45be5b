//! Per-kind projection of laid-out samples into segment drafts.
//!
//! Every projector is deterministic and side-effect free. Empty samples
//! produce zero-length or zero-radius geometry at a finite position instead
//! of being skipped, so draft indices line up with the samples.

use std::f64::consts::TAU;

use crate::core::primitives::{degrees_to_radians, finite_or_zero};
use crate::core::{
    AreaPolygon, CircleSegment, CircularPlan, DateUnit, LineSegment, Point, RectSegment, Sample,
    SectorSegment, SegmentGeometry, SliceSource, SplineKind, SplineSegment, StackValues,
    StepSegment, spline_segments,
};

use super::segment_builder::SegmentDraft;
use super::series_config::{BubbleConfig, CircularConfig, ColumnConfig, PolarConfig};

/// Column slot among series drawn side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SideBySideSlot {
    pub index: usize,
    pub count: usize,
}

impl Default for SideBySideSlot {
    fn default() -> Self {
        Self { index: 0, count: 1 }
    }
}

fn draft(samples: &[Sample], index: usize, geometry: SegmentGeometry) -> SegmentDraft {
    SegmentDraft {
        index,
        source: samples.get(index).and_then(|s| s.source.clone()),
        geometry,
    }
}

/// Finite endpoints of the pair `(i, i + 1)`; when either sample is empty both
/// collapse onto the non-empty one (or onto `(x_i, 0)`).
fn pair_endpoints(samples: &[Sample], ys: &[f64], i: usize) -> (Point, Point) {
    let a = Point::new(finite_or_zero(samples[i].x), finite_or_zero(ys[i]));
    let b = Point::new(finite_or_zero(samples[i + 1].x), finite_or_zero(ys[i + 1]));
    match (samples[i].is_empty(), samples[i + 1].is_empty()) {
        (false, false) => (a, b),
        (false, true) => (a, a),
        (true, false) => (b, b),
        (true, true) => {
            let collapsed = Point::new(a.x, 0.0);
            (collapsed, collapsed)
        }
    }
}

fn pair_is_complete(samples: &[Sample], i: usize) -> bool {
    !samples[i].is_empty() && !samples[i + 1].is_empty()
}

/// Effective y per sample: stack end when stacked, else the raw value.
#[must_use]
pub fn effective_values(samples: &[Sample], stack: Option<&StackValues>) -> Vec<f64> {
    match stack {
        Some(stack) => samples
            .iter()
            .enumerate()
            .map(|(i, sample)| {
                if sample.is_empty() {
                    f64::NAN
                } else {
                    stack.end.get(i).copied().unwrap_or(0.0)
                }
            })
            .collect(),
        None => samples.iter().map(|s| s.y).collect(),
    }
}

#[must_use]
pub fn project_lines(samples: &[Sample], ys: &[f64]) -> Vec<SegmentDraft> {
    (0..samples.len().saturating_sub(1))
        .map(|i| {
            let (a, b) = pair_endpoints(samples, ys, i);
            draft(
                samples,
                i,
                SegmentGeometry::Line(LineSegment {
                    x1: a.x,
                    y1: a.y,
                    x2: b.x,
                    y2: b.y,
                }),
            )
        })
        .collect()
}

#[must_use]
pub fn project_steps(samples: &[Sample], ys: &[f64]) -> Vec<SegmentDraft> {
    (0..samples.len().saturating_sub(1))
        .map(|i| {
            let (a, b) = pair_endpoints(samples, ys, i);
            draft(
                samples,
                i,
                SegmentGeometry::Step(StepSegment {
                    x1: a.x,
                    y1: a.y,
                    x2: b.x,
                    y2: b.y,
                }),
            )
        })
        .collect()
}

#[must_use]
pub fn project_splines(
    samples: &[Sample],
    ys: &[f64],
    kind: SplineKind,
    date_unit: Option<DateUnit>,
) -> Vec<SegmentDraft> {
    let xs: Vec<f64> = samples.iter().map(|s| finite_or_zero(s.x)).collect();
    let solved = spline_segments(kind, &xs, ys, date_unit);
    solved
        .into_iter()
        .enumerate()
        .map(|(i, segment)| {
            let geometry = if pair_is_complete(samples, i) {
                segment
            } else {
                let (p, _) = pair_endpoints(samples, ys, i);
                SplineSegment {
                    p0: p,
                    c1: p,
                    c2: p,
                    p1: p,
                }
            };
            draft(samples, i, SegmentGeometry::Spline(geometry))
        })
        .collect()
}

/// Single closed polygon for the whole series.
///
/// Unstacked areas close against `origin`; stacked areas run forward along
/// the end values and back along the start values.
#[must_use]
pub fn project_area(
    samples: &[Sample],
    ys: &[f64],
    origin: f64,
    stack: Option<&StackValues>,
) -> Vec<SegmentDraft> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mut points = Vec::with_capacity(samples.len() * 2);
    match stack {
        Some(stack) => {
            for (i, sample) in samples.iter().enumerate() {
                let base = finite_or_zero(stack.start.get(i).copied().unwrap_or(0.0));
                let y = if sample.is_empty() { base } else { finite_or_zero(ys[i]) };
                points.push(Point::new(finite_or_zero(sample.x), y));
            }
            for (i, sample) in samples.iter().enumerate().rev() {
                let base = finite_or_zero(stack.start.get(i).copied().unwrap_or(0.0));
                points.push(Point::new(finite_or_zero(sample.x), base));
            }
        }
        None => {
            let first_x = finite_or_zero(samples[0].x);
            let last_x = finite_or_zero(samples[samples.len() - 1].x);
            points.push(Point::new(first_x, origin));
            for (i, sample) in samples.iter().enumerate() {
                let y = if sample.is_empty() { origin } else { finite_or_zero(ys[i]) };
                points.push(Point::new(finite_or_zero(sample.x), y));
            }
            points.push(Point::new(last_x, origin));
        }
    }

    vec![draft(samples, 0, SegmentGeometry::Area(AreaPolygon { points }))]
}

/// Smallest positive gap between distinct x values; `1.0` when there is none.
#[must_use]
pub fn min_x_delta(samples: &[Sample]) -> f64 {
    let mut xs: Vec<f64> = samples.iter().map(|s| s.x).filter(|x| x.is_finite()).collect();
    xs.sort_by(f64::total_cmp);
    xs.windows(2)
        .map(|w| w[1] - w[0])
        .filter(|delta| *delta > 0.0)
        .fold(None, |min: Option<f64>, delta| Some(min.map_or(delta, |m| m.min(delta))))
        .unwrap_or(1.0)
}

#[must_use]
pub fn project_columns(
    samples: &[Sample],
    ys: &[f64],
    config: &ColumnConfig,
    slot: SideBySideSlot,
    stack: Option<&StackValues>,
) -> Vec<SegmentDraft> {
    let band = config.band_width.unwrap_or_else(|| min_x_delta(samples)) * config.width_ratio;
    let count = slot.count.max(1);
    let slot_width = band / count as f64;
    let offset = -0.5 * band + slot_width * slot.index.min(count - 1) as f64;

    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let base = match stack {
                Some(stack) => finite_or_zero(stack.start.get(i).copied().unwrap_or(0.0)),
                None => config.origin,
            };
            let top = if sample.is_empty() { base } else { finite_or_zero(ys[i]) };
            let x1 = finite_or_zero(sample.x) + offset;
            draft(
                samples,
                i,
                SegmentGeometry::Rect(RectSegment {
                    x1,
                    y1: top,
                    x2: x1 + slot_width,
                    y2: base,
                }),
            )
        })
        .collect()
}

#[must_use]
pub fn project_bubbles(samples: &[Sample], config: &BubbleConfig) -> Vec<SegmentDraft> {
    let largest = samples
        .iter()
        .filter_map(|s| s.size)
        .map(|size| finite_or_zero(size).abs())
        .fold(0.0, f64::max);
    let span = config.max_radius - config.min_radius;

    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let size = finite_or_zero(sample.size.unwrap_or(0.0)).abs();
            let radius = if sample.is_empty() || (size == 0.0 && !config.show_zero_size) {
                0.0
            } else {
                config.min_radius + finite_or_zero(span * size / largest)
            };
            draft(
                samples,
                i,
                SegmentGeometry::Circle(CircleSegment {
                    cx: finite_or_zero(sample.x),
                    cy: finite_or_zero(sample.y),
                    radius,
                }),
            )
        })
        .collect()
}

#[must_use]
pub fn project_scatter(samples: &[Sample], radius: f64) -> Vec<SegmentDraft> {
    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            draft(
                samples,
                i,
                SegmentGeometry::Circle(CircleSegment {
                    cx: finite_or_zero(sample.x),
                    cy: finite_or_zero(sample.y),
                    radius: if sample.is_empty() { 0.0 } else { radius },
                }),
            )
        })
        .collect()
}

/// Polar line: sample `i` of `n` sits at angle `start + i * 2π / n`, radius `y`.
///
/// A closed series with three or more samples adds the segment back to the
/// first sample.
#[must_use]
pub fn project_polar(samples: &[Sample], config: &PolarConfig) -> Vec<SegmentDraft> {
    let n = samples.len();
    if n < 2 {
        return Vec::new();
    }

    let start = degrees_to_radians(config.start_angle);
    let step = TAU / n as f64;
    let vertex = |i: usize| {
        let angle = start + step * i as f64;
        let radius = finite_or_zero(samples[i].y);
        Point::new(radius * angle.cos(), radius * angle.sin())
    };

    let count = if config.closed && n >= 3 { n } else { n - 1 };
    (0..count)
        .map(|i| {
            let j = (i + 1) % n;
            let (a, b) = match (samples[i].is_empty(), samples[j].is_empty()) {
                (false, false) => (vertex(i), vertex(j)),
                (false, true) => (vertex(i), vertex(i)),
                (true, false) => (vertex(j), vertex(j)),
                (true, true) => (Point::default(), Point::default()),
            };
            draft(
                samples,
                i,
                SegmentGeometry::Line(LineSegment {
                    x1: a.x,
                    y1: a.y,
                    x2: b.x,
                    y2: b.y,
                }),
            )
        })
        .collect()
}

/// Sectors for a computed plan. Stacked doughnuts split the band into one
/// ring per slice.
#[must_use]
pub fn project_sectors(
    samples: &[Sample],
    plan: &CircularPlan,
    config: &CircularConfig,
) -> Vec<SegmentDraft> {
    let slices = plan.slice_angles.len();
    let ring_width = (plan.band.outer - plan.band.inner) / slices.max(1) as f64;

    plan.slice_angles
        .iter()
        .zip(&plan.sources)
        .enumerate()
        .map(|(k, (angle, source))| {
            let (inner_radius, outer_radius) = if config.layout.stacked {
                let inner = plan.band.inner + ring_width * k as f64;
                (inner, inner + ring_width)
            } else {
                (plan.band.inner, plan.band.outer)
            };
            let source = match source {
                SliceSource::Sample(position) => {
                    samples.get(*position).and_then(|s| s.source.clone())
                }
                SliceSource::Others => None,
            };
            SegmentDraft {
                index: k,
                source,
                geometry: SegmentGeometry::Sector(SectorSegment {
                    start_angle: angle.start,
                    end_angle: angle.end,
                    inner_radius,
                    outer_radius,
                    is_exploded: config.explode_all || config.explode_index == Some(k),
                }),
            }
        })
        .collect()
}
