use serde::{Deserialize, Serialize};

use crate::core::types::{Point, SourceItem};

/// Straight segment between two consecutive samples in data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LineSegment {
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }
}

/// Cubic Bézier piece: start point, two control points, end point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplineSegment {
    pub p0: Point,
    pub c1: Point,
    pub c2: Point,
    pub p1: Point,
}

impl SplineSegment {
    /// Evaluates the curve at `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        Point::new(
            b0 * self.p0.x + b1 * self.c1.x + b2 * self.c2.x + b3 * self.p1.x,
            b0 * self.p0.y + b1 * self.c1.y + b2 * self.c2.y + b3 * self.p1.y,
        )
    }
}

/// Horizontal-then-vertical step between two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl StepSegment {
    /// The elbow where the horizontal run turns vertical.
    #[must_use]
    pub fn corner(&self) -> Point {
        Point::new(self.x2, self.y1)
    }
}

/// Closed fill polygon. The first vertex is not repeated at the end.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaPolygon {
    pub points: Vec<Point>,
}

/// Column/bar rectangle; `y1` is the value end and `y2` the base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl RectSegment {
    #[must_use]
    pub fn height(&self) -> f64 {
        (self.y1 - self.y2).abs()
    }
}

/// Pie/doughnut slice. Angles are radians; radii are fractions of the
/// available radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorSegment {
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub is_exploded: bool,
}

impl SectorSegment {
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Bubble/scatter marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleSegment {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

/// Geometry carried by a segment record, selected by the series draw kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SegmentGeometry {
    Line(LineSegment),
    Spline(SplineSegment),
    Step(StepSegment),
    Area(AreaPolygon),
    Rect(RectSegment),
    Sector(SectorSegment),
    Circle(CircleSegment),
}

impl SegmentGeometry {
    #[must_use]
    pub fn as_line(&self) -> Option<&LineSegment> {
        match self {
            Self::Line(line) => Some(line),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_spline(&self) -> Option<&SplineSegment> {
        match self {
            Self::Spline(spline) => Some(spline),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_step(&self) -> Option<&StepSegment> {
        match self {
            Self::Step(step) => Some(step),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_area(&self) -> Option<&AreaPolygon> {
        match self {
            Self::Area(area) => Some(area),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_rect(&self) -> Option<&RectSegment> {
        match self {
            Self::Rect(rect) => Some(rect),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sector(&self) -> Option<&SectorSegment> {
        match self {
            Self::Sector(sector) => Some(sector),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_circle(&self) -> Option<&CircleSegment> {
        match self {
            Self::Circle(circle) => Some(circle),
            _ => None,
        }
    }
}

/// Identity of a segment record, stable across in-place reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u64);

/// One renderable segment plus its back-reference into the source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub record_id: RecordId,
    pub index: usize,
    /// Host item the segment was projected from.
    ///
    /// `None` for samples without a source and for the synthetic "Others"
    /// sector. The sample positions folded into that sector are listed in
    /// `CircularPlan::others`.
    #[serde(skip)]
    pub source: Option<SourceItem>,
    pub geometry: SegmentGeometry,
}
