use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::error::ChartResult;

/// Stable handle of a series registered in a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(pub u32);

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "series#{}", self.0)
    }
}

/// Opaque back-reference to the host object a sample was extracted from.
///
/// Equality is identity: two handles are equal only when they share the same
/// allocation.
#[derive(Clone)]
pub struct SourceItem(Arc<dyn Any + Send + Sync>);

impl SourceItem {
    #[must_use]
    pub fn new<T: Any + Send + Sync>(item: T) -> Self {
        Self(Arc::new(item))
    }

    #[must_use]
    pub fn from_arc(item: Arc<dyn Any + Send + Sync>) -> Self {
        Self(item)
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SourceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SourceItem")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

impl PartialEq for SourceItem {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// One numeric sample of a series.
///
/// A sample whose `y` is NaN is "empty" (missing data). Empty samples still
/// produce geometry so segment indices stay aligned with the source collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(skip)]
    pub source: Option<SourceItem>,
}

impl Sample {
    #[must_use]
    pub fn new(index: usize, x: f64, y: f64) -> Self {
        Self {
            index,
            x,
            y,
            size: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: SourceItem) -> Self {
        self.source = Some(source);
        self
    }

    /// Builds a sample from a decimal value, rejecting values that do not fit in `f64`.
    pub fn from_decimal(index: usize, x: f64, y: Decimal) -> ChartResult<Self> {
        Ok(Self::new(index, x, decimal_to_f64(y, "y")?))
    }

    /// Builds a sample on a date axis; `x` becomes unix seconds.
    pub fn from_decimal_time(index: usize, time: DateTime<Utc>, y: Decimal) -> ChartResult<Self> {
        Ok(Self::new(
            index,
            datetime_to_unix_seconds(time),
            decimal_to_f64(y, "y")?,
        ))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.y.is_nan()
    }

    /// `y` with missing data mapped to zero.
    #[must_use]
    pub fn y_or_zero(&self) -> f64 {
        if self.y.is_finite() { self.y } else { 0.0 }
    }
}

/// Cubic interpolation flavor used by spline series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SplineKind {
    #[default]
    Natural,
    Cardinal,
    Monotonic,
}

/// Geometry family a series renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DrawKind {
    #[default]
    Line,
    Spline(SplineKind),
    Area,
    Column,
    Pie,
    Doughnut,
    Bubble,
    Scatter,
    Step,
    Polar,
}

impl DrawKind {
    /// Series that connect consecutive samples pairwise.
    #[must_use]
    pub const fn is_pairwise(self) -> bool {
        matches!(self, Self::Line | Self::Spline(_) | Self::Step)
    }

    #[must_use]
    pub const fn is_circular(self) -> bool {
        matches!(self, Self::Pie | Self::Doughnut)
    }

    /// Kinds that take part in stack groups when a stacking mode is set.
    #[must_use]
    pub const fn supports_stacking(self) -> bool {
        matches!(
            self,
            Self::Line | Self::Spline(_) | Self::Step | Self::Area | Self::Column
        )
    }
}

/// Whether and how a series accumulates onto other members of its stack group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StackingMode {
    #[default]
    None,
    Normal,
    Percent,
}

impl StackingMode {
    #[must_use]
    pub const fn is_stacked(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Ordered samples plus the attributes that drive layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleSeries {
    pub samples: Vec<Sample>,
    pub group_name: Option<String>,
    pub draw_kind: DrawKind,
    pub is_visible: bool,
}

impl SampleSeries {
    #[must_use]
    pub fn new(draw_kind: DrawKind) -> Self {
        Self {
            samples: Vec::new(),
            group_name: None,
            draw_kind,
            is_visible: true,
        }
    }

    #[must_use]
    pub fn x_values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.x).collect()
    }

    #[must_use]
    pub fn y_values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.y).collect()
    }

    /// Replaces the data snapshot, renumbering sample indices by position.
    pub fn replace_samples(&mut self, mut samples: Vec<Sample>) {
        for (index, sample) in samples.iter_mut().enumerate() {
            sample.index = index;
        }
        self.samples = samples;
    }
}

/// 2D point in data space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
