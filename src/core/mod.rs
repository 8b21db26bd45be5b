pub mod category;
pub mod circular;
pub mod primitives;
pub mod segment;
pub mod spline;
pub mod stacking;
pub mod types;

pub use category::{
    CategoryAxis, CategoryGrouping, GroupedCategoryAxis, IndexedAxis, group_by_category,
};
pub use circular::{
    CardinalDirection, CircularFrame, CircularOptions, CircularPlan, GroupTo, GroupToMode,
    GroupedSlices, RadiusBand, SliceAngle, SliceSource, actual_center, arc_length,
    concentric_band, crossed_directions, group_to_others, layout_circular,
};
pub use segment::{
    AreaPolygon, CircleSegment, LineSegment, RecordId, RectSegment, SectorSegment,
    SegmentGeometry, SegmentRecord, SplineSegment, StepSegment,
};
pub use spline::{
    ControlPair, DateUnit, cardinal_control_points, cardinal_tangents, monotonic_coefficients,
    monotonic_control_points, natural_control_points, natural_second_derivatives,
    solve_control_points, spline_segments,
};
pub use stacking::{
    DEFAULT_STACK_GROUP, StackAccumulator, StackCacheStats, StackInput, StackValues,
    accumulate_group,
};
pub use types::{
    DrawKind, Point, Sample, SampleSeries, SeriesId, SourceItem, SplineKind, StackingMode,
};
