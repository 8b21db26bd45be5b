//! series-geometry: data-to-geometry engine for statistical chart series.
//!
//! `core` holds the pure algorithms (spline solvers, stack accumulation,
//! circular layout, category grouping) and the segment value types. `api`
//! holds the stateful [`Chart`] that owns series, runs layout passes and
//! reuses segment records between passes. Pixel transforms and painting stay
//! with the host renderer.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{Chart, SeriesConfig, UpdateReport};
pub use error::{ChartError, ChartResult};
