use std::sync::Arc;

use indexmap::IndexMap;

use crate::core::{
    CategoryAxis, CircularPlan, IndexedAxis, Sample, SampleSeries, SegmentRecord, SeriesId,
    StackAccumulator, StackCacheStats, StackValues,
};
use crate::error::{ChartError, ChartResult};

mod data_controller;
mod invalidation;
mod layout_pass;
mod segment_builder;
mod segment_projection;
mod series_config;

pub use invalidation::{InvalidationTopic, InvalidationTopics};
pub use layout_pass::UpdateReport;
pub use segment_builder::{BuildStats, SegmentBuilder, SegmentDraft, SeriesState};
pub use segment_projection::{
    SideBySideSlot, effective_values, min_x_delta, project_area, project_bubbles,
    project_columns, project_lines, project_polar, project_scatter, project_sectors,
    project_splines, project_steps,
};
pub use series_config::{
    AreaConfig, BubbleConfig, CardinalConfig, CircularConfig, ColumnConfig, PolarConfig,
    SERIES_CONFIG_JSON_SCHEMA_V1, ScatterConfig, SeriesConfig, SeriesConfigJsonContractV1,
};

/// Host-side provider of a series' current data snapshot.
pub trait SampleSource {
    fn samples(&self) -> Vec<Sample>;
}

impl SampleSource for [Sample] {
    fn samples(&self) -> Vec<Sample> {
        self.to_vec()
    }
}

impl SampleSource for Vec<Sample> {
    fn samples(&self) -> Vec<Sample> {
        self.clone()
    }
}

#[derive(Debug)]
struct SeriesEntry {
    series: SampleSeries,
    config: SeriesConfig,
    builder: SegmentBuilder,
    pending: InvalidationTopics,
    /// Samples in layout order (reordered in grouped mode).
    laid_out: Vec<Sample>,
    plan: Option<CircularPlan>,
    column_slot: Option<SideBySideSlot>,
}

impl SeriesEntry {
    fn is_disposed(&self) -> bool {
        self.builder.state() == SeriesState::Disposed
    }

    /// Stack group key when the series currently takes part in stacking.
    fn stack_key(&self) -> Option<&str> {
        if !self.series.is_visible || !self.config.is_stacked() || self.is_disposed() {
            return None;
        }
        Some(
            self.series
                .group_name
                .as_deref()
                .unwrap_or(crate::core::DEFAULT_STACK_GROUP),
        )
    }
}

/// Stateful owner of every series of one chart.
///
/// The host mutates data and configuration, then calls [`Chart::update`] to run
/// one synchronous layout pass: stack groups, circular plans, then segments.
#[derive(Debug)]
pub struct Chart<A: CategoryAxis = IndexedAxis> {
    axis: A,
    series: IndexMap<SeriesId, SeriesEntry>,
    stacks: StackAccumulator,
    next_id: u32,
}

impl Chart<IndexedAxis> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_axis(IndexedAxis)
    }
}

impl Default for Chart<IndexedAxis> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: CategoryAxis> Chart<A> {
    #[must_use]
    pub fn with_axis(axis: A) -> Self {
        Self {
            axis,
            series: IndexMap::new(),
            stacks: StackAccumulator::new(),
            next_id: 0,
        }
    }

    #[must_use]
    pub fn axis(&self) -> &A {
        &self.axis
    }

    /// Ids of every registered series, disposed ones included, in registration order.
    #[must_use]
    pub fn series_ids(&self) -> Vec<SeriesId> {
        self.series.keys().copied().collect()
    }

    fn entry(&self, id: SeriesId) -> ChartResult<&SeriesEntry> {
        let entry = self.series.get(&id).ok_or(ChartError::UnknownSeries(id))?;
        if entry.is_disposed() {
            return Err(ChartError::SeriesDisposed(id));
        }
        Ok(entry)
    }

    fn entry_mut(&mut self, id: SeriesId) -> ChartResult<&mut SeriesEntry> {
        let entry = self
            .series
            .get_mut(&id)
            .ok_or(ChartError::UnknownSeries(id))?;
        if entry.is_disposed() {
            return Err(ChartError::SeriesDisposed(id));
        }
        Ok(entry)
    }

    pub fn series_state(&self, id: SeriesId) -> ChartResult<SeriesState> {
        self.series
            .get(&id)
            .map(|entry| entry.builder.state())
            .ok_or(ChartError::UnknownSeries(id))
    }

    pub fn config(&self, id: SeriesId) -> ChartResult<&SeriesConfig> {
        Ok(&self.entry(id)?.config)
    }

    /// Raw samples as last supplied by the host.
    pub fn samples(&self, id: SeriesId) -> ChartResult<&[Sample]> {
        Ok(&self.entry(id)?.series.samples)
    }

    /// Samples in the order segments were built from.
    pub fn laid_out_samples(&self, id: SeriesId) -> ChartResult<&[Sample]> {
        Ok(&self.entry(id)?.laid_out)
    }

    /// Current segments of a series, in index order.
    pub fn segments(&self, id: SeriesId) -> ChartResult<&[SegmentRecord]> {
        Ok(self.entry(id)?.builder.records())
    }

    /// Plan of the last circular layout pass, for circular series.
    pub fn circular_plan(&self, id: SeriesId) -> ChartResult<Option<&CircularPlan>> {
        Ok(self.entry(id)?.plan.as_ref())
    }

    pub fn last_build_stats(&self, id: SeriesId) -> ChartResult<BuildStats> {
        Ok(self.entry(id)?.builder.last_stats())
    }

    pub fn allocations(&self, id: SeriesId) -> ChartResult<u64> {
        Ok(self.entry(id)?.builder.allocations())
    }

    /// Published cumulative extents of a stacked series.
    #[must_use]
    pub fn stack_values(&self, id: SeriesId) -> Option<Arc<StackValues>> {
        self.stacks.values(id)
    }

    #[must_use]
    pub fn stack_stats(&self) -> StackCacheStats {
        self.stacks.stats()
    }

    pub fn pending_invalidation(&self, id: SeriesId) -> ChartResult<InvalidationTopics> {
        Ok(self.entry(id)?.pending)
    }
}
