use tracing::debug;

use crate::core::{CategoryAxis, Sample, SampleSeries, SeriesId};
use crate::error::ChartResult;

use super::{
    Chart, InvalidationTopic, InvalidationTopics, SampleSource, SegmentBuilder, SeriesConfig,
    SeriesEntry,
};

impl<A: CategoryAxis> Chart<A> {
    /// Registers a series and returns its handle. The config is sanitized first.
    pub fn add_series(&mut self, config: SeriesConfig) -> SeriesId {
        let id = SeriesId(self.next_id);
        self.next_id += 1;

        let config = config.sanitized();
        let mut series = SampleSeries::new(config.draw_kind);
        series.group_name = config.group_name.clone();
        series.is_visible = config.visible;

        let entry = SeriesEntry {
            series,
            config,
            builder: SegmentBuilder::new(id),
            pending: InvalidationTopics::all(),
            laid_out: Vec::new(),
            plan: None,
            column_slot: None,
        };
        let group = entry.stack_key().map(str::to_owned);
        self.series.insert(id, entry);
        if let Some(group) = group {
            self.invalidate_stack_group(&group, InvalidationTopic::GroupMembership);
        }
        debug!(series = %id, "added series");
        id
    }

    /// Disposes a series: releases its records and detaches it from stack
    /// groups and circular plans. The handle stays known as disposed.
    pub fn remove_series(&mut self, id: SeriesId) -> ChartResult<()> {
        let entry = self.entry_mut(id)?;
        let group = entry.stack_key().map(str::to_owned);
        entry.builder.dispose();
        entry.plan = None;
        entry.laid_out = Vec::new();
        entry.series.samples = Vec::new();

        self.stacks.remove_series(id);
        if let Some(group) = group {
            self.invalidate_stack_group(&group, InvalidationTopic::GroupMembership);
        }
        self.invalidate_layout_peers();
        debug!(series = %id, "disposed series");
        Ok(())
    }

    /// Replaces the data snapshot of a series wholesale.
    pub fn set_samples(&mut self, id: SeriesId, samples: Vec<Sample>) -> ChartResult<()> {
        let entry = self.entry_mut(id)?;
        let original_count = entry.series.samples.len();
        entry.series.replace_samples(samples);
        debug!(
            series = %id,
            original_count,
            count = entry.series.samples.len(),
            "set samples"
        );
        let group = entry.stack_key().map(str::to_owned);
        self.mark(id, InvalidationTopic::Data);
        if let Some(group) = group {
            self.invalidate_stack_group(&group, InvalidationTopic::Data);
        }
        Ok(())
    }

    /// Pulls a fresh snapshot from the host.
    pub fn refresh_from<S: SampleSource + ?Sized>(
        &mut self,
        id: SeriesId,
        source: &S,
    ) -> ChartResult<()> {
        self.set_samples(id, source.samples())
    }

    pub fn set_config(&mut self, id: SeriesId, config: SeriesConfig) -> ChartResult<()> {
        let config = config.sanitized();
        let entry = self.entry_mut(id)?;
        let old_group = entry.stack_key().map(str::to_owned);
        entry.series.draw_kind = config.draw_kind;
        entry.series.group_name = config.group_name.clone();
        entry.series.is_visible = config.visible;
        entry.config = config;
        let new_group = entry.stack_key().map(str::to_owned);

        self.mark(id, InvalidationTopic::Config);
        for group in [old_group, new_group].into_iter().flatten() {
            self.invalidate_stack_group(&group, InvalidationTopic::GroupMembership);
        }
        self.invalidate_layout_peers();
        Ok(())
    }

    pub fn set_group_name(&mut self, id: SeriesId, group_name: Option<String>) -> ChartResult<()> {
        let entry = self.entry_mut(id)?;
        if entry.series.group_name == group_name {
            return Ok(());
        }
        let old_group = entry.stack_key().map(str::to_owned);
        entry.series.group_name = group_name.clone();
        entry.config.group_name = group_name;
        let new_group = entry.stack_key().map(str::to_owned);

        self.mark(id, InvalidationTopic::GroupMembership);
        for group in [old_group, new_group].into_iter().flatten() {
            self.invalidate_stack_group(&group, InvalidationTopic::GroupMembership);
        }
        self.invalidate_layout_peers();
        Ok(())
    }

    pub fn set_visible(&mut self, id: SeriesId, visible: bool) -> ChartResult<()> {
        let entry = self.entry_mut(id)?;
        if entry.series.is_visible == visible {
            return Ok(());
        }
        let old_group = entry.stack_key().map(str::to_owned);
        entry.series.is_visible = visible;
        entry.config.visible = visible;
        let new_group = entry.stack_key().map(str::to_owned);

        self.mark(id, InvalidationTopic::Visibility);
        for group in [old_group, new_group].into_iter().flatten() {
            self.invalidate_stack_group(&group, InvalidationTopic::Visibility);
        }
        self.invalidate_layout_peers();
        Ok(())
    }

    /// Forces a full rebuild of every series on the next pass.
    pub fn invalidate_all(&mut self) {
        for entry in self.series.values_mut() {
            entry.pending = InvalidationTopics::all();
            entry.builder.invalidate();
        }
        self.stacks.invalidate_all();
    }

    pub(super) fn mark(&mut self, id: SeriesId, topic: InvalidationTopic) {
        if let Some(entry) = self.series.get_mut(&id) {
            entry.pending.insert(topic);
            entry.builder.invalidate();
        }
    }

    /// Marks every member of a stack group dirty and drops its cached values.
    pub(super) fn invalidate_stack_group(&mut self, group: &str, topic: InvalidationTopic) {
        self.stacks.invalidate_group(group);
        let members: Vec<SeriesId> = self
            .series
            .iter()
            .filter(|(_, entry)| entry.stack_key() == Some(group))
            .map(|(id, _)| *id)
            .collect();
        for id in members {
            self.mark(id, topic);
        }
    }

    /// Side-by-side columns and concentric circular bands depend on which
    /// siblings are visible; any membership change dirties them.
    fn invalidate_layout_peers(&mut self) {
        let peers: Vec<SeriesId> = self
            .series
            .iter()
            .filter(|(_, entry)| {
                !entry.is_disposed()
                    && (entry.series.draw_kind.is_circular()
                        || entry.series.draw_kind == crate::core::DrawKind::Column)
            })
            .map(|(id, _)| *id)
            .collect();
        for id in peers {
            self.mark(id, InvalidationTopic::Layout);
        }
    }
}
