use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::{
    CategoryAxis, DrawKind, SeriesId, StackInput, StackValues, concentric_band,
    group_by_category, layout_circular,
};
use crate::error::{ChartError, ChartResult};

use super::segment_projection::{
    effective_values, project_area, project_bubbles, project_columns, project_lines,
    project_polar, project_scatter, project_sectors, project_splines, project_steps,
};
use super::{Chart, InvalidationTopic, SegmentDraft, SeriesEntry, SideBySideSlot};

/// Outcome of one [`Chart::update`] pass.
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub built: Vec<SeriesId>,
    /// Hidden series left untouched by this pass.
    pub skipped: Vec<SeriesId>,
    pub failed: Vec<(SeriesId, ChartError)>,
    pub recomputed_groups: Vec<String>,
}

impl UpdateReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

fn build_drafts(
    entry: &SeriesEntry,
    stack: Option<&StackValues>,
) -> ChartResult<Vec<SegmentDraft>> {
    let samples = &entry.laid_out;
    let config = &entry.config;

    if config.is_stacked() {
        let Some(stack) = stack else {
            return Err(ChartError::InvalidData(
                "stacked series has no published stack values".to_owned(),
            ));
        };
        if stack.len() != samples.len() {
            return Err(ChartError::InvalidData(format!(
                "stack values cover {} samples, series has {}",
                stack.len(),
                samples.len()
            )));
        }
    }

    let ys = effective_values(samples, stack);
    let drafts = match entry.series.draw_kind {
        DrawKind::Line => project_lines(samples, &ys),
        DrawKind::Step => project_steps(samples, &ys),
        DrawKind::Spline(kind) => project_splines(samples, &ys, kind, config.cardinal.date_unit),
        DrawKind::Area => project_area(samples, &ys, config.area.origin, stack),
        DrawKind::Column => project_columns(
            samples,
            &ys,
            &config.column,
            entry.column_slot.unwrap_or_default(),
            stack,
        ),
        DrawKind::Bubble => project_bubbles(samples, &config.bubble),
        DrawKind::Scatter => project_scatter(samples, config.scatter.radius),
        DrawKind::Polar => project_polar(samples, &config.polar),
        DrawKind::Pie | DrawKind::Doughnut => entry
            .plan
            .as_ref()
            .map(|plan| project_sectors(samples, plan, &config.circular))
            .unwrap_or_default(),
    };
    Ok(drafts)
}

impl<A: CategoryAxis> Chart<A> {
    /// Runs one synchronous layout pass over every dirty series.
    ///
    /// Stack groups are computed and published before any member builds,
    /// circular plans before sectors are emitted. A failing series is
    /// reported and left dirty without affecting its siblings.
    pub fn update(&mut self) -> UpdateReport {
        let grouped = self.axis.is_grouped();
        let mut report = UpdateReport::default();

        self.prepare_samples(grouped);
        self.update_stack_groups(grouped, &mut report);
        self.update_circular_plans();
        self.update_column_slots();

        for (id, entry) in &mut self.series {
            if entry.is_disposed() {
                continue;
            }
            if !entry.series.is_visible {
                report.skipped.push(*id);
                continue;
            }
            let category_bound = grouped && !entry.series.draw_kind.is_circular();
            if entry.pending.is_empty() && !category_bound {
                continue;
            }

            let stack = if entry.config.is_stacked() {
                self.stacks.values(*id)
            } else {
                None
            };
            let result = build_drafts(entry, stack.as_deref())
                .and_then(|drafts| entry.builder.sync(drafts, category_bound));
            match result {
                Ok(_) => {
                    entry.pending.clear();
                    report.built.push(*id);
                }
                Err(err) => {
                    warn!(series = %id, error = %err, "skipping series build");
                    report.failed.push((*id, err));
                }
            }
        }

        debug!(
            built = report.built.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            groups = report.recomputed_groups.len(),
            "layout pass complete"
        );
        report
    }

    /// Refreshes each series' layout-order samples. Grouped axes reorder
    /// every category-bound series on every pass.
    fn prepare_samples(&mut self, grouped: bool) {
        if grouped {
            let xs: Vec<f64> = self
                .series
                .values()
                .filter(|entry| {
                    !entry.is_disposed()
                        && entry.series.is_visible
                        && !entry.series.draw_kind.is_circular()
                })
                .flat_map(|entry| entry.series.samples.iter().map(|s| s.x))
                .collect();
            self.axis.prepare(&xs);
        }

        for entry in self.series.values_mut() {
            if entry.is_disposed() || !entry.series.is_visible {
                continue;
            }
            if grouped && !entry.series.draw_kind.is_circular() {
                let grouping = group_by_category(&entry.series.samples, &self.axis);
                entry.laid_out = grouping.apply(&entry.series.samples);
            } else if !entry.pending.is_empty() {
                entry.laid_out = entry.series.samples.clone();
            }
        }
    }

    fn update_stack_groups(&mut self, grouped: bool, report: &mut UpdateReport) {
        let mut groups: IndexMap<String, Vec<SeriesId>> = IndexMap::new();
        for (id, entry) in &self.series {
            if let Some(key) = entry.stack_key() {
                groups.entry(key.to_owned()).or_default().push(*id);
            }
        }

        for (group, members) in &groups {
            let inputs: Vec<StackInput> = members
                .iter()
                .filter_map(|id| self.series.get(id).map(|entry| (id, entry)))
                .map(|(id, entry)| StackInput {
                    series: *id,
                    mode: entry.config.stacking,
                    slots: if grouped {
                        entry.laid_out.iter().map(|s| s.x as usize).collect()
                    } else {
                        (0..entry.laid_out.len()).collect()
                    },
                    values: entry.laid_out.iter().map(|s| s.y).collect(),
                })
                .collect();

            if grouped {
                self.stacks.invalidate_group(group);
            }
            if self.stacks.ensure_group(group, &inputs) {
                report.recomputed_groups.push(group.clone());
                for id in members {
                    self.mark(*id, InvalidationTopic::Layout);
                }
            }
        }

        self.stacks.retain_groups(|name| groups.contains_key(name));
    }

    fn update_circular_plans(&mut self) {
        let circular: Vec<SeriesId> = self
            .series
            .iter()
            .filter(|(_, entry)| {
                !entry.is_disposed()
                    && entry.series.is_visible
                    && entry.series.draw_kind.is_circular()
            })
            .map(|(id, _)| *id)
            .collect();
        let count = circular.len();

        for (band_index, id) in circular.iter().enumerate() {
            let Some(entry) = self.series.get_mut(id) else {
                continue;
            };
            let circular_config = &entry.config.circular;
            let outer = circular_config.outer_ratio;
            let hole = if entry.series.draw_kind == DrawKind::Doughnut {
                outer * circular_config.inner_ratio
            } else {
                0.0
            };
            let band = concentric_band(band_index, count, hole, outer);
            let stale = entry.plan.as_ref().is_none_or(|plan| plan.band != band);
            if entry.pending.is_empty() && !stale {
                continue;
            }

            let values: Vec<f64> = entry.laid_out.iter().map(|s| s.y).collect();
            entry.plan = Some(layout_circular(
                &values,
                &circular_config.layout,
                circular_config.frame,
                band,
            ));
            entry.pending.insert(InvalidationTopic::Layout);
        }
    }

    fn update_column_slots(&mut self) {
        let mut keys: IndexMap<String, usize> = IndexMap::new();
        let mut assignments: Vec<(SeriesId, usize)> = Vec::new();
        for (id, entry) in &self.series {
            if entry.is_disposed()
                || !entry.series.is_visible
                || entry.series.draw_kind != DrawKind::Column
            {
                continue;
            }
            let key = match entry.stack_key() {
                Some(group) => format!("stack:{group}"),
                None => format!("series:{}", id.0),
            };
            let next = keys.len();
            let index = *keys.entry(key).or_insert(next);
            assignments.push((*id, index));
        }

        let count = keys.len();
        for (id, index) in assignments {
            let slot = SideBySideSlot { index, count };
            if let Some(entry) = self.series.get_mut(&id) {
                if entry.column_slot != Some(slot) {
                    entry.column_slot = Some(slot);
                    entry.pending.insert(InvalidationTopic::Layout);
                }
            }
        }
    }
}
