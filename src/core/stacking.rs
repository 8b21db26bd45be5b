//! Cumulative stacking of series that share a stack group.
//!
//! Positive and negative values accumulate on separate running totals per
//! slot (category), so a stack never mixes signs. Percent members are first
//! normalized against the per-slot sum of magnitudes across the whole group.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::primitives::finite_or_zero;
use crate::core::types::{SeriesId, StackingMode};

/// Group key used for stacked series without an explicit group name.
pub const DEFAULT_STACK_GROUP: &str = "";

/// One member's input to a group pass.
#[derive(Debug, Clone, PartialEq)]
pub struct StackInput {
    pub series: SeriesId,
    pub mode: StackingMode,
    /// Category slot of each value; equal slots stack onto each other.
    pub slots: Vec<usize>,
    pub values: Vec<f64>,
}

impl StackInput {
    fn shape(&self) -> (SeriesId, usize) {
        (self.series, self.values.len())
    }
}

/// Cumulative extents of one series, one entry per value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StackValues {
    pub start: Vec<f64>,
    pub end: Vec<f64>,
}

impl StackValues {
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct RunningTotal {
    positive: f64,
    negative: f64,
}

fn slot_magnitude_totals(members: &[StackInput]) -> HashMap<usize, f64> {
    let mut totals = HashMap::new();
    for member in members {
        for (&slot, &value) in member.slots.iter().zip(&member.values) {
            *totals.entry(slot).or_insert(0.0) += finite_or_zero(value).abs();
        }
    }
    totals
}

/// Accumulates `members` in order and returns their extents in the same order.
///
/// For a positive value `start` is the running positive total and
/// `end = start + value`; negative values do the same on the negative total.
/// Percent members have cumulative values clamped to `[0, 100]` (positive
/// side) and `[-100, 0]` (negative side).
#[must_use]
pub fn accumulate_group(members: &[StackInput]) -> Vec<StackValues> {
    let needs_totals = members
        .iter()
        .any(|member| member.mode == StackingMode::Percent);
    let totals = if needs_totals {
        slot_magnitude_totals(members)
    } else {
        HashMap::new()
    };

    let mut running: HashMap<usize, RunningTotal> = HashMap::new();
    let mut output = Vec::with_capacity(members.len());
    for member in members {
        let percent = member.mode == StackingMode::Percent;
        let mut values = StackValues {
            start: Vec::with_capacity(member.values.len()),
            end: Vec::with_capacity(member.values.len()),
        };

        for (&slot, &raw) in member.slots.iter().zip(&member.values) {
            let mut value = finite_or_zero(raw);
            if percent {
                let total = totals.get(&slot).copied().unwrap_or(0.0);
                value = finite_or_zero(value / total * 100.0);
            }

            let total = running.entry(slot).or_default();
            let (start, end) = if value >= 0.0 {
                let start = total.positive;
                let mut end = start + value;
                if percent {
                    end = end.clamp(0.0, 100.0);
                }
                total.positive = end;
                (start, end)
            } else {
                let start = total.negative;
                let mut end = start + value;
                if percent {
                    end = end.clamp(-100.0, 0.0);
                }
                total.negative = end;
                (start, end)
            };
            values.start.push(start);
            values.end.push(end);
        }
        output.push(values);
    }
    output
}

/// Cache hit/miss counters of the stack accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StackCacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
struct StackGroupCache {
    dirty: bool,
    shape: SmallVec<[(SeriesId, usize); 4]>,
    values: IndexMap<SeriesId, Arc<StackValues>>,
}

/// Per-chart owner of every stack group's published extents.
///
/// A group is recomputed as a whole and published atomically, so a sibling
/// never observes half-updated values.
#[derive(Debug, Default)]
pub struct StackAccumulator {
    groups: IndexMap<String, StackGroupCache>,
    stats: StackCacheStats,
}

impl StackAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stats(&self) -> StackCacheStats {
        self.stats
    }

    /// Marks a group for recomputation on its next `ensure_group`.
    pub fn invalidate_group(&mut self, group: &str) {
        if let Some(cache) = self.groups.get_mut(group) {
            cache.dirty = true;
        }
    }

    pub fn invalidate_all(&mut self) {
        for cache in self.groups.values_mut() {
            cache.dirty = true;
        }
    }

    /// Detaches a series from whatever group holds its values.
    pub fn remove_series(&mut self, series: SeriesId) {
        for cache in self.groups.values_mut() {
            if cache.values.shift_remove(&series).is_some() {
                cache.dirty = true;
            }
        }
    }

    /// Drops groups that no longer have members.
    pub fn retain_groups(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.groups.retain(|name, _| keep(name));
    }

    /// Returns `true` when the group was recomputed, `false` on a cache hit.
    ///
    /// A group whose member set or value counts changed since the last pass is
    /// always recomputed in full.
    pub fn ensure_group(&mut self, group: &str, members: &[StackInput]) -> bool {
        let shape: SmallVec<[(SeriesId, usize); 4]> =
            members.iter().map(StackInput::shape).collect();
        let cache = self.groups.entry(group.to_owned()).or_insert_with(|| StackGroupCache {
            dirty: true,
            ..StackGroupCache::default()
        });

        if !cache.dirty && cache.shape == shape {
            self.stats.hits += 1;
            trace!(group, "stack group cache hit");
            return false;
        }

        let computed = accumulate_group(members);
        let published: IndexMap<SeriesId, Arc<StackValues>> = members
            .iter()
            .zip(computed)
            .map(|(member, values)| (member.series, Arc::new(values)))
            .collect();

        cache.values = published;
        cache.shape = shape;
        cache.dirty = false;
        self.stats.misses += 1;
        debug!(group, members = members.len(), "recomputed stack group");
        true
    }

    /// Published extents of `series`, if it belongs to a computed group.
    #[must_use]
    pub fn values(&self, series: SeriesId) -> Option<Arc<StackValues>> {
        self.groups
            .values()
            .find_map(|cache| cache.values.get(&series).cloned())
    }
}
