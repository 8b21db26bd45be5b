use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{RecordId, SegmentGeometry, SegmentRecord, SeriesId, SourceItem};
use crate::error::{ChartError, ChartResult};

/// Lifecycle of a series' segment list.
///
/// `Uninitialized -> Populated <-> Updated -> Disposed`: a rebuild request moves
/// a populated series to `Updated`, and the next successful build brings it
/// back to `Populated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SeriesState {
    #[default]
    Uninitialized,
    Populated,
    Updated,
    Disposed,
}

/// Record bookkeeping of the last build pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildStats {
    pub reused: usize,
    pub allocated: usize,
    pub removed: usize,
    pub rebuilt_from_scratch: bool,
}

/// Geometry for one index, before it is written into a record.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDraft {
    pub index: usize,
    pub source: Option<SourceItem>,
    pub geometry: SegmentGeometry,
}

/// Owns a series' segment records and applies the reuse protocol.
///
/// Records at indices shared with the previous pass are overwritten in place
/// and keep their `record_id`; extra drafts append new records and surplus
/// records are truncated. Grouped-mode passes clear and rebuild.
#[derive(Debug)]
pub struct SegmentBuilder {
    series: SeriesId,
    records: Vec<SegmentRecord>,
    state: SeriesState,
    next_record_id: u64,
    allocations: u64,
    last_stats: BuildStats,
}

impl SegmentBuilder {
    #[must_use]
    pub fn new(series: SeriesId) -> Self {
        Self {
            series,
            records: Vec::new(),
            state: SeriesState::Uninitialized,
            next_record_id: 0,
            allocations: 0,
            last_stats: BuildStats::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> SeriesState {
        self.state
    }

    #[must_use]
    pub fn records(&self) -> &[SegmentRecord] {
        &self.records
    }

    #[must_use]
    pub fn last_stats(&self) -> BuildStats {
        self.last_stats
    }

    /// Total records ever allocated by this builder.
    #[must_use]
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    /// Flags a populated series as awaiting a rebuild.
    pub fn invalidate(&mut self) {
        if self.state == SeriesState::Populated {
            self.state = SeriesState::Updated;
        }
    }

    /// Releases every record. Further builds are rejected.
    pub fn dispose(&mut self) {
        self.records = Vec::new();
        self.state = SeriesState::Disposed;
    }

    fn allocate(&mut self, draft: SegmentDraft) -> SegmentRecord {
        let record_id = RecordId(self.next_record_id);
        self.next_record_id += 1;
        self.allocations += 1;
        SegmentRecord {
            record_id,
            index: draft.index,
            source: draft.source,
            geometry: draft.geometry,
        }
    }

    /// Writes `drafts` into the record list.
    ///
    /// With `rebuild` set every existing record is dropped first.
    pub fn sync(&mut self, drafts: Vec<SegmentDraft>, rebuild: bool) -> ChartResult<BuildStats> {
        if self.state == SeriesState::Disposed {
            return Err(ChartError::SeriesDisposed(self.series));
        }

        let mut stats = BuildStats {
            rebuilt_from_scratch: rebuild,
            ..BuildStats::default()
        };
        if rebuild {
            stats.removed = self.records.len();
            self.records.clear();
        }

        let previous = self.records.len();
        if drafts.len() < previous {
            stats.removed += previous - drafts.len();
            self.records.truncate(drafts.len());
        }

        for (position, draft) in drafts.into_iter().enumerate() {
            if let Some(record) = self.records.get_mut(position) {
                record.index = draft.index;
                record.source = draft.source;
                record.geometry = draft.geometry;
                stats.reused += 1;
            } else {
                let record = self.allocate(draft);
                self.records.push(record);
                stats.allocated += 1;
            }
        }

        self.state = SeriesState::Populated;
        self.last_stats = stats;
        trace!(
            series = %self.series,
            reused = stats.reused,
            allocated = stats.allocated,
            removed = stats.removed,
            rebuild,
            "synced segment records"
        );
        Ok(stats)
    }
}
