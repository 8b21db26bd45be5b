use series_geometry::api::{SeriesState, SeriesConfig};
use series_geometry::core::{
    DrawKind, GroupedCategoryAxis, RecordId, Sample, SourceItem, SplineKind,
};
use series_geometry::{Chart, ChartError};

fn samples(ys: &[f64]) -> Vec<Sample> {
    ys.iter()
        .enumerate()
        .map(|(i, y)| Sample::new(i, i as f64, *y))
        .collect()
}

fn record_ids(chart: &Chart, id: series_geometry::core::SeriesId) -> Vec<RecordId> {
    chart
        .segments(id)
        .expect("segments")
        .iter()
        .map(|record| record.record_id)
        .collect()
}

#[test]
fn rebuilding_unchanged_column_series_reuses_every_record() {
    let mut chart = Chart::new();
    let id = chart.add_series(SeriesConfig::new(DrawKind::Column));
    chart
        .set_samples(id, samples(&[1.0, 2.0, 3.0, 4.0, 5.0]))
        .expect("set samples");
    assert!(chart.update().is_clean());
    let first = record_ids(&chart, id);
    assert_eq!(first.len(), 5);

    chart
        .set_samples(id, samples(&[1.0, 2.0, 3.0, 4.0, 5.0]))
        .expect("set samples again");
    let report = chart.update();
    assert_eq!(report.built, vec![id]);

    assert_eq!(record_ids(&chart, id), first);
    assert_eq!(chart.allocations(id).expect("allocations"), 5);
    let stats = chart.last_build_stats(id).expect("stats");
    assert_eq!(stats.reused, 5);
    assert_eq!(stats.allocated, 0);
    assert!(!stats.rebuilt_from_scratch);
}

#[test]
fn shrinking_series_truncates_surplus_records() {
    let mut chart = Chart::new();
    let id = chart.add_series(SeriesConfig::new(DrawKind::Scatter));
    chart
        .set_samples(id, samples(&[1.0, 2.0, 3.0, 4.0, 5.0]))
        .expect("set samples");
    chart.update();
    let before = record_ids(&chart, id);

    chart
        .set_samples(id, samples(&[7.0, 8.0, 9.0]))
        .expect("shrink");
    chart.update();

    assert_eq!(record_ids(&chart, id), before[..3].to_vec());
    let stats = chart.last_build_stats(id).expect("stats");
    assert_eq!(stats.removed, 2);
    let first = chart.segments(id).expect("segments")[0]
        .geometry
        .as_circle()
        .copied()
        .expect("circle");
    assert_eq!(first.cy, 7.0);
}

#[test]
fn pairwise_kinds_emit_one_segment_per_consecutive_pair() {
    let mut chart = Chart::new();
    let line = chart.add_series(SeriesConfig::new(DrawKind::Line));
    let spline = chart.add_series(SeriesConfig::new(DrawKind::Spline(SplineKind::Monotonic)));
    let step = chart.add_series(SeriesConfig::new(DrawKind::Step));
    for id in [line, spline, step] {
        chart
            .set_samples(id, samples(&[1.0, 4.0, 2.0, 6.0]))
            .expect("set samples");
    }
    assert!(chart.update().is_clean());

    for id in [line, spline, step] {
        assert_eq!(chart.segments(id).expect("segments").len(), 3);
    }
    let corner = chart.segments(step).expect("segments")[0]
        .geometry
        .as_step()
        .expect("step")
        .corner();
    assert_eq!((corner.x, corner.y), (1.0, 1.0));
}

#[test]
fn untouched_series_is_not_rebuilt() {
    let mut chart = Chart::new();
    let a = chart.add_series(SeriesConfig::new(DrawKind::Line));
    let b = chart.add_series(SeriesConfig::new(DrawKind::Line));
    chart.set_samples(a, samples(&[1.0, 2.0])).expect("a");
    chart.set_samples(b, samples(&[3.0, 4.0])).expect("b");
    chart.update();

    chart.set_samples(a, samples(&[5.0, 6.0])).expect("a again");
    let report = chart.update();
    assert_eq!(report.built, vec![a]);
    assert!(chart.pending_invalidation(b).expect("pending").is_empty());
}

#[test]
fn grouped_axis_always_rebuilds_from_scratch() {
    let mut chart = Chart::with_axis(GroupedCategoryAxis::new());
    let id = chart.add_series(SeriesConfig::new(DrawKind::Column));
    chart
        .set_samples(
            id,
            vec![
                Sample::new(0, 10.0, 1.0),
                Sample::new(1, 20.0, 2.0),
                Sample::new(2, 10.0, 3.0),
            ],
        )
        .expect("set samples");
    chart.update();
    let first = chart
        .segments(id)
        .expect("segments")
        .iter()
        .map(|r| r.record_id)
        .collect::<Vec<_>>();

    let report = chart.update();
    assert_eq!(report.built, vec![id]);
    let stats = chart.last_build_stats(id).expect("stats");
    assert!(stats.rebuilt_from_scratch);
    assert_eq!(stats.allocated, 3);
    let second = chart
        .segments(id)
        .expect("segments")
        .iter()
        .map(|r| r.record_id)
        .collect::<Vec<_>>();
    assert!(first.iter().all(|old| !second.contains(old)));

    // Category 10 comes first with its larger value leading.
    let laid_out = chart.laid_out_samples(id).expect("laid out");
    assert_eq!(
        laid_out.iter().map(|s| (s.x, s.y)).collect::<Vec<_>>(),
        vec![(0.0, 3.0), (0.0, 1.0), (1.0, 2.0)]
    );
}

#[test]
fn segments_point_back_to_their_source_items() {
    let mut chart = Chart::new();
    let id = chart.add_series(SeriesConfig::new(DrawKind::Bubble));
    let items: Vec<SourceItem> = (0..3).map(|i| SourceItem::new(format!("row-{i}"))).collect();
    let data: Vec<Sample> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Sample::new(i, i as f64, 1.0)
                .with_size(1.0 + i as f64)
                .with_source(item.clone())
        })
        .collect();
    chart.set_samples(id, data).expect("set samples");
    chart.update();

    let records = chart.segments(id).expect("segments");
    assert_eq!(records.len(), 3);
    for (record, item) in records.iter().zip(&items) {
        let source = record.source.as_ref().expect("source");
        assert!(source.ptr_eq(item));
    }
    assert_eq!(
        records[2]
            .source
            .as_ref()
            .and_then(|s| s.downcast_ref::<String>())
            .map(String::as_str),
        Some("row-2")
    );
}

#[test]
fn disposed_series_rejects_further_use() {
    let mut chart = Chart::new();
    let id = chart.add_series(SeriesConfig::new(DrawKind::Line));
    assert_eq!(chart.series_state(id).expect("state"), SeriesState::Uninitialized);
    chart.set_samples(id, samples(&[1.0, 2.0])).expect("set samples");
    chart.update();
    assert_eq!(chart.series_state(id).expect("state"), SeriesState::Populated);

    chart.set_samples(id, samples(&[2.0, 3.0])).expect("set samples");
    assert_eq!(chart.series_state(id).expect("state"), SeriesState::Updated);
    chart.update();

    chart.remove_series(id).expect("remove");
    assert_eq!(chart.series_state(id).expect("state"), SeriesState::Disposed);
    assert!(matches!(chart.segments(id), Err(ChartError::SeriesDisposed(_))));
    assert!(matches!(
        chart.set_samples(id, samples(&[1.0])),
        Err(ChartError::SeriesDisposed(_))
    ));
    assert!(chart.update().built.is_empty());
}

#[test]
fn unknown_series_is_reported() {
    let mut chart = Chart::new();
    let missing = series_geometry::core::SeriesId(42);
    assert!(matches!(
        chart.set_visible(missing, false),
        Err(ChartError::UnknownSeries(_))
    ));
}

#[test]
fn hidden_series_is_skipped_until_shown() {
    let mut chart = Chart::new();
    let id = chart.add_series(SeriesConfig::new(DrawKind::Line).with_visible(false));
    chart.set_samples(id, samples(&[1.0, 2.0, 3.0])).expect("set samples");
    let report = chart.update();
    assert_eq!(report.skipped, vec![id]);
    assert!(chart.segments(id).expect("segments").is_empty());

    chart.set_visible(id, true).expect("show");
    let report = chart.update();
    assert_eq!(report.built, vec![id]);
    assert_eq!(chart.segments(id).expect("segments").len(), 2);
}
