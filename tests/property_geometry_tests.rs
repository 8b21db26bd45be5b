use proptest::prelude::*;
use series_geometry::core::{
    CircularFrame, CircularOptions, RadiusBand, SeriesId, SplineKind, StackInput, StackingMode,
    accumulate_group, layout_circular, spline_segments,
};

fn strictly_increasing_xs(gaps: &[f64]) -> Vec<f64> {
    let mut x = 0.0;
    gaps.iter()
        .map(|gap| {
            x += gap;
            x
        })
        .collect()
}

proptest! {
    #[test]
    fn normal_stacking_preserves_each_value_magnitude(
        columns in proptest::collection::vec(
            proptest::collection::vec(-1_000.0f64..1_000.0, 6),
            1..5
        )
    ) {
        let members: Vec<StackInput> = columns
            .iter()
            .enumerate()
            .map(|(i, values)| StackInput {
                series: SeriesId(i as u32),
                mode: StackingMode::Normal,
                slots: (0..values.len()).collect(),
                values: values.clone(),
            })
            .collect();

        let stacked = accumulate_group(&members);
        prop_assert_eq!(stacked.len(), members.len());
        for (member, extents) in members.iter().zip(&stacked) {
            for (i, value) in member.values.iter().enumerate() {
                let span = (extents.end[i] - extents.start[i]).abs();
                prop_assert!((span - value.abs()).abs() <= 1e-9);
                prop_assert!(extents.start[i] * extents.end[i] >= 0.0);
            }
        }
    }

    #[test]
    fn percent_stacking_stays_within_one_hundred(
        columns in proptest::collection::vec(
            proptest::collection::vec(-500.0f64..500.0, 4),
            1..6
        )
    ) {
        let members: Vec<StackInput> = columns
            .iter()
            .enumerate()
            .map(|(i, values)| StackInput {
                series: SeriesId(i as u32),
                mode: StackingMode::Percent,
                slots: (0..values.len()).collect(),
                values: values.clone(),
            })
            .collect();

        let slot_totals: Vec<f64> = (0..4)
            .map(|slot| columns.iter().map(|values| values[slot].abs()).sum())
            .collect();
        for (member, extents) in members.iter().zip(accumulate_group(&members)) {
            for (slot, value) in member.values.iter().enumerate() {
                let end = extents.end[slot];
                prop_assert!(end.is_finite());
                prop_assert!((-100.0..=100.0).contains(&end));

                let expected = if slot_totals[slot] > 0.0 {
                    value.abs() / slot_totals[slot] * 100.0
                } else {
                    0.0
                };
                let span = (end - extents.start[slot]).abs();
                prop_assert!((span - expected).abs() <= 1e-9);
            }
        }
    }

    #[test]
    fn spline_solvers_emit_finite_continuous_segments(
        gaps in proptest::collection::vec(0.01f64..50.0, 2..24),
        ys in proptest::collection::vec(-1_000.0f64..1_000.0, 24)
    ) {
        let xs = strictly_increasing_xs(&gaps);
        let ys = &ys[..xs.len()];
        for kind in [SplineKind::Natural, SplineKind::Cardinal, SplineKind::Monotonic] {
            let segments = spline_segments(kind, &xs, ys, None);
            prop_assert_eq!(segments.len(), xs.len() - 1);
            for segment in &segments {
                for point in [segment.p0, segment.c1, segment.c2, segment.p1] {
                    prop_assert!(point.x.is_finite() && point.y.is_finite());
                }
            }
            for pair in segments.windows(2) {
                prop_assert_eq!(pair[0].p1, pair[1].p0);
            }
        }
    }

    #[test]
    fn monotonic_controls_stay_inside_rising_intervals(
        gaps in proptest::collection::vec(0.01f64..50.0, 2..16),
        rises in proptest::collection::vec(0.0f64..100.0, 16)
    ) {
        let xs = strictly_increasing_xs(&gaps);
        let ys = strictly_increasing_xs(&rises[..xs.len()]);
        for segment in spline_segments(SplineKind::Monotonic, &xs, &ys, None) {
            let (lo, hi) = (segment.p0.y, segment.p1.y);
            for control in [segment.c1.y, segment.c2.y] {
                prop_assert!(control >= lo - 1e-9 && control <= hi + 1e-9);
            }
        }
    }

    #[test]
    fn proportional_sweeps_sum_to_the_arc(
        values in proptest::collection::vec(0.1f64..1_000.0, 1..12),
        start in -720.0f64..720.0,
        span in -720.0f64..720.0
    ) {
        let options = CircularOptions {
            start_angle: start,
            end_angle: start + span,
            ..CircularOptions::default()
        };
        let band = RadiusBand { inner: 0.0, outer: 1.0 };
        let plan = layout_circular(&values, &options, CircularFrame::default(), band);

        let swept: f64 = plan.slice_angles.iter().map(|slice| slice.sweep()).sum();
        prop_assert!((swept - plan.arc_length).abs() <= 1e-9);
        prop_assert!(plan.arc_length.abs() <= std::f64::consts::TAU + 1e-12);
        for pair in plan.slice_angles.windows(2) {
            prop_assert!((pair[0].end - pair[1].start).abs() <= 1e-12);
        }
    }
}
