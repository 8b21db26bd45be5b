use criterion::{Criterion, criterion_group, criterion_main};
use series_geometry::api::SeriesConfig;
use series_geometry::core::{
    CircularFrame, CircularOptions, DrawKind, GroupTo, GroupToMode, RadiusBand, Sample, SeriesId,
    SplineKind, StackInput, StackingMode, accumulate_group, layout_circular, spline_segments,
};
use series_geometry::Chart;
use std::hint::black_box;

fn wave(count: usize) -> (Vec<f64>, Vec<f64>) {
    let xs: Vec<f64> = (0..count).map(|i| i as f64).collect();
    let ys: Vec<f64> = xs
        .iter()
        .map(|x| (x * 0.01).sin() * 100.0 + (x * 0.37).cos() * 5.0)
        .collect();
    (xs, ys)
}

fn bench_spline_solvers_10k(c: &mut Criterion) {
    let (xs, ys) = wave(10_000);
    for (name, kind) in [
        ("natural_spline_10k", SplineKind::Natural),
        ("cardinal_spline_10k", SplineKind::Cardinal),
        ("monotonic_spline_10k", SplineKind::Monotonic),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| {
                let _ = spline_segments(kind, black_box(&xs), black_box(&ys), None);
            })
        });
    }
}

fn bench_percent_stack_8x2k(c: &mut Criterion) {
    let members: Vec<StackInput> = (0..8)
        .map(|series| {
            let (_, ys) = wave(2_000);
            StackInput {
                series: SeriesId(series),
                mode: StackingMode::Percent,
                slots: (0..ys.len()).collect(),
                values: ys.iter().map(|y| y + f64::from(series)).collect(),
            }
        })
        .collect();

    c.bench_function("percent_stack_8x2k", |b| {
        b.iter(|| {
            let _ = accumulate_group(black_box(&members));
        })
    });
}

fn bench_circular_layout_grouped(c: &mut Criterion) {
    let values: Vec<f64> = (0..500).map(|i| f64::from(i % 37) + 0.5).collect();
    let options = CircularOptions {
        start_angle: -90.0,
        end_angle: 90.0,
        group_to: Some(GroupTo {
            threshold: 1.0,
            mode: GroupToMode::Percentage,
        }),
        ..CircularOptions::default()
    };
    let band = RadiusBand {
        inner: 0.4,
        outer: 0.8,
    };

    c.bench_function("circular_layout_grouped_500", |b| {
        b.iter(|| {
            let _ = layout_circular(
                black_box(&values),
                black_box(&options),
                CircularFrame::default(),
                band,
            );
        })
    });
}

fn bench_segment_reuse_pass(c: &mut Criterion) {
    let (xs, ys) = wave(5_000);
    let data: Vec<Sample> = xs
        .iter()
        .zip(&ys)
        .enumerate()
        .map(|(i, (x, y))| Sample::new(i, *x, *y))
        .collect();

    let mut chart = Chart::new();
    let id = chart.add_series(SeriesConfig::new(DrawKind::Spline(SplineKind::Monotonic)));
    chart.set_samples(id, data.clone()).expect("seed samples");
    chart.update();

    c.bench_function("segment_reuse_pass_5k", |b| {
        b.iter(|| {
            chart.set_samples(id, data.clone()).expect("set samples");
            let report = chart.update();
            black_box(report.built.len());
        })
    });
}

criterion_group!(
    benches,
    bench_spline_solvers_10k,
    bench_percent_stack_8x2k,
    bench_circular_layout_grouped,
    bench_segment_reuse_pass
);
criterion_main!(benches);
