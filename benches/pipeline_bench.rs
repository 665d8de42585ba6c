use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flood_monitor::{AccumulationStrategy, FlowModel, Quadrature, TimeGrid, VolumeAggregator};

/// Closed-form derivative over the full grid
fn bench_derivative_series(c: &mut Criterion) {
    let model = FlowModel::default();
    let grid = TimeGrid::standard();

    c.bench_function("derivative_series_1000", |b| {
        b.iter(|| black_box(model.derivative_series(black_box(&grid))));
    });
}

/// Single quadrature over the whole horizon
fn bench_single_integral(c: &mut Criterion) {
    let model = FlowModel::default();
    let quad = Quadrature::default();

    c.bench_function("integral_0_to_20", |b| {
        b.iter(|| quad.integrate(|t| model.rate(t), 0.0, black_box(20.0)).unwrap());
    });
}

/// Direct vs segmented accumulation
fn bench_accumulation(c: &mut Criterion) {
    let model = FlowModel::default();
    let grid = TimeGrid::standard();

    let mut group = c.benchmark_group("accumulation");
    for strategy in [AccumulationStrategy::Direct, AccumulationStrategy::Segmented] {
        let aggregator = VolumeAggregator::new(Quadrature::default(), strategy);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{strategy:?}")),
            &aggregator,
            |b, aggregator| {
                b.iter(|| aggregator.accumulate(black_box(&model), black_box(&grid)).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_derivative_series,
    bench_single_integral,
    bench_accumulation
);
criterion_main!(benches);
