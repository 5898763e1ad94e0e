use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tanglism_chart::api::{ChartController, ChartControllerConfig, NoopSource};
use tanglism_chart::core::{BoundaryPoint, Candle, OverlayKind, OverlaySegment, align_segments};
use tanglism_chart::render::NullRenderer;

fn candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let t = i as f64 * 60.0;
            let base = 100.0 + (i as f64 * 0.01).sin() * 5.0;
            let close = if i % 2 == 0 { base + 0.5 } else { base - 0.5 };
            Candle::new(t, base, close, base + 1.0, base - 1.0)
        })
        .collect()
}

fn chain(kind: OverlayKind, count: usize, every: usize) -> Vec<OverlaySegment> {
    (0..count / every)
        .map(|i| {
            let start = (i * every) as f64 * 60.0;
            let end = ((i + 1) * every) as f64 * 60.0;
            OverlaySegment::new(
                kind,
                BoundaryPoint::new(start, 99.0),
                BoundaryPoint::new(end, 101.0),
            )
        })
        .collect()
}

fn bench_align_chained_10k(c: &mut Criterion) {
    let candles = candles(10_000);
    let strokes = chain(OverlayKind::Stroke, 10_000, 7);

    c.bench_function("align_chained_10k", |b| {
        b.iter(|| {
            let aligned = align_segments(black_box(&candles), black_box(&strokes));
            black_box(aligned.len());
        })
    });
}

fn bench_redraw_10k(c: &mut Criterion) {
    let mut chart = ChartController::new(
        NullRenderer::default(),
        NoopSource,
        ChartControllerConfig::default(),
    )
    .expect("controller");
    chart.replace_candles(candles(10_000)).expect("candles");
    chart
        .replace_overlay(OverlayKind::Stroke, chain(OverlayKind::Stroke, 10_000, 7))
        .expect("strokes");
    chart
        .replace_overlay(OverlayKind::Segment, chain(OverlayKind::Segment, 10_000, 35))
        .expect("segments");

    c.bench_function("redraw_10k", |b| {
        b.iter(|| {
            chart.redraw().expect("redraw");
            black_box(chart.renderer().last_shape_count);
        })
    });
}

criterion_group!(benches, bench_align_chained_10k, bench_redraw_10k);
criterion_main!(benches);
