use tanglism_chart::api::{
    ChartController, ChartControllerConfig, ChartQuery, NoopSource, QueuedSource, StalePolicy,
    Tick,
};
use tanglism_chart::core::{BoundaryPoint, Candle, OverlayKind, OverlaySegment};
use tanglism_chart::render::{NullRenderer, RenderLayer};

use chrono::NaiveDate;

fn candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let base = 10.0 + i as f64;
            Candle::new(i as f64 * 60.0, base, base + 0.5, base + 1.0, base - 1.0)
        })
        .collect()
}

fn strokes() -> Vec<OverlaySegment> {
    vec![
        OverlaySegment::new(
            OverlayKind::Stroke,
            BoundaryPoint::new(60.0, 9.0),
            BoundaryPoint::new(180.0, 14.0),
        ),
        OverlaySegment::new(
            OverlayKind::Stroke,
            BoundaryPoint::new(180.0, 14.0),
            BoundaryPoint::new(240.0, 12.0),
        ),
    ]
}

fn query() -> ChartQuery {
    ChartQuery::new(
        "000001.SZ",
        Tick::ThirtyMinutes,
        NaiveDate::from_ymd_opt(2020, 2, 1).expect("date"),
    )
}

#[test]
fn every_dataset_starts_outdated() {
    let chart = ChartController::new(
        NullRenderer::default(),
        NoopSource,
        ChartControllerConfig::default(),
    )
    .expect("controller");

    for kind in OverlayKind::ALL {
        assert!(chart.overlay(kind).is_outdated(), "{kind} should start outdated");
    }
    assert_eq!(chart.overlays().outdated_count(), OverlayKind::COUNT);
}

#[test]
fn overlay_replace_refreshes_only_its_kind() {
    let mut chart = ChartController::new(
        NullRenderer::default(),
        NoopSource,
        ChartControllerConfig::default(),
    )
    .expect("controller");

    chart.replace_candles(candles(6)).expect("candles");
    chart
        .replace_overlay(OverlayKind::Stroke, strokes())
        .expect("strokes");

    for kind in OverlayKind::ALL {
        assert_eq!(chart.overlay(kind).is_outdated(), kind != OverlayKind::Stroke);
    }
}

#[test]
fn candle_replace_orphans_fresh_strokes() {
    let mut chart = ChartController::new(
        NullRenderer::default(),
        NoopSource,
        ChartControllerConfig::default(),
    )
    .expect("controller");

    chart.replace_candles(candles(6)).expect("candles");
    chart
        .replace_overlay(OverlayKind::Stroke, strokes())
        .expect("strokes");
    let strokes_layer = chart.scene().handle(RenderLayer::Strokes);
    assert_eq!(chart.scene().layer(strokes_layer).shapes.len(), 2);
    assert_eq!(chart.aligned(OverlayKind::Stroke).len(), 2);

    chart.replace_candles(candles(4)).expect("new candles");

    assert!(chart.overlay(OverlayKind::Stroke).is_outdated());
    assert_eq!(chart.overlay(OverlayKind::Stroke).len(), 2);
    assert!(chart.scene().layer(strokes_layer).shapes.is_empty());
    assert!(chart.aligned(OverlayKind::Stroke).is_empty());
    assert_eq!(
        chart
            .scene()
            .layer(chart.scene().handle(RenderLayer::Candles))
            .shapes
            .len(),
        8
    );
}

#[test]
fn explicit_invalidation_hides_layer_until_replaced() {
    let mut chart = ChartController::new(
        NullRenderer::default(),
        NoopSource,
        ChartControllerConfig::default(),
    )
    .expect("controller");
    chart.replace_candles(candles(6)).expect("candles");
    chart
        .replace_overlay(OverlayKind::Stroke, strokes())
        .expect("strokes");

    chart
        .invalidate_overlays(&[OverlayKind::Stroke])
        .expect("invalidate");
    let handle = chart.scene().handle(RenderLayer::Strokes);
    assert!(chart.scene().layer(handle).shapes.is_empty());

    chart
        .replace_overlay(OverlayKind::Stroke, strokes())
        .expect("strokes again");
    assert_eq!(chart.scene().layer(handle).shapes.len(), 2);
}

#[test]
fn silent_skip_does_not_request_outdated_overlays() {
    let config = ChartControllerConfig::default().with_stale_policy(StalePolicy::SilentSkip);
    let mut chart =
        ChartController::new(NullRenderer::default(), QueuedSource::default(), config)
            .expect("controller");
    chart.submit_query(query());
    let (_, ticket) = chart.source_mut().pop().expect("candle request");
    chart
        .complete_candles(ticket, Ok(candles(6)))
        .expect("candles");
    let pending: Vec<_> = chart.source_mut().drain().collect();
    for (_, ticket) in pending {
        chart.complete_overlay(ticket, Ok(Vec::new())).expect("overlay");
    }
    assert_eq!(chart.overlays().outdated_count(), 0);

    chart
        .invalidate_overlays(&[OverlayKind::Stroke])
        .expect("invalidate");

    assert!(chart.source().is_empty());
    assert!(chart.overlay(OverlayKind::Stroke).is_outdated());
}

#[test]
fn fetch_on_demand_requests_outdated_overlays_once() {
    let config = ChartControllerConfig::default().with_stale_policy(StalePolicy::FetchOnDemand);
    let mut chart =
        ChartController::new(NullRenderer::default(), QueuedSource::default(), config)
            .expect("controller");
    chart.submit_query(query());
    let (_, ticket) = chart.source_mut().pop().expect("candle request");
    chart
        .complete_candles(ticket, Ok(candles(6)))
        .expect("candles");
    let pending: Vec<_> = chart.source_mut().drain().collect();
    assert_eq!(pending.len(), OverlayKind::COUNT);
    for (_, ticket) in pending {
        chart.complete_overlay(ticket, Ok(Vec::new())).expect("overlay");
    }

    chart
        .invalidate_overlays(&[OverlayKind::Stroke])
        .expect("invalidate");
    chart.redraw().expect("redraw");

    let requested: Vec<_> = chart.source().tickets().map(|t| t.target).collect();
    assert_eq!(
        requested,
        vec![tanglism_chart::api::FetchTarget::Overlay(OverlayKind::Stroke)]
    );
}

#[test]
fn empty_candles_clear_scene() {
    let mut chart = ChartController::new(
        NullRenderer::default(),
        NoopSource,
        ChartControllerConfig::default(),
    )
    .expect("controller");
    chart.replace_candles(candles(3)).expect("candles");
    assert!(!chart.scene().is_empty());

    chart.replace_candles(Vec::new()).expect("empty");
    assert!(chart.scene().is_empty());

    let renderer = chart.into_renderer();
    assert_eq!(renderer.render_count, 2);
    assert_eq!(renderer.last_shape_count, 0);
}
