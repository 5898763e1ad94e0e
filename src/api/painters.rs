//! Draw callbacks, one per scene layer.
//!
//! Every overlay painter gates itself on its enable toggle and on the
//! staleness of its dataset before aligning records to candles.

use crate::api::{ChartGeometry, OverlayStore, OverlayToggles};
use crate::core::primitives::format_unix_seconds;
use crate::core::{
    AlignedSegment, Candle, OverlayExtra, OverlayKind, OverlaySegment, align_segments,
};
use crate::error::ChartResult;
use crate::render::{Color, RenderLayer, SceneShape, Shape, ShapeStyle};

const MIN_BODY_HEIGHT_PX: f64 = 1.0;
const PARTING_MARKER_PX: f64 = 6.0;

const CANDLE_UP: Color = Color::rgb(0.85, 0.2, 0.2);
const CANDLE_DOWN: Color = Color::rgb(0.15, 0.6, 0.3);
const PARTING_TOP: Color = Color::rgb(0.9, 0.45, 0.1);
const PARTING_BOTTOM: Color = Color::rgb(0.2, 0.45, 0.9);
const STROKE: Color = Color::rgb(0.2, 0.2, 0.2);
const SEGMENT: Color = Color::rgb(0.55, 0.1, 0.7);
const SUBTREND: Color = Color::rgb(0.1, 0.55, 0.65);
const CENTER_RANGE: Color = Color::rgb(0.8, 0.6, 0.1);
const CENTER_BAND: Color = CENTER_RANGE.with_alpha(0.3);
const METRIC: Color = Color::rgb(0.35, 0.35, 0.8);

/// Inputs shared by all painters during one draw pass.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    pub geometry: &'a ChartGeometry,
    pub candles: &'a [Candle],
    pub store: &'a OverlayStore,
    pub toggles: OverlayToggles,
}

impl<'a> DrawContext<'a> {
    /// Records of `kind` that may be drawn, or the reason to draw nothing.
    pub fn fresh_overlay(&self, kind: OverlayKind) -> Result<&'a [OverlaySegment], PaintOutcome> {
        if !self.toggles.is_enabled(kind) {
            return Err(PaintOutcome::Disabled);
        }
        self.store
            .dataset(kind)
            .fresh_records()
            .ok_or(PaintOutcome::Stale(kind))
    }

    #[must_use]
    pub fn align(&self, records: &'a [OverlaySegment]) -> Vec<AlignedSegment<'a>> {
        align_segments(self.candles, records)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOutcome {
    Painted { shapes: usize },
    Disabled,
    Stale(OverlayKind),
}

/// Draw callback for one layer.
pub trait LayerPainter {
    fn layer(&self) -> RenderLayer;

    fn paint(
        &mut self,
        ctx: &DrawContext<'_>,
        out: &mut Vec<SceneShape>,
    ) -> ChartResult<PaintOutcome>;
}

/// Default painter set, one per layer.
#[must_use]
pub fn default_painters() -> Vec<Box<dyn LayerPainter>> {
    vec![
        Box::new(CenterPainter),
        Box::new(CandlePainter),
        Box::new(PartingPainter),
        Box::new(LinePainter::strokes()),
        Box::new(LinePainter::segments()),
        Box::new(LinePainter::subtrends()),
        Box::new(MetricPainter),
    ]
}

fn segment_tooltip(segment: &OverlaySegment) -> String {
    let arrow = if segment.upward() { "up" } else { "down" };
    format!(
        "{} {arrow}: {} @ {:.2} -> {} @ {:.2}",
        segment.kind,
        format_unix_seconds(segment.start.timestamp),
        segment.start.price,
        format_unix_seconds(segment.end.timestamp),
        segment.end.price,
    )
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CandlePainter;

impl LayerPainter for CandlePainter {
    fn layer(&self) -> RenderLayer {
        RenderLayer::Candles
    }

    fn paint(
        &mut self,
        ctx: &DrawContext<'_>,
        out: &mut Vec<SceneShape>,
    ) -> ChartResult<PaintOutcome> {
        let g = ctx.geometry;
        for (index, candle) in ctx.candles.iter().enumerate() {
            let color = if candle.is_bullish() {
                CANDLE_UP
            } else {
                CANDLE_DOWN
            };
            let x = g.bar_center(index);
            out.push(SceneShape::new(
                Shape::Line {
                    x1: x,
                    y1: g.price_to_y(candle.high),
                    x2: x,
                    y2: g.price_to_y(candle.low),
                },
                ShapeStyle::stroked(color, 1.0),
            ));

            let top = g.price_to_y(candle.open.max(candle.close));
            let bottom = g.price_to_y(candle.open.min(candle.close));
            out.push(
                SceneShape::new(
                    Shape::Rect {
                        x: g.bar_left(index),
                        y: top,
                        width: g.bar_inner_width,
                        height: (bottom - top).max(MIN_BODY_HEIGHT_PX),
                    },
                    ShapeStyle::filled(color),
                )
                .with_tooltip(format!(
                    "{} O {:.2} C {:.2} H {:.2} L {:.2}",
                    format_unix_seconds(candle.timestamp),
                    candle.open,
                    candle.close,
                    candle.high,
                    candle.low,
                )),
            );
        }
        Ok(PaintOutcome::Painted {
            shapes: ctx.candles.len() * 2,
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PartingPainter;

impl LayerPainter for PartingPainter {
    fn layer(&self) -> RenderLayer {
        RenderLayer::Partings
    }

    fn paint(
        &mut self,
        ctx: &DrawContext<'_>,
        out: &mut Vec<SceneShape>,
    ) -> ChartResult<PaintOutcome> {
        let records = match ctx.fresh_overlay(OverlayKind::Parting) {
            Ok(records) => records,
            Err(outcome) => return Ok(outcome),
        };
        let g = ctx.geometry;
        let aligned = ctx.align(records);
        for item in &aligned {
            let top = matches!(item.segment.extra, OverlayExtra::Parting { top: true });
            let y = g.price_to_y(item.segment.start.price);
            // Tops sit above the extremum, bottoms below.
            let marker_y = if top { y - PARTING_MARKER_PX } else { y };
            out.push(
                SceneShape::new(
                    Shape::Rect {
                        x: g.bar_center(item.start_id) - PARTING_MARKER_PX / 2.0,
                        y: marker_y,
                        width: PARTING_MARKER_PX,
                        height: PARTING_MARKER_PX,
                    },
                    ShapeStyle::filled(if top { PARTING_TOP } else { PARTING_BOTTOM }),
                )
                .with_tooltip(format!(
                    "{} {} @ {:.2}",
                    if top { "top" } else { "bottom" },
                    format_unix_seconds(item.segment.start.timestamp),
                    item.segment.start.price,
                )),
            );
        }
        Ok(PaintOutcome::Painted {
            shapes: aligned.len(),
        })
    }
}

/// Straight-line painter for strokes, segments and sub-trends.
#[derive(Debug, Clone, Copy)]
pub struct LinePainter {
    kind: OverlayKind,
    style: ShapeStyle,
}

impl LinePainter {
    #[must_use]
    pub const fn new(kind: OverlayKind, style: ShapeStyle) -> Self {
        Self { kind, style }
    }

    #[must_use]
    pub const fn strokes() -> Self {
        Self::new(OverlayKind::Stroke, ShapeStyle::stroked(STROKE, 1.0))
    }

    #[must_use]
    pub const fn segments() -> Self {
        Self::new(OverlayKind::Segment, ShapeStyle::stroked(SEGMENT, 2.0))
    }

    #[must_use]
    pub const fn subtrends() -> Self {
        Self::new(
            OverlayKind::SubTrend,
            ShapeStyle::stroked(SUBTREND, 1.5).dashed(),
        )
    }
}

impl LayerPainter for LinePainter {
    fn layer(&self) -> RenderLayer {
        RenderLayer::for_overlay(self.kind)
    }

    fn paint(
        &mut self,
        ctx: &DrawContext<'_>,
        out: &mut Vec<SceneShape>,
    ) -> ChartResult<PaintOutcome> {
        let records = match ctx.fresh_overlay(self.kind) {
            Ok(records) => records,
            Err(outcome) => return Ok(outcome),
        };
        let g = ctx.geometry;
        let aligned = ctx.align(records);
        out.extend(aligned.iter().map(|item| {
            SceneShape::new(
                Shape::Line {
                    x1: g.bar_center(item.start_id),
                    y1: g.price_to_y(item.segment.start.price),
                    x2: g.bar_center(item.end_id),
                    y2: g.price_to_y(item.segment.end.price),
                },
                self.style,
            )
            .with_tooltip(segment_tooltip(item.segment))
        }));
        Ok(PaintOutcome::Painted {
            shapes: aligned.len(),
        })
    }
}

fn price_band(g: &ChartGeometry, x: f64, width: f64, a: f64, b: f64) -> Shape {
    let (ya, yb) = (g.price_to_y(a), g.price_to_y(b));
    Shape::Rect {
        x,
        y: ya.min(yb),
        width,
        height: (ya - yb).abs(),
    }
}

/// Background band painter for consolidation centers.
#[derive(Debug, Default, Clone, Copy)]
pub struct CenterPainter;

impl LayerPainter for CenterPainter {
    fn layer(&self) -> RenderLayer {
        RenderLayer::Centers
    }

    fn paint(
        &mut self,
        ctx: &DrawContext<'_>,
        out: &mut Vec<SceneShape>,
    ) -> ChartResult<PaintOutcome> {
        let records = match ctx.fresh_overlay(OverlayKind::Center) {
            Ok(records) => records,
            Err(outcome) => return Ok(outcome),
        };
        let g = ctx.geometry;
        let aligned = ctx.align(records);
        let before = out.len();
        for item in &aligned {
            let segment = item.segment;
            let (shared_low, shared_high, low, high) = match segment.center_band() {
                Some(band) => (band.shared_low, band.shared_high, band.low, band.high),
                None => {
                    let low = segment.start.price.min(segment.end.price);
                    let high = segment.start.price.max(segment.end.price);
                    (low, high, low, high)
                }
            };
            let x = g.bar_center(item.start_id);
            let width = g.bar_center(item.end_id) - x;

            out.push(SceneShape::new(
                price_band(g, x, width, low, high),
                ShapeStyle::stroked(CENTER_RANGE, 1.0).dashed(),
            ));
            out.push(
                SceneShape::new(
                    price_band(g, x, width, shared_low, shared_high),
                    ShapeStyle::filled(CENTER_BAND),
                )
                .with_tooltip(format!(
                    "center {} -> {}: [{shared_low:.2}, {shared_high:.2}] in [{low:.2}, {high:.2}]",
                    format_unix_seconds(segment.start.timestamp),
                    format_unix_seconds(segment.end.timestamp),
                )),
            );
        }
        Ok(PaintOutcome::Painted {
            shapes: out.len() - before,
        })
    }
}

/// Polyline painter for auxiliary metrics. A dropped sample splits the line.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricPainter;

impl LayerPainter for MetricPainter {
    fn layer(&self) -> RenderLayer {
        RenderLayer::Metrics
    }

    fn paint(
        &mut self,
        ctx: &DrawContext<'_>,
        out: &mut Vec<SceneShape>,
    ) -> ChartResult<PaintOutcome> {
        let records = match ctx.fresh_overlay(OverlayKind::Metric) {
            Ok(records) => records,
            Err(outcome) => return Ok(outcome),
        };
        let g = ctx.geometry;
        let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
        let mut last_end: Option<usize> = None;
        for item in ctx.align(records) {
            if item.segment.is_point() {
                continue;
            }
            let start = (
                g.bar_center(item.start_id),
                g.price_to_y(item.segment.start.price),
            );
            let end = (
                g.bar_center(item.end_id),
                g.price_to_y(item.segment.end.price),
            );
            match runs.last_mut() {
                Some(run) if last_end == Some(item.start_id) => run.push(end),
                _ => runs.push(vec![start, end]),
            }
            last_end = Some(item.end_id);
        }

        let shapes = runs.len();
        out.extend(runs.into_iter().map(|points| {
            SceneShape::new(Shape::Path { points }, ShapeStyle::stroked(METRIC, 1.0))
        }));
        Ok(PaintOutcome::Painted { shapes })
    }
}
