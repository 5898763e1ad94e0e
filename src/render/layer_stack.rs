use serde::{Deserialize, Serialize};

use crate::core::OverlayKind;

/// Scene layer drawn by one painter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderLayer {
    Centers,
    Candles,
    Partings,
    Strokes,
    Segments,
    SubTrends,
    Metrics,
}

impl RenderLayer {
    pub const COUNT: usize = 7;

    /// Back-to-front paint order. Centers are background bands; metrics are
    /// foreground annotations.
    pub const DRAW_ORDER: [Self; Self::COUNT] = [
        Self::Centers,
        Self::Candles,
        Self::Partings,
        Self::Strokes,
        Self::Segments,
        Self::SubTrends,
        Self::Metrics,
    ];

    /// Position of the layer in [`RenderLayer::DRAW_ORDER`].
    #[must_use]
    pub const fn z_index(self) -> usize {
        match self {
            Self::Centers => 0,
            Self::Candles => 1,
            Self::Partings => 2,
            Self::Strokes => 3,
            Self::Segments => 4,
            Self::SubTrends => 5,
            Self::Metrics => 6,
        }
    }

    /// Overlay dataset drawn on this layer; `None` for the candle layer.
    #[must_use]
    pub const fn overlay_kind(self) -> Option<OverlayKind> {
        match self {
            Self::Centers => Some(OverlayKind::Center),
            Self::Candles => None,
            Self::Partings => Some(OverlayKind::Parting),
            Self::Strokes => Some(OverlayKind::Stroke),
            Self::Segments => Some(OverlayKind::Segment),
            Self::SubTrends => Some(OverlayKind::SubTrend),
            Self::Metrics => Some(OverlayKind::Metric),
        }
    }

    #[must_use]
    pub const fn for_overlay(kind: OverlayKind) -> Self {
        match kind {
            OverlayKind::Center => Self::Centers,
            OverlayKind::Parting => Self::Partings,
            OverlayKind::Stroke => Self::Strokes,
            OverlayKind::Segment => Self::Segments,
            OverlayKind::SubTrend => Self::SubTrends,
            OverlayKind::Metric => Self::Metrics,
        }
    }
}
