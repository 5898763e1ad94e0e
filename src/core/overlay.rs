use std::fmt;

use serde::{Deserialize, Serialize};

/// Pattern family of an overlay dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    Parting,
    Stroke,
    Segment,
    SubTrend,
    Center,
    /// Auxiliary indicator line (moving average, MACD component).
    Metric,
}

impl OverlayKind {
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Parting,
        Self::Stroke,
        Self::Segment,
        Self::SubTrend,
        Self::Center,
        Self::Metric,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Parting => 0,
            Self::Stroke => 1,
            Self::Segment => 2,
            Self::SubTrend => 3,
            Self::Center => 4,
            Self::Metric => 5,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parting => "parting",
            Self::Stroke => "stroke",
            Self::Segment => "segment",
            Self::SubTrend => "subtrend",
            Self::Center => "center",
            Self::Metric => "metric",
        }
    }

    /// Whether consecutive records share a boundary (`end[i] == start[i + 1]`).
    #[must_use]
    pub const fn is_chained(self) -> bool {
        matches!(
            self,
            Self::Stroke | Self::Segment | Self::SubTrend | Self::Metric
        )
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single pattern endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    /// Unix seconds.
    pub timestamp: f64,
    pub price: f64,
}

impl BoundaryPoint {
    #[must_use]
    pub const fn new(timestamp: f64, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Consolidation band carried by center overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterBand {
    pub shared_low: f64,
    pub shared_high: f64,
    pub low: f64,
    pub high: f64,
    pub level: u8,
}

/// Kind-specific payload of an overlay segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum OverlayExtra {
    #[default]
    None,
    Parting {
        top: bool,
    },
    SubTrend {
        level: u8,
        label: Option<String>,
    },
    Center(CenterBand),
}

/// One overlay record spanning two boundary points.
///
/// Partings and isolated metric samples are degenerate segments with
/// `start == end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySegment {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
    pub kind: OverlayKind,
    #[serde(default)]
    pub extra: OverlayExtra,
}

impl OverlaySegment {
    #[must_use]
    pub fn new(kind: OverlayKind, start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Self {
            start,
            end,
            kind,
            extra: OverlayExtra::None,
        }
    }

    #[must_use]
    pub fn point(kind: OverlayKind, point: BoundaryPoint) -> Self {
        Self::new(kind, point, point)
    }

    #[must_use]
    pub fn with_extra(mut self, extra: OverlayExtra) -> Self {
        self.extra = extra;
        self
    }

    #[must_use]
    pub fn upward(&self) -> bool {
        self.start.price < self.end.price
    }

    #[must_use]
    pub fn is_point(&self) -> bool {
        self.start.timestamp == self.end.timestamp
    }

    #[must_use]
    pub fn center_band(&self) -> Option<&CenterBand> {
        match &self.extra {
            OverlayExtra::Center(band) => Some(band),
            _ => None,
        }
    }
}
