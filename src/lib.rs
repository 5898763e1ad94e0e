//! tanglism-chart: candlestick chart overlay engine.
//!
//! Candles and Chan-theory overlays (partings, strokes, segments, subtrends,
//! centers, metrics) arrive from a remote analysis service. The engine keeps
//! them aligned to the candle sequence, tracks which overlays are outdated
//! after upstream changes, and rebuilds a layered vector scene for any
//! [`render::Renderer`] backend.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod render;
pub mod telemetry;

pub use api::{ChartController, ChartControllerConfig};
pub use error::{ChartError, ChartResult};
