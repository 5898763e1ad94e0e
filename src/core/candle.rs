use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::LinearScale;
use crate::error::{ChartError, ChartResult};

/// Smallest price span used for a flat series, so the price scale stays
/// invertible when every candle trades at one price.
const MIN_PRICE_SPAN: f64 = 0.000_001;

/// One OHLC bar for a fixed aggregation period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Unix seconds.
    pub timestamp: f64,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub amount: Option<f64>,
}

impl Candle {
    #[must_use]
    pub fn new(timestamp: f64, open: f64, close: f64, high: f64, low: f64) -> Self {
        Self {
            timestamp,
            open,
            close,
            high,
            low,
            volume: None,
            amount: None,
        }
    }

    /// Returns `true` when close price is greater than or equal to open price.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Base time-ordered candle sequence of the active query.
///
/// Timestamps are expected to be strictly increasing. This is not validated
/// here; alignment relies on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    #[must_use]
    pub fn new(candles: Vec<Candle>) -> Self {
        Self { candles }
    }

    /// Swaps in a new sequence, discarding the previous one.
    pub fn replace(&mut self, candles: Vec<Candle>) {
        debug!(
            previous_len = self.candles.len(),
            len = candles.len(),
            "replace candle series"
        );
        self.candles = candles;
    }

    #[must_use]
    pub fn current(&self) -> &[Candle] {
        &self.candles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Returns `(min(low), max(high))`, or `None` for an empty series.
    #[must_use]
    pub fn price_extent(&self) -> Option<(f64, f64)> {
        let low = self.candles.iter().map(|c| OrderedFloat(c.low)).min()?;
        let high = self.candles.iter().map(|c| OrderedFloat(c.high)).max()?;
        Some((low.into_inner(), high.into_inner()))
    }

    /// Linear mapping from `[min(low), max(high)]` onto `[0, height]`.
    pub fn price_scale(&self, height: f64) -> ChartResult<LinearScale> {
        let (mut low, mut high) = self.price_extent().ok_or(ChartError::EmptySeries)?;
        if high - low < MIN_PRICE_SPAN {
            let mid = (high + low) / 2.0;
            low = mid - MIN_PRICE_SPAN / 2.0;
            high = mid + MIN_PRICE_SPAN / 2.0;
        }
        LinearScale::new((low, high), (0.0, height))
    }
}
