use serde::{Deserialize, Serialize};

use crate::api::LayoutConfig;
use crate::core::{CandleSeries, LinearScale};
use crate::error::ChartResult;

/// Shared coordinate system of one draw pass.
///
/// Resolved once per pass from the candle series and layout knobs and handed
/// to every painter, so all layers agree on bar positions and price mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartGeometry {
    pub bar_count: usize,
    pub bar_width: f64,
    pub bar_padding: f64,
    pub bar_inner_width: f64,
    pub width: f64,
    pub height: f64,
    pub price_scale: LinearScale,
}

impl ChartGeometry {
    pub fn resolve(series: &CandleSeries, layout: LayoutConfig) -> ChartResult<Self> {
        let layout = layout.validate()?;
        let price_scale = series.price_scale(layout.chart_height)?;
        let bar_padding = layout.bar_padding();
        Ok(Self {
            bar_count: series.len(),
            bar_width: layout.bar_width,
            bar_padding,
            bar_inner_width: layout.bar_width - bar_padding,
            width: series.len() as f64 * layout.bar_width,
            height: layout.chart_height,
            price_scale,
        })
    }

    /// Left edge of the candle body at `index`.
    #[must_use]
    pub fn bar_left(&self, index: usize) -> f64 {
        index as f64 * self.bar_width + self.bar_padding / 2.0
    }

    #[must_use]
    pub fn bar_center(&self, index: usize) -> f64 {
        index as f64 * self.bar_width + self.bar_width / 2.0
    }

    /// Pixel row of `price`, growing downwards.
    #[must_use]
    pub fn price_to_y(&self, price: f64) -> f64 {
        self.height - self.price_scale.map(price)
    }
}
