use serde::{Deserialize, Serialize};

use crate::core::OverlayKind;
use crate::error::{ChartError, ChartResult};

/// Minimum padding between bars when padding is proportional to bar width.
pub const MIN_PROPORTIONAL_BAR_PADDING_PX: f64 = 4.0;

/// User layout knobs consumed by the geometry resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub bar_width: f64,
    pub bar_padding_fixed: bool,
    pub bar_padding_fixed_width: f64,
    pub chart_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bar_width: 16.0,
            bar_padding_fixed: false,
            bar_padding_fixed_width: 4.0,
            chart_height: 500.0,
        }
    }
}

impl LayoutConfig {
    /// Padding between adjacent bars: the fixed width, or
    /// `max(bar_width / 3, 4)`.
    #[must_use]
    pub fn bar_padding(self) -> f64 {
        if self.bar_padding_fixed {
            self.bar_padding_fixed_width
        } else {
            (self.bar_width / 3.0).max(MIN_PROPORTIONAL_BAR_PADDING_PX)
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (value, name) in [
            (self.bar_width, "bar_width"),
            (self.chart_height, "chart_height"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "layout `{name}` must be finite and > 0"
                )));
            }
        }
        if self.bar_padding_fixed
            && (!self.bar_padding_fixed_width.is_finite() || self.bar_padding_fixed_width < 0.0)
        {
            return Err(ChartError::InvalidConfig(
                "layout `bar_padding_fixed_width` must be finite and >= 0".to_owned(),
            ));
        }
        if self.bar_width - self.bar_padding() <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "bar padding {} leaves no body for bar width {}",
                self.bar_padding(),
                self.bar_width
            )));
        }
        Ok(self)
    }
}

/// Per-overlay display toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayToggles {
    pub parting: bool,
    pub stroke: bool,
    pub segment: bool,
    pub subtrend: bool,
    pub center: bool,
    pub metric: bool,
}

impl Default for OverlayToggles {
    fn default() -> Self {
        Self::all_enabled()
    }
}

impl OverlayToggles {
    #[must_use]
    pub const fn all_enabled() -> Self {
        Self {
            parting: true,
            stroke: true,
            segment: true,
            subtrend: true,
            center: true,
            metric: true,
        }
    }

    #[must_use]
    pub const fn is_enabled(self, kind: OverlayKind) -> bool {
        match kind {
            OverlayKind::Parting => self.parting,
            OverlayKind::Stroke => self.stroke,
            OverlayKind::Segment => self.segment,
            OverlayKind::SubTrend => self.subtrend,
            OverlayKind::Center => self.center,
            OverlayKind::Metric => self.metric,
        }
    }

    pub fn set(&mut self, kind: OverlayKind, enabled: bool) {
        let slot = match kind {
            OverlayKind::Parting => &mut self.parting,
            OverlayKind::Stroke => &mut self.stroke,
            OverlayKind::Segment => &mut self.segment,
            OverlayKind::SubTrend => &mut self.subtrend,
            OverlayKind::Center => &mut self.center,
            OverlayKind::Metric => &mut self.metric,
        };
        *slot = enabled;
    }

    /// Enabled kinds in [`OverlayKind::ALL`] order.
    pub fn enabled_kinds(self) -> impl Iterator<Item = OverlayKind> {
        OverlayKind::ALL
            .into_iter()
            .filter(move |kind| self.is_enabled(*kind))
    }
}

/// What a painter does when its dataset is outdated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StalePolicy {
    /// Log and draw nothing for the layer.
    #[default]
    SilentSkip,
    /// Draw nothing and request a refresh for the active query; the
    /// completion re-enters the draw path.
    FetchOnDemand,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ChartControllerConfig {
    pub layout: LayoutConfig,
    pub toggles: OverlayToggles,
    pub stale_policy: StalePolicy,
}

impl ChartControllerConfig {
    #[must_use]
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_toggles(mut self, toggles: OverlayToggles) -> Self {
        self.toggles = toggles;
        self
    }

    #[must_use]
    pub fn with_stale_policy(mut self, stale_policy: StalePolicy) -> Self {
        self.stale_policy = stale_policy;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.layout.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{LayoutConfig, OverlayToggles};
    use crate::core::OverlayKind;

    #[test]
    fn proportional_padding_has_a_floor() {
        let narrow = LayoutConfig {
            bar_width: 9.0,
            ..LayoutConfig::default()
        };
        assert_eq!(narrow.bar_padding(), 4.0);

        let wide = LayoutConfig {
            bar_width: 30.0,
            ..LayoutConfig::default()
        };
        assert_eq!(wide.bar_padding(), 10.0);
    }

    #[test]
    fn padding_that_swallows_the_bar_is_rejected() {
        let layout = LayoutConfig {
            bar_width: 4.0,
            ..LayoutConfig::default()
        };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn toggles_round_trip_per_kind() {
        let mut toggles = OverlayToggles::all_enabled();
        toggles.set(OverlayKind::Segment, false);
        assert!(!toggles.is_enabled(OverlayKind::Segment));
        assert_eq!(toggles.enabled_kinds().count(), OverlayKind::COUNT - 1);
    }
}
