use serde::{Deserialize, Serialize};

use crate::api::{FetchTarget, Generation};
use crate::core::OverlayKind;

/// Read-only state snapshot passed to observer hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserverContext {
    pub candles_len: usize,
    pub generation: Generation,
    pub outdated_overlays: usize,
}

/// Typed chart events, dispatched after the internal invalidation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartEvent {
    CandlesReplaced { len: usize },
    OverlayReplaced { kind: OverlayKind, len: usize },
    OverlayInvalidated { kind: OverlayKind },
    OverlayFetchFailed { kind: OverlayKind },
    StaleResponseDropped { target: FetchTarget },
    Rendered { shape_count: usize },
}

/// Subscriber interface for hosts that mirror chart state (legends, tables,
/// status bars) without touching controller internals.
pub trait ChartObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: ChartEvent, context: ObserverContext);
}
