//! Hooks for code living outside the engine.

pub mod observers;

pub use observers::{ChartEvent, ChartObserver, ObserverContext};
