mod controller;
mod controller_config;
mod data_source;
mod geometry;
mod invalidation;
mod json_contract;
mod observer_registry;
mod overlay_store;
mod painters;
mod render_coordinator;

pub use controller::ChartController;
pub use controller_config::{
    ChartControllerConfig, LayoutConfig, MIN_PROPORTIONAL_BAR_PADDING_PX, OverlayToggles,
    StalePolicy,
};
pub use data_source::{ChartQuery, DataSource, NoopSource, QueuedSource, Tick};
pub use geometry::ChartGeometry;
pub use invalidation::{
    FetchTarget, FetchTicket, Generation, OverlayKinds, StalenessTracker,
};
pub use json_contract::{
    BandValue, CandleRecord, CenterRecord, CenterWire, DecimalText, FlatCenterRecord,
    MetricRecord, PartingPairRecord, PartingRecord, PriceSpanRecord, SubTrendRecord, SubTrendWire,
    TaggedSubTrend, ValuePointRecord, metric_chain, parse_candles, parse_overlay,
};
pub use overlay_store::{OverlayDataset, OverlayStore};
pub use painters::{
    CandlePainter, CenterPainter, DrawContext, LayerPainter, LinePainter, MetricPainter,
    PaintOutcome, PartingPainter, default_painters,
};
pub use render_coordinator::{DrawReport, RenderOrchestrator};
