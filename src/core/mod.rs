pub mod alignment;
pub mod candle;
pub mod overlay;
pub mod primitives;
pub mod scale;

pub use alignment::{AlignedSegment, align_segments};
pub use candle::{Candle, CandleSeries};
pub use overlay::{BoundaryPoint, CenterBand, OverlayExtra, OverlayKind, OverlaySegment};
pub use scale::LinearScale;
