mod frame;
mod layer_stack;
mod null_renderer;
mod primitives;
mod recording_renderer;

pub use frame::{LayerHandle, SceneFrame, SceneLayer};
pub use layer_stack::RenderLayer;
pub use null_renderer::NullRenderer;
pub use primitives::{Color, SceneShape, Shape, ShapeStyle};
pub use recording_renderer::RecordingRenderer;

use crate::error::ChartResult;

/// Contract implemented by any drawing backend.
///
/// Backends receive the fully materialized layered scene, so vector drawing
/// stays isolated from alignment and staleness logic. Hover text travels on
/// each shape's `tooltip`.
pub trait Renderer {
    fn render(&mut self, frame: &SceneFrame) -> ChartResult<()>;
}
