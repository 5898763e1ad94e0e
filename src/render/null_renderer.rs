use crate::error::ChartResult;
use crate::render::{Renderer, SceneFrame};

/// No-op renderer used by tests and headless usage.
///
/// It still validates scene content so invalid geometry is caught without a
/// drawing backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub render_count: usize,
    pub last_shape_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &SceneFrame) -> ChartResult<()> {
        frame.validate()?;
        self.render_count += 1;
        self.last_shape_count = frame.shape_count();
        Ok(())
    }
}
