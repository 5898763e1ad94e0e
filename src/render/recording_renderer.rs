use crate::error::ChartResult;
use crate::render::{Renderer, SceneFrame};

/// Renderer that keeps a copy of every validated frame it receives.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: Vec<SceneFrame>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn frames(&self) -> &[SceneFrame] {
        &self.frames
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&SceneFrame> {
        self.frames.last()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &SceneFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames.push(frame.clone());
        Ok(())
    }
}
