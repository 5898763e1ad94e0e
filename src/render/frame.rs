use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{RenderLayer, SceneShape};

/// Stable handle to one layer of a [`SceneFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerHandle {
    layer: RenderLayer,
}

impl LayerHandle {
    #[must_use]
    pub const fn layer(self) -> RenderLayer {
        self.layer
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneLayer {
    pub layer: RenderLayer,
    pub shapes: Vec<SceneShape>,
}

/// Retained, backend-agnostic scene: one shape list per layer, kept in
/// [`RenderLayer::DRAW_ORDER`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFrame {
    pub width: f64,
    pub height: f64,
    layers: Vec<SceneLayer>,
}

impl SceneFrame {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let layers = RenderLayer::DRAW_ORDER
            .iter()
            .map(|&layer| SceneLayer {
                layer,
                shapes: Vec::new(),
            })
            .collect();
        Self {
            width,
            height,
            layers,
        }
    }

    #[must_use]
    pub fn handle(&self, layer: RenderLayer) -> LayerHandle {
        LayerHandle { layer }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn push(&mut self, handle: LayerHandle, shape: SceneShape) {
        self.layers[handle.layer.z_index()].shapes.push(shape);
    }

    pub fn extend(&mut self, handle: LayerHandle, shapes: impl IntoIterator<Item = SceneShape>) {
        self.layers[handle.layer.z_index()].shapes.extend(shapes);
    }

    /// Removes every shape of one layer.
    pub fn clear(&mut self, handle: LayerHandle) {
        self.layers[handle.layer.z_index()].shapes.clear();
    }

    pub fn clear_all(&mut self) {
        for layer in &mut self.layers {
            layer.shapes.clear();
        }
    }

    #[must_use]
    pub fn layer(&self, handle: LayerHandle) -> &SceneLayer {
        &self.layers[handle.layer.z_index()]
    }

    #[must_use]
    pub fn layers(&self) -> &[SceneLayer] {
        &self.layers
    }

    /// Every shape back to front, tagged with its layer.
    pub fn shapes(&self) -> impl Iterator<Item = (RenderLayer, &SceneShape)> {
        self.layers
            .iter()
            .flat_map(|layer| layer.shapes.iter().map(move |shape| (layer.layer, shape)))
    }

    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.shapes.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shape_count() == 0
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.width.is_finite() || !self.height.is_finite() || self.width < 0.0 || self.height < 0.0
        {
            return Err(ChartError::InvalidData(format!(
                "invalid scene size: width={}, height={}",
                self.width, self.height
            )));
        }
        for (_, shape) in self.shapes() {
            shape.validate()?;
        }
        Ok(())
    }
}
