use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::api::painters::{DrawContext, LayerPainter, PaintOutcome, default_painters};
use crate::api::{OverlayKinds, OverlayStore, StalenessTracker};
use crate::extensions::ChartEvent;
use crate::render::{LayerHandle, RenderLayer, SceneFrame, SceneShape};

struct PainterSlot {
    handle: LayerHandle,
    painter: Box<dyn LayerPainter>,
}

/// Outcome of one draw pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawReport {
    pub shape_count: usize,
    /// Overlays skipped because their dataset was outdated.
    pub stale: OverlayKinds,
    /// Layers left empty because their painter failed.
    pub failed: SmallVec<[RenderLayer; 2]>,
}

/// Two-phase dispatcher: invalidation hooks, then draw callbacks.
///
/// Both phases walk [`RenderLayer::DRAW_ORDER`]; painter registration order
/// has no effect on dispatch.
pub struct RenderOrchestrator {
    painters: IndexMap<RenderLayer, PainterSlot>,
}

impl RenderOrchestrator {
    #[must_use]
    pub fn new(scene: &SceneFrame) -> Self {
        let mut orchestrator = Self {
            painters: IndexMap::with_capacity(RenderLayer::COUNT),
        };
        for painter in default_painters() {
            orchestrator.set_painter(scene, painter);
        }
        orchestrator
    }

    /// Installs `painter` for its layer, returning the one it replaces.
    pub fn set_painter(
        &mut self,
        scene: &SceneFrame,
        painter: Box<dyn LayerPainter>,
    ) -> Option<Box<dyn LayerPainter>> {
        let layer = painter.layer();
        let slot = PainterSlot {
            handle: scene.handle(layer),
            painter,
        };
        self.painters
            .insert(layer, slot)
            .map(|previous| previous.painter)
    }

    #[must_use]
    pub fn handle(&self, layer: RenderLayer) -> Option<LayerHandle> {
        self.painters.get(&layer).map(|slot| slot.handle)
    }

    /// Invalidation phase: flags every overlay that `event` orphans. Returns
    /// the kinds whose flag flipped from fresh to outdated.
    pub fn invalidate(&self, event: &ChartEvent, store: &mut OverlayStore) -> OverlayKinds {
        let targets = StalenessTracker::invalidated_by(event);
        let mut flipped = OverlayKinds::new();
        if targets.is_empty() {
            return flipped;
        }
        for layer in RenderLayer::DRAW_ORDER {
            let Some(kind) = layer.overlay_kind() else {
                continue;
            };
            if targets.contains(&kind) && store.dataset_mut(kind).mark_outdated() {
                flipped.push(kind);
            }
        }
        debug!(event = ?event, flipped = ?flipped, "invalidation phase");
        flipped
    }

    /// Draw phase: rebuilds the scene layer by layer, back to front.
    ///
    /// A failing painter or invalid shape empties that layer only.
    pub fn draw_pass(&mut self, ctx: &DrawContext<'_>, scene: &mut SceneFrame) -> DrawReport {
        scene.clear_all();
        scene.resize(ctx.geometry.width, ctx.geometry.height);

        let mut report = DrawReport::default();
        let mut buffer: Vec<SceneShape> = Vec::new();
        for layer in RenderLayer::DRAW_ORDER {
            let Some(slot) = self.painters.get_mut(&layer) else {
                trace!(?layer, "no painter registered");
                continue;
            };
            buffer.clear();
            match slot.painter.paint(ctx, &mut buffer) {
                Ok(PaintOutcome::Painted { .. }) => {
                    if let Err(err) = buffer.iter().try_for_each(SceneShape::validate) {
                        warn!(?layer, error = %err, "painter emitted invalid shape; layer left empty");
                        report.failed.push(layer);
                        continue;
                    }
                    trace!(?layer, shapes = buffer.len(), "layer painted");
                    report.shape_count += buffer.len();
                    scene.extend(slot.handle, buffer.drain(..));
                }
                Ok(PaintOutcome::Disabled) => trace!(?layer, "layer disabled"),
                Ok(PaintOutcome::Stale(kind)) => {
                    debug!(%kind, "skip drawing outdated overlay");
                    report.stale.push(kind);
                }
                Err(err) => {
                    warn!(?layer, error = %err, "painter failed; layer left empty");
                    report.failed.push(layer);
                }
            }
        }
        report
    }
}
