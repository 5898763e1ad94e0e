use tracing::{debug, warn};

use crate::api::painters::{DrawContext, LayerPainter};
use crate::api::{
    ChartControllerConfig, ChartGeometry, ChartQuery, DataSource, FetchTarget, FetchTicket,
    Generation, LayoutConfig, OverlayDataset, OverlayKinds, OverlayStore, RenderOrchestrator,
    StalePolicy, StalenessTracker,
};
use crate::core::{AlignedSegment, Candle, CandleSeries, OverlayKind, OverlaySegment, align_segments};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{ChartEvent, ChartObserver, ObserverContext};
use crate::render::{RenderLayer, Renderer, SceneFrame};

/// Overlays computed from strokes; a stroke rule change orphans all of them.
const STROKE_DEPENDENTS: [OverlayKind; 4] = [
    OverlayKind::Stroke,
    OverlayKind::Segment,
    OverlayKind::SubTrend,
    OverlayKind::Center,
];

/// Single owner of chart state.
///
/// `ChartController` holds the candle series, the overlay store, the
/// staleness tracker, and the render orchestrator. Every mutation runs
/// invalidation before the dependent draw pass, inside the same call.
pub struct ChartController<R: Renderer, S: DataSource> {
    pub(super) renderer: R,
    pub(super) source: S,
    pub(super) config: ChartControllerConfig,
    pub(super) candles: CandleSeries,
    pub(super) store: OverlayStore,
    pub(super) tracker: StalenessTracker,
    pub(super) orchestrator: RenderOrchestrator,
    pub(super) scene: SceneFrame,
    pub(super) observers: Vec<Box<dyn ChartObserver>>,
    pub(super) query: Option<ChartQuery>,
}

impl<R: Renderer, S: DataSource> ChartController<R, S> {
    pub fn new(renderer: R, source: S, config: ChartControllerConfig) -> ChartResult<Self> {
        let config = config.validate()?;
        let scene = SceneFrame::new(0.0, config.layout.chart_height);
        let orchestrator = RenderOrchestrator::new(&scene);
        Ok(Self {
            renderer,
            source,
            config,
            candles: CandleSeries::default(),
            store: OverlayStore::new(),
            tracker: StalenessTracker::new(),
            orchestrator,
            scene,
            observers: Vec::new(),
            query: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> ChartControllerConfig {
        self.config
    }

    #[must_use]
    pub fn candles(&self) -> &CandleSeries {
        &self.candles
    }

    #[must_use]
    pub fn overlay(&self, kind: OverlayKind) -> &OverlayDataset {
        self.store.dataset(kind)
    }

    #[must_use]
    pub fn overlays(&self) -> &OverlayStore {
        &self.store
    }

    #[must_use]
    pub fn scene(&self) -> &SceneFrame {
        &self.scene
    }

    #[must_use]
    pub fn query(&self) -> Option<&ChartQuery> {
        self.query.as_ref()
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.tracker.current()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Alignment of `kind` against the current candles; empty while the
    /// dataset is outdated.
    #[must_use]
    pub fn aligned(&self, kind: OverlayKind) -> Vec<AlignedSegment<'_>> {
        self.store
            .dataset(kind)
            .fresh_records()
            .map(|records| align_segments(self.candles.current(), records))
            .unwrap_or_default()
    }

    /// Starts a new query generation and requests its candles. Answers to
    /// earlier generations are dropped from now on.
    pub fn submit_query(&mut self, query: ChartQuery) -> Generation {
        let generation = self.tracker.begin_query();
        debug!(
            code = %query.code,
            tick = %query.tick,
            %generation,
            "submit query"
        );
        self.query = Some(query);
        if let Some(query) = self.query.as_ref() {
            if let Some(ticket) = self.tracker.issue(FetchTarget::Candles) {
                self.source.request(query, ticket);
            }
        }
        generation
    }

    /// Delivers the candle fetch for `ticket`. Returns `Ok(false)` when the
    /// answer belongs to a superseded generation and was dropped.
    ///
    /// On success the series is replaced, every overlay is invalidated, the
    /// chart is redrawn, and enabled overlays are requested for the query.
    pub fn complete_candles(
        &mut self,
        ticket: FetchTicket,
        result: ChartResult<Vec<Candle>>,
    ) -> ChartResult<bool> {
        if ticket.target != FetchTarget::Candles {
            return Err(ChartError::InvalidData(format!(
                "{} ticket passed as candle completion",
                ticket.target
            )));
        }
        if !self.accept(ticket) {
            return Ok(false);
        }
        match result {
            Ok(candles) => {
                self.apply_candles(candles)?;
                let enabled: OverlayKinds = self.config.toggles.enabled_kinds().collect();
                self.request_overlays(&enabled);
            }
            Err(err) => {
                warn!(error = %err, generation = %ticket.generation, "candle fetch failed; clearing series");
                self.apply_candles(Vec::new())?;
            }
        }
        Ok(true)
    }

    /// Delivers the overlay fetch for `ticket`. Returns `Ok(false)` when the
    /// answer belongs to a superseded generation and was dropped.
    ///
    /// A failed fetch empties the dataset and its layer; it is not retried.
    pub fn complete_overlay(
        &mut self,
        ticket: FetchTicket,
        result: ChartResult<Vec<OverlaySegment>>,
    ) -> ChartResult<bool> {
        let FetchTarget::Overlay(kind) = ticket.target else {
            return Err(ChartError::InvalidData(
                "candle ticket passed as overlay completion".to_owned(),
            ));
        };
        if !self.accept(ticket) {
            return Ok(false);
        }
        match result {
            Ok(records) => self.apply_overlay(kind, records)?,
            Err(err) => {
                warn!(%kind, error = %err, "overlay fetch failed; clearing dataset");
                self.store.dataset_mut(kind).clear();
                if let Some(handle) = self.orchestrator.handle(RenderLayer::for_overlay(kind)) {
                    self.scene.clear(handle);
                }
                self.emit(ChartEvent::OverlayFetchFailed { kind });
                self.render_scene()?;
            }
        }
        Ok(true)
    }

    /// Replaces the candle series directly, bypassing the fetch path.
    pub fn replace_candles(&mut self, candles: Vec<Candle>) -> ChartResult<()> {
        self.apply_candles(candles)
    }

    /// Replaces one overlay dataset directly, bypassing the fetch path.
    pub fn replace_overlay(
        &mut self,
        kind: OverlayKind,
        records: Vec<OverlaySegment>,
    ) -> ChartResult<()> {
        self.apply_overlay(kind, records)
    }

    /// Marks `kinds` outdated because their remote computation changed, then
    /// redraws. With an active query their pending fetches are superseded.
    pub fn invalidate_overlays(&mut self, kinds: &[OverlayKind]) -> ChartResult<()> {
        if self.query.is_some() {
            self.tracker.retarget(kinds);
        }
        for &kind in kinds {
            if self.store.dataset_mut(kind).mark_outdated() {
                self.emit(ChartEvent::OverlayInvalidated { kind });
            }
        }
        self.redraw()
    }

    /// Changes the stroke construction options of the active query and
    /// refetches every overlay derived from strokes.
    pub fn set_stroke_cfg(&mut self, stroke_cfg: Option<String>) -> ChartResult<()> {
        match self.query.as_mut() {
            Some(query) => query.stroke_cfg = stroke_cfg,
            None => debug!("no active query; stroke options only invalidate"),
        }
        self.invalidate_overlays(&STROKE_DEPENDENTS)?;
        let enabled: OverlayKinds = STROKE_DEPENDENTS
            .into_iter()
            .filter(|kind| self.config.toggles.is_enabled(*kind))
            .collect();
        self.request_overlays(&enabled);
        Ok(())
    }

    /// Requests fresh data for `kinds` under the active query. Kinds with a
    /// fetch already in flight are skipped, and nothing is requested while
    /// the query's candles are still outstanding.
    pub fn refresh_overlays(&mut self, kinds: &[OverlayKind]) {
        self.request_overlays(kinds);
    }

    pub fn set_overlay_enabled(&mut self, kind: OverlayKind, enabled: bool) -> ChartResult<()> {
        self.config.toggles.set(kind, enabled);
        self.redraw()
    }

    pub fn set_layout(&mut self, layout: LayoutConfig) -> ChartResult<()> {
        self.config.layout = layout.validate()?;
        self.redraw()
    }

    pub fn set_stale_policy(&mut self, policy: StalePolicy) {
        self.config.stale_policy = policy;
    }

    /// Installs a custom painter for its layer; dispatch order is unchanged.
    pub fn set_painter(&mut self, painter: Box<dyn LayerPainter>) -> Option<Box<dyn LayerPainter>> {
        self.orchestrator.set_painter(&self.scene, painter)
    }

    /// Runs one full draw pass and hands the scene to the renderer.
    pub fn redraw(&mut self) -> ChartResult<()> {
        let stale = self.draw_pass();
        if !stale.is_empty() {
            match self.config.stale_policy {
                StalePolicy::SilentSkip => {
                    debug!(kinds = ?stale, "outdated overlays not drawn");
                }
                StalePolicy::FetchOnDemand => self.request_overlays(&stale),
            }
        }
        self.render_scene()
    }

    fn draw_pass(&mut self) -> OverlayKinds {
        if self.candles.is_empty() {
            debug!("empty candle series; scene cleared");
            self.scene.clear_all();
            return OverlayKinds::new();
        }
        let geometry = match ChartGeometry::resolve(&self.candles, self.config.layout) {
            Ok(geometry) => geometry,
            Err(err) => {
                warn!(error = %err, "cannot resolve chart geometry; scene cleared");
                self.scene.clear_all();
                return OverlayKinds::new();
            }
        };
        let ctx = DrawContext {
            geometry: &geometry,
            candles: self.candles.current(),
            store: &self.store,
            toggles: self.config.toggles,
        };
        let report = self.orchestrator.draw_pass(&ctx, &mut self.scene);
        debug!(
            shapes = report.shape_count,
            stale = report.stale.len(),
            failed = report.failed.len(),
            "draw pass complete"
        );
        report.stale
    }

    fn render_scene(&mut self) -> ChartResult<()> {
        self.renderer.render(&self.scene)?;
        let shape_count = self.scene.shape_count();
        self.emit(ChartEvent::Rendered { shape_count });
        Ok(())
    }

    fn apply_candles(&mut self, candles: Vec<Candle>) -> ChartResult<()> {
        self.candles.replace(candles);
        let event = ChartEvent::CandlesReplaced {
            len: self.candles.len(),
        };
        self.dispatch(event);
        self.redraw()
    }

    fn apply_overlay(&mut self, kind: OverlayKind, records: Vec<OverlaySegment>) -> ChartResult<()> {
        let len = records.len();
        self.store.dataset_mut(kind).replace(records);
        self.dispatch(ChartEvent::OverlayReplaced { kind, len });
        self.redraw()
    }

    /// Invalidation hooks first, then observers.
    fn dispatch(&mut self, event: ChartEvent) {
        let invalidated = self.orchestrator.invalidate(&event, &mut self.store);
        self.emit(event);
        for kind in invalidated {
            self.emit(ChartEvent::OverlayInvalidated { kind });
        }
    }

    fn accept(&mut self, ticket: FetchTicket) -> bool {
        if self.tracker.accept(ticket) {
            return true;
        }
        debug!(
            fetch = %ticket.target,
            generation = %ticket.generation,
            expected = %self.tracker.expected(ticket.target),
            "drop response for superseded generation"
        );
        self.emit(ChartEvent::StaleResponseDropped {
            target: ticket.target,
        });
        false
    }

    fn request_overlays(&mut self, kinds: &[OverlayKind]) {
        let Some(query) = self.query.as_ref() else {
            debug!(kinds = ?kinds, "no active query; overlay refresh skipped");
            return;
        };
        // Overlays align to the query's candles; wait until those are live.
        if self.tracker.is_pending(FetchTarget::Candles) {
            debug!(kinds = ?kinds, "candles in flight; overlay refresh deferred");
            return;
        }
        for &kind in kinds {
            if let Some(ticket) = self.tracker.issue(FetchTarget::Overlay(kind)) {
                debug!(%kind, generation = %ticket.generation, "request overlay refresh");
                self.source.request(query, ticket);
            }
        }
    }

    pub(super) fn emit(&mut self, event: ChartEvent) {
        if self.observers.is_empty() {
            return;
        }
        let context = ObserverContext {
            candles_len: self.candles.len(),
            generation: self.tracker.current(),
            outdated_overlays: self.store.outdated_count(),
        };
        for observer in &mut self.observers {
            observer.on_event(event, context);
        }
    }
}
