use glam::Vec2;

use crate::api::config::{ConfigError, FieldConfig};
use crate::api::observer::{FrameObserver, Publisher, SubscriptionId};
use crate::api::types::{GlowFrame, ParticleId, Point};
use crate::core::bounds::{Rect, Viewport};
use crate::core::particle::Particle;
use crate::core::region::{RegionProvider, RegionTracker};
use crate::core::rng::Rng;
use crate::core::store::ParticleStore;
use crate::input::pointer::PointerTracker;
use crate::input::queue::{InputEvent, InputQueue};
use crate::systems::cluster::{Cluster, ClusterDetector};
use crate::systems::graph::ConnectionGraph;
use crate::systems::integrator::{self, StepStats};
#[cfg(feature = "vectors")]
use crate::systems::render::{build_field_geometry, Theme};
#[cfg(feature = "vectors")]
use crate::systems::vector::VectorState;

/// The whole simulation: particles, inputs, derived graph and observers.
///
/// Lifecycle is `init` → `step`* → `dispose`. Stepping before `init` or after
/// `dispose` does nothing and publishes nothing.
pub struct FieldEngine {
    config: FieldConfig,
    store: ParticleStore,
    pointer: PointerTracker,
    region: RegionTracker,
    viewport: Viewport,
    graph: ConnectionGraph,
    detector: ClusterDetector,
    clusters: Vec<Cluster>,
    frame: GlowFrame,
    publisher: Publisher,
    rng: Rng,
    started: bool,
    frame_count: u64,
    last_stats: StepStats,
}

impl FieldEngine {
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new(config: FieldConfig) -> Self {
        Self::with_seed(config, Self::DEFAULT_SEED)
    }

    /// Same seed, same inputs, same frames.
    pub fn with_seed(config: FieldConfig, seed: u64) -> Self {
        Self {
            region: RegionTracker::new(config.region_padding),
            store: ParticleStore::with_capacity(config.max_particles),
            config,
            pointer: PointerTracker::new(),
            viewport: Viewport::default(),
            graph: ConnectionGraph::new(),
            detector: ClusterDetector::new(),
            clusters: Vec::new(),
            frame: GlowFrame::default(),
            publisher: Publisher::new(),
            rng: Rng::new(seed),
            started: false,
            frame_count: 0,
            last_stats: StepStats::default(),
        }
    }

    /// Size the field and seed the initial population.
    ///
    /// Calling it again restarts with a fresh population; observers stay subscribed.
    pub fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.store.clear();
        self.graph.clear();
        self.clusters.clear();
        self.started = true;

        let seeded = self.seed_population();
        log::info!(
            "drift field started: {}x{}, {} particles seeded",
            viewport.width,
            viewport.height,
            seeded
        );
    }

    fn seed_population(&mut self) -> usize {
        if self.viewport.is_empty() {
            return 0;
        }
        let count = self.config.initial_particles.min(self.config.max_particles);
        for _ in 0..count {
            let viewport = self.viewport;
            let rng = &mut self.rng;
            self.store.spawn(|id| Particle::seeded(id, &viewport, rng));
        }
        count
    }

    /// Advance one frame and publish the result.
    pub fn step(&mut self) {
        if !self.started {
            return;
        }

        self.last_stats = integrator::integrate(
            &mut self.store,
            &self.pointer,
            self.region.rect(),
            &self.viewport,
            &self.config,
            &mut self.rng,
        );

        self.graph.rebuild(self.store.as_mut_slice(), &self.config);
        self.clusters = self
            .detector
            .detect(&self.graph, self.store.as_slice(), self.config.cluster_min_size);

        self.build_frame();
        self.publisher.publish(&self.frame);
        self.frame_count += 1;
    }

    fn build_frame(&mut self) {
        self.frame.clusters.clear();
        self.frame
            .clusters
            .extend(self.clusters.iter().map(|c| Point::from(c.center)));
        self.frame.particles.clear();
        self.frame.particles.extend(self.store.positions().map(Point::from));
        self.frame.active = self.started;
    }

    /// Stop publishing and drop all state. Observers are unsubscribed.
    pub fn dispose(&mut self) {
        if self.started {
            log::info!("drift field disposed after {} frames", self.frame_count);
        }
        self.started = false;
        self.publisher.clear();
        self.store.clear();
        self.region.clear();
        self.graph.clear();
        self.clusters.clear();
        self.frame.clear();
    }

    // -- Observers --

    pub fn subscribe(&mut self, observer: impl FrameObserver + 'static) -> SubscriptionId {
        self.publisher.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.publisher.unsubscribe(id)
    }

    // -- Inputs --

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer.move_to(x, y);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Push-style region update. `None` or an empty rect keeps the previous one.
    pub fn set_region(&mut self, rect: Option<Rect>) {
        if self.region.update(rect) {
            log::debug!("protected region now {:?}", self.region.raw());
        }
    }

    /// Poll a region provider.
    pub fn refresh_region(&mut self, provider: &mut impl RegionProvider) {
        self.set_region(provider.query());
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, y } => self.pointer_move(x, y),
            InputEvent::Resize { width, height } => self.resize(Viewport::new(width, height)),
            InputEvent::Region { rect } => self.set_region(rect),
        }
    }

    /// Apply everything queued since the last frame, in arrival order.
    pub fn apply_inputs(&mut self, queue: &mut InputQueue) {
        for event in queue.drain() {
            self.handle_input(event);
        }
    }

    /// Swap in a new configuration. Existing particles are kept as they are.
    pub fn set_config(&mut self, config: FieldConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.region.set_padding(config.region_padding);
        self.config = config;
        Ok(())
    }

    /// Insert a particle directly. Mostly for tests and scripted scenes.
    pub fn spawn_at(&mut self, pos: Vec2, vel: Vec2) -> ParticleId {
        let rng = &mut self.rng;
        self.store.spawn(|id| Particle::new(id, pos, vel, rng))
    }

    // -- Accessors --

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.as_slice()
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.store.get(id)
    }

    pub fn particle_count(&self) -> usize {
        self.store.len()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }

    /// The frame most recently published.
    pub fn frame(&self) -> &GlowFrame {
        &self.frame
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    /// Current protected region, padding applied.
    pub fn region(&self) -> Option<Rect> {
        self.region.rect()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn last_stats(&self) -> StepStats {
        self.last_stats
    }

    pub fn observer_count(&self) -> usize {
        self.publisher.len()
    }

    /// Tessellate outlines and connection lines for the current state.
    #[cfg(feature = "vectors")]
    pub fn render(&self, theme: &Theme, out: &mut VectorState) {
        build_field_geometry(self.store.as_slice(), &self.graph, &self.config, theme, out);
    }
}

impl Default for FieldEngine {
    fn default() -> Self {
        Self::new(FieldConfig::default())
    }
}
