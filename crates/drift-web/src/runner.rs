use drift_engine::{
    ConfigError, FieldConfig, FieldEngine, FrameBuffer, FrameScheduler, GlowFrame, GlowProbe,
    InputEvent, InputQueue, Point, ProtocolLayout, RegionProvider, StepMode, Viewport,
};
#[cfg(feature = "vectors")]
use drift_engine::{Theme, VectorState};

/// Drives a [`FieldEngine`] from display refreshes.
///
/// The page owns exactly one runner in a `thread_local!` and forwards
/// `requestAnimationFrame` ticks, input handlers and layout changes to it,
/// because wasm-bindgen cannot export generic structs directly.
pub struct FieldRunner<P: RegionProvider> {
    engine: FieldEngine,
    input: InputQueue,
    scheduler: FrameScheduler,
    provider: P,
    frame_buffer: FrameBuffer,
    /// Frames stepped during the current tick, waiting to go out to page callbacks.
    outbox: Vec<GlowFrame>,
    glow: GlowProbe,
    #[cfg(feature = "vectors")]
    vectors: VectorState,
    #[cfg(feature = "vectors")]
    theme: Theme,
    initialized: bool,
    ready: bool,
}

impl<P: RegionProvider> FieldRunner<P> {
    pub fn new(config: FieldConfig, provider: P, seed: u64) -> Self {
        let scheduler = FrameScheduler::new(StepMode::default(), config.region_refresh_secs);
        let frame_buffer = FrameBuffer::new(ProtocolLayout::from_config(&config));

        Self {
            engine: FieldEngine::with_seed(config, seed),
            input: InputQueue::new(),
            scheduler,
            provider,
            frame_buffer,
            outbox: Vec::new(),
            glow: GlowProbe::default(),
            #[cfg(feature = "vectors")]
            vectors: VectorState::new(),
            #[cfg(feature = "vectors")]
            theme: Theme::default(),
            initialized: false,
            ready: false,
        }
    }

    /// Switch between one step per refresh and a fixed timestep.
    pub fn set_step_mode(&mut self, mode: StepMode) {
        self.scheduler = FrameScheduler::new(mode, self.engine.config().region_refresh_secs);
    }

    /// Fixed timestep of `dt` seconds. Zero, negative or non-finite `dt`
    /// goes back to one step per refresh.
    pub fn set_fixed_step(&mut self, dt: f32) {
        let mode = if dt.is_finite() && dt > 0.0 {
            StepMode::Fixed { dt }
        } else {
            StepMode::PerFrame
        };
        self.set_step_mode(mode);
    }

    /// Size the field, seed it and take a first look at the protected region.
    pub fn init(&mut self, width: f32, height: f32) {
        self.engine.init(Viewport::new(width, height));
        self.engine.refresh_region(&mut self.provider);
        self.scheduler.reset();
        self.initialized = true;
        self.ready = false;
    }

    /// Queue an input event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one display refresh: inputs, region refresh if due, steps, buffers.
    ///
    /// Every stepped frame is also kept in the outbox until the next tick;
    /// see [`take_frames`](Self::take_frames).
    pub fn tick(&mut self, dt: f32) {
        self.outbox.clear();
        if !self.initialized {
            return;
        }

        self.engine.apply_inputs(&mut self.input);

        let plan = self.scheduler.plan(dt);
        if plan.refresh_region {
            self.engine.refresh_region(&mut self.provider);
        }

        for _ in 0..plan.steps {
            self.engine.step();
            self.outbox.push(self.engine.frame().clone());
        }
        if plan.steps == 0 {
            return;
        }

        self.frame_buffer
            .write(self.engine.frame(), self.engine.frame_count());

        #[cfg(feature = "vectors")]
        self.engine.render(&self.theme, &mut self.vectors);

        if !self.ready {
            self.ready = true;
            log::info!("drift field ready");
        }
    }

    /// Replace the config from JSON. On error the previous config stays in force.
    pub fn load_config(&mut self, json: &str) -> Result<(), ConfigError> {
        let config = FieldConfig::from_json(json)?;
        let layout = ProtocolLayout::from_config(&config);
        let region_interval = config.region_refresh_secs;
        self.engine.set_config(config)?;
        self.scheduler.set_region_interval(region_interval);
        if &layout != self.frame_buffer.layout() {
            self.frame_buffer = FrameBuffer::new(layout);
        }
        Ok(())
    }

    /// Hand over the frames stepped by the last tick, oldest first.
    ///
    /// Callers deliver these after releasing whatever borrow they hold on
    /// the runner, so a callback may call back into it.
    pub fn take_frames(&mut self) -> Vec<GlowFrame> {
        std::mem::take(&mut self.outbox)
    }

    /// Tear down. Ticks are ignored until the next `init`.
    pub fn dispose(&mut self) {
        self.engine.dispose();
        self.input.drain();
        self.scheduler.reset();
        self.outbox.clear();
        self.initialized = false;
        self.ready = false;
        #[cfg(feature = "vectors")]
        self.vectors.clear();
    }

    /// True once the first frame has been published.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn engine(&self) -> &FieldEngine {
        &self.engine
    }

    pub fn particle_count(&self) -> u32 {
        self.engine.particle_count() as u32
    }

    pub fn cluster_count(&self) -> u32 {
        self.engine.clusters().len() as u32
    }

    pub fn pointer_active(&self) -> bool {
        self.engine.pointer().is_active()
    }

    /// Whether page point `(x, y)` sits under the glow of the latest frame.
    pub fn is_glowing(&self, x: f32, y: f32) -> bool {
        self.glow.is_glowing(self.engine.frame(), Point::new(x, y).into())
    }

    // ---- Pointer accessors for zero-copy reads ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame_buffer.ptr()
    }

    pub fn frame_total_floats(&self) -> u32 {
        self.frame_buffer.layout().buffer_total_floats as u32
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    #[cfg(feature = "vectors")]
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.buffer_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> u32 {
        self.vectors.vertex_count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_engine::bridge::protocol::{
        HEADER_ACTIVE, HEADER_MAX_PARTICLES, HEADER_PARTICLE_COUNT,
    };
    use drift_engine::{Rect, StaticRegion};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts how often the runner asks for the region.
    struct CountingRegion {
        rect: Option<Rect>,
        calls: Rc<Cell<u32>>,
    }

    impl RegionProvider for CountingRegion {
        fn query(&mut self) -> Option<Rect> {
            self.calls.set(self.calls.get() + 1);
            self.rect
        }
    }

    fn runner() -> FieldRunner<StaticRegion> {
        let region = StaticRegion(Some(Rect::new(300.0, 200.0, 700.0, 500.0)));
        FieldRunner::new(FieldConfig::default(), region, 1)
    }

    #[test]
    fn tick_before_init_is_ignored() {
        let mut r = runner();
        r.tick(1.0 / 60.0);
        assert!(!r.is_ready());
        assert_eq!(r.engine().frame_count(), 0);
    }

    #[test]
    fn init_reads_region_and_first_tick_is_ready() {
        let mut r = runner();
        r.init(1024.0, 768.0);
        assert_eq!(r.engine().region(), Some(Rect::new(300.0, 200.0, 700.0, 500.0)));
        assert!(!r.is_ready());

        r.tick(1.0 / 60.0);
        assert!(r.is_ready());
        assert_eq!(r.engine().frame_count(), 1);
    }

    #[test]
    fn per_frame_mode_ignores_dt() {
        let mut r = runner();
        r.init(800.0, 600.0);
        r.tick(0.0);
        r.tick(0.5);
        assert_eq!(r.engine().frame_count(), 2);
    }

    #[test]
    fn fixed_mode_accumulates_time() {
        let mut r = runner();
        r.set_step_mode(StepMode::Fixed { dt: 0.01 });
        r.init(800.0, 600.0);

        r.tick(0.005);
        assert_eq!(r.engine().frame_count(), 0);
        assert!(!r.is_ready());

        r.tick(0.03);
        assert_eq!(r.engine().frame_count(), 3);
        assert!(r.is_ready());
    }

    #[test]
    fn region_is_polled_on_interval() {
        let calls = Rc::new(Cell::new(0));
        let provider = CountingRegion {
            rect: Some(Rect::new(0.0, 0.0, 100.0, 100.0)),
            calls: Rc::clone(&calls),
        };
        let mut r = FieldRunner::new(FieldConfig::default(), provider, 1);
        r.init(800.0, 600.0);
        assert_eq!(calls.get(), 1);

        r.tick(0.5);
        assert_eq!(calls.get(), 1);
        r.tick(0.6);
        assert_eq!(calls.get(), 2);
        r.tick(0.1);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn queued_input_lands_on_next_tick() {
        let mut r = runner();
        r.init(800.0, 600.0);
        r.push_input(InputEvent::PointerMove { x: 10.0, y: 10.0 });
        assert!(!r.pointer_active());
        r.tick(1.0 / 60.0);
        assert!(r.pointer_active());
    }

    #[test]
    fn frame_buffer_mirrors_engine() {
        let mut r = runner();
        r.init(800.0, 600.0);
        r.tick(1.0 / 60.0);

        let data = r.frame_buffer().as_slice();
        assert_eq!(data.len(), r.frame_total_floats() as usize);
        assert_eq!(data[HEADER_PARTICLE_COUNT], r.particle_count() as f32);
        assert_eq!(data[HEADER_ACTIVE], 1.0);
    }

    #[test]
    fn bad_config_keeps_previous() {
        let mut r = runner();
        r.init(800.0, 600.0);
        assert!(r.load_config("{ nope").is_err());
        assert!(r.load_config(r#"{ "min_speed": 9.0 }"#).is_err());
        assert_eq!(r.engine().config(), &FieldConfig::default());

        r.load_config(r#"{ "max_particles": 50 }"#).unwrap();
        assert_eq!(r.engine().config().max_particles, 50);
        assert_eq!(r.frame_buffer().as_slice()[HEADER_MAX_PARTICLES], 50.0);
    }

    #[test]
    fn dispose_stops_frames() {
        let mut r = runner();
        r.init(800.0, 600.0);
        r.tick(1.0 / 60.0);
        r.dispose();
        assert!(r.take_frames().is_empty());
        r.tick(1.0 / 60.0);

        assert!(r.take_frames().is_empty());
        assert!(!r.is_ready());
        assert_eq!(r.particle_count(), 0);
    }

    #[test]
    fn tick_keeps_each_stepped_frame_until_taken() {
        let mut r = runner();
        r.set_fixed_step(0.01);
        r.init(800.0, 600.0);

        r.tick(0.035);
        let frames = r.take_frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames.last(), Some(r.engine().frame()));
        assert!(r.take_frames().is_empty());

        r.tick(0.001);
        r.tick(0.012);
        assert_eq!(r.take_frames().len(), 1);
    }

    #[test]
    fn fixed_step_setter_falls_back_to_per_frame() {
        let mut r = runner();
        r.init(800.0, 600.0);

        r.set_fixed_step(0.01);
        r.tick(0.005);
        assert_eq!(r.engine().frame_count(), 0);

        r.set_fixed_step(0.0);
        r.tick(0.005);
        assert_eq!(r.engine().frame_count(), 1);

        r.set_fixed_step(f32::NAN);
        r.tick(0.0);
        assert_eq!(r.engine().frame_count(), 2);
    }

    #[test]
    fn glow_follows_the_latest_frame() {
        let mut r = runner();
        r.init(800.0, 600.0);
        assert!(!r.is_glowing(400.0, 300.0));

        r.tick(1.0 / 60.0);
        let p = r.engine().frame().particles[0];
        assert!(r.is_glowing(p.x, p.y));
        assert!(r.is_glowing(p.x + 30.0, p.y));
        assert!(!r.is_glowing(-1000.0, -1000.0));

        r.dispose();
        assert!(!r.is_glowing(p.x, p.y));
    }

    #[cfg(feature = "vectors")]
    #[test]
    fn tick_tessellates_geometry() {
        let mut r = runner();
        r.init(800.0, 600.0);
        r.tick(1.0 / 60.0);
        assert!(r.vector_vertex_count() > 0);
    }
}
