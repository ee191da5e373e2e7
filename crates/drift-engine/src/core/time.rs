/// Fixed timestep accumulator.
/// Runs the field at a consistent rate regardless of display refresh rate.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    /// Upper bound on steps per frame after a long stall (tab in background).
    pub const MAX_STEPS: u32 = 10;

    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        self.accumulator = self.accumulator.min(self.dt * Self::MAX_STEPS as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// How display refreshes map to simulation steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepMode {
    /// Exactly one step per refresh, whatever the frame delta.
    PerFrame,
    /// Steps of `dt` seconds drawn from accumulated frame time.
    Fixed { dt: f32 },
}

impl Default for StepMode {
    fn default() -> Self {
        StepMode::PerFrame
    }
}

/// What one display refresh should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FramePlan {
    /// Simulation steps to run this refresh.
    pub steps: u32,
    /// Whether the protected-region query is due before stepping.
    pub refresh_region: bool,
}

/// Cooperative frame scheduler.
///
/// Called once per display refresh with the elapsed time. Besides the step
/// count it runs the region-refresh interval timer, so a refresh always lands
/// between two frames and never inside one.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    mode: StepMode,
    timestep: FixedTimestep,
    region_interval: f32,
    since_region: f32,
}

impl FrameScheduler {
    pub fn new(mode: StepMode, region_interval: f32) -> Self {
        let dt = match mode {
            StepMode::Fixed { dt } => dt,
            StepMode::PerFrame => 1.0 / 60.0,
        };
        Self {
            mode,
            timestep: FixedTimestep::new(dt),
            region_interval,
            since_region: 0.0,
        }
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    pub fn set_region_interval(&mut self, seconds: f32) {
        self.region_interval = seconds;
    }

    /// Plan the work for a refresh that arrived `frame_dt` seconds after the last.
    pub fn plan(&mut self, frame_dt: f32) -> FramePlan {
        let frame_dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };

        self.since_region += frame_dt;
        let refresh_region = self.since_region >= self.region_interval;
        if refresh_region {
            // One refresh per due interval; a long stall does not queue up several
            self.since_region = 0.0;
        }

        let steps = match self.mode {
            StepMode::PerFrame => 1,
            StepMode::Fixed { .. } => self.timestep.accumulate(frame_dt),
        };

        FramePlan { steps, refresh_region }
    }

    /// Forget accumulated time (after dispose or re-init).
    pub fn reset(&mut self) {
        self.timestep.reset();
        self.since_region = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0), 10);
    }

    #[test]
    fn per_frame_mode_steps_once_regardless_of_dt() {
        let mut s = FrameScheduler::new(StepMode::PerFrame, 1.0);
        assert_eq!(s.plan(0.001).steps, 1);
        assert_eq!(s.plan(0.5).steps, 1);
        assert_eq!(s.plan(0.0).steps, 1);
    }

    #[test]
    fn fixed_mode_halves_steps_on_120hz() {
        let mut s = FrameScheduler::new(StepMode::Fixed { dt: 1.0 / 60.0 }, 1.0);
        let total: u32 = (0..120).map(|_| s.plan(1.0 / 120.0).steps).sum();
        assert!((59..=61).contains(&total), "total steps {}", total);
    }

    #[test]
    fn region_refresh_fires_on_interval() {
        let mut s = FrameScheduler::new(StepMode::PerFrame, 1.0);
        let fired: usize = (0..180)
            .filter(|_| s.plan(1.0 / 60.0).refresh_region)
            .count();
        assert!((2..=3).contains(&fired), "fired {} times", fired);
    }

    #[test]
    fn stall_triggers_single_refresh() {
        let mut s = FrameScheduler::new(StepMode::PerFrame, 1.0);
        assert!(s.plan(10.0).refresh_region);
        assert!(!s.plan(0.016).refresh_region);
    }

    #[test]
    fn non_finite_delta_is_ignored() {
        let mut s = FrameScheduler::new(StepMode::Fixed { dt: 1.0 / 60.0 }, 1.0);
        let plan = s.plan(f32::NAN);
        assert_eq!(plan.steps, 0);
        assert!(!plan.refresh_region);
    }
}
