use glam::Vec2;

use crate::api::config::FieldConfig;
use crate::api::types::ParticleId;
use crate::core::bounds::Viewport;
use crate::core::rng::Rng;

/// Whether the pointer held the particle this step. Recomputed every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticleState {
    #[default]
    Floating,
    Caught,
}

/// Viewport edge a particle enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn random(rng: &mut Rng) -> Self {
        Self::ALL[rng.next_int(4) as usize]
    }

    /// Unit vector pointing from this edge into the viewport (y grows downward).
    pub fn inward(self) -> Vec2 {
        match self {
            Edge::Top => Vec2::Y,
            Edge::Right => Vec2::NEG_X,
            Edge::Bottom => Vec2::NEG_Y,
            Edge::Left => Vec2::X,
        }
    }
}

/// One drifting outline shape.
///
/// Identity, size and shape are fixed when the particle is built; the
/// kinematic fields are driven by the integrator.
#[derive(Debug, Clone)]
pub struct Particle {
    id: ParticleId,
    size: f32,
    shape: Box<[Vec2]>,
    /// Position in viewport pixels.
    pub pos: Vec2,
    /// Displacement per step.
    pub vel: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Radians per step.
    pub rotation_speed: f32,
    pub state: ParticleState,
}

impl Particle {
    pub const MIN_SIZE: f32 = 10.0;
    pub const MAX_SIZE: f32 = 50.0;
    /// Initial spin lies in [-MAX_SPIN, MAX_SPIN).
    pub const MAX_SPIN: f32 = 0.025;
    pub const MIN_VERTICES: u32 = 3;
    pub const MAX_VERTICES: u32 = 5;
    /// Inward speed spread added to `min_speed` for edge spawns.
    pub const EDGE_SPEED_SPREAD: f32 = 1.2;
    /// Full width of the lateral velocity jitter for edge spawns.
    pub const EDGE_JITTER: f32 = 1.5;

    /// Create a particle with the given kinematics and a random look.
    pub fn new(id: ParticleId, pos: Vec2, vel: Vec2, rng: &mut Rng) -> Self {
        Self {
            id,
            size: rng.range(Self::MIN_SIZE, Self::MAX_SIZE),
            shape: random_shape(rng),
            pos,
            vel,
            rotation: rng.range(0.0, std::f32::consts::TAU),
            rotation_speed: rng.range(-Self::MAX_SPIN, Self::MAX_SPIN),
            state: ParticleState::Floating,
        }
    }

    /// Place a particle uniformly inside the viewport with a gentle random drift.
    pub fn seeded(id: ParticleId, viewport: &Viewport, rng: &mut Rng) -> Self {
        let pos = Vec2::new(rng.range(0.0, viewport.width), rng.range(0.0, viewport.height));
        let vel = Vec2::new(rng.range(-1.0, 1.0), rng.range(-1.0, 1.0));
        Self::new(id, pos, vel, rng)
    }

    /// Place a particle just outside `edge`, heading inward.
    ///
    /// The component along the edge normal is the deterministic inward speed;
    /// the component along the edge is jitter.
    pub fn from_edge(
        id: ParticleId,
        edge: Edge,
        viewport: &Viewport,
        config: &FieldConfig,
        rng: &mut Rng,
    ) -> Self {
        let speed = config.min_speed + rng.next_f32() * Self::EDGE_SPEED_SPREAD;
        let jitter = (rng.next_f32() - 0.5) * Self::EDGE_JITTER;
        let offset = config.edge_spawn_offset;

        let (pos, vel) = match edge {
            Edge::Top => (
                Vec2::new(rng.range(0.0, viewport.width), -offset),
                Vec2::new(jitter, speed),
            ),
            Edge::Right => (
                Vec2::new(viewport.width + offset, rng.range(0.0, viewport.height)),
                Vec2::new(-speed, jitter),
            ),
            Edge::Bottom => (
                Vec2::new(rng.range(0.0, viewport.width), viewport.height + offset),
                Vec2::new(jitter, -speed),
            ),
            Edge::Left => (
                Vec2::new(-offset, rng.range(0.0, viewport.height)),
                Vec2::new(speed, jitter),
            ),
        };
        Self::new(id, pos, vel, rng)
    }

    /// Override the random size. Builder style, so it only applies before the particle is stored.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Override the random shape template.
    pub fn with_shape(mut self, shape: Vec<Vec2>) -> Self {
        self.shape = shape.into_boxed_slice();
        self
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Unit-scale polygon template, centered near the origin.
    pub fn shape(&self) -> &[Vec2] {
        &self.shape
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn is_caught(&self) -> bool {
        self.state == ParticleState::Caught
    }

    /// Polygon in viewport space: template scaled by size, rotated, then translated.
    pub fn outline(&self) -> Vec<Vec2> {
        let rot = Vec2::from_angle(self.rotation);
        self.shape
            .iter()
            .map(|&v| self.pos + rot.rotate(v * self.size))
            .collect()
    }
}

/// 3 to 5 vertices, each coordinate in [-0.5, 0.5).
fn random_shape(rng: &mut Rng) -> Box<[Vec2]> {
    let span = Particle::MAX_VERTICES - Particle::MIN_VERTICES + 1;
    let sides = Particle::MIN_VERTICES + rng.next_int(span);
    (0..sides)
        .map(|_| Vec2::new(rng.next_f32() - 0.5, rng.next_f32() - 0.5))
        .collect()
}
