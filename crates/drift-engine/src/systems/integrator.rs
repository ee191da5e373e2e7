//! Per-step physics: spawning, pointer magnetism, friction, speed band, culling.

use glam::Vec2;

use crate::api::config::FieldConfig;
use crate::api::types::ParticleId;
use crate::core::bounds::{Rect, Viewport};
use crate::core::particle::{Edge, Particle, ParticleState};
use crate::core::rng::Rng;
use crate::core::store::ParticleStore;
use crate::input::pointer::PointerTracker;

/// Admission control for the protected region.
///
/// When the pointer hovers near the region and enough particles already sit
/// inside it, outsiders stop being pulled for the step. Particles already
/// inside stay attractable, so the region fills up to the cap and no further;
/// nobody is pushed out.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SaturationGate {
    saturated: Option<Rect>,
}

impl SaturationGate {
    /// A gate that admits everything.
    pub const OPEN: Self = Self { saturated: None };

    /// Evaluate the gate once per step, before any particle moves.
    pub fn evaluate(
        pointer: &PointerTracker,
        region: Option<Rect>,
        particles: &[Particle],
        config: &FieldConfig,
    ) -> Self {
        let Some(rect) = region else {
            return Self::OPEN;
        };
        let far = pointer.pos().distance(rect.center()) >= config.region_proximity;
        if !pointer.is_active() || far {
            return Self::OPEN;
        }
        let inside = particles.iter().filter(|p| rect.contains(p.pos)).count();
        if inside >= config.region_max_particles {
            Self { saturated: Some(rect) }
        } else {
            Self::OPEN
        }
    }

    pub fn is_saturated(&self) -> bool {
        self.saturated.is_some()
    }

    /// Whether a particle at `pos` may be attracted this step.
    pub fn admits(&self, pos: Vec2) -> bool {
        self.saturated.map_or(true, |rect| rect.contains(pos))
    }
}

/// The pointer's pull on one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attraction {
    /// `(radius - distance) / radius`, in (0, 1].
    pub strength: f32,
    /// Velocity change toward the pointer. Zero when the pointer sits exactly on the particle.
    pub impulse: Vec2,
}

/// Pull toward `pointer`, or `None` when out of reach.
pub fn magnet_pull(pos: Vec2, pointer: Vec2, config: &FieldConfig) -> Option<Attraction> {
    let delta = pointer - pos;
    let dist = delta.length();
    if !(dist < config.magnet_radius) {
        return None;
    }
    let strength = (config.magnet_radius - dist) / config.magnet_radius;
    Some(Attraction {
        strength,
        impulse: delta.normalize_or_zero() * strength * config.magnet_force,
    })
}

/// Full attraction test: active pointer, in reach, and admitted by the gate.
pub fn attraction_for(
    pos: Vec2,
    pointer: &PointerTracker,
    gate: &SaturationGate,
    config: &FieldConfig,
) -> Option<Attraction> {
    if !pointer.is_active() || !gate.admits(pos) {
        return None;
    }
    magnet_pull(pos, pointer.pos(), config)
}

/// Nudge speed back toward `[min_speed, max_speed]`. Converges over several steps.
pub fn regulate_speed(vel: &mut Vec2, config: &FieldConfig) {
    let speed = vel.length();
    if speed < config.min_speed {
        *vel *= config.speed_boost;
    } else if speed > config.max_speed {
        *vel *= config.speed_damp;
    }
}

/// Advance one particle. Returns false once it has left the field for good.
pub fn integrate_particle(
    p: &mut Particle,
    pointer: &PointerTracker,
    gate: &SaturationGate,
    viewport: &Viewport,
    config: &FieldConfig,
) -> bool {
    p.pos += p.vel;
    p.rotation += p.rotation_speed;

    match attraction_for(p.pos, pointer, gate, config) {
        Some(pull) => {
            p.vel += pull.impulse;
            p.rotation_speed += pull.strength * config.caught_spin;
            p.vel *= config.magnet_friction;
            p.state = ParticleState::Caught;
        }
        None => {
            p.vel *= config.flow_friction;
            p.state = ParticleState::Floating;
        }
    }

    regulate_speed(&mut p.vel, config);
    p.rotation_speed *= config.rotation_damping;

    viewport.is_empty() || !viewport.is_far_outside(p.pos, config.cull_margin)
}

/// Roll the step's spawn chance and add one particle at a random edge.
pub fn spawn_from_edge(
    store: &mut ParticleStore,
    viewport: &Viewport,
    config: &FieldConfig,
    rng: &mut Rng,
) -> Option<ParticleId> {
    if viewport.is_empty() || store.len() >= config.max_particles {
        return None;
    }
    if !rng.chance(config.spawn_chance) {
        return None;
    }
    let edge = Edge::random(rng);
    Some(store.spawn(|id| Particle::from_edge(id, edge, viewport, config, rng)))
}

/// What one integration pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub spawned: usize,
    pub culled: usize,
    pub caught: usize,
    pub saturated: bool,
}

/// Spawn, then move every particle and cull the ones that drifted away.
pub fn integrate(
    store: &mut ParticleStore,
    pointer: &PointerTracker,
    region: Option<Rect>,
    viewport: &Viewport,
    config: &FieldConfig,
    rng: &mut Rng,
) -> StepStats {
    let spawned = usize::from(spawn_from_edge(store, viewport, config, rng).is_some());
    let gate = SaturationGate::evaluate(pointer, region, store.as_slice(), config);

    let before = store.len();
    store.retain_mut(|p| integrate_particle(p, pointer, &gate, viewport, config));

    StepStats {
        spawned,
        culled: before - store.len(),
        caught: store.iter().filter(|p| p.is_caught()).count(),
        saturated: gate.is_saturated(),
    }
}
