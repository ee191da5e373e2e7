use glam::Vec2;

use crate::api::types::ParticleId;
use crate::core::particle::Particle;

/// Owns the live particles and hands out their ids.
/// A flat Vec: populations stay in the low hundreds.
pub struct ParticleStore {
    particles: Vec<Particle>,
    next_id: u32,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            next_id: 0,
        }
    }

    /// Build and insert a particle under a fresh id.
    pub fn spawn(&mut self, build: impl FnOnce(ParticleId) -> Particle) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        let particle = build(id);
        debug_assert_eq!(particle.id(), id, "particle built with a foreign id");
        self.particles.push(particle);
        id
    }

    /// Remove a particle by id. Order of the remaining particles may change.
    pub fn despawn(&mut self, id: ParticleId) -> Option<Particle> {
        let idx = self.particles.iter().position(|p| p.id() == id)?;
        Some(self.particles.swap_remove(idx))
    }

    /// Keep the particles for which `keep` returns true.
    pub fn retain_mut(&mut self, keep: impl FnMut(&mut Particle) -> bool) {
        self.particles.retain_mut(keep);
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.particles.iter().map(|p| p.pos)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Drop every particle. Ids keep counting up.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl Default for ParticleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;

    fn spawn_at(store: &mut ParticleStore, rng: &mut Rng, x: f32, y: f32) -> ParticleId {
        store.spawn(|id| Particle::new(id, Vec2::new(x, y), Vec2::ZERO, rng))
    }

    #[test]
    fn spawn_and_get() {
        let mut store = ParticleStore::new();
        let mut rng = Rng::new(1);
        let id = spawn_at(&mut store, &mut rng, 10.0, 20.0);
        assert_eq!(store.get(id).unwrap().pos, Vec2::new(10.0, 20.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn ids_increase_and_are_not_reused() {
        let mut store = ParticleStore::new();
        let mut rng = Rng::new(1);
        let a = spawn_at(&mut store, &mut rng, 0.0, 0.0);
        let b = spawn_at(&mut store, &mut rng, 0.0, 0.0);
        store.despawn(b);
        store.clear();
        let c = spawn_at(&mut store, &mut rng, 0.0, 0.0);
        assert!(a < b && b < c);
    }

    #[test]
    fn despawn_removes_particle() {
        let mut store = ParticleStore::new();
        let mut rng = Rng::new(1);
        let id = spawn_at(&mut store, &mut rng, 0.0, 0.0);
        assert!(store.despawn(id).is_some());
        assert!(store.despawn(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn retain_mut_drops_rejected() {
        let mut store = ParticleStore::new();
        let mut rng = Rng::new(1);
        spawn_at(&mut store, &mut rng, -500.0, 0.0);
        let keep = spawn_at(&mut store, &mut rng, 100.0, 0.0);
        store.retain_mut(|p| p.pos.x > 0.0);
        assert_eq!(store.len(), 1);
        assert!(store.get(keep).is_some());
    }
}
