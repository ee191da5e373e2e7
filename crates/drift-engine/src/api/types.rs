use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::Serialize;

/// Unique identifier for a particle. Assigned in increasing order, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u32);

/// A position as it leaves the engine. Two floats on the wire.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const FLOATS: usize = 2;

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// The record published once per frame.
///
/// Consumers must not rely on particle identity, ordering or a stable count:
/// positions are re-listed from scratch every frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlowFrame {
    /// Centers of mass of every cluster this frame.
    pub clusters: Vec<Point>,
    /// Every live particle position.
    pub particles: Vec<Point>,
    /// True once the field has started.
    pub active: bool,
}

impl GlowFrame {
    pub fn clear(&mut self) {
        self.clusters.clear();
        self.particles.clear();
        self.active = false;
    }
}
