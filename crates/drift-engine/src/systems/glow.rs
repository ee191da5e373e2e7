use glam::Vec2;

use crate::api::types::{GlowFrame, Point};

/// Decides whether a spot on the page should glow, given the latest frame.
///
/// Cluster centers light up a wide area; when no cluster is near, any single
/// particle lights up a smaller one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowProbe {
    pub cluster_radius: f32,
    pub particle_radius: f32,
}

impl GlowProbe {
    pub const fn new(cluster_radius: f32, particle_radius: f32) -> Self {
        Self {
            cluster_radius,
            particle_radius,
        }
    }

    pub fn is_glowing(&self, frame: &GlowFrame, at: Vec2) -> bool {
        if !frame.active {
            return false;
        }
        within(&frame.clusters, at, self.cluster_radius)
            || within(&frame.particles, at, self.particle_radius)
    }
}

impl Default for GlowProbe {
    fn default() -> Self {
        Self::new(80.0, 35.0)
    }
}

fn within(points: &[Point], at: Vec2, radius: f32) -> bool {
    let r2 = radius * radius;
    points.iter().any(|&p| Vec2::from(p).distance_squared(at) < r2)
}
