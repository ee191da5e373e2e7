//! Proximity graph between particles, rebuilt every step.

use crate::api::config::FieldConfig;
use crate::core::particle::Particle;

/// A proximity edge. `a` and `b` index the particle slice the graph was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
}

/// Who is within connection distance of whom, for one step.
///
/// Indices are only meaningful against the slice passed to the last
/// [`rebuild`](ConnectionGraph::rebuild); nothing carries over between steps.
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    adjacency: Vec<Vec<usize>>,
    connections: Vec<Connection>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from current positions and apply short-range repulsion.
    ///
    /// All pairs are visited, so this is O(n²); fine for a few hundred particles.
    /// Repulsion only touches velocities, so the visiting order does not matter.
    pub fn rebuild(&mut self, particles: &mut [Particle], config: &FieldConfig) {
        let n = particles.len();
        self.connections.clear();
        for list in &mut self.adjacency {
            list.clear();
        }
        self.adjacency.resize_with(n, Vec::new);

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = particles[i].pos - particles[j].pos;
                let distance = delta.length();
                if !(distance < config.connection_distance) {
                    continue;
                }

                self.adjacency[i].push(j);
                self.adjacency[j].push(i);
                self.connections.push(Connection { a: i, b: j, distance });

                if distance < config.repel_distance && distance > 0.0 {
                    let push = delta / distance * config.repel_force;
                    particles[i].vel += push;
                    particles[j].vel -= push;
                }
            }
        }
    }

    /// Neighbors of the particle at `index`.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, index: usize) -> usize {
        self.neighbors(index).len()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Number of particles the graph was built over.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.connections.len()
    }

    pub fn clear(&mut self) {
        self.adjacency.clear();
        self.connections.clear();
    }
}
