//! Connected components of the proximity graph, reduced to centers of mass.

use glam::Vec2;

use crate::api::types::ParticleId;
use crate::core::particle::Particle;
use crate::systems::graph::ConnectionGraph;

/// A connected group of at least `cluster_min_size` particles.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Arithmetic mean of member positions.
    pub center: Vec2,
    pub members: Vec<ParticleId>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Depth-first component search with an explicit stack.
/// Holds only scratch buffers; every call starts from nothing.
#[derive(Debug, Default)]
pub struct ClusterDetector {
    visited: Vec<bool>,
    stack: Vec<usize>,
    component: Vec<usize>,
}

impl ClusterDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find every component of `graph` with at least `min_size` members.
    ///
    /// `particles` must be the slice the graph was rebuilt from.
    pub fn detect(
        &mut self,
        graph: &ConnectionGraph,
        particles: &[Particle],
        min_size: usize,
    ) -> Vec<Cluster> {
        debug_assert_eq!(graph.node_count(), particles.len(), "graph is stale");
        let n = particles.len().min(graph.node_count());

        self.visited.clear();
        self.visited.resize(n, false);
        let mut clusters = Vec::new();

        for start in 0..n {
            if self.visited[start] {
                continue;
            }

            self.stack.clear();
            self.component.clear();
            self.visited[start] = true;
            self.stack.push(start);

            while let Some(current) = self.stack.pop() {
                self.component.push(current);
                for &next in graph.neighbors(current) {
                    if next < n && !self.visited[next] {
                        self.visited[next] = true;
                        self.stack.push(next);
                    }
                }
            }

            if self.component.len() >= min_size {
                let sum: Vec2 = self.component.iter().map(|&i| particles[i].pos).sum();
                clusters.push(Cluster {
                    center: sum / self.component.len() as f32,
                    members: self.component.iter().map(|&i| particles[i].id()).collect(),
                });
            }
        }

        clusters
    }
}

/// One-shot convenience over [`ClusterDetector::detect`].
pub fn find_clusters(
    graph: &ConnectionGraph,
    particles: &[Particle],
    min_size: usize,
) -> Vec<Cluster> {
    ClusterDetector::new().detect(graph, particles, min_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::FieldConfig;
    use crate::core::rng::Rng;
    use std::collections::HashSet;

    fn build(positions: &[(f32, f32)]) -> (Vec<Particle>, ConnectionGraph) {
        let mut rng = Rng::new(31);
        let mut ps: Vec<Particle> = positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                Particle::new(ParticleId(i as u32), Vec2::new(x, y), Vec2::ZERO, &mut rng)
            })
            .collect();
        let mut graph = ConnectionGraph::new();
        graph.rebuild(&mut ps, &FieldConfig::default());
        (ps, graph)
    }

    /// `count` particles in a horizontal chain, 100px apart.
    fn chain(origin: (f32, f32), count: usize) -> Vec<(f32, f32)> {
        (0..count)
            .map(|i| (origin.0 + i as f32 * 100.0, origin.1))
            .collect()
    }

    #[test]
    fn chain_forms_one_cluster_at_its_mean() {
        let (ps, graph) = build(&chain((0.0, 50.0), 12));
        let clusters = find_clusters(&graph, &ps, 10);

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 12);
        assert!((clusters[0].center - Vec2::new(550.0, 50.0)).length() < 1e-3);
    }

    #[test]
    fn small_components_are_discarded() {
        let (ps, graph) = build(&chain((0.0, 0.0), 9));
        assert!(find_clusters(&graph, &ps, 10).is_empty());
    }

    #[test]
    fn isolated_particles_are_never_members() {
        let mut positions = chain((0.0, 0.0), 10);
        positions.push((5000.0, 5000.0));
        positions.push((-5000.0, 0.0));
        let (ps, graph) = build(&positions);

        let clusters = find_clusters(&graph, &ps, 10);
        let members: HashSet<ParticleId> = clusters
            .iter()
            .flat_map(|c| c.members.iter().copied())
            .collect();
        for (i, p) in ps.iter().enumerate() {
            if graph.degree(i) == 0 {
                assert!(!members.contains(&p.id()));
            }
        }
        assert_eq!(members.len(), 10);
    }

    #[test]
    fn membership_equals_component() {
        // Two chains far apart plus a short one that stays below the threshold
        let mut positions = chain((0.0, 0.0), 10);
        positions.extend(chain((0.0, 2000.0), 11));
        positions.extend(chain((0.0, 4000.0), 3));
        let (ps, graph) = build(&positions);

        let clusters = find_clusters(&graph, &ps, 10);
        assert_eq!(clusters.len(), 2);

        let mut sets: Vec<HashSet<u32>> = clusters
            .iter()
            .map(|c| c.members.iter().map(|id| id.0).collect())
            .collect();
        sets.sort_by_key(|s| s.len());
        assert_eq!(sets[0], (0..10).collect());
        assert_eq!(sets[1], (10..21).collect());
    }

    #[test]
    fn branching_component_counts_each_member_once() {
        // A hub with a ring around it; every member is reachable along several paths
        let mut positions = vec![(0.0, 0.0)];
        for k in 0..12 {
            let angle = k as f32 / 12.0 * std::f32::consts::TAU;
            positions.push((angle.cos() * 140.0, angle.sin() * 140.0));
        }
        let (ps, graph) = build(&positions);
        let clusters = find_clusters(&graph, &ps, 10);

        assert_eq!(clusters.len(), 1);
        let unique: HashSet<ParticleId> = clusters[0].members.iter().copied().collect();
        assert_eq!(unique.len(), clusters[0].members.len());
        assert_eq!(unique.len(), 13);
    }

    #[test]
    fn same_state_same_centers() {
        let mut positions = chain((0.0, 0.0), 10);
        positions.extend(chain((30.0, 1000.0), 14));
        let (ps, graph) = build(&positions);

        let mut detector = ClusterDetector::new();
        let first = detector.detect(&graph, &ps, 10);
        let second = detector.detect(&graph, &ps, 10);

        let key = |c: &Cluster| (c.center.x.to_bits(), c.center.y.to_bits());
        let a: HashSet<_> = first.iter().map(key).collect();
        let b: HashSet<_> = second.iter().map(key).collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn empty_field_has_no_clusters() {
        let (ps, graph) = build(&[]);
        assert!(find_clusters(&graph, &ps, 10).is_empty());
    }
}
