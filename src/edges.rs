//! Proximity edges between particles.
//!
//! Every unordered pair is checked each frame. There is no spatial index: the
//! field holds on the order of a hundred particles, so the quadratic pass is
//! cheaper than maintaining one.

use crate::particle::Particle;

/// A line between two particles closer than the connection threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Index of the first particle (always less than `b`).
    pub a: u32,
    /// Index of the second particle.
    pub b: u32,
    /// Euclidean distance between the two particles.
    pub distance: f32,
}

/// Rebuild `out` with every pair whose distance is strictly below `threshold`.
///
/// Pairs are emitted once, ordered by `(a, b)`. `out` is cleared first so its
/// allocation can be reused across frames.
pub fn find_edges(particles: &[Particle], threshold: f32, out: &mut Vec<Edge>) {
    out.clear();
    let threshold_sq = threshold * threshold;

    for (i, p) in particles.iter().enumerate() {
        for (j, q) in particles.iter().enumerate().skip(i + 1) {
            let dist_sq = p.position.distance_squared(q.position);
            if dist_sq < threshold_sq {
                out.push(Edge {
                    a: i as u32,
                    b: j as u32,
                    distance: dist_sq.sqrt(),
                });
            }
        }
    }
}

/// Upper bound on the number of edges for `count` particles.
#[inline]
pub fn max_edges(count: usize) -> usize {
    count * count.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    fn at(x: f32, y: f32, z: f32) -> Particle {
        Particle::new(Vec3::new(x, y, z), Vec3::Y, 0.0, Vec3::ZERO, Vec4::ONE)
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut edges = Vec::new();

        find_edges(&[at(0.0, 0.0, 0.0), at(11.9, 0.0, 0.0)], 12.0, &mut edges);
        assert_eq!(edges.len(), 1);
        assert!((edges[0].distance - 11.9).abs() < 1e-4);

        find_edges(&[at(0.0, 0.0, 0.0), at(12.1, 0.0, 0.0)], 12.0, &mut edges);
        assert!(edges.is_empty());

        find_edges(&[at(0.0, 0.0, 0.0), at(12.0, 0.0, 0.0)], 12.0, &mut edges);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_no_duplicates_or_self_edges() {
        let particles: Vec<Particle> = (0..10).map(|i| at(i as f32, 0.0, 0.0)).collect();
        let mut edges = Vec::new();
        find_edges(&particles, 100.0, &mut edges);

        assert_eq!(edges.len(), max_edges(10));
        for edge in &edges {
            assert!(edge.a < edge.b);
        }
        let mut pairs: Vec<(u32, u32)> = edges.iter().map(|e| (e.a, e.b)).collect();
        pairs.dedup();
        assert_eq!(pairs.len(), edges.len());
    }

    #[test]
    fn test_matches_brute_force_in_3d() {
        let particles = [
            at(0.0, 0.0, 0.0),
            at(3.0, 4.0, 0.0),
            at(0.0, 0.0, 5.5),
            at(-2.0, -2.0, -2.0),
        ];
        let mut edges = Vec::new();
        find_edges(&particles, 5.0, &mut edges);

        for i in 0..particles.len() {
            for j in 0..particles.len() {
                if i == j {
                    continue;
                }
                let close = particles[i].position.distance(particles[j].position) < 5.0;
                let (a, b) = (i.min(j) as u32, i.max(j) as u32);
                let found = edges.iter().any(|e| e.a == a && e.b == b);
                assert_eq!(close, found, "pair ({}, {})", a, b);
            }
        }
    }

    #[test]
    fn test_buffer_is_reused() {
        let mut edges = vec![Edge { a: 7, b: 9, distance: 1.0 }];
        find_edges(&[at(0.0, 0.0, 0.0)], 12.0, &mut edges);
        assert!(edges.is_empty());
        assert_eq!(max_edges(0), 0);
        assert_eq!(max_edges(1), 0);
    }
}
