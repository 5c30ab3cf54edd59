//! For which (mu, epsilon) is a vertex a core

use rayon::prelude::*;

use crate::index::NeighborOrder;

/// One core-order entry: at parameter `mu`, vertex `vertex` is a core for
/// every epsilon <= `threshold` (its (mu-1)-th best incident similarity).
#[derive(Debug, Clone, Copy)]
struct CoreThreshold {
    mu: u32,
    threshold: f32,
    vertex: u32,
}

/// Grouping of all vertices by the range of (mu, epsilon) parameters at which
/// they are cores. Entries are bucketed by mu and, within a bucket, sorted by
/// threshold descending, so core enumeration is a binary search plus a prefix
/// read.
pub struct CoreOrder {
    /// Entries sorted by (mu asc, threshold desc, vertex asc)
    entries: Vec<CoreThreshold>,

    /// bucket_offsets[mu]..bucket_offsets[mu + 1] is the entry range for mu.
    /// Buckets 0 and 1 are empty; the last bucket is max_degree + 1.
    bucket_offsets: Vec<usize>,
}

impl CoreOrder {
    /// Derive the core order from the neighbor order. Vertex v contributes
    /// one entry per feasible mu, i.e. for mu in 2..=deg(v)+1 with threshold
    /// S_v[mu - 1], the similarity of its (mu-1)-th best incident edge.
    pub fn build(neighbor_order: &NeighborOrder) -> Self {
        let node_count = neighbor_order.num_vertices();
        let max_degree = (0..node_count)
            .map(|v| neighbor_order.degree(v))
            .max()
            .unwrap_or(0);

        let mut entries: Vec<CoreThreshold> = (0..node_count)
            .into_par_iter()
            .flat_map_iter(|v| {
                neighbor_order
                    .edges(v)
                    .iter()
                    .enumerate()
                    .map(move |(rank, e)| CoreThreshold {
                        mu: rank as u32 + 2,
                        threshold: e.similarity,
                        vertex: v as u32,
                    })
            })
            .collect();

        entries.par_sort_unstable_by(|a, b| {
            a.mu.cmp(&b.mu)
                .then_with(|| b.threshold.total_cmp(&a.threshold))
                .then_with(|| a.vertex.cmp(&b.vertex))
        });

        let num_buckets = max_degree + 2;
        let bucket_offsets: Vec<usize> = (0..=num_buckets)
            .map(|mu| entries.partition_point(|e| (e.mu as usize) < mu))
            .collect();

        Self {
            entries,
            bucket_offsets,
        }
    }

    /// Largest mu for which any vertex can be a core (max degree + 1)
    pub fn max_mu(&self) -> usize {
        self.bucket_offsets.len().saturating_sub(2)
    }

    /// All core vertices at (mu, epsilon). Requires mu >= 2; a mu beyond
    /// every vertex's degree yields an empty set.
    pub fn cores(&self, mu: usize, epsilon: f32) -> Vec<u32> {
        debug_assert!(mu >= 2);
        if mu + 1 >= self.bucket_offsets.len() {
            return Vec::new();
        }
        let bucket = &self.entries[self.bucket_offsets[mu]..self.bucket_offsets[mu + 1]];
        let end = bucket.partition_point(|e| e.threshold >= epsilon);
        bucket[..end].iter().map(|e| e.vertex).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, SymmetricGraph};
    use crate::similarity::SimilarityMeasure;

    fn two_triangles() -> SymmetricGraph {
        let mut builder = GraphBuilder::new();
        for &(u, v) in &[(0, 1), (0, 2), (1, 2), (2, 3), (3, 4), (3, 5), (4, 5)] {
            builder.add_edge(u, v);
        }
        builder.build().unwrap()
    }

    fn fixture_core_order() -> CoreOrder {
        let graph = two_triangles();
        let order = NeighborOrder::build(&graph, &SimilarityMeasure::Cosine).unwrap();
        CoreOrder::build(&order)
    }

    #[test]
    fn mu_two_requires_one_strong_edge() {
        let core_order = fixture_core_order();

        // Only the edges (0,1) and (4,5) have similarity 1.0.
        let mut cores = core_order.cores(2, 0.95);
        cores.sort_unstable();
        assert_eq!(cores, vec![0, 1, 4, 5]);

        // Everything has at least one incident edge above 0.1.
        assert_eq!(core_order.cores(2, 0.1).len(), 6);
    }

    #[test]
    fn mu_three_requires_two_strong_edges() {
        let core_order = fixture_core_order();

        // Second-best similarities: ~0.866 for 0,1,2,3,4,5 except the
        // bridge-adjacent third edges; all six clear 0.8.
        let mut cores = core_order.cores(3, 0.8);
        cores.sort_unstable();
        assert_eq!(cores, vec![0, 1, 2, 3, 4, 5]);

        // No vertex has two incident edges of similarity >= 0.9.
        assert!(core_order.cores(3, 0.9).is_empty());
    }

    #[test]
    fn mu_beyond_max_degree_has_no_cores() {
        let core_order = fixture_core_order();
        assert_eq!(core_order.max_mu(), 4);
        assert!(core_order.cores(5, 0.0).is_empty());
        assert!(core_order.cores(6, 0.0).is_empty());
        assert!(core_order.cores(100, 0.0).is_empty());
    }

    #[test]
    fn mu_four_needs_degree_three() {
        let core_order = fixture_core_order();
        // Only vertices 2 and 3 have degree >= 3; their third-best
        // similarity is the 0.5 bridge edge.
        let mut cores = core_order.cores(4, 0.4);
        cores.sort_unstable();
        assert_eq!(cores, vec![2, 3]);
        assert!(core_order.cores(4, 0.6).is_empty());
    }
}
