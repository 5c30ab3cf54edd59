//! Memory-efficient undirected graph representation

use std::mem;

use anyhow::{ensure, Result};
use rayon::prelude::*;

/// Compressed sparse row representation of a simple undirected graph.
///
/// Every undirected edge {u, v} appears twice, once in each endpoint's
/// adjacency list, and every adjacency list is sorted by ascending neighbor
/// id. The similarity kernel and both indices rely on that ordering.
#[derive(Debug, Clone)]
pub struct SymmetricGraph {
    /// Number of vertices in the graph
    pub node_count: usize,

    /// Offset array: offsets[v] to offsets[v+1] defines the edge range for vertex v
    pub offsets: Vec<usize>,

    /// Edge array: concatenated adjacency lists, each sorted ascending
    pub edges: Vec<u32>,
}

impl SymmetricGraph {
    /// Create an empty graph with pre-allocated capacity
    pub fn with_capacity(node_count: usize, directed_edge_count: usize) -> Self {
        Self {
            node_count,
            offsets: Vec::with_capacity(node_count + 1),
            edges: Vec::with_capacity(directed_edge_count),
        }
    }

    /// Number of undirected edges
    pub fn num_edges(&self) -> usize {
        self.edges.len() / 2
    }

    /// Neighbors of a vertex, sorted ascending
    pub fn neighbors(&self, v: usize) -> &[u32] {
        &self.edges[self.offsets[v]..self.offsets[v + 1]]
    }

    /// Degree of a vertex
    pub fn degree(&self, v: usize) -> usize {
        self.offsets[v + 1] - self.offsets[v]
    }

    /// Check whether the edge {u, v} exists
    pub fn has_edge(&self, u: usize, v: u32) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }

    /// Verify the structural preconditions the engine demands: offsets cover
    /// the edge array, adjacency lists are strictly ascending (no duplicates,
    /// no self-loops), and every edge is present at both endpoints.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.offsets.len() == self.node_count + 1,
            "offset array has length {} for {} vertices",
            self.offsets.len(),
            self.node_count
        );
        ensure!(
            self.offsets.first() == Some(&0) && self.offsets.last() == Some(&self.edges.len()),
            "offset array does not cover the edge array"
        );
        ensure!(
            self.offsets.windows(2).all(|w| w[0] <= w[1]),
            "offset array is not non-decreasing"
        );

        (0..self.node_count).into_par_iter().try_for_each(|v| {
            let neighbors = self.neighbors(v);
            ensure!(
                neighbors.windows(2).all(|w| w[0] < w[1]),
                "adjacency list of vertex {} is not strictly ascending",
                v
            );
            for &u in neighbors {
                ensure!(
                    (u as usize) < self.node_count,
                    "vertex {} has out-of-range neighbor {}",
                    v,
                    u
                );
                ensure!(u as usize != v, "vertex {} has a self-loop", v);
                ensure!(
                    self.has_edge(u as usize, v as u32),
                    "edge {{{}, {}}} is missing its reverse direction",
                    v,
                    u
                );
            }
            Ok(())
        })
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<usize>();
        let edges = self.edges.capacity() * mem::size_of::<u32>();

        base + offsets + edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn triangle() -> SymmetricGraph {
        let mut builder = GraphBuilder::new();
        builder.add_edge(0, 1);
        builder.add_edge(1, 2);
        builder.add_edge(0, 2);
        builder.build().unwrap()
    }

    #[test]
    fn neighbors_are_sorted_and_symmetric() {
        let graph = triangle();
        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.num_edges(), 3);
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.neighbors(1), &[0, 2]);
        assert_eq!(graph.neighbors(2), &[0, 1]);
        graph.validate().unwrap();
    }

    #[test]
    fn has_edge_checks_membership() {
        let graph = triangle();
        assert!(graph.has_edge(0, 1));
        assert!(graph.has_edge(1, 0));
        assert!(!graph.has_edge(0, 0));
    }

    #[test]
    fn validate_rejects_unsorted_adjacency() {
        let graph = SymmetricGraph {
            node_count: 3,
            offsets: vec![0, 2, 3, 4],
            edges: vec![2, 1, 0, 0],
        };
        assert!(graph.validate().is_err());
    }

    #[test]
    fn validate_rejects_asymmetric_edges() {
        let graph = SymmetricGraph {
            node_count: 2,
            offsets: vec![0, 1, 1],
            edges: vec![1],
        };
        assert!(graph.validate().is_err());
    }
}
