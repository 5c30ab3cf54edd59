//! Per-vertex incident edges sorted by descending similarity

use anyhow::{ensure, Result};
use rayon::prelude::*;

use crate::graph::SymmetricGraph;
use crate::similarity::SimilarityMeasure;

/// One slot of the neighbor order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborSimilarity {
    /// Neighbor vertex id
    pub neighbor: u32,

    /// Similarity of the edge to that neighbor
    pub similarity: f32,
}

/// For each vertex, its incident edges sorted by descending similarity with
/// ties broken by ascending neighbor id. The epsilon-neighborhood of any
/// vertex is then a prefix of its list.
pub struct NeighborOrder {
    /// Offset array, same shape as the graph's adjacency offsets
    offsets: Vec<usize>,

    /// Concatenated per-vertex (neighbor, similarity) runs
    edges: Vec<NeighborSimilarity>,
}

impl NeighborOrder {
    /// Run the similarity kernel and arrange its output per vertex. One
    /// parallel sort keyed (source asc, similarity desc, neighbor asc) puts
    /// every vertex's run in place, since runs have the same lengths as the
    /// adjacency lists.
    pub fn build(graph: &SymmetricGraph, similarity_measure: &SimilarityMeasure) -> Result<Self> {
        let mut similarities = similarity_measure.all_edges(graph)?;
        ensure!(
            similarities.par_iter().all(|e| !e.similarity.is_nan()),
            "similarity kernel produced NaN"
        );

        similarities.par_sort_unstable_by(|a, b| {
            a.source
                .cmp(&b.source)
                .then_with(|| b.similarity.total_cmp(&a.similarity))
                .then_with(|| a.neighbor.cmp(&b.neighbor))
        });

        let edges = similarities
            .into_par_iter()
            .map(|e| NeighborSimilarity {
                neighbor: e.neighbor,
                similarity: e.similarity,
            })
            .collect();

        Ok(Self {
            offsets: graph.offsets.clone(),
            edges,
        })
    }

    /// Number of vertices covered by the index
    pub fn num_vertices(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Incident edges of `v`, best similarity first
    pub fn edges(&self, v: usize) -> &[NeighborSimilarity] {
        &self.edges[self.offsets[v]..self.offsets[v + 1]]
    }

    /// Degree of `v`
    pub fn degree(&self, v: usize) -> usize {
        self.offsets[v + 1] - self.offsets[v]
    }

    /// Number of incident edges of `v` with similarity >= epsilon
    pub fn count_at_least(&self, v: usize, epsilon: f32) -> usize {
        self.edges(v).partition_point(|e| e.similarity >= epsilon)
    }
}
