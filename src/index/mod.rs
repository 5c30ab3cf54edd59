//! Reusable SCAN index
//!
//! Building the index is the expensive part: it runs the similarity kernel
//! once and arranges the results so that any number of `cluster` queries can
//! be answered quickly afterwards, each with its own (mu, epsilon).

pub mod core_order;
pub mod neighbor_order;

pub use core_order::CoreOrder;
pub use neighbor_order::{NeighborOrder, NeighborSimilarity};

use anyhow::Result;

use crate::cluster::{engine, Clustering};
use crate::graph::SymmetricGraph;
use crate::similarity::SimilarityMeasure;

/// Index over an undirected graph from which SCAN clusterings are cheap to
/// compute, though index construction itself may be expensive.
pub struct Index {
    num_vertices: usize,
    neighbor_order: NeighborOrder,
    core_order: CoreOrder,
}

impl Index {
    /// Construct the index for `graph` under the given similarity measure.
    /// The adjacency lists of the graph must be sorted by ascending neighbor
    /// id; violations surface as errors before any similarity is computed.
    pub fn build(graph: &SymmetricGraph, similarity_measure: &SimilarityMeasure) -> Result<Self> {
        graph.validate()?;
        let neighbor_order = NeighborOrder::build(graph, similarity_measure)?;
        let core_order = CoreOrder::build(&neighbor_order);
        Ok(Self {
            num_vertices: graph.node_count,
            neighbor_order,
            core_order,
        })
    }

    /// Compute a SCAN clustering of the indexed graph at (mu, epsilon).
    ///
    /// Border vertices adjacent to cores of several clusters belong to all of
    /// them in the classical formulation; this implementation assigns one
    /// arbitrary choice among them. The core vertices and their grouping into
    /// clusters are fully determined by the index and the parameters.
    ///
    /// The returned mapping has one entry per vertex: a cluster id in
    /// [0, n), not necessarily contiguous, or `UNCLUSTERED`.
    ///
    /// Takes `&self` only; concurrent `cluster` calls on one index are safe.
    pub fn cluster(&self, mu: u64, epsilon: f32) -> Result<Clustering> {
        engine::cluster(&self.neighbor_order, &self.core_order, mu, epsilon)
    }

    /// Number of vertices covered by the index
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }
}
