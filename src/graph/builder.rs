//! Graph construction module

use anyhow::{ensure, Result};

use crate::graph::SymmetricGraph;

/// Builder for incrementally constructing a SymmetricGraph from undirected
/// edge pairs. Self-loops and duplicate edges are dropped during `build`.
pub struct GraphBuilder {
    /// Number of vertices seen so far
    node_count: usize,

    /// Adjacency lists for each vertex, unsorted until `build`
    adjacency_lists: Vec<Vec<u32>>,
}

impl GraphBuilder {
    /// Create an empty graph builder
    pub fn new() -> Self {
        Self {
            node_count: 0,
            adjacency_lists: Vec::new(),
        }
    }

    /// Create a new graph builder with the given vertex capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            node_count: 0,
            adjacency_lists: Vec::with_capacity(capacity),
        }
    }

    /// Make sure vertex `v` exists, growing the vertex range if needed.
    /// Vertices between the old and new maximum become isolated vertices.
    pub fn ensure_vertex(&mut self, v: u32) {
        let needed = v as usize + 1;
        if needed > self.node_count {
            self.adjacency_lists.resize_with(needed, Vec::new);
            self.node_count = needed;
        }
    }

    /// Add the undirected edge {u, v}
    pub fn add_edge(&mut self, u: u32, v: u32) {
        self.ensure_vertex(u);
        self.ensure_vertex(v);

        if u == v {
            return;
        }

        self.adjacency_lists[u as usize].push(v);
        self.adjacency_lists[v as usize].push(u);
    }

    /// Build the compressed graph
    pub fn build(mut self) -> Result<SymmetricGraph> {
        ensure!(
            self.node_count <= u32::MAX as usize,
            "graph has too many vertices for u32 ids"
        );

        // Sort and deduplicate each adjacency list
        for list in &mut self.adjacency_lists {
            list.sort_unstable();
            list.dedup();
        }

        let edge_count: usize = self.adjacency_lists.iter().map(|list| list.len()).sum();

        let mut offsets = Vec::with_capacity(self.node_count + 1);
        offsets.push(0);

        let mut offset = 0;
        for list in &self.adjacency_lists {
            offset += list.len();
            offsets.push(offset);
        }

        let mut edges = Vec::with_capacity(edge_count);
        for list in &self.adjacency_lists {
            edges.extend_from_slice(list);
        }

        Ok(SymmetricGraph {
            node_count: self.node_count,
            offsets,
            edges,
        })
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
