//! Exact similarity via edge-indexed triangle counting

use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Result;
use rayon::prelude::*;

use crate::graph::{DegreeOrientedGraph, SymmetricGraph};
use crate::similarity::intersect::intersect_with_index;
use crate::similarity::EdgeSimilarity;

/// Cosine similarity of the closed neighborhoods of two adjacent vertices.
/// The +2 and +1 terms account for each endpoint belonging to both closed
/// neighborhoods.
pub(crate) fn cosine_formula(degree_u: u32, degree_v: u32, shared: u32) -> f32 {
    (shared + 2) as f32 / (((degree_u + 1) as f32).sqrt() * ((degree_v + 1) as f32).sqrt())
}

/// Jaccard similarity of the closed neighborhoods of two adjacent vertices.
/// The denominator |N[u] ∪ N[v]| simplifies to deg(u) + deg(v) − shared.
pub(crate) fn jaccard_formula(degree_u: u32, degree_v: u32, shared: u32) -> f32 {
    (shared + 2) as f32 / (degree_u as u64 + degree_v as u64 - shared as u64) as f32
}

/// Exact cosine similarity for every adjacent vertex pair
pub fn cosine_similarities(graph: &SymmetricGraph) -> Result<Vec<EdgeSimilarity>> {
    all_edge_neighborhood_similarities(graph, cosine_formula)
}

/// Exact Jaccard similarity for every adjacent vertex pair
pub fn jaccard_similarities(graph: &SymmetricGraph) -> Result<Vec<EdgeSimilarity>> {
    all_edge_neighborhood_similarities(graph, jaccard_formula)
}

/// Shared exact kernel. `similarity_fn` maps (deg(u), deg(v), shared neighbor
/// count) to a score and must be symmetric in its first two arguments.
pub(crate) fn all_edge_neighborhood_similarities<F>(
    graph: &SymmetricGraph,
    similarity_fn: F,
) -> Result<Vec<EdgeSimilarity>>
where
    F: Fn(u32, u32, u32) -> f32 + Sync,
{
    // Counting the neighbors shared between adjacent vertices u and v is the
    // same as counting the triangles the edge {u, v} appears in.
    let directed = DegreeOrientedGraph::build(graph);
    let counters = count_shared_neighbors(graph, &directed, usize::MAX);
    Ok(similarities_from_counts(
        graph,
        &directed,
        &counters,
        |_, _| None,
        similarity_fn,
    ))
}

/// Count, for every directed edge (u, v), the neighbors shared between u and
/// v in the undirected graph. The counter for edge j out of vertex u lives at
/// `directed.offsets[u] + j`.
///
/// Triangles are found in the directed orientation: for each directed edge
/// (u, v), intersect the out-lists of u and v. Every common out-neighbor w
/// closes a directed triangle (u→v, u→w, v→w), and there is a bijection
/// between these and the undirected triangles of the graph, so each of the
/// three edge counters is bumped once per triangle.
///
/// Vertices of degree >= `degree_threshold` are skipped, as are counter bumps
/// onto edges whose endpoints are both high-degree; the approximate kernels
/// estimate those edges from fingerprints instead. Pass `usize::MAX` to count
/// every edge.
pub(crate) fn count_shared_neighbors(
    graph: &SymmetricGraph,
    directed: &DegreeOrientedGraph,
    degree_threshold: usize,
) -> Vec<AtomicU32> {
    let counters: Vec<AtomicU32> = (0..directed.num_edges())
        .map(|_| AtomicU32::new(0))
        .collect();

    (0..graph.node_count).into_par_iter().for_each(|u| {
        // Directed edges point toward higher degree, so if u is high-degree
        // every pair (u, out-neighbor) will be approximated; skip it whole.
        if graph.degree(u) >= degree_threshold {
            return;
        }
        let u_offset = directed.offsets[u];
        let u_out = directed.out_neighbors(u);
        for (u_to_v, &v) in u_out.iter().enumerate() {
            let v = v as usize;
            let v_offset = directed.offsets[v];
            let v_out = directed.out_neighbors(v);
            let v_is_high_degree = graph.degree(v) >= degree_threshold;
            let matches = intersect_with_index(u_out, v_out, |w, u_to_w, v_to_w| {
                counters[u_offset + u_to_w].fetch_add(1, Ordering::Relaxed);
                if !(v_is_high_degree && graph.degree(w as usize) >= degree_threshold) {
                    counters[v_offset + v_to_w].fetch_add(1, Ordering::Relaxed);
                }
            });
            counters[u_offset + u_to_v].fetch_add(matches, Ordering::Relaxed);
        }
    });

    counters
}

/// Convert shared-neighbor counts into one `EdgeSimilarity` per half-edge.
///
/// `estimate(u, v)` may shortcut the formula with a sketch-based score; it is
/// consulted with the directed source first and returns `None` for edges that
/// should use `similarity_fn` on the exact counter value.
pub(crate) fn similarities_from_counts<E, F>(
    graph: &SymmetricGraph,
    directed: &DegreeOrientedGraph,
    counters: &[AtomicU32],
    estimate: E,
    similarity_fn: F,
) -> Vec<EdgeSimilarity>
where
    E: Fn(usize, usize) -> Option<f32> + Sync,
    F: Fn(u32, u32, u32) -> f32 + Sync,
{
    let placeholder = EdgeSimilarity {
        source: 0,
        neighbor: 0,
        similarity: 0.0,
    };
    let mut similarities = vec![placeholder; 2 * directed.num_edges()];

    // The two half-edge entries for counter slot c land at 2c and 2c + 1, so
    // each source vertex owns a contiguous slice of the output and the fill
    // pass runs vertex-parallel without locks.
    let mut chunks = Vec::with_capacity(graph.node_count);
    let mut rest = similarities.as_mut_slice();
    for u in 0..graph.node_count {
        let (head, tail) = rest.split_at_mut(2 * directed.out_degree(u));
        chunks.push(head);
        rest = tail;
    }
    chunks.into_par_iter().enumerate().for_each(|(u, chunk)| {
        let u_offset = directed.offsets[u];
        let u_degree = graph.degree(u) as u32;
        for (u_to_v, &v) in directed.out_neighbors(u).iter().enumerate() {
            let similarity = match estimate(u, v as usize) {
                Some(estimated) => estimated,
                None => {
                    let shared = counters[u_offset + u_to_v].load(Ordering::Relaxed);
                    similarity_fn(u_degree, graph.degree(v as usize) as u32, shared)
                }
            };
            chunk[2 * u_to_v] = EdgeSimilarity {
                source: u as u32,
                neighbor: v,
                similarity,
            };
            chunk[2 * u_to_v + 1] = EdgeSimilarity {
                source: v,
                neighbor: u as u32,
                similarity,
            };
        }
    });

    similarities
}
