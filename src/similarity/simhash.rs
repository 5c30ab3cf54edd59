//! SimHash sketching for approximate cosine similarity
//!
//! The cosine of the angle between two neighborhood vectors is estimated by
//! projecting both onto random hyperplanes and comparing signs (Charikar's
//! rounding scheme). A hyperplane is represented by its normal vector, drawn
//! with i.i.d. standard-normal coordinates; which side a neighborhood vector
//! falls on is the sign of the dot product with that normal.

use std::f32::consts::PI;

use anyhow::Result;
use rayon::prelude::*;

use crate::graph::{DegreeOrientedGraph, SymmetricGraph};
use crate::similarity::exact::{cosine_formula, count_shared_neighbors, similarities_from_counts};
use crate::similarity::random::random_normals;
use crate::similarity::{degree_threshold, EdgeSimilarity};

const BITS_PER_WORD: usize = 64;

/// Approximate cosine similarity: SimHash estimates for edges whose endpoints
/// are both high-degree, exact triangle counting for every other edge.
pub fn approx_cosine_similarities(
    graph: &SymmetricGraph,
    num_samples: u32,
    seed: u64,
) -> Result<Vec<EdgeSimilarity>> {
    let threshold = degree_threshold(num_samples);
    let node_count = graph.node_count;
    let samples = num_samples as usize;

    // A vertex is sketched iff it and at least one of its neighbors are
    // high-degree. Normal numbers are expensive, so they are assigned only to
    // sketched vertices and their neighbors, which are the vertices whose
    // coordinates any fingerprint sum touches.
    let needs_fingerprint: Vec<bool> = (0..node_count)
        .into_par_iter()
        .map(|v| {
            graph.degree(v) >= threshold
                && graph
                    .neighbors(v)
                    .iter()
                    .any(|&u| graph.degree(u as usize) >= threshold)
        })
        .collect();
    let needs_normals: Vec<bool> = (0..node_count)
        .into_par_iter()
        .map(|v| {
            needs_fingerprint[v]
                || graph
                    .neighbors(v)
                    .iter()
                    .any(|&u| needs_fingerprint[u as usize])
        })
        .collect();

    let mut normal_index = vec![0usize; node_count];
    let mut num_needs_normals = 0usize;
    for v in 0..node_count {
        normal_index[v] = num_needs_normals;
        if needs_normals[v] {
            num_needs_normals += 1;
        }
    }
    let normals = random_normals(num_needs_normals * samples, seed);

    let num_words = (samples + BITS_PER_WORD - 1) / BITS_PER_WORD;
    let fingerprints: Vec<Vec<u64>> = (0..node_count)
        .into_par_iter()
        .map(|v| {
            if !needs_fingerprint[v] {
                return Vec::new();
            }
            // Dot product of each hyperplane normal with the closed
            // neighborhood vector of v. The neighbor traversal is sequential
            // so the float summation order is fixed for a fixed seed.
            let own = normal_index[v] * samples;
            let mut dot_products = normals[own..own + samples].to_vec();
            for &u in graph.neighbors(v) {
                let base = normal_index[u as usize] * samples;
                for (sample_id, dot) in dot_products.iter_mut().enumerate() {
                    *dot += normals[base + sample_id];
                }
            }
            // Only valid sample bits are ever set, so the unused high bits of
            // the final word stay zero and cannot disturb xor popcounts.
            let mut words = vec![0u64; num_words];
            for (sample_id, &dot) in dot_products.iter().enumerate() {
                if dot >= 0.0 {
                    words[sample_id / BITS_PER_WORD] |= 1u64 << (sample_id % BITS_PER_WORD);
                }
            }
            words
        })
        .collect();

    let directed = DegreeOrientedGraph::build(graph);
    let counters = count_shared_neighbors(graph, &directed, threshold);

    let estimate = |u: usize, v: usize| -> Option<f32> {
        // The directed source is the lower-degree endpoint, so if it clears
        // the threshold both endpoints do and both carry fingerprints.
        if graph.degree(u) < threshold {
            return None;
        }
        let differing: u32 = fingerprints[u]
            .iter()
            .zip(&fingerprints[v])
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();
        let angle = differing as f32 * PI / num_samples as f32;
        Some(angle.cos().clamp(-1.0, 1.0))
    };

    Ok(similarities_from_counts(
        graph,
        &directed,
        &counters,
        estimate,
        cosine_formula,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::similarity::exact::cosine_similarities;

    fn complete_graph(n: u32) -> SymmetricGraph {
        let mut builder = GraphBuilder::new();
        for u in 0..n {
            for v in (u + 1)..n {
                builder.add_edge(u, v);
            }
        }
        builder.build().unwrap()
    }

    #[test]
    fn low_degree_graphs_match_the_exact_kernel_bitwise() {
        let mut builder = GraphBuilder::new();
        for &(u, v) in &[(0, 1), (0, 2), (1, 2), (2, 3), (3, 4), (3, 5), (4, 5)] {
            builder.add_edge(u, v);
        }
        let graph = builder.build().unwrap();

        // Max degree 3 < 4 * num_samples, so every edge takes the exact path.
        let exact = cosine_similarities(&graph).unwrap();
        let approx = approx_cosine_similarities(&graph, 1, 42).unwrap();
        assert_eq!(exact, approx);
    }

    #[test]
    fn identical_neighborhoods_estimate_to_one() {
        // In a complete graph every closed neighborhood is the full vertex
        // set, so all sketch vectors coincide, xor popcounts are zero, and
        // the estimate is exactly cos(0) = 1, matching the exact value.
        let graph = complete_graph(64);
        assert!(graph.degree(0) >= degree_threshold(8));

        let similarities = approx_cosine_similarities(&graph, 8, 3).unwrap();
        for e in &similarities {
            assert_eq!(e.similarity, 1.0);
        }
    }

    #[test]
    fn mixed_graph_uses_exact_path_for_low_degree_endpoints() {
        // Complete graph on 12 vertices plus a pendant vertex attached to 0.
        let mut builder = GraphBuilder::new();
        for u in 0..12 {
            for v in (u + 1)..12 {
                builder.add_edge(u, v);
            }
        }
        builder.add_edge(0, 12);
        let graph = builder.build().unwrap();

        let similarities = approx_cosine_similarities(&graph, 2, 42).unwrap();
        let pendant = similarities
            .iter()
            .find(|e| e.source == 12 && e.neighbor == 0)
            .unwrap();
        // Pendant endpoint has degree 1 < 8: exact formula with no shared
        // neighbors, degrees 1 and 12.
        let expected = 2.0 / (2.0f32.sqrt() * 13.0f32.sqrt());
        assert!((pendant.similarity - expected).abs() < 1e-6);

        // Edges between non-hub clique vertices have identical closed
        // neighborhoods and are estimated as exactly 1.
        let inner = similarities
            .iter()
            .find(|e| e.source == 1 && e.neighbor == 2)
            .unwrap();
        assert_eq!(inner.similarity, 1.0);
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let graph = complete_graph(40);
        let first = approx_cosine_similarities(&graph, 8, 99).unwrap();
        let second = approx_cosine_similarities(&graph, 8, 99).unwrap();
        assert_eq!(first, second);
    }
}
