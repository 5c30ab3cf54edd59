//! MinHash sketching for approximate Jaccard similarity
//!
//! Two closed neighborhoods are compared through coordinated minima: for each
//! sample position s, both vertices take the minimum of a keyed hash over
//! their closed neighborhood. The probability that the minima agree equals
//! the Jaccard similarity of the two sets, so the fraction of matching
//! positions estimates it.

use anyhow::Result;
use rayon::prelude::*;

use crate::graph::{DegreeOrientedGraph, SymmetricGraph};
use crate::similarity::exact::{count_shared_neighbors, jaccard_formula, similarities_from_counts};
use crate::similarity::random::{hash64, hash64_2};
use crate::similarity::{degree_threshold, EdgeSimilarity};

/// Approximate Jaccard similarity: MinHash estimates for edges whose
/// endpoints are both high-degree, exact triangle counting everywhere else.
pub fn approx_jaccard_similarities(
    graph: &SymmetricGraph,
    num_samples: u32,
    seed: u64,
) -> Result<Vec<EdgeSimilarity>> {
    let threshold = degree_threshold(num_samples);
    let node_count = graph.node_count;
    let samples = num_samples as u64;
    let random_offset = hash64(seed);

    // Sample s of vertex x hashes to hash64_2(offset + samples * x + s); the
    // fingerprint of v takes the minimum over v's closed neighborhood. Only
    // vertices that can appear in an approximated pair are sketched.
    let keyed_hash = |x: u64, sample_id: u64| {
        hash64_2(
            random_offset
                .wrapping_add(samples.wrapping_mul(x))
                .wrapping_add(sample_id),
        )
    };

    let fingerprints: Vec<Vec<u64>> = (0..node_count)
        .into_par_iter()
        .map(|v| {
            if graph.degree(v) < threshold {
                return Vec::new();
            }
            let has_high_degree_neighbor = graph
                .neighbors(v)
                .iter()
                .any(|&u| graph.degree(u as usize) >= threshold);
            if !has_high_degree_neighbor {
                return Vec::new();
            }
            (0..samples)
                .map(|sample_id| {
                    let mut minimum = keyed_hash(v as u64, sample_id);
                    for &u in graph.neighbors(v) {
                        minimum = minimum.min(keyed_hash(u as u64, sample_id));
                    }
                    minimum
                })
                .collect()
        })
        .collect();

    let directed = DegreeOrientedGraph::build(graph);
    let counters = count_shared_neighbors(graph, &directed, threshold);

    let estimate = |u: usize, v: usize| -> Option<f32> {
        if graph.degree(u) < threshold {
            return None;
        }
        let matching = fingerprints[u]
            .iter()
            .zip(&fingerprints[v])
            .filter(|(a, b)| a == b)
            .count();
        Some((matching as f32 / num_samples as f32).clamp(0.0, 1.0))
    };

    Ok(similarities_from_counts(
        graph,
        &directed,
        &counters,
        estimate,
        jaccard_formula,
    ))
}
