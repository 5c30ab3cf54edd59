//! Per-edge structural similarity kernels
//!
//! Every kernel returns one `EdgeSimilarity` per directed half-edge, so the
//! output has length 2|E| and the (u, v) and (v, u) entries carry the same
//! value. The exact kernels count triangles; the approximate kernels sketch
//! high-degree vertices and fall back to exact counting everywhere else.

pub mod exact;
pub mod intersect;
pub mod minhash;
pub mod random;
pub mod simhash;

use anyhow::{ensure, Result};

use crate::graph::SymmetricGraph;

/// Similarity score attached to one directed half-edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSimilarity {
    /// Source vertex id
    pub source: u32,

    /// Neighbor vertex id
    pub neighbor: u32,

    /// Structural similarity of the edge {source, neighbor}
    pub similarity: f32,
}

/// Choice of structural similarity measure for index construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimilarityMeasure {
    /// Exact cosine similarity of closed neighborhoods
    Cosine,

    /// Exact Jaccard similarity of closed neighborhoods
    Jaccard,

    /// SimHash estimate of the cosine similarity on high-degree vertex pairs,
    /// exact elsewhere. Deterministic for a fixed seed.
    ApproxCosine { num_samples: u32, seed: u64 },

    /// MinHash estimate of the Jaccard similarity on high-degree vertex pairs,
    /// exact elsewhere. Deterministic for a fixed seed.
    ApproxJaccard { num_samples: u32, seed: u64 },
}

impl SimilarityMeasure {
    /// Compute the similarity of every adjacent vertex pair in `graph`.
    /// Adjacency lists must be sorted by ascending neighbor id.
    pub fn all_edges(&self, graph: &SymmetricGraph) -> Result<Vec<EdgeSimilarity>> {
        match *self {
            SimilarityMeasure::Cosine => exact::cosine_similarities(graph),
            SimilarityMeasure::Jaccard => exact::jaccard_similarities(graph),
            SimilarityMeasure::ApproxCosine { num_samples, seed } => {
                ensure!(num_samples > 0, "num_samples must be positive");
                simhash::approx_cosine_similarities(graph, num_samples, seed)
            }
            SimilarityMeasure::ApproxJaccard { num_samples, seed } => {
                ensure!(num_samples > 0, "num_samples must be positive");
                minhash::approx_jaccard_similarities(graph, num_samples, seed)
            }
        }
    }
}

/// Degree at or above which the approximate measures sketch a vertex instead
/// of counting triangles around it. Below this, exact computation is cheaper
/// than building and comparing fingerprints.
pub(crate) fn degree_threshold(num_samples: u32) -> usize {
    4 * num_samples as usize
}
