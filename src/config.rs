//! Configuration management for the SCAN engine

use anyhow::{bail, Result};

use crate::similarity::SimilarityMeasure;

/// Default number of epsilon-similar closed neighbors for a core vertex
pub const DEFAULT_MU: u64 = 2;

/// Default similarity threshold
pub const DEFAULT_EPSILON: f32 = 0.6;

/// Default number of sketch samples for the approximate measures
pub const DEFAULT_NUM_SAMPLES: u32 = 256;

/// Default RNG seed for the approximate measures
pub const DEFAULT_SEED: u64 = 0;

/// Bundled parameters for one end-to-end run
#[derive(Debug, Clone)]
pub struct Config {
    /// Similarity measure used during index construction
    pub similarity: SimilarityMeasure,

    /// SCAN mu parameter
    pub mu: u64,

    /// SCAN epsilon parameter
    pub epsilon: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            similarity: SimilarityMeasure::Cosine,
            mu: DEFAULT_MU,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Resolve a similarity-measure name from the command line
pub fn parse_similarity(name: &str, num_samples: u32, seed: u64) -> Result<SimilarityMeasure> {
    match name {
        "cosine" => Ok(SimilarityMeasure::Cosine),
        "jaccard" => Ok(SimilarityMeasure::Jaccard),
        "approx-cosine" => Ok(SimilarityMeasure::ApproxCosine { num_samples, seed }),
        "approx-jaccard" => Ok(SimilarityMeasure::ApproxJaccard { num_samples, seed }),
        other => bail!(
            "unknown similarity measure {:?}; expected cosine, jaccard, approx-cosine or approx-jaccard",
            other
        ),
    }
}
