//! Core library for index-based SCAN clustering of undirected graphs

pub mod cluster;
pub mod config;
pub mod data;
pub mod graph;
pub mod index;
pub mod similarity;
pub mod storage;

pub use anyhow::{anyhow, Result};

pub use cluster::{Clustering, UNCLUSTERED};
pub use graph::{GraphBuilder, SymmetricGraph};
pub use index::Index;
pub use similarity::SimilarityMeasure;
