//! SCAN clustering output types

pub mod engine;
pub mod metrics;
pub mod union_find;

use serde::{Deserialize, Serialize};

/// Cluster id of vertices that belong to no cluster
pub const UNCLUSTERED: u32 = u32::MAX;

/// Dense vertex -> cluster-id mapping returned by `Index::cluster`. Cluster
/// ids lie in [0, n) but are not necessarily contiguous; unassigned vertices
/// carry `UNCLUSTERED`.
pub type Clustering = Vec<u32>;

/// Aggregated view of one cluster, for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Cluster id as it appears in the clustering
    pub id: u32,

    /// Members of this cluster (vertex ids)
    pub members: Vec<u32>,

    /// Size of the cluster
    pub size: usize,

    /// Density: intra-cluster edges / potential intra-cluster edges
    pub density: f32,
}
