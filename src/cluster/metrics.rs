//! Cluster statistics and metrics

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::cluster::{ClusterSummary, Clustering, UNCLUSTERED};
use crate::graph::SymmetricGraph;

/// Group a clustering into per-cluster summaries, largest cluster first
pub fn summarize(clustering: &Clustering, graph: &SymmetricGraph) -> Vec<ClusterSummary> {
    let mut members_by_id: HashMap<u32, Vec<u32>> = HashMap::new();
    for (v, &id) in clustering.iter().enumerate() {
        if id != UNCLUSTERED {
            members_by_id.entry(id).or_default().push(v as u32);
        }
    }

    let mut summaries: Vec<ClusterSummary> = members_by_id
        .into_par_iter()
        .map(|(id, members)| {
            let density = cluster_density(graph, &members);
            ClusterSummary {
                id,
                size: members.len(),
                members,
                density,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.id.cmp(&b.id)));
    summaries
}

/// Number of vertices carrying `UNCLUSTERED`
pub fn count_unclustered(clustering: &Clustering) -> usize {
    clustering.iter().filter(|&&id| id == UNCLUSTERED).count()
}

/// Fraction of possible intra-cluster edges that exist (undirected)
pub fn cluster_density(graph: &SymmetricGraph, members: &[u32]) -> f32 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton clusters have density 1
    }

    let potential_edges = n * (n - 1) / 2;

    // For small clusters, use sequential processing
    if n < 1000 {
        return intra_cluster_edges_sequential(graph, members) as f32 / potential_edges as f32;
    }

    // For larger clusters, count in parallel
    let member_set: HashSet<u32> = members.iter().copied().collect();
    let directed_count: usize = members
        .par_iter()
        .map(|&v| {
            graph
                .neighbors(v as usize)
                .iter()
                .filter(|u| member_set.contains(u))
                .count()
        })
        .sum();

    // Each intra-cluster edge was seen from both endpoints
    (directed_count / 2) as f32 / potential_edges as f32
}

/// Sequential version for smaller clusters
fn intra_cluster_edges_sequential(graph: &SymmetricGraph, members: &[u32]) -> usize {
    let member_set: HashSet<u32> = members.iter().copied().collect();

    let mut directed_count = 0;
    for &v in members {
        for u in graph.neighbors(v as usize) {
            if member_set.contains(u) {
                directed_count += 1;
            }
        }
    }

    directed_count / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn two_triangles() -> SymmetricGraph {
        let mut builder = GraphBuilder::new();
        for &(u, v) in &[(0, 1), (0, 2), (1, 2), (2, 3), (3, 4), (3, 5), (4, 5)] {
            builder.add_edge(u, v);
        }
        builder.build().unwrap()
    }

    #[test]
    fn density_of_a_triangle_is_one() {
        let graph = two_triangles();
        assert_eq!(cluster_density(&graph, &[0, 1, 2]), 1.0);
        assert_eq!(cluster_density(&graph, &[3]), 1.0);
    }

    #[test]
    fn density_counts_only_internal_edges() {
        let graph = two_triangles();
        // {0, 1, 2, 3}: four internal edges out of six possible.
        let density = cluster_density(&graph, &[0, 1, 2, 3]);
        assert!((density - 4.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn summarize_groups_and_sorts_by_size() {
        let graph = two_triangles();
        let clustering = vec![7, 7, 7, 2, 2, UNCLUSTERED];
        let summaries = summarize(&clustering, &graph);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, 7);
        assert_eq!(summaries[0].members, vec![0, 1, 2]);
        assert_eq!(summaries[1].size, 2);
        assert_eq!(count_unclustered(&clustering), 1);
    }
}
