//! SCAN clustering from the prebuilt indices

use anyhow::{ensure, Result};
use rayon::prelude::*;

use crate::cluster::union_find::ConcurrentUnionFind;
use crate::cluster::{Clustering, UNCLUSTERED};
use crate::index::{CoreOrder, NeighborOrder};

/// Cluster the indexed graph at (mu, epsilon).
///
/// Cores are read off the core order, merged along core-to-core edges of
/// similarity >= epsilon, and every core's cluster id becomes the root of its
/// disjoint-set component. Non-core vertices then attach to the cluster of
/// the first core found in their epsilon-prefix, if any; which core wins when
/// several qualify is unspecified.
pub fn cluster(
    neighbor_order: &NeighborOrder,
    core_order: &CoreOrder,
    mu: u64,
    epsilon: f32,
) -> Result<Clustering> {
    ensure!(mu >= 2, "mu must be at least 2, got {}", mu);
    ensure!(
        (0.0..=1.0).contains(&epsilon),
        "epsilon must lie in [0, 1], got {}",
        epsilon
    );

    let node_count = neighbor_order.num_vertices();
    let cores = core_order.cores(usize::try_from(mu).unwrap_or(usize::MAX), epsilon);

    let mut is_core = vec![false; node_count];
    for &core in &cores {
        is_core[core as usize] = true;
    }

    // Union cores across epsilon-edges. The descending neighbor order means
    // the scan stops at the first similarity below epsilon and never visits
    // a weaker edge.
    let union_find = ConcurrentUnionFind::new(node_count);
    cores.par_iter().for_each(|&core| {
        for edge in neighbor_order.edges(core as usize) {
            if edge.similarity < epsilon {
                break;
            }
            if is_core[edge.neighbor as usize] {
                union_find.union(core, edge.neighbor);
            }
        }
    });

    let mut clustering: Clustering = vec![UNCLUSTERED; node_count];
    clustering
        .par_iter_mut()
        .enumerate()
        .for_each(|(v, assignment)| {
            if is_core[v] {
                *assignment = union_find.find(v as u32);
            } else {
                for edge in neighbor_order.edges(v) {
                    if edge.similarity < epsilon {
                        break;
                    }
                    if is_core[edge.neighbor as usize] {
                        *assignment = union_find.find(edge.neighbor);
                        break;
                    }
                }
            }
        });

    Ok(clustering)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, SymmetricGraph};
    use crate::index::{CoreOrder, NeighborOrder};
    use crate::similarity::SimilarityMeasure;

    fn two_triangles() -> SymmetricGraph {
        let mut builder = GraphBuilder::new();
        for &(u, v) in &[(0, 1), (0, 2), (1, 2), (2, 3), (3, 4), (3, 5), (4, 5)] {
            builder.add_edge(u, v);
        }
        builder.build().unwrap()
    }

    fn fixture_indices() -> (NeighborOrder, CoreOrder) {
        let graph = two_triangles();
        let neighbor_order = NeighborOrder::build(&graph, &SimilarityMeasure::Cosine).unwrap();
        let core_order = CoreOrder::build(&neighbor_order);
        (neighbor_order, core_order)
    }

    #[test]
    fn rejects_invalid_parameters() {
        let (neighbor_order, core_order) = fixture_indices();
        assert!(cluster(&neighbor_order, &core_order, 1, 0.5).is_err());
        assert!(cluster(&neighbor_order, &core_order, 0, 0.5).is_err());
        assert!(cluster(&neighbor_order, &core_order, 2, -0.1).is_err());
        assert!(cluster(&neighbor_order, &core_order, 2, 1.1).is_err());
        assert!(cluster(&neighbor_order, &core_order, 2, f32::NAN).is_err());
    }

    #[test]
    fn triangles_split_into_two_clusters() {
        let (neighbor_order, core_order) = fixture_indices();
        let clustering = cluster(&neighbor_order, &core_order, 3, 0.8).unwrap();

        assert_eq!(clustering[0], clustering[1]);
        assert_eq!(clustering[1], clustering[2]);
        assert_eq!(clustering[3], clustering[4]);
        assert_eq!(clustering[4], clustering[5]);
        assert_ne!(clustering[0], clustering[3]);
        assert!(clustering.iter().all(|&c| c != UNCLUSTERED));
    }

    #[test]
    fn weak_threshold_merges_everything() {
        let (neighbor_order, core_order) = fixture_indices();
        let clustering = cluster(&neighbor_order, &core_order, 2, 0.01).unwrap();

        let id = clustering[0];
        assert_ne!(id, UNCLUSTERED);
        assert!(clustering.iter().all(|&c| c == id));
    }

    #[test]
    fn mu_above_max_degree_leaves_everything_unclustered() {
        let (neighbor_order, core_order) = fixture_indices();
        let clustering = cluster(&neighbor_order, &core_order, 6, 0.0).unwrap();
        assert!(clustering.iter().all(|&c| c == UNCLUSTERED));
    }

    #[test]
    fn strong_threshold_leaves_bridge_vertices_out() {
        let (neighbor_order, core_order) = fixture_indices();
        // Only the similarity-1.0 edges (0,1) and (4,5) survive 0.95, so
        // vertices 2 and 3 have no epsilon-adjacent core to attach to.
        let clustering = cluster(&neighbor_order, &core_order, 2, 0.95).unwrap();

        assert_eq!(clustering[0], clustering[1]);
        assert_eq!(clustering[4], clustering[5]);
        assert_ne!(clustering[0], clustering[4]);
        assert_eq!(clustering[2], UNCLUSTERED);
        assert_eq!(clustering[3], UNCLUSTERED);
    }

    #[test]
    fn core_partition_is_stable_across_repeated_queries() {
        let (neighbor_order, core_order) = fixture_indices();
        let first = cluster(&neighbor_order, &core_order, 3, 0.8).unwrap();
        let second = cluster(&neighbor_order, &core_order, 3, 0.8).unwrap();

        // Cluster ids may differ between runs, but the grouping of cores
        // into clusters may not.
        for u in 0..first.len() {
            for v in 0..first.len() {
                assert_eq!(
                    first[u] == first[v],
                    second[u] == second[v],
                    "vertices {} and {} grouped differently",
                    u,
                    v
                );
            }
        }
    }
}
