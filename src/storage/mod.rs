//! Results persistence module

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use crate::cluster::{metrics, ClusterSummary, Clustering, UNCLUSTERED};
use crate::graph::SymmetricGraph;

/// Save a clustering and its per-cluster summaries to the given directory
pub fn save_results(
    clustering: &Clustering,
    summaries: &[ClusterSummary],
    graph: &SymmetricGraph,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving {} clusters to {}", summaries.len(), output_dir);

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir))?;

    save_summary(clustering, summaries, graph, output_dir)?;
    save_assignments(clustering, output_dir)?;
    save_clusters(summaries, output_dir)?;

    Ok(())
}

/// Write high-level statistics of the run
fn save_summary(
    clustering: &Clustering,
    summaries: &[ClusterSummary],
    graph: &SymmetricGraph,
    output_dir: &str,
) -> Result<()> {
    let summary = json!({
        "num_vertices": graph.node_count,
        "num_edges": graph.num_edges(),
        "num_clusters": summaries.len(),
        "num_unclustered": metrics::count_unclustered(clustering),
        "largest_cluster": summaries.first().map(|s| s.size).unwrap_or(0),
    });

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(serde_json::to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Write the dense vertex -> cluster-id mapping. Unclustered vertices are
/// encoded as null so the marker value stays internal.
fn save_assignments(clustering: &Clustering, output_dir: &str) -> Result<()> {
    let assignments: Vec<Option<u32>> = clustering
        .iter()
        .map(|&id| if id == UNCLUSTERED { None } else { Some(id) })
        .collect();

    let path = Path::new(output_dir).join("assignments.json");
    let mut file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(serde_json::to_string(&assignments)?.as_bytes())?;

    Ok(())
}

/// Write the per-cluster member lists and metrics
fn save_clusters(summaries: &[ClusterSummary], output_dir: &str) -> Result<()> {
    let path = Path::new(output_dir).join("clusters.json");
    let mut file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(serde_json::to_string_pretty(summaries)?.as_bytes())?;

    Ok(())
}
