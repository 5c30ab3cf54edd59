//! Plain-text edge list loading

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use crate::graph::{GraphBuilder, SymmetricGraph};

/// Load an undirected graph from a whitespace-separated edge list.
///
/// Each non-empty line names one edge as two vertex ids; lines starting with
/// '#' or '%' are comments. Self-loops and duplicate edges are dropped during
/// graph construction, so a directed edge list symmetrizes cleanly.
pub fn load_edge_list<P: AsRef<Path>>(path: P) -> Result<SymmetricGraph> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let mut builder = GraphBuilder::new();
    for (line_number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let u = parse_vertex(fields.next(), line_number)?;
        let v = parse_vertex(fields.next(), line_number)?;
        builder.add_edge(u, v);
    }

    let graph = builder.build()?;
    log::info!(
        "Loaded graph with {} vertices and {} edges from {}",
        graph.node_count,
        graph.num_edges(),
        path.display()
    );
    Ok(graph)
}

fn parse_vertex(field: Option<&str>, line_number: usize) -> Result<u32> {
    let field = field
        .with_context(|| format!("line {}: expected two vertex ids", line_number + 1))?;
    field
        .parse()
        .with_context(|| format!("line {}: invalid vertex id {:?}", line_number + 1, field))
}
