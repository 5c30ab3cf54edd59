use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use graph_scan::cluster::metrics;
use graph_scan::config::{self, Config};
use graph_scan::data::edge_list;
use graph_scan::index::Index;
use graph_scan::storage;

#[derive(Parser, Debug)]
#[command(
    name = "graph-scan",
    about = "Index-based SCAN clustering of large undirected graphs"
)]
struct Cli {
    /// Path to input edge-list file
    #[arg(long)]
    input: String,

    /// Output directory for results
    #[arg(long, default_value = "scan_results")]
    output_dir: String,

    /// Similarity measure: cosine, jaccard, approx-cosine, approx-jaccard
    #[arg(long, default_value = "cosine")]
    similarity: String,

    /// Number of epsilon-similar closed neighbors required for a core vertex
    #[arg(long, default_value_t = config::DEFAULT_MU)]
    mu: u64,

    /// Similarity threshold in [0, 1]
    #[arg(long, default_value_t = config::DEFAULT_EPSILON)]
    epsilon: f32,

    /// Sketch samples per vertex for the approximate measures
    #[arg(long, default_value_t = config::DEFAULT_NUM_SAMPLES)]
    num_samples: u32,

    /// RNG seed for the approximate measures
    #[arg(long, default_value_t = config::DEFAULT_SEED)]
    seed: u64,

    /// Skip writing result files
    #[arg(long)]
    skip_output: bool,

    /// Number of worker threads (0 = use all available cores)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Verbose logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let config = Config {
        similarity: config::parse_similarity(&args.similarity, args.num_samples, args.seed)?,
        mu: args.mu,
        epsilon: args.epsilon,
    };

    log::info!("Starting SCAN clustering");
    log::info!("Input: {}", args.input);
    log::info!(
        "Parameters: similarity={:?} mu={} epsilon={}",
        config.similarity,
        config.mu,
        config.epsilon
    );

    // 1. Load the graph
    let graph = edge_list::load_edge_list(&args.input)?;
    log::debug!("Graph uses {} bytes", graph.memory_usage());

    // 2. Build the index
    let build_start = Instant::now();
    let index = Index::build(&graph, &config.similarity)?;
    log::info!("Built index in {:.2?}", build_start.elapsed());

    // 3. Cluster
    let cluster_start = Instant::now();
    let clustering = index.cluster(config.mu, config.epsilon)?;
    log::info!("Clustered in {:.2?}", cluster_start.elapsed());

    // 4. Summarize and save
    let summaries = metrics::summarize(&clustering, &graph);
    log::info!(
        "Found {} clusters, {} of {} vertices unclustered",
        summaries.len(),
        metrics::count_unclustered(&clustering),
        graph.node_count
    );

    if !args.skip_output {
        storage::save_results(&clustering, &summaries, &graph, &args.output_dir)?;
        log::info!("Results saved to {}", args.output_dir);
    }

    Ok(())
}
