use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use jobsearch_core::{load_records, EngineConfig, IndexStats, IndexingPipeline, MemorySource, RebuildPolicy, SearchEngine, SharedEngine};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a TF-IDF index over job catalog entities and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Input path (JSON / JSONL file or a directory of them)
    #[arg(long)]
    input: PathBuf,
    /// Use smoothed IDF = ln(1 + N/df) instead of ln(N/df)
    #[arg(long, default_value_t = false)]
    smoothed_idf: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print its statistics
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// Build the index and run one query against it
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Query text
        #[arg(long)]
        query: String,
        /// Number of hits to return
        #[arg(long, default_value_t = 10)]
        k: usize,
    },
}

#[derive(Serialize)]
struct HitOut<'a> {
    doc_id: String,
    score: f64,
    title: &'a str,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { corpus } => {
            let (_, stats) = build(&corpus)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Search { corpus, query, k } => {
            let (pipeline, _) = build(&corpus)?;
            let hits = pipeline.search_entities(&query, k)?;
            let out: Vec<HitOut> = hits
                .iter()
                .map(|h| HitOut { doc_id: h.key.to_string(), score: h.score, title: &h.record.title })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn build(corpus: &CorpusArgs) -> Result<(IndexingPipeline<MemorySource>, IndexStats)> {
    let source = MemorySource::from_records(load_records(&corpus.input)?);
    let engine = SharedEngine::new(SearchEngine::with_config(EngineConfig::smoothed(corpus.smoothed_idf)));
    let pipeline = IndexingPipeline::new(engine, source, RebuildPolicy::Manual);
    let stats = pipeline.load_all()?;
    tracing::info!(num_docs = stats.num_docs, num_terms = stats.num_terms, "index build complete");
    Ok((pipeline, stats))
}
