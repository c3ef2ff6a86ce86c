//! Webrank CLI: rank a bucket-hosted web corpus, or generate one.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webrank::{
    corpus, page_rank, CorpusConfig, DegreeStats, GcsStore, GraphBuilder, IngestConfig,
    IngestOutcome, PageId, PageRankConfig, PageRankResult, RetryPolicy,
};

#[derive(Parser)]
#[command(name = "webrank", version, about = "Web-link graph PageRank over an object-store corpus")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a corpus from a bucket and rank its pages
    Rank(RankArgs),
    /// Generate a synthetic corpus of interlinked HTML pages
    Generate(GenerateArgs),
}

#[derive(Args)]
struct RankArgs {
    /// Bucket holding the corpus
    #[arg(long, env = "WEBRANK_BUCKET")]
    bucket: String,

    /// Object-name prefix under the bucket
    #[arg(long, default_value = "webgraph/")]
    prefix: String,

    /// Ingest at most this many documents
    #[arg(long)]
    limit: Option<usize>,

    /// Damping factor, strictly between 0 and 1
    #[arg(long, default_value_t = 0.85, value_parser = parse_damping)]
    damping: f64,

    /// Convergence tolerance on the L1 delta, positive
    #[arg(long, default_value_t = 0.005, value_parser = parse_tolerance)]
    tolerance: f64,

    /// Iteration cap
    #[arg(long, default_value_t = 200)]
    max_iterations: usize,

    /// Concurrent document fetches
    #[arg(long, default_value_t = 12)]
    concurrency: usize,

    /// Number of top-ranked pages to report
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Output format
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of pages
    #[arg(long, default_value_t = 10_000)]
    pages: u32,

    /// Exclusive upper bound on links per page
    #[arg(long, default_value_t = 250, value_parser = clap::value_parser!(u32).range(2..))]
    max_refs: u32,

    /// RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output directory
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_damping(value: &str) -> Result<f64, String> {
    let damping: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if damping > 0.0 && damping < 1.0 {
        Ok(damping)
    } else {
        Err("damping must lie strictly between 0 and 1".to_string())
    }
}

fn parse_tolerance(value: &str) -> Result<f64, String> {
    let tolerance: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if tolerance > 0.0 {
        Ok(tolerance)
    } else {
        Err("tolerance must be positive".to_string())
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Rank(args) => run_rank(args).await,
        Commands::Generate(args) => run_generate(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_rank(args: RankArgs) -> Result<()> {
    let store = Arc::new(GcsStore::new(&args.bucket)?);
    let builder = GraphBuilder::new(
        store,
        IngestConfig {
            prefix: args.prefix.clone(),
            limit: args.limit,
            concurrency: args.concurrency,
            retry: RetryPolicy::default(),
        },
    );

    let started = Instant::now();
    let outcome = builder
        .build()
        .await
        .with_context(|| format!("ingesting bucket {:?}", args.bucket))?;
    let ingest_elapsed = started.elapsed();

    let solve_started = Instant::now();
    let result = page_rank(
        &outcome.graph,
        PageRankConfig {
            damping: args.damping,
            tolerance: args.tolerance,
            max_iterations: args.max_iterations,
        },
    );
    let solve_elapsed = solve_started.elapsed();
    let total_elapsed = started.elapsed();

    let report = RankReport::new(
        &outcome,
        &result,
        args.top,
        ingest_elapsed,
        solve_elapsed,
        total_elapsed,
    );

    match args.format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = CorpusConfig {
        pages: args.pages,
        max_refs: args.max_refs,
        seed: args.seed,
    };

    corpus::generate(&args.out, &config)
        .with_context(|| format!("writing corpus to {}", args.out.display()))?;
    println!("Generated {} pages in {}", args.pages, args.out.display());
    Ok(())
}

#[derive(Serialize)]
struct RankReport {
    pages: usize,
    links: usize,
    failed_fetches: usize,
    outgoing: Option<DegreeStats>,
    incoming: Option<DegreeStats>,
    iterations: usize,
    top: Vec<RankEntry>,
    timings: Timings,
}

#[derive(Serialize)]
struct RankEntry {
    page: PageId,
    rank: f64,
}

#[derive(Serialize)]
struct Timings {
    ingest_seconds: f64,
    solve_seconds: f64,
    total_seconds: f64,
}

impl RankReport {
    fn new(
        outcome: &IngestOutcome,
        result: &PageRankResult,
        top: usize,
        ingest_elapsed: Duration,
        solve_elapsed: Duration,
        total_elapsed: Duration,
    ) -> Self {
        Self {
            pages: outcome.graph.page_count(),
            links: outcome.graph.link_count(),
            failed_fetches: outcome.failed_fetches,
            outgoing: DegreeStats::from_degrees(&outcome.out_degrees),
            incoming: DegreeStats::from_degrees(&outcome.in_degrees),
            iterations: result.iterations,
            top: result
                .top_k(top)
                .into_iter()
                .map(|(page, rank)| RankEntry { page, rank })
                .collect(),
            timings: Timings {
                ingest_seconds: ingest_elapsed.as_secs_f64(),
                solve_seconds: solve_elapsed.as_secs_f64(),
                total_seconds: total_elapsed.as_secs_f64(),
            },
        }
    }
}

impl std::fmt::Display for RankReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Ingestion ===")?;
        writeln!(f, "Pages:          {}", self.pages)?;
        writeln!(f, "Links:          {}", self.links)?;
        writeln!(f, "Failed fetches: {}", self.failed_fetches)?;

        writeln!(f, "\n=== Outgoing Links Stats ===")?;
        match &self.outgoing {
            Some(stats) => writeln!(f, "{stats}")?,
            None => writeln!(f, "(no documents)")?,
        }

        writeln!(f, "\n=== Incoming Links Stats ===")?;
        match &self.incoming {
            Some(stats) => writeln!(f, "{stats}")?,
            None => writeln!(f, "(no documents)")?,
        }

        writeln!(
            f,
            "\n=== PageRank (iterations={}) Top {} ===",
            self.iterations,
            self.top.len()
        )?;
        for entry in &self.top {
            writeln!(f, "{}\t{:.10}", entry.page, entry.rank)?;
        }

        writeln!(f, "\n=== Timing ===")?;
        writeln!(f, "Read/build graph: {:.2}s", self.timings.ingest_seconds)?;
        writeln!(f, "PageRank compute: {:.2}s", self.timings.solve_seconds)?;
        writeln!(f, "Total:            {:.2}s", self.timings.total_seconds)
    }
}
