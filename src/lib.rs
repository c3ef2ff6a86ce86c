//! Webrank
//!
//! Reconstructs a directed web-link graph from crawled documents in a
//! remote object store, then ranks the pages with iterative PageRank.
//!
//! # Architecture
//!
//! - `ingest`: object listing and concurrent document retrieval over
//!   HTTPS, retry with exponential backoff, hyperlink extraction, dense
//!   adjacency assembly
//! - `webrank-algorithms` (member crate): the graph model and the
//!   PageRank power iteration with dangling-mass redistribution
//! - `stats`: descriptive statistics over degree distributions
//! - `corpus`: deterministic synthetic corpus generation for benchmarks
//!
//! ## Example Usage
//!
//! ```rust
//! use webrank::{page_rank, PageRankConfig, WebGraph};
//!
//! // 0 and 1 both link to 2; 2 links back to 0; 3 is dangling.
//! let graph = WebGraph::from_outlinks(vec![vec![1, 2], vec![2], vec![0], vec![]]);
//! let result = page_rank(&graph, PageRankConfig::default());
//!
//! assert_eq!(result.ranks.len(), 4);
//! assert_eq!(result.top_k(1)[0].0, 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod corpus;
pub mod ingest;
pub mod stats;

// Re-export main types for convenience
pub use webrank_algorithms::{page_rank, PageId, PageRankConfig, PageRankResult, WebGraph};

pub use ingest::{
    FetchError, FetchResult, GcsStore, GraphBuilder, IngestConfig, IngestError, IngestOutcome,
    IngestResult, ObjectStore, RetryPolicy,
};

pub use corpus::CorpusConfig;
pub use stats::DegreeStats;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
