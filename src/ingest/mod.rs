//! Web-graph ingestion from a remote object store
//!
//! This module turns a bucket of crawled HTML documents into a
//! [`WebGraph`](webrank_algorithms::WebGraph):
//! - Object listing and retrieval over HTTPS, with retry on transient failures
//! - Hyperlink extraction against the numbered-page naming convention
//! - Concurrent fetch/parse with bounded in-flight requests
//! - Dense adjacency assembly plus degree aggregates

pub mod builder;
pub mod links;
pub mod store;

use thiserror::Error;

// Re-export main types
pub use builder::{GraphBuilder, IngestConfig, IngestOutcome};
pub use links::{extract_links, page_id_from_name};
pub use store::{fetch_with_retry, FetchError, FetchResult, GcsStore, ObjectStore, RetryPolicy};

/// Errors that abort an ingestion run.
///
/// Per-document fetch failures are not in here: they degrade to an empty
/// adjacency entry and a failure count on [`IngestOutcome`].
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("no documents found under prefix {prefix:?}")]
    NoDocumentsFound { prefix: String },

    #[error("object listing failed: {0}")]
    Listing(FetchError),

    #[error("fetch task failed to complete: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type IngestResult<T> = Result<T, IngestError>;
