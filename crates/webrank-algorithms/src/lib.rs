pub mod graph;
pub mod pagerank;

pub use graph::{PageId, WebGraph};
pub use pagerank::{page_rank, PageRankConfig, PageRankResult};
