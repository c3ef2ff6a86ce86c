//! Concurrent corpus ingestion and graph assembly
//!
//! [`GraphBuilder`] drives one run: list the corpus, fetch and parse every
//! document through a bounded pool of tasks, then assemble the dense
//! adjacency structure and its degree aggregates.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};
use webrank_algorithms::{PageId, WebGraph};

use super::links::{extract_links, page_id_from_name};
use super::store::{fetch_with_retry, ObjectStore, RetryPolicy};
use super::{IngestError, IngestResult};

/// Ingestion settings for one run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Object-name prefix of the corpus, e.g. `webgraph/`.
    pub prefix: String,
    /// Cap on the number of documents ingested, applied after sorting by
    /// identifier. `None` ingests every listed document.
    pub limit: Option<usize>,
    /// Number of documents fetched at once.
    pub concurrency: usize,
    /// Retry schedule for individual document fetches.
    pub retry: RetryPolicy,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            prefix: "webgraph/".to_string(),
            limit: None,
            concurrency: 12,
            retry: RetryPolicy::default(),
        }
    }
}

/// Everything one ingestion run produces.
#[derive(Debug)]
pub struct IngestOutcome {
    /// The reconstructed link graph.
    pub graph: WebGraph,
    /// Out-degree per page. Every stored entry counts.
    pub out_degrees: Vec<usize>,
    /// In-degree per page. Only in-range references count.
    pub in_degrees: Vec<usize>,
    /// Documents that still failed after retries. Their pages keep an
    /// empty adjacency entry.
    pub failed_fetches: usize,
}

/// Builds a [`WebGraph`] from the documents in an object store.
///
/// The store handle is scoped to this builder; nothing is shared globally.
pub struct GraphBuilder {
    store: Arc<dyn ObjectStore>,
    config: IngestConfig,
}

impl GraphBuilder {
    pub fn new(store: Arc<dyn ObjectStore>, config: IngestConfig) -> Self {
        Self { store, config }
    }

    /// Run one full ingestion pass.
    ///
    /// Per-document fetch failures are logged, counted and leave the page
    /// dangling; only an empty listing or a listing transport failure
    /// aborts the run.
    pub async fn build(&self) -> IngestResult<IngestOutcome> {
        let (pages, listed_span) = self.list_pages().await?;

        // Slots are indexed by page identifier, so concurrent completions
        // never collide. The span covers identifiers the cap excluded from
        // fetching; their slots stay empty.
        let mut slots: Vec<Option<Vec<PageId>>> = vec![None; listed_span];
        let mut failed_fetches = 0usize;

        let concurrency = self.config.concurrency.max(1);
        let mut queue = pages.into_iter();
        let mut tasks: JoinSet<(PageId, Option<Vec<PageId>>)> = JoinSet::new();

        loop {
            while tasks.len() < concurrency {
                let Some((page, name)) = queue.next() else { break };
                let store = Arc::clone(&self.store);
                let retry = self.config.retry;
                tasks.spawn(async move {
                    match fetch_with_retry(store.as_ref(), &name, &retry).await {
                        Ok(body) => (page, Some(extract_links(&body))),
                        Err(error) => {
                            warn!(object = %name, %error, "Document dropped after failed fetch");
                            (page, None)
                        }
                    }
                });
            }

            match tasks.join_next().await {
                Some(joined) => {
                    let (page, links) = joined?;
                    match links {
                        Some(links) => slots[page as usize] = Some(links),
                        None => failed_fetches += 1,
                    }
                }
                None => break,
            }
        }

        // A destination beyond every listed identifier still names a
        // page: the graph grows to cover it and the new slot stays empty,
        // which the solver treats as dangling.
        let mut page_count = slots.len();
        for links in slots.iter().flatten() {
            for &dst in links {
                page_count = page_count.max(dst as usize + 1);
            }
        }

        let mut outlinks = vec![Vec::new(); page_count];
        for (page, links) in slots.into_iter().enumerate() {
            if let Some(links) = links {
                outlinks[page] = links;
            }
        }

        let graph = WebGraph::from_outlinks(outlinks);
        let out_degrees = graph.out_degrees();
        let in_degrees = graph.in_degrees();

        info!(
            pages = graph.page_count(),
            links = graph.link_count(),
            failed_fetches,
            "Ingestion complete"
        );

        Ok(IngestOutcome {
            graph,
            out_degrees,
            in_degrees,
            failed_fetches,
        })
    }

    /// List the corpus and order it for ingestion: keep names that follow
    /// the `<id>.html` convention, sort ascending by identifier, truncate
    /// to the configured limit. A repeated identifier keeps only its last
    /// listed name, so exactly one fetch targets each slot.
    ///
    /// Also returns the span of the untruncated listing, max identifier
    /// plus one. Documents the cap excludes still claim a graph slot.
    async fn list_pages(&self) -> IngestResult<(Vec<(PageId, String)>, usize)> {
        let names = self
            .store
            .list_objects(&self.config.prefix)
            .await
            .map_err(IngestError::Listing)?;

        let mut by_id: BTreeMap<PageId, String> = BTreeMap::new();
        for name in names {
            if let Some(id) = page_id_from_name(&name) {
                by_id.insert(id, name);
            }
        }
        let mut pages: Vec<(PageId, String)> = by_id.into_iter().collect();
        let listed_span = pages.last().map_or(0, |&(id, _)| id as usize + 1);
        if let Some(limit) = self.config.limit {
            pages.truncate(limit);
        }

        if pages.is_empty() {
            return Err(IngestError::NoDocumentsFound {
                prefix: self.config.prefix.clone(),
            });
        }

        info!(
            documents = pages.len(),
            prefix = %self.config.prefix,
            "Listed documents"
        );
        Ok((pages, listed_span))
    }
}
