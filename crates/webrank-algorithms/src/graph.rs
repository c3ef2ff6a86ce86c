//! Dense web-link graph model.
//!
//! Provides the adjacency structure the solver iterates over: pages are
//! numbered `0..N` and each page owns an ordered list of destination
//! identifiers exactly as extracted from its document.

/// Page identifier type (u32).
///
/// Identifiers are dense: a graph of `N` pages uses `0..N`, and the
/// identifier doubles as the index into every per-page vector.
pub type PageId = u32;

/// A directed link graph over pages `0..N`.
///
/// The entry for page `p` holds `p`'s outgoing destinations in extraction
/// order. Duplicates are preserved (a repeated destination carries extra
/// weight during rank propagation) and so are destinations outside `0..N`;
/// out-of-range entries still count toward `p`'s out-degree but are ignored
/// wherever rank mass or in-degree is computed.
///
/// An empty entry marks a dangling page. The structure cannot distinguish a
/// page whose document genuinely has no links from an identifier that was
/// only ever seen as a link destination (its document was never listed, for
/// example because ingestion was capped); both rank identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebGraph {
    outlinks: Vec<Vec<PageId>>,
}

impl WebGraph {
    /// Wrap per-page destination lists, indexed by source page.
    pub fn from_outlinks(outlinks: Vec<Vec<PageId>>) -> Self {
        Self { outlinks }
    }

    /// Number of pages `N`.
    pub fn page_count(&self) -> usize {
        self.outlinks.len()
    }

    /// Total number of stored link entries, out-of-range included.
    pub fn link_count(&self) -> usize {
        self.outlinks.iter().map(Vec::len).sum()
    }

    /// Destinations of `page`, duplicates and out-of-range entries included.
    pub fn outlinks(&self, page: PageId) -> &[PageId] {
        &self.outlinks[page as usize]
    }

    /// Out-degree of `page`: the stored entry count, in range or not.
    pub fn out_degree(&self, page: PageId) -> usize {
        self.outlinks[page as usize].len()
    }

    /// Whether `page` has no outgoing links (see the type docs for what
    /// that does and does not tell you).
    pub fn is_dangling(&self, page: PageId) -> bool {
        self.outlinks[page as usize].is_empty()
    }

    /// Out-degree of every page, indexed by [`PageId`].
    pub fn out_degrees(&self) -> Vec<usize> {
        self.outlinks.iter().map(Vec::len).collect()
    }

    /// In-degree of every page, indexed by [`PageId`]. Only in-range
    /// references are counted; duplicates count individually.
    pub fn in_degrees(&self) -> Vec<usize> {
        let n = self.outlinks.len();
        let mut degrees = vec![0usize; n];
        for destinations in &self.outlinks {
            for &dst in destinations {
                if (dst as usize) < n {
                    degrees[dst as usize] += 1;
                }
            }
        }
        degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_count_duplicates_and_ignore_out_of_range_inbound() {
        // 0 -> 1, 1, 5 (5 is out of range for N = 2)
        let graph = WebGraph::from_outlinks(vec![vec![1, 1, 5], vec![]]);

        assert_eq!(graph.page_count(), 2);
        assert_eq!(graph.link_count(), 3);

        // Out-degree counts every stored entry.
        assert_eq!(graph.out_degree(0), 3);
        assert_eq!(graph.out_degree(1), 0);

        // In-degree only sees in-range references, duplicates individually.
        assert_eq!(graph.in_degrees(), vec![0, 2]);
        assert_eq!(graph.out_degrees(), vec![3, 0]);
    }

    #[test]
    fn dangling_is_an_empty_entry() {
        let graph = WebGraph::from_outlinks(vec![vec![1], vec![]]);
        assert!(!graph.is_dangling(0));
        assert!(graph.is_dangling(1));
    }

    #[test]
    fn empty_graph() {
        let graph = WebGraph::default();
        assert_eq!(graph.page_count(), 0);
        assert_eq!(graph.link_count(), 0);
        assert!(graph.in_degrees().is_empty());
    }
}
