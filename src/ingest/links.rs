//! Hyperlink extraction and object-name parsing
//!
//! The corpus convention: page `p` lives in an object whose name ends in
//! `<p>.html`, and a link to page `q` appears as a hyperlink attribute
//! `HREF="<q>.html"` (any case). Nothing else in the markup is interpreted.

use regex::bytes::Regex;
use std::sync::OnceLock;
use webrank_algorithms::PageId;

fn href_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"(?i)href="([0-9]+)\.html""#).unwrap())
}

/// Every link target in the document, in order of appearance.
///
/// Duplicates are kept. The scan runs over raw bytes, so invalid UTF-8
/// never matches and is dropped along with any other non-link content.
/// Digit runs too large for [`PageId`] are dropped as well.
pub fn extract_links(body: &[u8]) -> Vec<PageId> {
    href_pattern()
        .captures_iter(body)
        .filter_map(|caps| {
            let digits = std::str::from_utf8(&caps[1]).ok()?;
            digits.parse::<PageId>().ok()
        })
        .collect()
}

/// Parse the page identifier out of an object name like `webgraph/42.html`.
///
/// Only the final path segment is considered; it must be exactly
/// `<digits>.html`. Returns `None` for any other name.
pub fn page_id_from_name(name: &str) -> Option<PageId> {
    let file = name.rsplit('/').next()?;
    let stem = file.strip_suffix(".html")?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_targets_in_order_with_duplicates() {
        let body = br#"<a HREF="1.html">one</a> <a href="2.html">two</a> <a HREF="1.html">one again</a>"#;
        assert_eq!(extract_links(body), vec![1, 2, 1]);
    }

    #[test]
    fn attribute_match_is_case_insensitive() {
        assert_eq!(extract_links(br#"<a HrEf="7.html">x</a>"#), vec![7]);
    }

    #[test]
    fn non_numeric_targets_are_ignored() {
        let body = br#"<a href="about.html">a</a> <a href="1a.html">b</a> <a href='5.html'>c</a>"#;
        assert_eq!(extract_links(body), Vec::<PageId>::new());
    }

    #[test]
    fn invalid_utf8_does_not_break_the_scan() {
        let body = b"\xff\xfe<a href=\"3.html\">x</a>\xff";
        assert_eq!(extract_links(body), vec![3]);
    }

    #[test]
    fn oversized_identifiers_are_dropped() {
        let body = br#"<a href="99999999999999999999.html">x</a> <a href="4.html">y</a>"#;
        assert_eq!(extract_links(body), vec![4]);
    }

    #[test]
    fn object_names_parse_by_final_segment() {
        assert_eq!(page_id_from_name("webgraph/42.html"), Some(42));
        assert_eq!(page_id_from_name("42.html"), Some(42));
        assert_eq!(page_id_from_name("deep/path/0.html"), Some(0));
        assert_eq!(page_id_from_name("webgraph/page.html"), None);
        assert_eq!(page_id_from_name("webgraph/42.txt"), None);
        assert_eq!(page_id_from_name("webgraph/.html"), None);
        assert_eq!(page_id_from_name("webgraph/+42.html"), None);
        assert_eq!(page_id_from_name("webgraph/99999999999999999999.html"), None);
    }
}
