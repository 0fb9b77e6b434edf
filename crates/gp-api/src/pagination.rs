//! Pagination links
//!
//! Two schemes:
//! - offset/count (`start`/`num`) for the generic app listing, bounded by
//!   `MAX_LIST_OFFSET`
//! - page cursor (`page`) for reviews, where a non-empty page implies a next one
//!
//! Each cursor is the current query with exactly one field replaced. Values
//! that are present but not integers produce no links, and neither does a
//! neighbouring offset or page that would overflow `i64`.

use gp_common::CatalogOptions;

use crate::links::LinkBuilder;

/// Highest reachable `start + num` for the generic listing
pub const MAX_LIST_OFFSET: i64 = 500;
pub const DEFAULT_LIST_NUM: i64 = 60;
pub const DEFAULT_LIST_START: i64 = 0;
pub const DEFAULT_PAGE: i64 = 0;

/// Query sets for the neighbouring pages
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Cursors {
    pub prev: Option<CatalogOptions>,
    pub next: Option<CatalogOptions>,
}

/// Absolute prev/next URLs
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageLinks {
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl Cursors {
    pub fn into_links(self, links: &LinkBuilder, subpath: &str) -> PageLinks {
        PageLinks {
            prev: self.prev.map(|q| links.url_with_query(subpath, &q)),
            next: self.next.map(|q| links.url_with_query(subpath, &q)),
        }
    }
}

fn int_or(query: &CatalogOptions, key: &str, default: i64) -> Option<i64> {
    match query.parse::<i64>(key) {
        None => Some(default),
        Some(parsed) => parsed.ok(),
    }
}

/// Offset/count scheme: move `start` by `num` in either direction.
pub fn offset_cursors(query: &CatalogOptions) -> Cursors {
    let (Some(num), Some(start)) = (
        int_or(query, "num", DEFAULT_LIST_NUM),
        int_or(query, "start", DEFAULT_LIST_START),
    ) else {
        return Cursors::default();
    };

    let prev = start
        .checked_sub(num)
        .filter(|prev_start| *prev_start >= 0)
        .map(|prev_start| query.clone().with("start", prev_start.to_string()));
    let next = start
        .checked_add(num)
        .filter(|next_start| *next_start <= MAX_LIST_OFFSET)
        .map(|next_start| query.clone().with("start", next_start.to_string()));

    Cursors { prev, next }
}

/// Page-cursor scheme: prev while `page > 0`, next while the page had results.
pub fn page_cursors(query: &CatalogOptions, page_is_empty: bool) -> Cursors {
    let Some(page) = int_or(query, "page", DEFAULT_PAGE) else {
        return Cursors::default();
    };

    let prev = (page > 0).then(|| query.clone().with("page", (page - 1).to_string()));
    let next = page
        .checked_add(1)
        .filter(|_| !page_is_empty)
        .map(|next_page| query.clone().with("page", next_page.to_string()));

    Cursors { prev, next }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> CatalogOptions {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_offset_first_page_has_no_prev() {
        let cursors = offset_cursors(&query(&[("start", "0"), ("num", "60")]));
        assert!(cursors.prev.is_none());
        assert_eq!(cursors.next.unwrap().get("start"), Some("60"));
    }

    #[test]
    fn test_offset_defaults_apply() {
        let cursors = offset_cursors(&CatalogOptions::new());
        assert!(cursors.prev.is_none());

        let next = cursors.next.unwrap();
        assert_eq!(next.get("start"), Some("60"));
        // num is not injected when the caller did not send it
        assert_eq!(next.get("num"), None);
    }

    #[test]
    fn test_offset_second_page_points_back_to_zero() {
        let cursors = offset_cursors(&query(&[("start", "60"), ("num", "60")]));
        assert_eq!(cursors.prev.unwrap().get("start"), Some("0"));
        assert_eq!(cursors.next.unwrap().get("start"), Some("120"));
    }

    #[test]
    fn test_offset_ceiling() {
        let cursors = offset_cursors(&query(&[("start", "480"), ("num", "60")]));
        assert!(cursors.next.is_none());
        assert_eq!(cursors.prev.unwrap().get("start"), Some("420"));

        // exactly at the ceiling is still reachable
        let cursors = offset_cursors(&query(&[("start", "440"), ("num", "60")]));
        assert_eq!(cursors.next.unwrap().get("start"), Some("500"));
    }

    #[test]
    fn test_offset_keeps_other_params() {
        let current = query(&[
            ("collection", "TOP_FREE"),
            ("category", "GAME_ACTION"),
            ("num", "20"),
            ("start", "40"),
        ]);

        let next = offset_cursors(&current).next.unwrap();
        let mut expected = current.clone();
        expected.insert("start", "60");
        assert_eq!(next, expected);
    }

    #[test]
    fn test_offset_non_numeric_produces_no_links() {
        assert_eq!(offset_cursors(&query(&[("num", "lots")])), Cursors::default());
    }

    #[test]
    fn test_offset_overflow_produces_no_next() {
        let max = i64::MAX.to_string();

        let cursors = offset_cursors(&query(&[("start", max.as_str())]));
        assert!(cursors.next.is_none());
        assert_eq!(
            cursors.prev.unwrap().get("start"),
            Some((i64::MAX - DEFAULT_LIST_NUM).to_string().as_str())
        );

        let cursors = offset_cursors(&query(&[("start", "10"), ("num", max.as_str())]));
        assert!(cursors.next.is_none());
        assert!(cursors.prev.is_none());
    }

    #[test]
    fn test_offset_underflow_produces_no_prev() {
        let min = i64::MIN.to_string();
        let cursors = offset_cursors(&query(&[("start", min.as_str()), ("num", "60")]));
        assert!(cursors.prev.is_none());
    }

    #[test]
    fn test_page_overflow_produces_no_next() {
        let max = i64::MAX.to_string();
        let cursors = page_cursors(&query(&[("page", max.as_str())]), false);

        assert!(cursors.next.is_none());
        assert_eq!(
            cursors.prev.unwrap().get("page"),
            Some((i64::MAX - 1).to_string().as_str())
        );
    }

    #[test]
    fn test_page_first_page() {
        let cursors = page_cursors(&query(&[("page", "0")]), false);
        assert!(cursors.prev.is_none());
        assert_eq!(cursors.next.unwrap().get("page"), Some("1"));
    }

    #[test]
    fn test_page_empty_suppresses_next() {
        let cursors = page_cursors(&query(&[("page", "3")]), true);
        assert!(cursors.next.is_none());
        assert_eq!(cursors.prev.unwrap().get("page"), Some("2"));

        let cursors = page_cursors(&CatalogOptions::new(), true);
        assert_eq!(cursors, Cursors::default());
    }

    #[test]
    fn test_next_link_round_trips_query() {
        let current = query(&[("sort", "NEWEST"), ("lang", "pt BR"), ("page", "2")]);
        let links = LinkBuilder::new("http", "localhost:3000", "/api");

        let page_links = page_cursors(&current, false).into_links(&links, "apps/com.example/reviews");
        let next = page_links.next.unwrap();
        let (base, qs) = next.split_once('?').unwrap();
        assert_eq!(base, "http://localhost:3000/api/apps/com.example/reviews");

        let mut decoded = CatalogOptions::from_query_string(qs);
        assert_eq!(decoded.remove("page").as_deref(), Some("3"));

        let mut original = current.clone();
        original.remove("page");
        assert_eq!(decoded, original);
    }
}
