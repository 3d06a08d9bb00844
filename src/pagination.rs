//! Offset-based pagination over ordered collections.
//!
//! A [`PageRequest`] is resolved against [`Limits`] and used to slice
//! a collection into a [`Page`], carrying navigation metadata and links.

use serde::{Deserialize, Serialize};

/// Default and maximum number of records served in a single [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Records per page when the request does not specify a limit.
    pub default: usize,
    /// Upper bound on the records per page, whatever the request asks for.
    pub max: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            default: 50,
            max: 100,
        }
    }
}

/// Page selection requested by a client, usually decoded from a query string.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl PageRequest {
    /// Returns the effective `(limit, offset)` pair.
    ///
    /// A missing or zero limit falls back to [`Limits::default`], and any
    /// limit is capped to [`Limits::max`]. A missing offset means `0`.
    pub fn resolve(&self, limits: Limits) -> (usize, usize) {
        let limit = match self.limit {
            None | Some(0) => limits.default,
            Some(limit) => limit,
        };

        (limit.min(limits.max).max(1), self.offset.unwrap_or_default())
    }
}

/// Navigation links of a [`Page`], relative to the collection base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub this: String,
    pub first: String,
    pub last: String,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// Metadata describing the position of a [`Page`] in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_records: usize,
    pub records_per_page: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub offset: usize,
    pub links: Links,
}

/// A slice of a collection together with its [`Pagination`] metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Cuts the page selected by `request` out of `items`.
    ///
    /// `base_url` is used to build the navigation links,
    /// e.g. `/api/emissions?limit=50&offset=100`.
    pub fn of<I>(items: I, request: PageRequest, limits: Limits, base_url: &str) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        let total = items.len();
        let (limit, offset) = request.resolve(limits);

        let data: Vec<T> = items.skip(offset).take(limit).collect();

        let total_pages = total.div_ceil(limit);
        let link = |offset: usize| format!("{base_url}?limit={limit}&offset={offset}");

        Self {
            data,
            pagination: Pagination {
                total_records: total,
                records_per_page: limit,
                current_page: offset / limit + 1,
                total_pages,
                offset,
                links: Links {
                    this: link(offset),
                    first: link(0),
                    last: link(total_pages.saturating_sub(1) * limit),
                    next: (offset.saturating_add(limit) < total).then(|| link(offset + limit)),
                    prev: (offset > 0).then(|| link(offset.saturating_sub(limit))),
                },
            },
        }
    }

    /// Transforms the records of the page, keeping its metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const BASE: &str = "/api/emissions";

    fn page(total: usize, limit: Option<usize>, offset: Option<usize>) -> Page<usize> {
        Page::of(
            0..total,
            PageRequest { limit, offset },
            Limits::default(),
            BASE,
        )
    }

    #[test]
    fn defaults_are_applied() {
        let page = page(10_000, None, None);

        assert_eq!((0..50).collect::<Vec<_>>(), page.data);
        assert_eq!(50, page.pagination.records_per_page);
        assert_eq!(1, page.pagination.current_page);
        assert_eq!(200, page.pagination.total_pages);
        assert_eq!(0, page.pagination.offset);
        assert_eq!(None, page.pagination.links.prev);
        assert_eq!(
            Some("/api/emissions?limit=50&offset=50".to_owned()),
            page.pagination.links.next
        );
        assert_eq!(
            "/api/emissions?limit=50&offset=9950",
            page.pagination.links.last
        );
    }

    #[test]
    fn limit_is_capped() {
        let page = page(10_000, Some(5_000), Some(200));

        assert_eq!(100, page.data.len());
        assert_eq!(100, page.pagination.records_per_page);
        assert_eq!(3, page.pagination.current_page);
        assert_eq!(100, page.pagination.total_pages);
        assert_eq!(
            "/api/emissions?limit=100&offset=200",
            page.pagination.links.this
        );
        assert_eq!(
            Some("/api/emissions?limit=100&offset=100".to_owned()),
            page.pagination.links.prev
        );
    }

    #[test]
    fn zero_limit_falls_back_to_default() {
        assert_eq!(50, page(100, Some(0), None).pagination.records_per_page);
    }

    #[test]
    fn last_page_has_no_next_link() {
        let page = page(120, Some(50), Some(100));

        assert_eq!((100..120).collect::<Vec<_>>(), page.data);
        assert_eq!(3, page.pagination.current_page);
        assert_eq!(3, page.pagination.total_pages);
        assert_eq!(None, page.pagination.links.next);
        assert_eq!(
            Some("/api/emissions?limit=50&offset=50".to_owned()),
            page.pagination.links.prev
        );
    }

    #[test]
    fn unaligned_offset_prev_link_does_not_underflow() {
        let page = page(120, Some(50), Some(20));

        assert_eq!(
            Some("/api/emissions?limit=50&offset=0".to_owned()),
            page.pagination.links.prev
        );
    }

    #[test]
    fn past_the_end_is_empty() {
        let page = page(10, None, Some(500));

        assert!(page.data.is_empty());
        assert_eq!(None, page.pagination.links.next);
        assert_eq!(11, page.pagination.current_page);
    }

    #[test]
    fn empty_collection() {
        let page = page(0, None, None);

        assert!(page.data.is_empty());
        assert_eq!(0, page.pagination.total_pages);
        assert_eq!("/api/emissions?limit=50&offset=0", page.pagination.links.last);
        assert_eq!(None, page.pagination.links.next);
    }

    #[test]
    fn map_keeps_metadata() {
        let original = page(10, Some(2), Some(4));
        let pagination = original.pagination.clone();

        let mapped = original.map(|n| n.to_string());

        assert_eq!(vec!["4".to_owned(), "5".to_owned()], mapped.data);
        assert_eq!(pagination, mapped.pagination);
    }
}
