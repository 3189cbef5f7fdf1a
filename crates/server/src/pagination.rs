//! Page-number pagination.
//!
//! Lists are paginated with `?page=N` (1-based) and an optional
//! `?page_size=M`. A page past the end is an error, except that page 1 of
//! an empty list is always valid.

use crate::error::ApiError;
use axum::http::Uri;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 5;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw pagination parameters from the query string
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: i64,
    pub size: i64,
}

impl PageParams {
    /// Parse the parameters.
    ///
    /// A malformed `page` is rejected; a malformed or non-positive
    /// `page_size` falls back to the default, and a large one is capped.
    pub fn resolve(&self) -> Result<PageRequest, ApiError> {
        let number = match self.page.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(ApiError::InvalidPage),
            },
        };

        let size = self
            .page_size
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|&n| n > 0)
            .map_or(DEFAULT_PAGE_SIZE, |n| n.min(MAX_PAGE_SIZE));

        Ok(PageRequest { number, size })
    }
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.size
    }

    /// Number of pages needed for `count` items (at least one)
    pub fn page_count(&self, count: i64) -> i64 {
        ((count + self.size - 1) / self.size).max(1)
    }

    /// Reject a page past the end of a list of `count` items
    pub fn check(&self, count: i64) -> Result<(), ApiError> {
        if self.number > self.page_count(count) {
            return Err(ApiError::InvalidPage);
        }
        Ok(())
    }
}

/// Paginated response envelope
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap one page of `results`, linking neighbours relative to `uri`
    pub fn new(count: i64, request: PageRequest, uri: &Uri, results: Vec<T>) -> Self {
        let next = (request.number < request.page_count(count))
            .then(|| page_link(uri, request.number + 1));
        let previous = (request.number > 1).then(|| page_link(uri, request.number - 1));

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

/// `uri` with its `page` parameter replaced.
///
/// Page 1 drops the parameter altogether; every other query parameter is
/// kept as sent.
fn page_link(uri: &Uri, page: i64) -> String {
    let mut params: Vec<String> = uri
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some("page"))
        .map(str::to_string)
        .collect();

    if page > 1 {
        params.push(format!("page={page}"));
    }

    if params.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), params.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, page_size: Option<&str>) -> PageParams {
        PageParams {
            page: page.map(String::from),
            page_size: page_size.map(String::from),
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let request = params(None, None).resolve().unwrap();
        assert_eq!(request, PageRequest { number: 1, size: DEFAULT_PAGE_SIZE });
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_resolve_page_size() {
        assert_eq!(params(Some("3"), Some("10")).resolve().unwrap().offset(), 20);
        assert_eq!(params(None, Some("1000")).resolve().unwrap().size, MAX_PAGE_SIZE);
        assert_eq!(params(None, Some("0")).resolve().unwrap().size, DEFAULT_PAGE_SIZE);
        assert_eq!(params(None, Some("many")).resolve().unwrap().size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_resolve_rejects_bad_page() {
        assert!(matches!(params(Some("0"), None).resolve(), Err(ApiError::InvalidPage)));
        assert!(matches!(params(Some("two"), None).resolve(), Err(ApiError::InvalidPage)));
    }

    #[test]
    fn test_check_bounds() {
        let first = PageRequest { number: 1, size: 5 };
        let third = PageRequest { number: 3, size: 5 };

        assert!(first.check(0).is_ok());
        assert!(third.check(11).is_ok());
        assert!(third.check(10).is_err());
    }

    #[test]
    fn test_page_links() {
        let uri: Uri = "/api/cinema/orders?page=2&page_size=5".parse().unwrap();
        let page = Page::new(12, PageRequest { number: 2, size: 5 }, &uri, vec![(); 5]);

        assert_eq!(page.next.as_deref(), Some("/api/cinema/orders?page_size=5&page=3"));
        assert_eq!(page.previous.as_deref(), Some("/api/cinema/orders?page_size=5"));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let uri: Uri = "/api/cinema/orders".parse().unwrap();
        let page = Page::new(3, PageRequest { number: 1, size: 5 }, &uri, vec![(); 3]);

        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
    }
}
