//! Page-number pagination primitives shared by listing endpoints.
//!
//! Listings accept `?page=N&page_size=M` query parameters and answer with a
//! [`Page`] envelope:
//!
//! ```json
//! {"count": 9, "next": "http://host/ads/?page=3", "previous": "http://host/ads/", "results": []}
//! ```
//!
//! Pages are 1-based. Requesting a page past the end of a non-empty result
//! set is an error so clients notice stale links; page 1 of an empty set is
//! always valid.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Page size used when neither the caller nor configuration chooses one.
pub const DEFAULT_PAGE_SIZE: u32 = 4;
/// Upper bound applied to caller-supplied page sizes.
pub const MAX_PAGE_SIZE: u32 = 100;

const PAGE_PARAM: &str = "page";

/// Errors raised while resolving a page request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The page number is zero.
    #[error("page numbers start at 1")]
    InvalidPage,
    /// The page lies beyond the last page of the result set.
    #[error("page {page} is beyond the last page ({last})")]
    PageOutOfRange {
        /// Requested page number.
        page: u32,
        /// Last valid page number.
        last: u64,
    },
}

/// Raw pagination query parameters as sent by clients.
///
/// # Examples
/// ```
/// use pagination::PageParams;
///
/// let params: PageParams = serde_json::from_str(r#"{"page": 2}"#).unwrap();
/// assert_eq!(params.page, Some(2));
/// assert_eq!(params.page_size, None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageParams {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Requested number of items per page.
    pub page_size: Option<u32>,
}

/// A validated page request.
///
/// ## Invariants
/// - `number >= 1`
/// - `1 <= size <= MAX_PAGE_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

impl PageRequest {
    /// Build a request from an explicit page number and size.
    ///
    /// Sizes are clamped into `1..=MAX_PAGE_SIZE`.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, MAX_PAGE_SIZE};
    ///
    /// let request = PageRequest::new(3, 500).unwrap();
    /// assert_eq!(request.size(), MAX_PAGE_SIZE);
    /// assert_eq!(request.offset(), 2 * u64::from(MAX_PAGE_SIZE));
    /// ```
    pub fn new(number: u32, size: u32) -> Result<Self, PaginationError> {
        if number == 0 {
            return Err(PaginationError::InvalidPage);
        }
        Ok(Self {
            number,
            size: size.clamp(1, MAX_PAGE_SIZE),
        })
    }

    /// Resolve client parameters, falling back to `default_size` when the
    /// caller omits `page_size` or sends zero.
    pub fn from_params(params: PageParams, default_size: u32) -> Result<Self, PaginationError> {
        let size = match params.page_size {
            Some(0) | None => default_size,
            Some(size) => size,
        };
        Self::new(params.page.unwrap_or(1), size)
    }

    /// 1-based page number.
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Items per page.
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of items to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }

    /// Number of items to fetch for this page.
    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }

    fn last_page(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.size)).max(1)
    }
}

/// Paginated response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages.
    pub count: u64,
    /// Absolute link to the following page, if any.
    pub next: Option<String>,
    /// Absolute link to the preceding page, if any.
    pub previous: Option<String>,
    /// Items on this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap one page of `results` out of `total` items.
    ///
    /// `request_url` is the URL the client called; its query string is
    /// preserved in the `next`/`previous` links apart from the page number.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    /// use url::Url;
    ///
    /// let url = Url::parse("http://localhost/ads/?title=phone").unwrap();
    /// let request = PageRequest::new(1, 2).unwrap();
    /// let page = Page::new(vec!["a", "b"], 3, request, &url).unwrap();
    /// assert_eq!(page.next.as_deref(), Some("http://localhost/ads/?title=phone&page=2"));
    /// assert_eq!(page.previous, None);
    /// ```
    pub fn new(
        results: Vec<T>,
        total: u64,
        request: PageRequest,
        request_url: &Url,
    ) -> Result<Self, PaginationError> {
        let last = request.last_page(total);
        if u64::from(request.number) > last {
            return Err(PaginationError::PageOutOfRange {
                page: request.number,
                last,
            });
        }

        let next = (u64::from(request.number) < last)
            .then(|| link_to_page(request_url, request.number + 1));
        let previous = (request.number > 1).then(|| link_to_page(request_url, request.number - 1));

        Ok(Self {
            count: total,
            next,
            previous,
            results,
        })
    }

    /// Transform every item while keeping the envelope.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Rewrite `url` so it points at `page`. Page 1 drops the parameter.
fn link_to_page(url: &Url, page: u32) -> String {
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut link = url.clone();
    link.set_query(None);
    if !retained.is_empty() || page > 1 {
        let mut pairs = link.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        if page > 1 {
            pairs.append_pair(PAGE_PARAM, &page.to_string());
        }
    }
    link.into()
}
