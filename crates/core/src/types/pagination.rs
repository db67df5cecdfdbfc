//! Canonical pagination.

use serde::{Deserialize, Serialize};

/// Default page size when callers do not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// A page request.
///
/// `page` is 1-indexed. When `cursor` is set it is passed to the platform
/// verbatim and takes precedence over `page`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-indexed page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Opaque continuation cursor from a previous page.
    pub cursor: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    /// Request a page by number.
    #[must_use]
    pub const fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            cursor: None,
        }
    }

    /// Request the first page.
    #[must_use]
    pub const fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }

    /// Continue from a cursor returned in [`PageMeta::cursor`].
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Page number clamped to at least 1.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }
}

/// Pagination metadata returned with every listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Total matching items.
    pub total: u64,
    /// 1-indexed page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Number of pages at this page size.
    pub total_pages: u32,
    /// Whether a following page exists.
    pub has_next: bool,
    /// Whether a preceding page exists.
    pub has_prev: bool,
    /// Opaque cursor for the next page, if the platform returned one.
    pub cursor: Option<String>,
}

impl PageMeta {
    /// Build metadata from a total count and the next-page cursor.
    ///
    /// `has_next` is true when the platform returned a cursor, or when the
    /// count says more pages exist.
    #[must_use]
    pub fn new(total: u64, page: u32, page_size: u32, cursor: Option<String>) -> Self {
        let page = page.max(1);
        let total_pages = if page_size == 0 {
            0
        } else {
            u32::try_from(total.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
        };
        Self {
            total,
            page,
            page_size,
            total_pages,
            has_next: cursor.is_some() || page < total_pages,
            has_prev: page > 1,
            cursor,
        }
    }
}

/// A page of items plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// An empty page.
    #[must_use]
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            meta: PageMeta::new(0, page, page_size, None),
        }
    }
}
