//! Pagination for list endpoints.
//!
//! Invoice lists are filtered by computed payment status after the rows are
//! loaded, so pagination happens over the already-filtered in-memory set
//! rather than in SQL. [`PageRequest::slice`] is the helper for that path.

use serde::Serialize;

/// Page selection resolved from query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, 1-indexed.
    pub page: u32,
    /// Rows per page, capped at [`PageRequest::MAX_PER_PAGE`].
    pub per_page: u32,
}

impl PageRequest {
    /// Upper bound on rows per page.
    pub const MAX_PER_PAGE: u32 = 100;

    /// Default rows per page when the query does not say.
    pub const DEFAULT_PER_PAGE: u32 = 20;

    /// Resolves optional query parameters into a valid page selection.
    ///
    /// Absent values fall back to page 1 with the default page size; zero
    /// and oversized values are pulled back into range.
    #[must_use]
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(Self::DEFAULT_PER_PAGE)
                .clamp(1, Self::MAX_PER_PAGE),
        }
    }

    /// Keeps the requested window of an already-filtered row set.
    ///
    /// The total in the returned metadata counts the full set, not just the
    /// window, so clients can render page controls. A page past the end
    /// yields an empty window rather than an error.
    #[must_use]
    pub fn slice<T>(self, rows: Vec<T>) -> PageResponse<T> {
        let total = rows.len() as u64;
        let skip = usize::try_from(u64::from(self.per_page) * u64::from(self.page.saturating_sub(1)))
            .unwrap_or(usize::MAX);
        let take = usize::try_from(u64::from(self.per_page)).unwrap_or(usize::MAX);

        let data = rows.into_iter().skip(skip).take(take).collect();
        PageResponse {
            data,
            meta: PageMeta::of(self, total),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of rows plus the metadata to navigate the rest.
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse<T> {
    /// The rows in the requested window.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Rows per page.
    pub per_page: u32,
    /// Total rows across all pages.
    pub total: u64,
    /// Total number of pages; at least 1 even when there are no rows.
    pub total_pages: u32,
}

impl PageMeta {
    fn of(request: PageRequest, total: u64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            u32::try_from(total.div_ceil(u64::from(request.per_page))).unwrap_or(u32::MAX)
        };

        Self {
            page: request.page,
            per_page: request.per_page,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_when_query_is_silent() {
        let request = PageRequest::new(None, None);
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, PageRequest::DEFAULT_PER_PAGE);
    }

    #[rstest]
    #[case(Some(0), Some(0), 1, 1)]
    #[case(Some(3), Some(50), 3, 50)]
    #[case(Some(1), Some(9999), 1, PageRequest::MAX_PER_PAGE)]
    fn test_out_of_range_values_are_pulled_into_range(
        #[case] page: Option<u32>,
        #[case] per_page: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_per_page: u32,
    ) {
        let request = PageRequest::new(page, per_page);
        assert_eq!(request.page, expected_page);
        assert_eq!(request.per_page, expected_per_page);
    }

    #[test]
    fn test_slice_keeps_the_requested_window() {
        let rows: Vec<u32> = (1..=45).collect();
        let page = PageRequest::new(Some(2), Some(20)).slice(rows);

        assert_eq!(page.data.first(), Some(&21));
        assert_eq!(page.data.len(), 20);
        assert_eq!(page.meta.total, 45);
        assert_eq!(page.meta.total_pages, 3);
    }

    #[test]
    fn test_slice_past_the_end_is_empty() {
        let page = PageRequest::new(Some(9), Some(20)).slice(vec![1, 2, 3]);
        assert!(page.data.is_empty());
        assert_eq!(page.meta.total, 3);
        assert_eq!(page.meta.total_pages, 1);
    }

    #[test]
    fn test_empty_set_still_reports_one_page() {
        let page = PageRequest::default().slice(Vec::<u32>::new());
        assert!(page.data.is_empty());
        assert_eq!(page.meta.total_pages, 1);
    }
}
