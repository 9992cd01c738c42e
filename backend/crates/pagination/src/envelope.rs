//! The `{ items, pagination }` list envelope.

use serde::{Deserialize, Serialize};

use crate::request::PageRequest;

/// Pagination metadata attached to every list response.
///
/// Serialised with the upstream service's camelCase keys:
/// `{ "page": 1, "perPage": 10, "total": 42, "totalPage": 5 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Number of items matching the filters across all pages.
    pub total: u64,
    /// `ceil(total / per_page)`; zero for an empty result set.
    pub total_page: u64,
}

impl Pagination {
    /// Derive the envelope metadata for `total` matching items.
    ///
    /// # Example
    ///
    /// ```
    /// use pagination::{PageRequest, Pagination};
    ///
    /// let request = PageRequest::new(3, 4).expect("valid page request");
    /// let pagination = Pagination::for_total(request, 9);
    /// assert_eq!(pagination.total_page, 3);
    /// ```
    #[must_use]
    pub const fn for_total(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page(),
            per_page: request.per_page(),
            total,
            total_page: request.total_pages(total),
        }
    }
}

/// One page of items plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on the requested page.
    pub items: Vec<T>,
    /// Metadata describing the page window.
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    /// Slice an already-filtered result set down to the requested page.
    ///
    /// The iterator is consumed in full to count `total`; only the items in
    /// `[(page - 1) * per_page, page * per_page)` are kept.
    #[must_use]
    pub fn from_filtered<I>(filtered: I, request: PageRequest) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let per_page = usize::try_from(request.per_page()).unwrap_or(usize::MAX);

        let mut total: u64 = 0;
        let mut items = Vec::with_capacity(per_page.min(16));
        for (index, item) in filtered.into_iter().enumerate() {
            total += 1;
            if index >= offset && items.len() < per_page {
                items.push(item);
            }
        }

        Self {
            items,
            pagination: Pagination::for_total(request, total),
        }
    }

    /// Wrap items that were windowed elsewhere, counting only what is given.
    ///
    /// Used when a source answers with a bare array for one page: `total` is
    /// the array length and the items are kept whole.
    #[must_use]
    pub fn from_page(items: Vec<T>, request: PageRequest) -> Self {
        let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
        Self {
            items,
            pagination: Pagination::for_total(request, total),
        }
    }

    /// Transform each item while keeping the pagination metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    /// Fallible variant of [`Paginated::map`].
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E, F>(self, f: F) -> Result<Paginated<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(Paginated {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            pagination: self.pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(1, 6, 6, vec![1, 2, 3, 4, 5, 6])]
    #[case(2, 6, 6, vec![7, 8, 9, 10, 11, 12])]
    #[case(3, 6, 6, vec![13])]
    #[case(4, 6, 0, vec![])]
    fn slices_the_requested_window(
        #[case] page: u32,
        #[case] per_page: u32,
        #[case] expected_len: usize,
        #[case] expected: Vec<u32>,
    ) {
        let request = PageRequest::new(page, per_page).expect("valid request");
        let result = Paginated::from_filtered(1..=13_u32, request);

        assert_eq!(result.items.len(), expected_len);
        assert_eq!(result.items, expected);
        assert_eq!(result.pagination.total, 13);
        assert_eq!(result.pagination.total_page, 3);
    }

    #[test]
    fn empty_sets_have_zero_pages() {
        let request = PageRequest::new(5, 10).expect("valid request");
        let result = Paginated::from_filtered(Vec::<u8>::new(), request);

        assert!(result.items.is_empty());
        assert_eq!(result.pagination.total, 0);
        assert_eq!(result.pagination.total_page, 0);
        assert_eq!(result.pagination.page, 5);
    }

    #[test]
    fn item_counts_agree_with_the_request_math() {
        for total in 0_u32..30 {
            for per_page in 1_u32..=8 {
                for page in 1_u32..=6 {
                    let request = PageRequest::new(page, per_page).expect("valid request");
                    let result = Paginated::from_filtered(0..total, request);
                    let expected = request.len_within(u64::from(total));
                    assert_eq!(
                        u64::try_from(result.items.len()).expect("small length"),
                        expected
                    );
                    assert_eq!(result.pagination.total_page, request.total_pages(u64::from(total)));
                }
            }
        }
    }

    #[test]
    fn pre_windowed_pages_are_kept_whole() {
        let request = PageRequest::new(2, 2).expect("valid request");
        let result = Paginated::from_page(vec!["c", "d"], request);

        assert_eq!(result.items, vec!["c", "d"]);
        assert_eq!(result.pagination.page, 2);
        assert_eq!(result.pagination.total, 2);
        assert_eq!(result.pagination.total_page, 1);
    }

    #[test]
    fn serialises_with_camel_case_keys() {
        let request = PageRequest::new(1, 2).expect("valid request");
        let result = Paginated::from_filtered(["a", "b", "c"], request);
        let value = serde_json::to_value(&result).expect("serialisable envelope");

        assert_eq!(
            value,
            json!({
                "items": ["a", "b"],
                "pagination": { "page": 1, "perPage": 2, "total": 3, "totalPage": 2 }
            })
        );
    }

    #[test]
    fn try_map_stops_at_the_first_error() {
        let request = PageRequest::new(1, 3).expect("valid request");
        let result = Paginated::from_filtered(["1", "x", "3"], request)
            .try_map(str::parse::<u8>);
        assert!(result.is_err());
    }
}
