use crate::{AppError, AppResult};

/// One-based page coordinates for offset pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Page {
    page: u32,
    limit: u32,
}

impl Page {
    /// Creates page coordinates, rejecting a zero page or limit.
    pub fn new(page: u32, limit: u32) -> AppResult<Self> {
        if page == 0 {
            return Err(AppError::Validation("page must be at least 1".to_owned()));
        }
        if limit == 0 {
            return Err(AppError::Validation("limit must be at least 1".to_owned()));
        }

        Ok(Self { page, limit })
    }

    /// Returns the one-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the maximum number of items on this page.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the number of rows skipped before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// One page of items together with the size of the full filtered set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResult<T> {
    items: Vec<T>,
    total: u64,
    page: Page,
}

impl<T> ListResult<T> {
    /// Combines a page of items with the total reported by the matching count.
    ///
    /// Items beyond the page limit are dropped so a page never exceeds its limit.
    /// A count taken before rows on this page were written is raised to cover
    /// them, so `items` never outnumber `total`.
    #[must_use]
    pub fn new(mut items: Vec<T>, total: u64, page: Page) -> Self {
        items.truncate(page.limit() as usize);
        let covered = if items.is_empty() {
            0
        } else {
            page.offset().saturating_add(items.len() as u64)
        };

        Self {
            items,
            total: total.max(covered),
            page,
        }
    }

    /// Returns the items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the result and returns the items on this page.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the number of rows matching the filter across all pages.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns the one-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.page()
    }

    /// Returns the page limit.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.page.limit()
    }

    /// Returns `ceil(total / limit)`.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page.limit()))
    }

    /// Converts every item while keeping pagination metadata.
    #[must_use]
    pub fn map<U>(self, transform: impl FnMut(T) -> U) -> ListResult<U> {
        ListResult {
            items: self.items.into_iter().map(transform).collect(),
            total: self.total,
            page: self.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{ListResult, Page};

    #[test]
    fn page_rejects_zero_values() {
        assert!(Page::new(0, 10).is_err());
        assert!(Page::new(1, 0).is_err());
    }

    #[test]
    fn offset_follows_page_and_limit() {
        let page = Page::new(3, 25);
        assert!(page.is_ok());
        assert_eq!(page.map(|page| page.offset()).unwrap_or_default(), 50);
    }

    #[test]
    fn list_result_never_exceeds_limit() {
        let Ok(page) = Page::new(1, 2) else {
            panic!("valid page rejected");
        };
        let result = ListResult::new(vec![1, 2, 3], 3, page);
        assert_eq!(result.items(), &[1, 2]);
        assert_eq!(result.total_pages(), 2);
    }

    #[test]
    fn stale_count_is_raised_to_cover_listed_items() {
        let Ok(page) = Page::new(2, 10) else {
            panic!("valid page rejected");
        };
        let result = ListResult::new(vec![1, 2, 3], 11, page);
        assert_eq!(result.total(), 13);
        assert_eq!(result.total_pages(), 2);

        let Ok(first) = Page::new(1, 10) else {
            panic!("valid page rejected");
        };
        let fresh = ListResult::new(vec![1, 2], 0, first);
        assert_eq!(fresh.total(), 2);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let Ok(page) = Page::new(4, 20) else {
            panic!("valid page rejected");
        };
        let result = ListResult::<u8>::new(Vec::new(), 0, page);
        assert_eq!(result.total_pages(), 0);
        assert_eq!(result.page(), 4);
    }

    proptest! {
        #[test]
        fn total_pages_is_ceiling_of_total_over_limit(total in 0_u64..1_000_000, limit in 1_u32..500) {
            let page = Page::new(1, limit).map_err(|error| TestCaseError::fail(error.to_string()))?;
            let result = ListResult::<()>::new(Vec::new(), total, page);
            let expected = (total + u64::from(limit) - 1) / u64::from(limit);

            prop_assert_eq!(result.total_pages(), expected);
            prop_assert_eq!(result.total_pages() == 0, total == 0);
        }

        #[test]
        fn items_never_outnumber_total(len in 0_usize..50, total in 0_u64..50, page in 1_u32..5, limit in 1_u32..40) {
            let page = Page::new(page, limit).map_err(|error| TestCaseError::fail(error.to_string()))?;
            let result = ListResult::new(vec![0_u8; len], total, page);

            prop_assert!(result.items().len() as u64 <= result.total());
            prop_assert!(result.items().len() <= limit as usize);
        }

        #[test]
        fn offset_is_previous_pages_times_limit(page in 1_u32..10_000, limit in 1_u32..500) {
            let coordinates = Page::new(page, limit).map_err(|error| TestCaseError::fail(error.to_string()))?;
            prop_assert_eq!(coordinates.offset(), u64::from(page - 1) * u64::from(limit));
        }
    }
}
