use serde::{Deserialize, Serialize};

/// Number of items per page for paginated listings and location searches.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// 1-indexed page request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Zero-based offset of the first item on this page. Saturates for
    /// pages far past any real collection.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.per_page)
    }

    /// Slice out this page from an already materialised collection.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.per_page)
            .collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_ITEMS_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_requested_page() {
        let items: Vec<u32> = (0..45).collect();
        assert_eq!(Pagination::new(3, 20).apply(items.clone()), vec![40, 41, 42, 43, 44]);
        assert!(Pagination::new(4, 20).apply(items).is_empty());
    }

    #[test]
    fn page_zero_behaves_like_first_page() {
        assert_eq!(Pagination::new(0, 20).offset(), 0);
    }

    #[test]
    fn huge_page_saturates_to_an_empty_slice() {
        let page = Pagination::new(usize::MAX, 20);
        assert_eq!(page.offset(), usize::MAX);
        assert!(page.apply((0..45).collect::<Vec<u32>>()).is_empty());
    }
}
