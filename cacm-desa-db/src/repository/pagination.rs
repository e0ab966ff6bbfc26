use serde::Serialize;

/// Window into an ordered listing, as `LIMIT`/`OFFSET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl PageRequest {
    /// Page `page_number` of `page_size` rows. Numbering starts at 1 and a
    /// zero page is read as the first.
    ///
    /// ```
    /// use cacm_desa_db::repository::pagination::PageRequest;
    ///
    /// assert_eq!(PageRequest::for_page(10, 3).offset, 20);
    /// assert_eq!(PageRequest::for_page(10, 0).offset, 0);
    /// ```
    pub fn for_page(page_size: usize, page_number: usize) -> Self {
        Self {
            limit: page_size,
            offset: (page_number.max(1) - 1) * page_size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { limit: 20, offset: 0 }
    }
}

/// One window of a listing plus the size of the whole filtered set, which
/// the period table needs for its pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    /// Slice `request` out of a list that is already filtered and sorted.
    pub fn from_all(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let items = all
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .collect();
        Self::new(items, total, request.limit, request.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_all_cuts_the_requested_window() {
        let page = Page::from_all((1..=45).collect::<Vec<_>>(), PageRequest::for_page(20, 3));
        assert_eq!(page.items, vec![41, 42, 43, 44, 45]);
        assert_eq!(page.total, 45);
        assert_eq!(page.offset, 40);
    }

    #[test]
    fn window_past_the_end_is_empty() {
        let page = Page::from_all(vec!["a", "b"], PageRequest::for_page(20, 2));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
    }
}
