//! Page-number pagination for the post listings.

/// Where in a listing a request lands: a 1-based page number clamped into
/// the valid range, so the last page always holds the remainder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    number: i64,
    total_items: i64,
    page_size: i64,
}

impl Pager {
    pub fn new(requested: Option<i64>, total_items: i64, page_size: i64) -> Self {
        debug_assert!(page_size > 0);
        let total_pages = Self::pages_for(total_items, page_size);
        let number = requested.unwrap_or(1).clamp(1, total_pages);

        Self {
            number,
            total_items,
            page_size,
        }
    }

    fn pages_for(total_items: i64, page_size: i64) -> i64 {
        ((total_items + page_size - 1) / page_size).max(1)
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn total_pages(&self) -> i64 {
        Self::pages_for(self.total_items, self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.page_size
    }

    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            number: self.number,
            total_pages: self.total_pages(),
            total_items: self.total_items,
            items,
        }
    }
}

/// One page of items plus the numbers the paginator component renders.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Lenient `?page=` parsing: anything unparsable falls back to page 1.
pub fn parse_page_param(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}
