/// Default page size for list queries.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: usize = 500;

/// Offset pagination ordered by record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: usize,
    offset: usize,
    descending: bool,
}

impl Pagination {
    /// Creates pagination, clamping the limit into `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn new(limit: Option<usize>, offset: Option<usize>, descending: bool) -> Self {
        Self {
            limit: limit
                .unwrap_or(DEFAULT_PAGE_LIMIT)
                .clamp(1, MAX_PAGE_LIMIT),
            offset: offset.unwrap_or(0),
            descending,
        }
    }

    /// Maximum rows returned.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Rows skipped before the page starts.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether records are ordered by descending id.
    #[must_use]
    pub fn descending(&self) -> bool {
        self.descending
    }

    /// Applies this pagination to an id-ordered slice of records.
    #[must_use]
    pub fn apply<T: Clone>(&self, ordered: &[T]) -> Vec<T> {
        let iter: Box<dyn Iterator<Item = &T>> = if self.descending {
            Box::new(ordered.iter().rev())
        } else {
            Box::new(ordered.iter())
        };

        iter.skip(self.offset).take(self.limit).cloned().collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None, false)
    }
}

/// One page of records plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records in the requested window.
    pub items: Vec<T>,
    /// Number of records matching the filter, ignoring pagination.
    pub total: u64,
}

impl<T> Page<T> {
    /// Converts the page items while keeping the total.
    pub fn map<U>(self, transform: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(transform).collect(),
            total: self.total,
        }
    }
}
