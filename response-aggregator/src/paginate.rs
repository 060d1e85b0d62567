use crate::errors::{AggregationError, Result};

/// Window over the merged, possibly sorted, items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(offset: usize, limit: usize) -> Self {
        Page { offset, limit }
    }

    /// Page addressed by number, `page * page_size` items from the start.
    pub fn from_page_number(page: usize, page_size: usize) -> Result<Self> {
        let offset = page.checked_mul(page_size).ok_or_else(|| {
            AggregationError::InvalidPage(format!("page {page} of size {page_size} overflows"))
        })?;
        Ok(Page::new(offset, page_size))
    }
}

/// Returns `items[offset..offset + limit]`, clamped to the sequence. An offset past
/// the end yields an empty sequence.
pub fn paginate<T>(items: Vec<T>, offset: usize, limit: usize) -> Vec<T> {
    if offset >= items.len() {
        return Vec::new();
    }
    items.into_iter().skip(offset).take(limit).collect()
}
