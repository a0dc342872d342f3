//! Page arithmetic for list views.

use serde::{Deserialize, Serialize};

/// Page-size choices offered on the orders list.
pub const ORDER_PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];

/// Position within a paginated result set.
///
/// Pages are 1-based. `pages` is the total number of pages, which is zero
/// for an empty result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub pages: u32,
}

impl Page {
    /// Build a page from values reported by the backend.
    ///
    /// A page of 0 is treated as 1 and a page size of 0 as 1.
    #[must_use]
    pub const fn new(page: u32, per_page: u32, total: u64, pages: u32) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            per_page: if per_page == 0 { 1 } else { per_page },
            total,
            pages,
        }
    }

    /// Compute pagination locally for a list the backend returns unpaginated.
    #[must_use]
    pub fn from_total(total: u64, page: u32, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let pages = u32::try_from(total.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX);
        let page = page.clamp(1, pages.max(1));
        Self {
            page,
            per_page,
            total,
            pages,
        }
    }

    /// Index range of the current page within a locally paginated list.
    #[must_use]
    pub fn slice_range(&self, len: usize) -> std::ops::Range<usize> {
        let per_page = self.per_page as usize;
        let start = (self.page.saturating_sub(1) as usize).saturating_mul(per_page).min(len);
        let end = start.saturating_add(per_page).min(len);
        start..end
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.pages
    }

    #[must_use]
    pub const fn prev(&self) -> u32 {
        if self.page > 1 { self.page - 1 } else { 1 }
    }

    #[must_use]
    pub const fn next(&self) -> u32 {
        if self.page < self.pages {
            self.page + 1
        } else {
            self.page
        }
    }

    /// 1-based index of the first item on this page, 0 when empty.
    #[must_use]
    pub fn first_item(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        (u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page) + 1).min(self.total)
    }

    /// 1-based index of the last item on this page, 0 when empty.
    #[must_use]
    pub fn last_item(&self) -> u64 {
        (u64::from(self.page) * u64::from(self.per_page)).min(self.total)
    }

    /// Up to `width` page numbers centred on the current page.
    #[must_use]
    pub fn window(&self, width: u32) -> Vec<u32> {
        if self.pages == 0 || width == 0 {
            return Vec::new();
        }
        let width = width.min(self.pages);
        let half = width / 2;
        let start = self
            .page
            .saturating_sub(half)
            .max(1)
            .min(self.pages - width + 1);
        (start..start + width).collect()
    }
}
