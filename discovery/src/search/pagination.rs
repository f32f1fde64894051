//! Pagination stage: slice bounds and the page-number strip.

use serde::{Deserialize, Serialize};

use crate::errors::DiscoveryError;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_ITEMS_PER_PAGE: usize = 12;
/// Page sizes offered by the "items per page" selector.
pub const ITEMS_PER_PAGE_OPTIONS: [usize; 4] = [8, 12, 16, 24];
pub const DEFAULT_PAGE_WINDOW: usize = 1;
/// Widest page strip a caller may configure.
pub const MAX_PAGE_WINDOW: usize = 3;

/// Requested page (1-indexed) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl PageRequest {
    #[inline]
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Build a request whose page size must be one of [`ITEMS_PER_PAGE_OPTIONS`].
    pub fn checked(page: usize, per_page: usize) -> Result<Self, DiscoveryError> {
        validate_items_per_page(per_page)?;
        Ok(Self::new(page.max(1), per_page))
    }
}

pub fn validate_items_per_page(per_page: usize) -> Result<(), DiscoveryError> {
    if ITEMS_PER_PAGE_OPTIONS.contains(&per_page) {
        Ok(())
    } else {
        Err(DiscoveryError::invalid(format!(
            "Unsupported items per page: {per_page} (expected one of {ITEMS_PER_PAGE_OPTIONS:?})"
        )))
    }
}

pub fn validate_page_window(delta: usize) -> Result<(), DiscoveryError> {
    if (1..=MAX_PAGE_WINDOW).contains(&delta) {
        Ok(())
    } else {
        Err(DiscoveryError::invalid(format!(
            "Unsupported page window: {delta} (expected 1 to {MAX_PAGE_WINDOW})"
        )))
    }
}

/// Derived pagination metadata. Indices are 0-based; `end_index` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl Pagination {
    /// Compute slice bounds for `total_items`, clamping the requested page into
    /// `1..=total_pages`. There is always at least one page.
    pub fn compute(total_items: usize, request: PageRequest) -> Self {
        let per_page = request.per_page.max(1);
        let total_pages = total_items.div_ceil(per_page).max(1);
        let current_page = request.page.clamp(1, total_pages);
        let start_index = ((current_page - 1) * per_page).min(total_items);
        let end_index = (start_index + per_page).min(total_items);

        Self {
            current_page,
            per_page,
            total_items,
            total_pages,
            start_index,
            end_index,
        }
    }

    #[inline]
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    #[inline]
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Page-number strip for this position. See [`page_window`].
    pub fn window(&self, delta: usize) -> Vec<PageMarker> {
        page_window(self.current_page, self.total_pages, delta)
    }
}

/// One entry of the page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

/// Page numbers around `current` with ellipses for the gaps.
///
/// The first and last page are always present; pages within `delta` of
/// `current` are listed; a gap toward either edge collapses into one
/// [`PageMarker::Ellipsis`]. Returns nothing when there is a single page.
pub fn page_window(current: usize, total_pages: usize, delta: usize) -> Vec<PageMarker> {
    if total_pages <= 1 {
        return Vec::new();
    }

    let current = current.clamp(1, total_pages);
    let lower = current.saturating_sub(delta).max(2);
    let upper = current.saturating_add(delta).min(total_pages - 1);

    let mut markers = Vec::with_capacity((upper + 1).saturating_sub(lower) + 4);
    markers.push(PageMarker::Page(1));
    if lower > 2 {
        markers.push(PageMarker::Ellipsis);
    }
    markers.extend((lower..=upper).map(PageMarker::Page));
    if upper < total_pages - 1 {
        markers.push(PageMarker::Ellipsis);
    }
    markers.push(PageMarker::Page(total_pages));
    markers
}
