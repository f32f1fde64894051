//! Event-driven controller for one discovery screen.
//!
//! A [`DiscoverySession`] owns the filter state and the pagination position.
//! Each callback replaces the state with a new value. Any change to what is
//! shown (a filter, the sort key, the page size) sends the user back to page 1.

use crate::errors::DiscoveryError;
use crate::filters::{Category, FilterState, MinMembers, PriceFacet, QuickFilter};
use crate::search::{self, DiscoveryView, PageRequest, pagination::validate_items_per_page};
use crate::types::{Item, ItemType};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscoverySession {
    state: FilterState,
    page: PageRequest,
}

impl DiscoverySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state and page request, e.g. one parsed from a
    /// [`DiscoveryQuery`](crate::search::DiscoveryQuery).
    pub fn with_request(state: FilterState, page: PageRequest) -> Self {
        Self { state, page }
    }

    #[inline]
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    #[inline]
    pub fn current_page(&self) -> usize {
        self.page.page
    }

    #[inline]
    pub fn items_per_page(&self) -> usize {
        self.page.per_page
    }

    #[inline]
    pub fn active_filters_count(&self) -> usize {
        self.state.active_filters_count()
    }

    /// Run the pipeline over `items` for the current state.
    pub fn view<'a>(&self, items: &'a [Item]) -> DiscoveryView<'a> {
        search::run(items, &self.state, self.page)
    }

    pub fn on_query_change(&mut self, query: impl Into<String>) {
        self.replace_state(|state| state.with_query(query));
    }

    pub fn on_category_change(&mut self, category: Category) {
        self.replace_state(|state| state.with_category(category));
    }

    pub fn on_sort_change(&mut self, sort: search::SortKey) {
        self.replace_state(|state| state.with_sort(sort));
    }

    pub fn on_type_toggle(&mut self, item_type: ItemType) {
        self.replace_state(|state| state.toggle_item_type(item_type));
    }

    pub fn on_quick_filter_toggle(&mut self, filter: QuickFilter) {
        self.replace_state(|state| state.toggle_quick_filter(filter));
    }

    pub fn on_price_change(&mut self, price: PriceFacet) {
        self.replace_state(|state| state.with_price(price));
    }

    pub fn on_min_members_change(&mut self, min_members: MinMembers) {
        self.replace_state(|state| state.with_min_members(min_members));
    }

    /// Move to `page`. Out-of-range pages are clamped when the view is computed.
    pub fn on_page_change(&mut self, page: usize) {
        self.page.page = page.max(1);
    }

    pub fn on_items_per_page_change(&mut self, per_page: usize) -> Result<(), DiscoveryError> {
        validate_items_per_page(per_page)?;
        self.page = PageRequest::new(1, per_page);
        Ok(())
    }

    /// Reset every filter to its default. The page size is kept.
    pub fn on_clear_all(&mut self) {
        self.state = FilterState::default();
        self.page.page = 1;
    }

    fn replace_state(&mut self, update: impl FnOnce(FilterState) -> FilterState) {
        let next = update(self.state.clone());
        if next != self.state {
            log::debug!("filter state changed, {} active filters", next.active_filters_count());
        }
        self.state = next;
        self.page.page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SortKey;

    #[test]
    fn filter_changes_reset_page() {
        let mut session = DiscoverySession::new();
        session.on_page_change(3);
        assert_eq!(session.current_page(), 3);

        session.on_query_change("rust");
        assert_eq!(session.current_page(), 1);

        session.on_page_change(2);
        session.on_sort_change(SortKey::Members);
        assert_eq!(session.current_page(), 1);

        session.on_page_change(2);
        session.on_quick_filter_toggle(QuickFilter::Verified);
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.active_filters_count(), 3);
    }

    #[test]
    fn page_size_change_validates_and_resets() {
        let mut session = DiscoverySession::new();
        session.on_page_change(4);
        assert!(session.on_items_per_page_change(7).is_err());
        assert_eq!(session.current_page(), 4);
        assert_eq!(session.items_per_page(), 12);

        session.on_items_per_page_change(24).unwrap();
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.items_per_page(), 24);
    }

    #[test]
    fn clear_all_restores_defaults_but_keeps_page_size() {
        let mut session = DiscoverySession::new();
        session.on_items_per_page_change(8).unwrap();
        session.on_category_change(Category::Named("Art".into()));
        session.on_type_toggle(ItemType::Challenge);
        session.on_price_change(PriceFacet::Free);
        session.on_min_members_change(MinMembers::AtLeast(100));
        session.on_page_change(2);
        assert_eq!(session.active_filters_count(), 4);

        session.on_clear_all();
        assert!(session.state().is_default());
        assert_eq!(session.active_filters_count(), 0);
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.items_per_page(), 8);
    }

    #[test]
    fn page_zero_is_treated_as_first_page() {
        let mut session = DiscoverySession::new();
        session.on_page_change(0);
        assert_eq!(session.current_page(), 1);
    }
}
