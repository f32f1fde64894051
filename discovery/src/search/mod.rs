//! # Discovery search pipeline
//!
//! ```text
//! items ─► filter(FilterState) ─► sort(SortKey) ─► paginate(PageRequest) ─► DiscoveryView
//! ```
//!
//! Every stage is a pure function of its inputs. Running the pipeline twice with
//! the same items and state yields the same view.
//!
//! ## Sort keys
//!
//! | Key          | Order                                                         |
//! |--------------|---------------------------------------------------------------|
//! | `popular`    | featured first, then rating desc, then members desc (default) |
//! | `newest`     | `createdAt` desc                                              |
//! | `members`    | members desc                                                  |
//! | `rating`     | rating desc                                                   |
//! | `price-low`  | free first, then price asc                                    |
//! | `price-high` | price desc, free last                                         |
//!
//! Sorting is stable: items with equal keys keep their catalog order, which keeps
//! page boundaries fixed across re-renders.

pub mod pagination;

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::errors::DiscoveryError;
use crate::filters::{FilterState, apply_filters, parse_category, parse_min_members, parse_quick_filters};
use crate::types::Item;

pub use pagination::{
    DEFAULT_ITEMS_PER_PAGE, DEFAULT_PAGE, DEFAULT_PAGE_WINDOW, ITEMS_PER_PAGE_OPTIONS, MAX_PAGE_WINDOW, PageMarker,
    PageRequest, Pagination, page_window, validate_page_window,
};

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Popular,
    Newest,
    Members,
    Rating,
    PriceLow,
    PriceHigh,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Popular,
        SortKey::Newest,
        SortKey::Members,
        SortKey::Rating,
        SortKey::PriceLow,
        SortKey::PriceHigh,
    ];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortKey::Popular => "popular",
            SortKey::Newest => "newest",
            SortKey::Members => "members",
            SortKey::Rating => "rating",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
        }
    }

    /// Ordering of `a` relative to `b` under this key.
    pub fn compare(self, a: &Item, b: &Item) -> Ordering {
        match self {
            SortKey::Popular => b
                .featured
                .cmp(&a.featured)
                .then_with(|| b.rating.total_cmp(&a.rating))
                .then_with(|| b.members.cmp(&a.members)),
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::Members => b.members.cmp(&a.members),
            SortKey::Rating => b.rating.total_cmp(&a.rating),
            SortKey::PriceLow => match (a.price_type.is_free(), b.price_type.is_free()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => a.price.total_cmp(&b.price),
            },
            SortKey::PriceHigh => match (a.price_type.is_free(), b.price_type.is_free()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => b.price.total_cmp(&a.price),
            },
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DiscoveryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(trimmed))
            .or_else(|| match trimmed.to_ascii_lowercase().as_str() {
                "price_low" | "price-asc" => Some(SortKey::PriceLow),
                "price_high" | "price-desc" => Some(SortKey::PriceHigh),
                _ => None,
            })
            .ok_or_else(|| DiscoveryError::invalid(format!("Unsupported sort field: {trimmed}")))
    }
}

/// Stable in-place sort of filtered items.
pub fn sort_items(items: &mut [&Item], key: SortKey) {
    items.sort_by(|a, b| key.compare(a, b));
}

/// Output of one pipeline run, ready for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryView<'a> {
    pub visible_items: Vec<&'a Item>,
    pub total_items: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub per_page: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub active_filters_count: usize,
}

impl DiscoveryView<'_> {
    #[inline]
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether pagination controls should be shown at all.
    #[inline]
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }

    pub fn page_window(&self, delta: usize) -> Vec<PageMarker> {
        page_window(self.current_page, self.total_pages, delta)
    }
}

/// Run filter, sort and pagination over `items`.
pub fn run<'a>(items: &'a [Item], state: &FilterState, request: PageRequest) -> DiscoveryView<'a> {
    let mut matched = apply_filters(items, state);
    sort_items(&mut matched, state.effective_sort());

    let pagination = Pagination::compute(matched.len(), request);
    log::debug!(
        "showing items {}..{} of {} (page {}/{})",
        pagination.start_index,
        pagination.end_index,
        pagination.total_items,
        pagination.current_page,
        pagination.total_pages
    );

    let visible_items = matched[pagination.start_index..pagination.end_index].to_vec();

    DiscoveryView {
        visible_items,
        total_items: pagination.total_items,
        current_page: pagination.current_page,
        total_pages: pagination.total_pages,
        per_page: pagination.per_page,
        start_index: pagination.start_index,
        end_index: pagination.end_index,
        active_filters_count: state.active_filters_count(),
    }
}

/// String-typed discovery request as carried by a query string or CLI flags.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DiscoveryQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub sort: Option<String>,
    pub min_members: Option<String>,
    #[serde(default)]
    pub quick: Vec<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl DiscoveryQuery {
    /// Parse into a filter state and page request.
    ///
    /// Unknown sort keys, types, price facets and quick filters are rejected, as
    /// are page sizes outside [`ITEMS_PER_PAGE_OPTIONS`]. An unparseable
    /// minimum-members value means no constraint.
    pub fn into_request(self) -> Result<(FilterState, PageRequest), DiscoveryError> {
        let per_page = self.per_page.unwrap_or(DEFAULT_ITEMS_PER_PAGE);
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let request = PageRequest::checked(page, per_page)?;

        let mut state = FilterState::new();
        if let Some(query) = self.q {
            state = state.with_query(query);
        }
        if let Some(item_type) = self.item_type.as_deref() {
            state = state.with_item_type(item_type.parse()?);
        }
        if let Some(category) = self.category.as_deref() {
            state = state.with_category(parse_category(category));
        }
        if let Some(price) = self.price.as_deref() {
            state = state.with_price(price.parse()?);
        }
        if let Some(sort) = self.sort.as_deref() {
            state = state.with_sort(sort.parse()?);
        }
        if let Some(min_members) = self.min_members.as_deref() {
            state = state.with_min_members(parse_min_members(min_members));
        }
        state = state.with_quick_filters(parse_quick_filters(&self.quick)?);

        Ok((state, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{Category, MinMembers, PriceFacet, QuickFilter, TypeFacet};
    use crate::types::{ItemType, PriceType};
    use chrono::{DateTime, Utc};

    fn item(id: &str, price_type: PriceType, price: f64) -> Item {
        Item {
            id: id.to_string(),
            item_type: ItemType::Course,
            name: id.to_string(),
            description: String::new(),
            creator: String::new(),
            category: String::new(),
            tags: Vec::new(),
            members: 0,
            rating: 0.0,
            price_type,
            price,
            verified: false,
            featured: false,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn sorted_ids(items: &[Item], key: SortKey) -> Vec<&str> {
        let mut refs: Vec<&Item> = items.iter().collect();
        sort_items(&mut refs, key);
        refs.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn price_high_puts_free_last() {
        let items = vec![
            item("free", PriceType::Free, 0.0),
            item("fifty", PriceType::Paid, 50.0),
            item("ten", PriceType::Paid, 10.0),
        ];
        assert_eq!(sorted_ids(&items, SortKey::PriceHigh), vec!["fifty", "ten", "free"]);
    }

    #[test]
    fn price_low_puts_free_first_regardless_of_price() {
        let items = vec![
            item("ten", PriceType::Paid, 10.0),
            item("odd-free", PriceType::Free, 99.0),
            item("five", PriceType::Monthly, 5.0),
        ];
        assert_eq!(sorted_ids(&items, SortKey::PriceLow), vec!["odd-free", "five", "ten"]);
    }

    #[test]
    fn popular_orders_featured_then_rating_then_members() {
        let mut a = item("a", PriceType::Free, 0.0);
        a.rating = 4.9;
        a.members = 10;
        let mut b = item("b", PriceType::Free, 0.0);
        b.rating = 4.1;
        b.featured = true;
        let mut c = item("c", PriceType::Free, 0.0);
        c.rating = 4.9;
        c.members = 500;
        let items = vec![a, b, c];
        assert_eq!(sorted_ids(&items, SortKey::Popular), vec!["b", "c", "a"]);
    }

    #[test]
    fn equal_keys_keep_catalog_order() {
        let items = vec![
            item("first", PriceType::Paid, 10.0),
            item("second", PriceType::Paid, 10.0),
            item("third", PriceType::Paid, 10.0),
        ];
        for key in SortKey::ALL {
            assert_eq!(sorted_ids(&items, key), vec!["first", "second", "third"], "{key}");
        }
    }

    #[test]
    fn sort_key_round_trips_through_strings() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert!("trending".parse::<SortKey>().is_err());
    }

    #[test]
    fn into_request_applies_defaults() {
        let (state, request) = DiscoveryQuery::default().into_request().unwrap();
        assert!(state.is_default());
        assert_eq!(request, PageRequest::default());
    }

    #[test]
    fn into_request_parses_every_facet() {
        let query = DiscoveryQuery {
            q: Some("rust".into()),
            item_type: Some("course".into()),
            category: Some("Tech".into()),
            price: Some("paid".into()),
            sort: Some("rating".into()),
            min_members: Some("500".into()),
            quick: vec!["verified,high-rated".into()],
            page: Some(2),
            per_page: Some(8),
        };
        let (state, request) = query.into_request().unwrap();
        assert_eq!(state.query, "rust");
        assert_eq!(state.item_type, TypeFacet::Only(ItemType::Course));
        assert_eq!(state.category, Category::Named("Tech".into()));
        assert_eq!(state.price, PriceFacet::Paid);
        assert_eq!(state.sort, SortKey::Rating);
        assert_eq!(state.min_members, MinMembers::AtLeast(500));
        assert!(state.has_quick_filter(QuickFilter::Verified));
        assert!(state.has_quick_filter(QuickFilter::HighRated));
        assert_eq!(state.active_filters_count(), 8);
        assert_eq!(request, PageRequest::new(2, 8));
    }

    #[test]
    fn into_request_rejects_unknown_sort_and_page_size() {
        let bad_sort = DiscoveryQuery {
            sort: Some("hot".into()),
            ..Default::default()
        };
        assert!(matches!(bad_sort.into_request(), Err(DiscoveryError::InvalidRequest { .. })));

        let bad_size = DiscoveryQuery {
            per_page: Some(50),
            ..Default::default()
        };
        assert!(matches!(bad_size.into_request(), Err(DiscoveryError::InvalidRequest { .. })));
    }

    #[test]
    fn into_request_tolerates_invalid_min_members() {
        let query = DiscoveryQuery {
            min_members: Some("many".into()),
            ..Default::default()
        };
        let (state, _) = query.into_request().unwrap();
        assert_eq!(state.min_members, MinMembers::All);
    }

    #[test]
    fn run_on_empty_catalog() {
        let view = run(&[], &FilterState::new(), PageRequest::default());
        assert!(view.visible_items.is_empty());
        assert_eq!(view.total_items, 0);
        assert_eq!(view.total_pages, 1);
        assert!(!view.is_paginated());
        assert!(view.page_window(1).is_empty());
    }

    #[test]
    fn query_deserializes_from_json() {
        let query: DiscoveryQuery =
            serde_json::from_str(r#"{"q": "art", "type": "event", "quick": ["free"], "per_page": 24}"#).unwrap();
        let (state, request) = query.into_request().unwrap();
        assert_eq!(state.item_type, TypeFacet::Only(ItemType::Event));
        assert_eq!(request.per_page, 24);
    }
}
