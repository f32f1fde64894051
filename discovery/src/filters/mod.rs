//! Filter state for the discovery grid and the predicate stage built on it.
//!
//! [`FilterState`] is a plain value. Every `with_*` method consumes the state and
//! returns a replacement, so a caller holding the previous value can compare
//! the two to decide whether anything changed.

pub mod normalizers;
pub mod predicates;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::search::SortKey;
use crate::types::{ALL_CATEGORIES, Item, ItemType};

pub use normalizers::*;
pub use predicates::{apply_filters, item_matches};

/// Rating at or above which an item qualifies for the `high-rated` quick filter.
pub const HIGH_RATING_THRESHOLD: f64 = 4.5;
/// Member count at or above which an item qualifies for the `1000+` quick filter.
pub const POPULAR_MEMBERS_THRESHOLD: u64 = 1000;
/// Number of items the `recent` quick filter keeps.
pub const RECENT_LIMIT: usize = 5;
/// Minimum-members options offered by the facet dropdown.
pub const MIN_MEMBERS_OPTIONS: [u64; 4] = [100, 500, 1000, 2000];

/// Category facet. Matching against items is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Named(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::All => ALL_CATEGORIES,
            Category::Named(name) => name,
        }
    }

    #[inline]
    pub fn is_all(&self) -> bool {
        matches!(self, Category::All)
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Price facet: `paid` covers every non-free pricing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceFacet {
    #[default]
    All,
    Free,
    Paid,
}

impl PriceFacet {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            PriceFacet::All => "all",
            PriceFacet::Free => "free",
            PriceFacet::Paid => "paid",
        }
    }
}

/// Minimum member count facet. Serialized as `"all"` or the threshold, the
/// same tokens [`parse_min_members`] reads back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinMembers {
    #[default]
    All,
    AtLeast(u64),
}

impl fmt::Display for MinMembers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinMembers::All => f.write_str("all"),
            MinMembers::AtLeast(threshold) => write!(f, "{threshold}"),
        }
    }
}

impl Serialize for MinMembers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Single-select item type facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFacet {
    #[default]
    All,
    Only(ItemType),
}

impl TypeFacet {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeFacet::All => "all",
            TypeFacet::Only(item_type) => item_type.as_str(),
        }
    }
}

impl Serialize for TypeFacet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Togglable boolean facets layered on top of the primary facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum QuickFilter {
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "verified")]
    Verified,
    #[serde(rename = "1000+")]
    ThousandPlus,
    #[serde(rename = "high-rated")]
    HighRated,
    #[serde(rename = "recent")]
    Recent,
}

impl QuickFilter {
    pub const ALL: [QuickFilter; 5] = [
        QuickFilter::Free,
        QuickFilter::Verified,
        QuickFilter::ThousandPlus,
        QuickFilter::HighRated,
        QuickFilter::Recent,
    ];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            QuickFilter::Free => "free",
            QuickFilter::Verified => "verified",
            QuickFilter::ThousandPlus => "1000+",
            QuickFilter::HighRated => "high-rated",
            QuickFilter::Recent => "recent",
        }
    }

    /// Per-item test. `Recent` is not a per-item property and always passes
    /// here; it is applied to the candidate set in [`apply_filters`].
    pub fn accepts(self, item: &Item) -> bool {
        match self {
            QuickFilter::Free => item.price_type.is_free(),
            QuickFilter::Verified => item.verified,
            QuickFilter::ThousandPlus => item.members >= POPULAR_MEMBERS_THRESHOLD,
            QuickFilter::HighRated => item.rating >= HIGH_RATING_THRESHOLD,
            QuickFilter::Recent => true,
        }
    }
}

/// Everything the user can set on the discovery screen except pagination.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub query: String,
    pub category: Category,
    pub price: PriceFacet,
    pub sort: SortKey,
    pub min_members: MinMembers,
    pub quick_filters: BTreeSet<QuickFilter>,
    pub item_type: TypeFacet,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[inline]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    #[inline]
    pub fn with_price(mut self, price: PriceFacet) -> Self {
        self.price = price;
        self
    }

    #[inline]
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    #[inline]
    pub fn with_min_members(mut self, min_members: MinMembers) -> Self {
        self.min_members = min_members;
        self
    }

    #[inline]
    pub fn with_item_type(mut self, item_type: TypeFacet) -> Self {
        self.item_type = item_type;
        self
    }

    #[inline]
    pub fn with_quick_filter(mut self, filter: QuickFilter) -> Self {
        self.quick_filters.insert(filter);
        self
    }

    #[inline]
    pub fn with_quick_filters(mut self, filters: impl IntoIterator<Item = QuickFilter>) -> Self {
        self.quick_filters.extend(filters);
        self
    }

    /// Flip a quick filter on or off.
    pub fn toggle_quick_filter(mut self, filter: QuickFilter) -> Self {
        if !self.quick_filters.remove(&filter) {
            self.quick_filters.insert(filter);
        }
        self
    }

    /// Select `item_type`, or go back to all types when it is already selected.
    pub fn toggle_item_type(self, item_type: ItemType) -> Self {
        let next = match self.item_type {
            TypeFacet::Only(current) if current == item_type => TypeFacet::All,
            _ => TypeFacet::Only(item_type),
        };
        self.with_item_type(next)
    }

    #[inline]
    pub fn has_quick_filter(&self, filter: QuickFilter) -> bool {
        self.quick_filters.contains(&filter)
    }

    /// Number of facets deviating from their default. Drives "Clear Filters (N)".
    pub fn active_filters_count(&self) -> usize {
        let mut count = self.quick_filters.len();
        if !self.query.is_empty() {
            count += 1;
        }
        if !self.category.is_all() {
            count += 1;
        }
        if self.sort != SortKey::Popular {
            count += 1;
        }
        if self.item_type != TypeFacet::All {
            count += 1;
        }
        if self.price != PriceFacet::All {
            count += 1;
        }
        if self.min_members != MinMembers::All {
            count += 1;
        }
        count
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.active_filters_count() == 0
    }

    /// Sort key the sort stage actually uses. With the `recent` quick filter on
    /// and no explicit sort chosen, results are shown newest first.
    pub fn effective_sort(&self) -> SortKey {
        if self.sort == SortKey::Popular && self.has_quick_filter(QuickFilter::Recent) {
            SortKey::Newest
        } else {
            self.sort
        }
    }
}
