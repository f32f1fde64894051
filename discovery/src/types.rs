//! Catalog data model shared by every pipeline stage.
//!
//! An [`Item`] is one discoverable listing: a community, course, challenge,
//! product, one-to-one offering or event. Items arrive already loaded (usually
//! as a JSON array) and are only ever read by the engine.

use std::{fmt, path::Path, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::errors::{DiscoveryError, DiscoveryResult};

/// Label used by the category dropdown for "no category constraint".
pub const ALL_CATEGORIES: &str = "All";

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemType {
    Community,
    Course,
    Challenge,
    Product,
    OneToOne,
    Event,
}

impl ItemType {
    pub const ALL: [ItemType; 6] = [
        ItemType::Community,
        ItemType::Course,
        ItemType::Challenge,
        ItemType::Product,
        ItemType::OneToOne,
        ItemType::Event,
    ];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            ItemType::Community => "community",
            ItemType::Course => "course",
            ItemType::Challenge => "challenge",
            ItemType::Product => "product",
            ItemType::OneToOne => "oneToOne",
            ItemType::Event => "event",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = DiscoveryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        ItemType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .or_else(|| match trimmed.to_ascii_lowercase().as_str() {
                "one-to-one" | "one_to_one" | "1:1" => Some(ItemType::OneToOne),
                _ => None,
            })
            .ok_or_else(|| DiscoveryError::invalid(format!("Unsupported item type: {trimmed}")))
    }
}

/// Pricing model of an item. Everything except `Free` counts as paid.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    #[default]
    Free,
    Paid,
    Monthly,
    Yearly,
    Hourly,
}

impl PriceType {
    #[inline]
    pub const fn is_free(self) -> bool {
        matches!(self, PriceType::Free)
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            PriceType::Free => "free",
            PriceType::Paid => "paid",
            PriceType::Monthly => "monthly",
            PriceType::Yearly => "yearly",
            PriceType::Hourly => "hourly",
        }
    }
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// A discoverable listing shown in the browse grid.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub members: u64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub price_type: PriceType,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub featured: bool,
    /// Recency key for the `newest` sort and the `recent` quick filter.
    /// Listings without a timestamp sort as the oldest possible entry.
    #[serde(default = "unix_epoch", alias = "createdDate")]
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Case-insensitive substring test over name, creator, description and tags.
    ///
    /// `needle` must already be lowercased; the caller lowercases the query once
    /// per pipeline run instead of once per item.
    pub fn matches_text(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(needle)
            || self.creator.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    Bare(Vec<Item>),
    Wrapped { items: Vec<Item> },
}

/// Loading and inspection helpers for a resident item list.
pub struct Catalog;

impl Catalog {
    /// Decode a catalog from either a bare JSON array or `{ "items": [...] }`.
    pub fn from_json_str(raw: &str) -> DiscoveryResult<Vec<Item>> {
        let payload: CatalogPayload = serde_json::from_str(raw)?;
        let items = match payload {
            CatalogPayload::Bare(items) | CatalogPayload::Wrapped { items } => items,
        };
        log::debug!("decoded catalog with {} items", items.len());
        Ok(items)
    }

    pub fn from_path(path: impl AsRef<Path>) -> DiscoveryResult<Vec<Item>> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Category dropdown values: `"All"` followed by each distinct category in
    /// first-seen order. Blank categories are skipped.
    pub fn categories(items: &[Item]) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for item in items {
            if item.category.is_empty() || categories.iter().any(|known| known == &item.category) {
                continue;
            }
            categories.push(item.category.clone());
        }
        categories
    }
}
