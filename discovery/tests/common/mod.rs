//! Shared catalog fixtures for the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use discovery::{Item, ItemType, PriceType};

pub const CATEGORIES: [&str; 3] = ["Tech", "Art", "Health"];

/// Minimal listing with every optional field at its default.
pub fn listing(id: &str, item_type: ItemType) -> Item {
    Item {
        id: id.to_string(),
        item_type,
        name: format!("Listing {id}"),
        description: String::new(),
        creator: "Creator".to_string(),
        category: CATEGORIES[0].to_string(),
        tags: Vec::new(),
        members: 0,
        rating: 0.0,
        price_type: PriceType::Free,
        price: 0.0,
        verified: false,
        featured: false,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

/// Twenty communities: even ids free, odd ids paid, members 0..=1900 in steps
/// of 100, one day apart in creation time.
pub fn twenty_communities() -> Vec<Item> {
    (0..20u64)
        .map(|n| {
            let mut item = listing(&format!("c{n:02}"), ItemType::Community);
            item.name = format!("Community {n}");
            item.description = format!("Gathering number {n}");
            item.category = CATEGORIES[(n % 3) as usize].to_string();
            item.members = n * 100;
            item.rating = 3.0 + (n % 6) as f64 * 0.4;
            if n % 2 == 1 {
                item.price_type = PriceType::Paid;
                item.price = (n * 5) as f64;
            }
            item.verified = n % 3 == 0;
            item.featured = n % 7 == 0;
            item.created_at = DateTime::<Utc>::UNIX_EPOCH + Duration::days(n as i64);
            item
        })
        .collect()
}

/// Mixed catalog spanning every item type.
pub fn mixed_catalog() -> Vec<Item> {
    let mut items = twenty_communities();
    for (offset, kind) in ItemType::ALL.into_iter().enumerate() {
        let mut item = listing(&format!("m{offset}"), kind);
        item.members = 250 * offset as u64;
        item.rating = 4.0 + offset as f64 * 0.1;
        item.tags = vec!["Mixed".to_string(), kind.as_str().to_string()];
        item.price_type = if offset % 2 == 0 { PriceType::Monthly } else { PriceType::Free };
        item.price = if offset % 2 == 0 { 12.0 } else { 0.0 };
        item.created_at = DateTime::<Utc>::UNIX_EPOCH + Duration::hours(offset as i64 * 7);
        items.push(item);
    }
    items
}

pub fn ids(items: &[&Item]) -> Vec<String> {
    items.iter().map(|item| item.id.clone()).collect()
}
