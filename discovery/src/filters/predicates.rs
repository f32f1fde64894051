//! Filter predicate stage: reduce the resident item set to the matching items.

use crate::filters::{Category, FilterState, MinMembers, PriceFacet, QuickFilter, RECENT_LIMIT, TypeFacet};
use crate::types::Item;

/// Return the items that satisfy every active constraint of `state`.
///
/// Matches keep catalog order, except under the `recent` quick filter: the
/// candidate set is then narrowed to the [`RECENT_LIMIT`] newest items of the
/// whole input, newest first, and every other predicate applies to those
/// candidates. Adding any further constraint can only shrink the result.
pub fn apply_filters<'a>(items: &'a [Item], state: &FilterState) -> Vec<&'a Item> {
    let needle = state.query.to_lowercase();

    let candidates: Vec<&Item> = if state.has_quick_filter(QuickFilter::Recent) {
        most_recent(items, RECENT_LIMIT)
    } else {
        items.iter().collect()
    };

    let filtered: Vec<&Item> = candidates
        .into_iter()
        .filter(|item| item_matches(item, state, &needle))
        .collect();

    log::debug!("filter stage kept {} of {} items", filtered.len(), items.len());
    filtered
}

/// Per-item predicate. `needle` is the lowercased query.
pub fn item_matches(item: &Item, state: &FilterState, needle: &str) -> bool {
    if !item.matches_text(needle) {
        return false;
    }

    if let TypeFacet::Only(kind) = state.item_type
        && item.item_type != kind
    {
        return false;
    }

    if let Category::Named(category) = &state.category
        && &item.category != category
    {
        return false;
    }

    let price_ok = match state.price {
        PriceFacet::All => true,
        PriceFacet::Free => item.price_type.is_free(),
        PriceFacet::Paid => !item.price_type.is_free(),
    };
    if !price_ok {
        return false;
    }

    if let MinMembers::AtLeast(minimum) = state.min_members
        && item.members < minimum
    {
        return false;
    }

    state.quick_filters.iter().all(|filter| filter.accepts(item))
}

/// The `limit` newest items, newest first. Ties keep their input order.
fn most_recent(items: &[Item], limit: usize) -> Vec<&Item> {
    let mut by_recency: Vec<&Item> = items.iter().collect();
    by_recency.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    by_recency.truncate(limit);
    by_recency
}
