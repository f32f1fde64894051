//! In-memory discovery engine for community, course, challenge, product,
//! one-to-one and event listings.
//!
//! The engine is a synchronous pipeline over an already loaded item list:
//! [`filters`] narrows the list, [`search`] orders and pages it, and
//! [`session`] wires both to the screen's event callbacks.

pub mod errors;
pub mod filters;
pub mod search;
pub mod session;
pub mod types;

pub use errors::*;
pub use filters::{Category, FilterState, MinMembers, PriceFacet, QuickFilter, TypeFacet};
pub use search::{DiscoveryQuery, DiscoveryView, PageMarker, PageRequest, Pagination, SortKey};
pub use session::DiscoverySession;
pub use types::{Catalog, Item, ItemType, PriceType};
