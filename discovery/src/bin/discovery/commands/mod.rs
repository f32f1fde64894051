pub mod categories;
pub mod search;
