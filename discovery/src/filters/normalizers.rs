//! Parsing of facet values as they arrive from query strings and CLI flags.
//!
//! Enum-like facets reject unknown tokens. The minimum-members facet is the one
//! exception: anything that does not start with digits means "no constraint".

use std::str::FromStr;

use crate::errors::DiscoveryError;
use crate::filters::{Category, MinMembers, PriceFacet, QuickFilter, TypeFacet};
use crate::types::{ALL_CATEGORIES, ItemType};

/// `"All"` (or an empty value) selects every category; anything else is kept verbatim.
pub fn parse_category(raw: &str) -> Category {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == ALL_CATEGORIES {
        Category::All
    } else {
        Category::Named(trimmed.to_string())
    }
}

/// Parse a minimum-members value such as `"500"` or `"1000+"`.
///
/// Leading digits are taken as the threshold. `"all"`, an empty value, or a
/// value without leading digits degrades to [`MinMembers::All`].
pub fn parse_min_members(raw: &str) -> MinMembers {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return MinMembers::All;
    }

    let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<u64>() {
        Ok(value) => MinMembers::AtLeast(value),
        Err(_) => {
            log::warn!("ignoring invalid minimum members value: {trimmed}");
            MinMembers::All
        }
    }
}

/// Parse a list of quick filter tokens. Each entry may itself hold several
/// tokens separated by `,` or `|`.
pub fn parse_quick_filters<S: AsRef<str>>(raw: &[S]) -> Result<Vec<QuickFilter>, DiscoveryError> {
    raw.iter()
        .flat_map(|entry| entry.as_ref().split([',', '|']))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::parse)
        .collect()
}

impl FromStr for PriceFacet {
    type Err = DiscoveryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(PriceFacet::All),
            "free" => Ok(PriceFacet::Free),
            "paid" => Ok(PriceFacet::Paid),
            other => Err(DiscoveryError::invalid(format!("Unsupported price filter: {other}"))),
        }
    }
}

impl FromStr for QuickFilter {
    type Err = DiscoveryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        QuickFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == normalized)
            .or_else(|| match normalized.as_str() {
                "1000" | "popular-size" => Some(QuickFilter::ThousandPlus),
                "high_rated" | "highrated" => Some(QuickFilter::HighRated),
                _ => None,
            })
            .ok_or_else(|| DiscoveryError::invalid(format!("Unsupported quick filter: {normalized}")))
    }
}

impl FromStr for TypeFacet {
    type Err = DiscoveryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(TypeFacet::All);
        }
        trimmed.parse::<ItemType>().map(TypeFacet::Only)
    }
}

impl FromStr for MinMembers {
    type Err = DiscoveryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(parse_min_members(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_all_is_case_sensitive() {
        assert_eq!(parse_category("All"), Category::All);
        assert_eq!(parse_category(""), Category::All);
        assert_eq!(parse_category("all"), Category::Named("all".into()));
        assert_eq!(parse_category(" Tech "), Category::Named("Tech".into()));
    }

    #[test]
    fn min_members_parses_leading_digits() {
        assert_eq!(parse_min_members("500"), MinMembers::AtLeast(500));
        assert_eq!(parse_min_members("1000+"), MinMembers::AtLeast(1000));
        assert_eq!(parse_min_members(" 2000 "), MinMembers::AtLeast(2000));
        assert_eq!(parse_min_members("all"), MinMembers::All);
    }

    #[test]
    fn min_members_degrades_to_no_constraint() {
        assert_eq!(parse_min_members("lots"), MinMembers::All);
        assert_eq!(parse_min_members("-5"), MinMembers::All);
        assert_eq!(parse_min_members(""), MinMembers::All);
        assert_eq!(parse_min_members("99999999999999999999999"), MinMembers::All);
    }

    #[test]
    fn quick_filters_split_on_separators() {
        let parsed = parse_quick_filters(&["free,verified", "1000+|high-rated", " recent "]).unwrap();
        assert_eq!(
            parsed,
            vec![
                QuickFilter::Free,
                QuickFilter::Verified,
                QuickFilter::ThousandPlus,
                QuickFilter::HighRated,
                QuickFilter::Recent,
            ]
        );
    }

    #[test]
    fn quick_filters_reject_unknown_tokens() {
        let err = parse_quick_filters(&["free", "trending"]).unwrap_err();
        match err {
            DiscoveryError::InvalidRequest { message } => assert!(message.contains("trending")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn price_and_type_facets_parse() {
        assert_eq!("Paid".parse::<PriceFacet>().unwrap(), PriceFacet::Paid);
        assert!("monthly".parse::<PriceFacet>().is_err());
        assert_eq!("all".parse::<TypeFacet>().unwrap(), TypeFacet::All);
        assert_eq!("challenge".parse::<TypeFacet>().unwrap(), TypeFacet::Only(ItemType::Challenge));
    }
}
