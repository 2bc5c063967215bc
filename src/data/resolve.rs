use super::model::UNKNOWN_BUYER;
use super::normalize::normalize_name;

/// Counterparty pair derived from a row's declarant columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyerSeller {
    pub buyer: String,
    pub seller: Option<String>,
}

/// Pick the buyer from the competitor columns, preferring the one that is not
/// the declared shipper.
///
/// Precedence, first match wins:
/// 1. international competitor, if it normalizes differently from the shipper
/// 2. domestic competitor, if it normalizes differently from the shipper
/// 3. international competitor (same entity as the shipper)
/// 4. domestic competitor
/// 5. [`UNKNOWN_BUYER`]
///
/// Only the comparison is normalized; the chosen value is returned as given.
/// The seller is always the shipper verbatim.
pub fn resolve_buyer_seller(
    shipper_declared: Option<&str>,
    international_competitor: Option<&str>,
    domestic_competitor: Option<&str>,
) -> BuyerSeller {
    let shipper_key = normalize_name(shipper_declared.unwrap_or("").trim());
    let intl = present(international_competitor);
    let dom = present(domestic_competitor);
    let differs = |name: &str| normalize_name(name.trim()) != shipper_key;

    let buyer = intl
        .filter(|n| differs(*n))
        .or_else(|| dom.filter(|n| differs(*n)))
        .or(intl)
        .or(dom)
        .unwrap_or(UNKNOWN_BUYER);

    BuyerSeller {
        buyer: buyer.to_string(),
        seller: shipper_declared.map(str::to_string),
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
