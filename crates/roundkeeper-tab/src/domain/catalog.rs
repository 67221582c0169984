//! Catalog entities: drinks an admin has put on the list.

use serde::Serialize;
use uuid::Uuid;

/// A drink on the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drink {
    /// Drink identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Price per unit, if the admin gave one.
    pub price: Option<f64>,
}

/// Parses an optional price field.
///
/// Blank, unparsable, and non-finite input all mean "no price", never zero.
#[must_use]
pub fn parse_price(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|text| !text.is_empty())
        .and_then(|text| text.parse::<f64>().ok())
        .filter(|price| price.is_finite())
}

/// Looks up a drink by weak reference.
#[must_use]
pub fn resolve_drink(drinks: &[Drink], drink_id: Option<Uuid>) -> Option<&Drink> {
    let drink_id = drink_id?;
    drinks.iter().find(|drink| drink.id == drink_id)
}
