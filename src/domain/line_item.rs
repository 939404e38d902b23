use serde::{Deserialize, Serialize};

use crate::domain::product::ProductCategory;

/// Lumber cut details snapshotted into a line item so that historical
/// pricing survives later catalog changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CutDetail {
    /// Height in inches.
    pub height: f64,
    /// Width in inches.
    pub width: f64,
    /// Length in meters.
    pub length: f64,
    /// Price per board foot at the time of sale.
    pub price_per_foot: i64,
    /// Whether the planing surcharge was applied.
    pub planed: bool,
}

/// A line of a quote, project or sale.
///
/// All product fields are snapshots frozen at creation time; edits to the
/// master catalog record never touch existing documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Reference to the catalog entry, if the line came from the catalog.
    pub product_id: Option<i32>,
    pub name: String,
    pub category: ProductCategory,
    pub unit: Option<String>,
    pub quantity: f64,
    pub discount_percent: f64,
    /// Unit price in pesos, already rounded to hundreds.
    pub unit_price: i64,
    /// Line amount after discount.
    pub subtotal: i64,
    /// Present only on lumber lines.
    pub cut: Option<CutDetail>,
}
