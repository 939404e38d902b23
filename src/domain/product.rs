use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;
use crate::pricing;

/// Catalog categories. The category decides which price field applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCategory {
    /// Dimensioned lumber, priced per board foot.
    #[serde(rename = "madera")]
    Lumber,
    /// Sheet goods, priced per square meter.
    #[serde(rename = "placa")]
    Sheet,
    /// Strips and mouldings, priced per linear meter.
    #[serde(rename = "varilla")]
    Strip,
    #[serde(rename = "ferreteria")]
    Hardware,
    #[serde(rename = "herramientas")]
    Tools,
    #[serde(rename = "quimicos")]
    Chemicals,
}

impl From<&str> for ProductCategory {
    fn from(value: &str) -> Self {
        match value {
            "madera" => ProductCategory::Lumber,
            "placa" => ProductCategory::Sheet,
            "varilla" => ProductCategory::Strip,
            "herramientas" => ProductCategory::Tools,
            "quimicos" => ProductCategory::Chemicals,
            _ => ProductCategory::Hardware,
        }
    }
}

impl From<ProductCategory> for &'static str {
    fn from(value: ProductCategory) -> Self {
        match value {
            ProductCategory::Lumber => "madera",
            ProductCategory::Sheet => "placa",
            ProductCategory::Strip => "varilla",
            ProductCategory::Hardware => "ferreteria",
            ProductCategory::Tools => "herramientas",
            ProductCategory::Chemicals => "quimicos",
        }
    }
}

/// A catalog entry. The price fields are mutually exclusive by category;
/// the remaining ones stay `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub category: ProductCategory,
    /// Unit label shown next to quantities ("un", "m", "kg").
    pub unit: Option<String>,
    pub stock: f64,
    /// Lumber: price per board foot ("precio por pie").
    pub price_per_foot: Option<i64>,
    /// Sheet goods: price per square meter.
    pub price_per_m2: Option<i64>,
    /// Strips: price per linear meter.
    pub price_per_m: Option<i64>,
    /// Hardware, tools and chemicals: final sale price.
    pub sale_price: Option<i64>,
    /// Lumber dimensions: height and width in inches.
    pub height: Option<f64>,
    pub width: Option<f64>,
    /// Lumber length in meters.
    pub length: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Catalog list price resolved by category, already rounded to hundreds.
    ///
    /// Returns `None` when the fields the category needs are missing.
    pub fn list_price(&self) -> Option<i64> {
        match self.category {
            ProductCategory::Lumber => {
                match (self.height, self.width, self.length, self.price_per_foot) {
                    (Some(height), Some(width), Some(length), Some(ppf)) => {
                        Some(pricing::cut_price(height, width, length, ppf as f64))
                    }
                    _ => None,
                }
            }
            ProductCategory::Sheet => match (self.width, self.length, self.price_per_m2) {
                (Some(width), Some(length), Some(per_m2)) => {
                    Some(pricing::sheet_price(width, length, per_m2 as f64))
                }
                _ => None,
            },
            ProductCategory::Strip => match (self.length, self.price_per_m) {
                (Some(length), Some(per_m)) => Some(pricing::strip_price(length, per_m as f64)),
                _ => None,
            },
            ProductCategory::Hardware | ProductCategory::Tools | ProductCategory::Chemicals => {
                self.sale_price
            }
        }
    }
}

/// Payload required to insert a new catalog entry.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: ProductCategory,
    pub unit: Option<String>,
    pub stock: f64,
    pub price_per_foot: Option<i64>,
    pub price_per_m2: Option<i64>,
    pub price_per_m: Option<i64>,
    pub sale_price: Option<i64>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    #[must_use]
    pub fn new(name: impl Into<String>, category: ProductCategory) -> Self {
        Self {
            name: name.into(),
            category,
            unit: None,
            stock: 0.0,
            price_per_foot: None,
            price_per_m2: None,
            price_per_m: None,
            sale_price: None,
            height: None,
            width: None,
            length: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_stock(mut self, stock: f64) -> Self {
        self.stock = stock;
        self
    }

    #[must_use]
    pub fn with_price_per_foot(mut self, price: i64) -> Self {
        self.price_per_foot = Some(price);
        self
    }

    #[must_use]
    pub fn with_price_per_m2(mut self, price: i64) -> Self {
        self.price_per_m2 = Some(price);
        self
    }

    #[must_use]
    pub fn with_price_per_m(mut self, price: i64) -> Self {
        self.price_per_m = Some(price);
        self
    }

    #[must_use]
    pub fn with_sale_price(mut self, price: i64) -> Self {
        self.sale_price = Some(price);
        self
    }

    /// Lumber dimensions: height and width in inches, length in meters.
    #[must_use]
    pub fn with_dimensions(mut self, height: f64, width: f64, length: f64) -> Self {
        self.height = Some(height);
        self.width = Some(width);
        self.length = Some(length);
        self
    }
}

/// Full-overwrite patch applied when editing a catalog entry.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub name: String,
    pub category: ProductCategory,
    pub unit: Option<String>,
    pub stock: f64,
    pub price_per_foot: Option<i64>,
    pub price_per_m2: Option<i64>,
    pub price_per_m: Option<i64>,
    pub sale_price: Option<i64>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to filter and paginate the catalog.
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    /// Search term matched against the normalized product name.
    pub search: Option<String>,
    pub category: Option<ProductCategory>,
    pub pagination: Option<Pagination>,
}

impl Default for ProductListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductListQuery {
    pub fn new() -> Self {
        Self {
            search: None,
            category: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category: ProductCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lumber() -> Product {
        Product {
            id: 1,
            name: "Tirante saligna".to_string(),
            category: ProductCategory::Lumber,
            unit: Some("un".to_string()),
            stock: 10.0,
            price_per_foot: Some(850),
            price_per_m2: None,
            price_per_m: None,
            sale_price: None,
            height: Some(2.0),
            width: Some(3.0),
            length: Some(2.5),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn list_price_resolves_by_category() {
        let product = lumber();
        // 0.2734 x 2 x 3 x 2.5 x 850 = 3485.85
        assert_eq!(product.list_price(), Some(3500));

        let mut hardware = lumber();
        hardware.category = ProductCategory::Hardware;
        hardware.sale_price = Some(1200);
        assert_eq!(hardware.list_price(), Some(1200));
    }

    #[test]
    fn list_price_is_none_when_fields_missing() {
        let mut product = lumber();
        product.price_per_foot = None;
        assert_eq!(product.list_price(), None);

        let mut sheet = lumber();
        sheet.category = ProductCategory::Sheet;
        assert_eq!(sheet.list_price(), None);
    }

    #[test]
    fn category_string_roundtrip() {
        for category in [
            ProductCategory::Lumber,
            ProductCategory::Sheet,
            ProductCategory::Strip,
            ProductCategory::Hardware,
            ProductCategory::Tools,
            ProductCategory::Chemicals,
        ] {
            let stored: &'static str = category.into();
            assert_eq!(ProductCategory::from(stored), category);
        }
    }
}
