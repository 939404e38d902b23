use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use csv::Trim;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, ProductCategory, UpdateProduct};
use crate::forms::{
    FieldError, empty_string_as_none, parse_dimension, parse_money, parse_percent, parse_stock,
};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: u64 = 128;

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("product name cannot be empty")]
    EmptyName,
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("category `{0}` requires its price field")]
    MissingPrice(&'static str),
    #[error("row {row}: {source}")]
    UploadRow {
        row: usize,
        #[source]
        source: Box<ProductFormError>,
    },
    #[error("upload contains no products")]
    EmptyUpload,
    #[error("error reading csv file")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Form payload for the "add product" and "edit product" dialogs. All
/// numeric fields arrive as strings and go through the shared parsers.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    pub category: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub stock: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub price_per_foot: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub price_per_m2: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub price_per_m: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sale_price: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub height: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub width: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub length: Option<String>,
}

/// The numeric fields of a product form after parsing.
struct ParsedProduct {
    name: String,
    category: ProductCategory,
    unit: Option<String>,
    stock: f64,
    price_per_foot: Option<i64>,
    price_per_m2: Option<i64>,
    price_per_m: Option<i64>,
    sale_price: Option<i64>,
    height: Option<f64>,
    width: Option<f64>,
    length: Option<f64>,
}

impl SaveProductForm {
    fn parse(self) -> Result<ParsedProduct, ProductFormError> {
        self.validate()?;

        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let category = ProductCategory::from(self.category.as_str());

        // an empty stock field means an untracked article
        let stock = match self.stock.as_deref() {
            Some(value) => parse_stock(value)?,
            None => 0.0,
        };

        let price_per_foot = self.price_per_foot.as_deref().map(parse_money).transpose()?;
        let price_per_m2 = self.price_per_m2.as_deref().map(parse_money).transpose()?;
        let price_per_m = self.price_per_m.as_deref().map(parse_money).transpose()?;
        let sale_price = self.sale_price.as_deref().map(parse_money).transpose()?;
        let height = self.height.as_deref().map(parse_dimension).transpose()?;
        let width = self.width.as_deref().map(parse_dimension).transpose()?;
        let length = self.length.as_deref().map(parse_dimension).transpose()?;

        match category {
            ProductCategory::Lumber if price_per_foot.is_none() => {
                return Err(ProductFormError::MissingPrice("madera"));
            }
            ProductCategory::Sheet if price_per_m2.is_none() => {
                return Err(ProductFormError::MissingPrice("placa"));
            }
            ProductCategory::Strip if price_per_m.is_none() => {
                return Err(ProductFormError::MissingPrice("varilla"));
            }
            ProductCategory::Hardware | ProductCategory::Tools | ProductCategory::Chemicals
                if sale_price.is_none() =>
            {
                return Err(ProductFormError::MissingPrice("venta"));
            }
            _ => {}
        }

        Ok(ParsedProduct {
            name,
            category,
            unit: self.unit,
            stock,
            price_per_foot,
            price_per_m2,
            price_per_m,
            sale_price,
            height,
            width,
            length,
        })
    }

    pub fn into_new_product(self) -> Result<NewProduct, ProductFormError> {
        let parsed = self.parse()?;

        let mut new_product = NewProduct::new(parsed.name, parsed.category).with_stock(parsed.stock);

        if let Some(unit) = parsed.unit {
            new_product = new_product.with_unit(unit);
        }
        if let Some(price) = parsed.price_per_foot {
            new_product = new_product.with_price_per_foot(price);
        }
        if let Some(price) = parsed.price_per_m2 {
            new_product = new_product.with_price_per_m2(price);
        }
        if let Some(price) = parsed.price_per_m {
            new_product = new_product.with_price_per_m(price);
        }
        if let Some(price) = parsed.sale_price {
            new_product = new_product.with_sale_price(price);
        }
        if let (Some(height), Some(width), Some(length)) =
            (parsed.height, parsed.width, parsed.length)
        {
            new_product = new_product.with_dimensions(height, width, length);
        }

        Ok(new_product)
    }

    pub fn into_update_product(self) -> Result<UpdateProduct, ProductFormError> {
        let parsed = self.parse()?;

        Ok(UpdateProduct {
            name: parsed.name,
            category: parsed.category,
            unit: parsed.unit,
            stock: parsed.stock,
            price_per_foot: parsed.price_per_foot,
            price_per_m2: parsed.price_per_m2,
            price_per_m: parsed.price_per_m,
            sale_price: parsed.sale_price,
            height: parsed.height,
            width: parsed.width,
            length: parsed.length,
            updated_at: chrono::Local::now().naive_utc(),
        })
    }
}

/// Form payload for the global percentage price update.
#[derive(Debug, Deserialize)]
pub struct UpdatePricesForm {
    /// Restrict the update to one category; empty means the whole catalog.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<String>,
    pub percent: String,
}

impl UpdatePricesForm {
    pub fn parse(self) -> Result<(Option<ProductCategory>, f64), ProductFormError> {
        let category = self
            .category
            .as_deref()
            .map(ProductCategory::from);
        let percent = parse_percent(&self.percent)?;
        Ok((category, percent))
    }
}

/// Multipart form for uploading a CSV file with new products.
#[derive(MultipartForm)]
pub struct UploadProductsForm {
    #[multipart(limit = "10MB")]
    /// Uploaded CSV file containing catalog data.
    pub csv: TempFile,
}

#[derive(Debug, Deserialize)]
struct ProductCsvRow {
    name: String,
    category: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    unit: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    stock: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    price_per_foot: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    price_per_m2: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    price_per_m: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    sale_price: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    height: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    width: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    length: Option<String>,
}

impl From<ProductCsvRow> for SaveProductForm {
    fn from(row: ProductCsvRow) -> Self {
        Self {
            name: row.name,
            category: row.category,
            unit: row.unit,
            stock: row.stock,
            price_per_foot: row.price_per_foot,
            price_per_m2: row.price_per_m2,
            price_per_m: row.price_per_m,
            sale_price: row.sale_price,
            height: row.height,
            width: row.width,
            length: row.length,
        }
    }
}

impl UploadProductsForm {
    /// Parse the uploaded CSV file into a list of [`NewProduct`] records.
    pub fn parse(&mut self) -> Result<Vec<NewProduct>, ProductFormError> {
        self.csv.file.rewind()?;
        parse_products(self.csv.file.by_ref())
    }
}

fn parse_products<R: Read>(reader: R) -> Result<Vec<NewProduct>, ProductFormError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(reader);

    let mut products = Vec::new();

    for (index, row) in csv_reader.deserialize::<ProductCsvRow>().enumerate() {
        let row_number = index + 2; // account for the header row
        let record = row?;

        let product = SaveProductForm::from(record)
            .into_new_product()
            .map_err(|err| ProductFormError::UploadRow {
                row: row_number,
                source: Box::new(err),
            })?;

        products.push(product);
    }

    if products.is_empty() {
        return Err(ProductFormError::EmptyUpload);
    }

    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn lumber_form() -> SaveProductForm {
        SaveProductForm {
            name: "Tabla de pino".to_string(),
            category: "madera".to_string(),
            unit: Some("un".to_string()),
            stock: Some("12".to_string()),
            price_per_foot: Some("850".to_string()),
            price_per_m2: None,
            price_per_m: None,
            sale_price: None,
            height: Some("1".to_string()),
            width: Some("6".to_string()),
            length: Some("3.05".to_string()),
        }
    }

    #[test]
    fn lumber_form_parses_dimensions_and_price() {
        let product = lumber_form().into_new_product().expect("valid form");
        assert_eq!(product.category, ProductCategory::Lumber);
        assert_eq!(product.price_per_foot, Some(850));
        assert_eq!(product.height, Some(1.0));
        assert_eq!(product.length, Some(3.05));
        assert_eq!(product.stock, 12.0);
    }

    #[test]
    fn lumber_without_price_per_foot_is_rejected() {
        let mut form = lumber_form();
        form.price_per_foot = None;
        assert!(matches!(
            form.into_new_product(),
            Err(ProductFormError::MissingPrice("madera"))
        ));
    }

    #[test]
    fn hardware_requires_sale_price() {
        let mut form = lumber_form();
        form.category = "ferreteria".to_string();
        form.price_per_foot = None;
        assert!(matches!(
            form.into_new_product(),
            Err(ProductFormError::MissingPrice("venta"))
        ));

        form = lumber_form();
        form.category = "ferreteria".to_string();
        form.sale_price = Some("1200".to_string());
        let product = form.into_new_product().expect("valid form");
        assert_eq!(product.sale_price, Some(1200));
    }

    #[test]
    fn bad_numeric_field_is_an_error_not_zero() {
        let mut form = lumber_form();
        form.price_per_foot = Some("ochocientos".to_string());
        assert!(matches!(
            form.into_new_product(),
            Err(ProductFormError::Field(FieldError::Amount(_)))
        ));
    }

    #[test]
    fn parse_products_reads_rows_and_reports_row_numbers() {
        let csv = "name,category,sale_price\nClavos 2\",ferreteria,500\nLija 120,ferreteria,300\n";
        let products = parse_products(Cursor::new(csv)).expect("should parse");
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].sale_price, Some(500));

        let bad = "name,category,sale_price\nClavos,ferreteria,\n";
        match parse_products(Cursor::new(bad)) {
            Err(ProductFormError::UploadRow { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected row error, got {other:?}"),
        }
    }

    #[test]
    fn empty_upload_is_rejected() {
        let csv = "name,category,sale_price\n";
        assert!(matches!(
            parse_products(Cursor::new(csv)),
            Err(ProductFormError::EmptyUpload)
        ));
    }
}
