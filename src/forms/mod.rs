use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub mod clients;
pub mod expenses;
pub mod products;
pub mod projects;
pub mod quotes;
pub mod sales;
pub mod shipments;

/// Deserialize an optional text field treating the empty string as `None`.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

/// Deserialize an optional id field. Selects and number inputs post the
/// empty string when nothing was chosen.
pub fn empty_string_as_none_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse::<i32>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Errors produced by the shared numeric and date field parsers.
///
/// Every monetary or quantity field arrives as a string and goes through one
/// of these helpers; a field that does not parse is an error, never a silent
/// zero.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("invalid amount `{0}`")]
    Amount(String),
    #[error("invalid quantity `{0}`")]
    Quantity(String),
    #[error("invalid percentage `{0}`")]
    Percent(String),
    #[error("invalid dimension `{0}`")]
    Dimension(String),
    #[error("invalid date `{0}`")]
    Date(String),
}

fn parse_decimal(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Tolerate the decimal comma common in local input.
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

/// Parse a money amount in whole pesos.
pub fn parse_money(value: &str) -> Result<i64, FieldError> {
    match parse_decimal(value) {
        Some(amount) if amount >= 0.0 => Ok(amount.round() as i64),
        _ => Err(FieldError::Amount(value.to_string())),
    }
}

/// Parse a quantity; must be strictly positive.
pub fn parse_quantity(value: &str) -> Result<f64, FieldError> {
    match parse_decimal(value) {
        Some(quantity) if quantity > 0.0 => Ok(quantity),
        _ => Err(FieldError::Quantity(value.to_string())),
    }
}

/// Parse a stock count; zero is a valid value for an out-of-stock article.
pub fn parse_stock(value: &str) -> Result<f64, FieldError> {
    match parse_decimal(value) {
        Some(stock) if stock >= 0.0 => Ok(stock),
        _ => Err(FieldError::Quantity(value.to_string())),
    }
}

/// Parse a percentage. Discounts use 0..=100; price updates also accept
/// negative values down to -100 for a decrease.
pub fn parse_percent(value: &str) -> Result<f64, FieldError> {
    match parse_decimal(value) {
        Some(percent) if percent > -100.0 => Ok(percent),
        _ => Err(FieldError::Percent(value.to_string())),
    }
}

/// Parse a lumber dimension. Zero is allowed; the pricing guard turns it
/// into a zero price.
pub fn parse_dimension(value: &str) -> Result<f64, FieldError> {
    match parse_decimal(value) {
        Some(dimension) if dimension >= 0.0 => Ok(dimension),
        _ => Err(FieldError::Dimension(value.to_string())),
    }
}

/// Parse an ISO `YYYY-MM-DD` date as posted by the date inputs.
pub fn parse_date(value: &str) -> Result<NaiveDate, FieldError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| FieldError::Date(value.to_string()))
}

/// Lumber cut fields sent by the item picker for a lumber line.
#[derive(Debug, Clone, Deserialize)]
pub struct CutPayload {
    pub height: f64,
    pub width: f64,
    pub length: f64,
    /// Price per foot override for free-entry lines; catalog lines take it
    /// from the product record.
    pub price_per_foot: Option<i64>,
    #[serde(default)]
    pub planed: bool,
}

/// One line of the item picker payload, shared by the quote, project and
/// sale forms. The picker posts the whole list as a JSON string field.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemPayload {
    pub product_id: Option<i32>,
    /// Required for free-entry lines; catalog lines inherit the product name.
    pub name: Option<String>,
    pub quantity: f64,
    #[serde(default)]
    pub discount_percent: f64,
    /// Manual unit price for free-entry lines.
    pub unit_price: Option<i64>,
    pub cut: Option<CutPayload>,
}

/// Parse the JSON item list posted by the picker.
pub fn parse_items_json(payload: &str) -> Result<Vec<LineItemPayload>, serde_json::Error> {
    serde_json::from_str(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_money_accepts_decimal_comma() {
        assert_eq!(parse_money("12345"), Ok(12345));
        assert_eq!(parse_money("12345.50"), Ok(12346));
        assert_eq!(parse_money("12345,50"), Ok(12346));
        assert_eq!(parse_money(" 800 "), Ok(800));
    }

    #[test]
    fn parse_money_rejects_garbage_instead_of_zeroing() {
        assert!(parse_money("").is_err());
        assert!(parse_money("abc").is_err());
        assert!(parse_money("-5").is_err());
        assert!(parse_money("NaN").is_err());
        assert!(parse_money("1e999").is_err());
    }

    #[test]
    fn parse_quantity_requires_positive() {
        assert_eq!(parse_quantity("2.5"), Ok(2.5));
        assert!(parse_quantity("0").is_err());
        assert!(parse_quantity("-1").is_err());
        assert!(parse_quantity("x").is_err());
    }

    #[test]
    fn parse_stock_allows_zero() {
        assert_eq!(parse_stock("0"), Ok(0.0));
        assert_eq!(parse_stock("12,5"), Ok(12.5));
        assert!(parse_stock("-1").is_err());
    }

    #[test]
    fn parse_dimension_allows_zero() {
        assert_eq!(parse_dimension("0"), Ok(0.0));
        assert_eq!(parse_dimension("2,5"), Ok(2.5));
        assert!(parse_dimension("-1").is_err());
    }

    #[test]
    fn parse_date_requires_iso_format() {
        assert_eq!(
            parse_date("2025-03-01"),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
        assert!(parse_date("01/03/2025").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn parse_items_json_reads_picker_payload() {
        let payload = r#"[
            {"product_id": 7, "quantity": 2, "cut": {"height": 2, "width": 3, "length": 2.5, "planed": true}},
            {"name": "Flete especial", "quantity": 1, "unit_price": 5000, "discount_percent": 10}
        ]"#;

        let items = parse_items_json(payload).expect("payload should parse");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_id, Some(7));
        assert!(items[0].cut.as_ref().is_some_and(|cut| cut.planed));
        assert_eq!(items[1].name.as_deref(), Some("Flete especial"));
        assert_eq!(items[1].unit_price, Some(5000));
    }
}
