use serde::Deserialize;
use thiserror::Error;

use crate::forms::{
    FieldError, LineItemPayload, empty_string_as_none, empty_string_as_none_id, parse_items_json,
};

#[derive(Debug, Error)]
pub enum SaleFormError {
    #[error("failed to parse items payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("sale needs at least one item")]
    Empty,
}

/// Form payload for creating a sale. The items arrive as a JSON string
/// produced by the item picker.
#[derive(Debug, Deserialize)]
pub struct AddSaleForm {
    #[serde(default, deserialize_with = "empty_string_as_none_id")]
    pub client_id: Option<i32>,
    /// Free-entry client name used when no catalog client is referenced.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub client_name: Option<String>,
    pub sale_date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub salesperson: Option<String>,
    pub delivery_type: String,
    /// Kept in the form even for pickup; the service zeroes it then.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub shipping_cost: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub notes: Option<String>,
    pub items: String,
}

impl AddSaleForm {
    /// Parse and sanity-check the items payload.
    pub fn parse_items(&self) -> Result<Vec<LineItemPayload>, SaleFormError> {
        let items = parse_items_json(&self.items)?;
        if items.is_empty() {
            return Err(SaleFormError::Empty);
        }
        Ok(items)
    }
}

/// Form payload for the status dropdown on the sale detail page.
#[derive(Debug, Deserialize)]
pub struct UpdateSaleStatusForm {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_items_rejects_an_empty_list() {
        let form = AddSaleForm {
            client_id: Some(1),
            client_name: None,
            sale_date: "2025-05-02".to_string(),
            salesperson: None,
            delivery_type: "retiro_local".to_string(),
            shipping_cost: None,
            notes: None,
            items: "[]".to_string(),
        };

        assert!(matches!(form.parse_items(), Err(SaleFormError::Empty)));
    }
}
