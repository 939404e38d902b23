use serde::Deserialize;

use crate::forms::empty_string_as_none;

/// Form payload for creating a shipment from a sale.
#[derive(Debug, Deserialize)]
pub struct AddShipmentForm {
    pub sale_id: i32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub address: Option<String>,
}

/// Form payload for advancing a shipment to its next state.
#[derive(Debug, Deserialize)]
pub struct AdvanceShipmentForm {
    pub status: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub comment: Option<String>,
}
