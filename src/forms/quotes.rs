use serde::Deserialize;
use thiserror::Error;

use crate::forms::{FieldError, LineItemPayload, empty_string_as_none, empty_string_as_none_id};

#[derive(Debug, Error)]
pub enum QuoteFormError {
    #[error("failed to parse blocks payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("quote needs at least one item")]
    Empty,
}

/// A named section posted by the quote builder.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteBlockPayload {
    pub name: String,
    pub items: Vec<LineItemPayload>,
}

/// Form payload for creating a quote. The blocks arrive as a JSON string
/// produced by the item picker.
#[derive(Debug, Deserialize)]
pub struct AddQuoteForm {
    #[serde(default, deserialize_with = "empty_string_as_none_id")]
    pub client_id: Option<i32>,
    /// Free-entry client name used when no catalog client is referenced.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub client_name: Option<String>,
    pub quote_date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub salesperson: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub notes: Option<String>,
    pub blocks: String,
}

impl AddQuoteForm {
    /// Parse and sanity-check the blocks payload.
    pub fn parse_blocks(&self) -> Result<Vec<QuoteBlockPayload>, QuoteFormError> {
        let blocks: Vec<QuoteBlockPayload> = serde_json::from_str(&self.blocks)?;

        if blocks.iter().all(|block| block.items.is_empty()) {
            return Err(QuoteFormError::Empty);
        }

        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_blocks_rejects_an_all_empty_payload() {
        let form = AddQuoteForm {
            client_id: None,
            client_name: Some("Obra García".to_string()),
            quote_date: "2025-04-10".to_string(),
            salesperson: None,
            notes: None,
            blocks: r#"[{"name": "Techo", "items": []}]"#.to_string(),
        };

        assert!(matches!(form.parse_blocks(), Err(QuoteFormError::Empty)));
    }

    #[test]
    fn parse_blocks_reads_sections() {
        let form = AddQuoteForm {
            client_id: Some(3),
            client_name: None,
            quote_date: "2025-04-10".to_string(),
            salesperson: Some("Raúl".to_string()),
            notes: None,
            blocks: r#"[
                {"name": "Techo", "items": [{"product_id": 1, "quantity": 4}]},
                {"name": "Deck", "items": [{"name": "Listón", "quantity": 10, "unit_price": 700}]}
            ]"#
            .to_string(),
        };

        let blocks = form.parse_blocks().expect("payload should parse");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name, "Techo");
        assert_eq!(blocks[1].items[0].unit_price, Some(700));
    }
}
