use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::client::ClientSnapshot;
use crate::domain::line_item::LineItem;
use crate::pagination::Pagination;

/// Lifecycle states of a quote ("presupuesto").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteStatus {
    /// Quote has been handed to the customer and awaits a decision.
    #[serde(rename = "pendiente")]
    Pending,
    /// Quote was converted into a project and must not be converted again.
    #[serde(rename = "convertido")]
    Converted,
    /// Customer declined the quote.
    #[serde(rename = "rechazado")]
    Rejected,
}

impl Default for QuoteStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl From<&str> for QuoteStatus {
    fn from(value: &str) -> Self {
        match value {
            "convertido" => QuoteStatus::Converted,
            "rechazado" => QuoteStatus::Rejected,
            _ => QuoteStatus::Pending,
        }
    }
}

impl From<QuoteStatus> for &'static str {
    fn from(value: QuoteStatus) -> Self {
        match value {
            QuoteStatus::Pending => "pendiente",
            QuoteStatus::Converted => "convertido",
            QuoteStatus::Rejected => "rechazado",
        }
    }
}

/// A named section of a quote with its own line items and subtotal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteBlock {
    pub id: i32,
    pub name: String,
    /// Display order within the quote.
    pub position: i32,
    pub subtotal: i64,
    pub items: Vec<LineItem>,
}

/// Domain representation of a quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: i32,
    /// Reference to the client record, kept for navigation only.
    pub client_id: Option<i32>,
    /// Client fields frozen at creation time.
    pub client: ClientSnapshot,
    pub salesperson: Option<String>,
    pub quote_date: NaiveDate,
    pub status: QuoteStatus,
    pub notes: Option<String>,
    pub total: i64,
    pub blocks: Vec<QuoteBlock>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Section payload carried inside [`NewQuote`].
#[derive(Debug, Clone)]
pub struct NewQuoteBlock {
    pub name: String,
    pub position: i32,
    pub subtotal: i64,
    pub items: Vec<LineItem>,
}

/// Payload required to insert a new quote.
#[derive(Debug, Clone)]
pub struct NewQuote {
    pub client_id: Option<i32>,
    pub client: ClientSnapshot,
    pub salesperson: Option<String>,
    pub quote_date: NaiveDate,
    pub status: QuoteStatus,
    pub notes: Option<String>,
    pub total: i64,
    pub blocks: Vec<NewQuoteBlock>,
    pub updated_at: NaiveDateTime,
}

impl NewQuote {
    #[must_use]
    pub fn new(client: ClientSnapshot, quote_date: NaiveDate) -> Self {
        Self {
            client_id: None,
            client,
            salesperson: None,
            quote_date,
            status: QuoteStatus::default(),
            notes: None,
            total: 0,
            blocks: Vec::new(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn with_client_id(mut self, client_id: i32) -> Self {
        self.client_id = Some(client_id);
        self
    }

    #[must_use]
    pub fn with_salesperson(mut self, salesperson: impl Into<String>) -> Self {
        self.salesperson = Some(salesperson.into());
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Attach the priced blocks and set the quote total from their subtotals.
    #[must_use]
    pub fn with_blocks(mut self, blocks: Vec<NewQuoteBlock>) -> Self {
        self.total = blocks.iter().map(|block| block.subtotal).sum();
        self.blocks = blocks;
        self
    }
}

/// Patch data applied when updating a quote.
#[derive(Debug, Clone)]
pub struct UpdateQuote {
    pub status: Option<QuoteStatus>,
    pub notes: Option<Option<String>>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateQuote {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateQuote {
    pub fn new() -> Self {
        Self {
            status: None,
            notes: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn status(mut self, status: QuoteStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn notes(mut self, notes: Option<impl Into<String>>) -> Self {
        self.notes = Some(notes.map(|value| value.into()));
        self
    }
}

/// Query definition used to list quotes.
#[derive(Debug, Clone)]
pub struct QuoteListQuery {
    /// Search term matched against the embedded client name.
    pub search: Option<String>,
    pub status: Option<QuoteStatus>,
    pub pagination: Option<Pagination>,
}

impl Default for QuoteListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteListQuery {
    pub fn new() -> Self {
        Self {
            search: None,
            status: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: QuoteStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
