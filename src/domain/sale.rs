use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::client::ClientSnapshot;
use crate::domain::line_item::LineItem;
use crate::pagination::Pagination;

/// How the goods leave the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryType {
    /// Customer picks the goods up at the yard; shipping is never charged.
    #[serde(rename = "retiro_local")]
    LocalPickup,
    #[serde(rename = "envio_domicilio")]
    HomeDelivery,
}

impl Default for DeliveryType {
    fn default() -> Self {
        Self::LocalPickup
    }
}

impl From<&str> for DeliveryType {
    fn from(value: &str) -> Self {
        match value {
            "envio_domicilio" => DeliveryType::HomeDelivery,
            _ => DeliveryType::LocalPickup,
        }
    }
}

impl From<DeliveryType> for &'static str {
    fn from(value: DeliveryType) -> Self {
        match value {
            DeliveryType::LocalPickup => "retiro_local",
            DeliveryType::HomeDelivery => "envio_domicilio",
        }
    }
}

/// Lifecycle states of a sale ("venta").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "preparacion")]
    Preparing,
    #[serde(rename = "entregada")]
    Delivered,
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl Default for SaleStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl From<&str> for SaleStatus {
    fn from(value: &str) -> Self {
        match value {
            "preparacion" => SaleStatus::Preparing,
            "entregada" => SaleStatus::Delivered,
            "cancelada" => SaleStatus::Cancelled,
            _ => SaleStatus::Pending,
        }
    }
}

impl From<SaleStatus> for &'static str {
    fn from(value: SaleStatus) -> Self {
        match value {
            SaleStatus::Pending => "pendiente",
            SaleStatus::Preparing => "preparacion",
            SaleStatus::Delivered => "entregada",
            SaleStatus::Cancelled => "cancelada",
        }
    }
}

/// Domain representation of a finalized sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: i32,
    pub client_id: Option<i32>,
    /// Client fields frozen at creation time.
    pub client: ClientSnapshot,
    pub sale_date: NaiveDate,
    pub salesperson: Option<String>,
    pub delivery_type: DeliveryType,
    /// Shipping charge in pesos; always 0 for local pickup.
    pub shipping_cost: i64,
    /// Sum of the line discounts.
    pub discount_total: i64,
    /// Sum of the gross line amounts, before discounts.
    pub subtotal: i64,
    /// `subtotal - discount_total + shipping_cost`.
    pub total: i64,
    pub status: SaleStatus,
    pub notes: Option<String>,
    pub items: Vec<LineItem>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new sale.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub client_id: Option<i32>,
    pub client: ClientSnapshot,
    pub sale_date: NaiveDate,
    pub salesperson: Option<String>,
    pub delivery_type: DeliveryType,
    pub shipping_cost: i64,
    pub discount_total: i64,
    pub subtotal: i64,
    pub total: i64,
    pub status: SaleStatus,
    pub notes: Option<String>,
    pub items: Vec<LineItem>,
    pub updated_at: NaiveDateTime,
}

impl NewSale {
    #[must_use]
    pub fn new(client: ClientSnapshot, sale_date: NaiveDate) -> Self {
        Self {
            client_id: None,
            client,
            sale_date,
            salesperson: None,
            delivery_type: DeliveryType::default(),
            shipping_cost: 0,
            discount_total: 0,
            subtotal: 0,
            total: 0,
            status: SaleStatus::default(),
            notes: None,
            items: Vec::new(),
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
}

/// Patch data applied when updating a sale.
#[derive(Debug, Clone)]
pub struct UpdateSale {
    pub status: Option<SaleStatus>,
    pub notes: Option<Option<String>>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateSale {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateSale {
    pub fn new() -> Self {
        Self {
            status: None,
            notes: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn status(mut self, status: SaleStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn notes(mut self, notes: Option<impl Into<String>>) -> Self {
        self.notes = Some(notes.map(|value| value.into()));
        self
    }
}

/// Query definition used to list sales.
#[derive(Debug, Clone)]
pub struct SaleListQuery {
    /// Search term matched against the embedded client name.
    pub search: Option<String>,
    pub status: Option<SaleStatus>,
    pub pagination: Option<Pagination>,
}

impl Default for SaleListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl SaleListQuery {
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

    pub fn status(mut self, status: SaleStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
