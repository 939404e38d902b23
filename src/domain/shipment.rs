use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Delivery states of a shipment ("envío").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipmentStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "preparando")]
    Preparing,
    #[serde(rename = "en_camino")]
    OnTheWay,
    #[serde(rename = "entregado")]
    Delivered,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl Default for ShipmentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl From<&str> for ShipmentStatus {
    fn from(value: &str) -> Self {
        match value {
            "preparando" => ShipmentStatus::Preparing,
            "en_camino" => ShipmentStatus::OnTheWay,
            "entregado" => ShipmentStatus::Delivered,
            "cancelado" => ShipmentStatus::Cancelled,
            _ => ShipmentStatus::Pending,
        }
    }
}

impl From<ShipmentStatus> for &'static str {
    fn from(value: ShipmentStatus) -> Self {
        match value {
            ShipmentStatus::Pending => "pendiente",
            ShipmentStatus::Preparing => "preparando",
            ShipmentStatus::OnTheWay => "en_camino",
            ShipmentStatus::Delivered => "entregado",
            ShipmentStatus::Cancelled => "cancelado",
        }
    }
}

/// One entry of the append-only state history of a shipment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShipmentEvent {
    pub status: ShipmentStatus,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

/// A delivery tracked from the yard to the customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: i32,
    /// The sale this shipment delivers.
    pub sale_id: i32,
    pub address: Option<String>,
    /// Current status; always equal to the status of the latest event.
    pub status: ShipmentStatus,
    /// State history in insertion order.
    pub events: Vec<ShipmentEvent>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload for appending a state-history event to a shipment.
#[derive(Debug, Clone)]
pub struct NewShipmentEvent {
    pub status: ShipmentStatus,
    pub comment: Option<String>,
}

impl NewShipmentEvent {
    #[must_use]
    pub fn new(status: ShipmentStatus) -> Self {
        Self {
            status,
            comment: None,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Payload required to insert a new shipment.
#[derive(Debug, Clone)]
pub struct NewShipment {
    pub sale_id: i32,
    pub address: Option<String>,
    pub status: ShipmentStatus,
    pub updated_at: NaiveDateTime,
}

impl NewShipment {
    #[must_use]
    pub fn new(sale_id: i32) -> Self {
        Self {
            sale_id,
            address: None,
            status: ShipmentStatus::default(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Query definition used to list shipments.
#[derive(Debug, Clone)]
pub struct ShipmentListQuery {
    pub status: Option<ShipmentStatus>,
    pub sale_id: Option<i32>,
    pub pagination: Option<Pagination>,
}

impl Default for ShipmentListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ShipmentListQuery {
    pub fn new() -> Self {
        Self {
            status: None,
            sale_id: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: ShipmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn sale_id(mut self, sale_id: i32) -> Self {
        self.sale_id = Some(sale_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
