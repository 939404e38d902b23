use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// A customer of the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: i32,
    pub name: String,
    /// CUIT or other tax identifier.
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub locality: Option<String>,
    pub neighborhood: Option<String>,
    /// Marks customers carried over from the paper ledger.
    pub is_legacy: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Denormalized client fields embedded into quotes, projects and sales at
/// creation time. Immutable once written: later edits to the client record
/// never touch existing documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientSnapshot {
    pub name: String,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<&Client> for ClientSnapshot {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            tax_id: client.tax_id.clone(),
            phone: client.phone.clone(),
            address: client.address.clone(),
        }
    }
}

/// Payload required to insert a new client.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub locality: Option<String>,
    pub neighborhood: Option<String>,
    pub is_legacy: bool,
    pub updated_at: NaiveDateTime,
}

impl NewClient {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tax_id: None,
            phone: None,
            email: None,
            address: None,
            locality: None,
            neighborhood: None,
            is_legacy: false,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn with_tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = Some(tax_id.into());
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into().to_lowercase());
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn with_locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = Some(locality.into());
        self
    }

    #[must_use]
    pub fn with_neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = Some(neighborhood.into());
        self
    }

    #[must_use]
    pub fn legacy(mut self) -> Self {
        self.is_legacy = true;
        self
    }
}

/// Full-overwrite patch applied when editing a client.
#[derive(Debug, Clone)]
pub struct UpdateClient {
    pub name: String,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub locality: Option<String>,
    pub neighborhood: Option<String>,
    pub is_legacy: bool,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to filter and paginate clients.
#[derive(Debug, Clone)]
pub struct ClientListQuery {
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl Default for ClientListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientListQuery {
    pub fn new() -> Self {
        Self {
            search: None,
            pagination: None,
        }
    }

    /// Filter by a search term matched against the normalized client name.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
