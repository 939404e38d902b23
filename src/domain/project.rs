use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::client::ClientSnapshot;
use crate::domain::line_item::LineItem;
use crate::pagination::Pagination;

/// Lifecycle states of a construction project ("obra").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en_curso")]
    InProgress,
    #[serde(rename = "finalizada")]
    Finished,
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl From<&str> for ProjectStatus {
    fn from(value: &str) -> Self {
        match value {
            "en_curso" => ProjectStatus::InProgress,
            "finalizada" => ProjectStatus::Finished,
            "cancelada" => ProjectStatus::Cancelled,
            _ => ProjectStatus::Pending,
        }
    }
}

impl From<ProjectStatus> for &'static str {
    fn from(value: ProjectStatus) -> Self {
        match value {
            ProjectStatus::Pending => "pendiente",
            ProjectStatus::InProgress => "en_curso",
            ProjectStatus::Finished => "finalizada",
            ProjectStatus::Cancelled => "cancelada",
        }
    }
}

/// A construction project, created standalone or from a converted quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i32,
    pub client_id: Option<i32>,
    /// Client fields frozen at creation time.
    pub client: ClientSnapshot,
    /// Source quote when the project came from a conversion.
    pub quote_id: Option<i32>,
    pub start_date: NaiveDate,
    pub status: ProjectStatus,
    pub notes: Option<String>,
    pub total: i64,
    pub items: Vec<LineItem>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub client_id: Option<i32>,
    pub client: ClientSnapshot,
    pub quote_id: Option<i32>,
    pub start_date: NaiveDate,
    pub status: ProjectStatus,
    pub notes: Option<String>,
    pub total: i64,
    pub items: Vec<LineItem>,
    pub updated_at: NaiveDateTime,
}

impl NewProject {
    #[must_use]
    pub fn new(client: ClientSnapshot, start_date: NaiveDate) -> Self {
        Self {
            client_id: None,
            client,
            quote_id: None,
            start_date,
            status: ProjectStatus::default(),
            notes: None,
            total: 0,
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
    pub fn from_quote(mut self, quote_id: i32) -> Self {
        self.quote_id = Some(quote_id);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Attach the priced items and set the total from their subtotals.
    #[must_use]
    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.total = items.iter().map(|item| item.subtotal).sum();
        self.items = items;
        self
    }
}

/// Patch data applied when updating a project.
#[derive(Debug, Clone)]
pub struct UpdateProject {
    pub status: Option<ProjectStatus>,
    pub notes: Option<Option<String>>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProject {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProject {
    pub fn new() -> Self {
        Self {
            status: None,
            notes: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn notes(mut self, notes: Option<impl Into<String>>) -> Self {
        self.notes = Some(notes.map(|value| value.into()));
        self
    }
}

/// Query definition used to list projects.
#[derive(Debug, Clone)]
pub struct ProjectListQuery {
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub pagination: Option<Pagination>,
}

impl Default for ProjectListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectListQuery {
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

    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
