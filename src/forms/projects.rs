use serde::Deserialize;
use thiserror::Error;

use crate::forms::{
    FieldError, LineItemPayload, empty_string_as_none, empty_string_as_none_id, parse_items_json,
};

#[derive(Debug, Error)]
pub enum ProjectFormError {
    #[error("failed to parse items payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Form payload for creating a standalone project.
#[derive(Debug, Deserialize)]
pub struct AddProjectForm {
    #[serde(default, deserialize_with = "empty_string_as_none_id")]
    pub client_id: Option<i32>,
    /// Free-entry client name used when no catalog client is referenced.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub client_name: Option<String>,
    pub start_date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub notes: Option<String>,
    /// JSON item list; a project may start empty and grow later.
    #[serde(default)]
    pub items: String,
}

impl AddProjectForm {
    pub fn parse_items(&self) -> Result<Vec<LineItemPayload>, ProjectFormError> {
        if self.items.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(parse_items_json(&self.items)?)
    }
}

/// Form payload for the status dropdown on the project detail page.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectStatusForm {
    pub status: String,
}
