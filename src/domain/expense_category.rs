use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// User-managed expense taxonomy entry with a color tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseCategory {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new category.
#[derive(Debug, Clone)]
pub struct NewExpenseCategory {
    pub name: String,
    pub color: String,
    pub updated_at: NaiveDateTime,
}

impl NewExpenseCategory {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: "#808080".to_string(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}
