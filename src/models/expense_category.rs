use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::expense_category::{
    ExpenseCategory as DomainExpenseCategory, NewExpenseCategory as DomainNewExpenseCategory,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::expense_categories)]
pub struct ExpenseCategory {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::expense_categories)]
pub struct NewExpenseCategory<'a> {
    pub name: &'a str,
    pub color: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<ExpenseCategory> for DomainExpenseCategory {
    fn from(value: ExpenseCategory) -> Self {
        Self {
            id: value.id,
            name: value.name,
            color: value.color,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewExpenseCategory> for NewExpenseCategory<'a> {
    fn from(value: &'a DomainNewExpenseCategory) -> Self {
        Self {
            name: value.name.as_str(),
            color: value.color.as_str(),
            updated_at: value.updated_at,
        }
    }
}
