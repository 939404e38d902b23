use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::expense::{
    Expense as DomainExpense, NewExpense as DomainNewExpense, NewPayment as DomainNewPayment,
    Payment as DomainPayment,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::expenses)]
pub struct Expense {
    pub id: i32,
    pub kind: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub supplier: Option<String>,
    pub amount: i64,
    pub paid_amount: i64,
    pub expense_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::expense_payments)]
#[diesel(belongs_to(Expense, foreign_key = expense_id))]
pub struct ExpensePayment {
    pub id: i32,
    pub expense_id: i32,
    pub amount: i64,
    pub paid_at: NaiveDate,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::expenses)]
pub struct NewExpense<'a> {
    pub kind: &'a str,
    pub description: &'a str,
    pub category_id: Option<i32>,
    pub supplier: Option<&'a str>,
    pub amount: i64,
    pub paid_amount: i64,
    pub expense_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::expense_payments)]
pub struct NewExpensePayment<'a> {
    pub expense_id: i32,
    pub amount: i64,
    pub paid_at: NaiveDate,
    pub note: Option<&'a str>,
}

/// Changeset written when a payment is registered; always together with the
/// payment insert, inside one transaction.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::expenses)]
pub struct SettleExpense<'a> {
    pub paid_amount: i64,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

impl Expense {
    pub fn into_domain(self, payments: Vec<ExpensePayment>) -> DomainExpense {
        DomainExpense {
            id: self.id,
            kind: self.kind.as_str().into(),
            description: self.description,
            category_id: self.category_id,
            supplier: self.supplier,
            amount: self.amount,
            paid_amount: self.paid_amount,
            expense_date: self.expense_date,
            due_date: self.due_date,
            status: self.status.as_str().into(),
            payments: payments
                .into_iter()
                .map(ExpensePayment::into_domain)
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ExpensePayment {
    pub fn into_domain(self) -> DomainPayment {
        DomainPayment {
            amount: self.amount,
            paid_at: self.paid_at,
            note: self.note,
        }
    }
}

impl<'a> From<&'a DomainNewExpense> for NewExpense<'a> {
    fn from(value: &'a DomainNewExpense) -> Self {
        Self {
            kind: value.kind.into(),
            description: value.description.as_str(),
            category_id: value.category_id,
            supplier: value.supplier.as_deref(),
            amount: value.amount,
            paid_amount: 0,
            expense_date: value.expense_date,
            due_date: value.due_date,
            status: value.status.into(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewExpensePayment<'a> {
    pub fn from_domain(expense_id: i32, value: &'a DomainNewPayment) -> Self {
        Self {
            expense_id,
            amount: value.amount,
            paid_at: value.paid_at,
            note: value.note.as_deref(),
        }
    }
}
