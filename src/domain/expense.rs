use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// The two modes of an expense record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseKind {
    /// An internal expense, categorized and paid on the spot.
    #[serde(rename = "interno")]
    Internal,
    /// A supplier payable tracked until fully paid.
    #[serde(rename = "cuenta_por_pagar")]
    Payable,
}

impl From<&str> for ExpenseKind {
    fn from(value: &str) -> Self {
        match value {
            "cuenta_por_pagar" => ExpenseKind::Payable,
            _ => ExpenseKind::Internal,
        }
    }
}

impl From<ExpenseKind> for &'static str {
    fn from(value: ExpenseKind) -> Self {
        match value {
            ExpenseKind::Internal => "interno",
            ExpenseKind::Payable => "cuenta_por_pagar",
        }
    }
}

/// Payment state of a payable, derived from the paid and total amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayableStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "parcial")]
    Partial,
    #[serde(rename = "pagado")]
    Paid,
}

impl Default for PayableStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl PayableStatus {
    /// Recompute the status from the total and the cumulative paid amount:
    /// `pagado` when paid covers the total, `parcial` when something but not
    /// everything was paid, `pendiente` when nothing was.
    pub fn derive(total: i64, paid: i64) -> Self {
        if paid <= 0 {
            PayableStatus::Pending
        } else if paid >= total {
            PayableStatus::Paid
        } else {
            PayableStatus::Partial
        }
    }
}

impl From<&str> for PayableStatus {
    fn from(value: &str) -> Self {
        match value {
            "parcial" => PayableStatus::Partial,
            "pagado" => PayableStatus::Paid,
            _ => PayableStatus::Pending,
        }
    }
}

impl From<PayableStatus> for &'static str {
    fn from(value: PayableStatus) -> Self {
        match value {
            PayableStatus::Pending => "pendiente",
            PayableStatus::Partial => "parcial",
            PayableStatus::Paid => "pagado",
        }
    }
}

/// A payment registered against a payable. Payments are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub amount: i64,
    pub paid_at: NaiveDate,
    pub note: Option<String>,
}

/// Domain representation of an expense, internal or payable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i32,
    pub kind: ExpenseKind,
    pub description: String,
    /// Category, only meaningful for internal expenses.
    pub category_id: Option<i32>,
    /// Supplier name, only meaningful for payables.
    pub supplier: Option<String>,
    /// Total amount owed.
    pub amount: i64,
    /// Cumulative amount paid so far; kept in sync with the payment history.
    pub paid_amount: i64,
    pub expense_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: PayableStatus,
    pub payments: Vec<Payment>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub kind: ExpenseKind,
    pub description: String,
    pub category_id: Option<i32>,
    pub supplier: Option<String>,
    pub amount: i64,
    pub expense_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: PayableStatus,
    pub updated_at: NaiveDateTime,
}

impl NewExpense {
    /// An internal expense is paid on the spot; its status is `pagado`.
    #[must_use]
    pub fn internal(description: impl Into<String>, amount: i64, expense_date: NaiveDate) -> Self {
        Self {
            kind: ExpenseKind::Internal,
            description: description.into(),
            category_id: None,
            supplier: None,
            amount,
            expense_date,
            due_date: None,
            status: PayableStatus::Paid,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    /// A payable starts with nothing paid.
    #[must_use]
    pub fn payable(
        description: impl Into<String>,
        supplier: impl Into<String>,
        amount: i64,
        expense_date: NaiveDate,
    ) -> Self {
        Self {
            kind: ExpenseKind::Payable,
            description: description.into(),
            category_id: None,
            supplier: Some(supplier.into()),
            amount,
            expense_date,
            due_date: None,
            status: PayableStatus::Pending,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn with_category_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Payload for registering a payment against a payable.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub amount: i64,
    pub paid_at: NaiveDate,
    pub note: Option<String>,
}

impl NewPayment {
    #[must_use]
    pub fn new(amount: i64, paid_at: NaiveDate) -> Self {
        Self {
            amount,
            paid_at,
            note: None,
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Query definition used to list expenses.
#[derive(Debug, Clone)]
pub struct ExpenseListQuery {
    pub kind: Option<ExpenseKind>,
    pub status: Option<PayableStatus>,
    pub pagination: Option<Pagination>,
}

impl Default for ExpenseListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseListQuery {
    pub fn new() -> Self {
        Self {
            kind: None,
            status: None,
            pagination: None,
        }
    }

    pub fn kind(mut self, kind: ExpenseKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn status(mut self, status: PayableStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_paid_exactly_at_total() {
        assert_eq!(PayableStatus::derive(10000, 10000), PayableStatus::Paid);
        assert_eq!(PayableStatus::derive(10000, 10001), PayableStatus::Paid);
        assert_eq!(PayableStatus::derive(10000, 9999), PayableStatus::Partial);
    }

    #[test]
    fn status_is_pending_only_with_nothing_paid() {
        assert_eq!(PayableStatus::derive(10000, 0), PayableStatus::Pending);
        assert_eq!(PayableStatus::derive(10000, 1), PayableStatus::Partial);
    }

    #[test]
    fn status_string_roundtrip() {
        for status in [
            PayableStatus::Pending,
            PayableStatus::Partial,
            PayableStatus::Paid,
        ] {
            let stored: &'static str = status.into();
            assert_eq!(PayableStatus::from(stored), status);
        }
    }
}
