use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::expense::{ExpenseKind, NewExpense, NewPayment};
use crate::domain::expense_category::NewExpenseCategory;
use crate::forms::{
    FieldError, empty_string_as_none, empty_string_as_none_id, parse_date, parse_money,
};

/// Maximum allowed length for an expense description.
const DESCRIPTION_MAX_LEN: u64 = 256;

#[derive(Debug, Error)]
pub enum ExpenseFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("a payable needs a supplier")]
    MissingSupplier,
    #[error("payment amount must be positive")]
    ZeroPayment,
}

/// Form payload for the expense dialog, covering both modes.
#[derive(Debug, Deserialize, Validate)]
pub struct AddExpenseForm {
    /// `interno` or `cuenta_por_pagar`.
    pub kind: String,
    #[validate(length(min = 1, max = DESCRIPTION_MAX_LEN))]
    pub description: String,
    #[serde(default, deserialize_with = "empty_string_as_none_id")]
    pub category_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub supplier: Option<String>,
    pub amount: String,
    pub expense_date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub due_date: Option<String>,
}

impl AddExpenseForm {
    pub fn into_new_expense(self) -> Result<NewExpense, ExpenseFormError> {
        self.validate()?;

        let amount = parse_money(&self.amount)?;
        let expense_date = parse_date(&self.expense_date)?;
        let kind = ExpenseKind::from(self.kind.as_str());

        let mut new_expense = match kind {
            ExpenseKind::Internal => NewExpense::internal(self.description, amount, expense_date),
            ExpenseKind::Payable => {
                let supplier = self.supplier.ok_or(ExpenseFormError::MissingSupplier)?;
                let mut payable =
                    NewExpense::payable(self.description, supplier, amount, expense_date);
                if let Some(due_date) = self.due_date.as_deref() {
                    payable = payable.with_due_date(parse_date(due_date)?);
                }
                payable
            }
        };

        if let Some(category_id) = self.category_id {
            new_expense = new_expense.with_category_id(category_id);
        }

        Ok(new_expense)
    }
}

/// Form payload for registering a payment on a payable.
#[derive(Debug, Deserialize)]
pub struct RegisterPaymentForm {
    pub amount: String,
    pub paid_at: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub note: Option<String>,
}

impl RegisterPaymentForm {
    pub fn into_new_payment(self) -> Result<NewPayment, ExpenseFormError> {
        let amount = parse_money(&self.amount)?;
        if amount == 0 {
            return Err(ExpenseFormError::ZeroPayment);
        }
        let paid_at = parse_date(&self.paid_at)?;

        let mut payment = NewPayment::new(amount, paid_at);
        if let Some(note) = self.note {
            payment = payment.with_note(note);
        }

        Ok(payment)
    }
}

/// Form payload for the quick "create category" control inside the expense
/// dialog.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCategoryForm {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub color: Option<String>,
}

impl AddCategoryForm {
    pub fn into_new_category(self) -> Result<NewExpenseCategory, ExpenseFormError> {
        self.validate()?;

        let mut category = NewExpenseCategory::new(self.name.trim());
        if let Some(color) = self.color {
            category = category.with_color(color);
        }

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expense::PayableStatus;

    fn payable_form() -> AddExpenseForm {
        AddExpenseForm {
            kind: "cuenta_por_pagar".to_string(),
            description: "Compra de herrajes".to_string(),
            category_id: None,
            supplier: Some("Herrajes del Sur".to_string()),
            amount: "150000".to_string(),
            expense_date: "2025-06-01".to_string(),
            due_date: Some("2025-07-01".to_string()),
        }
    }

    #[test]
    fn payable_form_builds_pending_expense() {
        let expense = payable_form().into_new_expense().expect("valid form");
        assert_eq!(expense.kind, ExpenseKind::Payable);
        assert_eq!(expense.status, PayableStatus::Pending);
        assert_eq!(expense.amount, 150000);
        assert!(expense.due_date.is_some());
    }

    #[test]
    fn payable_without_supplier_is_rejected() {
        let mut form = payable_form();
        form.supplier = None;
        assert!(matches!(
            form.into_new_expense(),
            Err(ExpenseFormError::MissingSupplier)
        ));
    }

    #[test]
    fn internal_form_is_paid_on_creation() {
        let form = AddExpenseForm {
            kind: "interno".to_string(),
            description: "Nafta camioneta".to_string(),
            category_id: Some(2),
            supplier: None,
            amount: "20000".to_string(),
            expense_date: "2025-06-05".to_string(),
            due_date: None,
        };

        let expense = form.into_new_expense().expect("valid form");
        assert_eq!(expense.kind, ExpenseKind::Internal);
        assert_eq!(expense.status, PayableStatus::Paid);
        assert_eq!(expense.category_id, Some(2));
    }

    #[test]
    fn zero_payment_is_rejected() {
        let form = RegisterPaymentForm {
            amount: "0".to_string(),
            paid_at: "2025-06-10".to_string(),
            note: None,
        };

        assert!(matches!(
            form.into_new_payment(),
            Err(ExpenseFormError::ZeroPayment)
        ));
    }
}
