use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::expense::{Expense, ExpenseKind, ExpenseListQuery, PayableStatus};
use crate::domain::expense_category::ExpenseCategory;
use crate::forms::expenses::{AddCategoryForm, AddExpenseForm, RegisterPaymentForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    ExpenseCategoryReader, ExpenseCategoryWriter, ExpenseReader, ExpenseWriter,
};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the expenses index page.
#[derive(Debug, Default, Deserialize)]
pub struct ExpensesQuery {
    /// `interno` or `cuenta_por_pagar`.
    pub kind: Option<String>,
    pub status: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the expenses index template.
pub struct ExpensesPageData {
    pub expenses: Paginated<Expense>,
    /// All categories, for the dialog dropdown and the color tags.
    pub categories: Vec<ExpenseCategory>,
    pub kind: Option<String>,
    pub status: Option<String>,
}

/// Loads the expenses overview page.
pub fn load_expenses_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ExpensesQuery,
) -> ServiceResult<ExpensesPageData>
where
    R: ExpenseReader + ExpenseCategoryReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let ExpensesQuery { kind, status, page } = query;

    let page = page.unwrap_or(1);
    let mut list_query = ExpenseListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(kind_value) = kind.as_deref().filter(|value| !value.is_empty()) {
        list_query = list_query.kind(ExpenseKind::from(kind_value));
    }
    if let Some(status_value) = status.as_deref().filter(|value| !value.is_empty()) {
        list_query = list_query.status(PayableStatus::from(status_value));
    }

    let (total, items) = repo.list_expenses(list_query).map_err(ServiceError::from)?;
    let categories = repo
        .list_expense_categories()
        .map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let expenses = Paginated::new(items, page, total_pages);

    Ok(ExpensesPageData {
        expenses,
        categories,
        kind,
        status,
    })
}

/// Creates an expense, internal or payable.
pub fn create_expense<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddExpenseForm,
) -> ServiceResult<Expense>
where
    R: ExpenseWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_expense()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_expense(&payload).map_err(ServiceError::from)
}

/// Registers a payment on a payable. The append and the status
/// recomputation run inside one repository transaction.
pub fn register_payment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    expense_id: i32,
    form: RegisterPaymentForm,
) -> ServiceResult<Expense>
where
    R: ExpenseReader + ExpenseWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let expense = repo
        .get_expense_by_id(expense_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if expense.kind != ExpenseKind::Payable {
        return Err(ServiceError::Form(
            "Solo las cuentas por pagar admiten pagos.".to_string(),
        ));
    }

    let payment = form
        .into_new_payment()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.register_payment(expense_id, &payment)
        .map_err(ServiceError::from)
}

/// Quick-creates a category from inside the expense dialog.
pub fn create_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddCategoryForm,
) -> ServiceResult<ExpenseCategory>
where
    R: ExpenseCategoryWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_category()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_expense_category(&payload)
        .map_err(ServiceError::from)
}

/// Deletes an expense together with its payment history.
pub fn remove_expense<R>(repo: &R, user: &AuthenticatedUser, expense_id: i32) -> ServiceResult<()>
where
    R: ExpenseWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_expense(expense_id).map_err(ServiceError::from)
}
