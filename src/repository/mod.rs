use crate::db::{DbConnection, DbPool};
use crate::domain::client::{Client, ClientListQuery, NewClient, UpdateClient};
use crate::domain::expense::{Expense, ExpenseListQuery, NewExpense, NewPayment};
use crate::domain::expense_category::{ExpenseCategory, NewExpenseCategory};
use crate::domain::product::{
    NewProduct, Product, ProductCategory, ProductListQuery, UpdateProduct,
};
use crate::domain::project::{NewProject, Project, ProjectListQuery, UpdateProject};
use crate::domain::quote::{NewQuote, Quote, QuoteListQuery, UpdateQuote};
use crate::domain::sale::{NewSale, Sale, SaleListQuery, UpdateSale};
use crate::domain::shipment::{NewShipment, NewShipmentEvent, Shipment, ShipmentListQuery};
use crate::repository::errors::RepositoryResult;

pub mod errors;

pub mod client;
pub mod expense;
pub mod expense_category;
pub mod product;
pub mod project;
pub mod quote;
pub mod sale;
pub mod shipment;

#[cfg(test)]
pub mod mock;

/// Diesel-backed repository implementation that wraps an r2d2 pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over client records.
pub trait ClientReader {
    fn get_client_by_id(&self, id: i32) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
}

/// Write operations over client records.
pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    fn update_client(&self, client_id: i32, updates: &UpdateClient) -> RepositoryResult<Client>;
    fn delete_client(&self, client_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over the product catalog.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

/// Write operations over the product catalog.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    /// Apply a percentage update to every price field of the matching
    /// category (or the whole catalog), re-rounding each price to hundreds.
    fn reprice_products(
        &self,
        category: Option<ProductCategory>,
        percent: f64,
    ) -> RepositoryResult<usize>;
}

/// Read-only operations over quotes.
pub trait QuoteReader {
    fn get_quote_by_id(&self, id: i32) -> RepositoryResult<Option<Quote>>;
    fn list_quotes(&self, query: QuoteListQuery) -> RepositoryResult<(usize, Vec<Quote>)>;
}

/// Write operations over quotes.
pub trait QuoteWriter {
    fn create_quote(&self, new_quote: &NewQuote) -> RepositoryResult<Quote>;
    fn update_quote(&self, quote_id: i32, updates: &UpdateQuote) -> RepositoryResult<Quote>;
    fn delete_quote(&self, quote_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over projects.
pub trait ProjectReader {
    fn get_project_by_id(&self, id: i32) -> RepositoryResult<Option<Project>>;
    fn list_projects(&self, query: ProjectListQuery) -> RepositoryResult<(usize, Vec<Project>)>;
}

/// Write operations over projects.
pub trait ProjectWriter {
    fn create_project(&self, new_project: &NewProject) -> RepositoryResult<Project>;
    fn update_project(&self, project_id: i32, updates: &UpdateProject)
    -> RepositoryResult<Project>;
    fn delete_project(&self, project_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over sales.
pub trait SaleReader {
    fn get_sale_by_id(&self, id: i32) -> RepositoryResult<Option<Sale>>;
    fn list_sales(&self, query: SaleListQuery) -> RepositoryResult<(usize, Vec<Sale>)>;
}

/// Write operations over sales.
pub trait SaleWriter {
    fn create_sale(&self, new_sale: &NewSale) -> RepositoryResult<Sale>;
    fn update_sale(&self, sale_id: i32, updates: &UpdateSale) -> RepositoryResult<Sale>;
    fn delete_sale(&self, sale_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over expenses.
pub trait ExpenseReader {
    fn get_expense_by_id(&self, id: i32) -> RepositoryResult<Option<Expense>>;
    fn list_expenses(&self, query: ExpenseListQuery) -> RepositoryResult<(usize, Vec<Expense>)>;
}

/// Write operations over expenses.
pub trait ExpenseWriter {
    fn create_expense(&self, new_expense: &NewExpense) -> RepositoryResult<Expense>;
    /// Append a payment and recompute the paid amount and the derived status
    /// in the same transaction.
    fn register_payment(&self, expense_id: i32, payment: &NewPayment)
    -> RepositoryResult<Expense>;
    fn delete_expense(&self, expense_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over expense categories.
pub trait ExpenseCategoryReader {
    fn list_expense_categories(&self) -> RepositoryResult<Vec<ExpenseCategory>>;
}

/// Write operations over expense categories.
pub trait ExpenseCategoryWriter {
    fn create_expense_category(
        &self,
        new_category: &NewExpenseCategory,
    ) -> RepositoryResult<ExpenseCategory>;
    fn delete_expense_category(&self, category_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over shipments.
pub trait ShipmentReader {
    fn get_shipment_by_id(&self, id: i32) -> RepositoryResult<Option<Shipment>>;
    fn list_shipments(&self, query: ShipmentListQuery)
    -> RepositoryResult<(usize, Vec<Shipment>)>;
}

/// Write operations over shipments.
pub trait ShipmentWriter {
    fn create_shipment(&self, new_shipment: &NewShipment) -> RepositoryResult<Shipment>;
    /// Append a state-history event and update the current status in the
    /// same transaction.
    fn advance_shipment(
        &self,
        shipment_id: i32,
        event: &NewShipmentEvent,
    ) -> RepositoryResult<Shipment>;
    fn delete_shipment(&self, shipment_id: i32) -> RepositoryResult<()>;
}
