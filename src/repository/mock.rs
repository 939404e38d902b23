use mockall::mock;

use super::{
    ClientReader, ClientWriter, ExpenseCategoryReader, ExpenseCategoryWriter, ExpenseReader,
    ExpenseWriter, ProductReader, ProductWriter, ProjectReader, ProjectWriter, QuoteReader,
    QuoteWriter, SaleReader, SaleWriter, ShipmentReader, ShipmentWriter,
};
use crate::domain::{
    client::{Client, ClientListQuery, NewClient, UpdateClient},
    expense::{Expense, ExpenseListQuery, NewExpense, NewPayment},
    expense_category::{ExpenseCategory, NewExpenseCategory},
    product::{NewProduct, Product, ProductCategory, ProductListQuery, UpdateProduct},
    project::{NewProject, Project, ProjectListQuery, UpdateProject},
    quote::{NewQuote, Quote, QuoteListQuery, UpdateQuote},
    sale::{NewSale, Sale, SaleListQuery, UpdateSale},
    shipment::{NewShipment, NewShipmentEvent, Shipment, ShipmentListQuery},
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub ClientReader {}

    impl ClientReader for ClientReader {
        fn get_client_by_id(&self, id: i32) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    }
}

mock! {
    pub ClientWriter {}

    impl ClientWriter for ClientWriter {
        fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
        fn update_client(&self, client_id: i32, updates: &UpdateClient) -> RepositoryResult<Client>;
        fn delete_client(&self, client_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
        fn reprice_products(&self, category: Option<ProductCategory>, percent: f64) -> RepositoryResult<usize>;
    }
}

mock! {
    pub QuoteReader {}

    impl QuoteReader for QuoteReader {
        fn get_quote_by_id(&self, id: i32) -> RepositoryResult<Option<Quote>>;
        fn list_quotes(&self, query: QuoteListQuery) -> RepositoryResult<(usize, Vec<Quote>)>;
    }
}

mock! {
    pub QuoteWriter {}

    impl QuoteWriter for QuoteWriter {
        fn create_quote(&self, new_quote: &NewQuote) -> RepositoryResult<Quote>;
        fn update_quote(&self, quote_id: i32, updates: &UpdateQuote) -> RepositoryResult<Quote>;
        fn delete_quote(&self, quote_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ProjectReader {}

    impl ProjectReader for ProjectReader {
        fn get_project_by_id(&self, id: i32) -> RepositoryResult<Option<Project>>;
        fn list_projects(&self, query: ProjectListQuery) -> RepositoryResult<(usize, Vec<Project>)>;
    }
}

mock! {
    pub ProjectWriter {}

    impl ProjectWriter for ProjectWriter {
        fn create_project(&self, new_project: &NewProject) -> RepositoryResult<Project>;
        fn update_project(&self, project_id: i32, updates: &UpdateProject) -> RepositoryResult<Project>;
        fn delete_project(&self, project_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub SaleReader {}

    impl SaleReader for SaleReader {
        fn get_sale_by_id(&self, id: i32) -> RepositoryResult<Option<Sale>>;
        fn list_sales(&self, query: SaleListQuery) -> RepositoryResult<(usize, Vec<Sale>)>;
    }
}

mock! {
    pub SaleWriter {}

    impl SaleWriter for SaleWriter {
        fn create_sale(&self, new_sale: &NewSale) -> RepositoryResult<Sale>;
        fn update_sale(&self, sale_id: i32, updates: &UpdateSale) -> RepositoryResult<Sale>;
        fn delete_sale(&self, sale_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ExpenseReader {}

    impl ExpenseReader for ExpenseReader {
        fn get_expense_by_id(&self, id: i32) -> RepositoryResult<Option<Expense>>;
        fn list_expenses(&self, query: ExpenseListQuery) -> RepositoryResult<(usize, Vec<Expense>)>;
    }
}

mock! {
    pub ExpenseWriter {}

    impl ExpenseWriter for ExpenseWriter {
        fn create_expense(&self, new_expense: &NewExpense) -> RepositoryResult<Expense>;
        fn register_payment(&self, expense_id: i32, payment: &NewPayment) -> RepositoryResult<Expense>;
        fn delete_expense(&self, expense_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ExpenseCategoryReader {}

    impl ExpenseCategoryReader for ExpenseCategoryReader {
        fn list_expense_categories(&self) -> RepositoryResult<Vec<ExpenseCategory>>;
    }
}

mock! {
    pub ExpenseCategoryWriter {}

    impl ExpenseCategoryWriter for ExpenseCategoryWriter {
        fn create_expense_category(&self, new_category: &NewExpenseCategory) -> RepositoryResult<ExpenseCategory>;
        fn delete_expense_category(&self, category_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ShipmentReader {}

    impl ShipmentReader for ShipmentReader {
        fn get_shipment_by_id(&self, id: i32) -> RepositoryResult<Option<Shipment>>;
        fn list_shipments(&self, query: ShipmentListQuery) -> RepositoryResult<(usize, Vec<Shipment>)>;
    }
}

mock! {
    pub ShipmentWriter {}

    impl ShipmentWriter for ShipmentWriter {
        fn create_shipment(&self, new_shipment: &NewShipment) -> RepositoryResult<Shipment>;
        fn advance_shipment(&self, shipment_id: i32, event: &NewShipmentEvent) -> RepositoryResult<Shipment>;
        fn delete_shipment(&self, shipment_id: i32) -> RepositoryResult<()>;
    }
}
