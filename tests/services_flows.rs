use chrono::NaiveDate;

use maderera::SERVICE_ACCESS_ROLE;
use maderera::auth::AuthenticatedUser;
use maderera::domain::client::NewClient;
use maderera::domain::expense::PayableStatus;
use maderera::domain::product::{NewProduct, ProductCategory};
use maderera::domain::quote::QuoteStatus;
use maderera::forms::expenses::{AddExpenseForm, RegisterPaymentForm};
use maderera::forms::quotes::AddQuoteForm;
use maderera::forms::sales::AddSaleForm;
use maderera::repository::{ClientWriter, DieselRepository, ProductWriter, QuoteReader};
use maderera::services::{ServiceError, expenses, quotes, sales};

mod common;

fn user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "emp-1".to_string(),
        email: "vendedor@example.com".to_string(),
        name: "Vendedor".to_string(),
        roles: vec![SERVICE_ACCESS_ROLE.to_string()],
        exp: 0,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn quote_conversion_copies_snapshot_and_is_idempotent() {
    let test_db = common::TestDb::new("service_quote_conversion.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = user();

    let client = repo
        .create_client(
            &NewClient::new("Obra García")
                .with_tax_id("30-11223344-5")
                .with_address("Calle 12 n° 340"),
        )
        .expect("create client");

    let lumber = repo
        .create_product(
            &NewProduct::new("Tirante 2x3", ProductCategory::Lumber)
                .with_price_per_foot(850)
                .with_dimensions(2.0, 3.0, 2.5),
        )
        .expect("create lumber");

    let form = AddQuoteForm {
        client_id: Some(client.id),
        client_name: None,
        quote_date: "2025-04-10".to_string(),
        salesperson: Some("Raúl".to_string()),
        notes: None,
        blocks: format!(
            r#"[{{"name": "Techo", "items": [
                {{"product_id": {}, "quantity": 2,
                  "cut": {{"height": 2, "width": 3, "length": 2.5, "planed": false}}}}
            ]}}]"#,
            lumber.id
        ),
    };

    let quote = quotes::create_quote(&repo, &user, form).expect("create quote");
    // 0.2734 x 2 x 3 x 2.5 x 850 = 3485.85 -> 3500 per unit, two units
    assert_eq!(quote.total, 7000);
    assert_eq!(quote.client.name, "Obra García");

    let project = quotes::convert_quote(&repo, &user, quote.id).expect("convert quote");
    assert_eq!(project.quote_id, Some(quote.id));
    assert_eq!(project.client.name, "Obra García");
    assert_eq!(project.client.tax_id.as_deref(), Some("30-11223344-5"));
    assert_eq!(project.total, 7000);
    assert_eq!(project.items.len(), 1);

    let quote = repo
        .get_quote_by_id(quote.id)
        .expect("lookup quote")
        .expect("quote exists");
    assert_eq!(quote.status, QuoteStatus::Converted);

    // a second conversion is refused
    let err = quotes::convert_quote(&repo, &user, quote.id)
        .expect_err("expected second conversion to fail");
    assert!(matches!(err, ServiceError::Conflict));
}

#[test]
fn sale_snapshot_survives_client_edits() {
    let test_db = common::TestDb::new("service_sale_snapshot.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = user();

    let client = repo
        .create_client(&NewClient::new("García Hnos.").with_phone("11 5555-0000"))
        .expect("create client");

    let form = AddSaleForm {
        client_id: Some(client.id),
        client_name: None,
        sale_date: "2025-05-02".to_string(),
        salesperson: None,
        delivery_type: "envio_domicilio".to_string(),
        shipping_cost: Some("2000".to_string()),
        notes: None,
        items: r#"[{"name": "Cemento x 50kg", "quantity": 2, "unit_price": 9000}]"#.to_string(),
    };

    let sale = sales::create_sale(&repo, &user, form).expect("create sale");
    assert_eq!(sale.subtotal, 18000);
    assert_eq!(sale.total, 20000);
    assert_eq!(sale.client.phone.as_deref(), Some("11 5555-0000"));

    // editing the master record must not touch the embedded snapshot
    use maderera::domain::client::UpdateClient;
    repo.update_client(
        client.id,
        &UpdateClient {
            name: "Otro nombre".to_string(),
            tax_id: None,
            phone: Some("11 9999-9999".to_string()),
            email: None,
            address: None,
            locality: None,
            neighborhood: None,
            is_legacy: false,
            updated_at: chrono::Local::now().naive_utc(),
        },
    )
    .expect("update client");

    let sale = sales::load_sale(&repo, &user, sale.id).expect("reload sale");
    assert_eq!(sale.client.name, "García Hnos.");
    assert_eq!(sale.client.phone.as_deref(), Some("11 5555-0000"));
}

#[test]
fn payment_flow_reaches_paid_exactly_at_total() {
    let test_db = common::TestDb::new("service_payment_flow.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = user();

    let form = AddExpenseForm {
        kind: "cuenta_por_pagar".to_string(),
        description: "Compra de herrajes".to_string(),
        category_id: None,
        supplier: Some("Herrajes del Sur".to_string()),
        amount: "150000".to_string(),
        expense_date: "2025-06-01".to_string(),
        due_date: Some("2025-07-01".to_string()),
    };

    let expense = expenses::create_expense(&repo, &user, form).expect("create payable");
    assert_eq!(expense.status, PayableStatus::Pending);

    let partial = expenses::register_payment(
        &repo,
        &user,
        expense.id,
        RegisterPaymentForm {
            amount: "50000".to_string(),
            paid_at: "2025-06-10".to_string(),
            note: None,
        },
    )
    .expect("partial payment");
    assert_eq!(partial.status, PayableStatus::Partial);
    assert_eq!(partial.paid_amount, 50000);

    let paid = expenses::register_payment(
        &repo,
        &user,
        expense.id,
        RegisterPaymentForm {
            amount: "100000".to_string(),
            paid_at: "2025-06-20".to_string(),
            note: Some("saldo final".to_string()),
        },
    )
    .expect("final payment");
    assert_eq!(paid.status, PayableStatus::Paid);
    assert_eq!(paid.paid_amount, 150000);
    assert_eq!(paid.payments.len(), 2);
}
