use chrono::NaiveDate;

use maderera::domain::client::{ClientListQuery, ClientSnapshot, NewClient, UpdateClient};
use maderera::domain::expense::{NewExpense, NewPayment, PayableStatus};
use maderera::domain::line_item::{CutDetail, LineItem};
use maderera::domain::product::{NewProduct, ProductCategory, ProductListQuery};
use maderera::domain::quote::{NewQuote, NewQuoteBlock, QuoteListQuery, QuoteStatus};
use maderera::domain::shipment::{NewShipment, NewShipmentEvent, ShipmentStatus};
use maderera::repository::errors::RepositoryError;
use maderera::repository::{
    ClientReader, ClientWriter, DieselRepository, ExpenseWriter, ProductReader, ProductWriter,
    QuoteReader, QuoteWriter, ShipmentWriter,
};

mod common;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn test_client_repository_crud() {
    let test_db = common::TestDb::new("test_client_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_client(
            &NewClient::new("Corralón El Ñandú")
                .with_tax_id("30-11223344-5")
                .with_locality("San Martín"),
        )
        .expect("create client");
    assert_eq!(created.tax_id.as_deref(), Some("30-11223344-5"));

    // accent- and case-insensitive search against the normalized name
    let (total, items) = repo
        .list_clients(ClientListQuery::new().search("ñANDU"))
        .expect("search clients");
    assert_eq!(total, 1);
    assert_eq!(items[0].name, "Corralón El Ñandú");

    let updated = repo
        .update_client(
            created.id,
            &UpdateClient {
                name: "Corralón El Ñandú SRL".to_string(),
                tax_id: None,
                phone: Some("11 5555-0000".to_string()),
                email: None,
                address: None,
                locality: None,
                neighborhood: None,
                is_legacy: true,
                updated_at: chrono::Local::now().naive_utc(),
            },
        )
        .expect("update client");
    assert!(updated.is_legacy);
    // the overwrite clears fields left empty in the form
    assert_eq!(updated.tax_id, None);

    repo.delete_client(created.id).expect("delete client");
    assert!(
        repo.get_client_by_id(created.id)
            .expect("lookup client")
            .is_none()
    );

    let err = repo
        .delete_client(created.id)
        .expect_err("expected delete of a missing client to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_product_repository_reprice_rounds_to_hundreds() {
    let test_db = common::TestDb::new("test_product_repository_reprice.db");
    let repo = DieselRepository::new(test_db.pool());

    let lumber = repo
        .create_product(
            &NewProduct::new("Tirante 2x3", ProductCategory::Lumber)
                .with_price_per_foot(850)
                .with_dimensions(2.0, 3.0, 2.5),
        )
        .expect("create lumber");

    let hardware = repo
        .create_product(
            &NewProduct::new("Clavos 2\"", ProductCategory::Hardware).with_sale_price(1200),
        )
        .expect("create hardware");

    // only the lumber category moves
    let updated = repo
        .reprice_products(Some(ProductCategory::Lumber), 10.0)
        .expect("reprice lumber");
    assert_eq!(updated, 1);

    let lumber = repo
        .get_product_by_id(lumber.id)
        .expect("lookup lumber")
        .expect("lumber exists");
    // 850 * 1.10 = 935 -> rounded to 900
    assert_eq!(lumber.price_per_foot, Some(900));

    let hardware = repo
        .get_product_by_id(hardware.id)
        .expect("lookup hardware")
        .expect("hardware exists");
    assert_eq!(hardware.sale_price, Some(1200));

    // catalog-wide pass moves the rest
    let updated = repo.reprice_products(None, 10.0).expect("reprice all");
    assert_eq!(updated, 2);

    let hardware = repo
        .get_product_by_id(hardware.id)
        .expect("lookup hardware")
        .expect("hardware exists");
    // 1200 * 1.10 = 1320 -> 1300
    assert_eq!(hardware.sale_price, Some(1300));
}

#[test]
fn test_product_search_is_diacritic_insensitive() {
    let test_db = common::TestDb::new("test_product_search_normalized.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.create_product(
        &NewProduct::new("Caño PVC 110", ProductCategory::Hardware).with_sale_price(3500),
    )
    .expect("create product");

    let (total, items) = repo
        .list_products(ProductListQuery::new().search("cano"))
        .expect("search products");
    assert_eq!(total, 1);
    assert_eq!(items[0].name, "Caño PVC 110");

    let (total, _) = repo
        .list_products(
            ProductListQuery::new()
                .search("cano")
                .category(ProductCategory::Lumber),
        )
        .expect("search with category");
    assert_eq!(total, 0);
}

fn cut_item(name: &str, unit_price: i64, quantity: f64) -> LineItem {
    LineItem {
        product_id: None,
        name: name.to_string(),
        category: ProductCategory::Lumber,
        unit: Some("un".to_string()),
        quantity,
        discount_percent: 0.0,
        unit_price,
        subtotal: (unit_price as f64 * quantity).round() as i64,
        cut: Some(CutDetail {
            height: 2.0,
            width: 3.0,
            length: 2.5,
            price_per_foot: 850,
            planed: false,
        }),
    }
}

#[test]
fn test_quote_repository_persists_blocks_in_order() {
    let test_db = common::TestDb::new("test_quote_repository_blocks.db");
    let repo = DieselRepository::new(test_db.pool());

    let snapshot = ClientSnapshot {
        name: "Obra García".to_string(),
        tax_id: None,
        phone: None,
        address: Some("Calle 12 n° 340".to_string()),
    };

    let new_quote = NewQuote::new(snapshot, date(2025, 4, 10))
        .with_salesperson("Raúl")
        .with_blocks(vec![
            NewQuoteBlock {
                name: "Techo".to_string(),
                position: 0,
                subtotal: 7000,
                items: vec![cut_item("Tirante 2x3", 3500, 2.0)],
            },
            NewQuoteBlock {
                name: "Deck".to_string(),
                position: 1,
                subtotal: 10500,
                items: vec![cut_item("Tabla 1x6", 3500, 3.0)],
            },
        ]);

    let created = repo.create_quote(&new_quote).expect("create quote");
    assert_eq!(created.total, 17500);
    assert_eq!(created.status, QuoteStatus::Pending);
    assert_eq!(created.blocks.len(), 2);
    assert_eq!(created.blocks[0].name, "Techo");
    assert_eq!(created.blocks[1].name, "Deck");
    assert_eq!(created.blocks[0].items[0].cut.as_ref().map(|c| c.price_per_foot), Some(850));

    let (total, listed) = repo
        .list_quotes(QuoteListQuery::new().search("garcia"))
        .expect("search quotes");
    assert_eq!(total, 1);
    assert_eq!(listed[0].blocks.len(), 2);

    repo.delete_quote(created.id).expect("delete quote");
    assert!(
        repo.get_quote_by_id(created.id)
            .expect("lookup quote")
            .is_none()
    );
}

#[test]
fn test_expense_repository_payment_updates_aggregate_and_status() {
    let test_db = common::TestDb::new("test_expense_repository_payments.db");
    let repo = DieselRepository::new(test_db.pool());

    let payable = repo
        .create_expense(
            &NewExpense::payable("Compra de hierros", "Aceros Sur", 100000, date(2025, 6, 1))
                .with_due_date(date(2025, 7, 1)),
        )
        .expect("create payable");
    assert_eq!(payable.status, PayableStatus::Pending);
    assert_eq!(payable.paid_amount, 0);

    let after_first = repo
        .register_payment(payable.id, &NewPayment::new(40000, date(2025, 6, 10)))
        .expect("first payment");
    assert_eq!(after_first.paid_amount, 40000);
    assert_eq!(after_first.status, PayableStatus::Partial);
    assert_eq!(after_first.payments.len(), 1);

    let after_second = repo
        .register_payment(
            payable.id,
            &NewPayment::new(60000, date(2025, 6, 20)).with_note("saldo"),
        )
        .expect("second payment");
    // paid == total flips the status exactly at the boundary
    assert_eq!(after_second.paid_amount, 100000);
    assert_eq!(after_second.status, PayableStatus::Paid);
    assert_eq!(after_second.payments.len(), 2);
    assert_eq!(after_second.payments[1].note.as_deref(), Some("saldo"));

    let err = repo
        .register_payment(9999, &NewPayment::new(100, date(2025, 6, 21)))
        .expect_err("expected payment on a missing expense to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_shipment_repository_appends_history_in_order() {
    let test_db = common::TestDb::new("test_shipment_repository_history.db");
    let repo = DieselRepository::new(test_db.pool());

    // shipments reference a sale row
    use maderera::domain::sale::NewSale;
    use maderera::repository::SaleWriter;

    let sale = repo
        .create_sale(&NewSale::new(
            ClientSnapshot {
                name: "Mostrador".to_string(),
                tax_id: None,
                phone: None,
                address: None,
            },
            date(2025, 5, 2),
        ))
        .expect("create sale");

    let shipment = repo
        .create_shipment(&NewShipment::new(sale.id).with_address("Calle 12 n° 340"))
        .expect("create shipment");
    assert_eq!(shipment.status, ShipmentStatus::Pending);
    assert_eq!(shipment.events.len(), 1);
    assert_eq!(shipment.events[0].status, ShipmentStatus::Pending);

    let advanced = repo
        .advance_shipment(
            shipment.id,
            &NewShipmentEvent::new(ShipmentStatus::OnTheWay).with_comment("Camión chico"),
        )
        .expect("advance shipment");
    assert_eq!(advanced.status, ShipmentStatus::OnTheWay);
    assert_eq!(advanced.events.len(), 2);
    assert_eq!(advanced.events[1].comment.as_deref(), Some("Camión chico"));

    let delivered = repo
        .advance_shipment(shipment.id, &NewShipmentEvent::new(ShipmentStatus::Delivered))
        .expect("deliver shipment");
    let statuses: Vec<ShipmentStatus> = delivered.events.iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        vec![
            ShipmentStatus::Pending,
            ShipmentStatus::OnTheWay,
            ShipmentStatus::Delivered
        ]
    );

    let err = repo
        .advance_shipment(9999, &NewShipmentEvent::new(ShipmentStatus::Delivered))
        .expect_err("expected advance of a missing shipment to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}
