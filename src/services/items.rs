//! Line-item construction shared by the quote, project and sale flows.
//!
//! The item picker posts catalog references, free-entry lines and lumber cut
//! dimensions; this module resolves them into priced [`LineItem`] snapshots.

use crate::domain::client::ClientSnapshot;
use crate::domain::line_item::{CutDetail, LineItem};
use crate::domain::product::{Product, ProductCategory};
use crate::forms::LineItemPayload;
use crate::pricing;
use crate::repository::{ClientReader, ProductReader};
use crate::services::{ServiceError, ServiceResult};

/// Resolve the client header of a new document: a referenced client record
/// is frozen into a snapshot, a free-entry name becomes a bare snapshot.
pub fn resolve_client<R>(
    repo: &R,
    client_id: Option<i32>,
    client_name: Option<String>,
) -> ServiceResult<(Option<i32>, ClientSnapshot)>
where
    R: ClientReader + ?Sized,
{
    match client_id {
        Some(id) => {
            let client = repo
                .get_client_by_id(id)
                .map_err(ServiceError::from)?
                .ok_or(ServiceError::NotFound)?;
            Ok((Some(id), ClientSnapshot::from(&client)))
        }
        None => {
            let name = client_name
                .ok_or_else(|| ServiceError::Form("El documento necesita un cliente.".to_string()))?;
            Ok((
                None,
                ClientSnapshot {
                    name,
                    tax_id: None,
                    phone: None,
                    address: None,
                },
            ))
        }
    }
}

/// Resolve and price every payload line, in order.
pub fn build_line_items<R>(repo: &R, payloads: Vec<LineItemPayload>) -> ServiceResult<Vec<LineItem>>
where
    R: ProductReader + ?Sized,
{
    payloads
        .into_iter()
        .map(|payload| build_line_item(repo, payload))
        .collect()
}

fn build_line_item<R>(repo: &R, payload: LineItemPayload) -> ServiceResult<LineItem>
where
    R: ProductReader + ?Sized,
{
    let product: Option<Product> = match payload.product_id {
        Some(id) => Some(
            repo.get_product_by_id(id)
                .map_err(ServiceError::from)?
                .ok_or(ServiceError::NotFound)?,
        ),
        None => None,
    };

    let name = payload
        .name
        .or_else(|| product.as_ref().map(|product| product.name.clone()))
        .ok_or_else(|| ServiceError::Form("El ítem necesita un nombre.".to_string()))?;

    if payload.quantity <= 0.0 {
        return Err(ServiceError::Form(format!(
            "La cantidad de «{name}» debe ser positiva."
        )));
    }
    if !(0.0..=100.0).contains(&payload.discount_percent) {
        return Err(ServiceError::Form(format!(
            "El descuento de «{name}» debe estar entre 0 y 100."
        )));
    }

    let (unit_price, cut) = match payload.cut {
        Some(cut_payload) => {
            // Catalog lumber takes its rate from the product; free-entry
            // lines must carry their own.
            let price_per_foot = cut_payload
                .price_per_foot
                .or_else(|| product.as_ref().and_then(|product| product.price_per_foot))
                .ok_or_else(|| {
                    ServiceError::Form(format!("Falta el precio por pie de «{name}»."))
                })?;

            let base = pricing::cut_price(
                cut_payload.height,
                cut_payload.width,
                cut_payload.length,
                price_per_foot as f64,
            );
            let unit_price = if cut_payload.planed {
                pricing::apply_planing(base)
            } else {
                base
            };

            (
                unit_price,
                Some(CutDetail {
                    height: cut_payload.height,
                    width: cut_payload.width,
                    length: cut_payload.length,
                    price_per_foot,
                    planed: cut_payload.planed,
                }),
            )
        }
        None => {
            let unit_price = payload
                .unit_price
                .or_else(|| product.as_ref().and_then(Product::list_price))
                .ok_or_else(|| ServiceError::Form(format!("Falta el precio de «{name}».")))?;
            (unit_price, None)
        }
    };

    let category = product
        .as_ref()
        .map(|product| product.category)
        .unwrap_or(if cut.is_some() {
            ProductCategory::Lumber
        } else {
            ProductCategory::Hardware
        });
    let unit = product.as_ref().and_then(|product| product.unit.clone());

    let gross = pricing::line_gross(unit_price, payload.quantity);
    let discount = pricing::line_discount(gross, payload.discount_percent);

    Ok(LineItem {
        product_id: payload.product_id,
        name,
        category,
        unit,
        quantity: payload.quantity,
        discount_percent: payload.discount_percent,
        unit_price,
        subtotal: gross - discount,
        cut,
    })
}

/// Gross and discount sums recomputed from a priced item list.
pub fn totals(items: &[LineItem]) -> (i64, i64) {
    let mut subtotal = 0i64;
    let mut discount_total = 0i64;

    for item in items {
        let gross = pricing::line_gross(item.unit_price, item.quantity);
        subtotal += gross;
        discount_total += gross - item.subtotal;
    }

    (subtotal, discount_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::forms::CutPayload;
    use crate::repository::mock::MockProductReader;

    fn catalog_lumber(id: i32) -> Product {
        Product {
            id,
            name: "Tirante 2x3".to_string(),
            category: ProductCategory::Lumber,
            unit: Some("un".to_string()),
            stock: 30.0,
            price_per_foot: Some(850),
            price_per_m2: None,
            price_per_m: None,
            sale_price: None,
            height: Some(2.0),
            width: Some(3.0),
            length: Some(2.5),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn catalog_cut_line_is_priced_from_the_product_rate() {
        let mut repo = MockProductReader::new();
        repo.expect_get_product_by_id()
            .returning(|id| Ok(Some(catalog_lumber(id))));

        let payload = LineItemPayload {
            product_id: Some(7),
            name: None,
            quantity: 2.0,
            discount_percent: 0.0,
            unit_price: None,
            cut: Some(CutPayload {
                height: 2.0,
                width: 3.0,
                length: 2.5,
                price_per_foot: None,
                planed: false,
            }),
        };

        let items = build_line_items(&repo, vec![payload]).expect("line should price");
        // 0.2734 x 2 x 3 x 2.5 x 850 = 3485.85 -> 3500
        assert_eq!(items[0].unit_price, 3500);
        assert_eq!(items[0].subtotal, 7000);
        assert_eq!(items[0].name, "Tirante 2x3");
        assert!(items[0].cut.as_ref().is_some_and(|cut| !cut.planed));
    }

    #[test]
    fn planed_cut_applies_the_surcharge() {
        let repo = MockProductReader::new();

        let payload = LineItemPayload {
            product_id: None,
            name: Some("Tabla cepillada".to_string()),
            quantity: 1.0,
            discount_percent: 0.0,
            unit_price: None,
            cut: Some(CutPayload {
                height: 2.0,
                width: 3.0,
                length: 2.5,
                price_per_foot: Some(850),
                planed: true,
            }),
        };

        let items = build_line_items(&repo, vec![payload]).expect("line should price");
        // base 3500, +6.6% = 3731 -> 3700
        assert_eq!(items[0].unit_price, 3700);
    }

    #[test]
    fn free_entry_line_needs_name_and_price() {
        let repo = MockProductReader::new();

        let nameless = LineItemPayload {
            product_id: None,
            name: None,
            quantity: 1.0,
            discount_percent: 0.0,
            unit_price: Some(500),
            cut: None,
        };
        assert!(matches!(
            build_line_items(&repo, vec![nameless]),
            Err(ServiceError::Form(_))
        ));

        let priceless = LineItemPayload {
            product_id: None,
            name: Some("Flete".to_string()),
            quantity: 1.0,
            discount_percent: 0.0,
            unit_price: None,
            cut: None,
        };
        assert!(matches!(
            build_line_items(&repo, vec![priceless]),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn missing_catalog_product_is_not_found() {
        let mut repo = MockProductReader::new();
        repo.expect_get_product_by_id().returning(|_| Ok(None));

        let payload = LineItemPayload {
            product_id: Some(99),
            name: None,
            quantity: 1.0,
            discount_percent: 0.0,
            unit_price: None,
            cut: None,
        };

        assert!(matches!(
            build_line_items(&repo, vec![payload]),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn totals_split_gross_and_discount() {
        let mut repo = MockProductReader::new();
        repo.expect_get_product_by_id()
            .returning(|id| Ok(Some(catalog_lumber(id))));

        let payload = LineItemPayload {
            product_id: Some(7),
            name: None,
            quantity: 2.0,
            discount_percent: 10.0,
            unit_price: None,
            cut: Some(CutPayload {
                height: 2.0,
                width: 3.0,
                length: 2.5,
                price_per_foot: None,
                planed: false,
            }),
        };

        let items = build_line_items(&repo, vec![payload]).expect("line should price");
        let (subtotal, discount_total) = totals(&items);
        assert_eq!(subtotal, 7000);
        assert_eq!(discount_total, 700);
        assert_eq!(items[0].subtotal, 6300);
    }
}
