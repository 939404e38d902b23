use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::sale::{
    DeliveryType, NewSale, Sale, SaleListQuery, SaleStatus, UpdateSale,
};
use crate::forms::sales::{AddSaleForm, UpdateSaleStatusForm};
use crate::forms::{parse_date, parse_money};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::pricing;
use crate::repository::{ClientReader, ProductReader, SaleReader, SaleWriter};
use crate::services::items::{build_line_items, resolve_client, totals};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the sales index page.
#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the sales index template.
pub struct SalesPageData {
    pub sales: Paginated<Sale>,
    pub search: Option<String>,
    pub status: Option<String>,
}

/// Loads the sales overview page.
pub fn load_sales_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: SalesQuery,
) -> ServiceResult<SalesPageData>
where
    R: SaleReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let SalesQuery {
        search,
        status,
        page,
    } = query;

    let page = page.unwrap_or(1);
    let mut list_query = SaleListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if let Some(status_value) = status.as_deref().filter(|value| !value.is_empty()) {
        list_query = list_query.status(SaleStatus::from(status_value));
    }

    let (total, items) = repo.list_sales(list_query).map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let sales = Paginated::new(items, page, total_pages);

    Ok(SalesPageData {
        sales,
        search,
        status,
    })
}

/// Loads one sale for the detail page.
pub fn load_sale<R>(repo: &R, user: &AuthenticatedUser, sale_id: i32) -> ServiceResult<Sale>
where
    R: SaleReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_sale_by_id(sale_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a sale: resolves the client snapshot, prices the items and
/// computes `subtotal - discount_total + shipping_cost` server-side.
///
/// The shipping cost is stored as zero for local pickup even when the form
/// still carries a previously-entered value.
pub fn create_sale<R>(repo: &R, user: &AuthenticatedUser, form: AddSaleForm) -> ServiceResult<Sale>
where
    R: SaleWriter + ClientReader + ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let items_payload = form
        .parse_items()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let sale_date =
        parse_date(&form.sale_date).map_err(|err| ServiceError::Form(err.to_string()))?;

    let delivery_type = DeliveryType::from(form.delivery_type.as_str());
    let entered_shipping = match form.shipping_cost.as_deref() {
        Some(value) => parse_money(value).map_err(|err| ServiceError::Form(err.to_string()))?,
        None => 0,
    };
    let shipping_cost = match delivery_type {
        DeliveryType::LocalPickup => 0,
        DeliveryType::HomeDelivery => entered_shipping,
    };

    let (client_id, client) = resolve_client(repo, form.client_id, form.client_name)?;
    let items = build_line_items(repo, items_payload)?;
    let (subtotal, discount_total) = totals(&items);
    let total = pricing::order_total(subtotal, discount_total, shipping_cost, delivery_type);

    let mut new_sale = NewSale::new(client, sale_date);
    new_sale.client_id = client_id;
    new_sale.delivery_type = delivery_type;
    new_sale.shipping_cost = shipping_cost;
    new_sale.discount_total = discount_total;
    new_sale.subtotal = subtotal;
    new_sale.total = total;
    new_sale.items = items;
    if let Some(salesperson) = form.salesperson {
        new_sale = new_sale.with_salesperson(salesperson);
    }
    if let Some(notes) = form.notes {
        new_sale = new_sale.with_notes(notes);
    }

    repo.create_sale(&new_sale).map_err(ServiceError::from)
}

/// Moves a sale to the submitted lifecycle state.
pub fn change_sale_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    sale_id: i32,
    form: UpdateSaleStatusForm,
) -> ServiceResult<Sale>
where
    R: SaleWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let updates = UpdateSale::new().status(SaleStatus::from(form.status.as_str()));
    repo.update_sale(sale_id, &updates)
        .map_err(ServiceError::from)
}

/// Deletes a sale.
pub fn remove_sale<R>(repo: &R, user: &AuthenticatedUser, sale_id: i32) -> ServiceResult<()>
where
    R: SaleWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_sale(sale_id).map_err(ServiceError::from)
}

/// Builds the CSV export of the sales listing.
pub fn export_sales_csv<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<String>
where
    R: SaleReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let (_, sales) = repo
        .list_sales(SaleListQuery::new())
        .map_err(ServiceError::from)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "fecha",
        "cliente",
        "vendedor",
        "entrega",
        "subtotal",
        "descuento",
        "envio",
        "total",
        "estado",
    ])?;

    for sale in &sales {
        writer.write_record([
            sale.id.to_string(),
            sale.sale_date.to_string(),
            sale.client.name.clone(),
            sale.salesperson.clone().unwrap_or_default(),
            <&'static str>::from(sale.delivery_type).to_string(),
            sale.subtotal.to_string(),
            sale.discount_total.to_string(),
            sale.shipping_cost.to_string(),
            sale.total.to_string(),
            <&'static str>::from(sale.status).to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::domain::client::ClientSnapshot;
    use crate::repository::mock::MockSaleWriter;

    fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user-1".to_string(),
            email: "user@example.com".to_string(),
            name: "Tester".to_string(),
            roles: roles.iter().map(|role| (*role).to_string()).collect(),
            exp: 0,
        }
    }

    fn echo_sale(new_sale: &NewSale) -> Sale {
        Sale {
            id: 1,
            client_id: new_sale.client_id,
            client: new_sale.client.clone(),
            sale_date: new_sale.sale_date,
            salesperson: new_sale.salesperson.clone(),
            delivery_type: new_sale.delivery_type,
            shipping_cost: new_sale.shipping_cost,
            discount_total: new_sale.discount_total,
            subtotal: new_sale.subtotal,
            total: new_sale.total,
            status: new_sale.status,
            notes: new_sale.notes.clone(),
            items: new_sale.items.clone(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    /// Mock combining the traits `create_sale` needs. Client and product
    /// lookups are unused because the form carries a free-entry client and
    /// manually priced lines.
    struct FreeEntryRepo {
        sales: MockSaleWriter,
    }

    impl SaleWriter for FreeEntryRepo {
        fn create_sale(&self, new_sale: &NewSale) -> crate::repository::errors::RepositoryResult<Sale> {
            self.sales.create_sale(new_sale)
        }
        fn update_sale(
            &self,
            sale_id: i32,
            updates: &UpdateSale,
        ) -> crate::repository::errors::RepositoryResult<Sale> {
            self.sales.update_sale(sale_id, updates)
        }
        fn delete_sale(&self, sale_id: i32) -> crate::repository::errors::RepositoryResult<()> {
            self.sales.delete_sale(sale_id)
        }
    }

    impl ClientReader for FreeEntryRepo {
        fn get_client_by_id(
            &self,
            _id: i32,
        ) -> crate::repository::errors::RepositoryResult<Option<crate::domain::client::Client>>
        {
            Ok(None)
        }
        fn list_clients(
            &self,
            _query: crate::domain::client::ClientListQuery,
        ) -> crate::repository::errors::RepositoryResult<(usize, Vec<crate::domain::client::Client>)>
        {
            Ok((0, Vec::new()))
        }
    }

    impl ProductReader for FreeEntryRepo {
        fn get_product_by_id(
            &self,
            _id: i32,
        ) -> crate::repository::errors::RepositoryResult<Option<crate::domain::product::Product>>
        {
            Ok(None)
        }
        fn list_products(
            &self,
            _query: crate::domain::product::ProductListQuery,
        ) -> crate::repository::errors::RepositoryResult<(usize, Vec<crate::domain::product::Product>)>
        {
            Ok((0, Vec::new()))
        }
    }

    fn pickup_form(shipping: &str) -> AddSaleForm {
        AddSaleForm {
            client_id: None,
            client_name: Some("Mostrador".to_string()),
            sale_date: "2025-05-02".to_string(),
            salesperson: Some("Raúl".to_string()),
            delivery_type: "retiro_local".to_string(),
            shipping_cost: Some(shipping.to_string()),
            notes: None,
            items: r#"[{"name": "Cemento x 50kg", "quantity": 2, "unit_price": 9000}]"#.to_string(),
        }
    }

    #[test]
    fn create_sale_zeroes_shipping_on_pickup() {
        let mut sales = MockSaleWriter::new();
        sales
            .expect_create_sale()
            .times(1)
            .withf(|new_sale| {
                assert_eq!(new_sale.delivery_type, DeliveryType::LocalPickup);
                // the 1500 entered before switching to pickup is discarded
                assert_eq!(new_sale.shipping_cost, 0);
                assert_eq!(new_sale.subtotal, 18000);
                assert_eq!(new_sale.discount_total, 0);
                assert_eq!(new_sale.total, 18000);
                assert_eq!(new_sale.client.name, "Mostrador");
                true
            })
            .returning(|new_sale| Ok(echo_sale(new_sale)));

        let repo = FreeEntryRepo { sales };
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        let sale = create_sale(&repo, &user, pickup_form("1500")).expect("sale should persist");
        assert_eq!(sale.total, 18000);
        assert_eq!(
            sale.client,
            ClientSnapshot {
                name: "Mostrador".to_string(),
                tax_id: None,
                phone: None,
                address: None,
            }
        );
    }

    #[test]
    fn create_sale_charges_shipping_on_delivery() {
        let mut sales = MockSaleWriter::new();
        sales
            .expect_create_sale()
            .times(1)
            .withf(|new_sale| {
                assert_eq!(new_sale.shipping_cost, 1500);
                assert_eq!(new_sale.total, 19500);
                true
            })
            .returning(|new_sale| Ok(echo_sale(new_sale)));

        let repo = FreeEntryRepo { sales };
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        let mut form = pickup_form("1500");
        form.delivery_type = "envio_domicilio".to_string();

        let sale = create_sale(&repo, &user, form).expect("sale should persist");
        assert_eq!(sale.shipping_cost, 1500);
    }

    #[test]
    fn create_sale_requires_service_role() {
        let repo = FreeEntryRepo {
            sales: MockSaleWriter::new(),
        };
        let user = user_with_roles(&[]);

        assert!(matches!(
            create_sale(&repo, &user, pickup_form("0")),
            Err(ServiceError::Unauthorized)
        ));
    }
}
