use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::shipment::{
    NewShipment, NewShipmentEvent, Shipment, ShipmentListQuery, ShipmentStatus,
};
use crate::forms::shipments::{AddShipmentForm, AdvanceShipmentForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{SaleReader, ShipmentReader, ShipmentWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the shipments index page.
#[derive(Debug, Default, Deserialize)]
pub struct ShipmentsQuery {
    pub status: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the shipments index template.
pub struct ShipmentsPageData {
    pub shipments: Paginated<Shipment>,
    pub status: Option<String>,
}

/// Loads the shipments overview page.
pub fn load_shipments_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ShipmentsQuery,
) -> ServiceResult<ShipmentsPageData>
where
    R: ShipmentReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let ShipmentsQuery { status, page } = query;

    let page = page.unwrap_or(1);
    let mut list_query = ShipmentListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(status_value) = status.as_deref().filter(|value| !value.is_empty()) {
        list_query = list_query.status(ShipmentStatus::from(status_value));
    }

    let (total, items) = repo.list_shipments(list_query).map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let shipments = Paginated::new(items, page, total_pages);

    Ok(ShipmentsPageData { shipments, status })
}

/// Creates a shipment for a sale. When the form carries no address, the
/// sale's embedded client address is used.
pub fn create_shipment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddShipmentForm,
) -> ServiceResult<Shipment>
where
    R: ShipmentWriter + SaleReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let sale = repo
        .get_sale_by_id(form.sale_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let address = form.address.or(sale.client.address);

    let mut new_shipment = NewShipment::new(sale.id);
    if let Some(address) = address {
        new_shipment = new_shipment.with_address(address);
    }

    repo.create_shipment(&new_shipment)
        .map_err(ServiceError::from)
}

/// Advances a shipment, appending a state-history event and updating the
/// current status in one repository transaction.
pub fn advance_shipment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    shipment_id: i32,
    form: AdvanceShipmentForm,
) -> ServiceResult<Shipment>
where
    R: ShipmentWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let mut event = NewShipmentEvent::new(ShipmentStatus::from(form.status.as_str()));
    if let Some(comment) = form.comment {
        event = event.with_comment(comment);
    }

    repo.advance_shipment(shipment_id, &event)
        .map_err(ServiceError::from)
}

/// Deletes a shipment together with its state history.
pub fn remove_shipment<R>(repo: &R, user: &AuthenticatedUser, shipment_id: i32) -> ServiceResult<()>
where
    R: ShipmentWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_shipment(shipment_id).map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::client::ClientSnapshot;
    use crate::domain::sale::{DeliveryType, Sale, SaleListQuery, SaleStatus};
    use crate::repository::errors::RepositoryResult;
    use crate::repository::mock::MockShipmentWriter;

    fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user-1".to_string(),
            email: "user@example.com".to_string(),
            name: "Tester".to_string(),
            roles: roles.iter().map(|role| (*role).to_string()).collect(),
            exp: 0,
        }
    }

    fn sample_sale(id: i32, address: Option<&str>) -> Sale {
        Sale {
            id,
            client_id: Some(1),
            client: ClientSnapshot {
                name: "García Hnos.".to_string(),
                tax_id: None,
                phone: None,
                address: address.map(str::to_string),
            },
            sale_date: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap_or_default(),
            salesperson: None,
            delivery_type: DeliveryType::HomeDelivery,
            shipping_cost: 2000,
            discount_total: 0,
            subtotal: 50000,
            total: 52000,
            status: SaleStatus::Pending,
            notes: None,
            items: Vec::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    struct ShipmentRepo {
        sale: Sale,
        writer: MockShipmentWriter,
    }

    impl SaleReader for ShipmentRepo {
        fn get_sale_by_id(&self, _id: i32) -> RepositoryResult<Option<Sale>> {
            Ok(Some(self.sale.clone()))
        }
        fn list_sales(&self, _query: SaleListQuery) -> RepositoryResult<(usize, Vec<Sale>)> {
            Ok((0, Vec::new()))
        }
    }

    impl ShipmentWriter for ShipmentRepo {
        fn create_shipment(&self, new_shipment: &NewShipment) -> RepositoryResult<Shipment> {
            self.writer.create_shipment(new_shipment)
        }
        fn advance_shipment(
            &self,
            shipment_id: i32,
            event: &NewShipmentEvent,
        ) -> RepositoryResult<Shipment> {
            self.writer.advance_shipment(shipment_id, event)
        }
        fn delete_shipment(&self, shipment_id: i32) -> RepositoryResult<()> {
            self.writer.delete_shipment(shipment_id)
        }
    }

    fn echo_shipment(new_shipment: &NewShipment) -> Shipment {
        Shipment {
            id: 1,
            sale_id: new_shipment.sale_id,
            address: new_shipment.address.clone(),
            status: new_shipment.status,
            events: Vec::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn create_shipment_falls_back_to_the_sale_address() {
        let mut writer = MockShipmentWriter::new();
        writer
            .expect_create_shipment()
            .times(1)
            .withf(|new_shipment| {
                assert_eq!(new_shipment.address.as_deref(), Some("Calle 12 n° 340"));
                assert_eq!(new_shipment.status, ShipmentStatus::Pending);
                true
            })
            .returning(|new_shipment| Ok(echo_shipment(new_shipment)));

        let repo = ShipmentRepo {
            sale: sample_sale(9, Some("Calle 12 n° 340")),
            writer,
        };
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        let form = AddShipmentForm {
            sale_id: 9,
            address: None,
        };

        let shipment = create_shipment(&repo, &user, form).expect("shipment should persist");
        assert_eq!(shipment.sale_id, 9);
    }

    #[test]
    fn advance_shipment_passes_status_and_comment() {
        let mut writer = MockShipmentWriter::new();
        writer
            .expect_advance_shipment()
            .times(1)
            .withf(|shipment_id, event| {
                assert_eq!(*shipment_id, 3);
                assert_eq!(event.status, ShipmentStatus::OnTheWay);
                assert_eq!(event.comment.as_deref(), Some("Salió con el camión chico"));
                true
            })
            .returning(|shipment_id, event| {
                Ok(Shipment {
                    id: shipment_id,
                    sale_id: 9,
                    address: None,
                    status: event.status,
                    events: Vec::new(),
                    created_at: NaiveDateTime::default(),
                    updated_at: NaiveDateTime::default(),
                })
            });

        let repo = ShipmentRepo {
            sale: sample_sale(9, None),
            writer,
        };
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        let form = AdvanceShipmentForm {
            status: "en_camino".to_string(),
            comment: Some("Salió con el camión chico".to_string()),
        };

        let shipment = advance_shipment(&repo, &user, 3, form).expect("advance should persist");
        assert_eq!(shipment.status, ShipmentStatus::OnTheWay);
    }
}
