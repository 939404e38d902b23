use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::expense::{ExpenseKind, ExpenseListQuery, PayableStatus};
use crate::domain::sale::{Sale, SaleListQuery};
use crate::domain::shipment::{ShipmentListQuery, ShipmentStatus};
use crate::repository::{ExpenseReader, SaleReader, ShipmentReader};
use crate::services::{ServiceError, ServiceResult};

/// Number of sales shown on the dashboard.
const RECENT_SALES: usize = 10;

/// Data required to render the dashboard template.
pub struct IndexPageData {
    pub recent_sales: Vec<Sale>,
    /// Payables not fully paid yet.
    pub open_payables: usize,
    /// Shipments that have not reached the customer.
    pub open_shipments: usize,
}

/// Loads the dashboard: latest sales plus headline counters.
pub fn load_index_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<IndexPageData>
where
    R: SaleReader + ExpenseReader + ShipmentReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let (_, recent_sales) = repo
        .list_sales(SaleListQuery::new().paginate(1, RECENT_SALES))
        .map_err(ServiceError::from)?;

    let mut open_payables = 0usize;
    for status in [PayableStatus::Pending, PayableStatus::Partial] {
        let (total, _) = repo
            .list_expenses(
                ExpenseListQuery::new()
                    .kind(ExpenseKind::Payable)
                    .status(status)
                    .paginate(1, 1),
            )
            .map_err(ServiceError::from)?;
        open_payables += total;
    }

    let mut open_shipments = 0usize;
    for status in [
        ShipmentStatus::Pending,
        ShipmentStatus::Preparing,
        ShipmentStatus::OnTheWay,
    ] {
        let (total, _) = repo
            .list_shipments(ShipmentListQuery::new().status(status).paginate(1, 1))
            .map_err(ServiceError::from)?;
        open_shipments += total;
    }

    Ok(IndexPageData {
        recent_sales,
        open_payables,
        open_shipments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::client::ClientSnapshot;
    use crate::domain::expense::Expense;
    use crate::domain::sale::{DeliveryType, SaleStatus};
    use crate::domain::shipment::Shipment;
    use crate::repository::errors::RepositoryResult;

    fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user-1".to_string(),
            email: "user@example.com".to_string(),
            name: "Tester".to_string(),
            roles: roles.iter().map(|role| (*role).to_string()).collect(),
            exp: 0,
        }
    }

    fn sample_sale(id: i32) -> Sale {
        Sale {
            id,
            client_id: None,
            client: ClientSnapshot {
                name: "Mostrador".to_string(),
                tax_id: None,
                phone: None,
                address: None,
            },
            sale_date: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap_or_default(),
            salesperson: None,
            delivery_type: DeliveryType::LocalPickup,
            shipping_cost: 0,
            discount_total: 0,
            subtotal: 1000,
            total: 1000,
            status: SaleStatus::Pending,
            notes: None,
            items: Vec::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    struct DashboardRepo;

    impl SaleReader for DashboardRepo {
        fn get_sale_by_id(&self, _id: i32) -> RepositoryResult<Option<Sale>> {
            Ok(None)
        }
        fn list_sales(&self, query: SaleListQuery) -> RepositoryResult<(usize, Vec<Sale>)> {
            assert_eq!(query.pagination.map(|p| p.per_page), Some(RECENT_SALES));
            Ok((2, vec![sample_sale(2), sample_sale(1)]))
        }
    }

    impl ExpenseReader for DashboardRepo {
        fn get_expense_by_id(&self, _id: i32) -> RepositoryResult<Option<Expense>> {
            Ok(None)
        }
        fn list_expenses(
            &self,
            query: ExpenseListQuery,
        ) -> RepositoryResult<(usize, Vec<Expense>)> {
            let total = match query.status {
                Some(PayableStatus::Pending) => 3,
                Some(PayableStatus::Partial) => 1,
                _ => 0,
            };
            Ok((total, Vec::new()))
        }
    }

    impl ShipmentReader for DashboardRepo {
        fn get_shipment_by_id(&self, _id: i32) -> RepositoryResult<Option<Shipment>> {
            Ok(None)
        }
        fn list_shipments(
            &self,
            query: ShipmentListQuery,
        ) -> RepositoryResult<(usize, Vec<Shipment>)> {
            let total = match query.status {
                Some(ShipmentStatus::Pending) => 2,
                Some(ShipmentStatus::OnTheWay) => 1,
                _ => 0,
            };
            Ok((total, Vec::new()))
        }
    }

    #[test]
    fn load_index_page_requires_service_role() {
        let user = user_with_roles(&[]);
        assert!(matches!(
            load_index_page(&DashboardRepo, &user),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn load_index_page_aggregates_counters() {
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        let data = match load_index_page(&DashboardRepo, &user) {
            Ok(data) => data,
            Err(err) => panic!("expected success, got error: {err}"),
        };

        assert_eq!(data.recent_sales.len(), 2);
        assert_eq!(data.open_payables, 4);
        assert_eq!(data.open_shipments, 3);
    }
}
