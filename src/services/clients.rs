use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::client::{Client, ClientListQuery};
use crate::forms::clients::SaveClientForm;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ClientReader, ClientWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the clients index page.
#[derive(Debug, Default, Deserialize)]
pub struct ClientsQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the clients index template.
pub struct ClientsPageData {
    pub clients: Paginated<Client>,
    pub search: Option<String>,
}

/// Loads the clients overview page.
pub fn load_clients_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ClientsQuery,
) -> ServiceResult<ClientsPageData>
where
    R: ClientReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let ClientsQuery { search, page } = query;

    let page = page.unwrap_or(1);
    let mut list_query = ClientListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, items) = repo.list_clients(list_query).map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let clients = Paginated::new(items, page, total_pages);

    Ok(ClientsPageData { clients, search })
}

/// Creates a new client.
pub fn create_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SaveClientForm,
) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_client()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_client(&payload).map_err(ServiceError::from)
}

/// Overwrites an existing client with the submitted fields.
pub fn modify_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
    form: SaveClientForm,
) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_update_client()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_client(client_id, &payload)
        .map_err(ServiceError::from)
}

/// Deletes a client. Documents keep their embedded snapshot.
pub fn remove_client<R>(repo: &R, user: &AuthenticatedUser, client_id: i32) -> ServiceResult<()>
where
    R: ClientWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_client(client_id).map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::pagination::Pagination;
    use crate::repository::mock::{MockClientReader, MockClientWriter};

    fn sample_client(id: i32, name: &str) -> Client {
        Client {
            id,
            name: name.to_string(),
            tax_id: None,
            phone: None,
            email: None,
            address: None,
            locality: None,
            neighborhood: None,
            is_legacy: false,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user-1".to_string(),
            email: "user@example.com".to_string(),
            name: "Tester".to_string(),
            roles: roles.iter().map(|role| (*role).to_string()).collect(),
            exp: 0,
        }
    }

    #[test]
    fn load_clients_page_returns_unauthorized_when_role_missing() {
        let repo = MockClientReader::new();
        let user = user_with_roles(&[]);

        let result = load_clients_page(&repo, &user, ClientsQuery::default());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn load_clients_page_paginates_and_searches() {
        let mut repo = MockClientReader::new();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);
        let query = ClientsQuery {
            search: Some("gar".to_string()),
            page: Some(2),
        };

        repo.expect_list_clients()
            .times(1)
            .withf(|query| {
                assert_eq!(query.search.as_deref(), Some("gar"));
                assert_eq!(
                    query.pagination,
                    Some(Pagination {
                        page: 2,
                        per_page: DEFAULT_ITEMS_PER_PAGE
                    })
                );
                true
            })
            .returning(|_| Ok((30, vec![sample_client(1, "García Hnos.")])));

        let data = match load_clients_page(&repo, &user, query) {
            Ok(data) => data,
            Err(err) => panic!("expected success, got error: {err}"),
        };

        assert_eq!(data.clients.page, 2);
        assert_eq!(data.clients.total_pages, 2);
        assert_eq!(data.clients.items.len(), 1);
        assert_eq!(data.search.as_deref(), Some("gar"));
    }

    #[test]
    fn create_client_requires_service_role() {
        let repo = MockClientWriter::new();
        let user = user_with_roles(&[]);

        let form = SaveClientForm {
            name: "Nuevo".to_string(),
            tax_id: None,
            phone: None,
            email: None,
            address: None,
            locality: None,
            neighborhood: None,
            is_legacy: false,
        };

        assert!(matches!(
            create_client(&repo, &user, form),
            Err(ServiceError::Unauthorized)
        ));
    }
}
