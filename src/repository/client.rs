use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, ClientListQuery, NewClient as DomainNewClient,
    UpdateClient as DomainUpdateClient,
};
use crate::models::client::{Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient};
use crate::repository::errors::RepositoryError;
use crate::repository::{ClientReader, ClientWriter, DieselRepository, errors::RepositoryResult};
use crate::search;

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: i32) -> RepositoryResult<Option<DomainClient>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let client = clients::table
            .filter(clients::id.eq(id))
            .first::<DbClient>(&mut conn)
            .optional()?;

        Ok(client.map(DomainClient::from))
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<DomainClient>)> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let ClientListQuery { search, pagination } = query;

        let search_pattern = search
            .as_deref()
            .map(|term| format!("%{}%", search::normalize(term)));

        let mut count_query = clients::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(clients::search_name.like(pattern.clone()));
        }
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = clients::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            items = items.filter(clients::search_name.like(pattern.clone()));
        }

        items = items.order(clients::name.asc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let db_clients = items.load::<DbClient>(&mut conn)?;

        Ok((
            total,
            db_clients.into_iter().map(DomainClient::from).collect(),
        ))
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &DomainNewClient) -> RepositoryResult<DomainClient> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(clients::table)
            .values(&DbNewClient::from(new_client))
            .get_result::<DbClient>(&mut conn)?;

        Ok(created.into())
    }

    fn update_client(
        &self,
        client_id: i32,
        updates: &DomainUpdateClient,
    ) -> RepositoryResult<DomainClient> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let updated = diesel::update(clients::table.filter(clients::id.eq(client_id)))
            .set(&DbUpdateClient::from(updates))
            .get_result::<DbClient>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_client(&self, client_id: i32) -> RepositoryResult<()> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(clients::table.filter(clients::id.eq(client_id)))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
