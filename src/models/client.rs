use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, NewClient as DomainNewClient, UpdateClient as DomainUpdateClient,
};
use crate::search;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub search_name: String,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub locality: Option<String>,
    pub neighborhood: Option<String>,
    pub is_legacy: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
pub struct NewClient<'a> {
    pub name: &'a str,
    pub search_name: String,
    pub tax_id: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub locality: Option<&'a str>,
    pub neighborhood: Option<&'a str>,
    pub is_legacy: bool,
    pub updated_at: NaiveDateTime,
}

/// Full-overwrite changeset; `None` writes NULL.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateClient<'a> {
    pub name: &'a str,
    pub search_name: String,
    pub tax_id: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub locality: Option<&'a str>,
    pub neighborhood: Option<&'a str>,
    pub is_legacy: bool,
    pub updated_at: NaiveDateTime,
}

impl From<Client> for DomainClient {
    fn from(value: Client) -> Self {
        Self {
            id: value.id,
            name: value.name,
            tax_id: value.tax_id,
            phone: value.phone,
            email: value.email,
            address: value.address,
            locality: value.locality,
            neighborhood: value.neighborhood,
            is_legacy: value.is_legacy,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewClient> for NewClient<'a> {
    fn from(value: &'a DomainNewClient) -> Self {
        Self {
            name: value.name.as_str(),
            search_name: search::normalize(&value.name),
            tax_id: value.tax_id.as_deref(),
            phone: value.phone.as_deref(),
            email: value.email.as_deref(),
            address: value.address.as_deref(),
            locality: value.locality.as_deref(),
            neighborhood: value.neighborhood.as_deref(),
            is_legacy: value.is_legacy,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateClient> for UpdateClient<'a> {
    fn from(value: &'a DomainUpdateClient) -> Self {
        Self {
            name: value.name.as_str(),
            search_name: search::normalize(&value.name),
            tax_id: value.tax_id.as_deref(),
            phone: value.phone.as_deref(),
            email: value.email.as_deref(),
            address: value.address.as_deref(),
            locality: value.locality.as_deref(),
            neighborhood: value.neighborhood.as_deref(),
            is_legacy: value.is_legacy,
            updated_at: value.updated_at,
        }
    }
}
