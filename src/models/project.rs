use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::client::ClientSnapshot;
use crate::domain::line_item::{CutDetail, LineItem};
use crate::domain::project::{
    NewProject as DomainNewProject, Project as DomainProject, UpdateProject as DomainUpdateProject,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::projects)]
pub struct Project {
    pub id: i32,
    pub client_id: Option<i32>,
    pub client_name: String,
    pub client_tax_id: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub quote_id: Option<i32>,
    pub start_date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
    pub total: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::project_items)]
#[diesel(belongs_to(Project, foreign_key = project_id))]
pub struct ProjectItem {
    pub id: i32,
    pub project_id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    pub category: String,
    pub unit: Option<String>,
    pub quantity: f64,
    pub discount_percent: f64,
    pub unit_price: i64,
    pub subtotal: i64,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub price_per_foot: Option<i64>,
    pub planed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::projects)]
pub struct NewProject<'a> {
    pub client_id: Option<i32>,
    pub client_name: &'a str,
    pub client_tax_id: Option<&'a str>,
    pub client_phone: Option<&'a str>,
    pub client_address: Option<&'a str>,
    pub quote_id: Option<i32>,
    pub start_date: NaiveDate,
    pub status: &'a str,
    pub notes: Option<&'a str>,
    pub total: i64,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::project_items)]
pub struct NewProjectItem<'a> {
    pub project_id: i32,
    pub product_id: Option<i32>,
    pub name: &'a str,
    pub category: &'a str,
    pub unit: Option<&'a str>,
    pub quantity: f64,
    pub discount_percent: f64,
    pub unit_price: i64,
    pub subtotal: i64,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub price_per_foot: Option<i64>,
    pub planed: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::projects)]
pub struct UpdateProject<'a> {
    pub status: Option<&'a str>,
    pub notes: Option<Option<&'a str>>,
    pub updated_at: NaiveDateTime,
}

impl Project {
    pub fn into_domain(self, items: Vec<ProjectItem>) -> DomainProject {
        DomainProject {
            id: self.id,
            client_id: self.client_id,
            client: ClientSnapshot {
                name: self.client_name,
                tax_id: self.client_tax_id,
                phone: self.client_phone,
                address: self.client_address,
            },
            quote_id: self.quote_id,
            start_date: self.start_date,
            status: self.status.as_str().into(),
            notes: self.notes,
            total: self.total,
            items: items.into_iter().map(ProjectItem::into_domain).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ProjectItem {
    pub fn into_domain(self) -> LineItem {
        let cut = match (self.height, self.width, self.length, self.price_per_foot) {
            (Some(height), Some(width), Some(length), Some(price_per_foot)) => Some(CutDetail {
                height,
                width,
                length,
                price_per_foot,
                planed: self.planed,
            }),
            _ => None,
        };

        LineItem {
            product_id: self.product_id,
            name: self.name,
            category: self.category.as_str().into(),
            unit: self.unit,
            quantity: self.quantity,
            discount_percent: self.discount_percent,
            unit_price: self.unit_price,
            subtotal: self.subtotal,
            cut,
        }
    }
}

impl<'a> From<&'a DomainNewProject> for NewProject<'a> {
    fn from(value: &'a DomainNewProject) -> Self {
        Self {
            client_id: value.client_id,
            client_name: value.client.name.as_str(),
            client_tax_id: value.client.tax_id.as_deref(),
            client_phone: value.client.phone.as_deref(),
            client_address: value.client.address.as_deref(),
            quote_id: value.quote_id,
            start_date: value.start_date,
            status: value.status.into(),
            notes: value.notes.as_deref(),
            total: value.total,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewProjectItem<'a> {
    pub fn from_domain(project_id: i32, value: &'a LineItem) -> Self {
        Self {
            project_id,
            product_id: value.product_id,
            name: value.name.as_str(),
            category: value.category.into(),
            unit: value.unit.as_deref(),
            quantity: value.quantity,
            discount_percent: value.discount_percent,
            unit_price: value.unit_price,
            subtotal: value.subtotal,
            height: value.cut.as_ref().map(|cut| cut.height),
            width: value.cut.as_ref().map(|cut| cut.width),
            length: value.cut.as_ref().map(|cut| cut.length),
            price_per_foot: value.cut.as_ref().map(|cut| cut.price_per_foot),
            planed: value.cut.as_ref().map(|cut| cut.planed).unwrap_or(false),
        }
    }
}

impl<'a> From<&'a DomainUpdateProject> for UpdateProject<'a> {
    fn from(value: &'a DomainUpdateProject) -> Self {
        Self {
            status: value.status.map(|status| status.into()),
            notes: value
                .notes
                .as_ref()
                .map(|notes| notes.as_ref().map(String::as_str)),
            updated_at: value.updated_at,
        }
    }
}
