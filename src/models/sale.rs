use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::client::ClientSnapshot;
use crate::domain::line_item::{CutDetail, LineItem};
use crate::domain::sale::{
    NewSale as DomainNewSale, Sale as DomainSale, UpdateSale as DomainUpdateSale,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::sales)]
pub struct Sale {
    pub id: i32,
    pub client_id: Option<i32>,
    pub client_name: String,
    pub client_tax_id: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub sale_date: NaiveDate,
    pub salesperson: Option<String>,
    pub delivery_type: String,
    pub shipping_cost: i64,
    pub discount_total: i64,
    pub subtotal: i64,
    pub total: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::sale_items)]
#[diesel(belongs_to(Sale, foreign_key = sale_id))]
pub struct SaleItem {
    pub id: i32,
    pub sale_id: i32,
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
#[diesel(table_name = crate::schema::sales)]
pub struct NewSale<'a> {
    pub client_id: Option<i32>,
    pub client_name: &'a str,
    pub client_tax_id: Option<&'a str>,
    pub client_phone: Option<&'a str>,
    pub client_address: Option<&'a str>,
    pub sale_date: NaiveDate,
    pub salesperson: Option<&'a str>,
    pub delivery_type: &'a str,
    pub shipping_cost: i64,
    pub discount_total: i64,
    pub subtotal: i64,
    pub total: i64,
    pub status: &'a str,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sale_items)]
pub struct NewSaleItem<'a> {
    pub sale_id: i32,
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
#[diesel(table_name = crate::schema::sales)]
pub struct UpdateSale<'a> {
    pub status: Option<&'a str>,
    pub notes: Option<Option<&'a str>>,
    pub updated_at: NaiveDateTime,
}

impl Sale {
    pub fn into_domain(self, items: Vec<SaleItem>) -> DomainSale {
        DomainSale {
            id: self.id,
            client_id: self.client_id,
            client: ClientSnapshot {
                name: self.client_name,
                tax_id: self.client_tax_id,
                phone: self.client_phone,
                address: self.client_address,
            },
            sale_date: self.sale_date,
            salesperson: self.salesperson,
            delivery_type: self.delivery_type.as_str().into(),
            shipping_cost: self.shipping_cost,
            discount_total: self.discount_total,
            subtotal: self.subtotal,
            total: self.total,
            status: self.status.as_str().into(),
            notes: self.notes,
            items: items.into_iter().map(SaleItem::into_domain).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl SaleItem {
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

impl<'a> From<&'a DomainNewSale> for NewSale<'a> {
    fn from(value: &'a DomainNewSale) -> Self {
        Self {
            client_id: value.client_id,
            client_name: value.client.name.as_str(),
            client_tax_id: value.client.tax_id.as_deref(),
            client_phone: value.client.phone.as_deref(),
            client_address: value.client.address.as_deref(),
            sale_date: value.sale_date,
            salesperson: value.salesperson.as_deref(),
            delivery_type: value.delivery_type.into(),
            shipping_cost: value.shipping_cost,
            discount_total: value.discount_total,
            subtotal: value.subtotal,
            total: value.total,
            status: value.status.into(),
            notes: value.notes.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewSaleItem<'a> {
    pub fn from_domain(sale_id: i32, value: &'a LineItem) -> Self {
        Self {
            sale_id,
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

impl<'a> From<&'a DomainUpdateSale> for UpdateSale<'a> {
    fn from(value: &'a DomainUpdateSale) -> Self {
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
