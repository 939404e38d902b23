use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};
use crate::search;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub search_name: String,
    pub category: String,
    pub unit: Option<String>,
    pub stock: f64,
    pub price_per_foot: Option<i64>,
    pub price_per_m2: Option<i64>,
    pub price_per_m: Option<i64>,
    pub sale_price: Option<i64>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub search_name: String,
    pub category: &'a str,
    pub unit: Option<&'a str>,
    pub stock: f64,
    pub price_per_foot: Option<i64>,
    pub price_per_m2: Option<i64>,
    pub price_per_m: Option<i64>,
    pub sale_price: Option<i64>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub updated_at: NaiveDateTime,
}

/// Full-overwrite changeset; `None` writes NULL.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProduct<'a> {
    pub name: &'a str,
    pub search_name: String,
    pub category: &'a str,
    pub unit: Option<&'a str>,
    pub stock: f64,
    pub price_per_foot: Option<i64>,
    pub price_per_m2: Option<i64>,
    pub price_per_m: Option<i64>,
    pub sale_price: Option<i64>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub updated_at: NaiveDateTime,
}

/// Changeset used by the global percentage price update.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct RepriceProduct {
    pub price_per_foot: Option<i64>,
    pub price_per_m2: Option<i64>,
    pub price_per_m: Option<i64>,
    pub sale_price: Option<i64>,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            name: value.name,
            category: value.category.as_str().into(),
            unit: value.unit,
            stock: value.stock,
            price_per_foot: value.price_per_foot,
            price_per_m2: value.price_per_m2,
            price_per_m: value.price_per_m,
            sale_price: value.sale_price,
            height: value.height,
            width: value.width,
            length: value.length,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            name: value.name.as_str(),
            search_name: search::normalize(&value.name),
            category: value.category.into(),
            unit: value.unit.as_deref(),
            stock: value.stock,
            price_per_foot: value.price_per_foot,
            price_per_m2: value.price_per_m2,
            price_per_m: value.price_per_m,
            sale_price: value.sale_price,
            height: value.height,
            width: value.width,
            length: value.length,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            name: value.name.as_str(),
            search_name: search::normalize(&value.name),
            category: value.category.into(),
            unit: value.unit.as_deref(),
            stock: value.stock,
            price_per_foot: value.price_per_foot,
            price_per_m2: value.price_per_m2,
            price_per_m: value.price_per_m,
            sale_price: value.sale_price,
            height: value.height,
            width: value.width,
            length: value.length,
            updated_at: value.updated_at,
        }
    }
}
