use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::shipment::{
    NewShipment as DomainNewShipment, Shipment as DomainShipment,
    ShipmentEvent as DomainShipmentEvent,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::shipments)]
pub struct Shipment {
    pub id: i32,
    pub sale_id: i32,
    pub address: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::shipment_events)]
#[diesel(belongs_to(Shipment, foreign_key = shipment_id))]
pub struct ShipmentEvent {
    pub id: i32,
    pub shipment_id: i32,
    pub status: String,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shipments)]
pub struct NewShipment<'a> {
    pub sale_id: i32,
    pub address: Option<&'a str>,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shipment_events)]
pub struct NewShipmentEvent<'a> {
    pub shipment_id: i32,
    pub status: &'a str,
    pub comment: Option<&'a str>,
}

/// Changeset written when the shipment advances; always together with the
/// event insert, inside one transaction.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::shipments)]
pub struct AdvanceShipment<'a> {
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

impl Shipment {
    pub fn into_domain(self, events: Vec<ShipmentEvent>) -> DomainShipment {
        DomainShipment {
            id: self.id,
            sale_id: self.sale_id,
            address: self.address,
            status: self.status.as_str().into(),
            events: events.into_iter().map(ShipmentEvent::into_domain).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ShipmentEvent {
    pub fn into_domain(self) -> DomainShipmentEvent {
        DomainShipmentEvent {
            status: self.status.as_str().into(),
            comment: self.comment,
            created_at: self.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewShipment> for NewShipment<'a> {
    fn from(value: &'a DomainNewShipment) -> Self {
        Self {
            sale_id: value.sale_id,
            address: value.address.as_deref(),
            status: value.status.into(),
            updated_at: value.updated_at,
        }
    }
}
