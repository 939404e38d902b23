use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::shipment::{
    NewShipment as DomainNewShipment, NewShipmentEvent as DomainNewShipmentEvent,
    Shipment as DomainShipment, ShipmentListQuery,
};
use crate::models::shipment::{
    AdvanceShipment, NewShipment as DbNewShipment, NewShipmentEvent as DbNewShipmentEvent,
    Shipment as DbShipment, ShipmentEvent as DbShipmentEvent,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ShipmentReader, ShipmentWriter};

impl ShipmentReader for DieselRepository {
    fn get_shipment_by_id(&self, id: i32) -> RepositoryResult<Option<DomainShipment>> {
        use crate::schema::{shipment_events, shipments};

        let mut conn = self.conn()?;
        let shipment = shipments::table
            .filter(shipments::id.eq(id))
            .first::<DbShipment>(&mut conn)
            .optional()?;

        let Some(shipment) = shipment else {
            return Ok(None);
        };

        let shipment_id = shipment.id;
        let events = shipment_events::table
            .filter(shipment_events::shipment_id.eq(shipment_id))
            .order(shipment_events::id.asc())
            .load::<DbShipmentEvent>(&mut conn)?;

        Ok(Some(shipment.into_domain(events)))
    }

    fn list_shipments(
        &self,
        query: ShipmentListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainShipment>)> {
        use crate::schema::{shipment_events, shipments};

        let mut conn = self.conn()?;

        let ShipmentListQuery {
            status,
            sale_id,
            pagination,
        } = query;

        let status_filter = status.map(|status| <&'static str>::from(status).to_string());

        let mut count_query = shipments::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref status_value) = status_filter {
            count_query = count_query.filter(shipments::status.eq(status_value.as_str()));
        }
        if let Some(sale) = sale_id {
            count_query = count_query.filter(shipments::sale_id.eq(sale));
        }
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = shipments::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref status_value) = status_filter {
            items = items.filter(shipments::status.eq(status_value.as_str()));
        }
        if let Some(sale) = sale_id {
            items = items.filter(shipments::sale_id.eq(sale));
        }

        items = items.order(shipments::created_at.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let db_shipments = items.load::<DbShipment>(&mut conn)?;
        if db_shipments.is_empty() {
            return Ok((total, Vec::new()));
        }

        let shipment_ids: Vec<i32> = db_shipments.iter().map(|shipment| shipment.id).collect();

        let rows = shipment_events::table
            .filter(shipment_events::shipment_id.eq_any(&shipment_ids))
            .order(shipment_events::id.asc())
            .load::<DbShipmentEvent>(&mut conn)?;

        let mut events_by_shipment: HashMap<i32, Vec<DbShipmentEvent>> = HashMap::new();
        for event in rows {
            events_by_shipment
                .entry(event.shipment_id)
                .or_default()
                .push(event);
        }

        let shipments = db_shipments
            .into_iter()
            .map(|shipment| {
                let shipment_id = shipment.id;
                let events = events_by_shipment.remove(&shipment_id).unwrap_or_default();
                shipment.into_domain(events)
            })
            .collect();

        Ok((total, shipments))
    }
}

impl ShipmentWriter for DieselRepository {
    fn create_shipment(&self, new_shipment: &DomainNewShipment) -> RepositoryResult<DomainShipment> {
        use crate::schema::{shipment_events, shipments};

        let mut conn = self.conn()?;

        // A shipment starts its history with an event for the initial state.
        conn.transaction::<DomainShipment, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(shipments::table)
                .values(&DbNewShipment::from(new_shipment))
                .get_result::<DbShipment>(conn)?;

            let shipment_id = created.id;

            diesel::insert_into(shipment_events::table)
                .values(&DbNewShipmentEvent {
                    shipment_id,
                    status: new_shipment.status.into(),
                    comment: None,
                })
                .execute(conn)?;

            let events = shipment_events::table
                .filter(shipment_events::shipment_id.eq(shipment_id))
                .order(shipment_events::id.asc())
                .load::<DbShipmentEvent>(conn)?;

            Ok(created.into_domain(events))
        })
    }

    fn advance_shipment(
        &self,
        shipment_id: i32,
        event: &DomainNewShipmentEvent,
    ) -> RepositoryResult<DomainShipment> {
        use crate::schema::{shipment_events, shipments};

        let mut conn = self.conn()?;

        // Event append and status update must land together.
        conn.transaction::<DomainShipment, RepositoryError, _>(|conn| {
            let exists = shipments::table
                .filter(shipments::id.eq(shipment_id))
                .first::<DbShipment>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(RepositoryError::NotFound);
            }

            diesel::insert_into(shipment_events::table)
                .values(&DbNewShipmentEvent {
                    shipment_id,
                    status: event.status.into(),
                    comment: event.comment.as_deref(),
                })
                .execute(conn)?;

            let updated = diesel::update(shipments::table.filter(shipments::id.eq(shipment_id)))
                .set(&AdvanceShipment {
                    status: event.status.into(),
                    updated_at: chrono::Local::now().naive_utc(),
                })
                .get_result::<DbShipment>(conn)?;

            let events = shipment_events::table
                .filter(shipment_events::shipment_id.eq(shipment_id))
                .order(shipment_events::id.asc())
                .load::<DbShipmentEvent>(conn)?;

            Ok(updated.into_domain(events))
        })
    }

    fn delete_shipment(&self, shipment_id: i32) -> RepositoryResult<()> {
        use crate::schema::shipments;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(shipments::table.filter(shipments::id.eq(shipment_id)))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
