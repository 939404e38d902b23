use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::sale::{
    NewSale as DomainNewSale, Sale as DomainSale, SaleListQuery, UpdateSale as DomainUpdateSale,
};
use crate::models::sale::{
    NewSale as DbNewSale, NewSaleItem as DbNewSaleItem, Sale as DbSale, SaleItem as DbSaleItem,
    UpdateSale as DbUpdateSale,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, SaleReader, SaleWriter};
use crate::search;

impl SaleReader for DieselRepository {
    fn get_sale_by_id(&self, id: i32) -> RepositoryResult<Option<DomainSale>> {
        use crate::schema::{sale_items, sales};

        let mut conn = self.conn()?;
        let sale = sales::table
            .filter(sales::id.eq(id))
            .first::<DbSale>(&mut conn)
            .optional()?;

        let Some(sale) = sale else {
            return Ok(None);
        };

        let sale_id = sale.id;
        let items = sale_items::table
            .filter(sale_items::sale_id.eq(sale_id))
            .order(sale_items::id.asc())
            .load::<DbSaleItem>(&mut conn)?;

        Ok(Some(sale.into_domain(items)))
    }

    fn list_sales(&self, query: SaleListQuery) -> RepositoryResult<(usize, Vec<DomainSale>)> {
        use crate::schema::{sale_items, sales};

        let mut conn = self.conn()?;

        let SaleListQuery {
            search,
            status,
            pagination,
        } = query;

        let search_pattern = search
            .as_deref()
            .map(|term| format!("%{}%", search::normalize(term)));
        let status_filter = status.map(|status| <&'static str>::from(status).to_string());

        let mut count_query = sales::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(sales::client_name.like(pattern.clone()));
        }
        if let Some(ref status_value) = status_filter {
            count_query = count_query.filter(sales::status.eq(status_value.as_str()));
        }
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = sales::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            items = items.filter(sales::client_name.like(pattern.clone()));
        }
        if let Some(ref status_value) = status_filter {
            items = items.filter(sales::status.eq(status_value.as_str()));
        }

        items = items.order(sales::sale_date.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let db_sales = items.load::<DbSale>(&mut conn)?;
        if db_sales.is_empty() {
            return Ok((total, Vec::new()));
        }

        let sale_ids: Vec<i32> = db_sales.iter().map(|sale| sale.id).collect();

        let rows = sale_items::table
            .filter(sale_items::sale_id.eq_any(&sale_ids))
            .order(sale_items::id.asc())
            .load::<DbSaleItem>(&mut conn)?;

        let mut items_by_sale: HashMap<i32, Vec<DbSaleItem>> = HashMap::new();
        for item in rows {
            items_by_sale.entry(item.sale_id).or_default().push(item);
        }

        let sales = db_sales
            .into_iter()
            .map(|sale| {
                let sale_id = sale.id;
                let items = items_by_sale.remove(&sale_id).unwrap_or_default();
                sale.into_domain(items)
            })
            .collect();

        Ok((total, sales))
    }
}

impl SaleWriter for DieselRepository {
    fn create_sale(&self, new_sale: &DomainNewSale) -> RepositoryResult<DomainSale> {
        use crate::schema::{sale_items, sales};

        let mut conn = self.conn()?;

        conn.transaction::<DomainSale, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(sales::table)
                .values(&DbNewSale::from(new_sale))
                .get_result::<DbSale>(conn)?;

            let sale_id = created.id;

            if !new_sale.items.is_empty() {
                let payload: Vec<DbNewSaleItem> = new_sale
                    .items
                    .iter()
                    .map(|item| DbNewSaleItem::from_domain(sale_id, item))
                    .collect();

                diesel::insert_into(sale_items::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            let items = sale_items::table
                .filter(sale_items::sale_id.eq(sale_id))
                .order(sale_items::id.asc())
                .load::<DbSaleItem>(conn)?;

            Ok(created.into_domain(items))
        })
    }

    fn update_sale(&self, sale_id: i32, updates: &DomainUpdateSale) -> RepositoryResult<DomainSale> {
        use crate::schema::{sale_items, sales};

        let mut conn = self.conn()?;

        let updated = diesel::update(sales::table.filter(sales::id.eq(sale_id)))
            .set(&DbUpdateSale::from(updates))
            .get_result::<DbSale>(&mut conn)?;

        let items = sale_items::table
            .filter(sale_items::sale_id.eq(sale_id))
            .order(sale_items::id.asc())
            .load::<DbSaleItem>(&mut conn)?;

        Ok(updated.into_domain(items))
    }

    fn delete_sale(&self, sale_id: i32) -> RepositoryResult<()> {
        use crate::schema::sales;

        let mut conn = self.conn()?;
        let deleted =
            diesel::delete(sales::table.filter(sales::id.eq(sale_id))).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
