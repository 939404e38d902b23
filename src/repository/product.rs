use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductCategory, ProductListQuery,
    UpdateProduct as DomainUpdateProduct,
};
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, RepriceProduct,
    UpdateProduct as DbUpdateProduct,
};
use crate::pricing;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProductReader, ProductWriter};
use crate::search;

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(DomainProduct::from))
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let ProductListQuery {
            search,
            category,
            pagination,
        } = query;

        let search_pattern = search
            .as_deref()
            .map(|term| format!("%{}%", search::normalize(term)));
        let category_filter = category.map(|category| <&'static str>::from(category).to_string());

        let mut count_query = products::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(products::search_name.like(pattern.clone()));
        }
        if let Some(ref category_value) = category_filter {
            count_query = count_query.filter(products::category.eq(category_value.as_str()));
        }
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            items = items.filter(products::search_name.like(pattern.clone()));
        }
        if let Some(ref category_value) = category_filter {
            items = items.filter(products::category.eq(category_value.as_str()));
        }

        items = items.order(products::name.asc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;

        Ok((
            total,
            db_products.into_iter().map(DomainProduct::from).collect(),
        ))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(products::table)
            .values(&DbNewProduct::from(new_product))
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.into())
    }

    fn create_products(&self, new_products: &[DomainNewProduct]) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let payload: Vec<DbNewProduct> = new_products.iter().map(DbNewProduct::from).collect();

        let inserted = diesel::insert_into(products::table)
            .values(&payload)
            .execute(&mut conn)?;

        Ok(inserted)
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
            .set(&DbUpdateProduct::from(updates))
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(products::table.filter(products::id.eq(product_id)))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn reprice_products(
        &self,
        category: Option<ProductCategory>,
        percent: f64,
    ) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let category_filter = category.map(|category| <&'static str>::from(category).to_string());
        let now = chrono::Local::now().naive_utc();

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut targets = products::table.into_boxed::<diesel::sqlite::Sqlite>();
            if let Some(ref category_value) = category_filter {
                targets = targets.filter(products::category.eq(category_value.as_str()));
            }

            let rows = targets.load::<DbProduct>(conn)?;
            let mut updated = 0usize;

            for row in rows {
                let changes = reprice_row(&row, percent, now);
                diesel::update(products::table.filter(products::id.eq(row.id)))
                    .set(&changes)
                    .execute(conn)?;
                updated += 1;
            }

            Ok(updated)
        })
    }
}

/// Apply the percentage to every price field present on the row. Each result
/// is re-rounded to hundreds, so repeated updates compound the rounding.
fn reprice_row(row: &DbProduct, percent: f64, now: NaiveDateTime) -> RepriceProduct {
    RepriceProduct {
        price_per_foot: row
            .price_per_foot
            .map(|price| pricing::increase_price(price, percent)),
        price_per_m2: row
            .price_per_m2
            .map(|price| pricing::increase_price(price, percent)),
        price_per_m: row
            .price_per_m
            .map(|price| pricing::increase_price(price, percent)),
        sale_price: row
            .sale_price
            .map(|price| pricing::increase_price(price, percent)),
        updated_at: now,
    }
}
