use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::quote::{
    NewQuote as DomainNewQuote, Quote as DomainQuote, QuoteListQuery,
    UpdateQuote as DomainUpdateQuote,
};
use crate::models::quote::{
    NewQuote as DbNewQuote, NewQuoteBlock as DbNewQuoteBlock, NewQuoteItem as DbNewQuoteItem,
    Quote as DbQuote, QuoteBlock as DbQuoteBlock, QuoteItem as DbQuoteItem,
    UpdateQuote as DbUpdateQuote,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, QuoteReader, QuoteWriter};
use crate::search;

/// Load the blocks and items of a quote, in display order.
fn load_blocks(
    conn: &mut SqliteConnection,
    quote_id: i32,
) -> QueryResult<Vec<(DbQuoteBlock, Vec<DbQuoteItem>)>> {
    use crate::schema::{quote_blocks, quote_items};

    let blocks = quote_blocks::table
        .filter(quote_blocks::quote_id.eq(quote_id))
        .order(quote_blocks::position.asc())
        .load::<DbQuoteBlock>(conn)?;

    let block_ids: Vec<i32> = blocks.iter().map(|block| block.id).collect();

    let mut items_by_block: HashMap<i32, Vec<DbQuoteItem>> = HashMap::new();
    if !block_ids.is_empty() {
        let rows = quote_items::table
            .filter(quote_items::block_id.eq_any(&block_ids))
            .order(quote_items::id.asc())
            .load::<DbQuoteItem>(conn)?;

        for item in rows {
            items_by_block.entry(item.block_id).or_default().push(item);
        }
    }

    Ok(blocks
        .into_iter()
        .map(|block| {
            let items = items_by_block.remove(&block.id).unwrap_or_default();
            (block, items)
        })
        .collect())
}

impl QuoteReader for DieselRepository {
    fn get_quote_by_id(&self, id: i32) -> RepositoryResult<Option<DomainQuote>> {
        use crate::schema::quotes;

        let mut conn = self.conn()?;
        let quote = quotes::table
            .filter(quotes::id.eq(id))
            .first::<DbQuote>(&mut conn)
            .optional()?;

        let Some(quote) = quote else {
            return Ok(None);
        };

        let quote_id = quote.id;
        let blocks = load_blocks(&mut conn, quote_id)?;

        Ok(Some(quote.into_domain(blocks)))
    }

    fn list_quotes(&self, query: QuoteListQuery) -> RepositoryResult<(usize, Vec<DomainQuote>)> {
        use crate::schema::quotes;

        let mut conn = self.conn()?;

        let QuoteListQuery {
            search,
            status,
            pagination,
        } = query;

        let search_pattern = search
            .as_deref()
            .map(|term| format!("%{}%", search::normalize(term)));
        let status_filter = status.map(|status| <&'static str>::from(status).to_string());

        let mut count_query = quotes::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(quotes::client_name.like(pattern.clone()));
        }
        if let Some(ref status_value) = status_filter {
            count_query = count_query.filter(quotes::status.eq(status_value.as_str()));
        }
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = quotes::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            items = items.filter(quotes::client_name.like(pattern.clone()));
        }
        if let Some(ref status_value) = status_filter {
            items = items.filter(quotes::status.eq(status_value.as_str()));
        }

        items = items.order(quotes::quote_date.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let db_quotes = items.load::<DbQuote>(&mut conn)?;

        let mut quotes = Vec::with_capacity(db_quotes.len());
        for quote in db_quotes {
            let quote_id = quote.id;
            let blocks = load_blocks(&mut conn, quote_id)?;
            quotes.push(quote.into_domain(blocks));
        }

        Ok((total, quotes))
    }
}

impl QuoteWriter for DieselRepository {
    fn create_quote(&self, new_quote: &DomainNewQuote) -> RepositoryResult<DomainQuote> {
        use crate::schema::{quote_blocks, quote_items, quotes};

        let mut conn = self.conn()?;

        conn.transaction::<DomainQuote, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(quotes::table)
                .values(&DbNewQuote::from(new_quote))
                .get_result::<DbQuote>(conn)?;

            let quote_id = created.id;

            for block in &new_quote.blocks {
                let created_block = diesel::insert_into(quote_blocks::table)
                    .values(&DbNewQuoteBlock::from_domain(quote_id, block))
                    .get_result::<DbQuoteBlock>(conn)?;

                if !block.items.is_empty() {
                    let payload: Vec<DbNewQuoteItem> = block
                        .items
                        .iter()
                        .map(|item| DbNewQuoteItem::from_domain(created_block.id, item))
                        .collect();

                    diesel::insert_into(quote_items::table)
                        .values(&payload)
                        .execute(conn)?;
                }
            }

            let blocks = load_blocks(conn, quote_id)?;
            Ok(created.into_domain(blocks))
        })
    }

    fn update_quote(
        &self,
        quote_id: i32,
        updates: &DomainUpdateQuote,
    ) -> RepositoryResult<DomainQuote> {
        use crate::schema::quotes;

        let mut conn = self.conn()?;

        let updated = diesel::update(quotes::table.filter(quotes::id.eq(quote_id)))
            .set(&DbUpdateQuote::from(updates))
            .get_result::<DbQuote>(&mut conn)?;

        let blocks = load_blocks(&mut conn, quote_id)?;
        Ok(updated.into_domain(blocks))
    }

    fn delete_quote(&self, quote_id: i32) -> RepositoryResult<()> {
        use crate::schema::quotes;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(quotes::table.filter(quotes::id.eq(quote_id)))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
