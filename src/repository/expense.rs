use diesel::prelude::*;

use crate::domain::expense::{
    Expense as DomainExpense, ExpenseListQuery, NewExpense as DomainNewExpense,
    NewPayment as DomainNewPayment, PayableStatus,
};
use crate::models::expense::{
    Expense as DbExpense, ExpensePayment as DbExpensePayment, NewExpense as DbNewExpense,
    NewExpensePayment as DbNewExpensePayment, SettleExpense,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ExpenseReader, ExpenseWriter};

fn load_payments(
    conn: &mut SqliteConnection,
    expense_id: i32,
) -> QueryResult<Vec<DbExpensePayment>> {
    use crate::schema::expense_payments;

    expense_payments::table
        .filter(expense_payments::expense_id.eq(expense_id))
        .order(expense_payments::id.asc())
        .load::<DbExpensePayment>(conn)
}

impl ExpenseReader for DieselRepository {
    fn get_expense_by_id(&self, id: i32) -> RepositoryResult<Option<DomainExpense>> {
        use crate::schema::expenses;

        let mut conn = self.conn()?;
        let expense = expenses::table
            .filter(expenses::id.eq(id))
            .first::<DbExpense>(&mut conn)
            .optional()?;

        let Some(expense) = expense else {
            return Ok(None);
        };

        let expense_id = expense.id;
        let payments = load_payments(&mut conn, expense_id)?;

        Ok(Some(expense.into_domain(payments)))
    }

    fn list_expenses(
        &self,
        query: ExpenseListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainExpense>)> {
        use crate::schema::expenses;

        let mut conn = self.conn()?;

        let ExpenseListQuery {
            kind,
            status,
            pagination,
        } = query;

        let kind_filter = kind.map(|kind| <&'static str>::from(kind).to_string());
        let status_filter = status.map(|status| <&'static str>::from(status).to_string());

        let mut count_query = expenses::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref kind_value) = kind_filter {
            count_query = count_query.filter(expenses::kind.eq(kind_value.as_str()));
        }
        if let Some(ref status_value) = status_filter {
            count_query = count_query.filter(expenses::status.eq(status_value.as_str()));
        }
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = expenses::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref kind_value) = kind_filter {
            items = items.filter(expenses::kind.eq(kind_value.as_str()));
        }
        if let Some(ref status_value) = status_filter {
            items = items.filter(expenses::status.eq(status_value.as_str()));
        }

        items = items.order(expenses::expense_date.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let db_expenses = items.load::<DbExpense>(&mut conn)?;

        let mut expenses = Vec::with_capacity(db_expenses.len());
        for expense in db_expenses {
            let expense_id = expense.id;
            let payments = load_payments(&mut conn, expense_id)?;
            expenses.push(expense.into_domain(payments));
        }

        Ok((total, expenses))
    }
}

impl ExpenseWriter for DieselRepository {
    fn create_expense(&self, new_expense: &DomainNewExpense) -> RepositoryResult<DomainExpense> {
        use crate::schema::expenses;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(expenses::table)
            .values(&DbNewExpense::from(new_expense))
            .get_result::<DbExpense>(&mut conn)?;

        Ok(created.into_domain(Vec::new()))
    }

    fn register_payment(
        &self,
        expense_id: i32,
        payment: &DomainNewPayment,
    ) -> RepositoryResult<DomainExpense> {
        use crate::schema::{expense_payments, expenses};

        let mut conn = self.conn()?;

        // The append and the aggregate recomputation run in one transaction
        // so two concurrent payments cannot leave a stale status behind.
        conn.transaction::<DomainExpense, RepositoryError, _>(|conn| {
            let expense = expenses::table
                .filter(expenses::id.eq(expense_id))
                .first::<DbExpense>(conn)
                .optional()?;

            let Some(expense) = expense else {
                return Err(RepositoryError::NotFound);
            };

            diesel::insert_into(expense_payments::table)
                .values(&DbNewExpensePayment::from_domain(expense_id, payment))
                .execute(conn)?;

            let amounts: Vec<i64> = expense_payments::table
                .filter(expense_payments::expense_id.eq(expense_id))
                .select(expense_payments::amount)
                .load(conn)?;
            let paid: i64 = amounts.iter().sum();

            let status = PayableStatus::derive(expense.amount, paid);

            let updated = diesel::update(expenses::table.filter(expenses::id.eq(expense_id)))
                .set(&SettleExpense {
                    paid_amount: paid,
                    status: status.into(),
                    updated_at: chrono::Local::now().naive_utc(),
                })
                .get_result::<DbExpense>(conn)?;

            let payments = load_payments(conn, expense_id)?;
            Ok(updated.into_domain(payments))
        })
    }

    fn delete_expense(&self, expense_id: i32) -> RepositoryResult<()> {
        use crate::schema::expenses;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(expenses::table.filter(expenses::id.eq(expense_id)))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
