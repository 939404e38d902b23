use diesel::prelude::*;

use crate::domain::expense_category::{
    ExpenseCategory as DomainExpenseCategory, NewExpenseCategory as DomainNewExpenseCategory,
};
use crate::models::expense_category::{
    ExpenseCategory as DbExpenseCategory, NewExpenseCategory as DbNewExpenseCategory,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ExpenseCategoryReader, ExpenseCategoryWriter};

impl ExpenseCategoryReader for DieselRepository {
    fn list_expense_categories(&self) -> RepositoryResult<Vec<DomainExpenseCategory>> {
        use crate::schema::expense_categories;

        let mut conn = self.conn()?;
        let categories = expense_categories::table
            .order(expense_categories::name.asc())
            .load::<DbExpenseCategory>(&mut conn)?;

        Ok(categories
            .into_iter()
            .map(DomainExpenseCategory::from)
            .collect())
    }
}

impl ExpenseCategoryWriter for DieselRepository {
    fn create_expense_category(
        &self,
        new_category: &DomainNewExpenseCategory,
    ) -> RepositoryResult<DomainExpenseCategory> {
        use crate::schema::expense_categories;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(expense_categories::table)
            .values(&DbNewExpenseCategory::from(new_category))
            .get_result::<DbExpenseCategory>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_expense_category(&self, category_id: i32) -> RepositoryResult<()> {
        use crate::schema::expense_categories;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            expense_categories::table.filter(expense_categories::id.eq(category_id)),
        )
        .execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
