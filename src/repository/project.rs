use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::project::{
    NewProject as DomainNewProject, Project as DomainProject, ProjectListQuery,
    UpdateProject as DomainUpdateProject,
};
use crate::models::project::{
    NewProject as DbNewProject, NewProjectItem as DbNewProjectItem, Project as DbProject,
    ProjectItem as DbProjectItem, UpdateProject as DbUpdateProject,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProjectReader, ProjectWriter};
use crate::search;

impl ProjectReader for DieselRepository {
    fn get_project_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProject>> {
        use crate::schema::{project_items, projects};

        let mut conn = self.conn()?;
        let project = projects::table
            .filter(projects::id.eq(id))
            .first::<DbProject>(&mut conn)
            .optional()?;

        let Some(project) = project else {
            return Ok(None);
        };

        let project_id = project.id;
        let items = project_items::table
            .filter(project_items::project_id.eq(project_id))
            .order(project_items::id.asc())
            .load::<DbProjectItem>(&mut conn)?;

        Ok(Some(project.into_domain(items)))
    }

    fn list_projects(
        &self,
        query: ProjectListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProject>)> {
        use crate::schema::{project_items, projects};

        let mut conn = self.conn()?;

        let ProjectListQuery {
            search,
            status,
            pagination,
        } = query;

        let search_pattern = search
            .as_deref()
            .map(|term| format!("%{}%", search::normalize(term)));
        let status_filter = status.map(|status| <&'static str>::from(status).to_string());

        let mut count_query = projects::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(projects::client_name.like(pattern.clone()));
        }
        if let Some(ref status_value) = status_filter {
            count_query = count_query.filter(projects::status.eq(status_value.as_str()));
        }
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = projects::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            items = items.filter(projects::client_name.like(pattern.clone()));
        }
        if let Some(ref status_value) = status_filter {
            items = items.filter(projects::status.eq(status_value.as_str()));
        }

        items = items.order(projects::start_date.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let db_projects = items.load::<DbProject>(&mut conn)?;
        if db_projects.is_empty() {
            return Ok((total, Vec::new()));
        }

        let project_ids: Vec<i32> = db_projects.iter().map(|project| project.id).collect();

        let rows = project_items::table
            .filter(project_items::project_id.eq_any(&project_ids))
            .order(project_items::id.asc())
            .load::<DbProjectItem>(&mut conn)?;

        let mut items_by_project: HashMap<i32, Vec<DbProjectItem>> = HashMap::new();
        for item in rows {
            items_by_project
                .entry(item.project_id)
                .or_default()
                .push(item);
        }

        let projects = db_projects
            .into_iter()
            .map(|project| {
                let project_id = project.id;
                let items = items_by_project.remove(&project_id).unwrap_or_default();
                project.into_domain(items)
            })
            .collect();

        Ok((total, projects))
    }
}

impl ProjectWriter for DieselRepository {
    fn create_project(&self, new_project: &DomainNewProject) -> RepositoryResult<DomainProject> {
        use crate::schema::{project_items, projects};

        let mut conn = self.conn()?;

        conn.transaction::<DomainProject, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(projects::table)
                .values(&DbNewProject::from(new_project))
                .get_result::<DbProject>(conn)?;

            let project_id = created.id;

            if !new_project.items.is_empty() {
                let payload: Vec<DbNewProjectItem> = new_project
                    .items
                    .iter()
                    .map(|item| DbNewProjectItem::from_domain(project_id, item))
                    .collect();

                diesel::insert_into(project_items::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            let items = project_items::table
                .filter(project_items::project_id.eq(project_id))
                .order(project_items::id.asc())
                .load::<DbProjectItem>(conn)?;

            Ok(created.into_domain(items))
        })
    }

    fn update_project(
        &self,
        project_id: i32,
        updates: &DomainUpdateProject,
    ) -> RepositoryResult<DomainProject> {
        use crate::schema::{project_items, projects};

        let mut conn = self.conn()?;

        let updated = diesel::update(projects::table.filter(projects::id.eq(project_id)))
            .set(&DbUpdateProject::from(updates))
            .get_result::<DbProject>(&mut conn)?;

        let items = project_items::table
            .filter(project_items::project_id.eq(project_id))
            .order(project_items::id.asc())
            .load::<DbProjectItem>(&mut conn)?;

        Ok(updated.into_domain(items))
    }

    fn delete_project(&self, project_id: i32) -> RepositoryResult<()> {
        use crate::schema::projects;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(projects::table.filter(projects::id.eq(project_id)))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
