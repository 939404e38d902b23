use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::project::{
    NewProject, Project, ProjectListQuery, ProjectStatus, UpdateProject,
};
use crate::forms::parse_date;
use crate::forms::projects::{AddProjectForm, UpdateProjectStatusForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ClientReader, ProductReader, ProjectReader, ProjectWriter};
use crate::services::items::{build_line_items, resolve_client};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the projects index page.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectsQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the projects index template.
pub struct ProjectsPageData {
    pub projects: Paginated<Project>,
    pub search: Option<String>,
    pub status: Option<String>,
}

/// Loads the projects overview page.
pub fn load_projects_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProjectsQuery,
) -> ServiceResult<ProjectsPageData>
where
    R: ProjectReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let ProjectsQuery {
        search,
        status,
        page,
    } = query;

    let page = page.unwrap_or(1);
    let mut list_query = ProjectListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if let Some(status_value) = status.as_deref().filter(|value| !value.is_empty()) {
        list_query = list_query.status(ProjectStatus::from(status_value));
    }

    let (total, items) = repo.list_projects(list_query).map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let projects = Paginated::new(items, page, total_pages);

    Ok(ProjectsPageData {
        projects,
        search,
        status,
    })
}

/// Loads one project for the detail page.
pub fn load_project<R>(repo: &R, user: &AuthenticatedUser, project_id: i32) -> ServiceResult<Project>
where
    R: ProjectReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_project_by_id(project_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a standalone project (not originating from a quote).
pub fn create_project<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddProjectForm,
) -> ServiceResult<Project>
where
    R: ProjectWriter + ClientReader + ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let items_payload = form
        .parse_items()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let start_date =
        parse_date(&form.start_date).map_err(|err| ServiceError::Form(err.to_string()))?;

    let (client_id, client) = resolve_client(repo, form.client_id, form.client_name)?;
    let items = build_line_items(repo, items_payload)?;

    let mut new_project = NewProject::new(client, start_date).with_items(items);
    if let Some(client_id) = client_id {
        new_project = new_project.with_client_id(client_id);
    }
    if let Some(notes) = form.notes {
        new_project = new_project.with_notes(notes);
    }

    repo.create_project(&new_project).map_err(ServiceError::from)
}

/// Moves a project to the submitted lifecycle state.
pub fn change_project_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    project_id: i32,
    form: UpdateProjectStatusForm,
) -> ServiceResult<Project>
where
    R: ProjectWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let updates = UpdateProject::new().status(ProjectStatus::from(form.status.as_str()));
    repo.update_project(project_id, &updates)
        .map_err(ServiceError::from)
}

/// Deletes a project.
pub fn remove_project<R>(repo: &R, user: &AuthenticatedUser, project_id: i32) -> ServiceResult<()>
where
    R: ProjectWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_project(project_id).map_err(ServiceError::from)
}
