use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::config::ServerConfig;
use crate::forms::projects::{AddProjectForm, UpdateProjectStatusForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::projects::{
    ProjectsQuery, change_project_status, create_project, load_project, load_projects_page,
    remove_project,
};

#[get("/obras")]
pub async fn show_projects(
    params: web::Query<ProjectsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_projects_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "obras",
                &server_config.auth_service_url,
            );
            context.insert("projects", &data.projects);
            context.insert("search", &data.search);
            context.insert("status", &data.status);
            render_template(&tera, "projects/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list projects: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/obras/{project_id}")]
pub async fn show_project(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let project_id = path.into_inner();

    match load_project(repo.get_ref(), &user, project_id) {
        Ok(project) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "obras",
                &server_config.auth_service_url,
            );
            context.insert("project", &project);
            render_template(&tera, "projects/detail.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Obra no encontrada.").send();
            redirect("/obras")
        }
        Err(err) => {
            log::error!("Failed to load project {project_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/obras/add")]
pub async fn add_project(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddProjectForm>,
) -> impl Responder {
    match create_project(repo.get_ref(), &user, form.into_inner()) {
        Ok(project) => {
            FlashMessage::success(format!("Obra n° {} creada.", project.id)).send();
            redirect(&format!("/obras/{}", project.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/obras")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Cliente o producto inexistente.").send();
            redirect("/obras")
        }
        Err(err) => {
            log::error!("Failed to create project: {err}");
            FlashMessage::error("No se pudo crear la obra.").send();
            redirect("/obras")
        }
    }
}

#[post("/obras/{project_id}/estado")]
pub async fn change_project_status_route(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<UpdateProjectStatusForm>,
) -> impl Responder {
    let project_id = path.into_inner();

    match change_project_status(repo.get_ref(), &user, project_id, form.into_inner()) {
        Ok(_) => {
            FlashMessage::success("Estado de la obra actualizado.").send();
            redirect(&format!("/obras/{project_id}"))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Obra no encontrada.").send();
            redirect("/obras")
        }
        Err(err) => {
            log::error!("Failed to update project {project_id}: {err}");
            FlashMessage::error("No se pudo actualizar la obra.").send();
            redirect("/obras")
        }
    }
}

#[post("/obras/{project_id}/delete")]
pub async fn delete_project(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let project_id = path.into_inner();

    match remove_project(repo.get_ref(), &user, project_id) {
        Ok(()) => {
            FlashMessage::success("Obra eliminada.").send();
            redirect("/obras")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Obra no encontrada o ya eliminada.").send();
            redirect("/obras")
        }
        Err(err) => {
            log::error!("Failed to delete project {project_id}: {err}");
            FlashMessage::error("No se pudo eliminar la obra.").send();
            redirect("/obras")
        }
    }
}
