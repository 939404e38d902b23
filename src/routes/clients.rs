use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::config::ServerConfig;
use crate::forms::clients::SaveClientForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::clients::{
    ClientsQuery, create_client, load_clients_page, modify_client, remove_client,
};
use crate::services::ServiceError;

#[get("/clientes")]
pub async fn show_clients(
    params: web::Query<ClientsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_clients_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "clientes",
                &server_config.auth_service_url,
            );
            context.insert("clients", &data.clients);
            context.insert("search", &data.search);
            render_template(&tera, "clients/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list clients: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/clientes/add")]
pub async fn add_client(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<SaveClientForm>,
) -> impl Responder {
    match create_client(repo.get_ref(), &user, form.into_inner()) {
        Ok(client) => {
            FlashMessage::success(format!("Cliente «{}» creado.", client.name)).send();
            redirect("/clientes")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/clientes")
        }
        Err(err) => {
            log::error!("Failed to create client: {err}");
            FlashMessage::error("No se pudo crear el cliente.").send();
            redirect("/clientes")
        }
    }
}

#[post("/clientes/{client_id}/edit")]
pub async fn edit_client(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<SaveClientForm>,
) -> impl Responder {
    let client_id = path.into_inner();

    match modify_client(repo.get_ref(), &user, client_id, form.into_inner()) {
        Ok(client) => {
            FlashMessage::success(format!("Cliente «{}» actualizado.", client.name)).send();
            redirect("/clientes")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/clientes")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Cliente no encontrado.").send();
            redirect("/clientes")
        }
        Err(err) => {
            log::error!("Failed to update client {client_id}: {err}");
            FlashMessage::error("No se pudo actualizar el cliente.").send();
            redirect("/clientes")
        }
    }
}

#[post("/clientes/{client_id}/delete")]
pub async fn delete_client(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let client_id = path.into_inner();

    match remove_client(repo.get_ref(), &user, client_id) {
        Ok(()) => {
            FlashMessage::success("Cliente eliminado.").send();
            redirect("/clientes")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Cliente no encontrado o ya eliminado.").send();
            redirect("/clientes")
        }
        Err(err) => {
            log::error!("Failed to delete client {client_id}: {err}");
            FlashMessage::error("No se pudo eliminar el cliente.").send();
            redirect("/clientes")
        }
    }
}
