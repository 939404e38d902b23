use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::config::ServerConfig;
use crate::forms::quotes::AddQuoteForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::quotes::{
    QuotesQuery, convert_quote, create_quote, load_quote, load_quotes_page, reject_quote,
    remove_quote,
};

#[get("/presupuestos")]
pub async fn show_quotes(
    params: web::Query<QuotesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_quotes_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "presupuestos",
                &server_config.auth_service_url,
            );
            context.insert("quotes", &data.quotes);
            context.insert("search", &data.search);
            context.insert("status", &data.status);
            render_template(&tera, "quotes/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list quotes: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/presupuestos/{quote_id}")]
pub async fn show_quote(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let quote_id = path.into_inner();

    match load_quote(repo.get_ref(), &user, quote_id) {
        Ok(quote) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "presupuestos",
                &server_config.auth_service_url,
            );
            context.insert("quote", &quote);
            render_template(&tera, "quotes/detail.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Presupuesto no encontrado.").send();
            redirect("/presupuestos")
        }
        Err(err) => {
            log::error!("Failed to load quote {quote_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/presupuestos/add")]
pub async fn add_quote(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddQuoteForm>,
) -> impl Responder {
    match create_quote(repo.get_ref(), &user, form.into_inner()) {
        Ok(quote) => {
            FlashMessage::success(format!("Presupuesto n° {} creado.", quote.id)).send();
            redirect(&format!("/presupuestos/{}", quote.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/presupuestos")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Cliente o producto inexistente.").send();
            redirect("/presupuestos")
        }
        Err(err) => {
            log::error!("Failed to create quote: {err}");
            FlashMessage::error("No se pudo crear el presupuesto.").send();
            redirect("/presupuestos")
        }
    }
}

#[post("/presupuestos/{quote_id}/rechazar")]
pub async fn reject_quote_route(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let quote_id = path.into_inner();

    match reject_quote(repo.get_ref(), &user, quote_id) {
        Ok(_) => {
            FlashMessage::success("Presupuesto marcado como rechazado.").send();
            redirect(&format!("/presupuestos/{quote_id}"))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Presupuesto no encontrado.").send();
            redirect("/presupuestos")
        }
        Err(err) => {
            log::error!("Failed to reject quote {quote_id}: {err}");
            FlashMessage::error("No se pudo actualizar el presupuesto.").send();
            redirect("/presupuestos")
        }
    }
}

#[post("/presupuestos/{quote_id}/convertir")]
pub async fn convert_quote_route(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let quote_id = path.into_inner();

    match convert_quote(repo.get_ref(), &user, quote_id) {
        Ok(project) => {
            FlashMessage::success(format!("Obra n° {} creada desde el presupuesto.", project.id))
                .send();
            redirect(&format!("/obras/{}", project.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Presupuesto no encontrado.").send();
            redirect("/presupuestos")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("El presupuesto ya fue convertido en obra.").send();
            redirect(&format!("/presupuestos/{quote_id}"))
        }
        Err(err) => {
            log::error!("Failed to convert quote {quote_id}: {err}");
            FlashMessage::error("No se pudo convertir el presupuesto.").send();
            redirect(&format!("/presupuestos/{quote_id}"))
        }
    }
}

#[post("/presupuestos/{quote_id}/delete")]
pub async fn delete_quote(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let quote_id = path.into_inner();

    match remove_quote(repo.get_ref(), &user, quote_id) {
        Ok(()) => {
            FlashMessage::success("Presupuesto eliminado.").send();
            redirect("/presupuestos")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Presupuesto no encontrado o ya eliminado.").send();
            redirect("/presupuestos")
        }
        Err(err) => {
            log::error!("Failed to delete quote {quote_id}: {err}");
            FlashMessage::error("No se pudo eliminar el presupuesto.").send();
            redirect("/presupuestos")
        }
    }
}
