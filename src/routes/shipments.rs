use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::config::ServerConfig;
use crate::forms::shipments::{AddShipmentForm, AdvanceShipmentForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::shipments::{
    ShipmentsQuery, advance_shipment, create_shipment, load_shipments_page, remove_shipment,
};

#[get("/envios")]
pub async fn show_shipments(
    params: web::Query<ShipmentsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_shipments_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "envios",
                &server_config.auth_service_url,
            );
            context.insert("shipments", &data.shipments);
            context.insert("status", &data.status);
            render_template(&tera, "shipments/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list shipments: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/envios/add")]
pub async fn add_shipment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddShipmentForm>,
) -> impl Responder {
    match create_shipment(repo.get_ref(), &user, form.into_inner()) {
        Ok(shipment) => {
            FlashMessage::success(format!(
                "Envío creado para la venta n° {}.",
                shipment.sale_id
            ))
            .send();
            redirect("/envios")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("La venta indicada no existe.").send();
            redirect("/envios")
        }
        Err(err) => {
            log::error!("Failed to create shipment: {err}");
            FlashMessage::error("No se pudo crear el envío.").send();
            redirect("/envios")
        }
    }
}

#[post("/envios/{shipment_id}/avanzar")]
pub async fn advance_shipment_route(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AdvanceShipmentForm>,
) -> impl Responder {
    let shipment_id = path.into_inner();

    match advance_shipment(repo.get_ref(), &user, shipment_id, form.into_inner()) {
        Ok(shipment) => {
            let status: &'static str = shipment.status.into();
            FlashMessage::success(format!("Envío actualizado a {status}.")).send();
            redirect("/envios")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Envío no encontrado.").send();
            redirect("/envios")
        }
        Err(err) => {
            log::error!("Failed to advance shipment {shipment_id}: {err}");
            FlashMessage::error("No se pudo actualizar el envío.").send();
            redirect("/envios")
        }
    }
}

#[post("/envios/{shipment_id}/delete")]
pub async fn delete_shipment(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let shipment_id = path.into_inner();

    match remove_shipment(repo.get_ref(), &user, shipment_id) {
        Ok(()) => {
            FlashMessage::success("Envío eliminado.").send();
            redirect("/envios")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Envío no encontrado o ya eliminado.").send();
            redirect("/envios")
        }
        Err(err) => {
            log::error!("Failed to delete shipment {shipment_id}: {err}");
            FlashMessage::error("No se pudo eliminar el envío.").send();
            redirect("/envios")
        }
    }
}
