use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::config::ServerConfig;
use crate::forms::sales::{AddSaleForm, UpdateSaleStatusForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::sales::{
    SalesQuery, change_sale_status, create_sale, export_sales_csv, load_sale, load_sales_page,
    remove_sale,
};

#[get("/ventas")]
pub async fn show_sales(
    params: web::Query<SalesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_sales_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "ventas",
                &server_config.auth_service_url,
            );
            context.insert("sales", &data.sales);
            context.insert("search", &data.search);
            context.insert("status", &data.status);
            render_template(&tera, "sales/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list sales: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/ventas/export")]
pub async fn export_sales(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match export_sales_csv(repo.get_ref(), &user) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"ventas.csv\"",
            ))
            .body(csv),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to export sales: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/ventas/{sale_id}")]
pub async fn show_sale(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let sale_id = path.into_inner();

    match load_sale(repo.get_ref(), &user, sale_id) {
        Ok(sale) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "ventas",
                &server_config.auth_service_url,
            );
            context.insert("sale", &sale);
            render_template(&tera, "sales/detail.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Venta no encontrada.").send();
            redirect("/ventas")
        }
        Err(err) => {
            log::error!("Failed to load sale {sale_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/ventas/add")]
pub async fn add_sale(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddSaleForm>,
) -> impl Responder {
    match create_sale(repo.get_ref(), &user, form.into_inner()) {
        Ok(sale) => {
            FlashMessage::success(format!("Venta n° {} registrada.", sale.id)).send();
            redirect(&format!("/ventas/{}", sale.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/ventas")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Cliente o producto inexistente.").send();
            redirect("/ventas")
        }
        Err(err) => {
            log::error!("Failed to create sale: {err}");
            FlashMessage::error("No se pudo registrar la venta.").send();
            redirect("/ventas")
        }
    }
}

#[post("/ventas/{sale_id}/estado")]
pub async fn change_sale_status_route(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<UpdateSaleStatusForm>,
) -> impl Responder {
    let sale_id = path.into_inner();

    match change_sale_status(repo.get_ref(), &user, sale_id, form.into_inner()) {
        Ok(_) => {
            FlashMessage::success("Estado de la venta actualizado.").send();
            redirect(&format!("/ventas/{sale_id}"))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Venta no encontrada.").send();
            redirect("/ventas")
        }
        Err(err) => {
            log::error!("Failed to update sale {sale_id}: {err}");
            FlashMessage::error("No se pudo actualizar la venta.").send();
            redirect("/ventas")
        }
    }
}

#[post("/ventas/{sale_id}/delete")]
pub async fn delete_sale(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let sale_id = path.into_inner();

    match remove_sale(repo.get_ref(), &user, sale_id) {
        Ok(()) => {
            FlashMessage::success("Venta eliminada.").send();
            redirect("/ventas")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Venta no encontrada o ya eliminada.").send();
            redirect("/ventas")
        }
        Err(err) => {
            log::error!("Failed to delete sale {sale_id}: {err}");
            FlashMessage::error("No se pudo eliminar la venta.").send();
            redirect("/ventas")
        }
    }
}
