use actix_web::{HttpResponse, Responder, get, post, web};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::pdf::{RemitoData, render_remito};
use crate::repository::DieselRepository;
use crate::services::products::{ProductsQuery, search_catalog};
use crate::services::sales::{SalesQuery, load_sales_page};
use crate::services::{ServiceError, projects, sales};

/// Return a JSON page of the catalog for the item picker, with normalized
/// search and category filtering.
#[get("/v1/productos")]
pub async fn api_v1_products(
    params: web::Query<ProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match search_catalog(repo.get_ref(), &user, params.0) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to search catalog: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Return a JSON page of the sales listing.
#[get("/v1/ventas")]
pub async fn api_v1_sales(
    params: web::Query<SalesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_sales_page(repo.get_ref(), &user, params.0) {
        Ok(data) => HttpResponse::Ok().json(data.sales),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to list sales: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Body of the remito request: the document type, its id and the employee
/// who prepared the goods.
#[derive(Debug, Deserialize)]
pub struct RemitoRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i32,
    pub empleado: Option<String>,
}

/// Render the remito PDF for a sale or a project.
#[post("/pdf/remito")]
pub async fn api_pdf_remito(
    body: web::Json<RemitoRequest>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let RemitoRequest { kind, id, empleado } = body.into_inner();

    let data = match kind.as_str() {
        "obra" => projects::load_project(repo.get_ref(), &user, id)
            .map(|project| RemitoData::from_project(&project, empleado)),
        _ => sales::load_sale(repo.get_ref(), &user, id)
            .map(|sale| RemitoData::from_sale(&sale, empleado)),
    };

    match data {
        Ok(data) => match render_remito(&data) {
            Ok(bytes) => HttpResponse::Ok()
                .content_type("application/pdf")
                .body(bytes),
            Err(err) => {
                log::error!("Failed to render remito for {kind} {id}: {err}");
                HttpResponse::InternalServerError().finish()
            }
        },
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to load {kind} {id} for remito: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
