use actix_multipart::form::MultipartForm;
use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::config::ServerConfig;
use crate::forms::products::{SaveProductForm, UpdatePricesForm, UploadProductsForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::products::{
    ProductsQuery, create_product, export_products_csv, import_products, load_products_page,
    modify_product, remove_product, update_prices,
};

#[get("/productos")]
pub async fn show_products(
    params: web::Query<ProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_products_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "productos",
                &server_config.auth_service_url,
            );
            context.insert("products", &data.products);
            context.insert("search", &data.search);
            context.insert("category", &data.category);
            render_template(&tera, "products/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/productos/export")]
pub async fn export_products(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match export_products_csv(repo.get_ref(), &user) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"productos.csv\"",
            ))
            .body(csv),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to export products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/productos/add")]
pub async fn add_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<SaveProductForm>,
) -> impl Responder {
    match create_product(repo.get_ref(), &user, form.into_inner()) {
        Ok(product) => {
            FlashMessage::success(format!("Producto «{}» creado.", product.name)).send();
            redirect("/productos")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/productos")
        }
        Err(err) => {
            log::error!("Failed to create product: {err}");
            FlashMessage::error("No se pudo crear el producto.").send();
            redirect("/productos")
        }
    }
}

#[post("/productos/{product_id}/edit")]
pub async fn edit_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<SaveProductForm>,
) -> impl Responder {
    let product_id = path.into_inner();

    match modify_product(repo.get_ref(), &user, product_id, form.into_inner()) {
        Ok(product) => {
            FlashMessage::success(format!("Producto «{}» actualizado.", product.name)).send();
            redirect("/productos")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/productos")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Producto no encontrado.").send();
            redirect("/productos")
        }
        Err(err) => {
            log::error!("Failed to update product {product_id}: {err}");
            FlashMessage::error("No se pudo actualizar el producto.").send();
            redirect("/productos")
        }
    }
}

#[post("/productos/{product_id}/delete")]
pub async fn delete_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();

    match remove_product(repo.get_ref(), &user, product_id) {
        Ok(()) => {
            FlashMessage::success("Producto eliminado.").send();
            redirect("/productos")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Producto no encontrado o ya eliminado.").send();
            redirect("/productos")
        }
        Err(err) => {
            log::error!("Failed to delete product {product_id}: {err}");
            FlashMessage::error("No se pudo eliminar el producto.").send();
            redirect("/productos")
        }
    }
}

#[post("/productos/upload")]
pub async fn upload_products(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadProductsForm>,
) -> impl Responder {
    match import_products(repo.get_ref(), &user, form) {
        Ok(created) => {
            FlashMessage::success(format!("{created} productos importados.")).send();
            redirect("/productos")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/productos")
        }
        Err(err) => {
            log::error!("Failed to import products: {err}");
            FlashMessage::error("No se pudo importar el archivo.").send();
            redirect("/productos")
        }
    }
}

#[post("/productos/precios")]
pub async fn reprice_products(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<UpdatePricesForm>,
) -> impl Responder {
    match update_prices(repo.get_ref(), &user, form.into_inner()) {
        Ok(updated) => {
            FlashMessage::success(format!("{updated} precios actualizados.")).send();
            redirect("/productos")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Solo un administrador puede actualizar precios.").send();
            redirect("/productos")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/productos")
        }
        Err(err) => {
            log::error!("Failed to update prices: {err}");
            FlashMessage::error("No se pudieron actualizar los precios.").send();
            redirect("/productos")
        }
    }
}
