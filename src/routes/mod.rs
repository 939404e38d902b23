use actix_identity::Identity;
use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;

pub mod api;
pub mod clients;
pub mod expenses;
pub mod main;
pub mod products;
pub mod projects;
pub mod quotes;
pub mod sales;
pub mod shipments;

/// See-other redirect used after every form submission.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

/// Render a template or log the failure and return a 500.
pub fn render_template(tera: &Tera, name: &str, context: &Context) -> HttpResponse {
    match tera.render(name, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template {name}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn level_str(level: Level) -> &'static str {
    match level {
        Level::Success => "success",
        Level::Warning => "warning",
        Level::Error => "error",
        _ => "info",
    }
}

/// Context shared by every page: flash messages, the signed-in user and the
/// active navigation entry.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    active_page: &str,
    auth_service_url: &str,
) -> Context {
    let messages: Vec<(&'static str, String)> = flash_messages
        .iter()
        .map(|message| (level_str(message.level()), message.content().to_string()))
        .collect();

    let mut context = Context::new();
    context.insert("flash_messages", &messages);
    context.insert("current_user", user);
    context.insert("active_page", active_page);
    context.insert("auth_service_url", auth_service_url);
    context
}

/// Landing page for authenticated users without the required role.
#[get("/na")]
pub async fn not_assigned() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(
            "<!doctype html><html lang=\"es\"><body>\
             <h1>Sin permisos</h1>\
             <p>Su usuario no tiene un rol asignado en este sistema. \
             Contacte al administrador.</p>\
             </body></html>",
        )
}

#[get("/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect("/")
}
