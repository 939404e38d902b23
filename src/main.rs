use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use maderera::config::ServerConfig;
use maderera::db::establish_connection_pool;
use maderera::middleware::RedirectUnauthorized;
use maderera::repository::DieselRepository;
use maderera::routes::api::{api_pdf_remito, api_v1_products, api_v1_sales};
use maderera::routes::clients::{add_client, delete_client, edit_client, show_clients};
use maderera::routes::expenses::{
    add_category, add_expense, add_payment, delete_expense, show_expenses,
};
use maderera::routes::main::show_index;
use maderera::routes::products::{
    add_product, delete_product, edit_product, export_products, reprice_products, show_products,
    upload_products,
};
use maderera::routes::projects::{
    add_project, change_project_status_route, delete_project, show_project, show_projects,
};
use maderera::routes::quotes::{
    add_quote, convert_quote_route, delete_quote, reject_quote_route, show_quote, show_quotes,
};
use maderera::routes::sales::{
    add_sale, change_sale_status_route, delete_sale, export_sales, show_sale, show_sales,
};
use maderera::routes::shipments::{
    add_shipment, advance_shipment_route, delete_shipment, show_shipments,
};
use maderera::routes::{logout, not_assigned};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret = env::var("SECRET_KEY");
    let secret_key = match &secret {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let auth_service_url = env::var("AUTH_SERVICE_URL");
    let auth_service_url = match auth_service_url {
        Ok(auth_service_url) => auth_service_url,
        Err(_) => {
            log::error!("AUTH_SERVICE_URL environment variable not set");
            std::process::exit(1);
        }
    };

    let server_config = ServerConfig {
        secret: secret.unwrap_or_default(),
        auth_service_url,
    };

    let domain = env::var("DOMAIN").unwrap_or("localhost".to_string());

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(
                web::scope("/api")
                    .service(api_v1_products)
                    .service(api_v1_sales)
                    .service(api_pdf_remito),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(show_clients)
                    .service(add_client)
                    .service(edit_client)
                    .service(delete_client)
                    .service(show_products)
                    .service(export_products)
                    .service(add_product)
                    .service(edit_product)
                    .service(delete_product)
                    .service(upload_products)
                    .service(reprice_products)
                    .service(show_quotes)
                    .service(add_quote)
                    .service(show_quote)
                    .service(reject_quote_route)
                    .service(convert_quote_route)
                    .service(delete_quote)
                    .service(show_projects)
                    .service(add_project)
                    .service(show_project)
                    .service(change_project_status_route)
                    .service(delete_project)
                    .service(show_sales)
                    .service(export_sales)
                    .service(add_sale)
                    .service(show_sale)
                    .service(change_sale_status_route)
                    .service(delete_sale)
                    .service(show_expenses)
                    .service(add_expense)
                    .service(add_category)
                    .service(add_payment)
                    .service(delete_expense)
                    .service(show_shipments)
                    .service(add_shipment)
                    .service(advance_shipment_route)
                    .service(delete_shipment)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
