use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::config::ServerConfig;
use crate::forms::expenses::{AddCategoryForm, AddExpenseForm, RegisterPaymentForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::expenses::{
    ExpensesQuery, create_category, create_expense, load_expenses_page, register_payment,
    remove_expense,
};

#[get("/gastos")]
pub async fn show_expenses(
    params: web::Query<ExpensesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_expenses_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "gastos",
                &server_config.auth_service_url,
            );
            context.insert("expenses", &data.expenses);
            context.insert("categories", &data.categories);
            context.insert("kind", &data.kind);
            context.insert("status", &data.status);
            render_template(&tera, "expenses/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list expenses: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/gastos/add")]
pub async fn add_expense(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddExpenseForm>,
) -> impl Responder {
    match create_expense(repo.get_ref(), &user, form.into_inner()) {
        Ok(expense) => {
            FlashMessage::success(format!("Gasto «{}» registrado.", expense.description)).send();
            redirect("/gastos")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/gastos")
        }
        Err(err) => {
            log::error!("Failed to create expense: {err}");
            FlashMessage::error("No se pudo registrar el gasto.").send();
            redirect("/gastos")
        }
    }
}

#[post("/gastos/{expense_id}/pago")]
pub async fn add_payment(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<RegisterPaymentForm>,
) -> impl Responder {
    let expense_id = path.into_inner();

    match register_payment(repo.get_ref(), &user, expense_id, form.into_inner()) {
        Ok(expense) => {
            let status: &'static str = expense.status.into();
            FlashMessage::success(format!(
                "Pago registrado. La cuenta quedó {status}."
            ))
            .send();
            redirect("/gastos")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/gastos")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Gasto no encontrado.").send();
            redirect("/gastos")
        }
        Err(err) => {
            log::error!("Failed to register payment on expense {expense_id}: {err}");
            FlashMessage::error("No se pudo registrar el pago.").send();
            redirect("/gastos")
        }
    }
}

#[post("/gastos/categorias/add")]
pub async fn add_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddCategoryForm>,
) -> impl Responder {
    match create_category(repo.get_ref(), &user, form.into_inner()) {
        Ok(category) => {
            FlashMessage::success(format!("Categoría «{}» creada.", category.name)).send();
            redirect("/gastos")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/gastos")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("Ya existe una categoría con ese nombre.").send();
            redirect("/gastos")
        }
        Err(err) => {
            log::error!("Failed to create expense category: {err}");
            FlashMessage::error("No se pudo crear la categoría.").send();
            redirect("/gastos")
        }
    }
}

#[post("/gastos/{expense_id}/delete")]
pub async fn delete_expense(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let expense_id = path.into_inner();

    match remove_expense(repo.get_ref(), &user, expense_id) {
        Ok(()) => {
            FlashMessage::success("Gasto eliminado.").send();
            redirect("/gastos")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("No tiene permisos suficientes.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Gasto no encontrado o ya eliminado.").send();
            redirect("/gastos")
        }
        Err(err) => {
            log::error!("Failed to delete expense {expense_id}: {err}");
            FlashMessage::error("No se pudo eliminar el gasto.").send();
            redirect("/gastos")
        }
    }
}
