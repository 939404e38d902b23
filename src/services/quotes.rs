use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::project::{NewProject, Project};
use crate::domain::quote::{
    NewQuote, NewQuoteBlock, Quote, QuoteListQuery, QuoteStatus, UpdateQuote,
};
use crate::forms::quotes::AddQuoteForm;
use crate::forms::parse_date;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ClientReader, ProductReader, ProjectWriter, QuoteReader, QuoteWriter};
use crate::services::items::{build_line_items, resolve_client};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the quotes index page.
#[derive(Debug, Default, Deserialize)]
pub struct QuotesQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the quotes index template.
pub struct QuotesPageData {
    pub quotes: Paginated<Quote>,
    pub search: Option<String>,
    pub status: Option<String>,
}

/// Loads the quotes overview page.
pub fn load_quotes_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: QuotesQuery,
) -> ServiceResult<QuotesPageData>
where
    R: QuoteReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let QuotesQuery {
        search,
        status,
        page,
    } = query;

    let page = page.unwrap_or(1);
    let mut list_query = QuoteListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if let Some(status_value) = status.as_deref().filter(|value| !value.is_empty()) {
        list_query = list_query.status(QuoteStatus::from(status_value));
    }

    let (total, items) = repo.list_quotes(list_query).map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let quotes = Paginated::new(items, page, total_pages);

    Ok(QuotesPageData {
        quotes,
        search,
        status,
    })
}

/// Loads one quote for the detail page.
pub fn load_quote<R>(repo: &R, user: &AuthenticatedUser, quote_id: i32) -> ServiceResult<Quote>
where
    R: QuoteReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_quote_by_id(quote_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a quote from the builder form: resolves the client snapshot,
/// prices every block and computes the totals server-side.
pub fn create_quote<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddQuoteForm,
) -> ServiceResult<Quote>
where
    R: QuoteWriter + ClientReader + ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let blocks_payload = form
        .parse_blocks()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let quote_date =
        parse_date(&form.quote_date).map_err(|err| ServiceError::Form(err.to_string()))?;

    let (client_id, client) = resolve_client(repo, form.client_id, form.client_name)?;

    let mut blocks = Vec::with_capacity(blocks_payload.len());
    for (position, block) in blocks_payload.into_iter().enumerate() {
        let items = build_line_items(repo, block.items)?;
        let subtotal = items.iter().map(|item| item.subtotal).sum();

        blocks.push(NewQuoteBlock {
            name: block.name,
            position: position as i32,
            subtotal,
            items,
        });
    }

    let mut new_quote = NewQuote::new(client, quote_date).with_blocks(blocks);
    if let Some(client_id) = client_id {
        new_quote = new_quote.with_client_id(client_id);
    }
    if let Some(salesperson) = form.salesperson {
        new_quote = new_quote.with_salesperson(salesperson);
    }
    if let Some(notes) = form.notes {
        new_quote = new_quote.with_notes(notes);
    }

    repo.create_quote(&new_quote).map_err(ServiceError::from)
}

/// Marks a quote as rejected by the customer.
pub fn reject_quote<R>(repo: &R, user: &AuthenticatedUser, quote_id: i32) -> ServiceResult<Quote>
where
    R: QuoteWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let updates = UpdateQuote::new().status(QuoteStatus::Rejected);
    repo.update_quote(quote_id, &updates)
        .map_err(ServiceError::from)
}

/// Converts an accepted quote into a project, copying the frozen client
/// snapshot and every line item. A quote can be converted only once.
pub fn convert_quote<R>(
    repo: &R,
    user: &AuthenticatedUser,
    quote_id: i32,
) -> ServiceResult<Project>
where
    R: QuoteReader + QuoteWriter + ProjectWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let quote = repo
        .get_quote_by_id(quote_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if quote.status == QuoteStatus::Converted {
        return Err(ServiceError::Conflict);
    }

    let items: Vec<_> = quote
        .blocks
        .iter()
        .flat_map(|block| block.items.iter().cloned())
        .collect();

    let start_date = chrono::Local::now().date_naive();
    let mut new_project = NewProject::new(quote.client.clone(), start_date)
        .from_quote(quote.id)
        .with_items(items);
    if let Some(client_id) = quote.client_id {
        new_project = new_project.with_client_id(client_id);
    }
    if let Some(notes) = quote.notes.clone() {
        new_project = new_project.with_notes(notes);
    }

    let project = repo.create_project(&new_project).map_err(ServiceError::from)?;

    let updates = UpdateQuote::new().status(QuoteStatus::Converted);
    repo.update_quote(quote_id, &updates)
        .map_err(ServiceError::from)?;

    Ok(project)
}

/// Deletes a quote.
pub fn remove_quote<R>(repo: &R, user: &AuthenticatedUser, quote_id: i32) -> ServiceResult<()>
where
    R: QuoteWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_quote(quote_id).map_err(ServiceError::from)
}
