use serde::Deserialize;

use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::product::{Product, ProductCategory, ProductListQuery};
use crate::forms::products::{SaveProductForm, UpdatePricesForm, UploadProductsForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::{ADMIN_ROLE, SERVICE_ACCESS_ROLE};

/// Query parameters accepted by the products index page.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Optional category filter.
    pub category: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the products index template.
pub struct ProductsPageData {
    pub products: Paginated<Product>,
    pub search: Option<String>,
    pub category: Option<String>,
}

fn build_list_query(search: Option<&String>, category: Option<&String>) -> ProductListQuery {
    let mut list_query = ProductListQuery::new();
    if let Some(term) = search {
        list_query = list_query.search(term);
    }
    if let Some(category) = category.filter(|value| !value.is_empty()) {
        list_query = list_query.category(ProductCategory::from(category.as_str()));
    }
    list_query
}

/// Loads the catalog overview page.
pub fn load_products_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProductsQuery,
) -> ServiceResult<ProductsPageData>
where
    R: ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let ProductsQuery {
        search,
        category,
        page,
    } = query;

    let page = page.unwrap_or(1);
    let list_query = build_list_query(search.as_ref(), category.as_ref())
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, items) = repo.list_products(list_query).map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let products = Paginated::new(items, page, total_pages);

    Ok(ProductsPageData {
        products,
        search,
        category,
    })
}

/// JSON catalog search backing the item picker.
pub fn search_catalog<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProductsQuery,
) -> ServiceResult<Paginated<Product>>
where
    R: ProductReader + ?Sized,
{
    let data = load_products_page(repo, user, query)?;
    Ok(data.products)
}

/// Creates a new catalog entry.
pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SaveProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_product(&payload).map_err(ServiceError::from)
}

/// Overwrites an existing catalog entry with the submitted fields.
pub fn modify_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: SaveProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_product(product_id, &payload)
        .map_err(ServiceError::from)
}

/// Deletes a catalog entry. Existing documents keep their snapshots.
pub fn remove_product<R>(repo: &R, user: &AuthenticatedUser, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_product(product_id).map_err(ServiceError::from)
}

/// Imports catalog entries from an uploaded CSV file.
pub fn import_products<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mut form: UploadProductsForm,
) -> ServiceResult<usize>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let uploads = form
        .parse()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_products(&uploads).map_err(ServiceError::from)
}

/// Applies a percentage update to catalog prices. Restricted to admins
/// because it rewrites the whole price list.
pub fn update_prices<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: UpdatePricesForm,
) -> ServiceResult<usize>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let (category, percent) = form
        .parse()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.reprice_products(category, percent)
        .map_err(ServiceError::from)
}

/// Builds the CSV export of the catalog.
pub fn export_products_csv<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<String>
where
    R: ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let (_, products) = repo
        .list_products(ProductListQuery::new())
        .map_err(ServiceError::from)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "nombre",
        "categoria",
        "unidad",
        "stock",
        "precio_pie",
        "precio_m2",
        "precio_metro",
        "precio_venta",
        "precio_lista",
    ])?;

    for product in &products {
        let optional = |value: Option<i64>| value.map(|v| v.to_string()).unwrap_or_default();

        writer.write_record([
            product.id.to_string(),
            product.name.clone(),
            <&'static str>::from(product.category).to_string(),
            product.unit.clone().unwrap_or_default(),
            product.stock.to_string(),
            optional(product.price_per_foot),
            optional(product.price_per_m2),
            optional(product.price_per_m),
            optional(product.sale_price),
            optional(product.list_price()),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::repository::mock::{MockProductReader, MockProductWriter};

    fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user-1".to_string(),
            email: "user@example.com".to_string(),
            name: "Tester".to_string(),
            roles: roles.iter().map(|role| (*role).to_string()).collect(),
            exp: 0,
        }
    }

    fn sample_product(id: i32, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            category: ProductCategory::Hardware,
            unit: Some("un".to_string()),
            stock: 5.0,
            price_per_foot: None,
            price_per_m2: None,
            price_per_m: None,
            sale_price: Some(1200),
            height: None,
            width: None,
            length: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn update_prices_requires_admin_role() {
        let repo = MockProductWriter::new();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        let form = UpdatePricesForm {
            category: None,
            percent: "10".to_string(),
        };

        assert!(matches!(
            update_prices(&repo, &user, form),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn update_prices_forwards_category_and_percent() {
        let mut repo = MockProductWriter::new();
        let user = user_with_roles(&[ADMIN_ROLE]);

        repo.expect_reprice_products()
            .times(1)
            .withf(|category, percent| {
                assert_eq!(*category, Some(ProductCategory::Lumber));
                assert_eq!(*percent, 15.0);
                true
            })
            .returning(|_, _| Ok(42));

        let form = UpdatePricesForm {
            category: Some("madera".to_string()),
            percent: "15".to_string(),
        };

        assert_eq!(update_prices(&repo, &user, form).unwrap(), 42);
    }

    #[test]
    fn export_csv_includes_header_and_rows() {
        let mut repo = MockProductReader::new();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.expect_list_products()
            .returning(|_| Ok((1, vec![sample_product(1, "Clavos 2\"")])));

        let csv = export_products_csv(&repo, &user).expect("export should build");
        let mut lines = csv.lines();
        assert!(lines.next().is_some_and(|header| header.starts_with("id,nombre,categoria")));
        let row = lines.next().expect("one data row");
        assert!(row.contains("ferreteria"));
        assert!(row.contains("1200"));
    }

    #[test]
    fn search_catalog_passes_filters_through() {
        let mut repo = MockProductReader::new();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.expect_list_products()
            .times(1)
            .withf(|query| {
                assert_eq!(query.search.as_deref(), Some("tirante"));
                assert_eq!(query.category, Some(ProductCategory::Lumber));
                true
            })
            .returning(|_| Ok((0, Vec::new())));

        let query = ProductsQuery {
            search: Some("tirante".to_string()),
            category: Some("madera".to_string()),
            page: None,
        };

        let page = search_catalog(&repo, &user, query).expect("search should run");
        assert!(page.items.is_empty());
    }
}
