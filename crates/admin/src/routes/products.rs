//! Product management: list, create, edit, delete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use portell_core::models::Product;
use portell_core::{Language, ProductCategory, ProductId};
use portell_gateway::{Record, SortSpec};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use super::dashboard::AdminUserView;
use super::forms::{self, FieldError};
use super::SelectOption;
use crate::{
    error::{AppError, Result},
    filters,
    middleware::RequireAdmin,
    state::AppState,
};

const PRODUCTS_PATH: &str = "/products";
const MIN_VINTAGE: i32 = 1900;
const MAX_VINTAGE: i32 = 2100;

/// Product row for the list page.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub category: &'static str,
    pub vintage: Option<i32>,
    pub price: Decimal,
    pub stock: u32,
    pub active: bool,
    pub featured: bool,
    pub image_url: String,
}

impl From<&Record<Product>> for ProductView {
    fn from(product: &Record<Product>) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.label(Language::En),
            vintage: product.vintage,
            price: product.price,
            stock: product.stock,
            active: product.active,
            featured: product.featured,
            image_url: product.image_url.clone(),
        }
    }
}

/// Products list page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub products: Vec<ProductView>,
}

/// The product editor as posted. Every field is text so rejected input can
/// be shown back unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub name_en: String,
    pub slug: String,
    pub description: String,
    pub description_en: String,
    pub price: String,
    pub category: String,
    pub wine_type: String,
    pub vintage: String,
    pub grape_variety: String,
    pub image_url: String,
    pub stock: String,
    pub active: Option<String>,
    pub featured: Option<String>,
}

impl ProductForm {
    /// Defaults for a new product: a red wine, active, nothing in stock.
    fn blank() -> Self {
        Self {
            price: "0".to_owned(),
            category: ProductCategory::Red.code().to_owned(),
            stock: "0".to_owned(),
            active: Some("on".to_owned()),
            ..Self::default()
        }
    }

    fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            name_en: product.name_en.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            description_en: product.description_en.clone(),
            price: product.price.to_string(),
            category: product.category.code().to_owned(),
            wine_type: product.wine_type.clone(),
            vintage: product.vintage.map(|v| v.to_string()).unwrap_or_default(),
            grape_variety: product.grape_variety.clone(),
            image_url: product.image_url.clone(),
            stock: product.stock.to_string(),
            active: product.active.then(|| "on".to_owned()),
            featured: product.featured.then(|| "on".to_owned()),
        }
    }

    /// Validate into a product.
    ///
    /// # Errors
    ///
    /// Returns the first field that needs correcting.
    pub fn parse(&self) -> std::result::Result<Product, FieldError> {
        let name = forms::required(&self.name, "Name")?;
        let category = self
            .category
            .parse::<ProductCategory>()
            .map_err(|_| FieldError("Pick a category".to_owned()))?;
        let vintage = match self.vintage.trim() {
            "" => None,
            raw => Some(
                raw.parse::<i32>()
                    .ok()
                    .filter(|year| (MIN_VINTAGE..=MAX_VINTAGE).contains(year))
                    .ok_or_else(|| {
                        FieldError(format!(
                            "Vintage must be a year between {MIN_VINTAGE} and {MAX_VINTAGE}"
                        ))
                    })?,
            ),
        };

        Ok(Product {
            slug: forms::slug_or_derived(&self.slug, &name),
            name,
            name_en: self.name_en.trim().to_owned(),
            description: self.description.trim().to_owned(),
            description_en: self.description_en.trim().to_owned(),
            price: forms::price(&self.price, "Price")?,
            category,
            wine_type: self.wine_type.trim().to_owned(),
            vintage,
            grape_variety: self.grape_variety.trim().to_owned(),
            image_url: self.image_url.trim().to_owned(),
            stock: forms::count(&self.stock, "Stock", 0)?,
            active: forms::checkbox(self.active.as_ref()),
            featured: forms::checkbox(self.featured.as_ref()),
        })
    }

    fn category_options(&self) -> Vec<SelectOption> {
        ProductCategory::ALL
            .iter()
            .map(|category| {
                SelectOption::new(category.code(), category.label(Language::En), &self.category)
            })
            .collect()
    }
}

/// Product editor template, for both new and existing products.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub heading: String,
    pub action: String,
    pub form: ProductForm,
    pub categories: Vec<SelectOption>,
    pub error: Option<String>,
}

impl ProductFormTemplate {
    fn new(admin_user: AdminUserView, target: Option<ProductId>, form: ProductForm) -> Self {
        let (heading, action) = match target {
            Some(id) => (format!("Edit {}", form.name), format!("{PRODUCTS_PATH}/{id}")),
            None => ("New product".to_owned(), PRODUCTS_PATH.to_owned()),
        };
        Self {
            admin_user,
            current_path: PRODUCTS_PATH.to_string(),
            heading,
            action,
            categories: form.category_options(),
            form,
            error: None,
        }
    }

    fn with_error(mut self, error: FieldError) -> Self {
        self.error = Some(error.0);
        self
    }
}

fn parse_id(id: &str) -> Result<ProductId> {
    id.parse()
        .map_err(|_| AppError::NotFound(format!("product {id}")))
}

/// Products list page handler.
///
/// # Errors
///
/// Returns error if the gateway cannot be read.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<ProductsIndexTemplate> {
    let products = state
        .gateway()
        .products
        .list(&SortSpec::default(), None)
        .await?;

    Ok(ProductsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: PRODUCTS_PATH.to_string(),
        products: products.iter().map(ProductView::from).collect(),
    })
}

/// Empty editor.
#[instrument(skip(admin))]
pub async fn new_form(RequireAdmin(admin): RequireAdmin) -> ProductFormTemplate {
    ProductFormTemplate::new(AdminUserView::from(&admin), None, ProductForm::blank())
}

/// Create a product, or show the editor again with what needs fixing.
///
/// # Errors
///
/// Returns error if the gateway write fails.
#[instrument(skip(admin, state, form), fields(name = %form.name))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let product = match form.parse() {
        Ok(product) => product,
        Err(error) => {
            let page = ProductFormTemplate::new(AdminUserView::from(&admin), None, form);
            return Ok(page.with_error(error).into_response());
        }
    };

    let record = state.gateway().products.create(&product).await?;
    tracing::info!(product_id = %record.id, "Product created");
    Ok(Redirect::to(PRODUCTS_PATH).into_response())
}

/// Editor filled with the stored product.
///
/// # Errors
///
/// Returns 404 for unknown products.
#[instrument(skip(admin, state))]
pub async fn edit_form(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ProductFormTemplate> {
    let id = parse_id(&id)?;
    let record = state.gateway().products.get(id).await?;
    Ok(ProductFormTemplate::new(
        AdminUserView::from(&admin),
        Some(id),
        ProductForm::from_product(&record),
    ))
}

/// Save edits. Last write wins.
///
/// # Errors
///
/// Returns 404 for unknown products.
#[instrument(skip(admin, state, form))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let id = parse_id(&id)?;
    let product = match form.parse() {
        Ok(product) => product,
        Err(error) => {
            let page = ProductFormTemplate::new(AdminUserView::from(&admin), Some(id), form);
            return Ok(page.with_error(error).into_response());
        }
    };

    state.gateway().products.update(id, &product).await?;
    tracing::info!(product_id = %id, "Product updated");
    Ok(Redirect::to(PRODUCTS_PATH).into_response())
}

/// Remove a product.
///
/// # Errors
///
/// Returns 404 for unknown products.
#[instrument(skip(_admin, state))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = parse_id(&id)?;
    if !state.gateway().products.delete(id).await? {
        return Err(AppError::NotFound(format!("product {id}")));
    }
    tracing::info!(product_id = %id, "Product deleted");
    Ok(Redirect::to(PRODUCTS_PATH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> ProductForm {
        ProductForm {
            name: " Regent 2021 ".to_owned(),
            price: "60,00".to_owned(),
            category: "red".to_owned(),
            vintage: "2021".to_owned(),
            stock: "12".to_owned(),
            active: Some("on".to_owned()),
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_parse_valid_form() {
        let product = filled().parse().unwrap();
        assert_eq!(product.name, "Regent 2021");
        assert_eq!(product.slug, "regent-2021");
        assert_eq!(product.price, Decimal::new(60, 0));
        assert_eq!(product.vintage, Some(2021));
        assert_eq!(product.stock, 12);
        assert!(product.active);
        assert!(!product.featured);
    }

    #[test]
    fn test_parse_rejects_bad_fields() {
        let form = ProductForm {
            name: String::new(),
            ..filled()
        };
        assert_eq!(form.parse().unwrap_err().0, "Name is required");

        let form = ProductForm {
            category: "beer".to_owned(),
            ..filled()
        };
        assert!(form.parse().is_err());

        let form = ProductForm {
            vintage: "21".to_owned(),
            ..filled()
        };
        assert!(form.parse().is_err());
    }

    #[test]
    fn test_blank_vintage_is_none() {
        let form = ProductForm {
            vintage: " ".to_owned(),
            ..filled()
        };
        assert_eq!(form.parse().unwrap().vintage, None);
    }

    #[test]
    fn test_form_round_trips_stored_product() {
        let product = filled().parse().unwrap();
        let again = ProductForm::from_product(&product).parse().unwrap();
        assert_eq!(again, product);
    }
}
