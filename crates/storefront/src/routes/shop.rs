//! Wine shop route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use portell_core::catalog::{self, ProductQuery, ProductSort};
use portell_core::models::Product;
use portell_core::{Language, ProductCategory, ProductId};
use portell_gateway::{Criteria, Record, SortSpec};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::i18n::Labels;
use crate::middleware::ClientState;
use crate::state::AppState;
use crate::views::{Chrome, Choice, ProductCard};

/// Shop listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ShopQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopIndexTemplate {
    pub chrome: Chrome,
    pub products: Vec<ProductCard>,
    pub categories: Vec<Choice>,
    pub sorts: Vec<Choice>,
    pub category: &'static str,
    pub sort: &'static str,
}

/// Product detail display data.
pub struct ProductDetail {
    pub card: ProductCard,
    pub description: String,
    pub wine_type: String,
    pub grape_variety: String,
    pub stock_note: Option<&'static str>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/show.html")]
pub struct ProductShowTemplate {
    pub chrome: Chrome,
    pub product: ProductDetail,
}

/// Stock at or below which the page says "limited stock".
const LIMITED_STOCK: u32 = 5;

/// Display the product listing.
#[instrument(skip(state, client))]
pub async fn index(
    State(state): State<AppState>,
    client: ClientState,
    Query(params): Query<ShopQuery>,
) -> Result<ShopIndexTemplate> {
    let lang = client.language();
    let t = Labels::for_lang(lang);

    let category_code = catalog::selected(params.category.as_deref());
    let query = ProductQuery {
        category: category_code.and_then(|code| code.parse::<ProductCategory>().ok()),
        sort: ProductSort::parse(params.sort.as_deref()),
        ..ProductQuery::default()
    };

    let products = active_products(&state).await?;
    let products = query.apply(products);

    let current_category = query.category.map_or(catalog::ALL, ProductCategory::code);
    let mut categories = vec![Choice::new(catalog::ALL, t.all, current_category)];
    categories.extend(
        ProductCategory::ALL
            .iter()
            .map(|c| Choice::new(c.code(), c.label(lang), current_category)),
    );

    Ok(ShopIndexTemplate {
        chrome: Chrome::load(&client).await,
        products: products.iter().map(|p| ProductCard::new(p, lang)).collect(),
        categories,
        sorts: product_sorts(t, query.sort),
        category: current_category,
        sort: query.sort.code(),
    })
}

/// Display a product.
///
/// # Errors
///
/// Returns 404 for unknown or inactive products.
#[instrument(skip(state, client))]
pub async fn show(
    State(state): State<AppState>,
    client: ClientState,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let lang = client.language();
    let id: ProductId = id.parse().map_err(|_| AppError::not_found("/shop"))?;

    let record = state
        .gateway()
        .products
        .find_optional(id)
        .await?
        .filter(|record| record.active)
        .ok_or_else(|| AppError::not_found("/shop"))?;

    Ok(ProductShowTemplate {
        chrome: Chrome::load(&client).await,
        product: detail(&record, lang),
    })
}

pub(crate) async fn active_products(state: &AppState) -> Result<Vec<Record<Product>>> {
    Ok(state
        .gateway()
        .products
        .filter(&Criteria::new().eq("active", true), &SortSpec::asc("name"), None)
        .await?)
}

pub(crate) fn product_sorts(t: &Labels, current: ProductSort) -> Vec<Choice> {
    [
        (ProductSort::Name, t.sort_name),
        (ProductSort::PriceAsc, t.sort_price_asc),
        (ProductSort::PriceDesc, t.sort_price_desc),
    ]
    .into_iter()
    .map(|(sort, label)| Choice::new(sort.code(), label, current.code()))
    .collect()
}

fn detail(record: &Record<Product>, lang: Language) -> ProductDetail {
    let t = Labels::for_lang(lang);
    let stock_note = match record.stock {
        0 => None,
        n if n <= LIMITED_STOCK => Some(t.limited_stock),
        _ => Some(t.in_stock),
    };
    ProductDetail {
        card: ProductCard::new(record, lang),
        description: record.localized_description(lang).to_owned(),
        wine_type: record.wine_type.clone(),
        grape_variety: record.grape_variety.clone(),
        stock_note,
    }
}
