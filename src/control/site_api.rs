use crate::control::{catalog_loading, catalog_state, ControllerError, ListingParams, Response};
use crate::{empty_string_as_none_parse, invalid_as_none, Settings};
use actix::Addr;
use actix_web::get;
use actix_web::web::{Data, Path, Query};
use actix_web::HttpResponse;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tyre_types::catalog::service::CatalogService;
use tyre_types::facet::FacetOptions;
use tyre_types::product::Specifications;
use tyre_types::spec::DEFAULT_TOP_SPECS;
use tyre_types::{paginate, CatalogState, Product};

pub const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    #[serde(flatten)]
    pub listing: ListingParams,
    #[serde(default, deserialize_with = "empty_string_as_none_parse")]
    pub per_page: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    #[serde(default, deserialize_with = "invalid_as_none")]
    pub at: Option<usize>,
}

#[derive(Clone, Serialize)]
pub struct ProductDto {
    pub index: usize,
    pub name: String,
    pub slug: String,
    pub path: String,
    pub category: String,
    pub price: Option<Decimal>,
    pub price_display: Option<String>,
    pub images: Vec<String>,
    pub pdf_url: Option<String>,
    pub description: Option<String>,
    pub specifications: Specifications,
    /// First displayable specifications with formatted keys.
    pub highlights: Vec<(String, String)>,
    pub source_url: String,
}

impl ProductDto {
    pub fn new(index: usize, product: &Product) -> Self {
        Self {
            index,
            name: product.name.clone(),
            slug: product.slug(),
            path: product.path(),
            category: product.category(),
            price: product.price.filter(|p| !p.is_zero()),
            price_display: product.display_price(),
            images: product.image_links.clone(),
            pdf_url: product.pdf_url().map(ToString::to_string),
            description: product.description_text().map(ToString::to_string),
            specifications: product.specifications.clone(),
            highlights: product.top_specs(DEFAULT_TOP_SPECS),
            source_url: product.source_url.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct ProductsPage {
    pub items: Vec<ProductDto>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub products: usize,
}

#[get("/api/products")]
pub async fn list_products(
    catalog_service: Data<Addr<CatalogService>>,
    settings: Data<Settings>,
    params: Query<ProductsQuery>,
) -> Response {
    let page = params.listing.page();
    if page == 0 {
        return Err(ControllerError::InvalidInput {
            field: "page".to_string(),
            msg: "Pages are numbered from 1".to_string(),
        });
    }
    let per_page = params
        .per_page
        .unwrap_or(settings.page_size)
        .clamp(1, MAX_PER_PAGE);
    let selection = params.listing.selection();
    let body = match catalog_state(&catalog_service).await? {
        CatalogState::Loading => ProductsPage {
            items: vec![],
            total: 0,
            page,
            per_page,
            total_pages: 0,
        },
        CatalogState::Ready(catalog) => {
            let matched = catalog.query(&selection);
            let current = paginate(&matched, per_page, page);
            ProductsPage {
                items: current
                    .items
                    .iter()
                    .map(|(i, p)| ProductDto::new(*i, p))
                    .collect(),
                total: current.total_items,
                page,
                per_page,
                total_pages: current.total_pages,
            }
        }
    };
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "public, max-age=60"))
        .json(body))
}

#[get("/api/products/{slug}")]
pub async fn get_product(
    catalog_service: Data<Addr<CatalogService>>,
    slug: Path<String>,
    params: Query<ProductQuery>,
) -> Response {
    let catalog = match catalog_state(&catalog_service).await? {
        CatalogState::Loading => return Err(catalog_loading()),
        CatalogState::Ready(catalog) => catalog,
    };
    let (index, product) = catalog
        .find_by_slug(&slug, params.at)
        .ok_or(ControllerError::NotFound)?;
    Ok(HttpResponse::Ok().json(ProductDto::new(index, product)))
}

#[get("/api/facets")]
pub async fn facets(catalog_service: Data<Addr<CatalogService>>) -> Response {
    let options = match catalog_state(&catalog_service).await? {
        CatalogState::Loading => FacetOptions::default(),
        CatalogState::Ready(catalog) => catalog.facets().clone(),
    };
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "public, max-age=300"))
        .json(options))
}

#[get("/health")]
pub async fn health(catalog_service: Data<Addr<CatalogService>>) -> Response {
    let status = match catalog_state(&catalog_service).await? {
        CatalogState::Loading => Health {
            status: "loading",
            products: 0,
        },
        CatalogState::Ready(catalog) => Health {
            status: "ready",
            products: catalog.len(),
        },
    };
    Ok(HttpResponse::Ok().json(status))
}
