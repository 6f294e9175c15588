use crate::control::{catalog_state, render_loading, render_template, ControllerError, Response, PLACEHOLDER_IMAGE};
use crate::invalid_as_none;
use actix::Addr;
use actix_web::get;
use actix_web::web::{Data, Path, Query};
use askama::Template;
use serde::Deserialize;
use tyre_types::catalog::service::CatalogService;
use tyre_types::{CatalogState, Product};

#[derive(Template)]
#[template(path = "product.html")]
pub struct ProductPage {
    product: Product,
    category: String,
    price: Option<String>,
    description: Option<String>,
    specs: Vec<(String, String)>,
    pdf_url: Option<String>,
    placeholder_image: &'static str,
}

impl ProductPage {
    pub fn new(product: Product) -> Self {
        Self {
            category: product.category(),
            price: product.display_price(),
            description: product.description_text().map(ToString::to_string),
            specs: product.displayable_specs(),
            pdf_url: product.pdf_url().map(ToString::to_string),
            placeholder_image: PLACEHOLDER_IMAGE,
            product,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    /// Catalog position of the product the link was built for.
    #[serde(default, deserialize_with = "invalid_as_none")]
    pub at: Option<usize>,
}

#[get("/products/{slug}")]
pub async fn view(
    slug: Path<String>,
    params: Query<ViewParams>,
    catalog_service: Data<Addr<CatalogService>>,
) -> Response {
    let slug = slug.into_inner();
    let catalog = match catalog_state(&catalog_service).await? {
        CatalogState::Loading => return render_loading("Loading product"),
        CatalogState::Ready(catalog) => catalog,
    };
    let (_, product) = catalog
        .find_by_slug(&slug, params.at)
        .ok_or(ControllerError::NotFound)?;
    render_template(ProductPage::new(product.clone()))
}
