use crate::control::{
    catalog_state, render_template, ListingParams, Response, PLACEHOLDER_IMAGE,
};
use crate::Settings;
use actix::Addr;
use actix_web::get;
use actix_web::web::{Data, Query};
use askama::Template;
use tyre_types::catalog::service::CatalogService;
use tyre_types::facet::{Facet, FacetOptions};
use tyre_types::query::{page_window, paginate, PageLink, Selection};
use tyre_types::{Catalog, CatalogState, Product};

pub const CARD_SPECS: usize = 4;
const PAGE_RADIUS: usize = 2;

pub struct ProductCard {
    pub name: String,
    pub href: String,
    pub image: Option<String>,
    pub specs: Vec<(String, String)>,
    pub price: Option<String>,
}

impl ProductCard {
    pub fn new(position: usize, product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            href: format!("{}?at={position}", product.path()),
            image: product.first_image().map(ToString::to_string),
            specs: product.top_specs(CARD_SPECS),
            price: product.display_price(),
        }
    }
}

pub struct FacetOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub struct FacetSelect {
    pub name: String,
    pub placeholder: String,
    pub options: Vec<FacetOption>,
}

impl FacetSelect {
    pub fn new(facet: Facet, options: &FacetOptions, selection: &Selection) -> Self {
        let selected = selection.facet(facet);
        let (name, placeholder) = match facet {
            Facet::Width => ("width", "Width (mm)"),
            Facet::Rim => ("rim", "Rim Diameter"),
            Facet::Speed => ("speed", "Speed Rating"),
        };
        Self {
            name: name.to_string(),
            placeholder: placeholder.to_string(),
            options: options
                .get(facet)
                .iter()
                .map(|value| FacetOption {
                    value: value.clone(),
                    label: match facet {
                        Facet::Width => format!("{value} mm"),
                        Facet::Rim => format!("{value}\""),
                        Facet::Speed => value.clone(),
                    },
                    selected: value == selected,
                })
                .collect(),
        }
    }
}

pub struct PageItem {
    pub number: Option<usize>,
    pub href: String,
    pub current: bool,
}

#[derive(Template)]
#[template(path = "catalog.html")]
pub struct CatalogPage {
    loading: bool,
    total_products: usize,
    search: String,
    facets: Vec<FacetSelect>,
    has_filters: bool,
    clear_href: String,
    cards: Vec<ProductCard>,
    matched: usize,
    page: usize,
    total_pages: usize,
    pages: Vec<PageItem>,
    prev_href: Option<String>,
    next_href: Option<String>,
    placeholder_image: &'static str,
}

impl CatalogPage {
    pub fn loading(selection: &Selection, page: usize) -> Self {
        Self {
            loading: true,
            total_products: 0,
            search: selection.search.clone(),
            facets: Facet::ALL
                .iter()
                .map(|f| FacetSelect::new(*f, &FacetOptions::default(), selection))
                .collect(),
            has_filters: selection.is_filtered(),
            clear_href: ListingParams::from_selection(&selection.cleared_facets(), None).href(),
            cards: vec![],
            matched: 0,
            page,
            total_pages: 1,
            pages: vec![],
            prev_href: None,
            next_href: None,
            placeholder_image: PLACEHOLDER_IMAGE,
        }
    }

    pub fn build(catalog: &Catalog, selection: &Selection, page: usize, page_size: usize) -> Self {
        let matched = catalog.query(selection);
        let current = paginate(&matched, page_size, page);
        let href = |n: usize| ListingParams::from_selection(selection, Some(n)).href();
        let pages = page_window(page, current.total_pages, PAGE_RADIUS)
            .into_iter()
            .map(|link| match link {
                PageLink::Page { number, current } => PageItem {
                    number: Some(number),
                    href: href(number),
                    current,
                },
                PageLink::Gap => PageItem {
                    number: None,
                    href: String::new(),
                    current: false,
                },
            })
            .collect();
        let prev_href = (page > 1 && page <= current.total_pages).then(|| href(page - 1));
        let next_href = (page >= 1 && page < current.total_pages).then(|| href(page + 1));
        Self {
            loading: false,
            total_products: catalog.len(),
            search: selection.search.clone(),
            facets: Facet::ALL
                .iter()
                .map(|f| FacetSelect::new(*f, catalog.facets(), selection))
                .collect(),
            has_filters: selection.is_filtered(),
            clear_href: ListingParams::from_selection(&selection.cleared_facets(), None).href(),
            cards: current
                .items
                .iter()
                .map(|(i, p)| ProductCard::new(*i, p))
                .collect(),
            matched: matched.len(),
            page,
            total_pages: current.total_pages.max(1),
            pages,
            prev_href,
            next_href,
            placeholder_image: PLACEHOLDER_IMAGE,
        }
    }
}

#[get("/")]
pub async fn index(
    catalog_service: Data<Addr<CatalogService>>,
    settings: Data<Settings>,
    params: Query<ListingParams>,
) -> Response {
    let selection = params.selection();
    let page = params.page();
    let page = match catalog_state(&catalog_service).await? {
        CatalogState::Loading => CatalogPage::loading(&selection, page),
        CatalogState::Ready(catalog) => {
            CatalogPage::build(&catalog, &selection, page, settings.page_size)
        }
    };
    render_template(page)
}
