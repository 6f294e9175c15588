use crate::facet::FacetOptions;
use crate::product::Product;
use crate::query::{query_indexed, Selection};
use crate::slug;
use std::sync::Arc;

pub mod service;

/// Immutable product list for a session with its facet options computed once.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    facets: FacetOptions,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        let facets = FacetOptions::from_products(&products);
        Self { products, facets }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn facets(&self) -> &FacetOptions {
        &self.facets
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn query(&self, selection: &Selection) -> Vec<(usize, &Product)> {
        query_indexed(&self.products, selection)
    }

    pub fn find_by_slug(&self, slug: &str, hint: Option<usize>) -> Option<(usize, &Product)> {
        slug::resolve_with_hint(&self.products, slug, hint)
    }
}

#[derive(Debug, Clone)]
pub enum CatalogState {
    Loading,
    Ready(Arc<Catalog>),
}

impl CatalogState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        match self {
            Self::Loading => None,
            Self::Ready(c) => Some(c),
        }
    }
}
