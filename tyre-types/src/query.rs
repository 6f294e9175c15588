//! Search, facet filtering and pagination over an in-memory product list.
//!
//! Everything here is a pure function of the product slice and the current
//! [`Selection`]. Callers are expected to reset the page number to 1 whenever
//! the selection changes; the engine never clamps an out-of-range page.

use crate::facet::Facet;
use crate::product::Product;
use serde::{Deserialize, Serialize};

/// Search text plus at most one value per facet. An empty string means
/// "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub rim: String,
    #[serde(default)]
    pub speed: String,
}

impl Selection {
    pub fn facet(&self, facet: Facet) -> &str {
        match facet {
            Facet::Width => &self.width,
            Facet::Rim => &self.rim,
            Facet::Speed => &self.speed,
        }
    }

    pub fn is_filtered(&self) -> bool {
        Facet::ALL.iter().any(|f| !self.facet(*f).is_empty())
    }

    /// Keeps the search text and drops every facet value.
    pub fn cleared_facets(&self) -> Self {
        Self {
            search: self.search.clone(),
            ..Default::default()
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        let search_ok = self.search.is_empty()
            || product
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        search_ok
            && Facet::ALL.iter().all(|facet| {
                let value = self.facet(*facet);
                value.is_empty() || facet.matches(product, value)
            })
    }
}

/// Products matching `selection`, in catalog order.
pub fn query<'a>(products: &'a [Product], selection: &Selection) -> Vec<&'a Product> {
    products.iter().filter(|p| selection.matches(p)).collect()
}

/// Same as [`query`] but keeps each product's catalog position.
pub fn query_indexed<'a>(
    products: &'a [Product],
    selection: &Selection,
) -> Vec<(usize, &'a Product)> {
    products
        .iter()
        .enumerate()
        .filter(|(_, p)| selection.matches(p))
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_items: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

/// `page` is 1-indexed. Pages past the end, page 0 and a zero page size all
/// yield an empty slice.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let total_pages = if page_size == 0 {
        0
    } else {
        items.len().div_ceil(page_size)
    };
    let slice = match page.checked_sub(1) {
        Some(p) if page_size > 0 => {
            let start = p.saturating_mul(page_size).min(items.len());
            let end = start.saturating_add(page_size).min(items.len());
            &items[start..end]
        }
        _ => &items[..0],
    };
    Page {
        items: slice,
        total_items: items.len(),
        total_pages,
        page,
        page_size,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PageLink {
    Page { number: usize, current: bool },
    Gap,
}

/// Page numbers for a pagination control: first, last and `radius` pages on
/// each side of `current`, with gaps in between. Empty when there is at most
/// one page.
pub fn page_window(current: usize, total: usize, radius: usize) -> Vec<PageLink> {
    if total <= 1 {
        return vec![];
    }
    let mut links = Vec::new();
    let mut last = 0;
    for n in 1..=total {
        let near = n.abs_diff(current) <= radius;
        if n == 1 || n == total || near {
            if last != 0 && n > last + 1 {
                links.push(PageLink::Gap);
            }
            links.push(PageLink::Page {
                number: n,
                current: n == current,
            });
            last = n;
        }
    }
    links
}
