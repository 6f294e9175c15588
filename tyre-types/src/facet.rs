use crate::product::Product;
use crate::spec::is_displayable;
use derive_more::Display;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Facet {
    #[display("width")]
    Width,
    #[display("rim")]
    Rim,
    #[display("speed")]
    Speed,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Width, Facet::Rim, Facet::Speed];

    /// Case-insensitive substring match on the specification key.
    pub fn matches_key(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        match self {
            Self::Width => key.contains("width"),
            Self::Rim => key.contains("rim"),
            Self::Speed => key.contains("speed") || key.contains("symbol"),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Width | Self::Rim)
    }

    /// True when any specification of `product` belonging to this facet has
    /// exactly `value`.
    pub fn matches(&self, product: &Product, value: &str) -> bool {
        is_displayable(value)
            && product
                .specifications
                .iter()
                .any(|(k, v)| v == value && self.matches_key(k))
    }
}

/// Distinct values of `facet` across all products, independent of any other
/// facet selection.
pub fn extract(products: &[Product], facet: Facet) -> Vec<String> {
    let values: BTreeSet<&str> = products
        .iter()
        .flat_map(|p| p.specifications.iter())
        .filter(|(k, v)| is_displayable(v) && facet.matches_key(k))
        .map(|(_, v)| v)
        .collect();
    let mut values: Vec<String> = values.into_iter().map(ToString::to_string).collect();
    if facet.is_numeric() {
        values.sort_by(|a, b| numeric_cmp(a, b));
    }
    values
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Numbers ascending, then values that are not numbers in lexicographic order.
pub fn numeric_cmp(a: &str, b: &str) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    pub widths: Vec<String>,
    pub rims: Vec<String>,
    pub speed_ratings: Vec<String>,
}

impl FacetOptions {
    pub fn from_products(products: &[Product]) -> Self {
        Self {
            widths: extract(products, Facet::Width),
            rims: extract(products, Facet::Rim),
            speed_ratings: extract(products, Facet::Speed),
        }
    }

    pub fn get(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Width => &self.widths,
            Facet::Rim => &self.rims,
            Facet::Speed => &self.speed_ratings,
        }
    }
}
