use crate::category::extract_category;
use crate::slug::slugify;
use crate::spec;
use anyhow::anyhow;
use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Deserialize, Debug, Default)]
pub struct ProductsData {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    #[serde(rename = "product_name")]
    pub name: String,
    #[serde(rename = "product_price", default)]
    pub price: Option<Decimal>,
    #[serde(rename = "product_pdf_urls", default)]
    pub pdf_links: PdfLinks,
    #[serde(rename = "product_image_urls", default)]
    pub image_links: Vec<String>,
    #[serde(rename = "product_description", default)]
    pub description: Option<String>,
    #[serde(rename = "product_specifications", default)]
    pub specifications: Specifications,
    #[serde(rename = "source_url", default)]
    pub source_url: String,
}

impl Product {
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    pub fn path(&self) -> String {
        format!("/products/{}", self.slug())
    }

    pub fn category(&self) -> String {
        extract_category(&self.source_url)
    }

    pub fn pdf_url(&self) -> Option<&str> {
        self.pdf_links.first()
    }

    pub fn first_image(&self) -> Option<&str> {
        self.image_links
            .first()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Zero is treated the same as a missing price.
    pub fn display_price(&self) -> Option<String> {
        self.price
            .as_ref()
            .filter(|p| !p.is_zero())
            .map(format_price)
    }

    pub fn top_specs(&self, count: usize) -> Vec<(String, String)> {
        spec::top_specs(&self.specifications, count)
    }

    pub fn displayable_specs(&self) -> Vec<(String, String)> {
        spec::displayable_specs(&self.specifications)
    }
}

impl TryFrom<serde_json::Value> for Product {
    type Error = anyhow::Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let product: Product = serde_json::from_value(value)?;
        if product.name.trim().is_empty() {
            return Err(anyhow!("product_name is empty"));
        }
        Ok(product)
    }
}

/// Converts raw records, skipping the ones that do not describe a product.
pub fn convert(v: impl IntoIterator<Item = serde_json::Value>) -> impl Iterator<Item = Product> {
    v.into_iter().enumerate().filter_map(|(i, raw)| {
        match Product::try_from(raw) {
            Ok(p) => Some(p),
            Err(err) => {
                log::warn!("Unable to convert record #{i} into Product: {err}");
                None
            }
        }
    })
}

pub fn format_price(price: &Decimal) -> String {
    let price = price.round_dp(2).normalize();
    let raw = price.abs().to_string();
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };
    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*d as char);
    }
    let sign = if price.is_sign_negative() && !price.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("₹{sign}{grouped}.{f}"),
        None => format!("₹{sign}{grouped}"),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(untagged)]
pub enum PdfLinks {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl PdfLinks {
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::One(link) => Some(link.as_str()),
            Self::Many(links) => links.first().map(String::as_str),
        }
        .filter(|l| !l.is_empty())
    }
}

/// Specification entries in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specifications(Vec<(String, String)>);

impl Specifications {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Specifications {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut specs = Specifications::default();
        for (k, v) in iter {
            specs.insert(k, v);
        }
        specs
    }
}

impl Serialize for Specifications {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Specifications {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpecsVisitor;

        impl<'de> Visitor<'de> for SpecsVisitor {
            type Value = Specifications;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of specification names to values")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(Specifications::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut specs = Specifications::default();
                while let Some((key, value)) = access.next_entry::<String, SpecValue>()? {
                    specs.insert(key, value.into_string());
                }
                Ok(specs)
            }
        }

        deserializer.deserialize_any(SpecsVisitor)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpecValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null(()),
}

impl SpecValue {
    fn into_string(self) -> String {
        match self {
            Self::Str(s) => s,
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Null(()) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;
    use serde_json::json;

    #[test]
    fn keeps_specification_order() {
        let product = Product::try_from(json!({
            "product_name": "Apollo Amazer 4G Life",
            "product_specifications": {
                "tyre_width": "195",
                "aspect_ratio": "65",
                "rim_diameter": 15,
                "speed_symbol": "H",
                "load_index": null
            }
        }))
        .unwrap();
        let keys: Vec<_> = product.specifications.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            ["tyre_width", "aspect_ratio", "rim_diameter", "speed_symbol", "load_index"]
        );
        let values: Vec<_> = product.specifications.iter().map(|(_, v)| v).collect();
        assert_eq!(values, ["195", "65", "15", "H", ""]);
    }

    #[test]
    fn normalizes_pdf_links() {
        let one: PdfLinks = serde_json::from_value(json!("https://a/b.pdf")).unwrap();
        assert_eq!(one.first(), Some("https://a/b.pdf"));
        let many: PdfLinks = serde_json::from_value(json!(["x.pdf", "y.pdf"])).unwrap();
        assert_eq!(many.first(), Some("x.pdf"));
        let empty: PdfLinks = serde_json::from_value(json!([])).unwrap();
        assert_eq!(empty.first(), None);
        let blank: PdfLinks = serde_json::from_value(json!("")).unwrap();
        assert_eq!(blank.first(), None);
        assert_eq!(PdfLinks::default().first(), None);
    }

    #[test]
    fn rejects_records_without_name() {
        assert!(Product::try_from(json!({ "product_price": 10 })).is_err());
        assert!(Product::try_from(json!({ "product_name": "  " })).is_err());
        let converted: Vec<_> = convert(vec![
            json!({ "product_name": "A" }),
            json!("garbage"),
            json!({ "product_name": "B" }),
        ])
        .collect();
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[1].name, "B");
    }

    #[test]
    fn formats_prices() {
        assert_eq!(format_price(&Decimal::from(1234567)), "₹1,234,567");
        assert_eq!(format_price(&Decimal::from(999)), "₹999");
        assert_eq!(
            format_price(&Decimal::from_f64(4599.5).unwrap()),
            "₹4,599.5"
        );
        let mut p = Product::try_from(json!({ "product_name": "A", "product_price": 0 })).unwrap();
        assert_eq!(p.display_price(), None);
        p.price = Some(Decimal::from(5400));
        assert_eq!(p.display_price().as_deref(), Some("₹5,400"));
        p.price = None;
        assert_eq!(p.display_price(), None);
    }

    #[test]
    fn blank_description_is_absent() {
        let p = Product::try_from(json!({
            "product_name": "A",
            "product_description": "   "
        }))
        .unwrap();
        assert_eq!(p.description_text(), None);
    }
}
