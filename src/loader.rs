//! Catalog loading from a JSON document on disk or behind a URL.
//!
//! The document must be an object with a `data` array. Records inside the
//! array that are not products are skipped with a warning; anything wrong
//! with the document itself is a [`LoadError`].

use anyhow::Context;
use async_trait::async_trait;
use derive_more::{Display, Error};
use reqwest::{StatusCode, Url};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tyre_types::catalog::service::CatalogSource;
use tyre_types::product::{self, Product, ProductsData};

#[derive(Debug, Display, Error)]
pub enum LoadError {
    #[display("Unable to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[display("Request failed: {_0}")]
    Http(reqwest::Error),
    #[display("Unexpected response status {_0}")]
    Status(#[error(not(source))] StatusCode),
    #[display("Malformed catalog document: {_0}")]
    Parse(serde_json::Error),
    #[display("Invalid catalog document: {_0}")]
    Invalid(#[error(not(source))] String),
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

pub fn parse_document(bytes: &[u8]) -> Result<Vec<Product>, LoadError> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(LoadError::Parse)?;
    match value.get("data") {
        Some(serde_json::Value::Array(_)) => (),
        Some(_) => return Err(LoadError::Invalid("`data` is not an array".to_string())),
        None => return Err(LoadError::Invalid("missing `data` array".to_string())),
    }
    let document: ProductsData = serde_json::from_value(value).map_err(LoadError::Parse)?;
    let total = document.data.len();
    let products: Vec<Product> = product::convert(document.data).collect();
    if products.len() < total {
        log::warn!(
            "Skipped {} of {total} catalog records",
            total - products.len()
        );
    }
    Ok(products)
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    async fn load(&self) -> Result<Vec<Product>, anyhow::Error> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        Ok(parse_document(&bytes)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct HttpSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpSource {
    pub fn new(url: Url) -> Result<Self, anyhow::Error> {
        let client = reqwest::ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .use_rustls_tls()
            .build()
            .context("Unable to build http client")?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl CatalogSource for HttpSource {
    async fn load(&self) -> Result<Vec<Product>, anyhow::Error> {
        let res = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(LoadError::from)?;
        if !res.status().is_success() {
            return Err(LoadError::Status(res.status()).into());
        }
        let bytes = res.bytes().await.map_err(LoadError::from)?;
        Ok(parse_document(&bytes)?)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// `http(s)://` locations are fetched, everything else is read from disk.
pub fn source_from_str(location: &str) -> Result<Arc<dyn CatalogSource>, anyhow::Error> {
    let location = location.trim();
    if location.starts_with("http://") || location.starts_with("https://") {
        let url = Url::parse(location).with_context(|| format!("Invalid catalog url {location}"))?;
        Ok(Arc::new(HttpSource::new(url)?))
    } else {
        Ok(Arc::new(FileSource::new(location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOCUMENT: &str = r#"{
        "data": [
            {
                "product_name": "Apollo Alnac 4G 195/65 R15",
                "product_price": 5400,
                "product_pdf_urls": ["https://example.com/alnac.pdf"],
                "product_image_urls": ["https://example.com/alnac-1.png", "https://example.com/alnac-2.png"],
                "product_description": "Everyday comfort",
                "product_specifications": { "tyre_width": "195", "rim_diameter": "15", "speed_symbol": "H" },
                "source_url": "https://www.apollotyres.com/en-in/car-tyres/alnac-4g/"
            },
            { "product_price": 10 },
            {
                "product_name": "Apollo Amazer 4G Life",
                "product_price": null,
                "product_pdf_urls": "",
                "product_image_urls": [],
                "product_specifications": {},
                "source_url": ""
            }
        ]
    }"#;

    #[test]
    fn parses_document_and_skips_invalid_records() {
        let products = parse_document(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].slug(), "apollo-alnac-4g-195-65-r15");
        assert_eq!(products[0].pdf_url(), Some("https://example.com/alnac.pdf"));
        assert_eq!(products[0].category(), "Car Tyres");
        assert_eq!(products[1].pdf_url(), None);
        assert_eq!(products[1].display_price(), None);
    }

    #[test]
    fn keeps_document_order_of_specifications() {
        let products = parse_document(
            br#"{ "data": [ {
                "product_name": "Apollo Alnac 4G",
                "product_specifications": {
                    "tyre_width": "195",
                    "rim_diameter": "15",
                    "aspect_ratio": "65",
                    "speed_symbol": "H",
                    "load_index": "91"
                }
            } ] }"#,
        )
        .unwrap();
        assert_eq!(
            products[0].top_specs(4),
            vec![
                ("Tyre Width".to_string(), "195".to_string()),
                ("Rim Diameter".to_string(), "15".to_string()),
                ("Aspect Ratio".to_string(), "65".to_string()),
                ("Speed Symbol".to_string(), "H".to_string()),
            ]
        );
        let keys: Vec<_> = products[0].displayable_specs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            ["Tyre Width", "Rim Diameter", "Aspect Ratio", "Speed Symbol", "Load Index"]
        );
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            parse_document(b"{ not json"),
            Err(LoadError::Parse(_))
        ));
        assert!(matches!(
            parse_document(b"{\"items\": []}"),
            Err(LoadError::Invalid(_))
        ));
        assert!(matches!(
            parse_document(b"{\"data\": {}}"),
            Err(LoadError::Invalid(_))
        ));
        assert!(matches!(parse_document(b"[]"), Err(LoadError::Invalid(_))));
        assert!(parse_document(b"{\"data\": []}").unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOCUMENT.as_bytes()).unwrap();
        let source = source_from_str(&file.path().display().to_string()).unwrap();
        assert_eq!(source.load().await.unwrap().len(), 2);
    }

    #[actix_rt::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("products.json"));
        let err = source.load().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::Io { .. })
        ));
    }

    #[test]
    fn picks_source_by_scheme() {
        assert_eq!(
            source_from_str("https://example.com/data/products.json")
                .unwrap()
                .describe(),
            "https://example.com/data/products.json"
        );
        assert_eq!(
            source_from_str(" static/data/products.json ").unwrap().describe(),
            "static/data/products.json"
        );
    }
}
