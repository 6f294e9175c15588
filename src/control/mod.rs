use actix::Addr;
use actix_web::{http::header::ContentType, HttpResponse};
use anyhow::anyhow;
use askama::Template;
use derive_more::{Display, Error};
use log_error::LogError;
use serde::{Deserialize, Serialize};
use tyre_types::catalog::service::{self, CatalogService};
use tyre_types::query::Selection;
use tyre_types::CatalogState;

use crate::{empty_string_as_none, empty_string_as_none_parse};

pub mod catalog;
pub mod product;
pub mod site_api;

pub type Response = Result<HttpResponse, ControllerError>;

pub const PLACEHOLDER_IMAGE: &str = "/static/img/tyre-placeholder.svg";

#[derive(Debug, Display, Error)]
pub enum ControllerError {
    NotFound,
    #[display("Service unavailable: {message}")]
    Unavailable {
        retry_after: u64,
        message: String,
    },
    #[error(ignore)]
    InternalServerError(anyhow::Error),
    #[error(ignore)]
    #[display("Invalid field {field}")]
    InvalidInput {
        field: String,
        msg: String,
    },
}

impl From<anyhow::Error> for ControllerError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalServerError(err)
    }
}

impl From<actix::MailboxError> for ControllerError {
    fn from(err: actix::MailboxError) -> Self {
        Self::InternalServerError(err.into())
    }
}

impl actix_web::error::ResponseError for ControllerError {
    fn error_response(&self) -> HttpResponse {
        log::warn!("{self:?}");
        use ControllerError::*;
        match self {
            NotFound => NotFoundPage {}
                .render()
                .log_error("Unable to render error template")
                .map(|res| {
                    HttpResponse::NotFound()
                        .content_type(ContentType::html())
                        .body(res)
                })
                .unwrap_or_else(|| HttpResponse::NotFound().body(())),
            InternalServerError(err) => InternalServerErrorPage {
                error: format!("{err:?}"),
            }
            .render()
            .log_error("Unable to render error template")
            .map(|res| {
                HttpResponse::InternalServerError()
                    .content_type(ContentType::html())
                    .body(res)
            })
            .unwrap_or_else(|| HttpResponse::InternalServerError().body(err.to_string())),
            Unavailable {
                retry_after,
                message,
            } => HttpResponse::ServiceUnavailable()
                .insert_header(("Retry-After", retry_after.to_string()))
                .json(serde_json::json!({
                    "error": "Service unavailable",
                    "message": message,
                    "retry_after": retry_after
                })),
            InvalidInput { field, msg } => {
                HttpResponse::BadRequest().body(format!("{field}\n{msg}"))
            }
        }
    }
}

#[derive(Template)]
#[template(path = "500.html")]
pub struct InternalServerErrorPage {
    error: String,
}

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundPage {}

#[derive(Template)]
#[template(path = "loading.html")]
pub struct LoadingPage {
    title: String,
}

pub fn render_template(t: impl Template) -> Result<HttpResponse, ControllerError> {
    let result = t
        .render()
        .map_err(|x| ControllerError::InternalServerError(anyhow!(x)))?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(result))
}

pub fn render_loading<S: ToString>(title: S) -> Response {
    render_template(LoadingPage {
        title: title.to_string(),
    })
}

pub async fn catalog_state(
    catalog_service: &Addr<CatalogService>,
) -> Result<CatalogState, ControllerError> {
    Ok(catalog_service.send(service::Get).await?)
}

/// Seconds a client should wait before retrying while the catalog loads.
pub const LOADING_RETRY_AFTER: u64 = 2;

pub fn catalog_loading() -> ControllerError {
    ControllerError::Unavailable {
        retry_after: LOADING_RETRY_AFTER,
        message: "Catalog is still loading".to_string(),
    }
}

pub async fn not_found() -> Response {
    Err(ControllerError::NotFound)
}

/// Listing selection as it travels in query strings. Facet selects submit an
/// empty value for "any"; the listing form never submits `page`, so a new
/// search or facet choice always starts from the first page.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ListingParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub rim: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub speed: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none_parse",
        skip_serializing_if = "Option::is_none"
    )]
    pub page: Option<usize>,
}

impl ListingParams {
    pub fn selection(&self) -> Selection {
        Selection {
            search: self.q.clone().unwrap_or_default(),
            width: self.width.clone().unwrap_or_default(),
            rim: self.rim.clone().unwrap_or_default(),
            speed: self.speed.clone().unwrap_or_default(),
        }
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    pub fn from_selection(selection: &Selection, page: Option<usize>) -> Self {
        let non_empty = |s: &str| Some(s.to_string()).filter(|s| !s.is_empty());
        Self {
            q: non_empty(&selection.search),
            width: non_empty(&selection.width),
            rim: non_empty(&selection.rim),
            speed: non_empty(&selection.speed),
            page,
        }
    }

    /// Listing URL carrying this selection.
    pub fn href(&self) -> String {
        match serde_urlencoded::to_string(self) {
            Ok(qs) if !qs.is_empty() => format!("/?{qs}"),
            Ok(_) => "/".to_string(),
            Err(err) => {
                log::warn!("Unable to encode listing params: {err}");
                "/".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_listing_hrefs() {
        let selection = Selection {
            search: "alnac 4g".to_string(),
            width: "195".to_string(),
            ..Default::default()
        };
        assert_eq!(
            ListingParams::from_selection(&selection, Some(2)).href(),
            "/?q=alnac+4g&width=195&page=2"
        );
        assert_eq!(
            ListingParams::from_selection(&Selection::default(), None).href(),
            "/"
        );
    }

    #[test]
    fn reads_selection_from_query() {
        let params: ListingParams =
            serde_urlencoded::from_str("q=Apollo&width=&rim=15&speed=any").unwrap();
        let selection = params.selection();
        assert_eq!(selection.search, "Apollo");
        assert_eq!(selection.width, "");
        assert_eq!(selection.rim, "15");
        assert_eq!(selection.speed, "");
        assert_eq!(params.page(), 1);
    }
}
