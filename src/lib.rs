#![deny(clippy::unwrap_used)]

use serde::de::IntoDeserializer;
use serde::Deserialize;

pub mod control;
pub mod loader;

pub const DEFAULT_CATALOG_SOURCE: &str = "static/data/products.json";
pub const DEFAULT_PAGE_SIZE: usize = 16;
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Settings {
    pub catalog_source: String,
    pub bind_addr: String,
    pub port: u16,
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_source: DEFAULT_CATALOG_SOURCE.to_string(),
            bind_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Reads `CATALOG_SOURCE`, `BIND_ADDR`, `PORT` and `PAGE_SIZE`, keeping
    /// defaults for anything missing or unparsable.
    pub fn from_env() -> Self {
        let default = Self::default();
        let catalog_source = non_empty_var("CATALOG_SOURCE").unwrap_or(default.catalog_source);
        let bind_addr = non_empty_var("BIND_ADDR").unwrap_or(default.bind_addr);
        let port = envmnt::get_parse("PORT").unwrap_or(default.port);
        let page_size = envmnt::get_parse::<_, usize, _>("PAGE_SIZE")
            .ok()
            .filter(|v| *v > 0)
            .unwrap_or(default.page_size);
        Self {
            catalog_source,
            bind_addr,
            port,
            page_size,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    let opt = Option::<String>::deserialize(de)?;
    let opt = opt.as_deref();
    match opt {
        None | Some("") | Some("all") | Some("any") => Ok(None),
        Some(s) => T::deserialize(s.into_deserializer()).map(Some),
    }
}

pub fn empty_string_as_none_parse<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    let opt = Option::<String>::deserialize(de)?;
    let opt = opt.as_deref().map(str::trim);
    match opt {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map_err(|err| serde::de::Error::custom(format!("{err:?}")))
            .map(Some),
    }
}

/// Like [`empty_string_as_none_parse`], but a value that does not parse is
/// also `None`. For parameters that are only hints.
pub fn invalid_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
{
    let opt = Option::<String>::deserialize(de)?;
    Ok(opt.as_deref().and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[derive(Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        width: Option<String>,
        #[serde(default, deserialize_with = "empty_string_as_none_parse")]
        page: Option<usize>,
    }

    #[derive(Deserialize)]
    struct Hint {
        #[serde(default, deserialize_with = "invalid_as_none")]
        at: Option<usize>,
    }

    #[test]
    fn treats_blank_params_as_missing() {
        let p: Params = serde_urlencoded::from_str("width=&page=").unwrap();
        assert_eq!(p.width, None);
        assert_eq!(p.page, None);
        let p: Params = serde_urlencoded::from_str("width=all").unwrap();
        assert_eq!(p.width, None);
        let p: Params = serde_urlencoded::from_str("width=195&page=3").unwrap();
        assert_eq!(p.width.as_deref(), Some("195"));
        assert_eq!(p.page, Some(3));
        assert!(serde_urlencoded::from_str::<Params>("page=abc").is_err());
    }

    #[test]
    fn ignores_unparsable_hints() {
        let h: Hint = serde_urlencoded::from_str("at=3").unwrap();
        assert_eq!(h.at, Some(3));
        for qs in ["at=abc", "at=-1", "at=", ""] {
            let h: Hint = serde_urlencoded::from_str(qs).unwrap();
            assert_eq!(h.at, None, "{qs}");
        }
    }

    #[test]
    fn reads_page_size_from_env() {
        envmnt::set("PAGE_SIZE", "24");
        assert_eq!(Settings::from_env().page_size, 24);
        envmnt::set("PAGE_SIZE", "0");
        assert_eq!(Settings::from_env().page_size, DEFAULT_PAGE_SIZE);
        envmnt::set("PAGE_SIZE", "many");
        assert_eq!(Settings::from_env().page_size, DEFAULT_PAGE_SIZE);
        envmnt::remove("PAGE_SIZE");
        assert_eq!(Settings::from_env().page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn default_settings() {
        let s = Settings::default();
        assert_eq!(s.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(s.catalog_source, DEFAULT_CATALOG_SOURCE);
    }
}
