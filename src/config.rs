use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;
use tracing::info;

use crate::encora::{TitleFormat, DEFAULT_DATE_REPLACE_CHAR, DEFAULT_TITLE_FORMAT, ENCORA_BASE};
use crate::stagemedia::STAGEMEDIA_BASE;

pub const DEFAULT_PORT: u16 = 3000;
const REQUIRED: [&str; 2] = ["ENCORA_API_KEY", "STAGEMEDIA_API_KEY"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub encora_api_key: String,
    pub stagemedia_api_key: String,
    pub encora_base_url: String,
    pub stagemedia_base_url: String,
    pub title_format: TitleFormat,
    pub nfo_base_path: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<&str> = REQUIRED.iter().copied().filter(|k| get(*k).is_none()).collect();
        if !missing.is_empty() {
            bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("PORT must be a port number, got {raw:?}: {e}"))?,
            None => DEFAULT_PORT,
        };

        let replace_char = get("DATE_REPLACE_CHAR")
            .and_then(|v| v.chars().next())
            .unwrap_or(DEFAULT_DATE_REPLACE_CHAR);
        let template = get("TITLE_FORMAT").unwrap_or_else(|| DEFAULT_TITLE_FORMAT.to_string());

        let nfo_base_path = match get("NFO_BASE_PATH") {
            Some(path) => PathBuf::from(path),
            None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        let config = Self {
            encora_api_key: get("ENCORA_API_KEY").unwrap_or_default(),
            stagemedia_api_key: get("STAGEMEDIA_API_KEY").unwrap_or_default(),
            encora_base_url: get("ENCORA_BASE_URL").unwrap_or_else(|| ENCORA_BASE.to_string()),
            stagemedia_base_url: get("STAGEMEDIA_BASE_URL")
                .unwrap_or_else(|| STAGEMEDIA_BASE.to_string()),
            title_format: TitleFormat::new(template, replace_char),
            nfo_base_path,
            port,
        };
        info!(
            port = config.port,
            nfo_base_path = %config.nfo_base_path.display(),
            title_format = %config.title_format.template,
            "Configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn lists_every_missing_key() {
        let err = Config::from_lookup(lookup(&[("STAGEMEDIA_API_KEY", " ")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: ENCORA_API_KEY, STAGEMEDIA_API_KEY"
        );
    }

    #[test]
    fn applies_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("ENCORA_API_KEY", "enc"),
            ("STAGEMEDIA_API_KEY", "sm"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.title_format, TitleFormat::default());
        assert_eq!(config.encora_base_url, "https://encora.it/api");
        assert_eq!(config.stagemedia_base_url, "https://stagemedia.me/api");
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("ENCORA_API_KEY", "enc"),
            ("STAGEMEDIA_API_KEY", "sm"),
            ("PORT", "8080"),
            ("TITLE_FORMAT", "{{show}} ({{date_iso}})"),
            ("DATE_REPLACE_CHAR", "?"),
            ("NFO_BASE_PATH", "/media/theatre"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.title_format.template, "{{show}} ({{date_iso}})");
        assert_eq!(config.title_format.replace_char, '?');
        assert_eq!(config.nfo_base_path, PathBuf::from("/media/theatre"));
    }

    #[test]
    fn rejects_bad_port() {
        let err = Config::from_lookup(lookup(&[
            ("ENCORA_API_KEY", "enc"),
            ("STAGEMEDIA_API_KEY", "sm"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().starts_with("PORT must be a port number"));
    }
}
