use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use super::types::{Recording, Subtitle};
use super::EncoraApi;

pub const ENCORA_BASE: &str = "https://encora.it/api";

#[derive(Debug, Clone)]
pub struct EncoraClient {
    client: Client,
    base_url: String,
}

impl EncoraClient {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .context("Encora API key is not a valid header value")?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let user_agent = format!("encora-agent/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .context("Failed to build Encora HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        info!("Encora API Request: GET {}", url);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Encora request failed: GET {url}"))?;
        let status = res.status();
        let text = res.text().await.context("reading Encora body failed")?;
        if !status.is_success() {
            warn!("Encora API Error: {} GET {}", status, path);
            return Err(anyhow!("{} -> {} {}", url, status, text));
        }
        info!("Encora API Response: {} GET {}", status, path);
        serde_json::from_str(&text).with_context(|| format!("Encora JSON parse failed for {path}"))
    }
}

#[async_trait]
impl EncoraApi for EncoraClient {
    async fn fetch_recording(&self, id: u64) -> Result<Recording> {
        self.get_json(&format!("/recording/{id}")).await
    }

    async fn fetch_subtitles(&self, id: u64) -> Result<Vec<Subtitle>> {
        self.get_json(&format!("/recording/{id}/subtitles")).await
    }
}
