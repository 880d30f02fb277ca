//! StageMedia image lookup: performer headshots and show posters.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

use crate::encora::types::nullable;

pub const STAGEMEDIA_BASE: &str = "https://stagemedia.me/api";
pub const IMAGE_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PerformerImage {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
}

/// One `/images` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageBatch {
    #[serde(default, deserialize_with = "nullable")]
    pub performers: Vec<PerformerImage>,
    #[serde(default)]
    pub posters: Option<Vec<String>>,
}

/// Merge of every batch fetched for one recording.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBundle {
    pub performers: Vec<PerformerImage>,
    pub posters: Option<Vec<String>>,
}

impl ImageBundle {
    /// Performers append in batch order; posters keep first appearance.
    pub fn absorb(&mut self, batch: ImageBatch) {
        self.performers.extend(batch.performers);
        if let Some(posters) = batch.posters {
            let merged = self.posters.get_or_insert_with(Vec::new);
            for poster in posters {
                if !merged.contains(&poster) {
                    merged.push(poster);
                }
            }
        }
    }

    /// Latest non-empty URL recorded for a performer.
    pub fn performer_url(&self, performer_id: u64) -> Option<&str> {
        self.performers
            .iter()
            .rev()
            .find(|p| p.id == performer_id && !p.url.is_empty())
            .map(|p| p.url.as_str())
    }

    pub fn poster_urls(&self) -> &[String] {
        self.posters.as_deref().unwrap_or_default()
    }
}

#[async_trait]
pub trait StageMediaApi: Send + Sync {
    async fn fetch_image_batch(&self, show_id: u64, actor_ids: &[u64]) -> Result<ImageBatch>;
}

/// Fetches images in batches of [`IMAGE_BATCH_SIZE`], one at a time and in
/// order. A failed batch is logged and skipped.
pub async fn fetch_images(api: &dyn StageMediaApi, show_id: u64, actor_ids: &[u64]) -> ImageBundle {
    let mut seen = HashSet::new();
    let unique: Vec<u64> = actor_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();

    let mut bundle = ImageBundle::default();
    for (index, batch) in unique.chunks(IMAGE_BATCH_SIZE).enumerate() {
        info!(
            show_id,
            batch = index,
            actors = batch.len(),
            "Fetching StageMedia images"
        );
        match api.fetch_image_batch(show_id, batch).await {
            Ok(images) => bundle.absorb(images),
            Err(e) => warn!(show_id, batch = index, "StageMedia batch failed: {:#}", e),
        }
    }
    bundle
}

#[derive(Debug, Clone)]
pub struct StageMediaClient {
    client: Client,
    base_url: String,
}

impl StageMediaClient {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .context("StageMedia API key is not a valid header value")?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let user_agent = format!("encora-agent/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .context("Failed to build StageMedia HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl StageMediaApi for StageMediaClient {
    async fn fetch_image_batch(&self, show_id: u64, actor_ids: &[u64]) -> Result<ImageBatch> {
        let ids = actor_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}/images?show_id={show_id}&actor_ids={}",
            self.base_url,
            urlencoding::encode(&ids)
        );
        info!("StageMedia API Request: GET {}", url);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .context("StageMedia request failed")?;
        let status = res.status();
        let text = res.text().await.context("reading StageMedia body failed")?;
        if !status.is_success() {
            warn!("StageMedia API Error: {} GET /images", status);
            return Err(anyhow!("{} -> {} {}", url, status, text));
        }
        info!("StageMedia API Response: {} GET /images", status);
        serde_json::from_str(&text).context("StageMedia JSON parse failed")
    }
}
