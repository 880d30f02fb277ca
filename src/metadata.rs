use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::guid::decode_path;
use crate::models::{ImagesResponse, MetadataResponse};
use crate::nfo::NfoResolver;
use crate::recordings::RecordingService;

static RECORDING_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^encora-recording-([0-9]+)$").expect("valid regex"));
static NFO_FILE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^nfo-file-([0-9a-f]+)$").expect("valid regex"));

pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_COUNTRY: &str = "US";

/// Host hints. Logged, never used to alter output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOptions {
    pub language: String,
    pub country: String,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct MetadataService {
    recordings: RecordingService,
    nfo: NfoResolver,
}

impl MetadataService {
    pub fn new(recordings: RecordingService, nfo: NfoResolver) -> Self {
        Self { recordings, nfo }
    }

    pub async fn get_metadata(
        &self,
        rating_key: &str,
        options: &LookupOptions,
    ) -> Result<MetadataResponse, ProviderError> {
        info!(
            rating_key,
            language = %options.language,
            country = %options.country,
            "Metadata request"
        );

        if let Some(id) = RECORDING_KEY
            .captures(rating_key)
            .and_then(|caps| caps[1].parse::<u64>().ok())
        {
            return Ok(self.recordings.match_recording(id).await);
        }

        if let Some(caps) = NFO_FILE_KEY.captures(rating_key) {
            match decode_path(&caps[1]) {
                Some(filename) => {
                    if let Some(movie) = self.nfo.metadata_for_file(&filename) {
                        return Ok(MetadataResponse::single(movie));
                    }
                    warn!(rating_key, filename = %filename, "NFO lookup produced nothing");
                }
                None => warn!(rating_key, "ratingKey does not decode to a path"),
            }
        }

        Err(ProviderError::UnsupportedRatingKey(rating_key.to_string()))
    }

    pub async fn get_images(
        &self,
        rating_key: &str,
        options: &LookupOptions,
    ) -> Result<ImagesResponse, ProviderError> {
        let metadata = self.get_metadata(rating_key, options).await?;
        let images = metadata
            .first()
            .and_then(|movie| movie.images.clone())
            .unwrap_or_default();
        Ok(ImagesResponse::new(images))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encora::{EncoraApi, Recording, RecordingMapper, Subtitle};
    use crate::guid::encode_path;
    use crate::stagemedia::{ImageBatch, StageMediaApi};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FakeEncora;

    #[async_trait]
    impl EncoraApi for FakeEncora {
        async fn fetch_recording(&self, id: u64) -> Result<Recording> {
            Ok(Recording {
                id,
                show: "Hadestown".to_string(),
                ..Recording::default()
            })
        }

        async fn fetch_subtitles(&self, _id: u64) -> Result<Vec<Subtitle>> {
            Ok(Vec::new())
        }
    }

    struct NoImages;

    #[async_trait]
    impl StageMediaApi for NoImages {
        async fn fetch_image_batch(&self, _show_id: u64, _ids: &[u64]) -> Result<ImageBatch> {
            Err(anyhow!("not expected"))
        }
    }

    fn service(base: &std::path::Path) -> MetadataService {
        let recordings = RecordingService::new(
            Arc::new(FakeEncora),
            Arc::new(NoImages),
            RecordingMapper::default(),
        );
        MetadataService::new(recordings, NfoResolver::new(base))
    }

    #[tokio::test]
    async fn resolves_recording_keys() {
        let dir = tempfile::tempdir().unwrap();
        let res = service(dir.path())
            .get_metadata("encora-recording-42", &LookupOptions::default())
            .await
            .unwrap();
        assert_eq!(res.first().unwrap().rating_key, "encora-recording-42");
    }

    #[tokio::test]
    async fn resolves_nfo_file_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("show.nfo"),
            "<movie><title>Come From Away</title><thumb>https://img/cfa.jpg</thumb></movie>",
        )
        .unwrap();
        let key = format!("nfo-file-{}", encode_path("show.mkv"));
        let svc = service(dir.path());

        let res = svc
            .get_metadata(&key, &LookupOptions::default())
            .await
            .unwrap();
        assert_eq!(res.first().unwrap().title, "Come From Away");
        assert_eq!(res.first().unwrap().rating_key, key);

        let images = svc
            .get_images(&key, &LookupOptions::default())
            .await
            .unwrap();
        assert_eq!(images.media_container.size, 1);
        assert_eq!(images.media_container.images[0].url, "https://img/cfa.jpg");
    }

    #[tokio::test]
    async fn missing_descriptor_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let key = format!("nfo-file-{}", encode_path("/nowhere/at/all.mkv"));
        let err = service(dir.path())
            .get_metadata(&key, &LookupOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::UnsupportedRatingKey(key));
    }

    #[tokio::test]
    async fn rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        for key in ["tmdb-movie-1", "encora-recording-", "nfo-file-XYZ", "nfo-hamilton-2016"] {
            let err = svc
                .get_metadata(key, &LookupOptions::default())
                .await
                .unwrap_err();
            assert_eq!(err, ProviderError::UnsupportedRatingKey(key.to_string()));
        }
    }

    #[tokio::test]
    async fn images_empty_for_recording_without_posters() {
        let dir = tempfile::tempdir().unwrap();
        let images = service(dir.path())
            .get_images("encora-recording-42", &LookupOptions::default())
            .await
            .unwrap();
        assert_eq!(images.media_container.size, 0);
        assert!(images.media_container.images.is_empty());
    }
}
