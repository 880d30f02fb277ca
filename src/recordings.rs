//! Catalog pipeline: recording + images + subtitles, merged by the mapper.

use std::sync::Arc;
use tracing::{info, warn};

use crate::encora::{EncoraApi, Recording, RecordingMapper};
use crate::models::MetadataResponse;
use crate::stagemedia::{fetch_images, ImageBundle, StageMediaApi};

#[derive(Clone)]
pub struct RecordingService {
    encora: Arc<dyn EncoraApi>,
    stagemedia: Arc<dyn StageMediaApi>,
    mapper: RecordingMapper,
}

impl RecordingService {
    pub fn new(
        encora: Arc<dyn EncoraApi>,
        stagemedia: Arc<dyn StageMediaApi>,
        mapper: RecordingMapper,
    ) -> Self {
        Self {
            encora,
            stagemedia,
            mapper,
        }
    }

    /// Never fails: a recording that cannot be fetched or mapped yields an
    /// empty container. Image and subtitle failures only drop that data.
    pub async fn match_recording(&self, id: u64) -> MetadataResponse {
        let recording = match self.encora.fetch_recording(id).await {
            Ok(recording) => recording,
            Err(e) => {
                warn!(recording_id = id, "Error fetching recording: {:#}", e);
                return MetadataResponse::empty();
            }
        };

        let (images, subtitles) = tokio::join!(self.images_for(&recording), async {
            match self.encora.fetch_subtitles(id).await {
                Ok(subs) => {
                    info!(recording_id = id, count = subs.len(), "Fetched subtitles");
                    subs
                }
                Err(e) => {
                    warn!(recording_id = id, "Failed to fetch subtitles: {:#}", e);
                    Vec::new()
                }
            }
        });

        match self.mapper.map(&recording, images.as_ref(), &subtitles) {
            Ok(movie) => MetadataResponse::single(movie),
            Err(e) => {
                warn!(recording_id = id, "Failed to map recording: {}", e);
                MetadataResponse::empty()
            }
        }
    }

    async fn images_for(&self, recording: &Recording) -> Option<ImageBundle> {
        let show_id = recording.metadata.show_id.filter(|id| *id > 0)?;
        let actor_ids: Vec<u64> = recording.cast.iter().map(|c| c.performer.id).collect();
        Some(fetch_images(self.stagemedia.as_ref(), show_id, &actor_ids).await)
    }

    /// Only a purely numeric query is understood, as a recording id.
    pub async fn search(&self, query: &str) -> MetadataResponse {
        let id = (!query.is_empty() && query.bytes().all(|b| b.is_ascii_digit()))
            .then(|| query.parse::<u64>().ok())
            .flatten();
        match id {
            Some(id) => self.match_recording(id).await,
            None => {
                info!(query, "Search query is not an id; name search unsupported");
                MetadataResponse::empty()
            }
        }
    }
}
