use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

use super::text::{first_clean_text, language_code};
use super::title::TitleFormat;
use super::types::{Nft, Recording, Subtitle};
use crate::error::ProviderError;
use crate::guid::{build_guid, external_guid, metadata_key};
use crate::models::{
    non_empty, present, ExternalGuid, Image, ImageType, MovieMetadata, Person, Tag,
    METADATA_TYPE_MOVIE,
};
use crate::provider::PROVIDER_IDENTIFIER;
use crate::stagemedia::ImageBundle;

pub const PLACEHOLDER_THUMB: &str = "https://i.ibb.co/xSHDBZDp/c-Xq-YZEu.png";
const NFT_RATING: &str = "NFT";

pub fn recording_rating_key(id: u64) -> String {
    format!("encora-recording-{id}")
}

/// Turns catalog recordings into host metadata records.
#[derive(Debug, Clone, Default)]
pub struct RecordingMapper {
    title_format: TitleFormat,
}

impl RecordingMapper {
    pub fn new(title_format: TitleFormat) -> Self {
        Self { title_format }
    }

    pub fn map(
        &self,
        recording: &Recording,
        images: Option<&ImageBundle>,
        subtitles: &[Subtitle],
    ) -> Result<MovieMetadata, ProviderError> {
        self.map_at(recording, images, subtitles, Utc::now())
    }

    /// Same as [`map`](Self::map) with the NFT window evaluated at `now`.
    pub fn map_at(
        &self,
        recording: &Recording,
        images: Option<&ImageBundle>,
        subtitles: &[Subtitle],
        now: DateTime<Utc>,
    ) -> Result<MovieMetadata, ProviderError> {
        let rating_key = recording_rating_key(recording.id);
        let guid = build_guid(PROVIDER_IDENTIFIER, METADATA_TYPE_MOVIE, &rating_key)?;

        let roles = recording
            .cast
            .iter()
            .map(|member| {
                let thumb = images
                    .and_then(|bundle| bundle.performer_url(member.performer.id))
                    .or_else(|| Some(member.performer.url.as_str()).filter(|u| !u.is_empty()))
                    .unwrap_or(PLACEHOLDER_THUMB);
                Person {
                    tag: member.performer.name.clone(),
                    role: Some(member.character.name.clone()),
                    thumb: Some(thumb.to_string()),
                    order: None,
                }
            })
            .collect::<Vec<_>>();

        let meta = &recording.metadata;
        let genres = [&meta.recording_type, &meta.media_type]
            .into_iter()
            .filter(|g| !g.is_empty())
            .map(Tag::new)
            .collect::<Vec<_>>();

        let posters = images
            .map(|bundle| bundle.poster_urls())
            .unwrap_or_default()
            .iter()
            .map(|url| Image {
                kind: ImageType::CoverPoster,
                url: url.clone(),
                alt: Some(recording.show.clone()),
            })
            .collect::<Vec<_>>();
        let thumb = posters.first().map(|image| image.url.clone());

        let subtitles = subtitles
            .iter()
            .map(|sub| crate::models::Subtitle {
                id: sub.url.clone(),
                language: language_code(&sub.language),
                format: sub.file_type.to_lowercase(),
                forced: None,
            })
            .collect::<Vec<_>>();

        let master = present(&recording.master);

        Ok(MovieMetadata {
            kind: METADATA_TYPE_MOVIE.to_string(),
            key: metadata_key(&rating_key),
            rating_key,
            guid,
            title: self.title(recording),
            originally_available_at: recording.date.full_date.clone(),
            thumb,
            content_rating: content_rating(recording.nft.as_ref(), now),
            original_title: (!recording.tour.is_empty())
                .then(|| format!("{} - {}", recording.show, recording.tour)),
            title_sort: None,
            edition_title: master.clone(),
            year: year_prefix(&recording.date.full_date),
            summary: first_clean_text([
                meta.show_description.as_str(),
                recording.master_notes.as_str(),
                recording.notes.as_str(),
            ]),
            studio: present(&recording.tour),
            images: non_empty(posters),
            genres: non_empty(genres),
            subtitles: non_empty(subtitles),
            roles: non_empty(roles),
            directors: master.map(|m| vec![Person::named(m)]),
            guids: Some(vec![ExternalGuid {
                id: external_guid("encora", recording.id),
            }]),
            studios: present(&meta.venue).map(|v| vec![Tag::new(v)]),
            countries: present(&meta.city).map(|c| vec![Tag::new(c)]),
        })
    }

    fn title(&self, recording: &Recording) -> String {
        match self.title_format.render(recording) {
            Ok(title) => title,
            Err(e) => {
                warn!(
                    recording_id = recording.id,
                    "Title formatting failed, using show name: {}", e
                );
                recording.show.clone()
            }
        }
    }
}

fn content_rating(nft: Option<&Nft>, now: DateTime<Utc>) -> Option<String> {
    let nft = nft?;
    let restricted = nft.nft_forever
        || nft
            .nft_date
            .as_deref()
            .and_then(parse_instant)
            .is_some_and(|until| until > now);
    restricted.then(|| NFT_RATING.to_string())
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn year_prefix(full_date: &str) -> Option<i32> {
    let digits: String = full_date
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
