//! Wire shapes consumed by the media server.
//!
//! Scalar fields are camelCase, list fields are PascalCase. Lists are
//! either absent or non-empty; use [`non_empty`] when filling them.

use crate::provider::PROVIDER_IDENTIFIER;
use serde::{Deserialize, Serialize};

pub const METADATA_TYPE_MOVIE: &str = "movie";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageType {
    Background,
    BackgroundSquare,
    ClearLogo,
    CoverPoster,
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "type")]
    pub kind: ImageType,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
}

impl Tag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl Person {
    pub fn named(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            role: None,
            thumb: None,
            order: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtitle {
    pub id: String,
    pub language: String,
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forced: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalGuid {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieMetadata {
    #[serde(rename = "type")]
    pub kind: String,
    pub rating_key: String,
    pub key: String,
    pub guid: String,
    pub title: String,
    #[serde(default)]
    pub originally_available_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio: Option<String>,
    #[serde(rename = "Image", default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<Image>>,
    #[serde(rename = "Genre", default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<Tag>>,
    #[serde(rename = "Subtitle", default, skip_serializing_if = "Option::is_none")]
    pub subtitles: Option<Vec<Subtitle>>,
    #[serde(rename = "Role", default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Person>>,
    #[serde(rename = "Director", default, skip_serializing_if = "Option::is_none")]
    pub directors: Option<Vec<Person>>,
    #[serde(rename = "Guid", default, skip_serializing_if = "Option::is_none")]
    pub guids: Option<Vec<ExternalGuid>>,
    #[serde(rename = "Studio", default, skip_serializing_if = "Option::is_none")]
    pub studios: Option<Vec<Tag>>,
    #[serde(rename = "Country", default, skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaContainer {
    pub offset: usize,
    pub total_size: usize,
    pub identifier: String,
    pub size: usize,
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<MovieMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataResponse {
    #[serde(rename = "MediaContainer")]
    pub media_container: MediaContainer,
}

impl MetadataResponse {
    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    pub fn single(item: MovieMetadata) -> Self {
        Self::from_items(vec![item])
    }

    fn from_items(metadata: Vec<MovieMetadata>) -> Self {
        Self {
            media_container: MediaContainer {
                offset: 0,
                total_size: metadata.len(),
                identifier: PROVIDER_IDENTIFIER.to_string(),
                size: metadata.len(),
                metadata,
            },
        }
    }

    pub fn size(&self) -> usize {
        self.media_container.size
    }

    pub fn is_empty(&self) -> bool {
        self.media_container.size == 0
    }

    pub fn first(&self) -> Option<&MovieMetadata> {
        self.media_container.metadata.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContainer {
    pub offset: usize,
    pub total_size: usize,
    pub identifier: String,
    pub size: usize,
    #[serde(rename = "Image", default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesResponse {
    #[serde(rename = "MediaContainer")]
    pub media_container: ImageContainer,
}

impl ImagesResponse {
    pub fn new(images: Vec<Image>) -> Self {
        Self {
            media_container: ImageContainer {
                offset: 0,
                total_size: images.len(),
                identifier: PROVIDER_IDENTIFIER.to_string(),
                size: images.len(),
                images,
            },
        }
    }
}

/// Collapses an empty list to `None` so it is omitted on the wire.
pub fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// The value as given, or `None` when it is empty.
pub fn present(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> MovieMetadata {
        MovieMetadata {
            kind: METADATA_TYPE_MOVIE.to_string(),
            rating_key: "encora-recording-105".to_string(),
            key: "/library/metadata/encora-recording-105".to_string(),
            guid: "tv.plex.agents.custom.encora://movie/encora-recording-105".to_string(),
            title: "Back to the Future: The Musical".to_string(),
            originally_available_at: "2023-06-30".to_string(),
            thumb: None,
            content_rating: None,
            original_title: None,
            title_sort: None,
            edition_title: None,
            year: None,
            summary: None,
            studio: None,
            images: None,
            genres: None,
            subtitles: None,
            roles: None,
            directors: None,
            guids: None,
            studios: None,
            countries: None,
        }
    }

    #[test]
    fn omits_absent_fields_and_lists() {
        let value = serde_json::to_value(minimal()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "movie",
                "ratingKey": "encora-recording-105",
                "key": "/library/metadata/encora-recording-105",
                "guid": "tv.plex.agents.custom.encora://movie/encora-recording-105",
                "title": "Back to the Future: The Musical",
                "originallyAvailableAt": "2023-06-30"
            })
        );
    }

    #[test]
    fn uses_pascal_case_for_lists() {
        let mut movie = minimal();
        movie.images = Some(vec![Image {
            kind: ImageType::CoverPoster,
            url: "https://example.com/poster.jpg".to_string(),
            alt: Some("Poster".to_string()),
        }]);
        movie.genres = Some(vec![Tag::new("Full Show")]);
        movie.guids = Some(vec![ExternalGuid {
            id: "encora://105".to_string(),
        }]);
        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["Image"][0]["type"], "coverPoster");
        assert_eq!(value["Genre"][0]["tag"], "Full Show");
        assert_eq!(value["Guid"][0]["id"], "encora://105");
    }

    #[test]
    fn containers_report_matching_sizes() {
        let empty = MetadataResponse::empty();
        assert_eq!(empty.media_container.size, 0);
        assert_eq!(empty.media_container.total_size, 0);
        assert_eq!(empty.media_container.identifier, PROVIDER_IDENTIFIER);

        let one = MetadataResponse::single(minimal());
        assert_eq!(one.size(), 1);
        assert_eq!(one.media_container.total_size, 1);
        assert_eq!(one.media_container.offset, 0);
    }

    #[test]
    fn non_empty_collapses_empty_lists() {
        assert_eq!(non_empty::<Tag>(Vec::new()), None);
        assert_eq!(non_empty(vec![Tag::new("x")]), Some(vec![Tag::new("x")]));
        assert_eq!(present(""), None);
        assert_eq!(present("  "), Some("  ".to_string()));
        assert_eq!(present("Venue"), Some("Venue".to_string()));
    }
}
