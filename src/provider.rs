//! Static capability document served at the provider root.
use crate::guid::{LIBRARY_MATCHES, LIBRARY_METADATA};
use serde::Serialize;

pub const PROVIDER_IDENTIFIER: &str = "tv.plex.agents.custom.encora";
pub const PROVIDER_TITLE: &str = "Encora Movie Provider";
pub const PROVIDER_VERSION: &str = "1.0.0";
pub const PROVIDER_BASE_PATH: &str = "/movie";

/// Numeric metadata type codes used by the host.
pub const METADATA_TYPE_MOVIE_CODE: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct MediaProviderResponse {
    #[serde(rename = "MediaProvider")]
    pub media_provider: MediaProvider,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaProvider {
    pub identifier: String,
    pub title: String,
    pub version: String,
    #[serde(rename = "Types")]
    pub types: Vec<TypeDefinition>,
    #[serde(rename = "Feature")]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeDefinition {
    #[serde(rename = "type")]
    pub kind: u32,
    #[serde(rename = "Scheme")]
    pub schemes: Vec<Scheme>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scheme {
    pub scheme: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Metadata,
    Match,
}

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub key: String,
}

pub fn movie_provider() -> MediaProviderResponse {
    MediaProviderResponse {
        media_provider: MediaProvider {
            identifier: PROVIDER_IDENTIFIER.to_string(),
            title: PROVIDER_TITLE.to_string(),
            version: PROVIDER_VERSION.to_string(),
            types: vec![TypeDefinition {
                kind: METADATA_TYPE_MOVIE_CODE,
                schemes: vec![Scheme {
                    scheme: PROVIDER_IDENTIFIER.to_string(),
                }],
            }],
            features: vec![
                Feature {
                    kind: FeatureType::Metadata,
                    key: LIBRARY_METADATA.to_string(),
                },
                Feature {
                    kind: FeatureType::Match,
                    key: LIBRARY_MATCHES.to_string(),
                },
            ],
        },
    }
}
