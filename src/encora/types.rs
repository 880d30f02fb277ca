use serde::{Deserialize, Deserializer};

/// Treats an explicit `null` the same as a missing field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Recording {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub show: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tour: String,
    #[serde(default, deserialize_with = "nullable")]
    pub date: RecordingDate,
    #[serde(default, deserialize_with = "nullable")]
    pub master: String,
    #[serde(default)]
    pub nft: Option<Nft>,
    #[serde(default, deserialize_with = "nullable")]
    pub cast: Vec<CastMember>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: String,
    #[serde(default, deserialize_with = "nullable")]
    pub master_notes: String,
    #[serde(default, deserialize_with = "nullable")]
    pub release_format: String,
    #[serde(default, deserialize_with = "nullable")]
    pub metadata: RecordingMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordingDate {
    #[serde(default, deserialize_with = "nullable")]
    pub full_date: String,
    #[serde(default, deserialize_with = "nullable")]
    pub month_known: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub day_known: bool,
    #[serde(default)]
    pub date_variant: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

/// Availability window for recordings that must not be traded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Nft {
    #[serde(default)]
    pub nft_date: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub nft_forever: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CastMember {
    #[serde(default, deserialize_with = "nullable")]
    pub performer: Performer,
    #[serde(default, deserialize_with = "nullable")]
    pub character: Character,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Performer {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Character {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordingMetadata {
    #[serde(default)]
    pub show_id: Option<u64>,
    #[serde(default, deserialize_with = "nullable")]
    pub venue: String,
    #[serde(default, deserialize_with = "nullable")]
    pub city: String,
    #[serde(default, deserialize_with = "nullable")]
    pub media_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub recording_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub show_description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Subtitle {
    #[serde(default)]
    pub recording_id: Option<u64>,
    #[serde(default, deserialize_with = "nullable")]
    pub language: String,
    #[serde(default, deserialize_with = "nullable")]
    pub author: String,
    #[serde(default, deserialize_with = "nullable")]
    pub file_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
}
