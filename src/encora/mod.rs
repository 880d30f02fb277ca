use anyhow::Result;
use async_trait::async_trait;

mod client;
mod map;
mod text;
mod title;
pub mod types;

pub use client::{EncoraClient, ENCORA_BASE};
pub use map::{RecordingMapper, PLACEHOLDER_THUMB};
pub use title::{TitleFormat, TitleFormatError, DEFAULT_DATE_REPLACE_CHAR, DEFAULT_TITLE_FORMAT};
pub use types::{Recording, Subtitle};

#[async_trait]
pub trait EncoraApi: Send + Sync {
    async fn fetch_recording(&self, id: u64) -> Result<Recording>;
    async fn fetch_subtitles(&self, id: u64) -> Result<Vec<Subtitle>>;
}
