//! Fetch one Encora recording and print the metadata record the provider
//! would serve for it, as pretty JSON.
//! Usage:
//!   cargo run --bin encora_props -- <recording_id>
//!   cargo run --bin encora_props -- <recording_id> raw
//! `raw` prints the catalog recording and subtitles without mapping.
//! Requires ENCORA_API_KEY and STAGEMEDIA_API_KEY (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use encora_agent::config::Config;
use encora_agent::encora::{EncoraApi, EncoraClient, RecordingMapper};
use encora_agent::recordings::RecordingService;
use encora_agent::stagemedia::StageMediaClient;
use serde_json::json;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let mut args = env::args().skip(1);
    let id: u64 = args
        .next()
        .context("usage: encora_props <recording_id> [raw]")?
        .parse()
        .context("recording id must be a number")?;
    let raw = args.next().is_some_and(|a| a == "raw");

    let config = Config::from_env()?;
    let encora = Arc::new(EncoraClient::new(
        &config.encora_api_key,
        &config.encora_base_url,
    )?);

    if raw {
        let recording = encora.fetch_recording(id).await?;
        let subtitles = encora.fetch_subtitles(id).await.unwrap_or_default();
        let dump = json!({
            "id": recording.id,
            "show": recording.show,
            "tour": recording.tour,
            "master": recording.master,
            "full_date": recording.date.full_date,
            "month_known": recording.date.month_known,
            "day_known": recording.date.day_known,
            "show_id": recording.metadata.show_id,
            "venue": recording.metadata.venue,
            "city": recording.metadata.city,
            "cast": recording.cast.len(),
            "subtitles": subtitles.iter().map(|s| json!({
                "language": s.language,
                "file_type": s.file_type,
                "url": s.url,
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    let stagemedia = Arc::new(StageMediaClient::new(
        &config.stagemedia_api_key,
        &config.stagemedia_base_url,
    )?);
    let service = RecordingService::new(
        encora,
        stagemedia,
        RecordingMapper::new(config.title_format.clone()),
    );
    let result = service.match_recording(id).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
