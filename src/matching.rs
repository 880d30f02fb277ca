//! Match orchestration: find a recording id in the host's hints, then fall
//! back to search and finally to a local descriptor.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::metadata::LookupOptions;
use crate::models::MetadataResponse;
use crate::nfo::NfoResolver;
use crate::recordings::RecordingService;

static GUID_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"encora://([0-9]+)").expect("valid regex"));
static ANY_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)").expect("valid regex"));
static ID_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[Ee][\s-]?([0-9]+)\}").expect("valid regex"));
static ALL_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)$").expect("valid regex"));

/// Body of a match call. Unknown host fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    #[serde(rename = "type", default)]
    pub kind: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub manual: Option<u8>,
    #[serde(default)]
    pub include_adult: Option<u8>,
}

impl MatchRequest {
    fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    fn filename(&self) -> Option<&str> {
        self.filename.as_deref().filter(|f| !f.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    Guid,
    TitleMarker,
    FilenameMarker,
    NumericTitle,
}

fn first_id(re: &Regex, haystack: &str) -> Option<u64> {
    re.captures(haystack)
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .filter(|id| *id > 0)
}

/// First recording id found in the request. Sources are tried in order:
/// guid, `{e-123}` marker in the title, the same marker in the filename,
/// then an all-digit title.
pub fn extract_candidate(request: &MatchRequest) -> Option<(u64, CandidateSource)> {
    if let Some(guid) = request.guid.as_deref().filter(|g| !g.is_empty()) {
        let from_guid = if GUID_ID.is_match(guid) {
            first_id(&GUID_ID, guid)
        } else {
            first_id(&ANY_DIGITS, guid)
        };
        if let Some(id) = from_guid {
            return Some((id, CandidateSource::Guid));
        }
    }

    if let Some(id) = request.title().and_then(|t| first_id(&ID_MARKER, t)) {
        return Some((id, CandidateSource::TitleMarker));
    }
    if let Some(id) = request.filename().and_then(|f| first_id(&ID_MARKER, f)) {
        return Some((id, CandidateSource::FilenameMarker));
    }
    request
        .title()
        .and_then(|t| first_id(&ALL_DIGITS, t))
        .map(|id| (id, CandidateSource::NumericTitle))
}

#[derive(Clone)]
pub struct MatchService {
    recordings: RecordingService,
    nfo: NfoResolver,
}

impl MatchService {
    pub fn new(recordings: RecordingService, nfo: NfoResolver) -> Self {
        Self { recordings, nfo }
    }

    pub async fn match_request(
        &self,
        request: &MatchRequest,
        options: &LookupOptions,
    ) -> MetadataResponse {
        debug!(?request, language = %options.language, country = %options.country, "Match request");

        if let Some((id, source)) = extract_candidate(request) {
            info!(recording_id = id, ?source, "Matching by recording id");
            let result = self.recordings.match_recording(id).await;
            if !result.is_empty() {
                return result;
            }
            info!(recording_id = id, "No catalog result for id");
        }

        if let Some(title) = request.title() {
            let result = self.recordings.search(title).await;
            if !result.is_empty() {
                return result;
            }
            info!(title, "No catalog search result");
        }

        if let Some(filename) = request.filename() {
            if let Some(movie) = self.nfo.metadata_for_file(filename) {
                info!(filename, rating_key = %movie.rating_key, "Matched via NFO");
                return MetadataResponse::single(movie);
            }
        }

        info!("No matches found");
        MetadataResponse::empty()
    }
}
