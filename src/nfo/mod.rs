//! Local `.nfo` descriptor files, used when the catalog has nothing.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::MovieMetadata;

mod locate;
mod map;
mod parse;

pub use locate::{find_nfo, NFO_EXTENSION};
pub use map::{nfo_rating_key, nfo_to_metadata, slugify};
pub use parse::parse_nfo;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NfoActor {
    pub name: String,
    pub role: String,
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NfoData {
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub sort_title: Option<String>,
    pub premiered: Option<String>,
    pub release_date: Option<String>,
    pub director: Option<String>,
    pub year: Option<i32>,
    pub studio: Option<String>,
    pub plot: Option<String>,
    pub thumb: Option<String>,
    pub genres: Vec<String>,
    pub certifications: Vec<String>,
    pub actors: Vec<NfoActor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NfoLookup {
    Found { path: PathBuf, data: NfoData },
    NotFound,
    /// A descriptor exists but could not be read as UTF-8 text.
    Unreadable { path: PathBuf },
}

/// Resolves video filenames against the library root and reads their
/// descriptors.
#[derive(Debug, Clone)]
pub struct NfoResolver {
    base_path: PathBuf,
}

impl NfoResolver {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn resolve(&self, filename: &str) -> PathBuf {
        let path = Path::new(filename);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    pub fn lookup(&self, filename: &str) -> NfoLookup {
        let video = self.resolve(filename);
        let Some(path) = find_nfo(&video) else {
            info!(filename, "No NFO file found");
            return NfoLookup::NotFound;
        };
        match fs::read_to_string(&path) {
            Ok(content) => NfoLookup::Found {
                data: parse_nfo(&content),
                path,
            },
            Err(e) => {
                warn!(path = %path.display(), "Error reading NFO file: {}", e);
                NfoLookup::Unreadable { path }
            }
        }
    }

    /// Descriptor record for `filename`, keyed so it can be fetched again
    /// through an `nfo-file-` ratingKey.
    pub fn metadata_for_file(&self, filename: &str) -> Option<MovieMetadata> {
        match self.lookup(filename) {
            NfoLookup::Found { path, data } => {
                info!(path = %path.display(), "Using NFO metadata");
                match nfo_to_metadata(&data, Some(filename)) {
                    Ok(movie) => Some(movie),
                    Err(e) => {
                        warn!(filename, "NFO record rejected: {}", e);
                        None
                    }
                }
            }
            NfoLookup::NotFound | NfoLookup::Unreadable { .. } => None,
        }
    }
}
