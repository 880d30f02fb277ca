use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const NFO_EXTENSION: &str = "nfo";
const MOVIE_NFO: &str = "movie.nfo";

fn has_nfo_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(NFO_EXTENSION))
}

/// Finds the descriptor for a video file. Tries `<stem>.nfo`, then
/// `movie.nfo`, then the first `.nfo` the directory listing yields.
pub fn find_nfo(video: &Path) -> Option<PathBuf> {
    let sidecar = video.with_extension(NFO_EXTENSION);
    if sidecar.is_file() {
        debug!(path = %sidecar.display(), "Found matching NFO");
        return Some(sidecar);
    }

    let dir = video
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let movie_nfo = dir.join(MOVIE_NFO);
    if movie_nfo.is_file() {
        debug!(path = %movie_nfo.display(), "Found movie.nfo");
        return Some(movie_nfo);
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if dir.exists() {
                warn!(path = %dir.display(), "Failed to list directory: {}", e);
            }
            return None;
        }
    };
    let found = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| has_nfo_extension(path) && path.is_file());
    if let Some(path) = &found {
        debug!(path = %path.display(), "Found NFO in directory");
    }
    found
}
