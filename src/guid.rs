//! Identifier construction and parsing for the media-server contract.
//!
//! A GUID looks like `{scheme}://{type}/{ratingKey}`; the ratingKey is the
//! only segment this provider owns and must stay within `[A-Za-z0-9_-]`.

use crate::error::ProviderError;
use std::fmt::Display;

pub const LIBRARY_METADATA: &str = "/library/metadata";
pub const LIBRARY_MATCHES: &str = "/library/metadata/matches";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedGuid {
    pub scheme: String,
    pub metadata_type: String,
    pub rating_key: String,
}

pub fn is_valid_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

pub fn build_guid(
    scheme: &str,
    metadata_type: &str,
    rating_key: &str,
) -> Result<String, ProviderError> {
    if !is_valid_token(rating_key) {
        return Err(ProviderError::InvalidToken(rating_key.to_string()));
    }
    Ok(format!("{scheme}://{metadata_type}/{rating_key}"))
}

/// Splits on the first `://`, then the first `/` after it. Everything past
/// that slash is the ratingKey, slashes included.
pub fn parse_guid(guid: &str) -> Result<ParsedGuid, ProviderError> {
    let malformed = || ProviderError::MalformedGuid(guid.to_string());
    let (scheme, rest) = guid.split_once("://").ok_or_else(malformed)?;
    let (metadata_type, rating_key) = rest.split_once('/').ok_or_else(malformed)?;
    if scheme.is_empty() || metadata_type.is_empty() || rating_key.is_empty() {
        return Err(malformed());
    }
    Ok(ParsedGuid {
        scheme: scheme.to_string(),
        metadata_type: metadata_type.to_string(),
        rating_key: rating_key.to_string(),
    })
}

pub fn metadata_key(rating_key: &str) -> String {
    format!("{LIBRARY_METADATA}/{rating_key}")
}

pub fn metadata_key_with_children(rating_key: &str) -> String {
    format!("{LIBRARY_METADATA}/{rating_key}/children")
}

/// Hex-encodes the raw bytes of a path so it can live inside a ratingKey.
pub fn encode_path(path: &str) -> String {
    hex::encode(path.as_bytes())
}

/// Inverse of [`encode_path`]. `None` when the token is not hex or the
/// bytes are not UTF-8.
pub fn decode_path(token: &str) -> Option<String> {
    let bytes = hex::decode(token).ok()?;
    String::from_utf8(bytes).ok()
}

pub fn external_guid(provider: &str, id: impl Display) -> String {
    format!("{provider}://{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEME: &str = "tv.plex.agents.custom.encora";

    #[test]
    fn accepts_letters_digits_dashes_and_underscores() {
        for key in ["encora-recording-123", "nfo-file-2f6d6564", "nfo-hadestown-unknown", "ABC123xyz", "test_key-123"] {
            assert!(is_valid_token(key), "{key} should be valid");
        }
    }

    #[test]
    fn rejects_tokens_with_forbidden_characters() {
        for key in ["invalid key", "invalid.key", "invalid/key", "invalid:key", "invalid@key", ""] {
            assert!(!is_valid_token(key), "{key:?} should be rejected");
            assert_eq!(
                build_guid(SCHEME, "movie", key),
                Err(ProviderError::InvalidToken(key.to_string()))
            );
        }
    }

    #[test]
    fn builds_and_parses_guid() {
        let guid = build_guid(SCHEME, "movie", "encora-recording-123").unwrap();
        assert_eq!(
            guid,
            "tv.plex.agents.custom.encora://movie/encora-recording-123"
        );
        let parsed = parse_guid(&guid).unwrap();
        assert_eq!(parsed.scheme, SCHEME);
        assert_eq!(parsed.metadata_type, "movie");
        assert_eq!(parsed.rating_key, "encora-recording-123");
    }

    #[test]
    fn parses_plex_guid_and_keeps_slashes_in_rating_key() {
        let parsed = parse_guid("plex://movie/5d7768244de0ee001fcc7fed").unwrap();
        assert_eq!(parsed.scheme, "plex");
        assert_eq!(parsed.rating_key, "5d7768244de0ee001fcc7fed");

        let nested = parse_guid("local://movie/a/b/c").unwrap();
        assert_eq!(nested.metadata_type, "movie");
        assert_eq!(nested.rating_key, "a/b/c");
    }

    #[test]
    fn rejects_malformed_guids() {
        for guid in ["invalid-guid", "scheme://no-slash", "missing-colon/movie/123"] {
            assert!(matches!(
                parse_guid(guid),
                Err(ProviderError::MalformedGuid(_))
            ));
        }
    }

    #[test]
    fn formats_metadata_keys() {
        assert_eq!(metadata_key("encora-recording-123"), "/library/metadata/encora-recording-123");
        assert_eq!(
            metadata_key_with_children("nfo-cats-1998"),
            "/library/metadata/nfo-cats-1998/children"
        );
    }

    #[test]
    fn path_token_round_trips() {
        for path in [
            "/media/Shows/Wicked (2024)/Wicked {e-12345}.mkv",
            "relative/dir/file name.mp4",
            "/srv/théâtre/Les Misérables – 東京.mkv",
            "",
        ] {
            let token = encode_path(path);
            assert!(token.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
            assert_eq!(decode_path(&token).as_deref(), Some(path));
        }
    }

    #[test]
    fn decode_rejects_non_hex() {
        assert_eq!(decode_path("xyz"), None);
        assert_eq!(decode_path("abc"), None);
    }

    #[test]
    fn external_guid_formats_provider_and_id() {
        assert_eq!(external_guid("encora", 15004_u64), "encora://15004");
        assert_eq!(external_guid("nfo", "into-the-woods"), "nfo://into-the-woods");
    }
}
