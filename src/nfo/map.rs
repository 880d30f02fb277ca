use super::NfoData;
use crate::error::ProviderError;
use crate::guid::{build_guid, encode_path, external_guid, metadata_key};
use crate::models::{
    non_empty, ExternalGuid, Image, ImageType, MovieMetadata, Person, Tag, METADATA_TYPE_MOVIE,
};
use crate::provider::PROVIDER_IDENTIFIER;

const UNTITLED: &str = "Unknown";

/// Lower-cased title with every run of non-alphanumerics collapsed to `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}

pub fn nfo_rating_key(data: &NfoData, source_file: Option<&str>) -> String {
    match source_file {
        Some(file) => format!("nfo-file-{}", encode_path(file)),
        None => {
            let year = data
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            format!("nfo-{}-{year}", title_slug(data))
        }
    }
}

fn title_slug(data: &NfoData) -> String {
    slugify(data.title.as_deref().unwrap_or("unknown"))
}

/// Builds a host record from a parsed descriptor. With a `source_file` the
/// ratingKey encodes that path so the record can be looked up again later.
pub fn nfo_to_metadata(
    data: &NfoData,
    source_file: Option<&str>,
) -> Result<MovieMetadata, ProviderError> {
    let rating_key = nfo_rating_key(data, source_file);
    let guid = build_guid(PROVIDER_IDENTIFIER, METADATA_TYPE_MOVIE, &rating_key)?;

    let roles = data
        .actors
        .iter()
        .enumerate()
        .map(|(index, actor)| Person {
            tag: actor.name.clone(),
            role: Some(actor.role.clone()),
            thumb: actor.thumb.clone(),
            order: u32::try_from(index).ok(),
        })
        .collect::<Vec<_>>();

    let images = data
        .thumb
        .iter()
        .map(|url| Image {
            kind: ImageType::CoverPoster,
            url: url.clone(),
            alt: data.title.clone(),
        })
        .collect::<Vec<_>>();

    Ok(MovieMetadata {
        kind: METADATA_TYPE_MOVIE.to_string(),
        key: metadata_key(&rating_key),
        rating_key,
        guid,
        title: data.title.clone().unwrap_or_else(|| UNTITLED.to_string()),
        originally_available_at: data
            .premiered
            .clone()
            .or_else(|| data.release_date.clone())
            .unwrap_or_default(),
        thumb: data.thumb.clone(),
        content_rating: data.certifications.first().cloned(),
        original_title: data.original_title.clone(),
        title_sort: data.sort_title.clone(),
        edition_title: None,
        year: data.year,
        summary: data.plot.clone(),
        studio: data.studio.clone(),
        images: non_empty(images),
        genres: non_empty(data.genres.iter().map(Tag::new).collect()),
        subtitles: None,
        roles: non_empty(roles),
        directors: data.director.clone().map(|d| vec![Person::named(d)]),
        guids: Some(vec![ExternalGuid {
            id: external_guid("nfo", title_slug(data)),
        }]),
        studios: data.studio.clone().map(|s| vec![Tag::new(s)]),
        countries: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guid::decode_path;
    use crate::nfo::NfoActor;

    fn data() -> NfoData {
        NfoData {
            title: Some("Into the Woods: Live!".to_string()),
            year: Some(2022),
            release_date: Some("2022-07-08".to_string()),
            director: Some("Lear deBessonet".to_string()),
            studio: Some("St. James Theatre".to_string()),
            thumb: Some("https://img/itw.jpg".to_string()),
            genres: vec!["Musical".to_string()],
            certifications: vec!["PG".to_string(), "12".to_string()],
            actors: vec![
                NfoActor {
                    name: "Sara Bareilles".to_string(),
                    role: "Baker's Wife".to_string(),
                    thumb: None,
                },
                NfoActor {
                    name: "Brian d'Arcy James".to_string(),
                    role: "Baker".to_string(),
                    thumb: Some("https://img/bdj.jpg".to_string()),
                },
            ],
            ..NfoData::default()
        }
    }

    #[test]
    fn slugs_collapse_punctuation() {
        assert_eq!(slugify("Into the Woods: Live!"), "into-the-woods-live");
        assert_eq!(slugify("--Hello,   World--"), "hello-world");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn rating_key_from_title_and_year() {
        let movie = nfo_to_metadata(&data(), None).unwrap();
        assert_eq!(movie.rating_key, "nfo-into-the-woods-live-2022");
        assert_eq!(
            movie.guids,
            Some(vec![ExternalGuid {
                id: "nfo://into-the-woods-live".to_string()
            }])
        );

        let untitled = NfoData::default();
        let movie = nfo_to_metadata(&untitled, None).unwrap();
        assert_eq!(movie.rating_key, "nfo-unknown-unknown");
        assert_eq!(movie.title, "Unknown");
        assert_eq!(movie.originally_available_at, "");
    }

    #[test]
    fn rating_key_from_source_file_round_trips() {
        let path = "/media/Into the Woods/itw (2022).mkv";
        let movie = nfo_to_metadata(&data(), Some(path)).unwrap();
        let token = movie.rating_key.strip_prefix("nfo-file-").unwrap();
        assert_eq!(decode_path(token).as_deref(), Some(path));
        assert!(movie.guid.ends_with(&movie.rating_key));
    }

    #[test]
    fn maps_descriptor_fields() {
        let movie = nfo_to_metadata(&data(), None).unwrap();
        assert_eq!(movie.originally_available_at, "2022-07-08");
        assert_eq!(movie.content_rating.as_deref(), Some("PG"));
        assert_eq!(movie.thumb.as_deref(), Some("https://img/itw.jpg"));
        let images = movie.images.unwrap();
        assert_eq!(images[0].alt.as_deref(), Some("Into the Woods: Live!"));
        let roles = movie.roles.unwrap();
        assert_eq!(roles[0].order, Some(0));
        assert_eq!(roles[1].order, Some(1));
        assert_eq!(roles[1].thumb.as_deref(), Some("https://img/bdj.jpg"));
        assert_eq!(movie.directors, Some(vec![Person::named("Lear deBessonet")]));
        assert_eq!(movie.studios, Some(vec![Tag::new("St. James Theatre")]));
        assert_eq!(movie.genres, Some(vec![Tag::new("Musical")]));
    }

    #[test]
    fn premiered_wins_over_release_date() {
        let mut d = data();
        d.premiered = Some("2022-06-28".to_string());
        let movie = nfo_to_metadata(&d, None).unwrap();
        assert_eq!(movie.originally_available_at, "2022-06-28");
    }
}
