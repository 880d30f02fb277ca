use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::{NfoActor, NfoData};

/// Movie-level tags read once from the document with actor blocks removed.
const SINGLETON_TAGS: [&str; 10] = [
    "title",
    "originaltitle",
    "sorttitle",
    "premiered",
    "releasedate",
    "director",
    "year",
    "studio",
    "plot",
    "thumb",
];
/// Tags collected in document order, duplicates kept.
const REPEATABLE_TAGS: [&str; 2] = ["genre", "certification"];
/// Tags read inside each `<actor>` block.
const ACTOR_TAGS: [&str; 3] = ["name", "role", "thumb"];

fn tag_pattern(tag: &str) -> Regex {
    Regex::new(&format!(r"(?is)<{tag}(?:\s[^>]*)?>(.*?)</{tag}\s*>"))
        .expect("tag names are plain identifiers")
}

static TAG_PATTERNS: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    SINGLETON_TAGS
        .iter()
        .chain(REPEATABLE_TAGS.iter())
        .chain(ACTOR_TAGS.iter())
        .map(|tag| (*tag, tag_pattern(tag)))
        .collect()
});

static ACTOR_BLOCK: Lazy<Regex> = Lazy::new(|| tag_pattern("actor"));

fn first(tag: &str, content: &str) -> Option<String> {
    TAG_PATTERNS
        .get(tag)?
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn all(tag: &str, content: &str) -> Vec<String> {
    let Some(re) = TAG_PATTERNS.get(tag) else {
        return Vec::new();
    };
    re.captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn leading_int(raw: &str) -> Option<i32> {
    let raw = raw.trim_start();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let digits: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i32>().ok().map(|n| sign * n)
}

/// Tolerant tag scan of a descriptor document. Never fails; missing or
/// blank tags come back as `None`.
pub fn parse_nfo(content: &str) -> NfoData {
    let actors = ACTOR_BLOCK
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .filter_map(|block| {
            let block = block.as_str();
            Some(NfoActor {
                name: first("name", block)?,
                role: first("role", block).unwrap_or_default(),
                thumb: first("thumb", block),
            })
        })
        .collect();

    let outer = ACTOR_BLOCK.replace_all(content, "");

    NfoData {
        title: first("title", &outer),
        original_title: first("originaltitle", &outer),
        sort_title: first("sorttitle", &outer),
        premiered: first("premiered", &outer),
        release_date: first("releasedate", &outer),
        director: first("director", &outer),
        year: first("year", &outer).as_deref().and_then(leading_int),
        studio: first("studio", &outer),
        plot: first("plot", &outer),
        thumb: first("thumb", &outer),
        genres: all("genre", &outer),
        certifications: all("certification", &outer),
        actors,
    }
}
