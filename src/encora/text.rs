/// Drops every `<...>` span. An unterminated `<` swallows the rest of the
/// input. Entities are left as-is.
pub(crate) fn strip_html_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '<' {
            out.push(ch);
            continue;
        }
        for c in chars.by_ref() {
            if c == '>' {
                break;
            }
        }
    }
    out
}

/// First non-empty candidate after tag stripping and trimming.
pub(crate) fn first_clean_text<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    candidates
        .into_iter()
        .map(|raw| strip_html_tags(raw).trim().to_string())
        .find(|s| !s.is_empty())
}

/// Maps the catalog's English language names to ISO 639-2/B codes.
/// Unknown names pass through untouched.
pub(crate) fn language_code(language: &str) -> String {
    let code = match language {
        "English" => "eng",
        "French" => "fre",
        "Spanish" => "spa",
        "Dutch" => "dut",
        "German" => "ger",
        "Portuguese" => "por",
        "Japanese" => "jpn",
        "Russian" => "rus",
        "Czech" => "cze",
        "Korean" => "kor",
        "Hungarian" => "hun",
        "Swedish" => "swe",
        "Polish" => "pol",
        "Danish" => "dan",
        "Norwegian" => "nor",
        "Italian" => "ita",
        "Finnish" => "fin",
        "Hebrew" => "heb",
        "Cantonese" => "chi",
        "Catalan" => "cat",
        "Yiddish" => "yid",
        "American Sign Language" => "sgn",
        "British Sign Language" => "sgn",
        "Switzerland/German" => "ger",
        "Filipino" => "fil",
        "Croatian" => "hrv",
        "Serbian" => "srp",
        "Estonian" => "est",
        "Latvian" => "lav",
        "Lithuanian" => "lit",
        "Romanian" => "rum",
        "Portuguese (BR)" => "por",
        "Greek" => "gre",
        "Spanish (Latin)" => "spa",
        "Mandarin" => "chi",
        "Turkish" => "tur",
        "Slovak" => "slo",
        "Bulgarian" => "bul",
        "Chinese" => "chi",
        "Scots" => "sco",
        "Malay" => "may",
        "Kazakh" => "kaz",
        "Georgian" => "geo",
        "Arabic (Palestinian)" => "ara",
        "Arabic" => "ara",
        "Swahili" => "swa",
        "Albanian" => "alb",
        "Macedonian" => "mac",
        "Ukrainian" => "ukr",
        "Cornish" => "cor",
        "Latin" => "lat",
        "Armenian" => "arm",
        _ => return language.to_string(),
    };
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_without_decoding_entities() {
        assert_eq!(strip_html_tags("Description <b>HTML</b>"), "Description HTML");
        assert_eq!(strip_html_tags("a &amp; <i>b</i>"), "a &amp; b");
        assert_eq!(strip_html_tags("cut <here"), "cut ");
    }

    #[test]
    fn picks_first_non_blank_candidate() {
        let picked = first_clean_text(["", "  <p> </p> ", "Some notes <p>HTML</p>"]);
        assert_eq!(picked.as_deref(), Some("Some notes HTML"));
        assert_eq!(first_clean_text(["", "<br>"]), None);
    }

    #[test]
    fn maps_language_names_to_bibliographic_codes() {
        assert_eq!(language_code("French"), "fre");
        assert_eq!(language_code("Portuguese (BR)"), "por");
        assert_eq!(language_code("Norwegian"), "nor");
        assert_eq!(language_code("Klingon"), "Klingon");
        assert_eq!(language_code("english"), "english");
    }
}
