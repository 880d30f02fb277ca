use thiserror::Error;

use super::types::Recording;

pub const DEFAULT_TITLE_FORMAT: &str = "{{show}} {{tour}} | ({{date}}) {{master}}";
pub const DEFAULT_DATE_REPLACE_CHAR: char = 'x';

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const UNKNOWN_MONTH_NAME: &str = "Unknown";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TitleFormatError {
    #[error("title template rendered to an empty string")]
    Empty,
}

/// Title template plus the character standing in for unknown date parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleFormat {
    pub template: String,
    pub replace_char: char,
}

impl Default for TitleFormat {
    fn default() -> Self {
        Self {
            template: DEFAULT_TITLE_FORMAT.to_string(),
            replace_char: DEFAULT_DATE_REPLACE_CHAR,
        }
    }
}

struct DateParts {
    year: String,
    month: String,
    day: String,
}

impl TitleFormat {
    pub fn new(template: impl Into<String>, replace_char: char) -> Self {
        Self {
            template: template.into(),
            replace_char,
        }
    }

    /// Renders the template. Placeholders are substituted literally.
    pub fn render(&self, recording: &Recording) -> Result<String, TitleFormatError> {
        let parts = self.date_parts(recording);
        let date_text = self.date_text(recording, &parts);
        let DateParts { year, month, day } = &parts;

        let title = self
            .template
            .replace("{{show}}", &recording.show)
            .replace("{{tour}}", &recording.tour)
            .replace("{{master}}", &recording.master)
            .replace("{{date}}", &date_text)
            .replace("{{date_iso}}", &format!("{year}-{month}-{day}"))
            .replace("{{date_usa}}", &format!("{month}-{day}-{year}"))
            .replace("{{date_numeric}}", &format!("{day}-{month}-{year}"));

        let title = title.trim();
        if title.is_empty() {
            return Err(TitleFormatError::Empty);
        }
        Ok(title.to_string())
    }

    fn unknown(&self, width: usize) -> String {
        std::iter::repeat(self.replace_char).take(width).collect()
    }

    fn date_parts(&self, recording: &Recording) -> DateParts {
        let date = &recording.date;
        let pieces: Vec<&str> = date.full_date.split('-').collect();
        if let [year, month, day] = pieces.as_slice() {
            return DateParts {
                year: year.to_string(),
                month: if date.month_known {
                    month.to_string()
                } else {
                    self.unknown(2)
                },
                day: if date.day_known {
                    day.to_string()
                } else {
                    self.unknown(2)
                },
            };
        }
        DateParts {
            year: "????".to_string(),
            month: "??".to_string(),
            day: "??".to_string(),
        }
    }

    /// A month flagged as known that is not 1..=12 renders as "Unknown".
    fn date_text(&self, recording: &Recording, parts: &DateParts) -> String {
        let month_name = if recording.date.month_known {
            parts
                .month
                .parse::<usize>()
                .ok()
                .and_then(|m| m.checked_sub(1))
                .and_then(|idx| MONTH_NAMES.get(idx))
                .copied()
                .unwrap_or(UNKNOWN_MONTH_NAME)
                .to_string()
        } else {
            self.unknown(3)
        };
        format!("{} {}, {}", month_name, parts.day, parts.year)
    }
}
