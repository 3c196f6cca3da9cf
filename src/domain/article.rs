use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Source format of `webPublicationDate`, with a numeric zone offset.
const SOURCE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";
const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d";

/// A single news item as returned by one fetch cycle.
///
/// Fields are private so an article cannot change once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    section: String,
    title: String,
    published_at: String,
    author: String,
    url: String,
}

impl Article {
    pub fn new(
        section: String,
        title: String,
        published_at: String,
        author: String,
        url: String,
    ) -> Self {
        Self {
            section,
            title,
            published_at,
            author,
            url,
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn published_at(&self) -> &str {
        &self.published_at
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Publication date as `yyyy-MM-dd`, or `None` if the timestamp is unparseable.
    ///
    /// A trailing literal `Z` is read as `+0000`. The date is taken in the
    /// timestamp's own offset.
    pub fn display_date(&self) -> Option<String> {
        format_display_date(&self.published_at)
    }
}

pub fn format_display_date(timestamp: &str) -> Option<String> {
    let normalized = match timestamp.strip_suffix('Z') {
        Some(stripped) => format!("{}+0000", stripped),
        None => timestamp.to_string(),
    };

    DateTime::parse_from_str(&normalized, SOURCE_DATE_FORMAT)
        .ok()
        .map(|dt| dt.format(DISPLAY_DATE_FORMAT).to_string())
}
