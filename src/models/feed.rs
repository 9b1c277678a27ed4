use serde::{Deserialize, Serialize};

/// Maximum characters kept from an entry's summary.
pub const MAX_SUMMARY_CHARS: usize = 500;

/// A recent entry offered to the selection stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub summary: String,
}

impl FeedItem {
    pub fn new(title: impl Into<String>, link: impl Into<String>, summary: &str) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            summary: truncate_chars(summary, MAX_SUMMARY_CHARS),
        }
    }
}

/// Truncates on a character boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
