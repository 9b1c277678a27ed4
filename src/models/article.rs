use serde::{Deserialize, Serialize};

/// An article the model picked from the collected feed items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedArticle {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub rss_summary: String,
}

/// The model's formatted summary block for one selected article. The text is
/// passed through to composition as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSummary {
    pub title: String,
    pub link: String,
    pub text: String,
}

impl ArticleSummary {
    pub fn new(article: &SelectedArticle, text: impl Into<String>) -> Self {
        Self {
            title: article.title.clone(),
            link: article.link.clone(),
            text: text.into().trim().to_string(),
        }
    }
}
