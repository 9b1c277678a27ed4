pub mod collector;
pub mod content;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FeedItem, RunDate};

pub use collector::{FeedCollector, DEFAULT_FEEDS};
pub use content::ContentFetcher;

/// Supplies the feed items collected for a run.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn collect(&self, run: &RunDate) -> Result<Vec<FeedItem>>;
}

/// Supplies plain article text for a link. Returns an empty string when the
/// page is unavailable; that is never an error.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> String;
}
