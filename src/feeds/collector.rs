use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Feed};
use reqwest::Client;

use crate::error::{Error, Result};
use crate::feeds::FeedSource;
use crate::models::{FeedItem, RunDate};

/// Hacker News front page and the newest r/MachineLearning posts.
pub const DEFAULT_FEEDS: [&str; 2] = [
    "https://news.ycombinator.com/rss",
    "https://www.reddit.com/r/MachineLearning/new/.rss",
];

const FEED_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("dailynews/", env!("CARGO_PKG_VERSION"));

pub struct FeedCollector {
    client: Client,
    sources: Vec<String>,
}

impl FeedCollector {
    pub fn new(sources: Vec<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FEED_TIMEOUT)
            .build()?;

        Ok(Self { client, sources })
    }

    pub fn with_default_sources() -> Result<Self> {
        Self::new(DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect())
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    async fn fetch_feed(&self, url: &str) -> Result<Feed> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Feed(format!("{} returned HTTP {}", url, status)));
        }

        let bytes = response.bytes().await?;
        Ok(feed_rs::parser::parse(bytes.as_ref())?)
    }
}

#[async_trait]
impl FeedSource for FeedCollector {
    async fn collect(&self, run: &RunDate) -> Result<Vec<FeedItem>> {
        let since = run.window_start();
        let mut items = Vec::new();

        for url in &self.sources {
            tracing::info!("Parsing feed: {}", url);
            match self.fetch_feed(url).await {
                Ok(feed) => {
                    let recent = recent_items(&feed, since);
                    tracing::info!(
                        "{} of {} entries from {} are recent",
                        recent.len(),
                        feed.entries.len(),
                        url
                    );
                    items.extend(recent);
                }
                Err(e) => {
                    tracing::warn!("Skipping feed {}: {}", url, e);
                }
            }
        }

        Ok(items)
    }
}

/// Entries strictly newer than `since`, in feed order. Entries without a
/// timestamp, title or link never qualify.
pub fn recent_items(feed: &Feed, since: DateTime<Utc>) -> Vec<FeedItem> {
    feed.entries
        .iter()
        .filter(|entry| entry_timestamp(entry).map(|ts| ts > since).unwrap_or(false))
        .filter_map(to_feed_item)
        .collect()
}

fn entry_timestamp(entry: &Entry) -> Option<DateTime<Utc>> {
    entry.published.or(entry.updated)
}

fn to_feed_item(entry: &Entry) -> Option<FeedItem> {
    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())?;
    let link = entry.links.first().map(|l| l.href.clone())?;

    let summary = entry
        .summary
        .as_ref()
        .map(|s| s.content.clone())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()))
        .unwrap_or_default();

    Some(FeedItem::new(title, link, summary.trim()))
}
