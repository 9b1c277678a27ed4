use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html};
use url::Url;

use crate::error::Result;
use crate::feeds::ContentSource;
use crate::models::feed::truncate_chars;

/// Maximum characters of page text handed to the summarizer.
pub const MAX_CONTENT_CHARS: usize = 3000;

const CONTENT_TIMEOUT: Duration = Duration::from_secs(10);

// Some hosts (Reddit in particular) answer 403 to non-browser agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const SKIPPED_ELEMENTS: [&str; 6] = ["script", "style", "nav", "footer", "header", "noscript"];

pub struct ContentFetcher {
    client: Client,
    max_chars: usize,
}

impl ContentFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(CONTENT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            max_chars: MAX_CONTENT_CHARS,
        })
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let url = Url::parse(url)?;
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl ContentSource for ContentFetcher {
    async fn fetch_text(&self, url: &str) -> String {
        match self.fetch_html(url).await {
            Ok(html) => extract_text(&html, self.max_chars),
            Err(e) => {
                tracing::warn!("Could not fetch article body, falling back to RSS summary: {}", e);
                String::new()
            }
        }
    }
}

/// Visible page text joined by single spaces, without scripts, styles and
/// page chrome, truncated to `max_chars` characters.
pub fn extract_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);
    let mut fragments = Vec::new();
    collect_text(document.root_element(), &mut fragments);

    let text = fragments
        .iter()
        .flat_map(|fragment| fragment.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    truncate_chars(&text, max_chars)
}

fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !SKIPPED_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push(&**text);
        }
    }
}
