use std::path::PathBuf;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::feeds::{ContentSource, FeedSource};
use crate::llm::{
    parse_selection, CompositionRequest, LLMProvider, ResponseMode, SelectionRequest,
    SummaryRequest, TranslationRequest,
};
use crate::markdown::clean_model_markdown;
use crate::models::{
    ArticleSummary, Digest, FeedItem, Language, Post, PostVariant, RunDate, SelectedArticle,
};
use crate::storage::JournalWriter;

#[derive(Debug)]
pub enum RunOutcome {
    /// Nothing was published in the collection window.
    NoRecentItems,
    /// The model found nothing on-topic among the collected items.
    NoRelevantArticles,
    /// Digest built but not written.
    Drafted(Digest),
    Published { digest: Digest, files: Vec<PathBuf> },
}

pub struct DigestPipeline {
    feeds: Arc<dyn FeedSource>,
    content: Arc<dyn ContentSource>,
    llm: Arc<dyn LLMProvider>,
    writer: JournalWriter,
    config: PipelineConfig,
}

impl DigestPipeline {
    pub fn new(
        feeds: impl FeedSource + 'static,
        content: impl ContentSource + 'static,
        llm: impl LLMProvider + 'static,
        writer: JournalWriter,
        config: PipelineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            feeds: Arc::new(feeds),
            content: Arc::new(content),
            llm: Arc::new(llm),
            writer,
            config,
        })
    }

    /// Builds the digest and writes every variant. Files are only written
    /// once all variants exist.
    pub async fn run(&self, run: &RunDate) -> Result<RunOutcome> {
        let digest = match self.build_digest(run).await? {
            RunOutcome::Drafted(digest) => digest,
            other => return Ok(other),
        };

        tracing::info!("Saving {} post variant(s)", digest.variants.len());
        let files = self.writer.write_digest(&digest)?;

        Ok(RunOutcome::Published { digest, files })
    }

    /// Runs every stage up to, but not including, persistence.
    pub async fn build_digest(&self, run: &RunDate) -> Result<RunOutcome> {
        // Step 1: Collect recent feed items
        tracing::info!("[1/5] Collecting feed items since {}", run.window_start());
        let items = self.feeds.collect(run).await?;

        if items.is_empty() {
            tracing::info!("No news published in the last 24 hours");
            return Ok(RunOutcome::NoRecentItems);
        }
        tracing::info!("Collected {} recent items", items.len());

        // Step 2: Let the model pick the relevant ones
        tracing::info!("[2/5] Selecting up to {} articles", self.config.selection_cap);
        let selected = self.select(&items).await?;

        if selected.is_empty() {
            tracing::info!("No relevant articles among the collected items");
            return Ok(RunOutcome::NoRelevantArticles);
        }
        tracing::info!("Selected {} articles", selected.len());

        // Step 3: Summarize each article, in selection order
        tracing::info!("[3/5] Summarizing selected articles");
        let summaries = self.summarize(&selected).await?;

        // Step 4: Compose the source-language post
        tracing::info!("[4/5] Composing the {} post", Language::SOURCE.display_name());
        let source_post = self.compose(&summaries, run).await?;

        // Step 5: Translate into every other requested language
        let targets = self.config.translation_targets();
        if targets.is_empty() {
            tracing::info!("[5/5] No translation requested, skipping");
        }

        let mut variants = Vec::new();
        for language in self.config.output_languages() {
            let post = if language.is_source() {
                source_post.clone()
            } else {
                tracing::info!("[5/5] Translating post into {}", language.display_name());
                self.translate(&source_post, language, run).await?
            };
            variants.push(PostVariant { language, post });
        }

        Ok(RunOutcome::Drafted(Digest {
            date_key: run.date_key(),
            article_count: summaries.len(),
            variants,
        }))
    }

    async fn select(&self, items: &[FeedItem]) -> Result<Vec<SelectedArticle>> {
        let request = SelectionRequest {
            items,
            cap: self.config.selection_cap,
        };

        let response = self
            .llm
            .generate(&request.to_prompt(), ResponseMode::Json)
            .await?;
        let selected = parse_selection(&response, self.config.selection_cap)?;

        for article in &selected {
            if !items.iter().any(|item| item.link == article.link) {
                tracing::warn!(
                    "Selected link was not among the collected items: {}",
                    article.link
                );
            }
        }

        Ok(selected)
    }

    async fn summarize(&self, articles: &[SelectedArticle]) -> Result<Vec<ArticleSummary>> {
        let pb = ProgressBar::new(articles.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} articles")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut summaries = Vec::with_capacity(articles.len());

        for (idx, article) in articles.iter().enumerate() {
            tracing::info!(
                "Summarizing ({}/{}): {}",
                idx + 1,
                articles.len(),
                article.title
            );

            let content = self.content.fetch_text(&article.link).await;
            let request = SummaryRequest {
                article,
                content: &content,
            };

            // A failed summary aborts the whole run
            let text = match self.llm.generate(&request.to_prompt(), ResponseMode::Text).await {
                Ok(text) => text,
                Err(e) => {
                    pb.abandon();
                    return Err(e);
                }
            };

            summaries.push(ArticleSummary::new(article, text));
            pb.inc(1);
        }

        pb.finish_with_message("Summaries complete");
        Ok(summaries)
    }

    async fn compose(&self, summaries: &[ArticleSummary], run: &RunDate) -> Result<Post> {
        let request = CompositionRequest { summaries, run };
        let markdown = self
            .llm
            .generate(&request.to_prompt(), ResponseMode::Text)
            .await?;

        let mut post = Post::parse(&clean_model_markdown(&markdown));
        post.normalize(run, None);
        Ok(post)
    }

    async fn translate(&self, source: &Post, target: Language, run: &RunDate) -> Result<Post> {
        let request = TranslationRequest {
            post: source,
            target,
        };
        let markdown = self
            .llm
            .generate(&request.to_prompt(), ResponseMode::Text)
            .await?;

        let mut post = Post::parse(&clean_model_markdown(&markdown));
        post.normalize(run, Some(&source.frontmatter));
        Ok(post)
    }
}
