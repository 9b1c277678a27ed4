use crate::models::{ArticleSummary, FeedItem, Language, Post, RunDate, SelectedArticle};

const CONTENT_UNAVAILABLE: &str = "(The article body could not be retrieved. Infer the content from the title, link and RSS summary above.)";

#[derive(Debug, Clone)]
pub struct SelectionRequest<'a> {
    pub items: &'a [FeedItem],
    pub cap: usize,
}

impl SelectionRequest<'_> {
    pub fn to_prompt(&self) -> String {
        let mut prompt = format!(
            r#"Below is a list of recently collected news items.
Select at most {cap} of the most important items related to "game programming" and "AI/ML technology".
They must be technology-focused (e.g. Unreal/Unity engine updates, LLM papers, graphics optimization). Exclude plain business news and game release announcements.

Respond only with a JSON array in exactly this form, copying each link verbatim from the list:
[
  {{"title": "article title", "link": "article URL", "rss_summary": "the collected summary"}}
]

Items:
"#,
            cap = self.cap
        );

        for item in self.items {
            prompt.push_str(&format!(
                "- Title: {}\n  Link: {}\n  Summary: {}\n",
                item.title, item.link, item.summary
            ));
        }

        prompt
    }
}

#[derive(Debug, Clone)]
pub struct SummaryRequest<'a> {
    pub article: &'a SelectedArticle,
    /// Fetched page text; empty when the page was unavailable.
    pub content: &'a str,
}

impl SummaryRequest<'_> {
    pub fn to_prompt(&self) -> String {
        let content = if self.content.trim().is_empty() {
            CONTENT_UNAVAILABLE
        } else {
            self.content
        };

        format!(
            r#"Analyze the following article and summarize it in the given format.

Title: {title}
Link: {link}
RSS summary: {summary}
Content: {content}

Format:
#### Article
Link: [{title}]({link})
Summary: (the core technical content in one line)
Impact: (the impact on game or AI development in one line)
"#,
            title = self.article.title,
            link = self.article.link,
            summary = self.article.rss_summary,
            content = content,
        )
    }
}

#[derive(Debug, Clone)]
pub struct CompositionRequest<'a> {
    pub summaries: &'a [ArticleSummary],
    pub run: &'a RunDate,
}

impl CompositionRequest<'_> {
    pub fn to_prompt(&self) -> String {
        let date = self.run.date_key();
        let combined = self
            .summaries
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"Today's date is {date}.

Write the final blog post from the summarized article data below.
Target readers: game client programmers and AI engineers.

[Output rules]
- Output only the markdown of the post. No explanations and no code fences (such as ```markdown).
- Every article heading must link the real article URL from the data.
- Keep the articles in the order they appear in the data.

---
title: "[An engaging title based on the collected news, e.g. {date} Unreal C++ optimization & LLM trends]"
date: {timestamp}
draft: false
description: "[2-3 line summary of the key technical trends, focused on practical use in game and AI development]"
tags: ["News", "Game Programming", "AI Trends"]
categories: ["Tech"]
---

Here are the latest trends in game programming and AI technology.

(Then, for each article, keep this format)
### 1. [Real article title](real article URL)
* **Key points:** ...
* **Technical significance:** ...
* **How to apply:** ...

[Summary data]
{combined}
"#,
            date = date,
            timestamp = self.run.frontmatter_timestamp(),
            combined = combined,
        )
    }
}

#[derive(Debug, Clone)]
pub struct TranslationRequest<'a> {
    pub post: &'a Post,
    pub target: Language,
}

impl TranslationRequest<'_> {
    pub fn to_prompt(&self) -> String {
        format!(
            r#"Translate the following markdown blog post into {language}.

Rules:
{style}
- Preserve the markdown structure exactly: frontmatter keys, headings, bullet markers, bold markers and numbering.
- Keep every link URL verbatim. Translate link text only when it is prose, and keep product or paper names as they are.
- In the frontmatter, translate only the title and description values. Leave date, draft, tags and categories unchanged.
- Output only the translated markdown. No explanations and no code fences.

[Post]
{post}"#,
            language = self.target.display_name(),
            style = self.target.style_guide(),
            post = self.post.render(),
        )
    }
}
