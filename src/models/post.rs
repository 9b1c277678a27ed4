use serde_json::Value;

use crate::models::run::RunDate;

pub const MAX_TAGS: usize = 3;
pub const MAX_CATEGORIES: usize = 1;

const DEFAULT_TAGS: [&str; 3] = ["News", "Game Programming", "AI Trends"];
const DEFAULT_CATEGORY: &str = "Tech";
const DELIMITER: &str = "---";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub title: String,
    pub date: String,
    pub draft: bool,
    pub description: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

/// A markdown post: frontmatter block plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub frontmatter: Frontmatter,
    pub body: String,
}

impl Post {
    /// Splits model output into frontmatter and body. Output without a
    /// leading `---` block is treated as body only.
    pub fn parse(markdown: &str) -> Self {
        let text = markdown.trim_start();
        let mut lines = text.lines();

        if lines.next().map(str::trim) != Some(DELIMITER) {
            return Self {
                frontmatter: Frontmatter::default(),
                body: text.trim().to_string(),
            };
        }

        let mut header = Vec::new();
        let mut closed = false;
        for line in lines.by_ref() {
            if line.trim() == DELIMITER {
                closed = true;
                break;
            }
            header.push(line);
        }

        if !closed {
            // An unterminated block is not frontmatter.
            return Self {
                frontmatter: Frontmatter::default(),
                body: text.trim().to_string(),
            };
        }

        let body = lines.collect::<Vec<_>>().join("\n");
        Self {
            frontmatter: Frontmatter::parse(&header),
            body: body.trim().to_string(),
        }
    }

    /// Pins the date to the run and fills or bounds every other field.
    /// Missing values are taken from `fallback` first, then defaults.
    pub fn normalize(&mut self, run: &RunDate, fallback: Option<&Frontmatter>) {
        let fm = &mut self.frontmatter;
        fm.date = run.frontmatter_timestamp();

        if fm.title.trim().is_empty() {
            fm.title = fallback
                .map(|f| f.title.clone())
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| format!("{} Game Programming & AI Tech News", run.date_key()));
        }

        if fm.description.trim().is_empty() {
            if let Some(f) = fallback {
                fm.description = f.description.clone();
            }
        }

        fm.tags.retain(|t| !t.trim().is_empty());
        if fm.tags.is_empty() {
            fm.tags = fallback
                .map(|f| f.tags.clone())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TAGS.iter().map(|t| t.to_string()).collect());
        }
        fm.tags.truncate(MAX_TAGS);

        fm.categories.retain(|c| !c.trim().is_empty());
        if fm.categories.is_empty() {
            fm.categories = fallback
                .map(|f| f.categories.clone())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| vec![DEFAULT_CATEGORY.to_string()]);
        }
        fm.categories.truncate(MAX_CATEGORIES);
    }

    pub fn render(&self) -> String {
        let fm = &self.frontmatter;
        let mut output = String::new();

        output.push_str(DELIMITER);
        output.push('\n');
        output.push_str(&format!("title: {}\n", Value::from(fm.title.as_str())));
        output.push_str(&format!("date: {}\n", fm.date));
        output.push_str(&format!("draft: {}\n", fm.draft));
        output.push_str(&format!(
            "description: {}\n",
            Value::from(fm.description.as_str())
        ));
        output.push_str(&format!("tags: {}\n", Value::from(fm.tags.clone())));
        output.push_str(&format!(
            "categories: {}\n",
            Value::from(fm.categories.clone())
        ));
        output.push_str(DELIMITER);
        output.push_str("\n\n");
        output.push_str(&self.body);
        output.push('\n');

        output
    }
}

impl Frontmatter {
    fn parse(lines: &[&str]) -> Self {
        let mut fm = Frontmatter::default();
        // Key of a YAML block list (`tags:` followed by `- item` lines).
        let mut open_list: Option<String> = None;

        for line in lines {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(item) = trimmed.strip_prefix("- ") {
                if let Some(key) = open_list.as_deref() {
                    let item = unquote(item);
                    match key {
                        "tags" => fm.tags.push(item),
                        "categories" | "category" => fm.categories.push(item),
                        _ => {}
                    }
                }
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();
            open_list = None;

            match key.as_str() {
                "title" => fm.title = unquote(value),
                "description" => fm.description = unquote(value),
                "date" => fm.date = unquote(value),
                "draft" => fm.draft = value.eq_ignore_ascii_case("true"),
                "tags" | "categories" | "category" => {
                    if value.is_empty() {
                        open_list = Some(key.clone());
                        continue;
                    }
                    let items = parse_list(value);
                    if key == "tags" {
                        fm.tags = items;
                    } else {
                        fm.categories = items;
                    }
                }
                _ => {}
            }
        }

        fm
    }
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    if value.starts_with('"') {
        if let Ok(parsed) = serde_json::from_str::<String>(value) {
            return parsed;
        }
    }
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].trim().to_string();
        }
    }
    value.to_string()
}

fn parse_list(value: &str) -> Vec<String> {
    if let Ok(items) = serde_json::from_str::<Vec<String>>(value) {
        return items;
    }
    value
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(unquote)
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn run() -> RunDate {
        RunDate::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            FixedOffset::east_opt(9 * 3600).unwrap(),
        )
    }

    #[test]
    fn test_parse_and_normalize() {
        let input = r#"---
title: "Unreal 5.4 & LLM roundup"
date: 2023-05-05T09:00:00+09:00
draft: false
description: "Two things worth reading"
tags: ["News", "Game Programming", "AI Trends", "Tech"]
categories: ["Tech"]
---

### 1. [A](https://a.example)
"#;
        let mut post = Post::parse(input);
        assert_eq!(post.frontmatter.title, "Unreal 5.4 & LLM roundup");
        assert_eq!(post.frontmatter.tags.len(), 4);
        assert_eq!(post.body, "### 1. [A](https://a.example)");

        post.normalize(&run(), None);
        assert_eq!(post.frontmatter.date, "2024-01-02T09:00:00+09:00");
        assert_eq!(post.frontmatter.tags, vec!["News", "Game Programming", "AI Trends"]);
    }

    #[test]
    fn test_block_lists_and_fallback() {
        let input = "---\ntitle: 번역된 제목\ntags:\n  - 뉴스\n  - AI\n---\n본문";
        let source = Frontmatter {
            title: "Source".to_string(),
            description: "Source description".to_string(),
            categories: vec!["Tech".to_string()],
            ..Default::default()
        };

        let mut post = Post::parse(input);
        post.normalize(&run(), Some(&source));

        assert_eq!(post.frontmatter.title, "번역된 제목");
        assert_eq!(post.frontmatter.tags, vec!["뉴스", "AI"]);
        assert_eq!(post.frontmatter.description, "Source description");
        assert_eq!(post.frontmatter.categories, vec!["Tech"]);
    }

    #[test]
    fn test_missing_frontmatter_gets_defaults() {
        let mut post = Post::parse("### 1. [A](https://a.example)");
        post.normalize(&run(), None);

        let rendered = post.render();
        assert!(rendered.starts_with("---\ntitle: \"2024-01-02 Game Programming & AI Tech News\"\n"));
        assert!(rendered.contains("date: 2024-01-02T09:00:00+09:00\n"));
        assert!(rendered.contains("categories: [\"Tech\"]\n"));
        assert!(rendered.ends_with("### 1. [A](https://a.example)\n"));
    }

    #[test]
    fn test_render_escapes_quotes() {
        let mut post = Post::parse("---\ntitle: 'He said \"hi\"'\n---\nbody");
        post.normalize(&run(), None);
        assert!(post.render().contains("title: \"He said \\\"hi\\\"\"\n"));
    }
}
