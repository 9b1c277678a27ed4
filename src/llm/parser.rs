use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::models::SelectedArticle;

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectionPayload {
    List(Vec<RawSelection>),
    Wrapped { articles: Vec<RawSelection> },
}

#[derive(Deserialize)]
struct RawSelection {
    title: String,
    link: String,
    #[serde(default)]
    rss_summary: Option<String>,
}

/// Parses and validates the selection stage response, keeping at most `cap`
/// articles in the order the model returned them.
pub fn parse_selection(response: &str, cap: usize) -> Result<Vec<SelectedArticle>> {
    let json_str = extract_json(response)?;

    let payload: SelectionPayload = serde_json::from_str(&json_str)
        .map_err(|e| Error::ParseError(format!("Failed to parse selection response: {}", e)))?;

    let raw = match payload {
        SelectionPayload::List(items) => items,
        SelectionPayload::Wrapped { articles } => articles,
    };

    if raw.len() > cap {
        tracing::warn!(
            "Model selected {} articles, keeping the first {}",
            raw.len(),
            cap
        );
    }

    raw.into_iter()
        .take(cap)
        .enumerate()
        .map(|(idx, item)| validate(idx, item))
        .collect()
}

fn validate(idx: usize, item: RawSelection) -> Result<SelectedArticle> {
    let title = item.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::ParseError(format!("Selected article {} has an empty title", idx + 1)));
    }

    let link = item.link.trim().to_string();
    let url = Url::parse(&link).map_err(|e| {
        Error::ParseError(format!("Selected article {} has an invalid link {:?}: {}", idx + 1, link, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::ParseError(format!(
            "Selected article {} link is not http(s): {}",
            idx + 1,
            link
        )));
    }

    Ok(SelectedArticle {
        title,
        link,
        rss_summary: item.rss_summary.unwrap_or_default().trim().to_string(),
    })
}

fn extract_json(text: &str) -> Result<String> {
    // Try to find JSON block in markdown code blocks
    if let Some(start) = text.find("```json") {
        let start = start + 7;
        if let Some(end) = text[start..].find("```") {
            return Ok(text[start..start + end].trim().to_string());
        }
    }

    // Try plain code block
    if let Some(start) = text.find("```") {
        let start = start + 3;
        // Skip any language identifier on the same line
        let start = text[start..]
            .find('\n')
            .map(|i| start + i + 1)
            .unwrap_or(start);
        if let Some(end) = text[start..].find("```") {
            let content = text[start..start + end].trim();
            if content.starts_with('[') || content.starts_with('{') {
                return Ok(content.to_string());
            }
        }
    }

    // Try to find a raw JSON array or object
    if let Some(start) = text.find(|c: char| c == '[' || c == '{') {
        let mut depth = 0;
        let mut end = start;
        let mut in_string = false;
        let mut escape_next = false;

        for (i, c) in text[start..].char_indices() {
            if escape_next {
                escape_next = false;
                continue;
            }

            match c {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                '[' | '{' if !in_string => depth += 1,
                ']' | '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        end = start + i + 1;
                        break;
                    }
                }
                _ => {}
            }
        }

        if depth == 0 && end > start {
            return Ok(text[start..end].to_string());
        }
    }

    Err(Error::ParseError("No valid JSON found in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> String {
        let items: Vec<String> = (0..n)
            .map(|i| {
                format!(
                    r#"{{"title": "Article {i}", "link": "https://example.com/{i}", "rss_summary": "s{i}"}}"#
                )
            })
            .collect();
        format!("[{}]", items.join(", "))
    }

    #[test]
    fn test_extract_json_from_markdown() {
        let input = r#"Here are the picks:
```json
[{"title": "A", "link": "https://a.example"}]
```
"#;
        let result = extract_json(input).unwrap();
        assert_eq!(result, r#"[{"title": "A", "link": "https://a.example"}]"#);
    }

    #[test]
    fn test_extract_raw_array_with_brackets_in_strings() {
        let input = r#"Result: [{"title": "[P] x ]", "link": "https://a.example"}] done"#;
        let result = extract_json(input).unwrap();
        assert_eq!(result, r#"[{"title": "[P] x ]", "link": "https://a.example"}]"#);
    }

    #[test]
    fn test_selection_is_capped_in_order() {
        for returned in 0..8 {
            let selected = parse_selection(&entries(returned), 3).unwrap();
            assert_eq!(selected.len(), returned.min(3));
            for (i, article) in selected.iter().enumerate() {
                assert_eq!(article.link, format!("https://example.com/{}", i));
            }
        }
    }

    #[test]
    fn test_wrapped_payload_and_missing_summary() {
        let input = r#"{"articles": [{"title": " A ", "link": "https://a.example/x"}]}"#;
        let selected = parse_selection(input, 5).unwrap();
        assert_eq!(selected[0].title, "A");
        assert_eq!(selected[0].rss_summary, "");
    }

    #[test]
    fn test_rejects_malformed_and_invalid_entries() {
        assert!(matches!(parse_selection("no json here", 5), Err(Error::ParseError(_))));
        assert!(matches!(
            parse_selection(r#"[{"title": "A"}]"#, 5),
            Err(Error::ParseError(_))
        ));
        assert!(matches!(
            parse_selection(r#"[{"title": "A", "link": "not a url"}]"#, 5),
            Err(Error::ParseError(_))
        ));
        assert!(matches!(
            parse_selection(r#"[{"title": "", "link": "https://a.example"}]"#, 5),
            Err(Error::ParseError(_))
        ));
        assert!(matches!(
            parse_selection(r#"[{"title": "A", "link": "ftp://a.example"}]"#, 5),
            Err(Error::ParseError(_))
        ));
    }
}
