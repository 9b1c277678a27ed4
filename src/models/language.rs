use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Output language of a post variant. English is the language posts are
/// composed in; every other variant is produced by translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Korean,
}

impl Language {
    pub const SOURCE: Language = Language::English;

    pub fn tag(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Korean => "ko",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Korean => "Korean",
        }
    }

    pub fn is_source(&self) -> bool {
        *self == Self::SOURCE
    }

    /// Journal file name for a given `YYYY-MM-DD` date key.
    pub fn file_name(&self, date: &str) -> String {
        if self.is_source() {
            format!("{}_news.md", date)
        } else {
            format!("{}_news.{}.md", date, self.tag())
        }
    }

    /// Register and terminology rules handed to the translator.
    pub fn style_guide(&self) -> &'static str {
        match self {
            Language::English => "",
            Language::Korean => {
                r#"- Write prose paragraphs in the formal polite register (합니다체).
- In bullet-style summary fields (Key points, Technical significance, How to apply), use clipped nominal endings such as "~함", "~임", "~됨" instead of full sentences.
- Keep established technical terms in English where Korean developers use them as loanwords (e.g. LLM, Shader, Rendering Pipeline, Fine-tuning, Unreal Engine, Unity, GPU, Transformer)."#
            }
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "ko" | "korean" => Ok(Language::Korean),
            other => Err(Error::Config(format!("Unsupported language: {}", other))),
        }
    }
}

/// Parses a comma separated list such as `en,ko`, dropping duplicates.
pub fn parse_language_list(value: &str) -> Result<Vec<Language>, Error> {
    let mut languages = Vec::new();
    for part in value.split(',').filter(|p| !p.trim().is_empty()) {
        let language: Language = part.parse()?;
        if !languages.contains(&language) {
            languages.push(language);
        }
    }
    Ok(languages)
}
