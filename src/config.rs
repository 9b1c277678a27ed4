use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::FixedOffset;

use crate::error::{Error, Result};
use crate::models::language::{parse_language_list, Language};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub target_repo_path: PathBuf,
    pub model: String,
    pub selection_cap: usize,
    pub languages: Vec<Language>,
    pub enable_translation: bool,
    pub llm_max_attempts: u32,
    pub llm_retry_delay: Duration,
    pub utc_offset: FixedOffset,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config("GEMINI_API_KEY environment variable not set".to_string()))?;

        let target_repo_path = lookup("TARGET_REPO_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let selection_cap = lookup("NEWS_MAX_ARTICLES")
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let languages = match lookup("NEWS_LANGUAGES") {
            Some(value) => parse_language_list(&value)?,
            None => vec![Language::English, Language::Korean],
        };

        let enable_translation = lookup("NEWS_TRANSLATE")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        let llm_max_attempts = lookup("LLM_MAX_ATTEMPTS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let llm_retry_delay = lookup("LLM_RETRY_DELAY_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let offset_hours: i32 = lookup("NEWS_UTC_OFFSET_HOURS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(9);
        let utc_offset = FixedOffset::east_opt(offset_hours * 3600).ok_or_else(|| {
            Error::Config(format!("Invalid UTC offset: {} hours", offset_hours))
        })?;

        Ok(Self {
            gemini_api_key,
            target_repo_path,
            model,
            selection_cap,
            languages,
            enable_translation,
            llm_max_attempts,
            llm_retry_delay,
            utc_offset,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub selection_cap: usize,
    pub languages: Vec<Language>,
    pub enable_translation: bool,
}

impl PipelineConfig {
    /// Variants that will be written, source language first.
    pub fn output_languages(&self) -> Vec<Language> {
        let mut output: Vec<Language> = self
            .languages
            .iter()
            .copied()
            .filter(|l| l.is_source() || self.enable_translation)
            .collect();
        output.sort_by_key(|l| !l.is_source());
        output
    }

    pub fn translation_targets(&self) -> Vec<Language> {
        self.output_languages()
            .into_iter()
            .filter(|l| !l.is_source())
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.selection_cap == 0 {
            return Err(Error::Config("selection cap must be at least 1".to_string()));
        }
        if self.output_languages().is_empty() {
            return Err(Error::Config(format!(
                "no output language left: languages={:?}, translation enabled={}",
                self.languages, self.enable_translation
            )));
        }
        Ok(())
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            selection_cap: config.selection_cap,
            languages: config.languages.clone(),
            enable_translation: config.enable_translation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.target_repo_path, PathBuf::from("."));
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.selection_cap, 5);
        assert_eq!(config.languages, vec![Language::English, Language::Korean]);
        assert!(config.enable_translation);
        assert_eq!(config.llm_max_attempts, 3);
        assert_eq!(config.llm_retry_delay, Duration::from_secs(30));
        assert_eq!(config.utc_offset.local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_output_languages() {
        let mut pipeline = PipelineConfig {
            selection_cap: 3,
            languages: vec![Language::Korean, Language::English],
            enable_translation: true,
        };
        assert_eq!(
            pipeline.output_languages(),
            vec![Language::English, Language::Korean]
        );
        assert_eq!(pipeline.translation_targets(), vec![Language::Korean]);

        pipeline.enable_translation = false;
        assert_eq!(pipeline.output_languages(), vec![Language::English]);

        pipeline.languages = vec![Language::Korean];
        assert!(pipeline.validate().is_err());
    }
}
