use crate::models::language::Language;
use crate::models::post::Post;

/// One language variant of the day's post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostVariant {
    pub language: Language,
    pub post: Post,
}

/// Everything a completed run produced, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub date_key: String,
    pub article_count: usize,
    pub variants: Vec<PostVariant>,
}

impl Digest {
    pub fn file_name(&self, variant: &PostVariant) -> String {
        variant.language.file_name(&self.date_key)
    }

    pub fn variant(&self, language: Language) -> Option<&PostVariant> {
        self.variants.iter().find(|v| v.language == language)
    }
}
