use once_cell::sync::Lazy;
use regex::Regex;

/// `[P] `, `[D] `, `[RL] ` markers copied from source titles. The marker must
/// start a line or follow whitespace, a bracket, a quote or a parenthesis, and
/// must be followed by whitespace, so `[AI](url)` link text survives.
static TAG_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)(^|[\s\[("'])(?:\[[A-Z]{1,2}\][ \t]+)+"#).unwrap());

/// `(1 line)`, `(2 lines)`, `(1줄)` meta-commentary.
static LINE_ANNOTATIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]*\(\d+[ \t]*(?:lines?|줄)\)").unwrap());

/// `1. Title (https://...)`, optionally already prefixed with `###`.
static BARE_LINK_HEADINGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:###[ \t]*)?(\d+)\.[ \t]+([^\[\s][^\n]*?)[ \t]+\((https?://[^\s()]+)\)[ \t]*$")
        .unwrap()
});

/// Cleans model-written markdown before it is persisted.
///
/// Removing one tag marker can expose another (`[[P] P] x`), so the rules
/// run until the text stops changing. Marker and annotation removal only
/// shrink the text and a repaired heading never matches the heading rule
/// again, so the loop ends.
pub fn sanitize(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = sanitize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_once(text: &str) -> String {
    let text = TAG_MARKERS.replace_all(text, "$1");
    let text = LINE_ANNOTATIONS.replace_all(&text, "");
    BARE_LINK_HEADINGS
        .replace_all(&text, "### $1. [$2]($3)")
        .into_owned()
}

/// Removes a code fence the model wrapped the whole document in.
pub fn strip_code_fences(text: &str) -> String {
    let text = text.trim();
    if !text.starts_with("```") {
        return text.to_string();
    }

    let inner = match text.find('\n') {
        Some(idx) => &text[idx + 1..],
        None => "",
    };
    let inner = inner.trim_end();
    inner.strip_suffix("```").unwrap_or(inner).trim().to_string()
}
