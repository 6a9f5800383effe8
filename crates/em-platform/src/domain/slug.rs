//! Slug generation

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("strip regex is valid"));
static DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("dash regex is valid"));

/// Convert text to a URL-safe slug: accents folded to ASCII, lowercase,
/// punctuation removed, whitespace and hyphen runs collapsed into one hyphen.
pub fn slugify(text: &str) -> String {
    let ascii: String = text
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase();
    let stripped = STRIP_RE.replace_all(&ascii, "");
    DASH_RE
        .replace_all(stripped.trim(), "-")
        .trim_matches(|c| c == '-' || c == '_')
        .to_string()
}

/// Slug candidates in the order they are tried: `base`, `base-1`, `base-2`, ...
pub fn candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string()).chain((1u64..).map(move |n| format!("{}-{}", base, n)))
}

/// Slug base for `text`, falling back to `fallback` when nothing survives slugify
pub fn base_slug(text: &str, fallback: &str) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}
