use std::sync::LazyLock;

use regex::Regex;

use crate::text::fold;

pub const MAX_IDENTIFIER_LEN: usize = 127;
const FALLBACK_IDENTIFIER: &str = "publicatie";

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Join a letter-spaced leading word back together:
/// "H O T Ă R Â R E privind X" → "HOTĂRÂRE privind X".
pub fn clean_title(raw: &str) -> String {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    let idx = parts
        .iter()
        .position(|p| p.chars().count() > 1)
        .unwrap_or(0);

    let prefix = parts[..idx].concat();
    let rest = parts[idx..].join(" ");
    if prefix.is_empty() {
        rest
    } else {
        format!("{} {}", prefix, rest)
    }
}

/// Fold, replace non-alphanumeric runs with `-`, cap at 127 chars.
pub fn slugify(text: &str) -> String {
    let folded = fold(text);
    let slug = NON_SLUG_RE.replace_all(&folded, "-");
    let slug = slug.trim_matches('-');
    slug[..slug.len().min(MAX_IDENTIFIER_LEN)]
        .trim_end_matches('-')
        .to_string()
}

/// Identifier for a publication: title slug, else page slug, else a constant.
pub fn identifier(title: &str, page_url: &str) -> String {
    let from_title = slugify(title);
    if !from_title.is_empty() {
        return from_title;
    }
    let last_segment = page_url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("");
    let from_url = slugify(last_segment);
    if from_url.is_empty() {
        FALLBACK_IDENTIFIER.to_string()
    } else {
        from_url
    }
}
