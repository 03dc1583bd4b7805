use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-]{2,5}").unwrap()
});
static TEL_FAX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(fax|telefon|tel)[^\d]{1,10}(\d(?:\d| |\.){8,11}\d)").unwrap()
});

/// Contact kind ("email", "tel", "telefon", "fax") → comma-joined values.
pub type ContactMap = BTreeMap<String, String>;

pub fn extract(text: &str) -> ContactMap {
    let text = text.trim().to_lowercase();
    let mut found: BTreeMap<String, Vec<String>> = BTreeMap::new();

    let mut seen = HashSet::new();
    let emails = EMAIL_RE
        .find_iter(&text)
        .map(|m| m.as_str())
        .filter(|e| seen.insert(*e))
        .map(str::to_string)
        .collect();
    found.insert("email".to_string(), emails);

    for caps in TEL_FAX_RE.captures_iter(&text) {
        let number = caps[2].replace([' ', '.'], "");
        found.entry(caps[1].to_string()).or_default().push(number);
    }

    found
        .into_iter()
        .map(|(kind, values)| (kind, values.join(",")))
        .collect()
}
