/// Transliterate to ASCII and lowercase: "Dată limită" → "data limita".
/// Folded per line; `deunicode` drops control characters such as `\n`.
pub fn fold(text: &str) -> String {
    text.lines()
        .map(|l| deunicode::deunicode(l).to_lowercase())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse whitespace runs inside each line and drop blank lines.
pub fn clean_lines(raw: &str) -> String {
    raw.lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
