use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::text::fold;

static STOP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"pentru|privind").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationType {
    Lege,
    Hg,
    Og,
    Oug,
    Om,
    Other,
}

impl PublicationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationType::Lege => "LEGE",
            PublicationType::Hg => "HG",
            PublicationType::Og => "OG",
            PublicationType::Oug => "OUG",
            PublicationType::Om => "OM",
            PublicationType::Other => "OTHER",
        }
    }
}

impl fmt::Display for PublicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluated top to bottom, first hit wins. Longer phrases sit above the
/// shorter patterns they contain.
pub const TYPE_RULES: &[(&str, PublicationType)] = &[
    ("lege", PublicationType::Lege),
    ("hotarare de guvern", PublicationType::Hg),
    ("hotarare a guvernului", PublicationType::Hg),
    ("hotarare", PublicationType::Hg),
    ("hg", PublicationType::Hg),
    ("ordonanta de guvern", PublicationType::Og),
    ("ordonanta de urgenta", PublicationType::Oug),
    ("ordin de ministru", PublicationType::Om),
    ("ordinul", PublicationType::Om),
];

/// Classify a title by the words preceding "pentru"/"privind".
pub fn classify(title: &str) -> PublicationType {
    let text = fold(title);
    let text = text.trim();
    match STOP_RE.find(text) {
        Some(stop) => guess_initiative_type(&text[..stop.start()], TYPE_RULES),
        None => PublicationType::Other,
    }
}

pub fn guess_initiative_type(text: &str, rules: &[(&str, PublicationType)]) -> PublicationType {
    rules
        .iter()
        .find(|(pattern, _)| text.contains(pattern))
        .map(|(_, kind)| *kind)
        .unwrap_or(PublicationType::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specific_hg_rule() {
        assert_eq!(classify("proiect de hotarare de guvern privind ceva"), PublicationType::Hg);
    }

    #[test]
    fn lege() {
        assert_eq!(classify("lege pentru aprobarea ordonantei"), PublicationType::Lege);
        assert_eq!(classify("Proiect de Lege privind sportul"), PublicationType::Lege);
    }

    #[test]
    fn diacritics_and_case_ignored() {
        assert_eq!(
            classify("HOTĂRÂRE A GUVERNULUI pentru modificarea"),
            PublicationType::Hg
        );
        assert_eq!(
            classify("Ordonanță de urgență privind tinerii"),
            PublicationType::Oug
        );
        assert_eq!(classify("ORDINUL ministrului privind taxele"), PublicationType::Om);
        assert_eq!(classify("Ordonanta de guvern pentru X"), PublicationType::Og);
    }

    #[test]
    fn no_stop_word_is_other() {
        assert_eq!(classify("Hotarare de guvern"), PublicationType::Other);
        assert_eq!(classify("anunt public"), PublicationType::Other);
    }

    #[test]
    fn no_rule_is_other() {
        assert_eq!(classify("Anunt privind consultarea"), PublicationType::Other);
    }

    #[test]
    fn match_only_before_stop_word() {
        // "lege" appears only after "privind"
        assert_eq!(classify("Anunt privind legea tinerilor"), PublicationType::Other);
    }

    #[test]
    fn rule_order_decides() {
        let rules = [("hotarare", PublicationType::Hg), ("lege", PublicationType::Lege)];
        assert_eq!(guess_initiative_type("lege si hotarare", &rules), PublicationType::Hg);
        assert_eq!(guess_initiative_type("nimic", &rules), PublicationType::Other);
    }

    #[test]
    fn displays_uppercase_tag() {
        assert_eq!(PublicationType::Oug.to_string(), "OUG");
        assert_eq!(PublicationType::Other.to_string(), "OTHER");
    }
}
