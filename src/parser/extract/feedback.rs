use std::sync::LazyLock;

use chrono::{Days, NaiveDate, NaiveDateTime};
use regex::Regex;

use super::dates::{iso, parse_any, FEEDBACK_DATE_FORMATS};

// Matches lines such as
//   "data limita pentru primirea de propuneri/observatii (10 zile de la publicare): 07 aprilie 2017"
//   "data limita pentru primirea de propuneri/opinii/sugestii : 26.09.2016"
static PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"data limita[^\n]*").unwrap());
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d\d?\.\d\d?\.20\d\d|\d\d?\s[a-z]+\s20\d\d").unwrap()
});
static DAYS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]*)de la publicare\)").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackDeadline {
    pub days: Option<i64>,
    /// ISO date.
    pub date: Option<String>,
}

pub fn resolve(text: &str, published: Option<NaiveDateTime>) -> FeedbackDeadline {
    let text = text.trim().to_lowercase();
    let Some(phrase) = PHRASE_RE.find(&text).map(|m| m.as_str()) else {
        return FeedbackDeadline::default();
    };

    let stated_date = DATE_RE
        .find(phrase)
        .and_then(|m| parse_any(m.as_str(), FEEDBACK_DATE_FORMATS));
    let stated_days = DAYS_RE
        .captures(phrase)
        .and_then(|c| c[1].split_whitespace().next().map(str::to_string))
        .and_then(|token| token.parse::<u32>().ok())
        .map(i64::from);

    let published = published.map(|dt| dt.date());
    match (stated_days, stated_date) {
        (Some(days), Some(date)) => FeedbackDeadline {
            days: Some(days),
            date: Some(iso(date)),
        },
        (Some(days), None) => FeedbackDeadline {
            days: Some(days),
            date: published.and_then(|p| date_after(p, days)).map(iso),
        },
        (None, Some(date)) => FeedbackDeadline {
            days: published.and_then(|p| days_between(p, date)),
            date: Some(iso(date)),
        },
        (None, None) => FeedbackDeadline::default(),
    }
}

fn date_after(published: NaiveDate, days: i64) -> Option<NaiveDate> {
    published.checked_add_days(Days::new(u64::try_from(days).ok()?))
}

/// Whole days from publication to deadline; a deadline before publication
/// is not a day-count.
fn days_between(published: NaiveDate, deadline: NaiveDate) -> Option<i64> {
    let days = (deadline - published).num_days();
    (days >= 0).then_some(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::fold;

    fn at(y: i32, m: u32, d: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    #[test]
    fn days_only() {
        let text = "data limita pentru primirea de propuneri/observatii (10 zile de la publicare)";
        let f = resolve(text, at(2021, 1, 1));
        assert_eq!(f.days, Some(10));
        assert_eq!(f.date.as_deref(), Some("2021-01-11"));
    }

    #[test]
    fn date_only() {
        let text = "data limita pentru primirea de propuneri/opinii/sugestii : 26.09.2016";
        let f = resolve(text, at(2016, 9, 1));
        assert_eq!(f.date.as_deref(), Some("2016-09-26"));
        assert_eq!(f.days, Some(25));
    }

    #[test]
    fn month_name_date() {
        let text = "Data limita pentru primirea de propuneri: 07 aprilie 2017";
        let f = resolve(text, at(2017, 3, 28));
        assert_eq!(f.date.as_deref(), Some("2017-04-07"));
        assert_eq!(f.days, Some(10));
    }

    #[test]
    fn both_kept_as_stated() {
        let text = "data limita pentru primirea de propuneri/observatii (10 zile de la publicare): 07 aprilie 2017";
        let f = resolve(text, at(2017, 1, 1));
        assert_eq!(f.days, Some(10));
        assert_eq!(f.date.as_deref(), Some("2017-04-07"));
    }

    #[test]
    fn no_phrase() {
        let text = "propunerile se transmit in termen de 20 zile (10 zile de la publicare) 26.09.2016";
        assert_eq!(resolve(text, at(2016, 9, 1)), FeedbackDeadline::default());
        assert_eq!(resolve("", None), FeedbackDeadline::default());
    }

    #[test]
    fn phrase_stops_at_line_end() {
        let text = "data limita pentru primirea de propuneri:\nanunt din 26.09.2016";
        assert_eq!(resolve(text, at(2016, 9, 1)), FeedbackDeadline::default());
    }

    #[test]
    fn folded_phrase_stops_at_line_end() {
        let text = fold("Data limită pentru primirea de propuneri:\nAnunț arhivat la 30.11.2016");
        assert_eq!(resolve(&text, at(2016, 9, 1)), FeedbackDeadline::default());
    }

    #[test]
    fn folded_deadline_line() {
        let text = fold("Data limită pentru primirea de propuneri/observaţii : 26.09.2016\nPublicat la 30.11.2016");
        let f = resolve(&text, at(2016, 9, 1));
        assert_eq!(f.date.as_deref(), Some("2016-09-26"));
        assert_eq!(f.days, Some(25));
    }

    #[test]
    fn missing_publication_date_disables_arithmetic() {
        let f = resolve("data limita (15 zile de la publicare)", None);
        assert_eq!(f.days, Some(15));
        assert_eq!(f.date, None);

        let f = resolve("data limita: 26.09.2016", None);
        assert_eq!(f.days, None);
        assert_eq!(f.date.as_deref(), Some("2016-09-26"));
    }

    #[test]
    fn malformed_day_count_ignored() {
        let f = resolve("data limita (zece zile de la publicare)", at(2021, 1, 1));
        assert_eq!(f, FeedbackDeadline::default());
    }

    #[test]
    fn unparseable_date_ignored() {
        let f = resolve("data limita: 45.13.2016", at(2016, 9, 1));
        assert_eq!(f, FeedbackDeadline::default());
    }

    #[test]
    fn deadline_before_publication() {
        let f = resolve("data limita: 26.08.2016", at(2016, 9, 1));
        assert_eq!(f.date.as_deref(), Some("2016-08-26"));
        assert_eq!(f.days, None);
    }

    #[test]
    fn zero_days() {
        let f = resolve("data limita (0 zile de la publicare)", at(2021, 1, 1));
        assert_eq!(f.days, Some(0));
        assert_eq!(f.date.as_deref(), Some("2021-01-01"));
    }

    #[test]
    fn derived_date_round_trips() {
        let published = at(2020, 2, 20);
        for n in [1, 10, 15, 30, 365] {
            let forward = resolve(&format!("data limita ({} zile de la publicare)", n), published);
            let date = NaiveDate::parse_from_str(forward.date.as_deref().unwrap(), "%Y-%m-%d").unwrap();
            let dotted = date.format("%d.%m.%Y").to_string();
            let back = resolve(&format!("data limita: {}", dotted), published);
            assert_eq!(back.days, Some(n));
        }
    }
}
