use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy)]
pub enum DateFormat {
    /// 26.09.2016
    Dotted,
    /// 07 aprilie 2017
    MonthName,
}

/// Tried in order; the first format that parses wins.
pub const FEEDBACK_DATE_FORMATS: &[DateFormat] = &[DateFormat::Dotted, DateFormat::MonthName];

/// Parse a `DD.MM.YYYY` publication date into its ISO form and a midnight datetime.
pub fn parse_date(text: &str) -> (Option<String>, Option<NaiveDateTime>) {
    match parse_with(text, DateFormat::Dotted) {
        Some(date) => (Some(iso(date)), date.and_hms_opt(0, 0, 0)),
        None => (None, None),
    }
}

pub fn parse_with(text: &str, format: DateFormat) -> Option<NaiveDate> {
    let text = text.trim();
    match format {
        DateFormat::Dotted => NaiveDate::parse_from_str(text, "%d.%m.%Y").ok(),
        DateFormat::MonthName => {
            let mut parts = text.split_whitespace();
            let day = parts.next()?.parse::<u32>().ok()?;
            let month = romanian_month_to_number(parts.next()?)?;
            let year = parts.next()?.parse::<i32>().ok()?;
            if parts.next().is_some() {
                return None;
            }
            NaiveDate::from_ymd_opt(year, month, day)
        }
    }
}

pub fn parse_any(text: &str, formats: &[DateFormat]) -> Option<NaiveDate> {
    formats.iter().find_map(|f| parse_with(text, *f))
}

pub fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Month names as they appear after diacritic folding.
pub fn romanian_month_to_number(month: &str) -> Option<u32> {
    match month.to_lowercase().as_str() {
        "ianuarie" => Some(1),
        "februarie" => Some(2),
        "martie" => Some(3),
        "aprilie" => Some(4),
        "mai" => Some(5),
        "iunie" => Some(6),
        "iulie" => Some(7),
        "august" => Some(8),
        "septembrie" => Some(9),
        "octombrie" => Some(10),
        "noiembrie" => Some(11),
        "decembrie" => Some(12),
        _ => None,
    }
}
