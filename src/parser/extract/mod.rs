pub mod contact;
pub mod dates;
pub mod documents;
pub mod feedback;
pub mod kind;
pub mod title;

use tracing::warn;

use super::article::ArticleFields;
use crate::db::PublicationRow;
use crate::text::fold;

pub const INSTITUTION: &str = "tineret";

/// Build the publication record for one article page. Every field degrades
/// to empty/absent on its own; nothing here fails the article.
pub fn extract_all(url: &str, fields: &ArticleFields) -> PublicationRow {
    let title = title::clean_title(&fields.title);
    let kind = kind::classify(&title);
    let (date, published) = dates::parse_date(&fields.date_text);

    let folded = fold(&fields.description);
    let deadline = feedback::resolve(&folded, published);
    let contact = contact::extract(&folded);
    let documents = documents::extract(url, &fields.documents);

    let row = PublicationRow {
        url: url.to_string(),
        identifier: title::identifier(&title, url),
        institution: INSTITUTION.to_string(),
        kind: kind.to_string(),
        date,
        title,
        description: fields.description.clone(),
        documents: serde_json::to_string(&documents).unwrap_or_else(|_| "[]".into()),
        contact: serde_json::to_string(&contact).unwrap_or_else(|_| "{}".into()),
        feedback_days: deadline.days,
        max_feedback_date: deadline.date,
    };

    if row.feedback_days.is_none() {
        warn!(
            identifier = %row.identifier,
            url = %row.url,
            date = ?row.date,
            max_feedback_date = ?row.max_feedback_date,
            "No feedback window found, needs manual review"
        );
    }

    row
}

// ── Tests ──
