pub mod article;
pub mod extract;

use tracing::debug;

use crate::db::{PublicationRow, ScrapedPage};

/// Two-pass pipeline: html → article fields → publication.
pub fn process_page(page: &ScrapedPage) -> PublicationRow {
    debug!(page_data_id = page.page_data_id, url = %page.url, "Processing page");
    parse_html(&page.url, &page.html)
}

pub fn parse_html(url: &str, html: &str) -> PublicationRow {
    let fields = article::select(html);
    extract::extract_all(url, &fields)
}
