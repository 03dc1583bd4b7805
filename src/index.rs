use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use tracing::info;
use url::Url;

use crate::settings::Settings;

static ARTICLE_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.main > div.article a[href]").unwrap());

pub fn client(settings: &Settings) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch the index page and return (url, slug) pairs for every article.
pub async fn fetch_article_urls(settings: &Settings) -> Result<Vec<(String, String)>> {
    let client = client(settings)?;
    let base = Url::parse(&settings.index_url)
        .with_context(|| format!("Invalid index URL {}", settings.index_url))?;

    info!("Fetching index: {}", base);
    let html = client
        .get(base.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
        .context("Failed to fetch index page")?;

    let pages = article_links(&html, &base);
    info!("Article pages on index: {}", pages.len());
    Ok(pages)
}

/// Article links inside `div.main > div.article`, absolute and deduplicated.
pub fn article_links(html: &str, base: &Url) -> Vec<(String, String)> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();

    document
        .select(&ARTICLE_LINK_SEL)
        .filter_map(|a| base.join(a.value().attr("href")?.trim()).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(|mut u| {
            u.set_fragment(None);
            u
        })
        .filter(|u| seen.insert(u.to_string()))
        .map(|u| {
            let slug = slug_from_url(&u);
            (u.to_string(), slug)
        })
        .collect()
}

/// Last non-empty path segment.
fn slug_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/index.html").unwrap();
        let base = Url::parse("http://mts.ro/proiecte-legislative-in-dezbatere-publica/").unwrap();
        let links = article_links(&html, &base);
        assert_eq!(
            links,
            vec![
                (
                    "http://mts.ro/proiecte-legislative-in-dezbatere-publica/proiect-hg-gala/".to_string(),
                    "proiect-hg-gala".to_string()
                ),
                (
                    "http://mts.ro/proiecte-legislative-in-dezbatere-publica/proiect-lege-tineri/".to_string(),
                    "proiect-lege-tineri".to_string()
                ),
            ]
        );
    }

    #[test]
    fn non_http_links_dropped() {
        let html = r#"<div class="main"><div class="article">
            <a href="mailto:a@mts.ro">mail</a>
            <a href="articol/#comentarii">Comentarii</a>
        </div></div>"#;
        let base = Url::parse("http://mts.ro/").unwrap();
        assert_eq!(
            article_links(html, &base),
            vec![("http://mts.ro/articol/".to_string(), "articol".to_string())]
        );
    }
}
