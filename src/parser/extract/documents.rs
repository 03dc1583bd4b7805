use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::parser::article::RawDocument;

const DOC_EXTENSIONS: &[&str] = &[
    ".docs", ".doc", ".txt", ".crt", ".xls", ".xml", ".pdf", ".docx", ".xlsx",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Keep links to known document types, with absolute URLs.
pub fn extract(page_url: &str, links: &[RawDocument]) -> Vec<Document> {
    let base = Url::parse(page_url).ok();

    links
        .iter()
        .filter(|link| is_document(&link.href))
        .filter_map(|link| {
            let url = resolve(base.as_ref(), &link.href);
            if url.is_none() {
                debug!("Skipping unresolvable document link {} on {}", link.href, page_url);
            }
            Some(Document {
                kind: link.text.trim().to_string(),
                url: url?,
            })
        })
        .collect()
}

fn is_document(href: &str) -> bool {
    let lower = href.trim().to_lowercase();
    DOC_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    match base {
        Some(base) => base.join(href).ok().map(String::from),
        None => Url::parse(href).ok().map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(text: &str, href: &str) -> RawDocument {
        RawDocument {
            text: text.to_string(),
            href: href.to_string(),
        }
    }

    #[test]
    fn relative_links_resolved() {
        let docs = extract(
            "http://mts.ro/proiecte-legislative/proiect-hg/",
            &[
                link(" Proiect HG ", "/wp-content/uploads/2017/03/proiect.pdf"),
                link("Nota de fundamentare", "nota.DOCX"),
            ],
        );
        assert_eq!(
            docs,
            vec![
                Document {
                    kind: "Proiect HG".into(),
                    url: "http://mts.ro/wp-content/uploads/2017/03/proiect.pdf".into(),
                },
                Document {
                    kind: "Nota de fundamentare".into(),
                    url: "http://mts.ro/proiecte-legislative/proiect-hg/nota.DOCX".into(),
                },
            ]
        );
    }

    #[test]
    fn non_documents_dropped() {
        let docs = extract(
            "http://mts.ro/a/",
            &[
                link("Acasa", "http://mts.ro/"),
                link("mail", "mailto:consultare@mts.ro"),
                link("Anexa", "https://cdn.mts.ro/anexa.xlsx"),
            ],
        );
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].url, "https://cdn.mts.ro/anexa.xlsx");
    }

    #[test]
    fn serialized_with_type_key() {
        let docs = extract("http://mts.ro/a/", &[link("Anexa", "anexa.pdf")]);
        assert_eq!(
            serde_json::to_string(&docs).unwrap(),
            r#"[{"type":"Anexa","url":"http://mts.ro/a/anexa.pdf"}]"#
        );
    }

    #[test]
    fn relative_link_without_base_skipped() {
        assert!(extract("not a url", &[link("Anexa", "anexa.pdf")]).is_empty());
    }
}
