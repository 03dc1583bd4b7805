use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use crate::text::clean_lines;

static ARTICLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.main > div.article").unwrap());
static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3.article-title").unwrap());
static DATE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.date").unwrap());
static CONTENT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.article-content").unwrap());
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "tr", "table", "section", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// A link found in the article body, before filtering and URL resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub text: String,
    pub href: String,
}

/// Raw article fields as they appear on the page.
#[derive(Debug, Clone, Default)]
pub struct ArticleFields {
    pub title: String,
    pub date_text: String,
    pub description: String,
    pub documents: Vec<RawDocument>,
}

pub fn select(html: &str) -> ArticleFields {
    let document = Html::parse_document(html);
    let root = document
        .select(&ARTICLE_SEL)
        .next()
        .unwrap_or_else(|| document.root_element());

    let content = root.select(&CONTENT_SEL).next();

    ArticleFields {
        title: first_text(root, &TITLE_SEL),
        date_text: first_text(root, &DATE_SEL),
        description: content.map(text_of).unwrap_or_default(),
        documents: content
            .map(|c| {
                c.select(&LINK_SEL)
                    .filter_map(|a| {
                        Some(RawDocument {
                            text: text_of(a),
                            href: a.value().attr("href")?.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn first_text(root: ElementRef, selector: &Selector) -> String {
    root.select(selector).next().map(text_of).unwrap_or_default()
}

/// Element text with a line break at each block element, so paragraphs
/// written without source newlines stay on separate lines.
fn text_of(el: ElementRef) -> String {
    let mut raw = String::new();
    for node in el.descendants() {
        match node.value() {
            Node::Text(t) => raw.push_str(t),
            Node::Element(e) if BLOCK_TAGS.contains(&e.name()) => raw.push('\n'),
            _ => {}
        }
    }
    clean_lines(&raw)
}
