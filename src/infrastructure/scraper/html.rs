//! Paragraph text extraction

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static PARAGRAPH: Lazy<Option<Selector>> = Lazy::new(|| Selector::parse("p").ok());

/// Text of every `<p>` element in document order, joined with newlines.
///
/// Markup without paragraphs yields an empty string.
pub fn extract_paragraphs(markup: &str) -> String {
    let Some(selector) = PARAGRAPH.as_ref() else {
        return String::new();
    };

    let document = Html::parse_document(markup);

    document
        .select(selector)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
