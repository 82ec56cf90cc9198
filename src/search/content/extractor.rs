//! HTML content extraction
//!
//! Reduces a page to its headings and paragraphs.

use scraper::{ElementRef, Html, Selector};

/// Extract the article text of an HTML page
///
/// Walks `h1`, `h2`, `h3` and `p` elements in document order:
/// - each heading becomes a blank line, `## {heading}` and a blank line
/// - each non-empty paragraph becomes its trimmed text and a blank line
///
/// Everything else (scripts, navigation, markup) is dropped. The result is
/// trimmed of surrounding whitespace and may be empty.
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("h1, h2, h3, p") {
        Ok(selector) => selector,
        Err(_) => return String::new(),
    };

    let mut content = String::new();

    for element in document.select(&selector) {
        let text = element_text(&element);
        match element.value().name() {
            "h1" | "h2" | "h3" => {
                content.push_str(&format!("\n## {}\n\n", text));
            }
            _ => {
                if !text.is_empty() {
                    content.push_str(&format!("{}\n\n", text));
                }
            }
        }
    }

    content.trim().to_string()
}

/// Text of an element with its surrounding whitespace removed
fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
