//! HTML to visible text

use scraper::Html;

/// Elements whose text is never rendered
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Strip all markup and return the visible text of an HTML document.
///
/// Each text node is trimmed, empty nodes are dropped, and the rest are
/// concatenated as-is. HTML parsing is lenient, so this never fails.
pub fn extract_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = fragment.trim();
        if !trimmed.is_empty() {
            text.push_str(trimmed);
        }
    }

    text
}
