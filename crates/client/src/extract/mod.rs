//! Title and visible-text extraction from HTML.
//!
//! ### Algorithm
//! - Title: text of the first `<title>` element, whitespace-collapsed.
//! - Text: every text node outside `head`, `script`, `style`, `noscript` and
//!   `template`, whitespace-collapsed into single spaces.
//! - Text longer than the configured limit is cut and marked with `...`.
//!
//! ### Stable Abstraction
//! - Callers use the `Extractor` trait so the engine can be swapped.

use marksearch_core::Error;
use scraper::{ElementRef, Html};

/// Marker appended to truncated text.
pub const TRUNCATION_MARKER: &str = "...";

const SKIPPED_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Configuration for content extraction.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Maximum characters of text kept before truncation (default: 200000)
    pub max_chars: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { max_chars: 200_000 }
    }
}

/// Result of content extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Page title, if the page has a non-blank one
    pub title: Option<String>,
    /// Visible text, possibly empty
    pub text: String,
}

/// Stable extractor trait for content extraction.
pub trait Extractor: Send + Sync {
    /// Extract the title and readable text from HTML.
    fn extract(&self, html: &str, config: &ExtractConfig) -> Result<ExtractionResult, Error>;
}

/// Extractor built on scraper's HTML5 parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTextExtractor;

impl Extractor for HtmlTextExtractor {
    fn extract(&self, html: &str, config: &ExtractConfig) -> Result<ExtractionResult, Error> {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let title = root
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "title")
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty());

        let mut raw = String::new();
        collect_visible_text(root, &mut raw);
        let text = truncate_chars(collapse_whitespace(&raw), config.max_chars);

        Ok(ExtractionResult { title, text })
    }
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    if SKIPPED_ELEMENTS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        if let Some(el) = ElementRef::wrap(child) {
            collect_visible_text(el, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters, appending [`TRUNCATION_MARKER`] when cut.
pub fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{TRUNCATION_MARKER}", &text[..byte_idx]),
        None => text,
    }
}

/// Number of whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Extract with the default extractor and configuration.
pub fn extract_text(html: &str) -> Result<ExtractionResult, Error> {
    HtmlTextExtractor.extract(html, &ExtractConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>
                Test
                Article
            </title>
            <style>body { color: red; }</style>
        </head>
        <body>
            <script>var hidden = "nope";</script>
            <article>
                <h1>Main Heading</h1>
                <p>This is a   test paragraph.</p>
                <noscript>Enable JavaScript</noscript>
                <p>Another <b>bold</b> paragraph.</p>
            </article>
        </body>
        </html>
    "#;

    #[test]
    fn test_extract_title_and_text() {
        let result = extract_text(SIMPLE_HTML).unwrap();
        assert_eq!(result.title.as_deref(), Some("Test Article"));
        assert_eq!(result.text, "Main Heading This is a test paragraph. Another bold paragraph.");
    }

    #[test]
    fn test_script_and_style_removed() {
        let result = extract_text(SIMPLE_HTML).unwrap();
        assert!(!result.text.contains("hidden"));
        assert!(!result.text.contains("color"));
        assert!(!result.text.contains("JavaScript"));
    }

    #[test]
    fn test_missing_or_blank_title() {
        assert!(extract_text("<p>hello</p>").unwrap().title.is_none());
        assert!(extract_text("<title>   </title><p>hello</p>").unwrap().title.is_none());
    }

    #[test]
    fn test_empty_html() {
        let result = extract_text("").unwrap();
        assert!(result.title.is_none());
        assert!(result.text.is_empty());
    }

    #[test]
    fn test_plain_text_input() {
        let result = extract_text("not really html").unwrap();
        assert_eq!(result.text, "not really html");
    }

    #[test]
    fn test_truncation() {
        let config = ExtractConfig { max_chars: 5 };
        let result = HtmlTextExtractor.extract("<p>abcdefghij</p>", &config).unwrap();
        assert_eq!(result.text, "abcde...");

        let result = HtmlTextExtractor.extract("<p>abcde</p>", &config).unwrap();
        assert_eq!(result.text, "abcde");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("ééééé".to_string(), 2), "éé...");
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  one two\tthree\n"), 3);
    }
}
