//! Segmentation of rendered HTML into scoreable content blocks
//!
//! A block is the outermost element with block-level text semantics
//! (paragraph, heading, list item, preformatted text, ...). Nested block
//! elements are not emitted twice: once a block is found its subtree is
//! consumed as a unit.

use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

/// Class/id fragments that mark navigation chrome and other boilerplate
static BOILERPLATE_MARKERS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(^|[\s_-])(nav|navbar|menu|footer|header|sidebar|breadcrumbs?|banner|ads?|advert|promo|cookie|consent|social|share|related|comments?|popup|modal)($|[\s_-])",
    )
    .ok()
});

const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "pre", "blockquote", "td", "th", "dd", "dt",
    "figcaption", "summary",
];

const BOILERPLATE_TAGS: &[&str] = &["nav", "footer", "header", "aside", "form"];

const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "iframe", "head", "button", "select",
];

/// One unit of page content considered by the filters
#[derive(Debug, Clone)]
pub struct ContentBlock {
    pub tag: String,
    pub html: String,
    pub text: String,
    pub word_count: usize,
    /// Share of the block's text that sits inside links, 0.0..=1.0
    pub link_density: f64,
    /// Block lives under navigation chrome (by tag or class/id markers)
    pub boilerplate: bool,
}

impl ContentBlock {
    #[must_use]
    pub fn is_heading(&self) -> bool {
        matches!(self.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
    }

    /// Visible text over markup size, clamped to 0.0..=1.0
    #[must_use]
    pub fn text_density(&self) -> f64 {
        if self.html.is_empty() {
            return 0.0;
        }
        (self.text.len() as f64 / self.html.len() as f64).min(1.0)
    }
}

/// Split an HTML document (or fragment) into content blocks in document order
#[must_use]
pub fn extract_blocks(html: &str) -> Vec<ContentBlock> {
    let document = Html::parse_document(html);
    let mut blocks = Vec::new();
    collect(document.root_element(), false, &mut blocks);
    blocks
}

fn collect(element: ElementRef<'_>, boilerplate: bool, out: &mut Vec<ContentBlock>) {
    let name = element.value().name();
    if SKIPPED_TAGS.contains(&name) {
        return;
    }

    let boilerplate = boilerplate || BOILERPLATE_TAGS.contains(&name) || has_boilerplate_marker(element);

    if BLOCK_TAGS.contains(&name) {
        if let Some(block) = build_block(element, boilerplate) {
            out.push(block);
        }
        return;
    }

    for child in element.children() {
        if let Some(child) = ElementRef::wrap(child) {
            collect(child, boilerplate, out);
        }
    }
}

fn build_block(element: ElementRef<'_>, boilerplate: bool) -> Option<ContentBlock> {
    let text = normalize_text(element.text());
    if text.is_empty() {
        return None;
    }

    let link_chars: usize = element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "a")
        .map(|a| normalize_text(a.text()).len())
        .sum();

    Some(ContentBlock {
        tag: element.value().name().to_string(),
        html: element.html(),
        word_count: text.split_whitespace().count(),
        link_density: (link_chars as f64 / text.len() as f64).min(1.0),
        text,
        boilerplate,
    })
}

fn has_boilerplate_marker(element: ElementRef<'_>) -> bool {
    let Some(markers) = BOILERPLATE_MARKERS.as_ref() else {
        return false;
    };
    let value = element.value();
    let role_is_chrome = matches!(
        value.attr("role"),
        Some("navigation" | "banner" | "contentinfo" | "complementary")
    );
    role_is_chrome
        || value.id().is_some_and(|id| markers.is_match(id))
        || value.attr("class").is_some_and(|class| markers.is_match(class))
}

fn normalize_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let mut text = String::new();
    for word in parts.flat_map(str::split_whitespace) {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(word);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_blocks_are_emitted_once() {
        let blocks = extract_blocks("<ul><li><p>Only once please</p></li></ul>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].tag, "li");
        assert_eq!(blocks[0].text, "Only once please");
    }

    #[test]
    fn navigation_context_is_inherited() {
        let html = r#"<nav><ul><li><a href="/">Home</a></li></ul></nav>
            <div class="site-footer"><p>Copyright</p></div>
            <main><p>Real content</p></main>"#;
        let blocks = extract_blocks(html);

        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].boilerplate);
        assert!((blocks[0].link_density - 1.0).abs() < f64::EPSILON);
        assert!(blocks[1].boilerplate);
        assert!(!blocks[2].boilerplate);
    }

    #[test]
    fn scripts_and_empty_blocks_are_skipped() {
        let blocks = extract_blocks("<script>var x = 1;</script><p>   </p><p>kept</p>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "kept");
    }
}
