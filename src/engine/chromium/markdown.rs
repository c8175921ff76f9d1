//! HTML to markdown rendering for a crawled page

use anyhow::{Result, anyhow};
use htmd::HtmlToMarkdown;
use htmd::options::{CodeBlockStyle, HeadingStyle, LinkStyle, Options};

use crate::content_filter::ContentFilter;
use crate::engine::MarkdownVariants;

fn converter() -> HtmlToMarkdown {
    HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            link_style: LinkStyle::Inlined,
            ..Default::default()
        })
        .skip_tags(vec!["script", "style", "noscript", "template", "iframe", "svg"])
        .build()
}

/// Convert an HTML fragment or document to markdown
pub fn html_to_markdown(html: &str) -> Result<String> {
    converter()
        .convert(html)
        .map(|md| md.trim().to_string())
        .map_err(|e| anyhow!("Markdown conversion failed: {e}"))
}

/// Render the raw and filtered markdown for a page
///
/// The filtered ("fit") rendering is only produced when a content filter is
/// configured; an empty filter result yields `Some("")`.
pub fn render_variants(
    html: &str,
    filter: Option<&ContentFilter>,
    word_count_threshold: usize,
) -> Result<MarkdownVariants> {
    let raw = apply_word_threshold(&html_to_markdown(html)?, word_count_threshold);

    let fit = match filter {
        Some(filter) => {
            let kept = filter.filter_html(html);
            let md = html_to_markdown(&kept.join("\n"))?;
            Some(apply_word_threshold(&md, word_count_threshold))
        }
        None => None,
    };

    Ok(MarkdownVariants {
        raw_markdown: Some(raw),
        fit_markdown: fit,
    })
}

/// Drop plain-text paragraphs with fewer than `threshold` words
///
/// Headings, lists, tables, quotes, images and fenced code are structural and
/// always kept. Fences are tracked so blank lines inside code never split a
/// paragraph.
#[must_use]
pub fn apply_word_threshold(markdown: &str, threshold: usize) -> String {
    if threshold == 0 {
        return markdown.to_string();
    }

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in markdown.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }
        if !in_fence && line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs
        .into_iter()
        .filter(|p| is_structural(p) || p.split_whitespace().count() >= threshold)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn is_structural(paragraph: &str) -> bool {
    let first = paragraph.trim_start();
    if ["#", "```", "|", ">", "![", "- ", "* ", "+ "]
        .iter()
        .any(|p| first.starts_with(p))
    {
        return true;
    }
    // ordered list item
    let digits = first.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && first[digits..].starts_with(". ")
}
