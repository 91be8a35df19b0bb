//! DOM-heuristic extraction cascades.
//!
//! Secondary strategy behind the readability pass: ordered selector
//! cascades for title, main content, and publish date, each evaluated
//! until one clears its quality gate. Noise tags (script, style, nav,
//! chrome sections) are excluded from every text walk before any
//! selector is consulted.

use scraper::{ElementRef, Html, Selector};

/// Tags never contributing text to an extraction.
const NOISE_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "aside", "form"];

/// Title sources in priority order. Meta selectors yield their
/// `content` attribute, everything else yields text.
const TITLE_SELECTORS: &[&str] = &[
    "h1",
    "title",
    r#"meta[property="og:title"]"#,
    r#"meta[name="twitter:title"]"#,
    ".entry-title",
    ".post-title",
    ".article-title",
];

/// Content containers in priority order.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    r#"[role="main"]"#,
    ".entry-content",
    ".post-content",
    ".article-content",
    ".content",
    "main",
    ".main-content",
];

/// Publish date sources in priority order.
const DATE_SELECTORS: &[&str] = &[
    r#"meta[property="article:published_time"]"#,
    r#"meta[name="date"]"#,
    "[pubdate]",
    "time[datetime]",
    ".date",
    ".publish-date",
];

/// Ancestors that disqualify a paragraph in the fallback scrape.
const EXCLUDED_SECTION_TAGS: &[&str] = &["nav", "footer", "header", "aside"];

/// Minimum title length to accept a cascade hit.
const MIN_TITLE_CHARS: usize = 5;

/// Minimum paragraph length for the fallback scrape.
const MIN_PARAGRAPH_CHARS: usize = 20;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

/// Text of an element with noise-tag subtrees excluded, whitespace
/// collapsed to single spaces between text nodes.
pub fn element_text(el: ElementRef) -> String {
    let mut parts = Vec::new();
    collect_text(el, &mut parts);
    parts.join(" ")
}

fn collect_text(el: ElementRef, out: &mut Vec<String>) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if !NOISE_TAGS.contains(&child_el.value().name()) {
                collect_text(child_el, out);
            }
        }
    }
}

/// First title source yielding more than 5 characters; "Untitled"
/// when every source fails.
pub fn extract_title(doc: &Html) -> String {
    for css in TITLE_SELECTORS {
        if let Some(el) = doc.select(&selector(css)).next() {
            let value = match el.value().attr("content") {
                Some(content) => content.trim().to_string(),
                None => element_text(el),
            };
            if value.chars().count() > MIN_TITLE_CHARS {
                return value;
            }
        }
    }

    "Untitled".to_string()
}

/// Main content cascade: first container selector whose text exceeds
/// `min_chars`, else paragraphs longer than 20 characters outside
/// chrome sections, else the full body text.
pub fn extract_main_content(doc: &Html, min_chars: usize) -> String {
    for css in CONTENT_SELECTORS {
        if let Some(el) = doc.select(&selector(css)).next() {
            let text = element_text(el);
            if text.chars().count() > min_chars {
                return text;
            }
        }
    }

    let paragraphs: Vec<String> = doc
        .select(&selector("body p"))
        .filter(|p| !in_excluded_section(*p))
        .map(element_text)
        .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect();
    if !paragraphs.is_empty() {
        return paragraphs.join(" ");
    }

    doc.select(&selector("body")).next().map(element_text).unwrap_or_default()
}

fn in_excluded_section(el: ElementRef) -> bool {
    el.ancestors().filter_map(ElementRef::wrap).any(|ancestor| {
        let value = ancestor.value();
        EXCLUDED_SECTION_TAGS.contains(&value.name())
            || value.attr("class").is_some_and(|class| {
                let class = class.to_lowercase();
                class.contains("sidebar") || class.contains("widget")
            })
    })
}

/// First non-empty publish date source; empty string when none hit.
/// Values pass through verbatim -- no date parsing is attempted.
pub fn extract_publish_date(doc: &Html) -> String {
    for css in DATE_SELECTORS {
        if let Some(el) = doc.select(&selector(css)).next() {
            let value = match el.value().attr("datetime").or_else(|| el.value().attr("content")) {
                Some(attr) => attr.trim().to_string(),
                None => element_text(el),
            };
            if !value.is_empty() {
                return value;
            }
        }
    }

    String::new()
}
