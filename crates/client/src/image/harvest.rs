//! Image candidate harvesting from page markup.
//!
//! Candidates come from four sources in priority order: Open Graph
//! meta, Twitter card meta, images inside article/content containers,
//! and finally generic `<img>` elements in document order. Everything
//! runs through a skip-pattern filter, is resolved to an absolute URL
//! against the page, deduplicated first-seen, and capped -- bounding
//! downstream download cost is deliberate.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::RegexSet;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Cap on candidates handed to the scorer.
pub const MAX_CANDIDATES: usize = 5;

const ARTICLE_IMAGE_LIMIT: usize = 3;
const GENERIC_IMAGE_LIMIT: usize = 5;

/// Container-scoped image selectors, tried in priority order.
const ARTICLE_IMG_SELECTORS: &[&str] = &[
    "article img",
    ".post-content img",
    ".content img",
    ".entry-content img",
    ".post-body img",
    "main img",
];

/// Page-chrome markers. A case-insensitive substring hit in src, alt,
/// or class disqualifies the candidate. Precision over recall: missing
/// a real content image is tolerable, selecting chrome is not.
static SKIP_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        "(?i)icon",
        "(?i)logo",
        "(?i)avatar",
        "(?i)profile",
        "(?i)btn",
        "(?i)button",
        "(?i)social",
        "(?i)share",
        "(?i)ad",
        "(?i)advertisement",
        "(?i)banner",
        "(?i)pixel",
        "(?i)track",
    ])
    .expect("invalid skip pattern")
});

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

fn is_skipped(src: &str, alt: &str, class: &str) -> bool {
    SKIP_PATTERNS.is_match(src) || SKIP_PATTERNS.is_match(alt) || SKIP_PATTERNS.is_match(class)
}

fn is_content_image(src: &str, el: ElementRef) -> bool {
    let alt = el.value().attr("alt").unwrap_or("");
    let class = el.value().attr("class").unwrap_or("");
    !is_skipped(src, alt, class)
}

fn img_source<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    el.value().attr("src").or_else(|| el.value().attr("data-src"))
}

/// First non-empty `content` attribute among the given meta selectors.
fn meta_image(doc: &Html, selectors: &[&str]) -> Option<String> {
    for css in selectors {
        if let Some(content) = doc.select(&selector(css)).next().and_then(|el| el.value().attr("content")) {
            let content = content.trim();
            if !content.is_empty() {
                return Some(content.to_string());
            }
        }
    }
    None
}

fn article_images(doc: &Html, limit: usize) -> Vec<String> {
    let mut images = Vec::new();
    for css in ARTICLE_IMG_SELECTORS {
        for img in doc.select(&selector(css)) {
            if images.len() >= limit {
                return images;
            }
            if let Some(src) = img_source(img)
                && is_content_image(src, img)
            {
                images.push(src.to_string());
            }
        }
    }
    images
}

fn generic_images(doc: &Html, limit: usize) -> Vec<String> {
    let mut images = Vec::new();
    for img in doc.select(&selector("img")) {
        if images.len() >= limit {
            break;
        }
        if let Some(src) = img_source(img)
            && is_content_image(src, img)
        {
            images.push(src.to_string());
        }
    }
    images
}

/// Harvest, filter, resolve, dedup, and cap image candidates from a
/// fetched page. Returned URLs are absolute, in first-seen order, at
/// most [`MAX_CANDIDATES`] of them.
pub fn harvest_candidates(html: &str, page_url: &Url) -> Vec<String> {
    let doc = Html::parse_document(html);

    let mut raw: Vec<String> = Vec::new();

    if let Some(og) = meta_image(&doc, &[r#"meta[property="og:image"]"#])
        && !is_skipped(&og, "", "")
    {
        raw.push(og);
    }
    if let Some(twitter) = meta_image(
        &doc,
        &[r#"meta[name="twitter:image"]"#, r#"meta[property="twitter:image"]"#],
    ) && !is_skipped(&twitter, "", "")
    {
        raw.push(twitter);
    }
    raw.extend(article_images(&doc, ARTICLE_IMAGE_LIMIT));
    raw.extend(generic_images(&doc, GENERIC_IMAGE_LIMIT));

    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for candidate in raw {
        let Ok(absolute) = page_url.join(&candidate) else { continue };
        let absolute = absolute.to_string();
        if seen.insert(absolute.clone()) {
            unique.push(absolute);
        }
    }

    unique.truncate(MAX_CANDIDATES);
    unique
}
