//! Article content extraction with a two-stage fallback cascade.
//!
//! ### Strategy order
//! - Primary: readability-grade extraction via `dom_smoothie`.
//! - Quality gate: primary output below the configured character
//!   minimum falls back to the DOM-heuristic cascades in
//!   [`heuristics`].
//!
//! ### Failure is data
//! A URL that defeats every strategy yields a record with empty title
//! and content -- never an error. Downstream consumers test success via
//! either field; the two are always populated together.

pub mod heuristics;

use dom_smoothie::Readability;
use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

/// Normalized extraction output for one URL.
///
/// Invariant: `title` and `main_content` are either both non-empty
/// (successful) or both empty (failed), never partially populated.
/// `publish_date` is best-effort and may be empty either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub url: String,
    pub title: String,
    pub main_content: String,
    pub publish_date: String,
}

impl ExtractionRecord {
    /// Record for a URL that could not be fetched or extracted.
    pub fn failed(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            main_content: String::new(),
            publish_date: String::new(),
        }
    }

    /// Whether extraction produced usable content.
    pub fn is_successful(&self) -> bool {
        !self.title.is_empty() && !self.main_content.is_empty()
    }
}

/// Per-page content extractor.
pub struct ContentExtractor {
    min_content_chars: usize,
}

impl ContentExtractor {
    /// `min_content_chars` is the quality gate between the primary
    /// readability pass and the DOM-heuristic fallback (default 100
    /// via `AppConfig`).
    pub fn new(min_content_chars: usize) -> Self {
        Self { min_content_chars }
    }

    /// Extract title, main content, and publish date from a fetched
    /// page. Never panics or errors on malformed markup; a page that
    /// defeats every strategy yields a failed record.
    pub fn extract(&self, html: &str, url: &Url) -> ExtractionRecord {
        let doc = Html::parse_document(html);

        // The date cascade runs regardless of which content strategy
        // wins; readability does not surface publish dates.
        let publish_date = heuristics::extract_publish_date(&doc);

        let (title, main_content) = match readability_pass(html, url) {
            Some((title, content))
                if content.chars().count() >= self.min_content_chars && !title.is_empty() =>
            {
                (title, content)
            }
            _ => (
                heuristics::extract_title(&doc),
                heuristics::extract_main_content(&doc, self.min_content_chars),
            ),
        };

        if main_content.trim().is_empty() {
            tracing::debug!("extraction failed for {}", url);
            return ExtractionRecord::failed(url.as_str());
        }

        ExtractionRecord { url: url.to_string(), title, main_content, publish_date }
    }
}

/// Primary strategy. Any readability error is swallowed here; the
/// caller falls back to the DOM heuristics.
fn readability_pass(html: &str, url: &Url) -> Option<(String, String)> {
    let mut reader = Readability::new(html, Some(url.as_str()), None).ok()?;
    let article = reader.parse().ok()?;
    let title = article.title.trim().to_string();
    let content = article.text_content.trim().to_string();
    Some((title, content))
}
