//! Batch orchestration across URL lists.
//!
//! Both pipelines walk the URL list sequentially with a politeness
//! delay. Every per-URL failure is absorbed at this boundary -- an
//! empty record for the content pipeline, "try the next URL" for the
//! image pipeline -- so one bad URL never aborts a batch. Records come
//! back in input order, one per URL, with no element ever dropped.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::extract::{ContentExtractor, ExtractionRecord};
use crate::fetch::FetchClient;
use crate::image::{self, SelectionResult};

/// Aggregate counters over a batch of extraction records. Computed
/// fresh per call; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percentage of successful records, 0.0 for an empty batch.
    pub success_rate: f64,
    /// Word count summed over successful records.
    pub total_words: usize,
    /// 0.0 when nothing succeeded.
    pub avg_words_per_article: f64,
}

/// Scrape every URL in order, one record per URL regardless of
/// individual failures. `delay` paces consecutive requests; it is not
/// applied after the last one.
pub async fn scrape_all(
    client: &FetchClient, extractor: &ContentExtractor, urls: &[String], delay: Duration,
) -> Vec<ExtractionRecord> {
    let mut records = Vec::with_capacity(urls.len());

    for (i, url) in urls.iter().enumerate() {
        tracing::debug!("scraping {}/{}: {}", i + 1, urls.len(), url);

        let record = match client.fetch_page(url).await {
            Ok(page) => {
                // Extraction resolves against the post-redirect URL,
                // but records stay keyed by the caller's input URL.
                let mut record = extractor.extract(&page.html, &page.final_url);
                record.url = url.clone();
                record
            }
            Err(e) => {
                tracing::debug!("scrape failed for {}: {}", url, e);
                ExtractionRecord::failed(url)
            }
        };
        records.push(record);

        if i + 1 < urls.len() {
            sleep(delay).await;
        }
    }

    records
}

/// Try each URL in order and return the first successful featured-image
/// selection. Candidates are never aggregated across source URLs. All
/// per-URL errors mean "try the next one"; exhaustion is a valid
/// `success: false` outcome, not an error.
pub async fn select_featured_image(
    client: &FetchClient, urls: &[String], max_image_bytes: usize,
) -> SelectionResult {
    for url in urls {
        let page = match client.fetch_page(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!("image source {} failed: {}", url, e);
                continue;
            }
        };

        if let Some(image_url) =
            image::select_from_page(client, &page.html, &page.final_url, max_image_bytes).await
        {
            return SelectionResult::found(image_url);
        }
    }

    SelectionResult::none()
}

/// Pure reducer over extraction records; no I/O.
pub fn compute_stats(records: &[ExtractionRecord]) -> BatchStats {
    let total = records.len();
    let successful = records.iter().filter(|r| r.is_successful()).count();
    let failed = total - successful;

    let total_words: usize = records
        .iter()
        .filter(|r| r.is_successful())
        .map(|r| r.main_content.split_whitespace().count())
        .sum();

    let success_rate = if total == 0 { 0.0 } else { successful as f64 / total as f64 * 100.0 };
    let avg_words_per_article = if successful == 0 { 0.0 } else { total_words as f64 / successful as f64 };

    BatchStats { total, successful, failed, success_rate, total_words, avg_words_per_article }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchConfig;
    use crate::image::sniff::fixtures;
    use httpmock::prelude::*;

    const CAP: usize = 5 * 1024 * 1024;

    fn client() -> FetchClient {
        FetchClient::new(FetchConfig::default()).unwrap()
    }

    fn extractor() -> ContentExtractor {
        ContentExtractor::new(100)
    }

    fn article_html(marker: &str) -> String {
        let body = format!("{marker} sentence of article body text, repeated to clear the gate. ").repeat(8);
        format!(
            "<html><head><title>Headline For {marker}</title></head><body><article><p>{body}</p></article></body></html>"
        )
    }

    fn record(url: &str, title: &str, content: &str) -> ExtractionRecord {
        ExtractionRecord {
            url: url.to_string(),
            title: title.to_string(),
            main_content: content.to_string(),
            publish_date: String::new(),
        }
    }

    #[tokio::test]
    async fn test_scrape_all_preserves_order_and_length() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/a");
            then.status(200).body(article_html("alpha"));
        });
        server.mock(|when, then| {
            when.method(GET).path("/b");
            then.status(404);
        });
        server.mock(|when, then| {
            when.method(GET).path("/c");
            then.status(200).body(article_html("gamma"));
        });

        let urls = vec![server.url("/a"), server.url("/b"), server.url("/c")];
        let records = scrape_all(&client(), &extractor(), &urls, Duration::ZERO).await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].url, urls[0]);
        assert_eq!(records[1].url, urls[1]);
        assert_eq!(records[2].url, urls[2]);

        assert!(records[0].is_successful());
        assert!(records[0].main_content.contains("alpha"));
        assert!(!records[1].is_successful());
        assert!(records[2].main_content.contains("gamma"));
    }

    #[tokio::test]
    async fn test_scrape_all_no_half_populated_records() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/empty");
            then.status(200).body("<html><body></body></html>");
        });

        let urls = vec![server.url("/empty"), server.url("/no-route")];
        let records = scrape_all(&client(), &extractor(), &urls, Duration::ZERO).await;

        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.title.is_empty(), record.main_content.is_empty());
        }
    }

    #[tokio::test]
    async fn test_select_featured_image_og_candidate() {
        // A page advertising a 300x200 JPEG under the cap yields that
        // absolute URL.
        let server = MockServer::start();
        let image_url = server.url("/images/hero.jpg");
        server.mock(|when, then| {
            when.method(GET).path("/post");
            then.status(200).body(format!(
                r#"<html><head><meta property="og:image" content="{image_url}"></head><body></body></html>"#
            ));
        });
        server.mock(|when, then| {
            when.method(GET).path("/images/hero.jpg");
            then.status(200).body(fixtures::jpeg(300, 200));
        });

        let urls = vec![server.url("/post")];
        let result = select_featured_image(&client(), &urls, CAP).await;

        assert!(result.success);
        assert_eq!(result.image_url, Some(image_url));
    }

    #[tokio::test]
    async fn test_select_featured_image_falls_through_failing_urls() {
        // First two URLs fail outright; the third yields the image.
        let server = MockServer::start();
        let image_url = server.url("/ok.png");
        server.mock(|when, then| {
            when.method(GET).path("/down-1");
            then.status(503);
        });
        server.mock(|when, then| {
            when.method(GET).path("/down-2");
            then.status(503);
        });
        server.mock(|when, then| {
            when.method(GET).path("/works");
            then.status(200)
                .body(format!(r#"<html><body><article><img src="{image_url}"></article></body></html>"#));
        });
        server.mock(|when, then| {
            when.method(GET).path("/ok.png");
            then.status(200).body(fixtures::png(800, 600));
        });

        let urls = vec![server.url("/down-1"), server.url("/down-2"), server.url("/works")];
        let result = select_featured_image(&client(), &urls, CAP).await;

        assert!(result.success);
        assert_eq!(result.image_url, Some(image_url));
    }

    #[tokio::test]
    async fn test_select_featured_image_oversized_candidate_rejected() {
        let server = MockServer::start();
        let image_url = server.url("/heavy.png");
        server.mock(|when, then| {
            when.method(GET).path("/post");
            then.status(200)
                .body(format!(r#"<html><body><article><img src="{image_url}"></article></body></html>"#));
        });
        server.mock(|when, then| {
            when.method(GET).path("/heavy.png");
            then.status(200).body(vec![0u8; 8192]);
        });

        let urls = vec![server.url("/post")];
        let result = select_featured_image(&client(), &urls, 1024).await;

        assert!(!result.success);
        assert!(result.image_url.is_none());
    }

    #[tokio::test]
    async fn test_select_featured_image_idempotent() {
        let server = MockServer::start();
        let image_url = server.url("/pic.webp");
        server.mock(|when, then| {
            when.method(GET).path("/post");
            then.status(200)
                .body(format!(r#"<html><body><article><img src="{image_url}"></article></body></html>"#));
        });
        server.mock(|when, then| {
            when.method(GET).path("/pic.webp");
            then.status(200).body(fixtures::webp(640, 480));
        });

        let urls = vec![server.url("/post")];
        let first = select_featured_image(&client(), &urls, CAP).await;
        let second = select_featured_image(&client(), &urls, CAP).await;

        assert_eq!(first, second);
        assert!(first.success);
    }

    #[tokio::test]
    async fn test_select_featured_image_empty_list() {
        let result = select_featured_image(&client(), &[], CAP).await;
        assert_eq!(result, SelectionResult::none());
    }

    #[test]
    fn test_compute_stats() {
        let records = vec![
            record("u1", "Title A", "five words of body text"),
            record("u2", "", ""),
            record("u3", "Title B", "three more words"),
        ];

        let stats = compute_stats(&records);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.successful, 2);
        assert_eq!(stats.failed, 1);
        assert!((stats.success_rate - 66.666).abs() < 0.01);
        assert_eq!(stats.total_words, 8);
        assert!((stats.avg_words_per_article - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_compute_stats_empty() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.avg_words_per_article, 0.0);
    }
}
