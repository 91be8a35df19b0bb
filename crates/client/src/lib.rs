//! Resilient article-content and featured-image extraction over HTTP.
//!
//! [`FetchClient`] fetches pages, [`ContentExtractor`] pulls title, body
//! text, and publish date out of them through a readability-first
//! cascade, and the [`image`] pipeline harvests, probes, and scores
//! featured-image candidates. [`batch`] drives either pipeline across a
//! list of URLs, absorbing per-URL failures so a batch always completes.

pub mod batch;
pub mod extract;
pub mod fetch;
pub mod image;

pub use batch::{BatchStats, compute_stats, scrape_all, select_featured_image};
pub use extract::{ContentExtractor, ExtractionRecord};
pub use fetch::{FetchClient, FetchConfig, PageResponse};
pub use image::{ImageInfo, SelectionResult, harvest_candidates, select_from_page};
